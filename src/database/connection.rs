use crate::config::DatabaseConfig;
use crate::entities::split_event_entity;
use crate::error::AppResult;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let pool = Database::connect(options).await?;
    Ok(pool)
}

/// 按实体定义建表（已存在则跳过）
pub async fn ensure_schema(pool: &DbPool) -> AppResult<()> {
    let backend = pool.get_database_backend();
    let schema = Schema::new(backend);

    let mut statement = schema.create_table_from_entity(split_event_entity::Entity);
    statement.if_not_exists();
    pool.execute(backend.build(&statement)).await?;

    log::info!("Database schema is ready");
    Ok(())
}
