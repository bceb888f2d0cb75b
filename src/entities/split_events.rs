use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 参与者与计算结果以 JSON 列保存，取整配置以文本/整数保存
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "split_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub total: i64,
    pub round_unit: i32,
    pub round_mode: String,
    pub remainder_mode: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub participants: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub results: Json,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
