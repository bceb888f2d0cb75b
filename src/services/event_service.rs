use crate::allocation::RoundUnit;
use crate::config::ShareConfig;
use crate::entities::split_event_entity as se;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{PaginatedResponse, PaginationParams, share_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
    share: ShareConfig,
}

impl EventService {
    pub fn new(pool: DatabaseConnection, share: ShareConfig) -> Self {
        Self { pool, share }
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> AppResult<SplitEvent> {
        let event = SplitEvent::create(request)?;
        self.insert(&event).await?;
        log::info!(
            "Created split event {} with {} participants",
            event.id,
            event.participants.len()
        );
        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> AppResult<SplitEvent> {
        let model = se::Entity::find_by_id(id.to_string())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
        to_domain(model)
    }

    /// 搜索、排序后在内存中分页；活动数量受 `max_events` 限制
    pub async fn list_events(&self, query: &EventQuery) -> AppResult<PaginatedResponse<SplitEvent>> {
        let mut events = self.all_events().await?;
        if let Some(q) = query.q.as_deref() {
            events = search_events(events, q);
        }
        sort_events(
            &mut events,
            query.sort_by.unwrap_or_default(),
            query.order.unwrap_or_default(),
        );

        let params = PaginationParams::new(query.page, query.per_page);
        Ok(PaginatedResponse::from_all(events, &params))
    }

    pub async fn update_event(&self, id: &str, request: UpdateEventRequest) -> AppResult<SplitEvent> {
        self.modify(id, |event| event.apply_update(request)).await
    }

    pub async fn delete_event(&self, id: &str) -> AppResult<()> {
        let res = se::Entity::delete_by_id(id.to_string())
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        log::info!("Deleted split event {id}");
        Ok(())
    }

    pub async fn duplicate_event(&self, id: &str) -> AppResult<SplitEvent> {
        let copy = self.get_event(id).await?.duplicate();
        self.insert(&copy).await?;
        Ok(copy)
    }

    pub async fn add_participant(
        &self,
        id: &str,
        request: AddParticipantRequest,
    ) -> AppResult<SplitEvent> {
        self.modify(id, |event| event.add_participant(request).map(|_| ()))
            .await
    }

    pub async fn update_participant(
        &self,
        id: &str,
        participant_id: &str,
        request: UpdateParticipantRequest,
    ) -> AppResult<SplitEvent> {
        self.modify(id, |event| event.update_participant(participant_id, request))
            .await
    }

    pub async fn remove_participant(&self, id: &str, participant_id: &str) -> AppResult<SplitEvent> {
        self.modify(id, |event| event.remove_participant(participant_id))
            .await
    }

    pub async fn reorder_participants(
        &self,
        id: &str,
        request: ReorderParticipantsRequest,
    ) -> AppResult<SplitEvent> {
        self.modify(id, |event| {
            event.reorder_participants(request.from_index, request.to_index)
        })
        .await
    }

    pub async fn calculate_event(&self, id: &str) -> AppResult<SplitEvent> {
        self.modify(id, |event| {
            event.recalculate();
            Ok(())
        })
        .await
    }

    /// 在同一事务中重新计算全部活动，返回处理数量
    pub async fn recalculate_all(&self) -> AppResult<u64> {
        let txn = self.pool.begin().await?;
        let models = se::Entity::find().all(&txn).await?;

        let mut count = 0u64;
        for model in models {
            let mut event = to_domain(model)?;
            event.recalculate();
            to_active_model(&event)?
                .update(&txn)
                .await
                .map_err(update_error)?;
            count += 1;
        }
        txn.commit().await?;

        log::info!("Recalculated {count} split events");
        Ok(count)
    }

    pub async fn share_event(&self, id: &str) -> AppResult<ShareEventResponse> {
        let event = self.get_event(id).await?;
        Ok(ShareEventResponse {
            share_code: share_code::encode_event(&event)?,
            share_link: share_code::share_link(&event, &self.share.base_url)?,
        })
    }

    pub async fn import_event(&self, request: ImportEventRequest) -> AppResult<SplitEvent> {
        let code = share_code::resolve_share_data(&request.share_data);
        let decoded = share_code::decode_event(&code)?;
        decoded.validate()?;

        let event = decoded.imported();
        self.insert(&event).await?;
        log::info!("Imported split event {} as {}", decoded.id, event.id);
        Ok(event)
    }

    pub async fn summary(&self) -> AppResult<EventSummary> {
        let events = self.all_events().await?;
        Ok(summarize(&events))
    }

    async fn all_events(&self) -> AppResult<Vec<SplitEvent>> {
        se::Entity::find()
            .order_by_desc(se::Column::UpdatedAt)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn insert(&self, event: &SplitEvent) -> AppResult<()> {
        to_active_model(event)?.insert(&self.pool).await?;
        self.prune().await
    }

    /// 在事务中加行锁读取、修改并写回；修改失败时事务随之回滚
    async fn modify<F>(&self, id: &str, change: F) -> AppResult<SplitEvent>
    where
        F: FnOnce(&mut SplitEvent) -> AppResult<()>,
    {
        let txn = self.pool.begin().await?;
        let model = se::Entity::find_by_id(id.to_string())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let mut event = to_domain(model)?;
        change(&mut event)?;
        to_active_model(&event)?
            .update(&txn)
            .await
            .map_err(update_error)?;
        txn.commit().await?;
        Ok(event)
    }

    /// 只保留最近创建的 `max_events` 个活动
    async fn prune(&self) -> AppResult<()> {
        let stale: Vec<String> = se::Entity::find()
            .order_by_desc(se::Column::CreatedAt)
            .offset(self.share.max_events)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        if stale.is_empty() {
            return Ok(());
        }
        let res = se::Entity::delete_many()
            .filter(se::Column::Id.is_in(stale))
            .exec(&self.pool)
            .await?;
        log::info!("Pruned {} old split events", res.rows_affected);
        Ok(())
    }
}

/// 写回时行已被删除视为活动不存在
fn update_error(err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotUpdated => AppError::NotFound("Event not found".to_string()),
        other => AppError::DatabaseError(other),
    }
}

fn to_domain(model: se::Model) -> AppResult<SplitEvent> {
    let round_unit = u32::try_from(model.round_unit)
        .map_err(|e| e.to_string())
        .and_then(RoundUnit::try_from)
        .map_err(AppError::InternalError)?;

    Ok(SplitEvent {
        id: model.id,
        title: model.title,
        total: model.total,
        participants: serde_json::from_value(model.participants)?,
        round_unit,
        round_mode: model.round_mode.parse().map_err(AppError::InternalError)?,
        remainder_mode: model
            .remainder_mode
            .parse()
            .map_err(AppError::InternalError)?,
        created_at: model.created_at,
        updated_at: model.updated_at,
        results: serde_json::from_value(model.results)?,
    })
}

fn to_active_model(event: &SplitEvent) -> AppResult<se::ActiveModel> {
    Ok(se::ActiveModel {
        id: Set(event.id.clone()),
        title: Set(event.title.clone()),
        total: Set(event.total),
        round_unit: Set(u32::from(event.round_unit) as i32),
        round_mode: Set(event.round_mode.to_string()),
        remainder_mode: Set(event.remainder_mode.to_string()),
        participants: Set(serde_json::to_value(&event.participants)?),
        results: Set(serde_json::to_value(&event.results)?),
        created_at: Set(event.created_at),
        updated_at: Set(event.updated_at),
    })
}
