use crate::allocation::{
    self, AllocationRequest, AllocationResult, DEFAULT_WEIGHT, Participant, RemainderMode,
    RoundMode, RoundUnit,
};
use crate::error::{AppError, AppResult};
use crate::utils::validation::{
    MAX_TITLE_CHARS, validate_participant_name, validate_participants, validate_title,
    validate_total, validate_weight,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled";
const COPY_SUFFIX: &str = " (copy)";
const IMPORT_SUFFIX: &str = " (imported)";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// 一次分摊活动：分摊输入 + 标题、时间戳和最近一次计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SplitEvent {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    pub total: i64,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    #[schema(value_type = u32, example = 1)]
    pub round_unit: RoundUnit,
    #[serde(default)]
    pub round_mode: RoundMode,
    #[serde(default)]
    pub remainder_mode: RemainderMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub results: Vec<AllocationResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddParticipantRequest {
    pub name: String,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub total: i64,
    #[serde(default)]
    pub participants: Vec<AddParticipantRequest>,
    #[schema(value_type = Option<u32>, example = 1)]
    pub round_unit: Option<RoundUnit>,
    pub round_mode: Option<RoundMode>,
    pub remainder_mode: Option<RemainderMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub total: Option<i64>,
    /// 整体替换参与者列表
    pub participants: Option<Vec<Participant>>,
    #[schema(value_type = Option<u32>, example = 10)]
    pub round_unit: Option<RoundUnit>,
    pub round_mode: Option<RoundMode>,
    pub remainder_mode: Option<RemainderMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateParticipantRequest {
    pub name: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderParticipantsRequest {
    pub from_index: usize,
    pub to_index: usize,
}

impl SplitEvent {
    pub fn create(request: CreateEventRequest) -> AppResult<Self> {
        let now = Utc::now();
        let participants = request
            .participants
            .into_iter()
            .map(new_participant)
            .collect::<AppResult<Vec<_>>>()?;

        let mut event = SplitEvent {
            id: new_id(),
            title: normalize_title(request.title),
            total: request.total,
            participants,
            round_unit: request.round_unit.unwrap_or_default(),
            round_mode: request.round_mode.unwrap_or_default(),
            remainder_mode: request.remainder_mode.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            results: Vec::new(),
        };
        event.validate()?;
        event.recalculate();
        Ok(event)
    }

    pub fn allocation_request(&self) -> AllocationRequest {
        AllocationRequest {
            total: self.total,
            participants: self.participants.clone(),
            round_unit: self.round_unit,
            round_mode: self.round_mode,
            remainder_mode: self.remainder_mode,
        }
    }

    /// 重新计算结果并刷新更新时间
    pub fn recalculate(&mut self) {
        self.results = allocation::allocate(&self.allocation_request());
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> AppResult<()> {
        validate_title(&self.title)?;
        validate_total(self.total)?;
        validate_participants(&self.participants)
    }

    pub fn apply_update(&mut self, request: UpdateEventRequest) -> AppResult<()> {
        let mut next = self.clone();
        if let Some(title) = request.title {
            next.title = normalize_title(Some(title));
        }
        if let Some(total) = request.total {
            next.total = total;
        }
        if let Some(participants) = request.participants {
            next.participants = participants
                .into_iter()
                .map(|mut p| {
                    p.name = p.name.trim().to_string();
                    p
                })
                .collect();
        }
        if let Some(unit) = request.round_unit {
            next.round_unit = unit;
        }
        if let Some(mode) = request.round_mode {
            next.round_mode = mode;
        }
        if let Some(mode) = request.remainder_mode {
            next.remainder_mode = mode;
        }

        next.validate()?;
        next.recalculate();
        *self = next;
        Ok(())
    }

    pub fn add_participant(&mut self, request: AddParticipantRequest) -> AppResult<Participant> {
        let participant = new_participant(request)?;
        self.participants.push(participant.clone());
        self.recalculate();
        Ok(participant)
    }

    pub fn update_participant(
        &mut self,
        participant_id: &str,
        request: UpdateParticipantRequest,
    ) -> AppResult<()> {
        if let Some(name) = &request.name {
            validate_participant_name(name)?;
        }
        if let Some(weight) = request.weight {
            validate_weight(weight)?;
        }

        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id)
            .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))?;
        if let Some(name) = request.name {
            participant.name = name.trim().to_string();
        }
        if let Some(weight) = request.weight {
            participant.weight = weight;
        }
        self.recalculate();
        Ok(())
    }

    pub fn remove_participant(&mut self, participant_id: &str) -> AppResult<()> {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != participant_id);
        if self.participants.len() == before {
            return Err(AppError::NotFound("Participant not found".to_string()));
        }
        self.recalculate();
        Ok(())
    }

    pub fn reorder_participants(&mut self, from_index: usize, to_index: usize) -> AppResult<()> {
        let len = self.participants.len();
        if from_index >= len || to_index >= len {
            return Err(AppError::ValidationError(format!(
                "Participant index out of range (0..{len})"
            )));
        }
        let moved = self.participants.remove(from_index);
        self.participants.insert(to_index, moved);
        self.recalculate();
        Ok(())
    }

    /// 复制为新活动：新 id、新时间戳，标题追加后缀
    pub fn duplicate(&self) -> Self {
        self.renewed(COPY_SUFFIX)
    }

    /// 由共享码导入的活动同样视为新活动
    pub fn imported(&self) -> Self {
        self.renewed(IMPORT_SUFFIX)
    }

    fn renewed(&self, suffix: &str) -> Self {
        let now = Utc::now();
        let mut event = SplitEvent {
            id: new_id(),
            title: suffixed_title(&self.title, suffix),
            created_at: now,
            updated_at: now,
            results: Vec::new(),
            ..self.clone()
        };
        event.recalculate();
        event
    }
}

fn new_participant(request: AddParticipantRequest) -> AppResult<Participant> {
    let weight = request.weight.unwrap_or(DEFAULT_WEIGHT);
    validate_participant_name(&request.name)?;
    validate_weight(weight)?;
    Ok(Participant::new(new_id(), request.name.trim(), weight))
}

fn normalize_title(title: Option<String>) -> String {
    match title.map(|t| t.trim().to_string()) {
        Some(t) if !t.is_empty() => t,
        _ => default_title(),
    }
}

fn suffixed_title(title: &str, suffix: &str) -> String {
    let keep = MAX_TITLE_CHARS.saturating_sub(suffix.chars().count());
    let base: String = title.chars().take(keep).collect();
    format!("{base}{suffix}")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventSortKey {
    #[default]
    UpdatedAt,
    Total,
    ParticipantCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EventQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// 按标题或参与者名称搜索（不区分大小写）
    pub q: Option<String>,
    pub sort_by: Option<EventSortKey>,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventSummary {
    pub total_events: u64,
    pub total_amount: i64,
    pub average_amount: i64,
    pub total_participants: u64,
    pub average_participants: u64,
}

pub fn search_events(events: Vec<SplitEvent>, query: &str) -> Vec<SplitEvent> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return events;
    }
    events
        .into_iter()
        .filter(|event| {
            event.title.to_lowercase().contains(&query)
                || event
                    .participants
                    .iter()
                    .any(|p| p.name.to_lowercase().contains(&query))
        })
        .collect()
}

pub fn sort_events(events: &mut [SplitEvent], key: EventSortKey, order: SortOrder) {
    events.sort_by(|a, b| {
        let ordering = match key {
            EventSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            EventSortKey::Total => a.total.cmp(&b.total),
            EventSortKey::ParticipantCount => a.participants.len().cmp(&b.participants.len()),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

pub fn summarize(events: &[SplitEvent]) -> EventSummary {
    let total_events = events.len() as u64;
    let total_amount = events
        .iter()
        .fold(0i64, |acc, e| acc.saturating_add(e.total));
    let total_participants: u64 = events.iter().map(|e| e.participants.len() as u64).sum();

    let (average_amount, average_participants) = if total_events > 0 {
        (
            (total_amount as f64 / total_events as f64).round() as i64,
            (total_participants as f64 / total_events as f64).round() as u64,
        )
    } else {
        (0, 0)
    };

    EventSummary {
        total_events,
        total_amount,
        average_amount,
        total_participants,
        average_participants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn add(name: &str, weight: Option<f64>) -> AddParticipantRequest {
        AddParticipantRequest {
            name: name.to_string(),
            weight,
        }
    }

    fn dinner() -> SplitEvent {
        SplitEvent::create(CreateEventRequest {
            title: Some("Team dinner".to_string()),
            total: 100,
            participants: vec![add("Alice", None), add("Bob", None), add("Carol", None)],
            round_unit: None,
            round_mode: None,
            remainder_mode: None,
        })
        .unwrap()
    }

    fn amounts(event: &SplitEvent) -> Vec<i64> {
        event.results.iter().map(|r| r.amount).collect()
    }

    #[test]
    fn test_create_computes_results_with_defaults() {
        let event = dinner();
        assert_eq!(event.round_unit, RoundUnit::One);
        assert_eq!(event.round_mode, RoundMode::Round);
        assert_eq!(event.remainder_mode, RemainderMode::LargestRemainder);
        assert_eq!(amounts(&event), vec![34, 33, 33]);
        assert_eq!(event.results[0].participant_id, event.participants[0].id);
    }

    #[test]
    fn test_create_uses_default_title() {
        let event = SplitEvent::create(CreateEventRequest {
            title: Some("   ".to_string()),
            total: 0,
            participants: vec![],
            round_unit: None,
            round_mode: None,
            remainder_mode: None,
        })
        .unwrap();
        assert_eq!(event.title, DEFAULT_TITLE);
        assert!(event.results.is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let bad_weight = CreateEventRequest {
            title: None,
            total: 100,
            participants: vec![add("Alice", Some(20.0))],
            round_unit: None,
            round_mode: None,
            remainder_mode: None,
        };
        assert!(matches!(
            SplitEvent::create(bad_weight),
            Err(AppError::ValidationError(_))
        ));

        let negative_total = CreateEventRequest {
            title: None,
            total: -5,
            participants: vec![],
            round_unit: None,
            round_mode: None,
            remainder_mode: None,
        };
        assert!(SplitEvent::create(negative_total).is_err());

        let huge_total = CreateEventRequest {
            title: None,
            total: i64::MAX,
            participants: vec![add("Alice", None), add("Bob", None)],
            round_unit: None,
            round_mode: None,
            remainder_mode: None,
        };
        assert!(matches!(
            SplitEvent::create(huge_total),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_participant_lifecycle_recalculates() {
        let mut event = dinner();

        let dave = event.add_participant(add("Dave", Some(2.0))).unwrap();
        assert_eq!(amounts(&event), vec![20, 20, 20, 40]);

        event
            .update_participant(
                &dave.id,
                UpdateParticipantRequest {
                    name: None,
                    weight: Some(1.0),
                },
            )
            .unwrap();
        assert_eq!(amounts(&event), vec![25, 25, 25, 25]);

        event.remove_participant(&dave.id).unwrap();
        assert_eq!(event.participants.len(), 3);
        assert_eq!(amounts(&event).iter().sum::<i64>(), 100);

        assert!(matches!(
            event.remove_participant("missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_participant_is_atomic() {
        let mut event = dinner();
        let before = event.clone();
        let id = event.participants[0].id.clone();
        let result = event.update_participant(
            &id,
            UpdateParticipantRequest {
                name: Some("Alicia".to_string()),
                weight: Some(0.0),
            },
        );
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_eq!(event, before);
        assert_eq!(event.participants[0].name, "Alice");
    }

    #[test]
    fn test_reorder_moves_extra_unit() {
        let mut event = dinner();
        let carol = event.participants[2].id.clone();
        event.reorder_participants(2, 0).unwrap();
        assert_eq!(event.participants[0].id, carol);
        assert_eq!(event.results[0].participant_id, carol);
        assert_eq!(event.results[0].amount, 34);

        assert!(event.reorder_participants(0, 3).is_err());
    }

    #[test]
    fn test_apply_update_is_atomic() {
        let mut event = dinner();
        event
            .apply_update(UpdateEventRequest {
                total: Some(1000),
                round_unit: Some(RoundUnit::Hundred),
                round_mode: Some(RoundMode::Floor),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(amounts(&event), vec![400, 300, 300]);

        let before = event.clone();
        let result = event.apply_update(UpdateEventRequest {
            total: Some(50),
            participants: Some(vec![Participant::new("x", "", 1.0)]),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(event, before);
    }

    #[test]
    fn test_apply_update_rejects_duplicate_ids() {
        let mut event = dinner();
        let result = event.apply_update(UpdateEventRequest {
            participants: Some(vec![
                Participant::new("same", "A", 1.0),
                Participant::new("same", "B", 1.0),
            ]),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_and_imported() {
        let event = dinner();
        let copy = event.duplicate();
        assert_ne!(copy.id, event.id);
        assert_eq!(copy.title, "Team dinner (copy)");
        assert_eq!(copy.participants, event.participants);
        assert_eq!(copy.results, event.results);

        let imported = event.imported();
        assert_eq!(imported.title, "Team dinner (imported)");
    }

    #[test]
    fn test_suffixed_title_stays_within_limit() {
        let long = "x".repeat(MAX_TITLE_CHARS);
        let title = suffixed_title(&long, COPY_SUFFIX);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert!(title.ends_with(COPY_SUFFIX));
    }

    #[test]
    fn test_search_events() {
        let mut lunch = dinner();
        lunch.title = "Lunch".to_string();
        lunch.participants[0].name = "Zed".to_string();
        let events = vec![dinner(), lunch];

        assert_eq!(search_events(events.clone(), "DINNER").len(), 1);
        assert_eq!(search_events(events.clone(), "zed").len(), 1);
        assert_eq!(search_events(events.clone(), "bob").len(), 2);
        assert_eq!(search_events(events.clone(), "").len(), 2);
        assert!(search_events(events, "nobody").is_empty());
    }

    #[test]
    fn test_sort_events() {
        let mut a = dinner();
        a.total = 300;
        let mut b = dinner();
        b.total = 100;
        b.participants.pop();
        b.updated_at = a.updated_at + Duration::seconds(10);
        let mut events = vec![a.clone(), b.clone()];

        sort_events(&mut events, EventSortKey::UpdatedAt, SortOrder::Desc);
        assert_eq!(events[0].id, b.id);

        sort_events(&mut events, EventSortKey::Total, SortOrder::Desc);
        assert_eq!(events[0].id, a.id);

        sort_events(&mut events, EventSortKey::ParticipantCount, SortOrder::Asc);
        assert_eq!(events[0].id, b.id);
    }

    #[test]
    fn test_summarize() {
        assert_eq!(
            summarize(&[]),
            EventSummary {
                total_events: 0,
                total_amount: 0,
                average_amount: 0,
                total_participants: 0,
                average_participants: 0,
            }
        );

        let mut big = dinner();
        big.total = 201;
        big.participants.pop();
        let summary = summarize(&[dinner(), big.clone()]);
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.total_amount, 301);
        assert_eq!(summary.average_amount, 151);
        assert_eq!(summary.total_participants, 5);
        assert_eq!(summary.average_participants, 3);

        big.total = i64::MAX;
        assert_eq!(summarize(&[big.clone(), big]).total_amount, i64::MAX);
    }
}
