use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// 每位参与者份额的取整粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RoundUnit {
    #[default]
    One,
    Ten,
    Hundred,
}

impl RoundUnit {
    pub const ALL: [RoundUnit; 3] = [RoundUnit::One, RoundUnit::Ten, RoundUnit::Hundred];

    pub fn value(self) -> i64 {
        match self {
            RoundUnit::One => 1,
            RoundUnit::Ten => 10,
            RoundUnit::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for RoundUnit {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RoundUnit::One),
            10 => Ok(RoundUnit::Ten),
            100 => Ok(RoundUnit::Hundred),
            other => Err(format!("Unsupported round unit: {other}")),
        }
    }
}

impl From<RoundUnit> for u32 {
    fn from(unit: RoundUnit) -> Self {
        unit.value() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoundMode {
    #[default]
    Round,
    Ceil,
    Floor,
}

impl RoundMode {
    pub const ALL: [RoundMode; 3] = [RoundMode::Round, RoundMode::Ceil, RoundMode::Floor];
}

impl std::fmt::Display for RoundMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundMode::Round => write!(f, "round"),
            RoundMode::Ceil => write!(f, "ceil"),
            RoundMode::Floor => write!(f, "floor"),
        }
    }
}

impl FromStr for RoundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round" => Ok(RoundMode::Round),
            "ceil" => Ok(RoundMode::Ceil),
            "floor" => Ok(RoundMode::Floor),
            other => Err(format!("Unsupported round mode: {other}")),
        }
    }
}

/// 取整后与总额之间差额的分配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RemainderMode {
    #[default]
    LargestRemainder,
    Order,
    Random,
}

impl RemainderMode {
    pub const ALL: [RemainderMode; 3] = [
        RemainderMode::LargestRemainder,
        RemainderMode::Order,
        RemainderMode::Random,
    ];
}

impl std::fmt::Display for RemainderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemainderMode::LargestRemainder => write!(f, "largest_remainder"),
            RemainderMode::Order => write!(f, "order"),
            RemainderMode::Random => write!(f, "random"),
        }
    }
}

impl FromStr for RemainderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "largest_remainder" => Ok(RemainderMode::LargestRemainder),
            "order" => Ok(RemainderMode::Order),
            "random" => Ok(RemainderMode::Random),
            other => Err(format!("Unsupported remainder mode: {other}")),
        }
    }
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight,
        }
    }
}

/// 一次分摊计算的输入：总额、有序参与者列表和三项取整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AllocationRequest {
    pub total: i64,
    pub participants: Vec<Participant>,
    #[serde(default)]
    #[schema(value_type = u32, example = 1)]
    pub round_unit: RoundUnit,
    #[serde(default)]
    pub round_mode: RoundMode,
    #[serde(default)]
    pub remainder_mode: RemainderMode,
}

impl AllocationRequest {
    pub fn total_weight(&self) -> f64 {
        self.participants.iter().map(|p| p.weight).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AllocationResult {
    pub participant_id: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalculationDetail {
    pub participant: Participant,
    pub raw_amount: f64,
    pub base_amount: f64,
    pub remainder: f64,
    pub weight_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub actual_total: i64,
    pub difference: i64,
}
