use crate::allocation::{
    AllocationResult, CalculationDetail, RemainderMode, RoundMode, RoundUnit, ValidationReport,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllocateResponse {
    pub results: Vec<AllocationResult>,
    pub validation: ValidationReport,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetailsResponse {
    pub details: Vec<CalculationDetail>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResultsRequest {
    pub results: Vec<AllocationResult>,
    pub expected_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundUnitOption {
    pub value: u32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundModeOption {
    pub value: RoundMode,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemainderModeOption {
    pub value: RemainderMode,
    pub label: String,
    pub recommended: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeightPreset {
    pub value: f64,
    pub label: String,
}

/// 前端表单使用的可选项、标签与默认值
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculationOptions {
    pub round_units: Vec<RoundUnitOption>,
    pub round_modes: Vec<RoundModeOption>,
    pub remainder_modes: Vec<RemainderModeOption>,
    pub weight_presets: Vec<WeightPreset>,
    pub default_round_unit: u32,
    pub default_round_mode: RoundMode,
    pub default_remainder_mode: RemainderMode,
}

pub const WEIGHT_PRESETS: [(f64, &str); 5] = [
    (0.5, "Half (0.5)"),
    (0.8, "Organizer discount (0.8)"),
    (1.0, "Normal (1.0)"),
    (1.2, "A bit more (1.2)"),
    (1.5, "More (1.5)"),
];

fn round_unit_label(unit: RoundUnit) -> &'static str {
    match unit {
        RoundUnit::One => "Nearest 1",
        RoundUnit::Ten => "Nearest 10",
        RoundUnit::Hundred => "Nearest 100",
    }
}

fn round_mode_label(mode: RoundMode) -> &'static str {
    match mode {
        RoundMode::Round => "Round half up",
        RoundMode::Ceil => "Round up",
        RoundMode::Floor => "Round down",
    }
}

fn remainder_mode_label(mode: RemainderMode) -> &'static str {
    match mode {
        RemainderMode::LargestRemainder => "Largest remainder (recommended)",
        RemainderMode::Order => "In listed order",
        RemainderMode::Random => "Random",
    }
}

impl CalculationOptions {
    pub fn build() -> Self {
        Self {
            round_units: RoundUnit::ALL
                .iter()
                .map(|&unit| RoundUnitOption {
                    value: unit.into(),
                    label: round_unit_label(unit).to_string(),
                })
                .collect(),
            round_modes: RoundMode::ALL
                .iter()
                .map(|&mode| RoundModeOption {
                    value: mode,
                    label: round_mode_label(mode).to_string(),
                })
                .collect(),
            remainder_modes: RemainderMode::ALL
                .iter()
                .map(|&mode| RemainderModeOption {
                    value: mode,
                    label: remainder_mode_label(mode).to_string(),
                    recommended: mode == RemainderMode::default(),
                })
                .collect(),
            weight_presets: WEIGHT_PRESETS
                .iter()
                .map(|&(value, label)| WeightPreset {
                    value,
                    label: label.to_string(),
                })
                .collect(),
            default_round_unit: RoundUnit::default().into(),
            default_round_mode: RoundMode::default(),
            default_remainder_mode: RemainderMode::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportEventRequest {
    /// 共享码，或包含 `d` 参数的共享链接
    pub share_data: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShareEventResponse {
    pub share_code: String,
    pub share_link: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateShareLinkRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShareDataReport {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_cover_every_mode() {
        let options = CalculationOptions::build();
        let units: Vec<u32> = options.round_units.iter().map(|u| u.value).collect();
        assert_eq!(units, vec![1, 10, 100]);
        assert_eq!(options.round_modes.len(), 3);
        assert_eq!(options.weight_presets.len(), 5);

        let recommended: Vec<_> = options
            .remainder_modes
            .iter()
            .filter(|m| m.recommended)
            .collect();
        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].value, RemainderMode::LargestRemainder);
        assert_eq!(options.default_round_unit, 1);
    }
}
