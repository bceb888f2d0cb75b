use super::types::{Participant, RoundMode, RoundUnit};

/// 先截到小数点后两位消除按比例相除带来的浮点噪声，再按单位取整
pub fn apply_round(value: f64, unit: RoundUnit, mode: RoundMode) -> f64 {
    let scaled = (value * 100.0).round() / 100.0;
    let unit = unit.value() as f64;

    let ratio = scaled / unit;
    let units = match mode {
        RoundMode::Round => ratio.round(),
        RoundMode::Ceil => ratio.ceil(),
        RoundMode::Floor => ratio.floor(),
    };
    units * unit
}

/// 参与者在取整前按权重应得的精确份额
pub fn raw_share(total: i64, participant: &Participant, total_weight: f64) -> f64 {
    if total_weight == 0.0 {
        return 0.0;
    }
    total as f64 * participant.weight / total_weight
}
