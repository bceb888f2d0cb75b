use crate::allocation::{AllocationRequest, Participant};
use crate::error::{AppError, AppResult};
use std::collections::HashSet;

pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 10.0;
pub const MAX_NAME_CHARS: usize = 30;
pub const MAX_TITLE_CHARS: usize = 100;
/// 份额按 f64 计算，总额不超过 f64 可精确表示的最大整数 2^53 - 1
pub const MAX_TOTAL: i64 = 9_007_199_254_740_991;

/// 参与者名称：去除首尾空白后 1-30 个字符
pub fn validate_participant_name(name: &str) -> AppResult<()> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(AppError::ValidationError(format!(
            "Participant name must be between 1 and {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_weight(weight: f64) -> AppResult<()> {
    if !weight.is_finite() || !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        return Err(AppError::ValidationError(format!(
            "Weight must be between {MIN_WEIGHT} and {MAX_WEIGHT}"
        )));
    }
    Ok(())
}

pub fn validate_total(total: i64) -> AppResult<()> {
    if total < 0 {
        return Err(AppError::ValidationError(
            "Total amount must not be negative".to_string(),
        ));
    }
    if total > MAX_TOTAL {
        return Err(AppError::ValidationError(format!(
            "Total amount must not exceed {MAX_TOTAL}"
        )));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> AppResult<()> {
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::ValidationError(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

/// 参与者名称、权重，以及 id 非空且不重复
pub fn validate_participants(participants: &[Participant]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for participant in participants {
        validate_participant_name(&participant.name)?;
        validate_weight(participant.weight)?;
        if participant.id.is_empty() || !seen.insert(participant.id.as_str()) {
            return Err(AppError::ValidationError(format!(
                "Duplicate or empty participant id: {:?}",
                participant.id
            )));
        }
    }
    Ok(())
}

pub fn validate_allocation_request(request: &AllocationRequest) -> AppResult<()> {
    validate_total(request.total)?;
    validate_participants(&request.participants)
}
