use crate::error::{AppError, AppResult};
use crate::models::{ShareDataReport, SplitEvent};
use actix_web::web;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ShareQuery {
    d: Option<String>,
}

/// 活动序列化为 JSON 后做无填充的 base64url 编码
pub fn encode_event(event: &SplitEvent) -> AppResult<String> {
    let json = serde_json::to_vec(event)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_event(share_code: &str) -> AppResult<SplitEvent> {
    let trimmed = share_code.trim().trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| AppError::ShareDataError(format!("Malformed share code: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::ShareDataError(format!("Malformed event data: {e}")))
}

pub fn share_link(event: &SplitEvent, base_url: &str) -> AppResult<String> {
    let code = encode_event(event)?;
    Ok(format!("{}/import?d={code}", base_url.trim_end_matches('/')))
}

/// 从共享链接中取出 `d` 参数；不是绝对 URL 时返回 None
pub fn extract_share_data(url: &str) -> Option<String> {
    let (scheme, rest) = url.trim().split_once("://")?;
    if scheme.is_empty() || rest.is_empty() {
        return None;
    }
    let query = rest.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or_default();

    web::Query::<ShareQuery>::from_query(query)
        .ok()?
        .into_inner()
        .d
        .filter(|d| !d.is_empty())
}

pub fn validate_share_data(share_code: &str) -> ShareDataReport {
    match decode_event(share_code) {
        Ok(_) => ShareDataReport {
            is_valid: true,
            share_data: Some(share_code.to_string()),
            error: None,
        },
        Err(e) => ShareDataReport {
            is_valid: false,
            share_data: None,
            error: Some(e.to_string()),
        },
    }
}

pub fn validate_share_link(url: &str) -> ShareDataReport {
    match extract_share_data(url) {
        Some(share_code) => validate_share_data(&share_code),
        None => ShareDataReport {
            is_valid: false,
            share_data: None,
            error: Some("Share data not found in link".to_string()),
        },
    }
}

/// 导入时既接受共享码也接受完整链接
pub fn resolve_share_data(input: &str) -> String {
    extract_share_data(input).unwrap_or_else(|| input.trim().to_string())
}
