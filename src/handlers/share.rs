use crate::models::*;
use crate::utils::share_code;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    post,
    path = "/share/validate",
    tag = "share",
    request_body = ImportEventRequest,
    responses(
        (status = 200, description = "Whether the share code decodes to an event", body = ShareDataReport)
    )
)]
pub async fn validate_share_data(request: web::Json<ImportEventRequest>) -> Result<HttpResponse> {
    let report = share_code::validate_share_data(&request.share_data);
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

#[utoipa::path(
    post,
    path = "/share/validate-link",
    tag = "share",
    request_body = ValidateShareLinkRequest,
    responses(
        (status = 200, description = "Whether the link carries a valid share code", body = ShareDataReport)
    )
)]
pub async fn validate_share_link(
    request: web::Json<ValidateShareLinkRequest>,
) -> Result<HttpResponse> {
    let report = share_code::validate_share_link(&request.url);
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

pub fn share_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/share")
            .route("/validate", web::post().to(validate_share_data))
            .route("/validate-link", web::post().to(validate_share_link)),
    );
}
