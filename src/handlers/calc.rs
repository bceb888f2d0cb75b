use crate::allocation::{self, AllocationRequest, ValidationReport};
use crate::models::*;
use crate::utils::validate_allocation_request;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/calc/allocate",
    tag = "calc",
    request_body = AllocationRequest,
    responses(
        (status = 200, description = "Allocation computed", body = AllocateResponse),
        (status = 400, description = "Invalid total, participant name or weight")
    )
)]
pub async fn allocate(request: web::Json<AllocationRequest>) -> Result<HttpResponse> {
    if let Err(e) = validate_allocation_request(&request) {
        return Ok(e.error_response());
    }

    let results = allocation::allocate(&request);
    let validation = allocation::validate(&results, request.total);
    if !validation.is_valid {
        log::warn!(
            "Allocation of {} did not settle: difference {}",
            request.total,
            validation.difference
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(AllocateResponse {
        results,
        validation,
    })))
}

#[utoipa::path(
    post,
    path = "/calc/details",
    tag = "calc",
    request_body = AllocationRequest,
    responses(
        (status = 200, description = "Per-participant calculation details", body = DetailsResponse),
        (status = 400, description = "Invalid total, participant name or weight")
    )
)]
pub async fn details(request: web::Json<AllocationRequest>) -> Result<HttpResponse> {
    if let Err(e) = validate_allocation_request(&request) {
        return Ok(e.error_response());
    }
    let details = allocation::details(&request);
    Ok(HttpResponse::Ok().json(ApiResponse::success(DetailsResponse { details })))
}

#[utoipa::path(
    post,
    path = "/calc/validate",
    tag = "calc",
    request_body = ValidateResultsRequest,
    responses(
        (status = 200, description = "Validation report", body = ValidationReport)
    )
)]
pub async fn validate(request: web::Json<ValidateResultsRequest>) -> Result<HttpResponse> {
    let report = allocation::validate(&request.results, request.expected_total);
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/calc/options",
    tag = "calc",
    responses(
        (status = 200, description = "Rounding options, labels and weight presets", body = CalculationOptions)
    )
)]
pub async fn options() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(CalculationOptions::build())))
}

pub fn calc_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/calc")
            .route("/allocate", web::post().to(allocate))
            .route("/details", web::post().to(details))
            .route("/validate", web::post().to(validate))
            .route("/options", web::get().to(options)),
    );
}
