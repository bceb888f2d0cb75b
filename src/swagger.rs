use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::allocation::{
    AllocationRequest, AllocationResult, CalculationDetail, Participant, RemainderMode, RoundMode,
    ValidationReport,
};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::calc::allocate,
        handlers::calc::details,
        handlers::calc::validate,
        handlers::calc::options,
        handlers::event::list_events,
        handlers::event::create_event,
        handlers::event::get_summary,
        handlers::event::recalculate_all,
        handlers::event::import_event,
        handlers::event::get_event,
        handlers::event::update_event,
        handlers::event::delete_event,
        handlers::event::duplicate_event,
        handlers::event::calculate_event,
        handlers::event::share_event,
        handlers::event::add_participant,
        handlers::event::update_participant,
        handlers::event::remove_participant,
        handlers::event::reorder_participants,
        handlers::share::validate_share_data,
        handlers::share::validate_share_link,
    ),
    components(
        schemas(
            Participant,
            RoundMode,
            RemainderMode,
            AllocationRequest,
            AllocationResult,
            CalculationDetail,
            ValidationReport,
            AllocateResponse,
            DetailsResponse,
            ValidateResultsRequest,
            CalculationOptions,
            RoundUnitOption,
            RoundModeOption,
            RemainderModeOption,
            WeightPreset,
            SplitEvent,
            CreateEventRequest,
            UpdateEventRequest,
            AddParticipantRequest,
            UpdateParticipantRequest,
            ReorderParticipantsRequest,
            EventSortKey,
            SortOrder,
            EventSummary,
            ImportEventRequest,
            ShareEventResponse,
            ValidateShareLinkRequest,
            ShareDataReport,
            ApiError,
        )
    ),
    tags(
        (name = "calc", description = "Stateless allocation API"),
        (name = "event", description = "Split event management API"),
        (name = "participant", description = "Participant management API"),
        (name = "share", description = "Share code API"),
    ),
    info(
        title = "Splitfair Backend API",
        version = "1.0.0",
        description = "Weighted bill splitting REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
