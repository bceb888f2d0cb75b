use crate::models::*;
use crate::services::EventService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/events",
    tag = "event",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size (1-100)"),
        ("q" = Option<String>, Query, description = "Search in title and participant names"),
        ("sort_by" = Option<EventSortKey>, Query, description = "updated_at / total / participant_count"),
        ("order" = Option<SortOrder>, Query, description = "asc / desc")
    ),
    responses(
        (status = 200, description = "Paged event list")
    )
)]
pub async fn list_events(
    event_service: web::Data<EventService>,
    query: web::Query<EventQuery>,
) -> Result<HttpResponse> {
    match event_service.list_events(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "event",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event created and calculated", body = SplitEvent),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_event(
    event_service: web::Data<EventService>,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    match event_service.create_event(request.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/summary",
    tag = "event",
    responses(
        (status = 200, description = "Totals and averages over all events", body = EventSummary)
    )
)]
pub async fn get_summary(event_service: web::Data<EventService>) -> Result<HttpResponse> {
    match event_service.summary().await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/recalculate",
    tag = "event",
    responses(
        (status = 200, description = "All events recalculated")
    )
)]
pub async fn recalculate_all(event_service: web::Data<EventService>) -> Result<HttpResponse> {
    match event_service.recalculate_all().await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
            "recalculated": count
        })))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/import",
    tag = "event",
    request_body = ImportEventRequest,
    responses(
        (status = 200, description = "Event imported", body = SplitEvent),
        (status = 400, description = "Invalid share data")
    )
)]
pub async fn import_event(
    event_service: web::Data<EventService>,
    request: web::Json<ImportEventRequest>,
) -> Result<HttpResponse> {
    match event_service.import_event(request.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "event",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = SplitEvent),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match event_service.get_event(&path).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "event",
    params(("id" = String, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated and recalculated", body = SplitEvent),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn update_event(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
    request: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse> {
    match event_service
        .update_event(&path, request.into_inner())
        .await
    {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "event",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match event_service.delete_event(&id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            id,
            "Event deleted".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{id}/duplicate",
    tag = "event",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Copy created", body = SplitEvent),
        (status = 404, description = "Event not found")
    )
)]
pub async fn duplicate_event(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match event_service.duplicate_event(&path).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{id}/calculate",
    tag = "event",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event recalculated", body = SplitEvent),
        (status = 404, description = "Event not found")
    )
)]
pub async fn calculate_event(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match event_service.calculate_event(&path).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{id}/share",
    tag = "event",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Share code and link", body = ShareEventResponse),
        (status = 404, description = "Event not found")
    )
)]
pub async fn share_event(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match event_service.share_event(&path).await {
        Ok(share) => Ok(HttpResponse::Ok().json(ApiResponse::success(share))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{id}/participants",
    tag = "participant",
    params(("id" = String, Path, description = "Event id")),
    request_body = AddParticipantRequest,
    responses(
        (status = 200, description = "Participant added", body = SplitEvent),
        (status = 400, description = "Invalid name or weight"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn add_participant(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
    request: web::Json<AddParticipantRequest>,
) -> Result<HttpResponse> {
    match event_service
        .add_participant(&path, request.into_inner())
        .await
    {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/events/{id}/participants/{participant_id}",
    tag = "participant",
    params(
        ("id" = String, Path, description = "Event id"),
        ("participant_id" = String, Path, description = "Participant id")
    ),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participant updated", body = SplitEvent),
        (status = 400, description = "Invalid name or weight"),
        (status = 404, description = "Event or participant not found")
    )
)]
pub async fn update_participant(
    event_service: web::Data<EventService>,
    path: web::Path<(String, String)>,
    request: web::Json<UpdateParticipantRequest>,
) -> Result<HttpResponse> {
    let (id, participant_id) = path.into_inner();
    match event_service
        .update_participant(&id, &participant_id, request.into_inner())
        .await
    {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/events/{id}/participants/{participant_id}",
    tag = "participant",
    params(
        ("id" = String, Path, description = "Event id"),
        ("participant_id" = String, Path, description = "Participant id")
    ),
    responses(
        (status = 200, description = "Participant removed", body = SplitEvent),
        (status = 404, description = "Event or participant not found")
    )
)]
pub async fn remove_participant(
    event_service: web::Data<EventService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (id, participant_id) = path.into_inner();
    match event_service.remove_participant(&id, &participant_id).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{id}/participants/reorder",
    tag = "participant",
    params(("id" = String, Path, description = "Event id")),
    request_body = ReorderParticipantsRequest,
    responses(
        (status = 200, description = "Participants reordered", body = SplitEvent),
        (status = 400, description = "Index out of range"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn reorder_participants(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
    request: web::Json<ReorderParticipantsRequest>,
) -> Result<HttpResponse> {
    match event_service
        .reorder_participants(&path, request.into_inner())
        .await
    {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn event_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(list_events))
            .route("", web::post().to(create_event))
            .route("/summary", web::get().to(get_summary))
            .route("/recalculate", web::post().to(recalculate_all))
            .route("/import", web::post().to(import_event))
            .route("/{id}", web::get().to(get_event))
            .route("/{id}", web::put().to(update_event))
            .route("/{id}", web::delete().to(delete_event))
            .route("/{id}/duplicate", web::post().to(duplicate_event))
            .route("/{id}/calculate", web::post().to(calculate_event))
            .route("/{id}/share", web::get().to(share_event))
            .route("/{id}/participants", web::post().to(add_participant))
            .route(
                "/{id}/participants/reorder",
                web::post().to(reorder_participants),
            )
            .route(
                "/{id}/participants/{participant_id}",
                web::put().to(update_participant),
            )
            .route(
                "/{id}/participants/{participant_id}",
                web::delete().to(remove_participant),
            ),
    );
}
