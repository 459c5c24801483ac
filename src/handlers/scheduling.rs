// src/handlers/scheduling.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::scheduling::{
        hhmm, MemberAssignmentOutcome, ShiftAssignment, Slot, SlotGenerationSummary, WorkShift,
    },
};

// =============================================================================
//  1. TURNOS (PROVISIONAMENTO EM LOTE)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftsBulkPayload {
    pub center_id: Uuid,

    #[validate(length(min = 1, message = "Selecione pelo menos uma data."))]
    #[schema(example = json!(["2025-03-03", "2025-03-04"]))]
    pub dates: Vec<NaiveDate>,

    #[serde(with = "hhmm")]
    #[schema(example = "08:00")]
    pub start_time: NaiveTime,

    #[serde(with = "hhmm")]
    #[schema(example = "12:00")]
    pub end_time: NaiveTime,
}

impl CreateShiftsBulkPayload {
    // Regra de consistência entre campos: a janela não pode estar invertida
    fn validate_window(&self) -> Result<(), AppError> {
        if self.start_time >= self.end_time {
            return Err(AppError::InvalidTimeWindow);
        }
        Ok(())
    }
}

// POST /api/scheduling/shifts/bulk
#[utoipa::path(
    post,
    path = "/api/scheduling/shifts/bulk",
    tag = "Scheduling",
    request_body = CreateShiftsBulkPayload,
    responses(
        (status = 201, description = "Um turno criado por data", body = Vec<WorkShift>),
        (status = 400, description = "Datas vazias ou janela invertida"),
        (status = 404, description = "Centro não encontrado")
    )
)]
pub async fn create_work_shifts_bulk(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateShiftsBulkPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.validate_window()?;

    let shifts = app_state
        .provisioning_service
        .provision(
            &app_state.db_pool,
            payload.center_id,
            &payload.dates,
            payload.start_time,
            payload.end_time,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(shifts)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListShiftsQuery {
    pub center_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// GET /api/scheduling/shifts
#[utoipa::path(
    get,
    path = "/api/scheduling/shifts",
    tag = "Scheduling",
    params(ListShiftsQuery),
    responses(
        (status = 200, description = "Turnos do período", body = Vec<WorkShift>)
    )
)]
pub async fn list_work_shifts(
    State(app_state): State<AppState>,
    Query(query): Query<ListShiftsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let shifts = app_state
        .shift_repo
        .list(&app_state.db_pool, query.center_id, query.from, query.to)
        .await?;

    Ok(Json(shifts))
}

// DELETE /api/scheduling/shifts/{shift_id}
#[utoipa::path(
    delete,
    path = "/api/scheduling/shifts/{shift_id}",
    tag = "Scheduling",
    params(("shift_id" = Uuid, Path, description = "ID do turno")),
    responses(
        (status = 204, description = "Turno removido (vínculos caem junto)"),
        (status = 404, description = "Turno não encontrado")
    )
)]
pub async fn delete_work_shift(
    State(app_state): State<AppState>,
    Path(shift_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .shift_repo
        .delete(&app_state.db_pool, shift_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  2. VÍNCULOS (MEMBRO <-> TURNO)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignMemberPayload {
    pub system_user_id: Uuid,

    #[validate(length(min = 1, message = "Informe pelo menos um turno."))]
    pub workshift_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentCreatedResponse {
    #[schema(example = 3)]
    pub bindings_created: i64,
}

// POST /api/scheduling/assignments
#[utoipa::path(
    post,
    path = "/api/scheduling/assignments",
    tag = "Scheduling",
    request_body = AssignMemberPayload,
    responses(
        (status = 201, description = "Membro vinculado aos turnos (duplicatas são puladas)", body = AssignmentCreatedResponse)
    )
)]
pub async fn assign_member_to_shifts(
    State(app_state): State<AppState>,
    Json(payload): Json<AssignMemberPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state
        .assignment_service
        .assign_member(
            &app_state.db_pool,
            payload.system_user_id,
            &payload.workshift_ids,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentCreatedResponse {
            bindings_created: created,
        }),
    ))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignCohortPayload {
    #[validate(length(min = 1, message = "Informe pelo menos um membro."))]
    pub member_ids: Vec<Uuid>,

    #[validate(length(min = 1, message = "Informe pelo menos um turno."))]
    pub workshift_ids: Vec<Uuid>,
}

// POST /api/scheduling/assignments/cohort
#[utoipa::path(
    post,
    path = "/api/scheduling/assignments/cohort",
    tag = "Scheduling",
    request_body = AssignCohortPayload,
    responses(
        (status = 200, description = "Produto cartesiano membros x turnos, com resultado por membro (sem rollback)", body = Vec<MemberAssignmentOutcome>)
    )
)]
pub async fn assign_cohort(
    State(app_state): State<AppState>,
    Json(payload): Json<AssignCohortPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcomes = app_state
        .assignment_service
        .assign_cohort(&app_state.db_pool, &payload.member_ids, &payload.workshift_ids)
        .await?;

    Ok(Json(outcomes))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListAssignmentsQuery {
    pub system_user_id: Uuid,
}

// GET /api/scheduling/assignments
#[utoipa::path(
    get,
    path = "/api/scheduling/assignments",
    tag = "Scheduling",
    params(ListAssignmentsQuery),
    responses(
        (status = 200, description = "Vínculos do membro", body = Vec<ShiftAssignment>)
    )
)]
pub async fn list_assignments_by_member(
    State(app_state): State<AppState>,
    Query(query): Query<ListAssignmentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let assignments = app_state
        .assignment_service
        .list_by_member(&app_state.db_pool, query.system_user_id)
        .await?;

    Ok(Json(assignments))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetargetAssignmentPayload {
    pub workshift_id: Uuid,
}

// PATCH /api/scheduling/assignments/{assignment_id}
#[utoipa::path(
    patch,
    path = "/api/scheduling/assignments/{assignment_id}",
    tag = "Scheduling",
    params(("assignment_id" = Uuid, Path, description = "ID do vínculo")),
    request_body = RetargetAssignmentPayload,
    responses(
        (status = 200, description = "Vínculo re-apontado para outro turno", body = ShiftAssignment),
        (status = 404, description = "Vínculo não encontrado"),
        (status = 409, description = "O membro já está no turno de destino")
    )
)]
pub async fn retarget_assignment(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<Uuid>,
    Json(payload): Json<RetargetAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = app_state
        .assignment_service
        .retarget(&app_state.db_pool, assignment_id, payload.workshift_id)
        .await?;

    Ok(Json(assignment))
}

// DELETE /api/scheduling/assignments/{assignment_id}
#[utoipa::path(
    delete,
    path = "/api/scheduling/assignments/{assignment_id}",
    tag = "Scheduling",
    params(("assignment_id" = Uuid, Path, description = "ID do vínculo")),
    responses(
        (status = 204, description = "Vínculo removido"),
        (status = 404, description = "Vínculo não encontrado")
    )
)]
pub async fn delete_assignment(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .assignment_service
        .remove(&app_state.db_pool, assignment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  3. VAGAS (GERAÇÃO EM LOTE)
// =============================================================================

fn default_capacity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlotsPayload {
    #[validate(length(min = 1, message = "Informe pelo menos um centro."))]
    pub center_ids: Vec<Uuid>,

    #[validate(length(min = 1, message = "Informe pelo menos uma data."))]
    #[schema(example = json!(["2025-03-03", "2025-03-04"]))]
    pub dates: Vec<NaiveDate>,

    #[serde(with = "hhmm")]
    #[schema(example = "08:00")]
    pub start_time: NaiveTime,

    #[serde(with = "hhmm")]
    #[schema(example = "12:00")]
    pub end_time: NaiveTime,

    #[validate(range(min = 1, message = "A duração deve ser positiva."))]
    #[schema(example = 60)]
    pub duration_minutes: i32,

    #[serde(default = "default_capacity")]
    #[schema(example = 1)]
    pub capacity: i32,
}

// POST /api/scheduling/slots/generate
#[utoipa::path(
    post,
    path = "/api/scheduling/slots/generate",
    tag = "Scheduling",
    request_body = GenerateSlotsPayload,
    responses(
        (status = 200, description = "Janela expandida em vagas; repetir a chamada só acumula skipped", body = SlotGenerationSummary),
        (status = 400, description = "Janela invertida ou duração não positiva")
    )
)]
pub async fn generate_slots(
    State(app_state): State<AppState>,
    Json(payload): Json<GenerateSlotsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let summary = app_state
        .slot_service
        .generate(
            &app_state.db_pool,
            &payload.center_ids,
            &payload.dates,
            payload.start_time,
            payload.end_time,
            payload.duration_minutes,
            payload.capacity,
        )
        .await?;

    Ok(Json(summary))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListSlotsQuery {
    pub center_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

// GET /api/scheduling/slots
#[utoipa::path(
    get,
    path = "/api/scheduling/slots",
    tag = "Scheduling",
    params(ListSlotsQuery),
    responses(
        (status = 200, description = "Vagas geradas", body = Vec<Slot>)
    )
)]
pub async fn list_slots(
    State(app_state): State<AppState>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = app_state
        .slot_service
        .list(&app_state.db_pool, query.center_id, query.date)
        .await?;

    Ok(Json(slots))
}
