// src/handlers/wizard.rs

// Assistente de provisionamento (4 estágios). Cada estágio tem seu próprio
// submit; o serviço garante que o submit só vale para a etapa atual e que um
// resultado que chegue depois do fechamento seja descartado.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::scheduling::hhmm,
    services::wizard_service::{AssignmentStageResult, WizardSnapshot},
};

// POST /api/wizard
#[utoipa::path(
    post,
    path = "/api/wizard",
    tag = "Wizard",
    responses(
        (status = 201, description = "Assistente aberto, sempre no estágio 1 com seleções vazias", body = WizardSnapshot)
    )
)]
pub async fn open_wizard(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state.wizard_service.open()?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

// GET /api/wizard/{wizard_id}
#[utoipa::path(
    get,
    path = "/api/wizard/{wizard_id}",
    tag = "Wizard",
    params(("wizard_id" = Uuid, Path, description = "ID do assistente")),
    responses(
        (status = 200, description = "Progresso atual", body = WizardSnapshot),
        (status = 404, description = "Assistente não encontrado")
    )
)]
pub async fn get_wizard(
    State(app_state): State<AppState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state.wizard_service.get(wizard_id)?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardShiftsPayload {
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

impl WizardShiftsPayload {
    fn validate_window(&self) -> Result<(), AppError> {
        if self.start_time >= self.end_time {
            return Err(AppError::InvalidTimeWindow);
        }
        Ok(())
    }
}

// POST /api/wizard/{wizard_id}/shifts  (estágio 1)
#[utoipa::path(
    post,
    path = "/api/wizard/{wizard_id}/shifts",
    tag = "Wizard",
    params(("wizard_id" = Uuid, Path, description = "ID do assistente")),
    request_body = WizardShiftsPayload,
    responses(
        (status = 200, description = "Turnos provisionados; ids em cache; estágio avança para 2", body = WizardSnapshot),
        (status = 409, description = "Submit fora da etapa atual"),
        (status = 410, description = "Assistente fechado durante a chamada")
    )
)]
pub async fn submit_shifts(
    State(app_state): State<AppState>,
    Path(wizard_id): Path<Uuid>,
    Json(payload): Json<WizardShiftsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.validate_window()?;

    let snapshot = app_state
        .wizard_service
        .submit_shifts(
            &app_state.db_pool,
            wizard_id,
            payload.center_id,
            &payload.dates,
            payload.start_time,
            payload.end_time,
        )
        .await?;

    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardAssignmentsPayload {
    #[serde(default)]
    pub staff_ids: Vec<Uuid>,

    #[serde(default)]
    pub technician_ids: Vec<Uuid>,
}

// POST /api/wizard/{wizard_id}/assignments  (estágio 2)
#[utoipa::path(
    post,
    path = "/api/wizard/{wizard_id}/assignments",
    tag = "Wizard",
    params(("wizard_id" = Uuid, Path, description = "ID do assistente")),
    request_body = WizardAssignmentsPayload,
    responses(
        (status = 200, description = "Cada membro vinculado a todos os turnos em cache; só avança se TODOS entraram", body = AssignmentStageResult),
        (status = 400, description = "Nenhum membro selecionado"),
        (status = 409, description = "Submit fora da etapa atual")
    )
)]
pub async fn submit_assignments(
    State(app_state): State<AppState>,
    Path(wizard_id): Path<Uuid>,
    Json(payload): Json<WizardAssignmentsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state
        .wizard_service
        .submit_assignments(
            &app_state.db_pool,
            wizard_id,
            &payload.staff_ids,
            &payload.technician_ids,
        )
        .await?;

    Ok(Json(result))
}

fn default_capacity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardSlotsPayload {
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

// POST /api/wizard/{wizard_id}/slots  (estágio 3)
#[utoipa::path(
    post,
    path = "/api/wizard/{wizard_id}/slots",
    tag = "Wizard",
    params(("wizard_id" = Uuid, Path, description = "ID do assistente")),
    request_body = WizardSlotsPayload,
    responses(
        (status = 200, description = "Vagas geradas sobre as datas dos turnos criados; assistente concluído", body = WizardSnapshot),
        (status = 400, description = "Janela invertida, duração não positiva ou centros misturados"),
        (status = 409, description = "Submit fora da etapa atual")
    )
)]
pub async fn submit_slots(
    State(app_state): State<AppState>,
    Path(wizard_id): Path<Uuid>,
    Json(payload): Json<WizardSlotsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let snapshot = app_state
        .wizard_service
        .submit_slots(
            &app_state.db_pool,
            wizard_id,
            payload.start_time,
            payload.end_time,
            payload.duration_minutes,
            payload.capacity,
        )
        .await?;

    Ok(Json(snapshot))
}

// POST /api/wizard/{wizard_id}/back
#[utoipa::path(
    post,
    path = "/api/wizard/{wizard_id}/back",
    tag = "Wizard",
    params(("wizard_id" = Uuid, Path, description = "ID do assistente")),
    responses(
        (status = 200, description = "Um estágio para trás; nada já criado é desfeito", body = WizardSnapshot),
        (status = 409, description = "Já está no primeiro estágio")
    )
)]
pub async fn back(
    State(app_state): State<AppState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state.wizard_service.back(wizard_id)?;
    Ok(Json(snapshot))
}

// DELETE /api/wizard/{wizard_id}
#[utoipa::path(
    delete,
    path = "/api/wizard/{wizard_id}",
    tag = "Wizard",
    params(("wizard_id" = Uuid, Path, description = "ID do assistente")),
    responses(
        (status = 204, description = "Assistente fechado; estado local descartado"),
        (status = 404, description = "Assistente não encontrado")
    )
)]
pub async fn cancel(
    State(app_state): State<AppState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.wizard_service.cancel(wizard_id)?;
    Ok(StatusCode::NO_CONTENT)
}
