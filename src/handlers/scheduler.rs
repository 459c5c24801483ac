// src/handlers/scheduler.rs

// Quadro interativo: os gestos de arrastar/redimensionar/criar do calendário
// chegam aqui já como comandos explícitos. A validação (intervalo bem
// formado, nada no passado, sem sobreposição para o mesmo técnico) acontece
// no conjunto de eventos do quadro, e uma rejeição não toca nada.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::scheduler::{EventFilter, EventStatus, ScheduleCommand, ScheduledEvent},
};

// Título padrão do "arrastar técnico para a célula livre"
const DEFAULT_EVENT_TITLE: &str = "Novo atendimento";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenBoardPayload {
    // A verdade já buscada pelo chamador (turnos/vagas viram eventos lá fora);
    // o quadro nasce vazio se nada for semeado.
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardOpened {
    pub id: Uuid,
    pub events: Vec<ScheduledEvent>,
}

// POST /api/scheduler/boards
#[utoipa::path(
    post,
    path = "/api/scheduler/boards",
    tag = "Scheduler",
    request_body = OpenBoardPayload,
    responses(
        (status = 201, description = "Quadro aberto com o conjunto de trabalho semeado", body = BoardOpened)
    )
)]
pub async fn open_board(
    State(app_state): State<AppState>,
    Json(payload): Json<OpenBoardPayload>,
) -> Result<impl IntoResponse, AppError> {
    let board = app_state.scheduler_service.open_board(payload.events)?;

    Ok((
        StatusCode::CREATED,
        Json(BoardOpened {
            id: board.id,
            events: board.events().to_vec(),
        }),
    ))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    pub technician_id: Option<Uuid>,
    #[param(example = "óleo")]
    pub search: Option<String>,
    // Multi-seleção separada por vírgula: "scheduled,in-progress"
    #[param(example = "scheduled,completed")]
    pub status: Option<String>,
}

impl ListEventsQuery {
    fn to_filter(&self) -> Result<EventFilter, AppError> {
        let statuses = match &self.status {
            None => None,
            Some(raw) => {
                let mut parsed = Vec::new();
                for piece in raw.split(',').filter(|p| !p.trim().is_empty()) {
                    let status: EventStatus = piece.parse().map_err(|msg: String| {
                        let mut errors = validator::ValidationErrors::new();
                        let mut err = validator::ValidationError::new("status");
                        err.message = Some(msg.into());
                        errors.add("status", err);
                        AppError::ValidationError(errors)
                    })?;
                    parsed.push(status);
                }
                if parsed.is_empty() { None } else { Some(parsed) }
            }
        };

        Ok(EventFilter {
            technician_id: self.technician_id,
            search: self.search.clone(),
            statuses,
        })
    }
}

// GET /api/scheduler/boards/{board_id}/events
#[utoipa::path(
    get,
    path = "/api/scheduler/boards/{board_id}/events",
    tag = "Scheduler",
    params(("board_id" = Uuid, Path, description = "ID do quadro"), ListEventsQuery),
    responses(
        (status = 200, description = "Projeção filtrada (o conjunto não é mutado)", body = Vec<ScheduledEvent>),
        (status = 404, description = "Quadro não encontrado")
    )
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Query(query): Query<ListEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.to_filter()?;
    let events = app_state.scheduler_service.list_events(board_id, &filter)?;
    Ok(Json(events))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    pub technician_id: Uuid,

    #[schema(example = "Revisão preventiva - OS 1042")]
    pub title: Option<String>,

    #[schema(example = "2025-03-03T09:00:00")]
    pub start: NaiveDateTime,

    // Ausente no arrastar-e-soltar: o evento nasce com 1 hora
    #[schema(example = "2025-03-03T10:00:00")]
    pub end: Option<NaiveDateTime>,
}

// POST /api/scheduler/boards/{board_id}/events
#[utoipa::path(
    post,
    path = "/api/scheduler/boards/{board_id}/events",
    tag = "Scheduler",
    params(("board_id" = Uuid, Path, description = "ID do quadro")),
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Evento criado na célula livre", body = ScheduledEvent),
        (status = 409, description = "Sobreposição com outro evento do técnico"),
        (status = 422, description = "Célula no passado")
    )
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.scheduler_service.apply(
        board_id,
        ScheduleCommand::Create {
            technician_id: payload.technician_id,
            title: payload
                .title
                .unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string()),
            start: payload.start,
            end: payload.end,
        },
    )?;

    Ok((StatusCode::CREATED, Json(event)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResizeEventPayload {
    #[schema(example = "2025-03-03T11:00:00")]
    pub new_end: NaiveDateTime,
}

// PATCH /api/scheduler/boards/{board_id}/events/{event_id}/resize
#[utoipa::path(
    patch,
    path = "/api/scheduler/boards/{board_id}/events/{event_id}/resize",
    tag = "Scheduler",
    params(
        ("board_id" = Uuid, Path, description = "ID do quadro"),
        ("event_id" = Uuid, Path, description = "ID do evento")
    ),
    request_body = ResizeEventPayload,
    responses(
        (status = 200, description = "Fim do evento esticado/encolhido", body = ScheduledEvent),
        (status = 400, description = "O novo fim inverteria o intervalo"),
        (status = 409, description = "Sobreposição com outro evento do técnico")
    )
)]
pub async fn resize_event(
    State(app_state): State<AppState>,
    Path((board_id, event_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ResizeEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.scheduler_service.apply(
        board_id,
        ScheduleCommand::Resize {
            event_id,
            new_end: payload.new_end,
        },
    )?;

    Ok(Json(event))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveEventPayload {
    #[schema(example = "2025-03-04T14:00:00")]
    pub new_start: NaiveDateTime,

    #[schema(example = "2025-03-04T15:00:00")]
    pub new_end: NaiveDateTime,

    // Soltar na linha de outro técnico re-atribui o evento
    pub new_technician_id: Option<Uuid>,
}

// PATCH /api/scheduler/boards/{board_id}/events/{event_id}/move
#[utoipa::path(
    patch,
    path = "/api/scheduler/boards/{board_id}/events/{event_id}/move",
    tag = "Scheduler",
    params(
        ("board_id" = Uuid, Path, description = "ID do quadro"),
        ("event_id" = Uuid, Path, description = "ID do evento")
    ),
    request_body = MoveEventPayload,
    responses(
        (status = 200, description = "Evento movido (e opcionalmente re-atribuído)", body = ScheduledEvent),
        (status = 409, description = "Sobreposição na agenda do técnico de destino"),
        (status = 422, description = "O novo início está no passado")
    )
)]
pub async fn move_event(
    State(app_state): State<AppState>,
    Path((board_id, event_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MoveEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.scheduler_service.apply(
        board_id,
        ScheduleCommand::Move {
            event_id,
            new_start: payload.new_start,
            new_end: payload.new_end,
            new_technician_id: payload.new_technician_id,
        },
    )?;

    Ok(Json(event))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusPayload {
    pub new_status: EventStatus,

    // Autenticação está fora do escopo deste serviço: o papel do ator chega
    // declarado pelo chamador e é aplicado como regra de domínio.
    #[serde(default)]
    pub actor_is_admin: bool,
}

// PATCH /api/scheduler/boards/{board_id}/events/{event_id}/status
#[utoipa::path(
    patch,
    path = "/api/scheduler/boards/{board_id}/events/{event_id}/status",
    tag = "Scheduler",
    params(
        ("board_id" = Uuid, Path, description = "ID do quadro"),
        ("event_id" = Uuid, Path, description = "ID do evento")
    ),
    request_body = ChangeStatusPayload,
    responses(
        (status = 200, description = "Status alterado sem tocar o intervalo", body = ScheduledEvent),
        (status = 403, description = "Somente administradores alteram status")
    )
)]
pub async fn change_event_status(
    State(app_state): State<AppState>,
    Path((board_id, event_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ChangeStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.scheduler_service.apply(
        board_id,
        ScheduleCommand::ChangeStatus {
            event_id,
            new_status: payload.new_status,
            actor_is_admin: payload.actor_is_admin,
        },
    )?;

    Ok(Json(event))
}

// DELETE /api/scheduler/boards/{board_id}
#[utoipa::path(
    delete,
    path = "/api/scheduler/boards/{board_id}",
    tag = "Scheduler",
    params(("board_id" = Uuid, Path, description = "ID do quadro")),
    responses(
        (status = 204, description = "Quadro fechado; conjunto de trabalho descartado"),
        (status = 404, description = "Quadro não encontrado")
    )
)]
pub async fn close_board(
    State(app_state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.scheduler_service.close_board(board_id)?;
    Ok(StatusCode::NO_CONTENT)
}
