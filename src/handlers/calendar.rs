// src/handlers/calendar.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::calendar::{AttendanceEntry, CalendarMonthView},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    pub center_id: Uuid,
    #[param(example = 2025)]
    pub year: i32,
    #[param(example = 3)]
    pub month: u32,
}

// GET /api/calendar/month
#[utoipa::path(
    get,
    path = "/api/calendar/month",
    tag = "Calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Grade mensal (múltiplo de 7 células) com os vínculos de cada dia", body = CalendarMonthView),
        (status = 400, description = "Mês inválido")
    )
)]
pub async fn month_view(
    State(app_state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state
        .calendar_service
        .month_view(&app_state.db_pool, query.center_id, query.year, query.month)
        .await?;

    Ok(Json(view))
}

// GET /api/calendar/attendance
#[utoipa::path(
    get,
    path = "/api/calendar/attendance",
    tag = "Calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Totais Seg..Dom de vínculos manhã vs. noite", body = Vec<AttendanceEntry>),
        (status = 400, description = "Mês inválido")
    )
)]
pub async fn attendance(
    State(app_state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let chart = app_state
        .calendar_service
        .attendance(&app_state.db_pool, query.center_id, query.year, query.month)
        .await?;

    Ok(Json(chart))
}
