// src/handlers/members.rs

// Cadastros que este módulo só lê: pessoal e centros.
// A escrita acontece em outro sistema; aqui eles alimentam o assistente
// (escolher centro, selecionar staff/técnicos) e o quadro.

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
    models::scheduling::{Center, Member, MemberRole},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListMembersQuery {
    pub role: Option<MemberRole>,
    pub center_id: Option<Uuid>,
}

// GET /api/members
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    params(ListMembersQuery),
    responses(
        (status = 200, description = "Pessoal, filtrado por papel e/ou centro", body = Vec<Member>)
    )
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    Query(query): Query<ListMembersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let members = app_state
        .member_repo
        .list(&app_state.db_pool, query.role, query.center_id)
        .await?;

    Ok(Json(members))
}

// GET /api/centers
#[utoipa::path(
    get,
    path = "/api/centers",
    tag = "Members",
    responses(
        (status = 200, description = "Centros de manutenção disponíveis", body = Vec<Center>)
    )
)]
pub async fn list_centers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let centers = app_state.center_repo.list_all(&app_state.db_pool).await?;

    Ok(Json(centers))
}
