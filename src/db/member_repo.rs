// src/db/member_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::scheduling::{Member, MemberRole},
};

#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Lista o pessoal, com filtros opcionais de papel e centro.
    // Os binds NULL desligam o filtro correspondente direto no SQL.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        role: Option<MemberRole>,
        center_id: Option<Uuid>,
    ) -> Result<Vec<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT system_user_id, name, role, center_id
            FROM members
            WHERE ($1::member_role IS NULL OR role = $1)
              AND ($2::uuid IS NULL OR center_id = $2)
            ORDER BY name
            "#,
        )
        .bind(role)
        .bind(center_id)
        .fetch_all(executor)
        .await?;

        Ok(members)
    }

    pub async fn list_by_ids<'e, E>(
        &self,
        executor: E,
        member_ids: &[Uuid],
    ) -> Result<Vec<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT system_user_id, name, role, center_id
            FROM members
            WHERE system_user_id = ANY($1)
            "#,
        )
        .bind(member_ids)
        .fetch_all(executor)
        .await?;

        Ok(members)
    }
}
