// src/db/assignment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::scheduling::{AssignmentDetailRow, ShiftAssignment},
};

#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Vincula um membro a vários turnos numa única query.
    // A chave composta (membro, turno) faz o ON CONFLICT pular o que já
    // existe, então a chamada é idempotente e devolve só o que criou de fato.
    pub async fn create_for_shifts<'e, E>(
        &self,
        executor: E,
        system_user_id: Uuid,
        workshift_ids: &[Uuid],
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO shift_assignments (system_user_id, workshift_id)
            SELECT $1, t.shift_id
            FROM UNNEST($2::uuid[]) AS t(shift_id)
            ON CONFLICT (system_user_id, workshift_id) DO NOTHING
            "#,
        )
        .bind(system_user_id)
        .bind(workshift_ids)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    pub async fn list_by_member<'e, E>(
        &self,
        executor: E,
        system_user_id: Uuid,
    ) -> Result<Vec<ShiftAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignments = sqlx::query_as::<_, ShiftAssignment>(
            r#"
            SELECT id, system_user_id, workshift_id, created_at
            FROM shift_assignments
            WHERE system_user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(system_user_id)
        .fetch_all(executor)
        .await?;

        Ok(assignments)
    }

    // Vínculos dos turnos informados, já resolvidos com membro e turno.
    // É a matéria-prima do agregador de calendário.
    pub async fn list_detailed_for_shifts<'e, E>(
        &self,
        executor: E,
        workshift_ids: &[Uuid],
    ) -> Result<Vec<AssignmentDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, AssignmentDetailRow>(
            r#"
            SELECT
                a.id,
                a.system_user_id,
                m.name AS member_name,
                m.role,
                a.workshift_id,
                w.shift_code,
                w.shift_date,
                w.start_time,
                w.end_time
            FROM shift_assignments a
            JOIN members m ON m.system_user_id = a.system_user_id
            JOIN work_shifts w ON w.id = a.workshift_id
            WHERE a.workshift_id = ANY($1)
            ORDER BY w.shift_date, w.start_time, m.name
            "#,
        )
        .bind(workshift_ids)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    // Re-aponta um vínculo existente para outro turno.
    pub async fn retarget<'e, E>(
        &self,
        executor: E,
        assignment_id: Uuid,
        new_workshift_id: Uuid,
    ) -> Result<ShiftAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, ShiftAssignment>(
            r#"
            UPDATE shift_assignments
            SET workshift_id = $2
            WHERE id = $1
            RETURNING id, system_user_id, workshift_id, created_at
            "#,
        )
        .bind(assignment_id)
        .bind(new_workshift_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateAssignment,
            _ => AppError::from(e),
        })?;

        updated.ok_or_else(|| AppError::ResourceNotFound("Vínculo".to_string()))
    }

    pub async fn delete<'e, E>(&self, executor: E, assignment_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM shift_assignments WHERE id = $1")
            .bind(assignment_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Vínculo".to_string()));
        }
        Ok(())
    }
}
