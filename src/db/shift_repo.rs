// src/db/shift_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::scheduling::WorkShift};

#[derive(Clone)]
pub struct WorkShiftRepository {
    pool: PgPool,
}

impl WorkShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Criação em lote: um turno por data, numa única ida ao banco.
    // O UNNEST pareia código e data posição a posição.
    pub async fn create_bulk<'e, E>(
        &self,
        executor: E,
        center_id: Uuid,
        codes: &[String],
        dates: &[NaiveDate],
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Vec<WorkShift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shifts = sqlx::query_as::<_, WorkShift>(
            r#"
            INSERT INTO work_shifts (shift_code, shift_date, start_time, end_time, center_id)
            SELECT t.code, t.day, $3, $4, $5
            FROM UNNEST($1::text[], $2::date[]) AS t(code, day)
            RETURNING id, shift_code, shift_date, start_time, end_time, status, center_id
            "#,
        )
        .bind(codes)
        .bind(dates)
        .bind(start_time)
        .bind(end_time)
        .bind(center_id)
        .fetch_all(executor)
        .await?;

        Ok(shifts)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        center_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<WorkShift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shifts = sqlx::query_as::<_, WorkShift>(
            r#"
            SELECT id, shift_code, shift_date, start_time, end_time, status, center_id
            FROM work_shifts
            WHERE ($1::uuid IS NULL OR center_id = $1)
              AND ($2::date IS NULL OR shift_date >= $2)
              AND ($3::date IS NULL OR shift_date <= $3)
            ORDER BY shift_date, start_time
            "#,
        )
        .bind(center_id)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;

        Ok(shifts)
    }

    pub async fn list_by_ids<'e, E>(
        &self,
        executor: E,
        shift_ids: &[Uuid],
    ) -> Result<Vec<WorkShift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shifts = sqlx::query_as::<_, WorkShift>(
            r#"
            SELECT id, shift_code, shift_date, start_time, end_time, status, center_id
            FROM work_shifts
            WHERE id = ANY($1)
            ORDER BY shift_date, start_time
            "#,
        )
        .bind(shift_ids)
        .fetch_all(executor)
        .await?;

        Ok(shifts)
    }

    // Remoção explícita de um turno (os vínculos caem junto via CASCADE)
    pub async fn delete<'e, E>(&self, executor: E, shift_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM work_shifts WHERE id = $1")
            .bind(shift_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Turno".to_string()));
        }
        Ok(())
    }
}
