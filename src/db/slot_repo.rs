// src/db/slot_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::scheduling::Slot};

// Uma vaga pronta para inserir, já expandida pelo gerador
#[derive(Debug, Clone)]
pub struct SlotRow {
    pub center_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Clone)]
pub struct SlotRepository {
    pool: PgPool,
}

impl SlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Insere o lote inteiro numa query só. A chave natural
    // (centro, data, início) descarta no banco o que já existia:
    // o retorno é quantas vagas REALMENTE entraram.
    pub async fn insert_batch<'e, E>(
        &self,
        executor: E,
        rows: &[SlotRow],
        capacity: i32,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if rows.is_empty() {
            return Ok(0);
        }

        let centers: Vec<Uuid> = rows.iter().map(|r| r.center_id).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.slot_date).collect();
        let starts: Vec<NaiveTime> = rows.iter().map(|r| r.start_time).collect();
        let ends: Vec<NaiveTime> = rows.iter().map(|r| r.end_time).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO slots (center_id, slot_date, start_time, end_time, capacity)
            SELECT t.center, t.day, t.starts, t.ends, $5
            FROM UNNEST($1::uuid[], $2::date[], $3::time[], $4::time[])
                AS t(center, day, starts, ends)
            ON CONFLICT (center_id, slot_date, start_time) DO NOTHING
            "#,
        )
        .bind(&centers)
        .bind(&dates)
        .bind(&starts)
        .bind(&ends)
        .bind(capacity)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        center_id: Option<Uuid>,
        slot_date: Option<NaiveDate>,
    ) -> Result<Vec<Slot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slots = sqlx::query_as::<_, Slot>(
            r#"
            SELECT id, slot_date, start_time, end_time, capacity, booked_count, center_id
            FROM slots
            WHERE ($1::uuid IS NULL OR center_id = $1)
              AND ($2::date IS NULL OR slot_date = $2)
            ORDER BY slot_date, start_time
            "#,
        )
        .bind(center_id)
        .bind(slot_date)
        .fetch_all(executor)
        .await?;

        Ok(slots)
    }
}
