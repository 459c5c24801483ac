// src/db/center_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::scheduling::Center};

#[derive(Clone)]
pub struct CenterRepository {
    pool: PgPool,
}

impl CenterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Center>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let centers = sqlx::query_as::<_, Center>(
            r#"
            SELECT id, name
            FROM centers
            ORDER BY name
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(centers)
    }

    pub async fn get<'e, E>(&self, executor: E, center_id: uuid::Uuid) -> Result<Option<Center>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let center = sqlx::query_as::<_, Center>(
            r#"
            SELECT id, name
            FROM centers
            WHERE id = $1
            "#,
        )
        .bind(center_id)
        .fetch_optional(executor)
        .await?;

        Ok(center)
    }
}

