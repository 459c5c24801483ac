// src/services/assignment_service.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AssignmentRepository,
    models::scheduling::{MemberAssignmentOutcome, ShiftAssignment},
};

#[derive(Clone)]
pub struct AssignmentService {
    repo: AssignmentRepository,
}

impl AssignmentService {
    pub fn new(repo: AssignmentRepository) -> Self {
        Self { repo }
    }

    pub async fn assign_member<'e, E>(
        &self,
        executor: E,
        system_user_id: Uuid,
        workshift_ids: &[Uuid],
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if workshift_ids.is_empty() {
            let mut errors = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("length");
            err.message = Some("Informe pelo menos um turno.".into());
            errors.add("workshiftIds", err);
            return Err(errors.into());
        }

        self.repo
            .create_for_shifts(executor, system_user_id, workshift_ids)
            .await
    }

    // Vincula a coorte inteira: todo membro selecionado entra em todo turno
    // (produto cartesiano). O fan-out é uma chamada por membro, SEM rollback:
    // quem já entrou fica, e o resultado diz exatamente quem falhou para o
    // caller reenviar só o resto.
    pub async fn assign_cohort(
        &self,
        pool: &PgPool,
        member_ids: &[Uuid],
        workshift_ids: &[Uuid],
    ) -> Result<Vec<MemberAssignmentOutcome>, AppError> {
        let mut outcomes = Vec::with_capacity(member_ids.len());

        for member_id in member_ids {
            match self
                .repo
                .create_for_shifts(pool, *member_id, workshift_ids)
                .await
            {
                Ok(created) => outcomes.push(MemberAssignmentOutcome {
                    system_user_id: *member_id,
                    bindings_created: created,
                    error: None,
                }),
                Err(e) => {
                    tracing::error!("Falha ao vincular o membro {}: {}", member_id, e);
                    outcomes.push(MemberAssignmentOutcome {
                        system_user_id: *member_id,
                        bindings_created: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(outcomes)
    }

    pub async fn list_by_member<'e, E>(
        &self,
        executor: E,
        system_user_id: Uuid,
    ) -> Result<Vec<ShiftAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_by_member(executor, system_user_id).await
    }

    pub async fn retarget<'e, E>(
        &self,
        executor: E,
        assignment_id: Uuid,
        new_workshift_id: Uuid,
    ) -> Result<ShiftAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .retarget(executor, assignment_id, new_workshift_id)
            .await
    }

    pub async fn remove<'e, E>(&self, executor: E, assignment_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, assignment_id).await
    }
}
