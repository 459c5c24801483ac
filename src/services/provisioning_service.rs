// src/services/provisioning_service.rs

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CenterRepository, WorkShiftRepository},
    models::scheduling::WorkShift,
};

#[derive(Clone)]
pub struct ShiftProvisioningService {
    shift_repo: WorkShiftRepository,
    center_repo: CenterRepository,
}

impl ShiftProvisioningService {
    pub fn new(shift_repo: WorkShiftRepository, center_repo: CenterRepository) -> Self {
        Self {
            shift_repo,
            center_repo,
        }
    }

    // Provisiona um turno por data para o centro, num único lote.
    // As datas chegam do assistente como o usuário clicou: fora de ordem e
    // possivelmente repetidas, então normalizamos antes de ir ao banco.
    pub async fn provision<'e, E>(
        &self,
        executor: E,
        center_id: Uuid,
        dates: &[NaiveDate],
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Vec<WorkShift>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if start_time >= end_time {
            return Err(AppError::InvalidTimeWindow);
        }

        let normalized: Vec<NaiveDate> = dates.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if normalized.is_empty() {
            let mut errors = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("length");
            err.message = Some("Selecione pelo menos uma data.".into());
            errors.add("dates", err);
            return Err(errors.into());
        }

        // Transação: conferir o centro e criar o lote com o mesmo executor
        let mut tx = executor.begin().await?;

        if self.center_repo.get(&mut *tx, center_id).await?.is_none() {
            return Err(AppError::ResourceNotFound("Centro".to_string()));
        }

        let codes: Vec<String> = normalized.iter().map(|d| shift_code(*d)).collect();

        let shifts = self
            .shift_repo
            .create_bulk(&mut *tx, center_id, &codes, &normalized, start_time, end_time)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Provisionados {} turnos para o centro {}",
            shifts.len(),
            center_id
        );

        Ok(shifts)
    }
}

// Código humano do turno: legível no quadro e único o suficiente
// para operadores citarem em chamados.
fn shift_code(date: NaiveDate) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "TUR-{}-{}",
        date.format("%Y%m%d"),
        token[..6].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codigo_do_turno_carrega_a_data() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let code = shift_code(date);
        assert!(code.starts_with("TUR-20250303-"));
        assert_eq!(code.len(), "TUR-20250303-".len() + 6);
    }

    #[test]
    fn codigos_nao_se_repetem_para_a_mesma_data() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_ne!(shift_code(date), shift_code(date));
    }
}
