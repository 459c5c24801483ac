// src/services/slot_service.rs

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, Timelike};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{slot_repo::SlotRow, SlotRepository},
    models::scheduling::{Slot, SlotGenerationSummary},
};

#[derive(Clone)]
pub struct SlotGeneratorService {
    repo: SlotRepository,
}

impl SlotGeneratorService {
    pub fn new(repo: SlotRepository) -> Self {
        Self { repo }
    }

    // Expande a janela em vagas de duração fixa para cada (centro, data).
    // A geração inteira é UM lote: vagas que já existiam pela chave natural
    // não são recriadas, apenas contadas como "skipped": rodar duas vezes a
    // mesma requisição devolve {created: 0, skipped: N}.
    pub async fn generate<'e, E>(
        &self,
        executor: E,
        center_ids: &[Uuid],
        dates: &[NaiveDate],
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: i32,
        capacity: i32,
    ) -> Result<SlotGenerationSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        validate_generation_input(center_ids, dates, start_time, end_time, duration_minutes)?;

        let centers: Vec<Uuid> = center_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let days: Vec<NaiveDate> = dates.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

        let steps = expand_window(start_time, end_time, duration_minutes);

        let mut rows = Vec::with_capacity(centers.len() * days.len() * steps.len());
        for center_id in &centers {
            for day in &days {
                for (slot_start, slot_end) in &steps {
                    rows.push(SlotRow {
                        center_id: *center_id,
                        slot_date: *day,
                        start_time: *slot_start,
                        end_time: *slot_end,
                    });
                }
            }
        }

        let total = rows.len() as i64;
        let created = self.repo.insert_batch(executor, &rows, capacity).await?;
        let summary = SlotGenerationSummary {
            created,
            skipped: total - created,
        };

        tracing::info!(
            "Geração de vagas: {} criadas, {} já existiam",
            summary.created,
            summary.skipped
        );

        Ok(summary)
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
        self.repo.list(executor, center_id, slot_date).await
    }
}

// Caminha a janela [start, end) em passos de `duration` minutos.
// O último passo que estouraria o fim é descartado: sobram exatamente
// floor((end - start) / duration) vagas.
pub fn expand_window(
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i32,
) -> Vec<(NaiveTime, NaiveTime)> {
    if duration_minutes <= 0 || start_time >= end_time {
        return Vec::new();
    }

    // Aritmética em minutos desde a meia-noite: NaiveTime soma com wrap-around,
    // o que mascararia um passo que cruza o fim do dia.
    let start_min = (start_time.num_seconds_from_midnight() / 60) as i32;
    let end_min = (end_time.num_seconds_from_midnight() / 60) as i32;

    let mut steps = Vec::new();
    let mut cursor = start_min;
    while cursor + duration_minutes <= end_min {
        let from = minutes_to_time(cursor);
        let to = minutes_to_time(cursor + duration_minutes);
        if let (Some(from), Some(to)) = (from, to) {
            steps.push((from, to));
        }
        cursor += duration_minutes;
    }
    steps
}

fn minutes_to_time(minutes: i32) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(minutes as u32 * 60, 0)
}

fn validate_generation_input(
    center_ids: &[Uuid],
    dates: &[NaiveDate],
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i32,
) -> Result<(), AppError> {
    if start_time >= end_time {
        return Err(AppError::InvalidTimeWindow);
    }

    let mut errors = validator::ValidationErrors::new();
    if duration_minutes <= 0 {
        let mut err = validator::ValidationError::new("range");
        err.message = Some("A duração deve ser um inteiro positivo de minutos.".into());
        errors.add("durationMinutes", err);
    }
    if center_ids.is_empty() {
        let mut err = validator::ValidationError::new("length");
        err.message = Some("Informe pelo menos um centro.".into());
        errors.add("centerIds", err);
    }
    if dates.is_empty() {
        let mut err = validator::ValidationError::new("length");
        err.message = Some("Informe pelo menos uma data.".into());
        errors.add("dates", err);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn janela_de_4_horas_com_passo_de_60_gera_4_vagas() {
        let steps = expand_window(t(8, 0), t(12, 0), 60);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], (t(8, 0), t(9, 0)));
        assert_eq!(steps[3], (t(11, 0), t(12, 0)));
    }

    #[test]
    fn passo_que_estouraria_o_fim_e_descartado() {
        // floor(150 / 60) = 2: a meia hora final não vira vaga
        let steps = expand_window(t(8, 0), t(10, 30), 60);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps.last().unwrap().1, t(10, 0));
    }

    #[test]
    fn janela_menor_que_a_duracao_nao_gera_nada() {
        assert!(expand_window(t(8, 0), t(8, 45), 60).is_empty());
    }

    #[test]
    fn janela_com_encaixe_exato_fecha_no_fim() {
        let steps = expand_window(t(8, 0), t(9, 30), 45);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1], (t(8, 45), t(9, 30)));
    }

    #[test]
    fn entradas_degeneradas_sao_vazias() {
        assert!(expand_window(t(12, 0), t(8, 0), 60).is_empty());
        assert!(expand_window(t(8, 0), t(12, 0), 0).is_empty());
        assert!(expand_window(t(8, 0), t(12, 0), -30).is_empty());
    }

    #[test]
    fn validacao_rejeita_janela_invertida_e_duracao_nao_positiva() {
        let center = Uuid::new_v4();
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();

        let r = validate_generation_input(&[center], &[day], t(12, 0), t(8, 0), 60);
        assert!(matches!(r, Err(AppError::InvalidTimeWindow)));

        let r = validate_generation_input(&[center], &[day], t(8, 0), t(12, 0), 0);
        assert!(matches!(r, Err(AppError::ValidationError(_))));

        let r = validate_generation_input(&[], &[day], t(8, 0), t(12, 0), 60);
        assert!(matches!(r, Err(AppError::ValidationError(_))));
    }
}
