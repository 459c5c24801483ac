// src/services/calendar_service.rs

// Agregador de calendário: transforma turnos + vínculos crus na grade mensal
// e nos totais de presença por dia da semana. Tudo aqui é DERIVADO: as
// funções puras recalculam do zero a partir das listas de origem, invocadas
// explicitamente depois de cada mutação confirmada (nada de assinatura
// reativa implícita).

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, time_grid},
    db::{AssignmentRepository, WorkShiftRepository},
    models::{
        calendar::{
            AttendanceEntry, CalendarAssignmentEntry, CalendarDay, CalendarMonthView,
            ShiftPeriod, WEEKDAY_LABELS,
        },
        scheduling::AssignmentDetailRow,
    },
};

#[derive(Clone)]
pub struct CalendarService {
    shift_repo: WorkShiftRepository,
    assignment_repo: AssignmentRepository,
}

impl CalendarService {
    pub fn new(shift_repo: WorkShiftRepository, assignment_repo: AssignmentRepository) -> Self {
        Self {
            shift_repo,
            assignment_repo,
        }
    }

    pub async fn month_view<'e, E>(
        &self,
        executor: E,
        center_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<CalendarMonthView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let rows = self.fetch_month_rows(executor, center_id, year, month).await?;
        Ok(build_month_view(year, month, &rows))
    }

    pub async fn attendance<'e, E>(
        &self,
        executor: E,
        center_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let rows = self.fetch_month_rows(executor, center_id, year, month).await?;
        Ok(weekday_attendance(&rows))
    }

    // Turnos do mês + vínculos resolvidos, numa transação
    // (snapshot consistente das duas listas).
    async fn fetch_month_rows<'e, E>(
        &self,
        executor: E,
        center_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<AssignmentDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let days = time_grid::month_days(year, month);
        let (Some(first), Some(last)) = (days.first().copied(), days.last().copied()) else {
            let mut errors = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("range");
            err.message = Some("Mês inválido.".into());
            errors.add("month", err);
            return Err(errors.into());
        };

        let mut tx = executor.begin().await?;

        let shifts = self
            .shift_repo
            .list(&mut *tx, Some(center_id), Some(first), Some(last))
            .await?;

        let shift_ids: Vec<Uuid> = shifts.iter().map(|s| s.id).collect();
        let rows = if shift_ids.is_empty() {
            Vec::new()
        } else {
            self.assignment_repo
                .list_detailed_for_shifts(&mut *tx, &shift_ids)
                .await?
        };

        tx.commit().await?;
        Ok(rows)
    }
}

// Grade mensal com os vínculos de cada dia, classificados pelo período do
// início do turno. As células de preenchimento dos meses vizinhos saem
// sempre vazias.
pub fn build_month_view(year: i32, month: u32, rows: &[AssignmentDetailRow]) -> CalendarMonthView {
    let mut by_day: HashMap<NaiveDate, Vec<&AssignmentDetailRow>> = HashMap::new();
    for row in rows {
        by_day.entry(row.shift_date).or_default().push(row);
    }

    let cells = time_grid::month_grid(year, month)
        .into_iter()
        .map(|cell| {
            let assignments = if cell.is_current_month {
                by_day
                    .get(&cell.date)
                    .map(|rows| rows.iter().map(|r| to_entry(r)).collect::<Vec<_>>())
                    .unwrap_or_default()
            } else {
                Vec::new()
            };
            CalendarDay {
                date_key: cell.date_key(),
                day_number: cell.day_number,
                is_current_month: cell.is_current_month,
                assignments,
            }
        })
        .collect();

    CalendarMonthView { year, month, cells }
}

// Totais Seg..Dom de vínculos da manhã vs. da noite, para o gráfico simples
// de presença. A tarde fica de fora das duas colunas.
pub fn weekday_attendance(rows: &[AssignmentDetailRow]) -> Vec<AttendanceEntry> {
    let mut morning = [0i64; 7];
    let mut night = [0i64; 7];

    for row in rows {
        let index = row.shift_date.weekday().num_days_from_monday() as usize;
        match ShiftPeriod::classify(row.start_time) {
            ShiftPeriod::Morning => morning[index] += 1,
            ShiftPeriod::Night => night[index] += 1,
            ShiftPeriod::Afternoon => {}
        }
    }

    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| AttendanceEntry {
            weekday: label.to_string(),
            morning: morning[index],
            night: night[index],
        })
        .collect()
}

fn to_entry(row: &AssignmentDetailRow) -> CalendarAssignmentEntry {
    CalendarAssignmentEntry {
        assignment_id: row.id,
        system_user_id: row.system_user_id,
        member_name: row.member_name.clone(),
        role: row.role,
        workshift_id: row.workshift_id,
        shift_code: row.shift_code.clone(),
        period: ShiftPeriod::classify(row.start_time),
        start_time: row.start_time,
        end_time: row.end_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scheduling::MemberRole;
    use chrono::NaiveTime;

    fn row(day: u32, hour: u32, name: &str) -> AssignmentDetailRow {
        AssignmentDetailRow {
            id: Uuid::new_v4(),
            system_user_id: Uuid::new_v4(),
            member_name: name.to_string(),
            role: MemberRole::Technician,
            workshift_id: Uuid::new_v4(),
            shift_code: format!("TUR-202503{:02}", day),
            shift_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 4, 0, 0).unwrap(),
        }
    }

    #[test]
    fn visao_mensal_encaixa_os_vinculos_no_dia_certo() {
        let rows = vec![row(3, 8, "Ana"), row(3, 18, "Bruno"), row(10, 8, "Carla")];
        let view = build_month_view(2025, 3, &rows);

        assert_eq!(view.cells.len() % 7, 0);

        let dia_3 = view
            .cells
            .iter()
            .find(|c| c.date_key == "2025-03-03")
            .unwrap();
        assert_eq!(dia_3.assignments.len(), 2);
        assert_eq!(dia_3.assignments[0].period, ShiftPeriod::Morning);
        assert_eq!(dia_3.assignments[1].period, ShiftPeriod::Night);

        let dia_10 = view
            .cells
            .iter()
            .find(|c| c.date_key == "2025-03-10")
            .unwrap();
        assert_eq!(dia_10.assignments.len(), 1);
    }

    #[test]
    fn celulas_de_preenchimento_ficam_vazias() {
        let view = build_month_view(2025, 3, &[]);
        assert!(view
            .cells
            .iter()
            .filter(|c| !c.is_current_month)
            .all(|c| c.assignments.is_empty() && c.day_number.is_none()));
    }

    #[test]
    fn presenca_conta_manha_e_noite_por_dia_da_semana() {
        // 2025-03-03 é segunda; 2025-03-09 é domingo
        let rows = vec![
            row(3, 8, "Ana"),    // Seg manhã
            row(3, 9, "Bruno"),  // Seg manhã
            row(3, 19, "Carla"), // Seg noite
            row(9, 18, "Davi"),  // Dom noite
            row(3, 14, "Edu"),   // tarde: fora do gráfico
        ];
        let chart = weekday_attendance(&rows);

        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].weekday, "Seg");
        assert_eq!(chart[0].morning, 2);
        assert_eq!(chart[0].night, 1);
        assert_eq!(chart[6].weekday, "Dom");
        assert_eq!(chart[6].night, 1);
        // Terça..sábado zerados
        assert!(chart[1..6].iter().all(|e| e.morning == 0 && e.night == 0));
    }
}
