// src/models/calendar.rs

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::scheduling::{hhmm, MemberRole};

// --- Classificação de período ---

// Faixa fixa de 3 períodos, decidida só pela HORA de início do turno
// (a data é ignorada na classificação).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShiftPeriod {
    Morning,
    Afternoon,
    Night,
}

impl ShiftPeriod {
    // morning [07,13), afternoon [13,18), night [18,24) e também a madrugada
    // [00,07): um turno que começa antes das 7h é a cauda do noturno.
    pub fn classify(start_time: NaiveTime) -> Self {
        match start_time.hour() {
            7..=12 => ShiftPeriod::Morning,
            13..=17 => ShiftPeriod::Afternoon,
            _ => ShiftPeriod::Night,
        }
    }
}

// --- Visão mensal ---

// Um vínculo já resolvido (membro + turno) pronto para pintar na célula do dia
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarAssignmentEntry {
    pub assignment_id: Uuid,
    pub system_user_id: Uuid,
    #[schema(example = "Ana Souza")]
    pub member_name: String,
    pub role: MemberRole,
    pub workshift_id: Uuid,
    #[schema(example = "TUR-20250303-A1B2C3")]
    pub shift_code: String,
    pub period: ShiftPeriod,
    #[serde(with = "hhmm")]
    #[schema(example = "08:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(example = "12:00")]
    pub end_time: NaiveTime,
}

// Uma célula da grade mensal (inclui as células de preenchimento dos meses
// vizinhos, que chegam sem dayNumber e sem vínculos).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date_key: String,
    #[schema(example = 3)]
    pub day_number: Option<u32>,
    pub is_current_month: bool,
    pub assignments: Vec<CalendarAssignmentEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonthView {
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    pub cells: Vec<CalendarDay>,
}

// --- Gráfico de presença ---

// Totais de vínculos manhã vs. noite por dia da semana (Seg..Dom)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[schema(example = "Seg")]
    pub weekday: String,
    #[schema(example = 5)]
    pub morning: i64,
    #[schema(example = 2)]
    pub night: i64,
}

// Rótulos Seg..Dom na ordem da grade (semana começa na segunda)
pub const WEEKDAY_LABELS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifica_limites_dos_periodos() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        assert_eq!(ShiftPeriod::classify(t(7, 0)), ShiftPeriod::Morning);
        assert_eq!(ShiftPeriod::classify(t(12, 59)), ShiftPeriod::Morning);
        assert_eq!(ShiftPeriod::classify(t(13, 0)), ShiftPeriod::Afternoon);
        assert_eq!(ShiftPeriod::classify(t(17, 59)), ShiftPeriod::Afternoon);
        assert_eq!(ShiftPeriod::classify(t(18, 0)), ShiftPeriod::Night);
        assert_eq!(ShiftPeriod::classify(t(23, 0)), ShiftPeriod::Night);
        // Madrugada conta como noturno
        assert_eq!(ShiftPeriod::classify(t(6, 59)), ShiftPeriod::Night);
        assert_eq!(ShiftPeriod::classify(t(0, 0)), ShiftPeriod::Night);
    }
}
