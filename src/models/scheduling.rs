// src/models/scheduling.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Serde: horários de parede no formato "HH:MM"
// ---
// O frontend trafega horários como "08:00" (sem segundos e sem fuso).
// O serde padrão do NaiveTime exige "HH:MM:SS", então centralizamos o formato aqui.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        // Aceita também "HH:MM:SS", que é como o Postgres devolve colunas TIME
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "member_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Staff,
    Technician,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "shift_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    Active,
    Completed,
    Cancelled,
}

// --- Entidades ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Center {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Centro de Manutenção - Matriz")]
    pub name: String,
}

// Pessoal (staff e técnicos). Cadastro externo: este módulo só lê.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub system_user_id: Uuid,
    #[schema(example = "Ana Souza")]
    pub name: String,
    pub role: MemberRole,
    pub center_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkShift {
    pub id: Uuid,
    #[schema(example = "TUR-20250303-A1B2C3")]
    pub shift_code: String,
    pub shift_date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(example = "08:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(example = "12:00")]
    pub end_time: NaiveTime,
    pub status: ShiftStatus,
    pub center_id: Uuid,
}

// Vínculo N:N entre um membro e um turno
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    pub id: Uuid,
    pub system_user_id: Uuid,
    pub workshift_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Linha de vínculo já resolvida (membro + turno) que alimenta o agregador
// de calendário. Não sai na API: vira CalendarAssignmentEntry.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentDetailRow {
    pub id: Uuid,
    pub system_user_id: Uuid,
    pub member_name: String,
    pub role: MemberRole,
    pub workshift_id: Uuid,
    pub shift_code: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// Vaga agendável de duração fixa, derivada da janela de um turno
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: Uuid,
    pub slot_date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(example = "08:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(example = "09:00")]
    pub end_time: NaiveTime,
    #[schema(example = 1)]
    pub capacity: i32,
    #[schema(example = 0)]
    pub booked_count: i32,
    pub center_id: Uuid,
}

// --- Resultados de lote ---

// Resumo da geração de vagas: o que foi criado e o que já existia.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotGenerationSummary {
    #[schema(example = 4)]
    pub created: i64,
    #[schema(example = 0)]
    pub skipped: i64,
}

// Resultado por membro do vínculo em lote (estágio 2 do assistente).
// O fan-out não tem rollback: o caller precisa saber quem entrou e quem falhou.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberAssignmentOutcome {
    pub system_user_id: Uuid,
    #[schema(example = 3)]
    pub bindings_created: i64,
    pub error: Option<String>,
}

impl MemberAssignmentOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}
