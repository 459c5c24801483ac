// src/models/scheduler.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    // Usado pela busca textual do quadro (filtra por título OU status)
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::InProgress => "in-progress",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    // O filtro multi-status chega na query string como "scheduled,completed"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "scheduled" => Ok(EventStatus::Scheduled),
            "in-progress" => Ok(EventStatus::InProgress),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(format!("status desconhecido: {}", other)),
        }
    }
}

// --- Entidades ---

// Item de trabalho de um técnico no quadro interativo.
// Vive apenas no conjunto de trabalho do quadro aberto (não é persistido):
// reabrir o quadro recarrega a verdade do servidor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEvent {
    pub id: Uuid,
    pub technician_id: Uuid,
    #[schema(example = "Revisão preventiva - OS 1042")]
    pub title: String,
    #[schema(example = "2025-03-03T09:00:00")]
    pub start: NaiveDateTime,
    #[schema(example = "2025-03-03T10:00:00")]
    pub end: NaiveDateTime,
    pub status: EventStatus,
}

// --- Comandos ---

// As três mutações do quadro viram comandos explícitos (em vez de mutação
// direta durante o drag-and-drop), todos validados pelo detector de conflito
// antes de tocar a coleção.
#[derive(Debug, Clone)]
pub enum ScheduleCommand {
    Create {
        technician_id: Uuid,
        title: String,
        start: NaiveDateTime,
        // Ausente no "arrastar técnico para a célula": assume 1 hora
        end: Option<NaiveDateTime>,
    },
    Resize {
        event_id: Uuid,
        new_end: NaiveDateTime,
    },
    Move {
        event_id: Uuid,
        new_start: NaiveDateTime,
        new_end: NaiveDateTime,
        // Soltar sobre a linha de outro técnico também re-atribui o evento
        new_technician_id: Option<Uuid>,
    },
    ChangeStatus {
        event_id: Uuid,
        new_status: EventStatus,
        actor_is_admin: bool,
    },
}

// --- Filtro (projeção de leitura, nunca muta o conjunto) ---

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub technician_id: Option<Uuid>,
    pub search: Option<String>,
    pub statuses: Option<Vec<EventStatus>>,
}

impl EventFilter {
    pub fn matches(&self, event: &ScheduledEvent) -> bool {
        if let Some(technician_id) = self.technician_id {
            if event.technician_id != technician_id {
                return false;
            }
        }

        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&event.status) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                let in_title = event.title.to_lowercase().contains(&needle);
                let in_status = event.status.label().contains(&needle);
                if !in_title && !in_status {
                    return false;
                }
            }
        }

        true
    }
}
