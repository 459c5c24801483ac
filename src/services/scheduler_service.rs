// src/services/scheduler_service.rs

// Quadro interativo de agenda dos técnicos.
//
// O conjunto de eventos vive SÓ no quadro aberto (nada é persistido aqui):
// quem abre o quadro injeta a verdade vinda do servidor e, ao fechar, tudo é
// descartado. Os três gestos do calendário (redimensionar, mover, criar
// arrastando um técnico para uma célula livre) viram comandos explícitos,
// todos validados pelo detector de sobreposição ANTES de tocar a coleção.
// A checagem e o commit acontecem no mesmo handler síncrono, então não há
// janela para o conjunto mudar entre uma coisa e outra.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        overlap::{conflicts, CandidateInterval},
    },
    models::scheduler::{EventFilter, ScheduleCommand, ScheduledEvent, EventStatus},
};

// Duração padrão do "arrastar técnico para a célula": 1 hora
const DEFAULT_EVENT_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct ScheduleBoard {
    pub id: Uuid,
    events: Vec<ScheduledEvent>,
}

impl ScheduleBoard {
    pub fn new(seed_events: Vec<ScheduledEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            events: seed_events,
        }
    }

    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    // Projeção de leitura: filtrar nunca muta o conjunto.
    pub fn list(&self, filter: &EventFilter) -> Vec<ScheduledEvent> {
        self.events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    // Aplica um comando. Em caso de rejeição o conjunto fica intocado:
    // o evento "volta" ao intervalo de antes do gesto porque nunca saiu dele.
    pub fn apply(
        &mut self,
        command: ScheduleCommand,
        now: NaiveDateTime,
    ) -> Result<ScheduledEvent, AppError> {
        match command {
            ScheduleCommand::Create {
                technician_id,
                title,
                start,
                end,
            } => {
                let end = end.unwrap_or(start + Duration::minutes(DEFAULT_EVENT_MINUTES));
                if start >= end {
                    return Err(AppError::InvalidTimeWindow);
                }
                if start < now {
                    return Err(AppError::PastTimeRejected);
                }
                let candidate = CandidateInterval {
                    person_id: technician_id,
                    start,
                    end,
                    exclude_id: None,
                };
                if conflicts(&candidate, &self.events) {
                    return Err(AppError::ScheduleConflict);
                }

                let event = ScheduledEvent {
                    id: Uuid::new_v4(),
                    technician_id,
                    title,
                    start,
                    end,
                    status: EventStatus::Scheduled,
                };
                self.events.push(event.clone());
                Ok(event)
            }

            ScheduleCommand::Resize { event_id, new_end } => {
                let event = self.find(event_id)?;
                // Encolher o fim para antes do início inverteria o intervalo:
                // rejeição de malformação, não de conflito.
                if new_end <= event.start {
                    return Err(AppError::InvalidTimeWindow);
                }
                let candidate = CandidateInterval {
                    person_id: event.technician_id,
                    start: event.start,
                    end: new_end,
                    exclude_id: Some(event_id),
                };
                if conflicts(&candidate, &self.events) {
                    return Err(AppError::ScheduleConflict);
                }

                let event = self.find_mut(event_id)?;
                event.end = new_end;
                Ok(event.clone())
            }

            ScheduleCommand::Move {
                event_id,
                new_start,
                new_end,
                new_technician_id,
            } => {
                let event = self.find(event_id)?;
                if new_start >= new_end {
                    return Err(AppError::InvalidTimeWindow);
                }
                // Nada de arrastar trabalho para o passado
                if new_start < now {
                    return Err(AppError::PastTimeRejected);
                }
                let technician_id = new_technician_id.unwrap_or(event.technician_id);
                let candidate = CandidateInterval {
                    person_id: technician_id,
                    start: new_start,
                    end: new_end,
                    exclude_id: Some(event_id),
                };
                if conflicts(&candidate, &self.events) {
                    return Err(AppError::ScheduleConflict);
                }

                let event = self.find_mut(event_id)?;
                event.start = new_start;
                event.end = new_end;
                event.technician_id = technician_id;
                Ok(event.clone())
            }

            ScheduleCommand::ChangeStatus {
                event_id,
                new_status,
                actor_is_admin,
            } => {
                // Afordância restrita: sem o papel de admin o status é somente leitura
                if !actor_is_admin {
                    return Err(AppError::StatusChangeForbidden);
                }
                let event = self.find_mut(event_id)?;
                event.status = new_status;
                Ok(event.clone())
            }
        }
    }

    fn find(&self, event_id: Uuid) -> Result<&ScheduledEvent, AppError> {
        self.events
            .iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| AppError::ResourceNotFound("Evento".to_string()))
    }

    fn find_mut(&mut self, event_id: Uuid) -> Result<&mut ScheduledEvent, AppError> {
        self.events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| AppError::ResourceNotFound("Evento".to_string()))
    }
}

// --- Serviço ---

// Guarda os quadros abertos por id. Edição single-editor, last-write-wins:
// não há reconciliação entre sessões; reabrir o quadro recarrega a verdade.
#[derive(Clone)]
pub struct SchedulerService {
    boards: Arc<Mutex<HashMap<Uuid, ScheduleBoard>>>,
}

impl SchedulerService {
    pub fn new() -> Self {
        Self {
            boards: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn boards(&self) -> Result<MutexGuard<'_, HashMap<Uuid, ScheduleBoard>>, AppError> {
        self.boards
            .lock()
            .map_err(|_| AppError::from(anyhow::anyhow!("Mutex dos quadros envenenado")))
    }

    pub fn open_board(&self, seed_events: Vec<ScheduledEvent>) -> Result<ScheduleBoard, AppError> {
        let board = ScheduleBoard::new(seed_events);
        let opened = board.clone();
        self.boards()?.insert(board.id, board);
        tracing::info!(
            "Quadro {} aberto com {} eventos",
            opened.id,
            opened.events.len()
        );
        Ok(opened)
    }

    pub fn list_events(
        &self,
        board_id: Uuid,
        filter: &EventFilter,
    ) -> Result<Vec<ScheduledEvent>, AppError> {
        let boards = self.boards()?;
        let board = boards
            .get(&board_id)
            .ok_or_else(|| AppError::ResourceNotFound("Quadro".to_string()))?;
        Ok(board.list(filter))
    }

    pub fn apply(
        &self,
        board_id: Uuid,
        command: ScheduleCommand,
    ) -> Result<ScheduledEvent, AppError> {
        let mut boards = self.boards()?;
        let board = boards
            .get_mut(&board_id)
            .ok_or_else(|| AppError::ResourceNotFound("Quadro".to_string()))?;
        board.apply(command, Utc::now().naive_utc())
    }

    pub fn close_board(&self, board_id: Uuid) -> Result<(), AppError> {
        let removed = self.boards()?.remove(&board_id);
        if removed.is_none() {
            return Err(AppError::ResourceNotFound("Quadro".to_string()));
        }
        tracing::info!("Quadro {} fechado; eventos descartados", board_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    // "Agora" fixo bem antes dos eventos de teste
    fn past_now() -> NaiveDateTime {
        at(1, 0, 0)
    }

    fn seeded_board(technician: Uuid) -> (ScheduleBoard, Uuid) {
        let mut board = ScheduleBoard::new(Vec::new());
        let event = board
            .apply(
                ScheduleCommand::Create {
                    technician_id: technician,
                    title: "OS 1042".to_string(),
                    start: at(3, 9, 0),
                    end: Some(at(3, 10, 0)),
                },
                past_now(),
            )
            .unwrap();
        (board, event.id)
    }

    #[test]
    fn criar_sobre_intervalo_ocupado_e_rejeitado() {
        let technician = Uuid::new_v4();
        let (mut board, _) = seeded_board(technician);

        // [09:30, 10:30) cruza o evento [09:00, 10:00)
        let r = board.apply(
            ScheduleCommand::Create {
                technician_id: technician,
                title: "OS 2000".to_string(),
                start: at(3, 9, 30),
                end: Some(at(3, 10, 30)),
            },
            past_now(),
        );
        assert!(matches!(r, Err(AppError::ScheduleConflict)));
        assert_eq!(board.list(&EventFilter::default()).len(), 1);
    }

    #[test]
    fn encostar_no_limite_do_evento_existente_e_permitido() {
        let technician = Uuid::new_v4();
        let (mut board, _) = seeded_board(technician);

        let r = board.apply(
            ScheduleCommand::Create {
                technician_id: technician,
                title: "OS 2000".to_string(),
                start: at(3, 10, 0),
                end: Some(at(3, 11, 0)),
            },
            past_now(),
        );
        assert!(r.is_ok());
    }

    #[test]
    fn criar_sem_fim_assume_uma_hora() {
        let technician = Uuid::new_v4();
        let mut board = ScheduleBoard::new(Vec::new());

        let event = board
            .apply(
                ScheduleCommand::Create {
                    technician_id: technician,
                    title: "Vaga rápida".to_string(),
                    start: at(3, 14, 0),
                    end: None,
                },
                past_now(),
            )
            .unwrap();
        assert_eq!(event.end, at(3, 15, 0));
        assert_eq!(event.status, EventStatus::Scheduled);
    }

    #[test]
    fn criar_no_passado_e_rejeicao_distinta_de_conflito() {
        let technician = Uuid::new_v4();
        let mut board = ScheduleBoard::new(Vec::new());

        let r = board.apply(
            ScheduleCommand::Create {
                technician_id: technician,
                title: "OS atrasada".to_string(),
                start: at(3, 9, 0),
                end: Some(at(3, 10, 0)),
            },
            at(10, 0, 0), // "agora" já passou do dia 3
        );
        assert!(matches!(r, Err(AppError::PastTimeRejected)));
    }

    #[test]
    fn redimensionar_sobre_o_vizinho_e_rejeitado_e_nada_muda() {
        let technician = Uuid::new_v4();
        let (mut board, first_id) = seeded_board(technician);
        board
            .apply(
                ScheduleCommand::Create {
                    technician_id: technician,
                    title: "OS 2000".to_string(),
                    start: at(3, 10, 0),
                    end: Some(at(3, 11, 0)),
                },
                past_now(),
            )
            .unwrap();

        // Esticar o primeiro evento até 10:30 invadiria o segundo
        let r = board.apply(
            ScheduleCommand::Resize {
                event_id: first_id,
                new_end: at(3, 10, 30),
            },
            past_now(),
        );
        assert!(matches!(r, Err(AppError::ScheduleConflict)));

        let events = board.list(&EventFilter::default());
        let first = events.iter().find(|e| e.id == first_id).unwrap();
        assert_eq!(first.end, at(3, 10, 0));
    }

    #[test]
    fn redimensionar_para_antes_do_inicio_e_malformacao() {
        let technician = Uuid::new_v4();
        let (mut board, event_id) = seeded_board(technician);

        let r = board.apply(
            ScheduleCommand::Resize {
                event_id,
                new_end: at(3, 9, 0), // fim == início inverte o intervalo
            },
            past_now(),
        );
        assert!(matches!(r, Err(AppError::InvalidTimeWindow)));
    }

    #[test]
    fn mover_preservando_a_duracao_para_intervalo_livre_funciona() {
        let technician = Uuid::new_v4();
        let (mut board, event_id) = seeded_board(technician);

        let moved = board
            .apply(
                ScheduleCommand::Move {
                    event_id,
                    new_start: at(4, 14, 0),
                    new_end: at(4, 15, 0),
                    new_technician_id: None,
                },
                past_now(),
            )
            .unwrap();
        assert_eq!(moved.start, at(4, 14, 0));
        assert_eq!(moved.technician_id, technician);
    }

    #[test]
    fn mover_para_outro_tecnico_valida_a_agenda_do_destino() {
        let alice = Uuid::new_v4();
        let bruno = Uuid::new_v4();
        let (mut board, alice_event) = seeded_board(alice);
        board
            .apply(
                ScheduleCommand::Create {
                    technician_id: bruno,
                    title: "OS do Bruno".to_string(),
                    start: at(3, 9, 0),
                    end: Some(at(3, 10, 0)),
                },
                past_now(),
            )
            .unwrap();

        // Soltar o evento da Alice na linha do Bruno, no mesmo horário: conflito
        let r = board.apply(
            ScheduleCommand::Move {
                event_id: alice_event,
                new_start: at(3, 9, 0),
                new_end: at(3, 10, 0),
                new_technician_id: Some(bruno),
            },
            past_now(),
        );
        assert!(matches!(r, Err(AppError::ScheduleConflict)));

        // Uma hora depois, a linha do Bruno está livre
        let moved = board
            .apply(
                ScheduleCommand::Move {
                    event_id: alice_event,
                    new_start: at(3, 10, 0),
                    new_end: at(3, 11, 0),
                    new_technician_id: Some(bruno),
                },
                past_now(),
            )
            .unwrap();
        assert_eq!(moved.technician_id, bruno);
    }

    #[test]
    fn mover_para_o_passado_e_rejeitado() {
        let technician = Uuid::new_v4();
        let (mut board, event_id) = seeded_board(technician);

        let r = board.apply(
            ScheduleCommand::Move {
                event_id,
                new_start: at(2, 9, 0),
                new_end: at(2, 10, 0),
                new_technician_id: None,
            },
            at(3, 8, 0),
        );
        assert!(matches!(r, Err(AppError::PastTimeRejected)));
    }

    #[test]
    fn status_so_muda_com_papel_de_admin() {
        let technician = Uuid::new_v4();
        let (mut board, event_id) = seeded_board(technician);

        let r = board.apply(
            ScheduleCommand::ChangeStatus {
                event_id,
                new_status: EventStatus::InProgress,
                actor_is_admin: false,
            },
            past_now(),
        );
        assert!(matches!(r, Err(AppError::StatusChangeForbidden)));

        let updated = board
            .apply(
                ScheduleCommand::ChangeStatus {
                    event_id,
                    new_status: EventStatus::InProgress,
                    actor_is_admin: true,
                },
                past_now(),
            )
            .unwrap();
        assert_eq!(updated.status, EventStatus::InProgress);
        // O intervalo não foi tocado
        assert_eq!(updated.start, at(3, 9, 0));
    }

    #[test]
    fn filtro_e_projecao_pura_sobre_o_conjunto() {
        let alice = Uuid::new_v4();
        let bruno = Uuid::new_v4();
        let (mut board, alice_event) = seeded_board(alice);
        board
            .apply(
                ScheduleCommand::Create {
                    technician_id: bruno,
                    title: "Troca de óleo".to_string(),
                    start: at(3, 11, 0),
                    end: Some(at(3, 12, 0)),
                },
                past_now(),
            )
            .unwrap();
        board
            .apply(
                ScheduleCommand::ChangeStatus {
                    event_id: alice_event,
                    new_status: EventStatus::Completed,
                    actor_is_admin: true,
                },
                past_now(),
            )
            .unwrap();

        // Por técnico
        let only_alice = board.list(&EventFilter {
            technician_id: Some(alice),
            ..Default::default()
        });
        assert_eq!(only_alice.len(), 1);

        // Texto livre sobre título OU status
        let by_title = board.list(&EventFilter {
            search: Some("óleo".to_string()),
            ..Default::default()
        });
        assert_eq!(by_title.len(), 1);
        let by_status_text = board.list(&EventFilter {
            search: Some("completed".to_string()),
            ..Default::default()
        });
        assert_eq!(by_status_text.len(), 1);

        // Multi-seleção de status
        let by_status = board.list(&EventFilter {
            statuses: Some(vec![EventStatus::Scheduled]),
            ..Default::default()
        });
        assert_eq!(by_status.len(), 1);

        // E nada disso mutou o conjunto
        assert_eq!(board.list(&EventFilter::default()).len(), 2);
    }
}
