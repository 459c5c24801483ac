// src/common/overlap.rs

// Detector de sobreposição de agenda.
//
// Dois intervalos SÓ conflitam quando pertencem à MESMA pessoa e os ranges
// semiabertos [start, end) se intersectam: encostar no limite não é conflito.
// Esta função é chamada antes de TODO commit do quadro interativo
// (redimensionar, mover e criar passam por aqui).

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::models::scheduler::ScheduledEvent;

// Intervalo candidato de um gesto. Ao validar a mudança de um evento que já
// existe, `exclude_id` tira a ocorrência anterior dele da comparação.
#[derive(Debug, Clone, Copy)]
pub struct CandidateInterval {
    pub person_id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub exclude_id: Option<Uuid>,
}

pub fn conflicts<'a, I>(candidate: &CandidateInterval, existing: I) -> bool
where
    I: IntoIterator<Item = &'a ScheduledEvent>,
{
    existing.into_iter().any(|event| {
        if Some(event.id) == candidate.exclude_id {
            return false;
        }
        if event.technician_id != candidate.person_id {
            return false;
        }
        // Interseção de intervalos semiabertos
        candidate.start < event.end && candidate.end > event.start
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scheduler::EventStatus;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn event(person: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> ScheduledEvent {
        ScheduledEvent {
            id: Uuid::new_v4(),
            technician_id: person,
            title: "OS".to_string(),
            start,
            end,
            status: EventStatus::Scheduled,
        }
    }

    fn candidate(person: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> CandidateInterval {
        CandidateInterval {
            person_id: person,
            start,
            end,
            exclude_id: None,
        }
    }

    #[test]
    fn intervalos_sobrepostos_da_mesma_pessoa_conflitam() {
        let person = Uuid::new_v4();
        let existing = vec![event(person, at(3, 9, 0), at(3, 10, 0))];

        // [09:30, 10:30) cruza [09:00, 10:00)
        assert!(conflicts(&candidate(person, at(3, 9, 30), at(3, 10, 30)), &existing));
        // Contido por inteiro também conflita
        assert!(conflicts(&candidate(person, at(3, 9, 15), at(3, 9, 45)), &existing));
    }

    #[test]
    fn deteccao_e_simetrica() {
        let person = Uuid::new_v4();
        let a = event(person, at(3, 9, 0), at(3, 11, 0));
        let b = event(person, at(3, 10, 0), at(3, 12, 0));

        let a_contra_b = conflicts(&candidate(person, a.start, a.end), std::slice::from_ref(&b));
        let b_contra_a = conflicts(&candidate(person, b.start, b.end), std::slice::from_ref(&a));
        assert_eq!(a_contra_b, b_contra_a);
        assert!(a_contra_b);
    }

    #[test]
    fn intervalo_conflita_com_ele_mesmo_salvo_exclusao_por_id() {
        let person = Uuid::new_v4();
        let existing = vec![event(person, at(3, 9, 0), at(3, 10, 0))];

        let mut cand = candidate(person, at(3, 9, 0), at(3, 10, 0));
        assert!(conflicts(&cand, &existing));

        // Excluindo a própria ocorrência, o "conflito" desaparece
        cand.exclude_id = Some(existing[0].id);
        assert!(!conflicts(&cand, &existing));
    }

    #[test]
    fn encostar_no_limite_nao_e_conflito() {
        let person = Uuid::new_v4();
        let existing = vec![event(person, at(3, 9, 0), at(3, 10, 0))];

        // A.end == B.start
        assert!(!conflicts(&candidate(person, at(3, 10, 0), at(3, 11, 0)), &existing));
        // B.end == A.start
        assert!(!conflicts(&candidate(person, at(3, 8, 0), at(3, 9, 0)), &existing));
    }

    #[test]
    fn pessoas_diferentes_nunca_conflitam() {
        let person = Uuid::new_v4();
        let other = Uuid::new_v4();
        let existing = vec![event(person, at(3, 9, 0), at(3, 10, 0))];

        assert!(!conflicts(&candidate(other, at(3, 9, 0), at(3, 10, 0)), &existing));
    }

    #[test]
    fn dias_diferentes_nao_conflitam() {
        let person = Uuid::new_v4();
        let existing = vec![event(person, at(3, 9, 0), at(3, 10, 0))];

        assert!(!conflicts(&candidate(person, at(4, 9, 0), at(4, 10, 0)), &existing));
    }
}
