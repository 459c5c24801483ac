// src/services/wizard_service.rs

// Assistente de provisionamento em 4 estágios:
//   1 Criar Turnos -> 2 Vincular Pessoal -> 3 Gerar Vagas -> 4 Concluído
// com saída implícita "cancelado" a partir de qualquer estágio.
//
// O submit de cada estágio é a ÚNICA ação que muta dados; "voltar" restaura
// o estado do assistente, nunca desfaz efeitos já confirmados (turnos e
// vínculos criados permanecem). Fechar descarta todo o estado local; uma
// resposta de rede que chegar depois do fechamento é descartada.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::WorkShiftRepository,
    models::scheduling::{MemberAssignmentOutcome, SlotGenerationSummary, WorkShift},
    services::{AssignmentService, ShiftProvisioningService, SlotGeneratorService},
};

// --- Máquina de estados ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    CreateShifts,
    AssignPersonnel,
    GenerateSlots,
    Done,
}

impl WizardStage {
    pub fn number(&self) -> u8 {
        match self {
            WizardStage::CreateShifts => 1,
            WizardStage::AssignPersonnel => 2,
            WizardStage::GenerateSlots => 3,
            WizardStage::Done => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStage::CreateShifts => "Criar Turnos",
            WizardStage::AssignPersonnel => "Vincular Pessoal",
            WizardStage::GenerateSlots => "Gerar Vagas",
            WizardStage::Done => "Concluído",
        }
    }

    fn previous(&self) -> Option<WizardStage> {
        match self {
            WizardStage::CreateShifts => None,
            WizardStage::AssignPersonnel => Some(WizardStage::CreateShifts),
            WizardStage::GenerateSlots => Some(WizardStage::AssignPersonnel),
            WizardStage::Done => Some(WizardStage::GenerateSlots),
        }
    }
}

// Uma corrida do assistente. Guarda só o progresso local (centro escolhido,
// datas, ids dos turnos recém-criados): abrir de novo sempre recomeça vazio
// no estágio 1.
#[derive(Debug, Clone)]
pub struct ShiftWizard {
    pub id: Uuid,
    stage: WizardStage,
    center_id: Option<Uuid>,
    dates: Vec<NaiveDate>,
    shift_ids: Vec<Uuid>,
    assigned_member_ids: Vec<Uuid>,
    generation: Option<SlotGenerationSummary>,
}

impl ShiftWizard {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: WizardStage::CreateShifts,
            center_id: None,
            dates: Vec::new(),
            shift_ids: Vec::new(),
            assigned_member_ids: Vec::new(),
            generation: None,
        }
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn expect_stage(&self, expected: WizardStage) -> Result<(), AppError> {
        if self.stage != expected {
            return Err(AppError::InvalidWizardTransition(format!(
                "a etapa atual é \"{}\" (esperava \"{}\")",
                self.stage.label(),
                expected.label()
            )));
        }
        Ok(())
    }

    // Estágio 1 confirmado: guarda os turnos criados e avança.
    pub fn record_shifts(
        &mut self,
        center_id: Uuid,
        shifts: &[WorkShift],
    ) -> Result<(), AppError> {
        self.expect_stage(WizardStage::CreateShifts)?;
        if shifts.is_empty() {
            return Err(AppError::InvalidWizardTransition(
                "nenhum turno foi provisionado".to_string(),
            ));
        }
        self.center_id = Some(center_id);
        self.dates = shifts.iter().map(|s| s.shift_date).collect();
        self.shift_ids = shifts.iter().map(|s| s.id).collect();
        self.stage = WizardStage::AssignPersonnel;
        Ok(())
    }

    // Estágio 2 confirmado (todos os membros vinculados com sucesso).
    pub fn record_assignments(&mut self, member_ids: &[Uuid]) -> Result<(), AppError> {
        self.expect_stage(WizardStage::AssignPersonnel)?;
        if self.shift_ids.is_empty() {
            return Err(AppError::InvalidWizardTransition(
                "não há turnos provisionados nesta corrida".to_string(),
            ));
        }
        self.assigned_member_ids = member_ids.to_vec();
        self.stage = WizardStage::GenerateSlots;
        Ok(())
    }

    // Estágio 3 confirmado: o assistente termina com o resumo da geração.
    pub fn record_generation(&mut self, summary: SlotGenerationSummary) -> Result<(), AppError> {
        self.expect_stage(WizardStage::GenerateSlots)?;
        self.generation = Some(summary);
        self.stage = WizardStage::Done;
        Ok(())
    }

    // Volta um estágio. Restaura o ESTADO, não os dados: o que já foi criado
    // no banco continua criado.
    pub fn back(&mut self) -> Result<(), AppError> {
        match self.stage.previous() {
            Some(previous) => {
                self.stage = previous;
                Ok(())
            }
            None => Err(AppError::InvalidWizardTransition(
                "não há etapa anterior".to_string(),
            )),
        }
    }

    pub fn center_id(&self) -> Option<Uuid> {
        self.center_id
    }

    pub fn shift_ids(&self) -> &[Uuid] {
        &self.shift_ids
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            id: self.id,
            stage: self.stage.number(),
            stage_label: self.stage.label().to_string(),
            center_id: self.center_id,
            dates: self.dates.clone(),
            shift_ids: self.shift_ids.clone(),
            assigned_member_ids: self.assigned_member_ids.clone(),
            generation: self.generation,
        }
    }
}

// --- Respostas ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub id: Uuid,
    #[schema(example = 2)]
    pub stage: u8,
    #[schema(example = "Vincular Pessoal")]
    pub stage_label: String,
    pub center_id: Option<Uuid>,
    pub dates: Vec<NaiveDate>,
    pub shift_ids: Vec<Uuid>,
    pub assigned_member_ids: Vec<Uuid>,
    pub generation: Option<SlotGenerationSummary>,
}

// Resultado do estágio 2: o assistente só avança quando TODO membro entrou;
// os vínculos que deram certo antes de uma falha permanecem (sem rollback),
// e a lista diz ao usuário o que reenviar.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStageResult {
    pub advanced: bool,
    pub outcomes: Vec<MemberAssignmentOutcome>,
    pub wizard: WizardSnapshot,
}

// --- Serviço ---

#[derive(Clone)]
pub struct WizardService {
    sessions: Arc<Mutex<HashMap<Uuid, ShiftWizard>>>,
    provisioning: ShiftProvisioningService,
    assignments: AssignmentService,
    slots: SlotGeneratorService,
    shift_repo: WorkShiftRepository,
}

impl WizardService {
    pub fn new(
        provisioning: ShiftProvisioningService,
        assignments: AssignmentService,
        slots: SlotGeneratorService,
        shift_repo: WorkShiftRepository,
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            provisioning,
            assignments,
            slots,
            shift_repo,
        }
    }

    // O lock NUNCA atravessa um await: lemos o que precisamos, soltamos,
    // fazemos as chamadas e só então re-adquirimos para confirmar.
    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, ShiftWizard>>, AppError> {
        self.sessions
            .lock()
            .map_err(|_| AppError::from(anyhow::anyhow!("Mutex das sessões do assistente envenenado")))
    }

    pub fn open(&self) -> Result<WizardSnapshot, AppError> {
        let wizard = ShiftWizard::new();
        let snapshot = wizard.snapshot();
        self.sessions()?.insert(wizard.id, wizard);
        tracing::info!("Assistente {} aberto no estágio 1", snapshot.id);
        Ok(snapshot)
    }

    pub fn get(&self, wizard_id: Uuid) -> Result<WizardSnapshot, AppError> {
        let sessions = self.sessions()?;
        let wizard = sessions
            .get(&wizard_id)
            .ok_or_else(|| AppError::ResourceNotFound("Assistente".to_string()))?;
        Ok(wizard.snapshot())
    }

    // Estágio 1: provisiona um turno por data e guarda os ids criados.
    pub async fn submit_shifts(
        &self,
        pool: &PgPool,
        wizard_id: Uuid,
        center_id: Uuid,
        dates: &[NaiveDate],
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<WizardSnapshot, AppError> {
        {
            let sessions = self.sessions()?;
            let wizard = sessions
                .get(&wizard_id)
                .ok_or_else(|| AppError::ResourceNotFound("Assistente".to_string()))?;
            wizard.expect_stage(WizardStage::CreateShifts)?;
        }

        let shifts = self
            .provisioning
            .provision(pool, center_id, dates, start_time, end_time)
            .await?;

        // O assistente pode ter sido fechado enquanto a chamada estava em voo
        let mut sessions = self.sessions()?;
        match sessions.get_mut(&wizard_id) {
            Some(wizard) => {
                wizard.record_shifts(center_id, &shifts)?;
                Ok(wizard.snapshot())
            }
            None => {
                tracing::warn!(
                    "Assistente {} fechado durante o provisionamento; resultado descartado",
                    wizard_id
                );
                Err(AppError::WizardClosed)
            }
        }
    }

    // Estágio 2: vincula cada membro selecionado a TODOS os turnos em cache.
    pub async fn submit_assignments(
        &self,
        pool: &PgPool,
        wizard_id: Uuid,
        staff_ids: &[Uuid],
        technician_ids: &[Uuid],
    ) -> Result<AssignmentStageResult, AppError> {
        let shift_ids: Vec<Uuid>;
        {
            let sessions = self.sessions()?;
            let wizard = sessions
                .get(&wizard_id)
                .ok_or_else(|| AppError::ResourceNotFound("Assistente".to_string()))?;
            wizard.expect_stage(WizardStage::AssignPersonnel)?;
            if wizard.shift_ids().is_empty() {
                return Err(AppError::InvalidWizardTransition(
                    "não há turnos provisionados nesta corrida".to_string(),
                ));
            }
            shift_ids = wizard.shift_ids().to_vec();
        }

        // Guarda da etapa: pelo menos um membro (staff OU técnico)
        let member_ids: Vec<Uuid> = staff_ids
            .iter()
            .chain(technician_ids.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if member_ids.is_empty() {
            let mut errors = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("length");
            err.message = Some("Selecione pelo menos um membro (staff ou técnico).".into());
            errors.add("members", err);
            return Err(errors.into());
        }

        let outcomes = self
            .assignments
            .assign_cohort(pool, &member_ids, &shift_ids)
            .await?;

        let all_succeeded = outcomes.iter().all(|o| o.succeeded());

        let mut sessions = self.sessions()?;
        match sessions.get_mut(&wizard_id) {
            Some(wizard) => {
                if all_succeeded {
                    wizard.record_assignments(&member_ids)?;
                } else {
                    tracing::warn!(
                        "Assistente {}: vínculo parcial, etapa mantida para reenvio",
                        wizard_id
                    );
                }
                Ok(AssignmentStageResult {
                    advanced: all_succeeded,
                    outcomes,
                    wizard: wizard.snapshot(),
                })
            }
            None => {
                tracing::warn!(
                    "Assistente {} fechado durante os vínculos; resultado descartado",
                    wizard_id
                );
                Err(AppError::WizardClosed)
            }
        }
    }

    // Estágio 3: expande a janela em vagas sobre as datas dos turnos criados.
    pub async fn submit_slots(
        &self,
        pool: &PgPool,
        wizard_id: Uuid,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: i32,
        capacity: i32,
    ) -> Result<WizardSnapshot, AppError> {
        let (center_id, shift_ids) = {
            let sessions = self.sessions()?;
            let wizard = sessions
                .get(&wizard_id)
                .ok_or_else(|| AppError::ResourceNotFound("Assistente".to_string()))?;
            wizard.expect_stage(WizardStage::GenerateSlots)?;
            let center_id = wizard.center_id().ok_or_else(|| {
                AppError::InvalidWizardTransition("nenhum centro selecionado".to_string())
            })?;
            (center_id, wizard.shift_ids().to_vec())
        };

        // Reconfere no banco: todos os turnos em cache precisam existir e
        // pertencer ao MESMO centro da corrida.
        let shifts = self.shift_repo.list_by_ids(pool, &shift_ids).await?;
        if shifts.is_empty() {
            return Err(AppError::InvalidWizardTransition(
                "os turnos desta corrida não existem mais".to_string(),
            ));
        }
        if shifts.iter().any(|s| s.center_id != center_id) {
            return Err(AppError::MixedCenters);
        }

        // Datas normalizadas (sem repetição, em ordem)
        let dates: Vec<NaiveDate> = shifts
            .iter()
            .map(|s| s.shift_date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let summary = self
            .slots
            .generate(
                pool,
                &[center_id],
                &dates,
                start_time,
                end_time,
                duration_minutes,
                capacity,
            )
            .await?;

        let mut sessions = self.sessions()?;
        match sessions.get_mut(&wizard_id) {
            Some(wizard) => {
                wizard.record_generation(summary)?;
                Ok(wizard.snapshot())
            }
            None => {
                tracing::warn!(
                    "Assistente {} fechado durante a geração de vagas; resultado descartado",
                    wizard_id
                );
                Err(AppError::WizardClosed)
            }
        }
    }

    pub fn back(&self, wizard_id: Uuid) -> Result<WizardSnapshot, AppError> {
        let mut sessions = self.sessions()?;
        let wizard = sessions
            .get_mut(&wizard_id)
            .ok_or_else(|| AppError::ResourceNotFound("Assistente".to_string()))?;
        wizard.back()?;
        Ok(wizard.snapshot())
    }

    // Cancelar/fechar descarta todo o estado local do assistente.
    pub fn cancel(&self, wizard_id: Uuid) -> Result<(), AppError> {
        let removed = self.sessions()?.remove(&wizard_id);
        if removed.is_none() {
            return Err(AppError::ResourceNotFound("Assistente".to_string()));
        }
        tracing::info!("Assistente {} cancelado", wizard_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scheduling::ShiftStatus;

    fn shift(date: NaiveDate, center_id: Uuid) -> WorkShift {
        WorkShift {
            id: Uuid::new_v4(),
            shift_code: "TUR-TESTE".to_string(),
            shift_date: date,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            status: ShiftStatus::Active,
            center_id,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn assistente_novo_comeca_no_estagio_1_vazio() {
        let wizard = ShiftWizard::new();
        assert_eq!(wizard.stage(), WizardStage::CreateShifts);
        assert!(wizard.shift_ids().is_empty());
        assert!(wizard.center_id().is_none());
    }

    #[test]
    fn submit_fora_da_etapa_atual_e_rejeitado() {
        let wizard = ShiftWizard::new();
        let r = wizard.expect_stage(WizardStage::GenerateSlots);
        assert!(matches!(r, Err(AppError::InvalidWizardTransition(_))));
    }

    #[test]
    fn estagio_1_guarda_os_turnos_e_avanca() {
        let mut wizard = ShiftWizard::new();
        let center = Uuid::new_v4();
        let shifts = vec![shift(date(3), center), shift(date(4), center)];

        wizard.record_shifts(center, &shifts).unwrap();

        assert_eq!(wizard.stage(), WizardStage::AssignPersonnel);
        assert_eq!(wizard.shift_ids().len(), 2);
        assert_eq!(wizard.center_id(), Some(center));
    }

    #[test]
    fn estagio_1_sem_turnos_criados_nao_avanca() {
        let mut wizard = ShiftWizard::new();
        let r = wizard.record_shifts(Uuid::new_v4(), &[]);
        assert!(matches!(r, Err(AppError::InvalidWizardTransition(_))));
        assert_eq!(wizard.stage(), WizardStage::CreateShifts);
    }

    #[test]
    fn nao_chega_ao_estagio_3_sem_turnos_em_cache() {
        let mut wizard = ShiftWizard::new();
        // Força a situação: etapa 2 sem turnos registrados
        let r = wizard.record_assignments(&[Uuid::new_v4()]);
        assert!(matches!(r, Err(AppError::InvalidWizardTransition(_))));
    }

    #[test]
    fn fluxo_completo_ate_concluido() {
        let mut wizard = ShiftWizard::new();
        let center = Uuid::new_v4();
        let member = Uuid::new_v4();

        wizard
            .record_shifts(center, &[shift(date(3), center)])
            .unwrap();
        wizard.record_assignments(&[member]).unwrap();
        assert_eq!(wizard.stage(), WizardStage::GenerateSlots);

        wizard
            .record_generation(SlotGenerationSummary {
                created: 4,
                skipped: 0,
            })
            .unwrap();

        assert_eq!(wizard.stage(), WizardStage::Done);
        let snapshot = wizard.snapshot();
        assert_eq!(snapshot.stage, 4);
        assert!(snapshot.generation.is_some());
    }

    #[test]
    fn voltar_restaura_o_estado_mas_preserva_os_dados() {
        let mut wizard = ShiftWizard::new();
        let center = Uuid::new_v4();
        wizard
            .record_shifts(center, &[shift(date(3), center)])
            .unwrap();

        wizard.back().unwrap();

        assert_eq!(wizard.stage(), WizardStage::CreateShifts);
        // Os turnos já criados não são desfeitos pelo "voltar"
        assert_eq!(wizard.shift_ids().len(), 1);
        assert_eq!(wizard.center_id(), Some(center));
    }

    #[test]
    fn voltar_no_estagio_1_e_rejeitado() {
        let mut wizard = ShiftWizard::new();
        assert!(matches!(
            wizard.back(),
            Err(AppError::InvalidWizardTransition(_))
        ));
    }
}
