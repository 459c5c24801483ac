// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::db::{
    AssignmentRepository, CenterRepository, MemberRepository, SlotRepository, WorkShiftRepository,
};
use crate::services::{
    AssignmentService, CalendarService, SchedulerService, ShiftProvisioningService,
    SlotGeneratorService, WizardService,
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub member_repo: MemberRepository,
    pub center_repo: CenterRepository,
    pub shift_repo: WorkShiftRepository,
    pub provisioning_service: ShiftProvisioningService,
    pub assignment_service: AssignmentService,
    pub slot_service: SlotGeneratorService,
    pub wizard_service: WizardService,
    pub scheduler_service: SchedulerService,
    pub calendar_service: CalendarService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, quem decide
    // o que fazer é o main (que encerra o processo).
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        let center_repo = CenterRepository::new(db_pool.clone());
        let member_repo = MemberRepository::new(db_pool.clone());
        let shift_repo = WorkShiftRepository::new(db_pool.clone());
        let assignment_repo = AssignmentRepository::new(db_pool.clone());
        let slot_repo = SlotRepository::new(db_pool.clone());

        let provisioning_service =
            ShiftProvisioningService::new(shift_repo.clone(), center_repo.clone());
        let assignment_service = AssignmentService::new(assignment_repo.clone());
        let slot_service = SlotGeneratorService::new(slot_repo);
        let wizard_service = WizardService::new(
            provisioning_service.clone(),
            assignment_service.clone(),
            slot_service.clone(),
            shift_repo.clone(),
        );
        let scheduler_service = SchedulerService::new();
        let calendar_service = CalendarService::new(shift_repo.clone(), assignment_repo);

        Ok(Self {
            db_pool,
            member_repo,
            center_repo,
            shift_repo,
            provisioning_service,
            assignment_service,
            slot_service,
            wizard_service,
            scheduler_service,
            calendar_service,
        })
    }
}
