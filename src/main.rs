//src/main.rs

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização (cria as chaves únicas
    // compostas de vínculos e vagas)
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Turnos, vínculos e vagas (as operações que o assistente orquestra)
    let scheduling_routes = Router::new()
        .route(
            "/shifts/bulk",
            post(handlers::scheduling::create_work_shifts_bulk),
        )
        .route("/shifts", get(handlers::scheduling::list_work_shifts))
        .route(
            "/shifts/{shift_id}",
            delete(handlers::scheduling::delete_work_shift),
        )
        .route(
            "/assignments",
            post(handlers::scheduling::assign_member_to_shifts)
                .get(handlers::scheduling::list_assignments_by_member),
        )
        .route(
            "/assignments/cohort",
            post(handlers::scheduling::assign_cohort),
        )
        .route(
            "/assignments/{assignment_id}",
            patch(handlers::scheduling::retarget_assignment)
                .delete(handlers::scheduling::delete_assignment),
        )
        .route("/slots/generate", post(handlers::scheduling::generate_slots))
        .route("/slots", get(handlers::scheduling::list_slots));

    // Assistente de provisionamento (4 estágios)
    let wizard_routes = Router::new()
        .route("/", post(handlers::wizard::open_wizard))
        .route(
            "/{wizard_id}",
            get(handlers::wizard::get_wizard).delete(handlers::wizard::cancel),
        )
        .route("/{wizard_id}/shifts", post(handlers::wizard::submit_shifts))
        .route(
            "/{wizard_id}/assignments",
            post(handlers::wizard::submit_assignments),
        )
        .route("/{wizard_id}/slots", post(handlers::wizard::submit_slots))
        .route("/{wizard_id}/back", post(handlers::wizard::back));

    // Quadro interativo da agenda dos técnicos
    let scheduler_routes = Router::new()
        .route("/boards", post(handlers::scheduler::open_board))
        .route(
            "/boards/{board_id}",
            delete(handlers::scheduler::close_board),
        )
        .route(
            "/boards/{board_id}/events",
            get(handlers::scheduler::list_events).post(handlers::scheduler::create_event),
        )
        .route(
            "/boards/{board_id}/events/{event_id}/resize",
            patch(handlers::scheduler::resize_event),
        )
        .route(
            "/boards/{board_id}/events/{event_id}/move",
            patch(handlers::scheduler::move_event),
        )
        .route(
            "/boards/{board_id}/events/{event_id}/status",
            patch(handlers::scheduler::change_event_status),
        );

    // Grade mensal e gráfico de presença
    let calendar_routes = Router::new()
        .route("/month", get(handlers::calendar::month_view))
        .route("/attendance", get(handlers::calendar::attendance));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/members", get(handlers::members::list_members))
        .route("/api/centers", get(handlers::members::list_centers))
        .nest("/api/scheduling", scheduling_routes)
        .nest("/api/wizard", wizard_routes)
        .nest("/api/scheduler", scheduler_routes)
        .nest("/api/calendar", calendar_routes)
        .merge(
            SwaggerUi::new("/api/docs")
                .url("/api/docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
