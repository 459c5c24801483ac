use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Nenhum erro deste módulo é fatal para a aplicação: tudo é recuperável
// repetindo a chamada ou fechando e reabrindo o assistente/quadro.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Janela de horário invertida ou vazia (start >= end)
    #[error("Janela de horário inválida: início deve ser antes do fim")]
    InvalidTimeWindow,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    // O detector de sobreposição rejeitou o gesto do quadro
    #[error("Conflito de agenda: o técnico já possui um evento nesse intervalo")]
    ScheduleConflict,

    // Rejeição distinta do conflito: mover/criar trabalho no passado
    #[error("Horário no passado: o evento não pode começar antes de agora")]
    PastTimeRejected,

    // O vínculo (membro, turno) já existe
    #[error("Vínculo duplicado: este membro já está neste turno")]
    DuplicateAssignment,

    // Submit fora do estágio atual do assistente (ou "voltar" no estágio 1)
    #[error("Transição inválida do assistente: {0}")]
    InvalidWizardTransition(String),

    // O assistente foi fechado enquanto a chamada estava em voo:
    // o resultado chegou, mas deve ser descartado.
    #[error("Assistente fechado: resultado da etapa descartado")]
    WizardClosed,

    // Os turnos em cache do assistente não pertencem todos ao mesmo centro
    #[error("Turnos de centros diferentes: a geração de vagas exige um único centro")]
    MixedCenters,

    // Só administradores alteram o status de um evento do quadro
    #[error("Apenas administradores podem alterar o status do evento")]
    StatusChangeForbidden,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidTimeWindow => (
                StatusCode::BAD_REQUEST,
                "O horário de início deve ser estritamente antes do fim.",
            ),
            AppError::ResourceNotFound(ref what) => {
                let body = Json(json!({ "error": format!("{} não encontrado.", what) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::ScheduleConflict => (
                StatusCode::CONFLICT,
                "O técnico já possui um evento nesse intervalo.",
            ),
            AppError::PastTimeRejected => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Não é possível agendar trabalho no passado.",
            ),
            AppError::DuplicateAssignment => (
                StatusCode::CONFLICT,
                "Este membro já está vinculado a este turno.",
            ),
            AppError::InvalidWizardTransition(ref msg) => {
                let body = Json(json!({ "error": format!("Transição inválida: {}", msg) }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::WizardClosed => (
                StatusCode::GONE,
                "O assistente foi fechado; o resultado desta etapa foi descartado.",
            ),
            AppError::MixedCenters => (
                StatusCode::BAD_REQUEST,
                "Todos os turnos devem pertencer ao mesmo centro.",
            ),
            AppError::StatusChangeForbidden => (
                StatusCode::FORBIDDEN,
                "Apenas administradores podem alterar o status.",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
