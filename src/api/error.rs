// ==========================================
// Gestor de Licitações - Erros da camada de API
// ==========================================
// Responsabilidade: traduzir erros do repositório em
// mensagens de negócio legíveis; toda falha carrega a
// razão explícita
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Erros da camada de API
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Erros de negócio
    // ==========================================
    #[error("registro não encontrado: {0}")]
    NotFound(String),

    #[error("entrada inválida: {0}")]
    ValidationError(String),

    /// Fornecimento estouraria a quantidade contratada do item
    #[error(
        "quantidade excede o restante do item {item_id}: solicitado={solicitado}, restante={restante}"
    )]
    QuantityExceeded {
        item_id: String,
        solicitado: f64,
        restante: f64,
    },

    #[error("transição de status inválida: de {from} para {to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // Controle de concorrência
    // ==========================================
    #[error("conflito de escrita concorrente: {0}")]
    Conflict(String),

    // ==========================================
    // Acesso a dados
    // ==========================================
    #[error("erro de banco de dados: {0}")]
    DatabaseError(String),

    #[error("falha de conexão com o banco: {0}")]
    DatabaseConnectionError(String),

    #[error("falha de transação no banco: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // Genérico
    // ==========================================
    #[error("erro interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// Conversão de RepositoryError
// Objetivo: transformar o erro técnico do repositório
// no erro de negócio correspondente
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // Concorrência
            RepositoryError::Conflict(msg) => ApiError::Conflict(msg),

            // Banco
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={}) não existe", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("falha ao obter lock do banco: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::ValidationError(format!("violação de unicidade: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ValidationError(format!("violação de integridade: {}", msg))
            }

            // Regras de negócio
            RepositoryError::BusinessRuleViolation(msg) => ApiError::ValidationError(msg),
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            RepositoryError::QuantityExceeded {
                item_id,
                solicitado,
                restante,
            } => ApiError::QuantityExceeded {
                item_id,
                solicitado,
                restante,
            },

            // Qualidade de dados
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),

            // Genérico
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Alias de Result da camada
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversao_not_found() {
        let repo_err = RepositoryError::NotFound {
            entity: "Contrato".to_string(),
            id: "C001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Contrato"));
                assert!(msg.contains("C001"));
            }
            _ => panic!("esperado NotFound"),
        }
    }

    #[test]
    fn test_conversao_quantidade_excedida() {
        let repo_err = RepositoryError::QuantityExceeded {
            item_id: "I001".to_string(),
            solicitado: 80.0,
            restante: 70.0,
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::QuantityExceeded {
                item_id,
                solicitado,
                restante,
            } => {
                assert_eq!(item_id, "I001");
                assert_eq!(solicitado, 80.0);
                assert_eq!(restante, 70.0);
            }
            _ => panic!("esperado QuantityExceeded"),
        }
    }

    #[test]
    fn test_conversao_conflito() {
        let repo_err = RepositoryError::Conflict("database is locked".to_string());
        let api_err: ApiError = repo_err.into();
        assert!(matches!(api_err, ApiError::Conflict(_)));
    }
}
