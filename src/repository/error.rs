// ==========================================
// Gestor de Licitações - Erros da camada de repositório
// ==========================================
// Ferramenta: macro derive do thiserror
// ==========================================

use thiserror::Error;

/// Erros da camada de repositório
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Controle de concorrência =====
    #[error("conflito de escrita concorrente: {0}")]
    Conflict(String),

    // ===== Erros de banco =====
    #[error("registro não encontrado: {entity} com id={id}")]
    NotFound { entity: String, id: String },

    #[error("falha de conexão com o banco: {0}")]
    DatabaseConnectionError(String),

    #[error("falha ao obter lock do banco: {0}")]
    LockError(String),

    #[error("falha de transação no banco: {0}")]
    DatabaseTransactionError(String),

    #[error("falha de consulta no banco: {0}")]
    DatabaseQueryError(String),

    #[error("violação de restrição de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("violação de chave estrangeira: {0}")]
    ForeignKeyViolation(String),

    // ===== Regras de negócio =====
    #[error("regra de negócio violada: {0}")]
    BusinessRuleViolation(String),

    #[error("transição de status inválida: de {from} para {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error(
        "quantidade excede o restante do item {item_id}: solicitado={solicitado}, restante={restante}"
    )]
    QuantityExceeded {
        item_id: String,
        solicitado: f64,
        restante: f64,
    },

    // ===== Qualidade de dados =====
    #[error("falha de validação de dados: {0}")]
    ValidationError(String),

    // ===== Genérico =====
    #[error("erro interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// Conversão de rusqlite::Error
// SQLITE_BUSY / SQLITE_LOCKED viram Conflict explícito;
// as demais falhas caem nas variantes de consulta
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let detail = msg.unwrap_or_else(|| code.to_string());
                match code.code {
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                        RepositoryError::Conflict(detail)
                    }
                    _ => {
                        if detail.contains("UNIQUE") {
                            RepositoryError::UniqueConstraintViolation(detail)
                        } else if detail.contains("FOREIGN KEY") {
                            RepositoryError::ForeignKeyViolation(detail)
                        } else {
                            RepositoryError::DatabaseQueryError(detail)
                        }
                    }
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Desconhecida".to_string(),
                id: "desconhecido".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Alias de Result da camada
pub type RepositoryResult<T> = Result<T, RepositoryError>;
