// ==========================================
// Gestor de Licitações - Camada de repositório
// ==========================================
// Responsabilidade: acesso a dados, escondendo os
// detalhes do banco
// Restrições: repositório não contém regra de negócio;
// toda consulta é parametrizada (sem SQL injection)
// ==========================================

pub mod caixa_repo;
pub mod contrato_repo;
pub mod error;

// Reexportação dos repositórios
pub use caixa_repo::CaixaRepository;
pub use contrato_repo::ContratoRepository;
pub use error::{RepositoryError, RepositoryResult};
