// ==========================================
// Gestor de Licitações - Camada de API
// ==========================================
// Responsabilidade: interface de negócio
// - valida entrada antes de tocar o repositório
// - traduz erros técnicos em erros de negócio legíveis
// ==========================================

pub mod error;
pub mod financeiro_api;
pub mod licitacao_api;

// Reexportação das APIs
pub use error::{ApiError, ApiResult};
pub use financeiro_api::FinanceiroApi;
pub use licitacao_api::{
    LicitacaoApi, LicitacaoDetalhe, NovaDespesaFornecimento, NovaLicitacao, NovoFornecimento,
    NovoItemContrato,
};
