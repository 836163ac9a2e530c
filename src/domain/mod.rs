// ==========================================
// Gestor de Licitações - Camada de domínio
// ==========================================
// Responsabilidade: entidades e tipos fechados
// Restrição: sem acesso a dados, sem regra de engine
// ==========================================

pub mod caixa;
pub mod contrato;
pub mod types;

// Reexportação dos tipos centrais
pub use caixa::{Caixa, MovimentacaoCaixa};
pub use contrato::{
    Contrato, DespesaFornecimento, EncargosContrato, Fornecimento, ItemContrato, ResumoContrato,
    VigenciaContrato,
};
pub use types::{OrigemMovimentacao, StatusContrato, StatusPagamento, TipoMovimentacao};
