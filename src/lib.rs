// ==========================================
// Gestor de Licitações - Biblioteca principal
// ==========================================
// Stack: Rust + SQLite
// Escopo: contratos de licitação, fornecimentos
// parciais, alertas e caixa compartilhado
// ==========================================

// ==========================================
// Declaração de módulos
// ==========================================

// Camada de domínio - entidades e tipos
pub mod domain;

// Camada de repositório - acesso a dados
pub mod repository;

// Camada de engine - regras de negócio
pub mod engine;

// Camada de configuração
pub mod config;

// Infraestrutura de banco (conexão/PRAGMA unificados)
pub mod db;

// Sistema de logs
pub mod logging;

// Camada de API - interface de negócio
pub mod api;

// Camada de aplicação - montagem do estado
pub mod app;

// ==========================================
// Reexportação dos tipos centrais
// ==========================================

// Tipos de domínio
pub use domain::types::{OrigemMovimentacao, StatusContrato, StatusPagamento, TipoMovimentacao};

// Entidades de domínio
pub use domain::{
    Caixa, Contrato, DespesaFornecimento, EncargosContrato, Fornecimento, ItemContrato,
    MovimentacaoCaixa, ResumoContrato, VigenciaContrato,
};

// Engines
pub use engine::{AlertaEngine, ResumoEngine};

// API
pub use api::{FinanceiroApi, LicitacaoApi};

// ==========================================
// Constantes do sistema
// ==========================================

// Versão do sistema
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Nome do sistema
pub const APP_NAME: &str = "Gestor de Licitações";

// Versão do schema do banco
pub const DB_VERSION: &str = "v1";
