// ==========================================
// Gestor de Licitações - Camada de configuração
// ==========================================
// Responsabilidade: configuração do sistema
// Armazenamento: tabela config_kv
// ==========================================

pub mod config_manager;

// Reexportação do gerenciador de configuração
pub use config_manager::{config_keys, ConfigManager};
