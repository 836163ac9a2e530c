// ==========================================
// Gestor de Licitações - Camada de aplicação
// ==========================================
// Responsabilidade: montar o estado da aplicação
// (conexão compartilhada + repositórios + engines + APIs)
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::Connection;

use crate::api::{FinanceiroApi, LicitacaoApi};
use crate::config::ConfigManager;
use crate::db;
use crate::engine::{AlertaEngine, ResumoEngine};
use crate::repository::{CaixaRepository, ContratoRepository};

// ==========================================
// AppState - estado da aplicação
// ==========================================

/// Estado da aplicação
///
/// Todos os repositórios compartilham a mesma conexão SQLite
/// (serializada por Mutex); as escritas sensíveis continuam
/// protegidas pelos UPDATEs condicionais dos repositórios.
pub struct AppState {
    pub config_manager: Arc<ConfigManager>,
    pub licitacao_api: Arc<LicitacaoApi>,
    pub financeiro_api: Arc<FinanceiroApi>,
}

impl AppState {
    /// Monta o estado completo a partir do caminho do banco
    ///
    /// Aplica os PRAGMA unificados e cria o schema (idempotente)
    /// antes de montar repositórios, engines e APIs.
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        // 1. Conexão compartilhada + schema
        let conn = db::open_sqlite_connection(db_path)
            .with_context(|| format!("falha ao abrir o banco em {}", db_path))?;
        db::init_schema(&conn).context("falha ao criar o schema do banco")?;
        let conn = Arc::new(Mutex::new(conn));

        // 2. Configuração e engines
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| anyhow::anyhow!("falha ao montar ConfigManager: {}", e))?,
        );
        let resumo_engine = Arc::new(ResumoEngine::new());
        let alerta_engine = Arc::new(AlertaEngine::from_config(&config_manager));

        // 3. Repositórios sobre a conexão compartilhada
        let contrato_repo = Arc::new(ContratoRepository::from_connection(conn.clone()));
        let caixa_repo = Arc::new(CaixaRepository::from_connection(conn));

        // 4. APIs
        let licitacao_api = Arc::new(LicitacaoApi::new(
            contrato_repo,
            resumo_engine,
            alerta_engine,
        ));
        let financeiro_api = Arc::new(FinanceiroApi::new(caixa_repo));

        Ok(Self {
            config_manager,
            licitacao_api,
            financeiro_api,
        })
    }

    /// Monta o estado sobre uma conexão já aberta (testes)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> anyhow::Result<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| anyhow::anyhow!("falha ao obter lock da conexão: {}", e))?;
            db::init_schema(&guard).context("falha ao criar o schema do banco")?;
        }

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| anyhow::anyhow!("falha ao montar ConfigManager: {}", e))?,
        );
        let resumo_engine = Arc::new(ResumoEngine::new());
        let alerta_engine = Arc::new(AlertaEngine::from_config(&config_manager));

        let contrato_repo = Arc::new(ContratoRepository::from_connection(conn.clone()));
        let caixa_repo = Arc::new(CaixaRepository::from_connection(conn));

        let licitacao_api = Arc::new(LicitacaoApi::new(
            contrato_repo,
            resumo_engine,
            alerta_engine,
        ));
        let financeiro_api = Arc::new(FinanceiroApi::new(caixa_repo));

        Ok(Self {
            config_manager,
            licitacao_api,
            financeiro_api,
        })
    }
}

/// Caminho padrão do banco de dados
///
/// Usa o diretório de dados da plataforma; cai no diretório
/// corrente quando indisponível.
pub fn get_default_db_path() -> String {
    let base: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join("gestor-licitacoes");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!("falha ao criar diretório de dados {}: {}", dir.display(), e);
        return "gestor.db".to_string();
    }
    dir.join("gestor.db").to_string_lossy().into_owned()
}
