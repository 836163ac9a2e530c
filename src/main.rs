// ==========================================
// Gestor de Licitações - Entrada principal
// ==========================================
// Stack: Rust + SQLite
// Sobe o estado da aplicação e registra um resumo
// do ambiente; a interface externa (transporte) fica
// fora deste núcleo
// ==========================================

use gestor_licitacoes::api::ApiError;
use gestor_licitacoes::app::{get_default_db_path, AppState};
use gestor_licitacoes::logging;

fn main() -> anyhow::Result<()> {
    // Inicializa o sistema de logs
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", gestor_licitacoes::APP_NAME);
    tracing::info!("versão do sistema: {}", gestor_licitacoes::VERSION);
    tracing::info!("==================================================");

    // Caminho do banco
    let db_path = get_default_db_path();
    tracing::info!("usando banco: {}", db_path);

    // Monta o estado da aplicação
    let app_state = AppState::new(&db_path)?;
    tracing::info!("AppState inicializado");

    // Abertura do caixa é um passo explícito de setup;
    // em execuções seguintes o caixa já existe
    match app_state.financeiro_api.abrir_caixa("sistema") {
        Ok(caixa) => tracing::info!("caixa aberto: id={}", caixa.id),
        Err(ApiError::ValidationError(_)) => tracing::debug!("caixa já aberto"),
        Err(e) => return Err(e.into()),
    }

    // Resumo do ambiente
    let licitacoes = app_state.licitacao_api.listar_licitacoes()?;
    tracing::info!("licitações cadastradas: {}", licitacoes.len());

    let caixa = app_state.financeiro_api.consultar_caixa()?;
    tracing::info!("saldo do caixa: {:.2}", caixa.saldo);

    Ok(())
}
