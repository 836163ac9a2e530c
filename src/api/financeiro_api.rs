// ==========================================
// Gestor de Licitações - API financeira
// ==========================================
// Responsabilidade: caixa compartilhado
// - abertura explícita (sem "cria se não existir")
// - lançamentos manuais de crédito/débito
// - extrato append-only
// Os créditos automáticos de contrato chegam pela ponte
// do repositório, na transação da transição de pagamento
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::caixa::{Caixa, MovimentacaoCaixa};
use crate::domain::types::{OrigemMovimentacao, TipoMovimentacao};
use crate::repository::caixa_repo::CaixaRepository;

// ==========================================
// FinanceiroApi - API financeira
// ==========================================

/// API financeira
///
/// Responsabilidades:
/// 1. Abertura explícita do caixa (passo de setup da conta)
/// 2. Consulta de saldo
/// 3. Lançamentos manuais, sempre etiquetados no extrato
pub struct FinanceiroApi {
    caixa_repo: Arc<CaixaRepository>,
}

impl FinanceiroApi {
    /// Cria a API financeira
    pub fn new(caixa_repo: Arc<CaixaRepository>) -> Self {
        Self { caixa_repo }
    }

    /// Abre o caixa com saldo zero
    ///
    /// # Retorno
    /// - Ok(Caixa): caixa recém-aberto
    /// - Err(ValidationError): já existe caixa aberto
    pub fn abrir_caixa(&self, usuario: &str) -> ApiResult<Caixa> {
        let caixa = self.caixa_repo.abrir()?;

        info!("caixa aberto: id={}, usuario={}", caixa.id, usuario);
        Ok(caixa)
    }

    /// Consulta o caixa
    ///
    /// # Retorno
    /// - Ok(Caixa): caixa com o saldo atual
    /// - Err(NotFound): caixa ainda não aberto
    pub fn consultar_caixa(&self) -> ApiResult<Caixa> {
        self.caixa_repo
            .buscar()?
            .ok_or_else(|| ApiError::NotFound("Caixa ainda não aberto".to_string()))
    }

    /// Registra um lançamento manual de crédito ou débito
    ///
    /// # Parâmetros
    /// - tipo: "credito" ou "debito"
    /// - valor: valor absoluto (positivo)
    /// - descricao: descrição da entrada no extrato
    /// - usuario: identidade autenticada (repassada)
    ///
    /// # Retorno
    /// - Ok(Caixa): caixa com o saldo após o lançamento
    pub fn registrar_movimento_manual(
        &self,
        tipo: &str,
        valor: f64,
        descricao: &str,
        usuario: &str,
    ) -> ApiResult<Caixa> {
        let tipo = TipoMovimentacao::from_str(tipo).ok_or_else(|| {
            ApiError::ValidationError(format!("tipo de movimentação inválido: {}", tipo))
        })?;
        if valor <= 0.0 {
            return Err(ApiError::ValidationError(format!(
                "valor da movimentação deve ser positivo: {}",
                valor
            )));
        }
        if descricao.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "descrição da movimentação não pode ser vazia".to_string(),
            ));
        }

        let movimento = self.caixa_repo.registrar_movimento(
            tipo,
            OrigemMovimentacao::Manual,
            None,
            valor,
            descricao.trim(),
        )?;

        info!(
            "movimentação manual: tipo={}, valor={:.2}, usuario={}",
            movimento.tipo, movimento.valor, usuario
        );

        self.consultar_caixa()
    }

    /// Lista o extrato do caixa (mais recentes primeiro)
    pub fn listar_movimentos(&self) -> ApiResult<Vec<MovimentacaoCaixa>> {
        Ok(self.caixa_repo.listar_movimentos()?)
    }
}
