// ==========================================
// Gestor de Licitações - Engine de alertas
// ==========================================
// Responsabilidade: alertas de vencimento e de
// execução do contrato
// Avaliado a cada leitura com a data fornecida pelo
// chamador; nunca persistido
// ==========================================

use chrono::NaiveDate;

use crate::config::config_manager::{config_keys, ConfigManager};
use crate::domain::contrato::{ResumoContrato, VigenciaContrato};

/// Janela padrão de aviso antes do vencimento (dias)
pub const DIAS_AVISO_VENCIMENTO_PADRAO: i64 = 30;

/// Limiar padrão do alerta de execução (%)
pub const LIMIAR_EXECUCAO_PCT_PADRAO: f64 = 90.0;

// ==========================================
// AlertaEngine - avaliador de alertas
// ==========================================
#[derive(Debug)]
pub struct AlertaEngine {
    dias_aviso_vencimento: i64,
    limiar_execucao_pct: f64,
}

impl Default for AlertaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertaEngine {
    /// Engine com os limiares padrão
    pub fn new() -> Self {
        Self {
            dias_aviso_vencimento: DIAS_AVISO_VENCIMENTO_PADRAO,
            limiar_execucao_pct: LIMIAR_EXECUCAO_PCT_PADRAO,
        }
    }

    /// Engine com limiares vindos da configuração
    /// (config_kv), caindo nos padrões quando ausentes
    pub fn from_config(config: &ConfigManager) -> Self {
        let dias_aviso_vencimento = config
            .get_i64(config_keys::DIAS_AVISO_VENCIMENTO)
            .ok()
            .flatten()
            .unwrap_or(DIAS_AVISO_VENCIMENTO_PADRAO);
        let limiar_execucao_pct = config
            .get_f64(config_keys::LIMIAR_EXECUCAO_PCT)
            .ok()
            .flatten()
            .unwrap_or(LIMIAR_EXECUCAO_PCT_PADRAO);

        Self {
            dias_aviso_vencimento,
            limiar_execucao_pct,
        }
    }

    /// Avalia os alertas do contrato para a data informada
    ///
    /// Ordem garantida: alerta de vencimento (se houver) antes do
    /// alerta de execução (se houver). Determinístico para um mesmo
    /// par (estado do contrato, hoje).
    ///
    /// # Parâmetros
    /// - `vigencia`: janela de vigência do contrato
    /// - `resumo`: agregados atuais do contrato
    /// - `hoje`: data de referência fornecida pelo chamador
    ///
    /// # Retorno
    /// Lista de alertas legíveis (vazia quando não há nada a avisar)
    pub fn avaliar(
        &self,
        vigencia: &VigenciaContrato,
        resumo: &ResumoContrato,
        hoje: NaiveDate,
    ) -> Vec<String> {
        let mut alertas = Vec::new();

        // 1. Vencimento da vigência
        if vigencia.vencida(hoje) {
            alertas.push("Contrato VENCIDO".to_string());
        } else {
            let dias = vigencia.dias_restantes(hoje);
            if dias <= self.dias_aviso_vencimento {
                alertas.push(format!("Contrato vence em {} dias", dias));
            }
        }

        // 2. Limiar de execução
        if resumo.quantidade_total_contratada > 0.0 {
            if resumo.quantidade_total_fornecida >= resumo.quantidade_total_contratada {
                alertas.push("Contrato totalmente executado".to_string());
            } else if resumo.percentual_executado >= self.limiar_execucao_pct {
                alertas.push(format!(
                    "Contrato {:.1}% executado",
                    resumo.percentual_executado
                ));
            }
        }

        alertas
    }
}
