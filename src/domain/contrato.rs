// ==========================================
// Gestor de Licitações - Modelo de domínio de contrato
// ==========================================
// Agregado: Contrato -> itens contratados + fornecimentos
// Alinhado às tabelas contrato / contrato_item /
// fornecimento / fornecimento_despesa
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{StatusContrato, StatusPagamento};

// ==========================================
// VigenciaContrato - janela de vigência
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VigenciaContrato {
    pub numero_contrato: String,   // número do contrato firmado
    pub data_inicio: NaiveDate,    // início da vigência
    pub data_fim: NaiveDate,       // fim da vigência
    pub status: StatusContrato,    // vigente / encerrado / vencido
}

impl VigenciaContrato {
    /// Dias inteiros até o fim da vigência (negativo se já passou)
    pub fn dias_restantes(&self, hoje: NaiveDate) -> i64 {
        (self.data_fim - hoje).num_days()
    }

    /// Vigência já ultrapassada na data informada
    pub fn vencida(&self, hoje: NaiveDate) -> bool {
        self.data_fim < hoje
    }
}

// ==========================================
// EncargosContrato - encargos fixos
// ==========================================
// Entram em despesas_totais independentemente do
// andamento dos fornecimentos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncargosContrato {
    pub frete: f64,
    pub impostos: f64,
    pub outras_despesas: f64,
    pub descricao_outras_despesas: Option<String>,
}

impl EncargosContrato {
    /// Soma dos encargos fixos
    pub fn total(&self) -> f64 {
        self.frete + self.impostos + self.outras_despesas
    }
}

// ==========================================
// ItemContrato - produto contratado
// ==========================================
// Invariante: 0 <= quantidade_fornecida <= quantidade_contratada
// quantidade_fornecida só cresce (via registro de fornecimento)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemContrato {
    // ===== Identidade =====
    pub id: String,
    pub contrato_id: String,
    pub produto_id: Option<String>, // referência opcional ao catálogo externo
    pub descricao: String,

    // ===== Quantidades =====
    pub quantidade_contratada: f64,
    pub quantidade_fornecida: f64,
    pub quantidade_restante: f64,   // derivado: contratada - fornecida

    // ===== Economia unitária =====
    pub preco_compra: f64,
    pub preco_venda: f64,
    pub despesas_extras: f64,       // despesa extra por unidade
    pub lucro_unitario: f64,        // derivado: venda - compra - extras

    // ===== Posição no contrato =====
    pub ordem: i32,
}

impl ItemContrato {
    /// Lucro unitário derivado dos preços e despesas extras
    pub fn calcular_lucro_unitario(preco_venda: f64, preco_compra: f64, despesas_extras: f64) -> f64 {
        preco_venda - preco_compra - despesas_extras
    }
}

// ==========================================
// DespesaFornecimento - despesa avulsa de um fornecimento
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DespesaFornecimento {
    pub descricao: String,
    pub valor: f64,
}

// ==========================================
// Fornecimento - entrega parcial contra um item
// ==========================================
// Imutável após criado; o log é append-only, ordenado
// pelo instante de registro e nunca reordenado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fornecimento {
    pub id: String,
    pub contrato_id: String,
    pub item_id: String,
    pub quantidade: f64,
    pub data_fornecimento: NaiveDate,
    pub numero_nota_fornecimento: Option<String>, // nota/empenho de referência
    pub observacao: Option<String>,
    pub despesas: Vec<DespesaFornecimento>,
    pub despesa_total: f64,                       // derivado: soma das despesas
    pub created_at: NaiveDateTime,
}

// ==========================================
// ResumoContrato - agregados derivados
// ==========================================
// Recalculado a cada mutação e persistido junto ao
// contrato; nunca é fonte de verdade independente.
//
// Assimetria intencional:
// - valores de venda/compra usam a quantidade CONTRATADA
//   (valor de catálogo do contrato)
// - lucro usa a quantidade FORNECIDA (resultado realizado)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumoContrato {
    pub quantidade_total_contratada: f64,
    pub quantidade_total_fornecida: f64,
    pub quantidade_total_restante: f64,
    pub percentual_executado: f64,  // 0..=100; 0 quando nada foi contratado
    pub valor_total_venda: f64,     // soma preco_venda x contratada
    pub valor_total_compra: f64,    // soma preco_compra x contratada
    pub despesas_totais: f64,       // encargos fixos + despesas de fornecimentos
    pub lucro_total: f64,           // realizado sobre quantidades fornecidas
}

impl ResumoContrato {
    /// Resumo zerado (contrato sem itens)
    pub fn zerado() -> Self {
        Self {
            quantidade_total_contratada: 0.0,
            quantidade_total_fornecida: 0.0,
            quantidade_total_restante: 0.0,
            percentual_executado: 0.0,
            valor_total_venda: 0.0,
            valor_total_compra: 0.0,
            despesas_totais: 0.0,
            lucro_total: 0.0,
        }
    }
}

// ==========================================
// Contrato - raiz do agregado
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contrato {
    // ===== Identidade e dados da licitação =====
    pub id: String,
    pub numero_licitacao: String,
    pub cidade: String,
    pub estado: String,
    pub orgao_publico: String,     // órgão que adjudicou a licitação

    // ===== Empenho =====
    pub numero_empenho: String,
    pub data_empenho: NaiveDate,   // data de adjudicação; ordena a listagem
    pub numero_nota_empenho: String,

    // ===== Vigência e encargos =====
    pub vigencia: VigenciaContrato,
    pub encargos: EncargosContrato,

    // ===== Pagamento =====
    pub status_pagamento: StatusPagamento,

    // ===== Previsões =====
    pub previsao_fornecimento: Option<NaiveDate>,
    pub previsao_pagamento: Option<NaiveDate>,

    // ===== Derivados e coleções =====
    pub resumo: ResumoContrato,
    pub itens: Vec<ItemContrato>,
    pub fornecimentos: Vec<Fornecimento>,

    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encargos_total() {
        let encargos = EncargosContrato {
            frete: 150.0,
            impostos: 200.0,
            outras_despesas: 75.0,
            descricao_outras_despesas: Some("Taxas administrativas".to_string()),
        };
        assert_eq!(encargos.total(), 425.0);
    }

    #[test]
    fn test_vigencia_dias_restantes() {
        let vigencia = VigenciaContrato {
            numero_contrato: "CT-2025/001".to_string(),
            data_inicio: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            data_fim: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: StatusContrato::Vigente,
        };

        let hoje = NaiveDate::from_ymd_opt(2025, 12, 21).unwrap();
        assert_eq!(vigencia.dias_restantes(hoje), 10);
        assert!(!vigencia.vencida(hoje));

        let depois = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(vigencia.vencida(depois));
    }

    #[test]
    fn test_lucro_unitario() {
        assert_eq!(ItemContrato::calcular_lucro_unitario(15.75, 10.50, 1.25), 4.0);
    }
}
