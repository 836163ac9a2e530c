// ==========================================
// Gestor de Licitações - Engine de resumo
// ==========================================
// Responsabilidade: derivar os agregados do contrato
// Entrada: itens + encargos fixos + fornecimentos
// Saída: ResumoContrato
// ==========================================
// Função pura: mesmo estado de entrada, mesmo resumo.
// A persistência fica a cargo do chamador.
// ==========================================

use crate::domain::contrato::{
    DespesaFornecimento, EncargosContrato, Fornecimento, ItemContrato, ResumoContrato,
};

// ==========================================
// ResumoEngine - calculadora de agregados
// ==========================================
#[derive(Debug, Default)]
pub struct ResumoEngine {
    // Engine sem estado; não precisa de dependências
}

impl ResumoEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// Calcula o resumo do contrato
    ///
    /// Assimetria preservada de propósito:
    /// - valor_total_venda / valor_total_compra usam a quantidade
    ///   CONTRATADA (valor de catálogo do contrato, independe do
    ///   andamento das entregas)
    /// - lucro_total usa a quantidade FORNECIDA (resultado realizado
    ///   até aqui)
    ///
    /// # Parâmetros
    /// - `itens`: itens contratados
    /// - `encargos`: encargos fixos do contrato
    /// - `fornecimentos`: log de fornecimentos registrados
    ///
    /// # Retorno
    /// ResumoContrato recalculado
    pub fn calcular(
        &self,
        itens: &[ItemContrato],
        encargos: &EncargosContrato,
        fornecimentos: &[Fornecimento],
    ) -> ResumoContrato {
        // 1. Quantidades agregadas
        let quantidade_total_contratada: f64 =
            itens.iter().map(|item| item.quantidade_contratada).sum();
        let quantidade_total_fornecida: f64 =
            itens.iter().map(|item| item.quantidade_fornecida).sum();
        let quantidade_total_restante = quantidade_total_contratada - quantidade_total_fornecida;

        // 2. Percentual executado (0 quando nada foi contratado)
        let percentual_executado = if quantidade_total_contratada > 0.0 {
            quantidade_total_fornecida / quantidade_total_contratada * 100.0
        } else {
            0.0
        };

        // 3. Valores de catálogo sobre a quantidade contratada
        let valor_total_venda: f64 = itens
            .iter()
            .map(|item| item.preco_venda * item.quantidade_contratada)
            .sum();
        let valor_total_compra: f64 = itens
            .iter()
            .map(|item| item.preco_compra * item.quantidade_contratada)
            .sum();

        // 4. Despesas totais: encargos fixos + despesas dos fornecimentos
        let despesas_fornecimentos: f64 =
            fornecimentos.iter().map(|f| f.despesa_total).sum();
        let despesas_totais = encargos.total() + despesas_fornecimentos;

        // 5. Lucro realizado sobre a quantidade fornecida
        let venda_realizada: f64 = itens
            .iter()
            .map(|item| item.preco_venda * item.quantidade_fornecida)
            .sum();
        let compra_realizada: f64 = itens
            .iter()
            .map(|item| item.preco_compra * item.quantidade_fornecida)
            .sum();
        let lucro_total = venda_realizada - compra_realizada - despesas_totais;

        ResumoContrato {
            quantidade_total_contratada,
            quantidade_total_fornecida,
            quantidade_total_restante,
            percentual_executado,
            valor_total_venda,
            valor_total_compra,
            despesas_totais,
            lucro_total,
        }
    }

    /// Soma das despesas avulsas de um fornecimento
    pub fn despesa_total_fornecimento(&self, despesas: &[DespesaFornecimento]) -> f64 {
        despesas.iter().map(|d| d.valor).sum()
    }

    /// Valor a creditar no caixa na transição para pago:
    /// soma de preco_venda x quantidade_fornecida no instante da transição
    pub fn valor_credito_pagamento(&self, itens: &[ItemContrato]) -> f64 {
        itens
            .iter()
            .map(|item| item.preco_venda * item.quantidade_fornecida)
            .sum()
    }
}
