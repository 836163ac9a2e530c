// ==========================================
// Gestor de Licitações - Modelo de domínio de caixa
// ==========================================
// Caixa: agregado de instância única, criado por passo
// explícito de abertura (sem fallback "cria se não existir")
// Movimentações: sequência append-only; o saldo é o fold
// da sequência, mantido em cache na mesma transação
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{OrigemMovimentacao, TipoMovimentacao};

// ==========================================
// Caixa - saldo compartilhado
// ==========================================
// Compartilhado pelos fluxos de contrato, pedido e despesa,
// além de lançamentos manuais
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caixa {
    pub id: String,
    pub saldo: f64,                // cache transacional do fold do extrato
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// MovimentacaoCaixa - entrada do extrato
// ==========================================
// Toda mutação do saldo gera uma entrada, etiquetada com a
// origem (contrato/pedido/despesa/manual) e a entidade geradora
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovimentacaoCaixa {
    pub id: String,
    pub caixa_id: String,
    pub tipo: TipoMovimentacao,        // credito / debito
    pub origem: OrigemMovimentacao,    // fluxo que originou a entrada
    pub origem_id: Option<String>,     // id da entidade de origem (quando houver)
    pub valor: f64,                    // sempre positivo; o sinal vem do tipo
    pub descricao: String,
    pub created_at: NaiveDateTime,
}

impl MovimentacaoCaixa {
    /// Valor com sinal aplicado (crédito positivo, débito negativo)
    pub fn valor_assinado(&self) -> f64 {
        match self.tipo {
            TipoMovimentacao::Credito => self.valor,
            TipoMovimentacao::Debito => -self.valor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_valor_assinado() {
        let base = MovimentacaoCaixa {
            id: "m1".to_string(),
            caixa_id: "c1".to_string(),
            tipo: TipoMovimentacao::Credito,
            origem: OrigemMovimentacao::Manual,
            origem_id: None,
            valor: 100.0,
            descricao: "teste".to_string(),
            created_at: Utc::now().naive_utc(),
        };
        assert_eq!(base.valor_assinado(), 100.0);

        let debito = MovimentacaoCaixa {
            tipo: TipoMovimentacao::Debito,
            ..base
        };
        assert_eq!(debito.valor_assinado(), -100.0);
    }
}
