// ==========================================
// Gestor de Licitações - Tipos de domínio
// ==========================================
// Enums fechados, serializados em minúsculas
// (mesmo formato gravado no banco)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Status de vigência do contrato
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusContrato {
    Vigente,   // dentro da janela de vigência
    Encerrado, // encerrado administrativamente
    Vencido,   // data fim ultrapassada
}

impl fmt::Display for StatusContrato {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusContrato::Vigente => write!(f, "vigente"),
            StatusContrato::Encerrado => write!(f, "encerrado"),
            StatusContrato::Vencido => write!(f, "vencido"),
        }
    }
}

impl StatusContrato {
    /// Converte a partir da string gravada no banco / recebida da API
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vigente" => Some(StatusContrato::Vigente),
            "encerrado" => Some(StatusContrato::Encerrado),
            "vencido" => Some(StatusContrato::Vencido),
            _ => None,
        }
    }

    /// String gravada no banco
    pub fn to_db_str(&self) -> &'static str {
        match self {
            StatusContrato::Vigente => "vigente",
            StatusContrato::Encerrado => "encerrado",
            StatusContrato::Vencido => "vencido",
        }
    }
}

// ==========================================
// Status de pagamento do contrato
// ==========================================
// Máquina de estados unidirecional: pendente -> pago
// Não há transição reversa definida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPagamento {
    Pendente,
    Pago,
}

impl fmt::Display for StatusPagamento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPagamento::Pendente => write!(f, "pendente"),
            StatusPagamento::Pago => write!(f, "pago"),
        }
    }
}

impl StatusPagamento {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pendente" => Some(StatusPagamento::Pendente),
            "pago" => Some(StatusPagamento::Pago),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            StatusPagamento::Pendente => "pendente",
            StatusPagamento::Pago => "pago",
        }
    }
}

// ==========================================
// Tipo de movimentação de caixa
// ==========================================
// Crédito e débito são as únicas operações que mutam o saldo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimentacao {
    Credito,
    Debito,
}

impl fmt::Display for TipoMovimentacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipoMovimentacao::Credito => write!(f, "credito"),
            TipoMovimentacao::Debito => write!(f, "debito"),
        }
    }
}

impl TipoMovimentacao {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credito" => Some(TipoMovimentacao::Credito),
            "debito" => Some(TipoMovimentacao::Debito),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            TipoMovimentacao::Credito => "credito",
            TipoMovimentacao::Debito => "debito",
        }
    }
}

// ==========================================
// Origem de movimentação de caixa
// ==========================================
// Toda mutação do saldo carrega a origem no extrato,
// inclusive as automáticas (contrato/pedido/despesa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrigemMovimentacao {
    Contrato, // crédito na transição de pagamento do contrato
    Pedido,   // crédito de pedido pago
    Despesa,  // débito de despesa quitada
    Manual,   // lançamento manual do usuário
}

impl fmt::Display for OrigemMovimentacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrigemMovimentacao::Contrato => write!(f, "contrato"),
            OrigemMovimentacao::Pedido => write!(f, "pedido"),
            OrigemMovimentacao::Despesa => write!(f, "despesa"),
            OrigemMovimentacao::Manual => write!(f, "manual"),
        }
    }
}

impl OrigemMovimentacao {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "contrato" => Some(OrigemMovimentacao::Contrato),
            "pedido" => Some(OrigemMovimentacao::Pedido),
            "despesa" => Some(OrigemMovimentacao::Despesa),
            "manual" => Some(OrigemMovimentacao::Manual),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            OrigemMovimentacao::Contrato => "contrato",
            OrigemMovimentacao::Pedido => "pedido",
            OrigemMovimentacao::Despesa => "despesa",
            OrigemMovimentacao::Manual => "manual",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_pagamento_round_trip() {
        assert_eq!(StatusPagamento::from_str("PAGO"), Some(StatusPagamento::Pago));
        assert_eq!(StatusPagamento::Pago.to_db_str(), "pago");
        assert_eq!(StatusPagamento::from_str("estornado"), None);
    }

    #[test]
    fn test_status_contrato_from_str() {
        assert_eq!(StatusContrato::from_str("vigente"), Some(StatusContrato::Vigente));
        assert_eq!(StatusContrato::from_str("invalido"), None);
    }
}
