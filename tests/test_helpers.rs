// ==========================================
// Auxiliares de teste
// ==========================================
// Responsabilidade: banco temporário com schema criado
// e construtores de dados de teste compartilhados
// ==========================================

// Helpers compartilhados; nem todo crate de teste usa todos
#![allow(dead_code)]

use chrono::NaiveDate;
use gestor_licitacoes::api::{NovaLicitacao, NovoItemContrato};
use gestor_licitacoes::db;
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// Cria um banco temporário de teste com o schema inicializado
///
/// # Retorno
/// - NamedTempFile: arquivo temporário (precisa ficar vivo)
/// - String: caminho do arquivo do banco
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// Abre uma conexão de teste com os PRAGMA unificados
pub fn open_test_connection(db_path: &str) -> rusqlite::Result<Connection> {
    db::open_sqlite_connection(db_path)
}

/// Licitação base dos testes
///
/// Dois produtos:
/// - Produto A: 100 unidades, venda 15.75, compra 10.50, extras 1.25
/// - Produto B: 50 unidades, venda 35.00, compra 25.00, extras 2.50
/// Encargos fixos: frete 150, impostos 200, outras despesas 75
///
/// Totais esperados na criação: venda 3325.00, compra 2050.00,
/// despesas 425.00, lucro -425.00
pub fn nova_licitacao_base(data_empenho: NaiveDate) -> NovaLicitacao {
    NovaLicitacao {
        numero_licitacao: "PE-001/2025".to_string(),
        cidade: "São Paulo".to_string(),
        estado: "SP".to_string(),
        orgao_publico: "Prefeitura de São Paulo".to_string(),
        numero_empenho: "EMP-2025-001".to_string(),
        data_empenho,
        numero_nota_empenho: "NE-001/2025".to_string(),
        numero_contrato: "CT-2025/001".to_string(),
        data_inicio_contrato: data_empenho,
        data_fim_contrato: data_empenho + chrono::Duration::days(365),
        status_contrato: None,
        produtos: vec![
            NovoItemContrato {
                produto_id: None,
                descricao: "Produto A".to_string(),
                quantidade_contratada: 100.0,
                preco_compra: 10.50,
                preco_venda: 15.75,
                despesas_extras: 1.25,
            },
            NovoItemContrato {
                produto_id: None,
                descricao: "Produto B".to_string(),
                quantidade_contratada: 50.0,
                preco_compra: 25.00,
                preco_venda: 35.00,
                despesas_extras: 2.50,
            },
        ],
        previsao_fornecimento: Some(data_empenho + chrono::Duration::days(30)),
        previsao_pagamento: Some(data_empenho + chrono::Duration::days(60)),
        frete: 150.00,
        impostos: 200.00,
        outras_despesas: 75.00,
        descricao_outras_despesas: Some("Taxas administrativas".to_string()),
    }
}
