// ==========================================
// Gestor de Licitações - Inicialização SQLite
// ==========================================
// Objetivos:
// - Unificar o comportamento de PRAGMA de todas as Connection::open,
//   evitando "módulo com foreign_keys ligado / módulo sem"
// - Unificar busy_timeout, reduzindo erros busy esporádicos em
//   escrita concorrente
// - Centralizar o DDL do schema num único ponto (binário e testes
//   compartilham a mesma fonte)
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// busy_timeout padrão (milissegundos)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version esperado pelo código atual
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Aplica os PRAGMA unificados a uma conexão SQLite
///
/// Observações:
/// - foreign_keys precisa ser ligado por conexão
/// - busy_timeout precisa ser configurado por conexão
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Abre uma conexão SQLite já com a configuração unificada
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Lê o schema_version (None se a tabela não existir)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Cria as tabelas do sistema (idempotente)
///
/// Tabelas:
/// - schema_version: controle de versão do schema
/// - config_kv: configuração chave/valor
/// - contrato / contrato_item: agregado de contrato com itens
/// - fornecimento / fornecimento_despesa: log imutável de fornecimentos
/// - caixa / caixa_movimento: saldo compartilhado + extrato append-only
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS contrato (
            id TEXT PRIMARY KEY,
            numero_licitacao TEXT NOT NULL,
            cidade TEXT NOT NULL,
            estado TEXT NOT NULL,
            orgao_publico TEXT NOT NULL,
            numero_empenho TEXT NOT NULL,
            data_empenho TEXT NOT NULL,
            numero_nota_empenho TEXT NOT NULL,
            numero_contrato TEXT NOT NULL,
            data_inicio_contrato TEXT NOT NULL,
            data_fim_contrato TEXT NOT NULL,
            status_contrato TEXT NOT NULL,
            frete REAL NOT NULL DEFAULT 0,
            impostos REAL NOT NULL DEFAULT 0,
            outras_despesas REAL NOT NULL DEFAULT 0,
            descricao_outras_despesas TEXT,
            status_pagamento TEXT NOT NULL DEFAULT 'pendente',
            previsao_fornecimento TEXT,
            previsao_pagamento TEXT,
            quantidade_total_contratada REAL NOT NULL DEFAULT 0,
            quantidade_total_fornecida REAL NOT NULL DEFAULT 0,
            quantidade_total_restante REAL NOT NULL DEFAULT 0,
            percentual_executado REAL NOT NULL DEFAULT 0,
            valor_total_venda REAL NOT NULL DEFAULT 0,
            valor_total_compra REAL NOT NULL DEFAULT 0,
            despesas_totais REAL NOT NULL DEFAULT 0,
            lucro_total REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS contrato_item (
            id TEXT PRIMARY KEY,
            contrato_id TEXT NOT NULL REFERENCES contrato(id) ON DELETE CASCADE,
            produto_id TEXT,
            descricao TEXT NOT NULL,
            quantidade_contratada REAL NOT NULL,
            quantidade_fornecida REAL NOT NULL DEFAULT 0,
            quantidade_restante REAL NOT NULL,
            preco_compra REAL NOT NULL,
            preco_venda REAL NOT NULL,
            despesas_extras REAL NOT NULL DEFAULT 0,
            lucro_unitario REAL NOT NULL,
            ordem INTEGER NOT NULL,
            CHECK (quantidade_fornecida >= 0 AND quantidade_fornecida <= quantidade_contratada)
        );

        CREATE TABLE IF NOT EXISTS fornecimento (
            id TEXT PRIMARY KEY,
            contrato_id TEXT NOT NULL REFERENCES contrato(id) ON DELETE CASCADE,
            item_id TEXT NOT NULL REFERENCES contrato_item(id) ON DELETE CASCADE,
            quantidade REAL NOT NULL,
            data_fornecimento TEXT NOT NULL,
            numero_nota_fornecimento TEXT,
            observacao TEXT,
            despesa_total REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS fornecimento_despesa (
            id TEXT PRIMARY KEY,
            fornecimento_id TEXT NOT NULL REFERENCES fornecimento(id) ON DELETE CASCADE,
            descricao TEXT NOT NULL,
            valor REAL NOT NULL,
            ordem INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS caixa (
            id TEXT PRIMARY KEY,
            saldo REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS caixa_movimento (
            id TEXT PRIMARY KEY,
            caixa_id TEXT NOT NULL REFERENCES caixa(id) ON DELETE CASCADE,
            tipo TEXT NOT NULL,
            origem TEXT NOT NULL,
            origem_id TEXT,
            valor REAL NOT NULL,
            descricao TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_contrato_data_empenho
            ON contrato(data_empenho DESC);
        CREATE INDEX IF NOT EXISTS idx_contrato_item_contrato
            ON contrato_item(contrato_id, ordem);
        CREATE INDEX IF NOT EXISTS idx_fornecimento_contrato
            ON fornecimento(contrato_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_caixa_movimento_caixa
            ON caixa_movimento(caixa_id, created_at);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
