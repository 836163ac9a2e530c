// ==========================================
// Gestor de Licitações - Repositório de caixa
// ==========================================
// Caixa: instância única criada por passo explícito
// de abertura; consulta não cria nada
// Extrato: caixa_movimento é append-only; o saldo em
// caixa.saldo é atualizado na mesma transação de cada
// lançamento
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::caixa::{Caixa, MovimentacaoCaixa};
use crate::domain::types::{OrigemMovimentacao, TipoMovimentacao};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Formato dos timestamps gravados no banco
const FORMATO_DATA_HORA: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// CaixaRepository - repositório de caixa
// ==========================================

/// Repositório de caixa
/// Responsabilidade: tabelas caixa e caixa_movimento
pub struct CaixaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CaixaRepository {
    /// Cria o repositório abrindo a própria conexão
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Cria o repositório a partir de uma conexão existente
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Obtém a conexão
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Abertura e consulta
    // ==========================================

    /// Abre o caixa (criação explícita da instância única)
    ///
    /// # Retorno
    /// - Ok(Caixa): caixa recém-aberto com saldo zero
    /// - Err(BusinessRuleViolation): já existe caixa aberto
    pub fn abrir(&self) -> RepositoryResult<Caixa> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let existente: i64 = tx.query_row("SELECT COUNT(*) FROM caixa", [], |row| row.get(0))?;
        if existente > 0 {
            return Err(RepositoryError::BusinessRuleViolation(
                "caixa já aberto".to_string(),
            ));
        }

        let agora = Utc::now().naive_utc();
        let agora_str = agora.format(FORMATO_DATA_HORA).to_string();
        let caixa = Caixa {
            id: Uuid::new_v4().to_string(),
            saldo: 0.0,
            created_at: agora,
            updated_at: agora,
        };

        tx.execute(
            r#"
            INSERT INTO caixa (id, saldo, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![caixa.id, caixa.saldo, agora_str, agora_str],
        )?;

        tx.commit()?;
        Ok(caixa)
    }

    /// Busca o caixa (None quando ainda não foi aberto)
    pub fn buscar(&self) -> RepositoryResult<Option<Caixa>> {
        let conn = self.get_conn()?;
        Self::buscar_na_conexao(&conn)
    }

    /// Busca o caixa usando uma conexão/transação já aberta
    pub fn buscar_na_conexao(conn: &Connection) -> RepositoryResult<Option<Caixa>> {
        let caixa = conn
            .query_row(
                "SELECT id, saldo, created_at, updated_at FROM caixa LIMIT 1",
                [],
                |row| {
                    Ok(Caixa {
                        id: row.get(0)?,
                        saldo: row.get(1)?,
                        created_at: parse_data_hora(2, row.get::<_, String>(2)?)?,
                        updated_at: parse_data_hora(3, row.get::<_, String>(3)?)?,
                    })
                },
            )
            .optional()?;

        Ok(caixa)
    }

    // ==========================================
    // Movimentações
    // ==========================================

    /// Registra uma movimentação (crédito/débito) em transação própria
    ///
    /// # Parâmetros
    /// - tipo: crédito ou débito
    /// - origem: fluxo de origem (contrato/pedido/despesa/manual)
    /// - origem_id: entidade geradora, quando houver
    /// - valor: valor absoluto da movimentação
    /// - descricao: descrição legível da entrada
    ///
    /// # Retorno
    /// - Ok(MovimentacaoCaixa): entrada registrada
    /// - Err(NotFound): caixa ainda não aberto
    pub fn registrar_movimento(
        &self,
        tipo: TipoMovimentacao,
        origem: OrigemMovimentacao,
        origem_id: Option<&str>,
        valor: f64,
        descricao: &str,
    ) -> RepositoryResult<MovimentacaoCaixa> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let movimento = Self::aplicar_movimento(&tx, tipo, origem, origem_id, valor, descricao)?;

        tx.commit()?;
        Ok(movimento)
    }

    /// Aplica uma movimentação dentro de uma transação já aberta
    ///
    /// Ponte usada pelos fluxos automáticos (ex.: transição de
    /// pagamento de contrato) para creditar o caixa na MESMA
    /// transação da mutação de origem. Insere a entrada no extrato
    /// e atualiza o saldo em cache.
    pub fn aplicar_movimento(
        conn: &Connection,
        tipo: TipoMovimentacao,
        origem: OrigemMovimentacao,
        origem_id: Option<&str>,
        valor: f64,
        descricao: &str,
    ) -> RepositoryResult<MovimentacaoCaixa> {
        // 1. Caixa precisa existir; consulta não cria
        let caixa_id: Option<String> = conn
            .query_row("SELECT id FROM caixa LIMIT 1", [], |row| row.get(0))
            .optional()?;
        let caixa_id = caixa_id.ok_or_else(|| RepositoryError::NotFound {
            entity: "Caixa".to_string(),
            id: "principal".to_string(),
        })?;

        // 2. Entrada append-only no extrato
        let agora = Utc::now().naive_utc();
        let movimento = MovimentacaoCaixa {
            id: Uuid::new_v4().to_string(),
            caixa_id: caixa_id.clone(),
            tipo,
            origem,
            origem_id: origem_id.map(|s| s.to_string()),
            valor,
            descricao: descricao.to_string(),
            created_at: agora,
        };

        conn.execute(
            r#"
            INSERT INTO caixa_movimento (
                id, caixa_id, tipo, origem, origem_id, valor, descricao, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                movimento.id,
                movimento.caixa_id,
                movimento.tipo.to_db_str(),
                movimento.origem.to_db_str(),
                movimento.origem_id,
                movimento.valor,
                movimento.descricao,
                agora.format(FORMATO_DATA_HORA).to_string(),
            ],
        )?;

        // 3. Saldo em cache, na mesma transação
        conn.execute(
            "UPDATE caixa SET saldo = saldo + ?1, updated_at = ?2 WHERE id = ?3",
            params![
                movimento.valor_assinado(),
                agora.format(FORMATO_DATA_HORA).to_string(),
                caixa_id,
            ],
        )?;

        Ok(movimento)
    }

    /// Lista o extrato (mais recentes primeiro)
    pub fn listar_movimentos(&self) -> RepositoryResult<Vec<MovimentacaoCaixa>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, caixa_id, tipo, origem, origem_id, valor, descricao, created_at
            FROM caixa_movimento
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let movimentos = stmt
            .query_map([], |row| {
                let tipo_str: String = row.get(2)?;
                let origem_str: String = row.get(3)?;
                Ok(MovimentacaoCaixa {
                    id: row.get(0)?,
                    caixa_id: row.get(1)?,
                    tipo: TipoMovimentacao::from_str(&tipo_str).ok_or_else(|| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            rusqlite::types::Type::Text,
                            format!("tipo de movimentação inválido: {}", tipo_str).into(),
                        )
                    })?,
                    origem: OrigemMovimentacao::from_str(&origem_str).ok_or_else(|| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            format!("origem de movimentação inválida: {}", origem_str).into(),
                        )
                    })?,
                    origem_id: row.get(4)?,
                    valor: row.get(5)?,
                    descricao: row.get(6)?,
                    created_at: parse_data_hora(7, row.get::<_, String>(7)?)?,
                })
            })?
            .collect::<SqliteResult<Vec<MovimentacaoCaixa>>>()?;

        Ok(movimentos)
    }
}

/// Converte o timestamp gravado no banco
fn parse_data_hora(idx: usize, s: String) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&s, FORMATO_DATA_HORA).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
