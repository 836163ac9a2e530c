// ==========================================
// Gestor de Licitações - Gerenciador de configuração
// ==========================================
// Responsabilidade: carga, consulta e gravação de
// configuração em tempo de execução
// Armazenamento: tabela config_kv (chave/valor)
// ==========================================

use crate::db::configure_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// Chaves de configuração conhecidas
// ==========================================
pub mod config_keys {
    /// Dias de antecedência do aviso de vencimento de contrato
    pub const DIAS_AVISO_VENCIMENTO: &str = "alerta/dias_aviso_vencimento";

    /// Percentual de execução que dispara o alerta de execução
    pub const LIMIAR_EXECUCAO_PCT: &str = "alerta/limiar_execucao_pct";
}

// ==========================================
// ConfigManager - gerenciador de configuração
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Cria um ConfigManager abrindo a própria conexão
    ///
    /// # Parâmetros
    /// - db_path: caminho do arquivo do banco
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = crate::db::open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Cria um ConfigManager a partir de uma conexão existente
    ///
    /// Reaplica os PRAGMA unificados (idempotente) para garantir
    /// comportamento consistente da conexão compartilhada.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| format!("falha ao obter lock da conexão: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// Lê um valor bruto de config_kv
    ///
    /// # Retorno
    /// - Some(String): valor configurado
    /// - None: chave ausente
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("falha ao obter lock da conexão: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Grava (insere ou substitui) um valor em config_kv
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("falha ao obter lock da conexão: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        Ok(())
    }

    /// Lê um valor inteiro de config_kv
    ///
    /// # Retorno
    /// - Some(i64): valor configurado e válido
    /// - None: chave ausente
    /// - Err: valor presente mas não numérico
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => {
                let v = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| format!("config {} inválida ({}): {}", key, raw, e))?;
                Ok(Some(v))
            }
            None => Ok(None),
        }
    }

    /// Lê um valor de ponto flutuante de config_kv
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => {
                let v = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| format!("config {} inválida ({}): {}", key, raw, e))?;
                Ok(Some(v))
            }
            None => Ok(None),
        }
    }
}
