// ==========================================
// Gestor de Licitações - Repositório de contrato
// ==========================================
// Responsabilidade: persistência do agregado de contrato
// (contrato + itens + fornecimentos) como uma unidade
//
// Escritas sensíveis usam UPDATE condicional dentro da
// transação (sem janela entre leitura e gravação):
// - incremento de quantidade fornecida com o teto
//   quantidade_contratada na própria cláusula WHERE
// - transição de pagamento com compare-and-swap no
//   status, creditando o caixa uma única vez
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::contrato::{
    Contrato, DespesaFornecimento, EncargosContrato, Fornecimento, ItemContrato, ResumoContrato,
    VigenciaContrato,
};
use crate::domain::types::{OrigemMovimentacao, StatusContrato, StatusPagamento, TipoMovimentacao};
use crate::engine::resumo::ResumoEngine;
use crate::repository::caixa_repo::CaixaRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Formato das datas de negócio gravadas no banco
const FORMATO_DATA: &str = "%Y-%m-%d";

/// Formato dos timestamps gravados no banco
const FORMATO_DATA_HORA: &str = "%Y-%m-%d %H:%M:%S";

/// Lista de colunas do contrato, na ordem esperada pelo mapeamento
const COLUNAS_CONTRATO: &str = r#"
    id, numero_licitacao, cidade, estado, orgao_publico,
    numero_empenho, data_empenho, numero_nota_empenho,
    numero_contrato, data_inicio_contrato, data_fim_contrato, status_contrato,
    frete, impostos, outras_despesas, descricao_outras_despesas,
    status_pagamento, previsao_fornecimento, previsao_pagamento,
    quantidade_total_contratada, quantidade_total_fornecida, quantidade_total_restante,
    percentual_executado, valor_total_venda, valor_total_compra,
    despesas_totais, lucro_total, created_at
"#;

// ==========================================
// ContratoRepository - repositório do agregado
// ==========================================

/// Repositório de contratos
/// Responsabilidade: tabelas contrato, contrato_item,
/// fornecimento e fornecimento_despesa
pub struct ContratoRepository {
    conn: Arc<Mutex<Connection>>,
    resumo_engine: ResumoEngine,
}

impl ContratoRepository {
    /// Cria o repositório abrindo a própria conexão
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            resumo_engine: ResumoEngine::new(),
        })
    }

    /// Cria o repositório a partir de uma conexão existente
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            resumo_engine: ResumoEngine::new(),
        }
    }

    /// Obtém a conexão
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Escrita do agregado
    // ==========================================

    /// Insere o contrato completo (contrato + itens) em uma transação
    pub fn inserir(&self, contrato: &Contrato) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO contrato (
                id, numero_licitacao, cidade, estado, orgao_publico,
                numero_empenho, data_empenho, numero_nota_empenho,
                numero_contrato, data_inicio_contrato, data_fim_contrato, status_contrato,
                frete, impostos, outras_despesas, descricao_outras_despesas,
                status_pagamento, previsao_fornecimento, previsao_pagamento,
                quantidade_total_contratada, quantidade_total_fornecida, quantidade_total_restante,
                percentual_executado, valor_total_venda, valor_total_compra,
                despesas_totais, lucro_total, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28
            )
            "#,
            params![
                contrato.id,
                contrato.numero_licitacao,
                contrato.cidade,
                contrato.estado,
                contrato.orgao_publico,
                contrato.numero_empenho,
                contrato.data_empenho.format(FORMATO_DATA).to_string(),
                contrato.numero_nota_empenho,
                contrato.vigencia.numero_contrato,
                contrato.vigencia.data_inicio.format(FORMATO_DATA).to_string(),
                contrato.vigencia.data_fim.format(FORMATO_DATA).to_string(),
                contrato.vigencia.status.to_db_str(),
                contrato.encargos.frete,
                contrato.encargos.impostos,
                contrato.encargos.outras_despesas,
                contrato.encargos.descricao_outras_despesas,
                contrato.status_pagamento.to_db_str(),
                contrato
                    .previsao_fornecimento
                    .map(|d| d.format(FORMATO_DATA).to_string()),
                contrato
                    .previsao_pagamento
                    .map(|d| d.format(FORMATO_DATA).to_string()),
                contrato.resumo.quantidade_total_contratada,
                contrato.resumo.quantidade_total_fornecida,
                contrato.resumo.quantidade_total_restante,
                contrato.resumo.percentual_executado,
                contrato.resumo.valor_total_venda,
                contrato.resumo.valor_total_compra,
                contrato.resumo.despesas_totais,
                contrato.resumo.lucro_total,
                contrato.created_at.format(FORMATO_DATA_HORA).to_string(),
            ],
        )?;

        for item in &contrato.itens {
            tx.execute(
                r#"
                INSERT INTO contrato_item (
                    id, contrato_id, produto_id, descricao,
                    quantidade_contratada, quantidade_fornecida, quantidade_restante,
                    preco_compra, preco_venda, despesas_extras, lucro_unitario, ordem
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    item.id,
                    item.contrato_id,
                    item.produto_id,
                    item.descricao,
                    item.quantidade_contratada,
                    item.quantidade_fornecida,
                    item.quantidade_restante,
                    item.preco_compra,
                    item.preco_venda,
                    item.despesas_extras,
                    item.lucro_unitario,
                    item.ordem,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Exclui o agregado inteiro (itens, fornecimentos e despesas em cascata)
    ///
    /// # Retorno
    /// - Ok(true): contrato removido
    /// - Ok(false): contrato inexistente
    pub fn excluir(&self, contrato_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let removidas = conn.execute("DELETE FROM contrato WHERE id = ?1", params![contrato_id])?;
        Ok(removidas > 0)
    }

    // ==========================================
    // Leitura do agregado
    // ==========================================

    /// Busca o contrato completo por id
    pub fn buscar_por_id(&self, contrato_id: &str) -> RepositoryResult<Option<Contrato>> {
        let conn = self.get_conn()?;
        Self::carregar_por_id(&conn, contrato_id)
    }

    /// Lista os contratos completos, ordenados por data de empenho
    /// decrescente (adjudicações mais recentes primeiro)
    pub fn listar(&self) -> RepositoryResult<Vec<Contrato>> {
        let conn = self.get_conn()?;

        let sql = format!(
            "SELECT {} FROM contrato ORDER BY data_empenho DESC, created_at DESC",
            COLUNAS_CONTRATO
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut contratos = stmt
            .query_map([], map_contrato_row)?
            .collect::<SqliteResult<Vec<Contrato>>>()?;

        for contrato in &mut contratos {
            contrato.itens = Self::carregar_itens(&conn, &contrato.id)?;
            contrato.fornecimentos = Self::carregar_fornecimentos(&conn, &contrato.id)?;
        }

        Ok(contratos)
    }

    /// Carrega o agregado usando uma conexão/transação já aberta
    fn carregar_por_id(conn: &Connection, contrato_id: &str) -> RepositoryResult<Option<Contrato>> {
        let sql = format!("SELECT {} FROM contrato WHERE id = ?1", COLUNAS_CONTRATO);

        let contrato = conn
            .query_row(&sql, params![contrato_id], map_contrato_row)
            .optional()?;

        let mut contrato = match contrato {
            Some(c) => c,
            None => return Ok(None),
        };

        contrato.itens = Self::carregar_itens(conn, contrato_id)?;
        contrato.fornecimentos = Self::carregar_fornecimentos(conn, contrato_id)?;

        Ok(Some(contrato))
    }

    /// Carrega os itens do contrato na ordem original
    fn carregar_itens(conn: &Connection, contrato_id: &str) -> RepositoryResult<Vec<ItemContrato>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, contrato_id, produto_id, descricao,
                quantidade_contratada, quantidade_fornecida, quantidade_restante,
                preco_compra, preco_venda, despesas_extras, lucro_unitario, ordem
            FROM contrato_item
            WHERE contrato_id = ?1
            ORDER BY ordem
            "#,
        )?;

        let itens = stmt
            .query_map(params![contrato_id], |row| {
                Ok(ItemContrato {
                    id: row.get(0)?,
                    contrato_id: row.get(1)?,
                    produto_id: row.get(2)?,
                    descricao: row.get(3)?,
                    quantidade_contratada: row.get(4)?,
                    quantidade_fornecida: row.get(5)?,
                    quantidade_restante: row.get(6)?,
                    preco_compra: row.get(7)?,
                    preco_venda: row.get(8)?,
                    despesas_extras: row.get(9)?,
                    lucro_unitario: row.get(10)?,
                    ordem: row.get(11)?,
                })
            })?
            .collect::<SqliteResult<Vec<ItemContrato>>>()?;

        Ok(itens)
    }

    /// Carrega o log de fornecimentos na ordem de registro
    /// (nunca reordenado)
    fn carregar_fornecimentos(
        conn: &Connection,
        contrato_id: &str,
    ) -> RepositoryResult<Vec<Fornecimento>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, contrato_id, item_id, quantidade, data_fornecimento,
                numero_nota_fornecimento, observacao, despesa_total, created_at
            FROM fornecimento
            WHERE contrato_id = ?1
            ORDER BY created_at, rowid
            "#,
        )?;

        let mut fornecimentos = stmt
            .query_map(params![contrato_id], |row| {
                Ok(Fornecimento {
                    id: row.get(0)?,
                    contrato_id: row.get(1)?,
                    item_id: row.get(2)?,
                    quantidade: row.get(3)?,
                    data_fornecimento: parse_data(4, row.get::<_, String>(4)?)?,
                    numero_nota_fornecimento: row.get(5)?,
                    observacao: row.get(6)?,
                    despesas: Vec::new(),
                    despesa_total: row.get(7)?,
                    created_at: parse_data_hora(8, row.get::<_, String>(8)?)?,
                })
            })?
            .collect::<SqliteResult<Vec<Fornecimento>>>()?;

        for fornecimento in &mut fornecimentos {
            let mut stmt = conn.prepare(
                r#"
                SELECT descricao, valor
                FROM fornecimento_despesa
                WHERE fornecimento_id = ?1
                ORDER BY ordem
                "#,
            )?;
            fornecimento.despesas = stmt
                .query_map(params![fornecimento.id], |row| {
                    Ok(DespesaFornecimento {
                        descricao: row.get(0)?,
                        valor: row.get(1)?,
                    })
                })?
                .collect::<SqliteResult<Vec<DespesaFornecimento>>>()?;
        }

        Ok(fornecimentos)
    }

    /// Carrega somente os encargos fixos do contrato
    fn carregar_encargos(
        conn: &Connection,
        contrato_id: &str,
    ) -> RepositoryResult<Option<EncargosContrato>> {
        let encargos = conn
            .query_row(
                r#"
                SELECT frete, impostos, outras_despesas, descricao_outras_despesas
                FROM contrato
                WHERE id = ?1
                "#,
                params![contrato_id],
                |row| {
                    Ok(EncargosContrato {
                        frete: row.get(0)?,
                        impostos: row.get(1)?,
                        outras_despesas: row.get(2)?,
                        descricao_outras_despesas: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(encargos)
    }

    // ==========================================
    // Registro de fornecimento
    // ==========================================

    /// Registra um fornecimento parcial contra um item do contrato
    ///
    /// Transação única:
    /// 1. incremento condicional da quantidade fornecida: o teto
    ///    `quantidade_fornecida + qtd <= quantidade_contratada` faz
    ///    parte do próprio UPDATE, então duas gravações concorrentes
    ///    jamais estouram a quantidade contratada
    /// 2. inserção do fornecimento imutável + despesas avulsas
    /// 3. recálculo e persistência do resumo do contrato
    ///
    /// # Retorno
    /// - Ok(ResumoContrato): resumo recalculado após o registro
    /// - Err(NotFound): contrato ou item inexistente
    /// - Err(QuantityExceeded): quantidade maior que o restante do item
    pub fn registrar_fornecimento(
        &self,
        contrato_id: &str,
        fornecimento: &Fornecimento,
    ) -> RepositoryResult<ResumoContrato> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        // 1. Contrato precisa existir (carrega os encargos de uma vez)
        let encargos = Self::carregar_encargos(&tx, contrato_id)?.ok_or_else(|| {
            RepositoryError::NotFound {
                entity: "Contrato".to_string(),
                id: contrato_id.to_string(),
            }
        })?;

        // 2. Incremento condicional: o teto está na cláusula WHERE
        let alteradas = tx.execute(
            r#"
            UPDATE contrato_item
            SET quantidade_fornecida = quantidade_fornecida + ?1,
                quantidade_restante  = quantidade_contratada - (quantidade_fornecida + ?1)
            WHERE id = ?2
              AND contrato_id = ?3
              AND quantidade_fornecida + ?1 <= quantidade_contratada
            "#,
            params![fornecimento.quantidade, fornecimento.item_id, contrato_id],
        )?;

        if alteradas == 0 {
            // Distingue item inexistente de quantidade excedida
            let restante: Option<f64> = tx
                .query_row(
                    "SELECT quantidade_restante FROM contrato_item WHERE id = ?1 AND contrato_id = ?2",
                    params![fornecimento.item_id, contrato_id],
                    |row| row.get(0),
                )
                .optional()?;

            return match restante {
                None => Err(RepositoryError::NotFound {
                    entity: "ItemContrato".to_string(),
                    id: fornecimento.item_id.clone(),
                }),
                Some(restante) => Err(RepositoryError::QuantityExceeded {
                    item_id: fornecimento.item_id.clone(),
                    solicitado: fornecimento.quantidade,
                    restante,
                }),
            };
        }

        // 3. Fornecimento imutável + despesas avulsas
        tx.execute(
            r#"
            INSERT INTO fornecimento (
                id, contrato_id, item_id, quantidade, data_fornecimento,
                numero_nota_fornecimento, observacao, despesa_total, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                fornecimento.id,
                contrato_id,
                fornecimento.item_id,
                fornecimento.quantidade,
                fornecimento.data_fornecimento.format(FORMATO_DATA).to_string(),
                fornecimento.numero_nota_fornecimento,
                fornecimento.observacao,
                fornecimento.despesa_total,
                fornecimento.created_at.format(FORMATO_DATA_HORA).to_string(),
            ],
        )?;

        for (ordem, despesa) in fornecimento.despesas.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO fornecimento_despesa (id, fornecimento_id, descricao, valor, ordem)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    Uuid::new_v4().to_string(),
                    fornecimento.id,
                    despesa.descricao,
                    despesa.valor,
                    ordem as i64,
                ],
            )?;
        }

        // 4. Resumo recalculado dentro da mesma transação
        let itens = Self::carregar_itens(&tx, contrato_id)?;
        let fornecimentos = Self::carregar_fornecimentos(&tx, contrato_id)?;
        let resumo = self
            .resumo_engine
            .calcular(&itens, &encargos, &fornecimentos);
        Self::atualizar_resumo(&tx, contrato_id, &resumo)?;

        tx.commit()?;
        Ok(resumo)
    }

    /// Persiste as colunas de resumo do contrato
    fn atualizar_resumo(
        conn: &Connection,
        contrato_id: &str,
        resumo: &ResumoContrato,
    ) -> RepositoryResult<()> {
        conn.execute(
            r#"
            UPDATE contrato SET
                quantidade_total_contratada = ?1,
                quantidade_total_fornecida = ?2,
                quantidade_total_restante = ?3,
                percentual_executado = ?4,
                valor_total_venda = ?5,
                valor_total_compra = ?6,
                despesas_totais = ?7,
                lucro_total = ?8
            WHERE id = ?9
            "#,
            params![
                resumo.quantidade_total_contratada,
                resumo.quantidade_total_fornecida,
                resumo.quantidade_total_restante,
                resumo.percentual_executado,
                resumo.valor_total_venda,
                resumo.valor_total_compra,
                resumo.despesas_totais,
                resumo.lucro_total,
                contrato_id,
            ],
        )?;

        Ok(())
    }

    // ==========================================
    // Transição de status de pagamento
    // ==========================================

    /// Aplica a transição de status de pagamento
    ///
    /// Máquina unidirecional pendente -> pago. A entrada em pago é um
    /// compare-and-swap no status; só quando o CAS efetivamente troca
    /// o status o caixa é creditado, na mesma transação, com
    /// soma(preco_venda x quantidade_fornecida) daquele instante.
    /// Chamadas repetidas com pago são no-op (crédito único).
    ///
    /// # Retorno
    /// - Ok(Some(valor)): transição aplicada, caixa creditado em valor
    /// - Ok(None): no-op (status já era o pedido)
    /// - Err(NotFound): contrato inexistente (ou caixa não aberto)
    /// - Err(InvalidStateTransition): tentativa de pago -> pendente
    pub fn definir_status_pagamento(
        &self,
        contrato_id: &str,
        novo_status: StatusPagamento,
    ) -> RepositoryResult<Option<f64>> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        // 1. Status atual + número da licitação (descrição do crédito)
        let atual: Option<(String, String)> = tx
            .query_row(
                "SELECT status_pagamento, numero_licitacao FROM contrato WHERE id = ?1",
                params![contrato_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (atual_str, numero_licitacao) = atual.ok_or_else(|| RepositoryError::NotFound {
            entity: "Contrato".to_string(),
            id: contrato_id.to_string(),
        })?;

        let atual = StatusPagamento::from_str(&atual_str).ok_or_else(|| {
            RepositoryError::ValidationError(format!(
                "status de pagamento inválido no banco: {}",
                atual_str
            ))
        })?;

        match (atual, novo_status) {
            // Sem transição reversa definida
            (StatusPagamento::Pago, StatusPagamento::Pendente) => {
                Err(RepositoryError::InvalidStateTransition {
                    from: "pago".to_string(),
                    to: "pendente".to_string(),
                })
            }

            // Já está no status pedido: no-op
            (StatusPagamento::Pendente, StatusPagamento::Pendente)
            | (StatusPagamento::Pago, StatusPagamento::Pago) => {
                tx.commit()?;
                Ok(None)
            }

            (StatusPagamento::Pendente, StatusPagamento::Pago) => {
                // 2. CAS: troca o status só se ainda não está pago
                let alteradas = tx.execute(
                    "UPDATE contrato SET status_pagamento = 'pago' \
                     WHERE id = ?1 AND status_pagamento <> 'pago'",
                    params![contrato_id],
                )?;

                if alteradas == 0 {
                    // Outra gravação chegou antes; sem segundo crédito
                    tx.commit()?;
                    return Ok(None);
                }

                // 3. Crédito único sobre o fornecido até este instante
                let itens = Self::carregar_itens(&tx, contrato_id)?;
                let valor = self.resumo_engine.valor_credito_pagamento(&itens);

                CaixaRepository::aplicar_movimento(
                    &tx,
                    TipoMovimentacao::Credito,
                    OrigemMovimentacao::Contrato,
                    Some(contrato_id),
                    valor,
                    &format!("Pagamento da licitação {}", numero_licitacao),
                )?;

                tx.commit()?;
                Ok(Some(valor))
            }
        }
    }
}

// ==========================================
// Mapeamento de linhas
// ==========================================

/// Mapeia uma linha de contrato (itens e fornecimentos vazios)
fn map_contrato_row(row: &rusqlite::Row) -> rusqlite::Result<Contrato> {
    let status_contrato_str: String = row.get(11)?;
    let status_pagamento_str: String = row.get(16)?;

    Ok(Contrato {
        id: row.get(0)?,
        numero_licitacao: row.get(1)?,
        cidade: row.get(2)?,
        estado: row.get(3)?,
        orgao_publico: row.get(4)?,
        numero_empenho: row.get(5)?,
        data_empenho: parse_data(6, row.get::<_, String>(6)?)?,
        numero_nota_empenho: row.get(7)?,
        vigencia: VigenciaContrato {
            numero_contrato: row.get(8)?,
            data_inicio: parse_data(9, row.get::<_, String>(9)?)?,
            data_fim: parse_data(10, row.get::<_, String>(10)?)?,
            status: StatusContrato::from_str(&status_contrato_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    11,
                    rusqlite::types::Type::Text,
                    format!("status de contrato inválido: {}", status_contrato_str).into(),
                )
            })?,
        },
        encargos: EncargosContrato {
            frete: row.get(12)?,
            impostos: row.get(13)?,
            outras_despesas: row.get(14)?,
            descricao_outras_despesas: row.get(15)?,
        },
        status_pagamento: StatusPagamento::from_str(&status_pagamento_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                16,
                rusqlite::types::Type::Text,
                format!("status de pagamento inválido: {}", status_pagamento_str).into(),
            )
        })?,
        previsao_fornecimento: parse_data_opt(17, row.get::<_, Option<String>>(17)?)?,
        previsao_pagamento: parse_data_opt(18, row.get::<_, Option<String>>(18)?)?,
        resumo: ResumoContrato {
            quantidade_total_contratada: row.get(19)?,
            quantidade_total_fornecida: row.get(20)?,
            quantidade_total_restante: row.get(21)?,
            percentual_executado: row.get(22)?,
            valor_total_venda: row.get(23)?,
            valor_total_compra: row.get(24)?,
            despesas_totais: row.get(25)?,
            lucro_total: row.get(26)?,
        },
        itens: Vec::new(),
        fornecimentos: Vec::new(),
        created_at: parse_data_hora(27, row.get::<_, String>(27)?)?,
    })
}

/// Converte uma data de negócio gravada no banco
fn parse_data(idx: usize, s: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&s, FORMATO_DATA).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Converte uma data opcional gravada no banco
fn parse_data_opt(idx: usize, s: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    match s {
        Some(s) => Ok(Some(parse_data(idx, s)?)),
        None => Ok(None),
    }
}

/// Converte o timestamp gravado no banco
fn parse_data_hora(idx: usize, s: String) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&s, FORMATO_DATA_HORA).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
