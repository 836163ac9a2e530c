// ==========================================
// Gestor de Licitações - API de licitações
// ==========================================
// Responsabilidade: ciclo de vida do contrato de licitação
// - criação do agregado com resumo inicial
// - registro de fornecimentos parciais
// - transição de status de pagamento (ponte com o caixa)
// - leituras com resumo e alertas calculados na hora
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::contrato::{
    Contrato, DespesaFornecimento, EncargosContrato, Fornecimento, ItemContrato, ResumoContrato,
    VigenciaContrato,
};
use crate::domain::types::{StatusContrato, StatusPagamento};
use crate::engine::alerta::AlertaEngine;
use crate::engine::resumo::ResumoEngine;
use crate::repository::contrato_repo::ContratoRepository;

// ==========================================
// DTOs de entrada
// ==========================================

/// Item contratado, na criação da licitação
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovoItemContrato {
    pub produto_id: Option<String>,
    pub descricao: String,
    pub quantidade_contratada: f64,
    pub preco_compra: f64,
    pub preco_venda: f64,
    #[serde(default)]
    pub despesas_extras: f64,
}

/// Dados de criação de uma licitação com contrato
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaLicitacao {
    // ===== Dados gerais =====
    pub numero_licitacao: String,
    pub cidade: String,
    pub estado: String,
    pub orgao_publico: String,

    // ===== Empenho =====
    pub numero_empenho: String,
    pub data_empenho: NaiveDate,
    pub numero_nota_empenho: String,

    // ===== Contrato (elemento central) =====
    pub numero_contrato: String,
    pub data_inicio_contrato: NaiveDate,
    pub data_fim_contrato: NaiveDate,
    /// Status de vigência; padrão "vigente" quando omitido
    pub status_contrato: Option<String>,

    // ===== Produtos =====
    pub produtos: Vec<NovoItemContrato>,

    // ===== Previsões =====
    pub previsao_fornecimento: Option<NaiveDate>,
    pub previsao_pagamento: Option<NaiveDate>,

    // ===== Encargos fixos =====
    #[serde(default)]
    pub frete: f64,
    #[serde(default)]
    pub impostos: f64,
    #[serde(default)]
    pub outras_despesas: f64,
    pub descricao_outras_despesas: Option<String>,
}

/// Despesa avulsa de um fornecimento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaDespesaFornecimento {
    pub descricao: String,
    pub valor: f64,
}

/// Dados de registro de um fornecimento parcial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovoFornecimento {
    pub produto_contrato_id: String,
    pub quantidade: f64,
    pub data_fornecimento: NaiveDate,
    pub numero_nota_fornecimento: Option<String>,
    pub observacao: Option<String>,
    #[serde(default)]
    pub despesas: Vec<NovaDespesaFornecimento>,
}

// ==========================================
// DTO de leitura
// ==========================================

/// Contrato com resumo e alertas calculados na leitura
///
/// Os alertas nunca são persistidos: cada leitura reavalia
/// vencimento e execução contra a data de referência.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicitacaoDetalhe {
    pub contrato: Contrato,
    pub alertas: Vec<String>,
}

// ==========================================
// LicitacaoApi - API de licitações
// ==========================================

/// API de licitações
///
/// Responsabilidades:
/// 1. Criação do agregado de contrato com resumo inicial
/// 2. Registro de fornecimentos parciais (valida antes de gravar)
/// 3. Transição de status de pagamento com crédito único no caixa
/// 4. Leituras com resumo recalculado e alertas frescos
pub struct LicitacaoApi {
    contrato_repo: Arc<ContratoRepository>,
    resumo_engine: Arc<ResumoEngine>,
    alerta_engine: Arc<AlertaEngine>,
}

impl LicitacaoApi {
    /// Cria a API de licitações
    ///
    /// # Parâmetros
    /// - contrato_repo: repositório do agregado de contrato
    /// - resumo_engine: calculadora de agregados
    /// - alerta_engine: avaliador de alertas
    pub fn new(
        contrato_repo: Arc<ContratoRepository>,
        resumo_engine: Arc<ResumoEngine>,
        alerta_engine: Arc<AlertaEngine>,
    ) -> Self {
        Self {
            contrato_repo,
            resumo_engine,
            alerta_engine,
        }
    }

    // ==========================================
    // Criação
    // ==========================================

    /// Cria uma licitação com estrutura de contrato e produtos
    ///
    /// Todos os itens nascem com quantidade fornecida zero; o resumo
    /// inicial já sai calculado (valor de catálogo, encargos fixos e
    /// lucro negativo no montante dos encargos).
    ///
    /// # Parâmetros
    /// - dados: dados de criação
    /// - usuario: identidade autenticada (repassada, não re-derivada)
    pub fn criar_licitacao(&self, dados: NovaLicitacao, usuario: &str) -> ApiResult<Contrato> {
        // 1. Validação de entrada (tudo-ou-nada: nada é gravado em falha)
        Self::validar_nova_licitacao(&dados)?;

        let status_contrato = match &dados.status_contrato {
            Some(s) => StatusContrato::from_str(s).ok_or_else(|| {
                ApiError::ValidationError(format!("status de contrato inválido: {}", s))
            })?,
            None => StatusContrato::Vigente,
        };

        // 2. Montagem do agregado com identidades novas
        let contrato_id = Uuid::new_v4().to_string();
        let itens: Vec<ItemContrato> = dados
            .produtos
            .iter()
            .enumerate()
            .map(|(ordem, produto)| ItemContrato {
                id: Uuid::new_v4().to_string(),
                contrato_id: contrato_id.clone(),
                produto_id: produto.produto_id.clone(),
                descricao: produto.descricao.clone(),
                quantidade_contratada: produto.quantidade_contratada,
                quantidade_fornecida: 0.0,
                quantidade_restante: produto.quantidade_contratada,
                preco_compra: produto.preco_compra,
                preco_venda: produto.preco_venda,
                despesas_extras: produto.despesas_extras,
                lucro_unitario: ItemContrato::calcular_lucro_unitario(
                    produto.preco_venda,
                    produto.preco_compra,
                    produto.despesas_extras,
                ),
                ordem: ordem as i32,
            })
            .collect();

        let encargos = EncargosContrato {
            frete: dados.frete,
            impostos: dados.impostos,
            outras_despesas: dados.outras_despesas,
            descricao_outras_despesas: dados.descricao_outras_despesas.clone(),
        };

        // 3. Resumo inicial (zero fornecimentos)
        let resumo = self.resumo_engine.calcular(&itens, &encargos, &[]);

        let contrato = Contrato {
            id: contrato_id,
            numero_licitacao: dados.numero_licitacao.trim().to_string(),
            cidade: dados.cidade.trim().to_string(),
            estado: dados.estado.trim().to_string(),
            orgao_publico: dados.orgao_publico.trim().to_string(),
            numero_empenho: dados.numero_empenho.trim().to_string(),
            data_empenho: dados.data_empenho,
            numero_nota_empenho: dados.numero_nota_empenho.trim().to_string(),
            vigencia: VigenciaContrato {
                numero_contrato: dados.numero_contrato.trim().to_string(),
                data_inicio: dados.data_inicio_contrato,
                data_fim: dados.data_fim_contrato,
                status: status_contrato,
            },
            encargos,
            status_pagamento: StatusPagamento::Pendente,
            previsao_fornecimento: dados.previsao_fornecimento,
            previsao_pagamento: dados.previsao_pagamento,
            resumo,
            itens,
            fornecimentos: Vec::new(),
            created_at: Utc::now().naive_utc(),
        };

        // 4. Persistência do agregado completo
        self.contrato_repo.inserir(&contrato)?;

        info!(
            "licitação criada: id={}, numero={}, itens={}, usuario={}",
            contrato.id,
            contrato.numero_licitacao,
            contrato.itens.len(),
            usuario
        );

        Ok(contrato)
    }

    /// Validação de entrada da criação
    fn validar_nova_licitacao(dados: &NovaLicitacao) -> ApiResult<()> {
        if dados.numero_licitacao.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "número da licitação não pode ser vazio".to_string(),
            ));
        }
        if dados.numero_contrato.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "número do contrato não pode ser vazio".to_string(),
            ));
        }
        if dados.orgao_publico.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "órgão público não pode ser vazio".to_string(),
            ));
        }
        if dados.data_fim_contrato < dados.data_inicio_contrato {
            return Err(ApiError::ValidationError(
                "data fim do contrato anterior à data de início".to_string(),
            ));
        }
        if dados.produtos.is_empty() {
            return Err(ApiError::ValidationError(
                "contrato precisa de ao menos um produto".to_string(),
            ));
        }
        for produto in &dados.produtos {
            if produto.descricao.trim().is_empty() {
                return Err(ApiError::ValidationError(
                    "descrição de produto não pode ser vazia".to_string(),
                ));
            }
            if produto.quantidade_contratada <= 0.0 {
                return Err(ApiError::ValidationError(format!(
                    "quantidade contratada deve ser positiva: {}",
                    produto.descricao
                )));
            }
            if produto.preco_compra < 0.0
                || produto.preco_venda < 0.0
                || produto.despesas_extras < 0.0
            {
                return Err(ApiError::ValidationError(format!(
                    "preços e despesas não podem ser negativos: {}",
                    produto.descricao
                )));
            }
        }
        if dados.frete < 0.0 || dados.impostos < 0.0 || dados.outras_despesas < 0.0 {
            return Err(ApiError::ValidationError(
                "encargos fixos não podem ser negativos".to_string(),
            ));
        }

        Ok(())
    }

    // ==========================================
    // Registro de fornecimento
    // ==========================================

    /// Registra um fornecimento parcial contra um item do contrato
    ///
    /// A checagem de teto (quantidade <= restante) e o incremento da
    /// quantidade fornecida acontecem como operação única no
    /// repositório; o resumo volta recalculado da mesma transação.
    ///
    /// # Retorno
    /// - Ok(ResumoContrato): resumo após o registro
    /// - Err(ValidationError): quantidade ou despesa inválida
    /// - Err(NotFound): contrato ou item inexistente
    /// - Err(QuantityExceeded): quantidade maior que o restante
    pub fn registrar_fornecimento(
        &self,
        contrato_id: &str,
        dados: NovoFornecimento,
        usuario: &str,
    ) -> ApiResult<ResumoContrato> {
        // 1. Validação de entrada
        if dados.quantidade <= 0.0 {
            return Err(ApiError::ValidationError(format!(
                "quantidade do fornecimento deve ser positiva: {}",
                dados.quantidade
            )));
        }
        for despesa in &dados.despesas {
            if despesa.descricao.trim().is_empty() {
                return Err(ApiError::ValidationError(
                    "descrição de despesa não pode ser vazia".to_string(),
                ));
            }
            if despesa.valor < 0.0 {
                return Err(ApiError::ValidationError(format!(
                    "valor de despesa não pode ser negativo: {}",
                    despesa.descricao
                )));
            }
        }

        // 2. Montagem do registro imutável
        let despesas: Vec<DespesaFornecimento> = dados
            .despesas
            .iter()
            .map(|d| DespesaFornecimento {
                descricao: d.descricao.trim().to_string(),
                valor: d.valor,
            })
            .collect();
        let despesa_total = self.resumo_engine.despesa_total_fornecimento(&despesas);

        let fornecimento = Fornecimento {
            id: Uuid::new_v4().to_string(),
            contrato_id: contrato_id.to_string(),
            item_id: dados.produto_contrato_id.clone(),
            quantidade: dados.quantidade,
            data_fornecimento: dados.data_fornecimento,
            numero_nota_fornecimento: dados.numero_nota_fornecimento.clone(),
            observacao: dados.observacao.clone(),
            despesas,
            despesa_total,
            created_at: Utc::now().naive_utc(),
        };

        // 3. Gravação atômica + resumo recalculado
        let resumo = self
            .contrato_repo
            .registrar_fornecimento(contrato_id, &fornecimento)?;

        info!(
            "fornecimento registrado: contrato={}, item={}, quantidade={}, usuario={}",
            contrato_id, fornecimento.item_id, fornecimento.quantidade, usuario
        );

        Ok(resumo)
    }

    // ==========================================
    // Status de pagamento
    // ==========================================

    /// Define o status de pagamento do contrato
    ///
    /// Máquina unidirecional pendente -> pago. A entrada em pago
    /// credita o caixa uma única vez com o valor fornecido até o
    /// instante da transição; repetir a chamada é no-op.
    ///
    /// # Parâmetros
    /// - contrato_id: id do contrato
    /// - status: "pendente" ou "pago"
    /// - usuario: identidade autenticada (repassada)
    pub fn definir_status_pagamento(
        &self,
        contrato_id: &str,
        status: &str,
        usuario: &str,
    ) -> ApiResult<()> {
        let novo_status = StatusPagamento::from_str(status).ok_or_else(|| {
            ApiError::ValidationError(format!("status de pagamento inválido: {}", status))
        })?;

        let credito = self
            .contrato_repo
            .definir_status_pagamento(contrato_id, novo_status)?;

        match credito {
            Some(valor) => info!(
                "contrato pago: id={}, credito_caixa={:.2}, usuario={}",
                contrato_id, valor, usuario
            ),
            None => info!(
                "status de pagamento inalterado: id={}, status={}, usuario={}",
                contrato_id, novo_status, usuario
            ),
        }

        Ok(())
    }

    // ==========================================
    // Leituras
    // ==========================================

    /// Busca a licitação com resumo e alertas da data corrente
    pub fn buscar_licitacao(&self, contrato_id: &str) -> ApiResult<LicitacaoDetalhe> {
        self.buscar_licitacao_em(contrato_id, chrono::Local::now().date_naive())
    }

    /// Busca a licitação avaliando os alertas na data informada
    pub fn buscar_licitacao_em(
        &self,
        contrato_id: &str,
        hoje: NaiveDate,
    ) -> ApiResult<LicitacaoDetalhe> {
        let contrato = self
            .contrato_repo
            .buscar_por_id(contrato_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Contrato (id={}) não existe", contrato_id))
            })?;

        Ok(self.montar_detalhe(contrato, hoje))
    }

    /// Lista as licitações (empenhos mais recentes primeiro) com
    /// resumo e alertas da data corrente
    pub fn listar_licitacoes(&self) -> ApiResult<Vec<LicitacaoDetalhe>> {
        self.listar_licitacoes_em(chrono::Local::now().date_naive())
    }

    /// Lista as licitações avaliando os alertas na data informada
    pub fn listar_licitacoes_em(&self, hoje: NaiveDate) -> ApiResult<Vec<LicitacaoDetalhe>> {
        let contratos = self.contrato_repo.listar()?;

        Ok(contratos
            .into_iter()
            .map(|contrato| self.montar_detalhe(contrato, hoje))
            .collect())
    }

    /// Recalcula o resumo e avalia os alertas para a leitura
    fn montar_detalhe(&self, mut contrato: Contrato, hoje: NaiveDate) -> LicitacaoDetalhe {
        contrato.resumo =
            self.resumo_engine
                .calcular(&contrato.itens, &contrato.encargos, &contrato.fornecimentos);
        let alertas = self
            .alerta_engine
            .avaliar(&contrato.vigencia, &contrato.resumo, hoje);

        LicitacaoDetalhe { contrato, alertas }
    }

    // ==========================================
    // Exclusão
    // ==========================================

    /// Exclui a licitação inteira (agregado completo)
    ///
    /// Não há estorno de caixa: créditos já aplicados permanecem.
    pub fn excluir_licitacao(&self, contrato_id: &str, usuario: &str) -> ApiResult<()> {
        let removido = self.contrato_repo.excluir(contrato_id)?;
        if !removido {
            return Err(ApiError::NotFound(format!(
                "Contrato (id={}) não existe",
                contrato_id
            )));
        }

        info!("licitação excluída: id={}, usuario={}", contrato_id, usuario);
        Ok(())
    }
}
