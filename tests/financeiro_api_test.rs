// ==========================================
// Teste da API financeira
// ==========================================
// Responsabilidade: abertura explícita do caixa, crédito
// único na transição de pagamento e extrato append-only
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod financeiro_api_test {
    use chrono::NaiveDate;
    use gestor_licitacoes::api::{ApiError, FinanceiroApi, LicitacaoApi, NovoFornecimento};
    use gestor_licitacoes::domain::types::{OrigemMovimentacao, StatusPagamento, TipoMovimentacao};
    use gestor_licitacoes::engine::{AlertaEngine, ResumoEngine};
    use gestor_licitacoes::repository::{CaixaRepository, ContratoRepository};
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    use crate::test_helpers::{create_test_db, nova_licitacao_base, open_test_connection};

    // ==========================================
    // Auxiliares
    // ==========================================

    fn hoje() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn setup_test_env() -> (NamedTempFile, Arc<LicitacaoApi>, Arc<FinanceiroApi>) {
        let (temp_file, db_path) = create_test_db().unwrap();
        let conn = Arc::new(Mutex::new(open_test_connection(&db_path).unwrap()));

        let contrato_repo = Arc::new(ContratoRepository::from_connection(conn.clone()));
        let caixa_repo = Arc::new(CaixaRepository::from_connection(conn));

        let licitacao_api = Arc::new(LicitacaoApi::new(
            contrato_repo,
            Arc::new(ResumoEngine::new()),
            Arc::new(AlertaEngine::new()),
        ));
        let financeiro_api = Arc::new(FinanceiroApi::new(caixa_repo));

        (temp_file, licitacao_api, financeiro_api)
    }

    /// Cria a licitação base e registra 30 unidades do primeiro item
    fn licitacao_com_fornecimento(
        licitacao_api: &LicitacaoApi,
    ) -> (String, f64) {
        let criado = licitacao_api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();
        let item_id = criado.itens[0].id.clone();

        licitacao_api
            .registrar_fornecimento(
                &criado.id,
                NovoFornecimento {
                    produto_contrato_id: item_id,
                    quantidade: 30.0,
                    data_fornecimento: hoje(),
                    numero_nota_fornecimento: None,
                    observacao: None,
                    despesas: Vec::new(),
                },
                "teste",
            )
            .unwrap();

        // 30 x 15.75
        (criado.id, 472.50)
    }

    // ==========================================
    // Abertura e consulta
    // ==========================================

    #[test]
    fn test_consulta_antes_da_abertura() {
        let (_temp_file, _licitacao_api, financeiro_api) = setup_test_env();

        // Consulta não cria caixa
        assert!(matches!(
            financeiro_api.consultar_caixa(),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_abertura_explicita() {
        let (_temp_file, _licitacao_api, financeiro_api) = setup_test_env();

        let caixa = financeiro_api.abrir_caixa("teste").unwrap();
        assert_eq!(caixa.saldo, 0.0);

        // Abrir duas vezes não é permitido
        assert!(matches!(
            financeiro_api.abrir_caixa("teste"),
            Err(ApiError::ValidationError(_))
        ));
    }

    // ==========================================
    // Crédito na transição de pagamento
    // ==========================================

    #[test]
    fn test_credito_unico_na_transicao_para_pago() {
        let (_temp_file, licitacao_api, financeiro_api) = setup_test_env();
        financeiro_api.abrir_caixa("teste").unwrap();

        let (contrato_id, valor_esperado) = licitacao_com_fornecimento(&licitacao_api);

        // Fornecimento por si só não toca o caixa
        assert_eq!(financeiro_api.consultar_caixa().unwrap().saldo, 0.0);

        licitacao_api
            .definir_status_pagamento(&contrato_id, "pago", "teste")
            .unwrap();
        assert_eq!(
            financeiro_api.consultar_caixa().unwrap().saldo,
            valor_esperado
        );

        // Repetir a transição é no-op: nenhum segundo crédito
        licitacao_api
            .definir_status_pagamento(&contrato_id, "pago", "teste")
            .unwrap();
        assert_eq!(
            financeiro_api.consultar_caixa().unwrap().saldo,
            valor_esperado
        );

        // Extrato com exatamente uma entrada, etiquetada com a origem
        let movimentos = financeiro_api.listar_movimentos().unwrap();
        assert_eq!(movimentos.len(), 1);
        assert_eq!(movimentos[0].tipo, TipoMovimentacao::Credito);
        assert_eq!(movimentos[0].origem, OrigemMovimentacao::Contrato);
        assert_eq!(movimentos[0].origem_id, Some(contrato_id.clone()));
        assert_eq!(movimentos[0].valor, valor_esperado);

        // Status persistido
        let detalhe = licitacao_api
            .buscar_licitacao_em(&contrato_id, hoje())
            .unwrap();
        assert_eq!(detalhe.contrato.status_pagamento, StatusPagamento::Pago);
    }

    #[test]
    fn test_transicao_reversa_rejeitada() {
        let (_temp_file, licitacao_api, financeiro_api) = setup_test_env();
        financeiro_api.abrir_caixa("teste").unwrap();

        let (contrato_id, _) = licitacao_com_fornecimento(&licitacao_api);
        licitacao_api
            .definir_status_pagamento(&contrato_id, "pago", "teste")
            .unwrap();

        let resultado = licitacao_api.definir_status_pagamento(&contrato_id, "pendente", "teste");
        assert!(matches!(
            resultado,
            Err(ApiError::InvalidStateTransition { .. })
        ));

        // Status permanece pago
        let detalhe = licitacao_api
            .buscar_licitacao_em(&contrato_id, hoje())
            .unwrap();
        assert_eq!(detalhe.contrato.status_pagamento, StatusPagamento::Pago);
    }

    #[test]
    fn test_pendente_para_pendente_e_noop() {
        let (_temp_file, licitacao_api, financeiro_api) = setup_test_env();
        financeiro_api.abrir_caixa("teste").unwrap();

        let (contrato_id, _) = licitacao_com_fornecimento(&licitacao_api);

        licitacao_api
            .definir_status_pagamento(&contrato_id, "pendente", "teste")
            .unwrap();

        assert_eq!(financeiro_api.consultar_caixa().unwrap().saldo, 0.0);
        assert!(financeiro_api.listar_movimentos().unwrap().is_empty());
    }

    #[test]
    fn test_status_invalido_e_contrato_inexistente() {
        let (_temp_file, licitacao_api, financeiro_api) = setup_test_env();
        financeiro_api.abrir_caixa("teste").unwrap();

        let (contrato_id, _) = licitacao_com_fornecimento(&licitacao_api);

        assert!(matches!(
            licitacao_api.definir_status_pagamento(&contrato_id, "estornado", "teste"),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            licitacao_api.definir_status_pagamento("nao-existe", "pago", "teste"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_transicao_sem_caixa_aberto_nao_aplica_status() {
        let (_temp_file, licitacao_api, financeiro_api) = setup_test_env();
        let (contrato_id, valor_esperado) = licitacao_com_fornecimento(&licitacao_api);

        // Caixa fechado: a transição falha inteira (status intacto)
        assert!(matches!(
            licitacao_api.definir_status_pagamento(&contrato_id, "pago", "teste"),
            Err(ApiError::NotFound(_))
        ));
        let detalhe = licitacao_api
            .buscar_licitacao_em(&contrato_id, hoje())
            .unwrap();
        assert_eq!(detalhe.contrato.status_pagamento, StatusPagamento::Pendente);

        // Depois de abrir o caixa, a mesma transição credita uma vez
        financeiro_api.abrir_caixa("teste").unwrap();
        licitacao_api
            .definir_status_pagamento(&contrato_id, "pago", "teste")
            .unwrap();
        assert_eq!(
            financeiro_api.consultar_caixa().unwrap().saldo,
            valor_esperado
        );
    }

    // ==========================================
    // Lançamentos manuais
    // ==========================================

    #[test]
    fn test_movimentos_manuais() {
        let (_temp_file, _licitacao_api, financeiro_api) = setup_test_env();
        financeiro_api.abrir_caixa("teste").unwrap();

        let caixa = financeiro_api
            .registrar_movimento_manual("credito", 100.0, "Aporte inicial", "teste")
            .unwrap();
        assert_eq!(caixa.saldo, 100.0);

        let caixa = financeiro_api
            .registrar_movimento_manual("debito", 40.0, "Compra de material", "teste")
            .unwrap();
        assert_eq!(caixa.saldo, 60.0);

        // Extrato mais recente primeiro, com etiqueta manual
        let movimentos = financeiro_api.listar_movimentos().unwrap();
        assert_eq!(movimentos.len(), 2);
        assert_eq!(movimentos[0].descricao, "Compra de material");
        assert_eq!(movimentos[0].tipo, TipoMovimentacao::Debito);
        assert!(movimentos
            .iter()
            .all(|m| m.origem == OrigemMovimentacao::Manual));
    }

    #[test]
    fn test_movimento_manual_validacoes() {
        let (_temp_file, _licitacao_api, financeiro_api) = setup_test_env();
        financeiro_api.abrir_caixa("teste").unwrap();

        assert!(matches!(
            financeiro_api.registrar_movimento_manual("transferencia", 10.0, "x", "teste"),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            financeiro_api.registrar_movimento_manual("credito", 0.0, "x", "teste"),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            financeiro_api.registrar_movimento_manual("credito", 10.0, "   ", "teste"),
            Err(ApiError::ValidationError(_))
        ));
    }
}
