// ==========================================
// Teste da API de licitações
// ==========================================
// Responsabilidade: criação do agregado, registro de
// fornecimento parcial, validações e leituras
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod licitacao_api_test {
    use chrono::{Duration, NaiveDate};
    use gestor_licitacoes::api::{
        ApiError, LicitacaoApi, NovaDespesaFornecimento, NovoFornecimento,
    };
    use gestor_licitacoes::domain::types::StatusPagamento;
    use gestor_licitacoes::engine::{AlertaEngine, ResumoEngine};
    use gestor_licitacoes::repository::ContratoRepository;
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    use crate::test_helpers::{create_test_db, nova_licitacao_base, open_test_connection};

    // ==========================================
    // Auxiliares
    // ==========================================

    fn hoje() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn setup_test_env() -> (NamedTempFile, Arc<Mutex<Connection>>, Arc<LicitacaoApi>) {
        let (temp_file, db_path) = create_test_db().unwrap();
        let conn = Arc::new(Mutex::new(open_test_connection(&db_path).unwrap()));

        let contrato_repo = Arc::new(ContratoRepository::from_connection(conn.clone()));
        let licitacao_api = Arc::new(LicitacaoApi::new(
            contrato_repo,
            Arc::new(ResumoEngine::new()),
            Arc::new(AlertaEngine::new()),
        ));

        (temp_file, conn, licitacao_api)
    }

    fn fornecimento_simples(item_id: &str, quantidade: f64) -> NovoFornecimento {
        NovoFornecimento {
            produto_contrato_id: item_id.to_string(),
            quantidade,
            data_fornecimento: hoje(),
            numero_nota_fornecimento: Some("NF-001/2025".to_string()),
            observacao: Some("Fornecimento parcial".to_string()),
            despesas: Vec::new(),
        }
    }

    // ==========================================
    // Criação e leitura
    // ==========================================

    #[test]
    fn test_criar_e_buscar_licitacao() {
        let (_temp_file, _conn, api) = setup_test_env();

        let criado = api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();

        assert_eq!(criado.itens.len(), 2);
        assert_eq!(criado.status_pagamento, StatusPagamento::Pendente);
        assert_eq!(criado.itens[0].quantidade_contratada, 100.0);
        assert_eq!(criado.itens[0].quantidade_fornecida, 0.0);
        assert_eq!(criado.itens[0].quantidade_restante, 100.0);
        assert_eq!(criado.itens[0].lucro_unitario, 4.0);

        // Resumo inicial já calculado
        assert_eq!(criado.resumo.valor_total_venda, 3325.00);
        assert_eq!(criado.resumo.valor_total_compra, 2050.00);
        assert_eq!(criado.resumo.despesas_totais, 425.00);
        assert_eq!(criado.resumo.lucro_total, -425.00);

        // Round-trip: leitura devolve o mesmo estado
        let detalhe = api.buscar_licitacao_em(&criado.id, hoje()).unwrap();
        let lido = &detalhe.contrato;
        assert_eq!(lido.numero_licitacao, criado.numero_licitacao);
        assert_eq!(lido.vigencia.numero_contrato, "CT-2025/001");
        assert_eq!(lido.itens.len(), 2);
        assert_eq!(lido.itens[0].quantidade_fornecida, 0.0);
        assert_eq!(lido.resumo.lucro_total, -425.00);
        assert!(lido.fornecimentos.is_empty());

        // Vigência de um ano: sem alertas na criação
        assert!(detalhe.alertas.is_empty());
    }

    #[test]
    fn test_buscar_inexistente() {
        let (_temp_file, _conn, api) = setup_test_env();

        let resultado = api.buscar_licitacao_em("nao-existe", hoje());
        assert!(matches!(resultado, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_validacoes_de_criacao() {
        let (_temp_file, _conn, api) = setup_test_env();

        // Sem produtos
        let mut dados = nova_licitacao_base(hoje());
        dados.produtos.clear();
        assert!(matches!(
            api.criar_licitacao(dados, "teste"),
            Err(ApiError::ValidationError(_))
        ));

        // Quantidade contratada não positiva
        let mut dados = nova_licitacao_base(hoje());
        dados.produtos[0].quantidade_contratada = 0.0;
        assert!(matches!(
            api.criar_licitacao(dados, "teste"),
            Err(ApiError::ValidationError(_))
        ));

        // Vigência invertida
        let mut dados = nova_licitacao_base(hoje());
        dados.data_fim_contrato = dados.data_inicio_contrato - Duration::days(1);
        assert!(matches!(
            api.criar_licitacao(dados, "teste"),
            Err(ApiError::ValidationError(_))
        ));

        // Status de contrato desconhecido
        let mut dados = nova_licitacao_base(hoje());
        dados.status_contrato = Some("suspenso".to_string());
        assert!(matches!(
            api.criar_licitacao(dados, "teste"),
            Err(ApiError::ValidationError(_))
        ));

        // Nada foi gravado nas tentativas inválidas
        assert!(api.listar_licitacoes_em(hoje()).unwrap().is_empty());
    }

    // ==========================================
    // Registro de fornecimento
    // ==========================================

    #[test]
    fn test_registrar_fornecimento_parcial() {
        let (_temp_file, _conn, api) = setup_test_env();
        let criado = api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();
        let item_id = criado.itens[0].id.clone();

        let resumo = api
            .registrar_fornecimento(&criado.id, fornecimento_simples(&item_id, 30.0), "teste")
            .unwrap();

        // Resumo devolvido pela própria operação
        assert_eq!(resumo.quantidade_total_fornecida, 30.0);
        assert_eq!(resumo.quantidade_total_restante, 120.0);
        assert!((resumo.percentual_executado - 20.0).abs() < 1e-9);

        // Estado persistido do item e do log
        let detalhe = api.buscar_licitacao_em(&criado.id, hoje()).unwrap();
        let item = &detalhe.contrato.itens[0];
        assert_eq!(item.quantidade_fornecida, 30.0);
        assert_eq!(item.quantidade_restante, 70.0);
        assert_eq!(detalhe.contrato.fornecimentos.len(), 1);
        assert_eq!(detalhe.contrato.fornecimentos[0].quantidade, 30.0);
        assert_eq!(
            detalhe.contrato.fornecimentos[0].numero_nota_fornecimento,
            Some("NF-001/2025".to_string())
        );
    }

    #[test]
    fn test_fornecimento_excedente_rejeitado() {
        let (_temp_file, _conn, api) = setup_test_env();
        let criado = api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();
        let item_id = criado.itens[0].id.clone();

        api.registrar_fornecimento(&criado.id, fornecimento_simples(&item_id, 30.0), "teste")
            .unwrap();

        // Restante é 70; pedir 80 precisa falhar
        let resultado =
            api.registrar_fornecimento(&criado.id, fornecimento_simples(&item_id, 80.0), "teste");
        match resultado {
            Err(ApiError::QuantityExceeded {
                solicitado,
                restante,
                ..
            }) => {
                assert_eq!(solicitado, 80.0);
                assert_eq!(restante, 70.0);
            }
            outro => panic!("esperado QuantityExceeded, veio {:?}", outro),
        }

        // Nada mudou no estado persistido
        let detalhe = api.buscar_licitacao_em(&criado.id, hoje()).unwrap();
        assert_eq!(detalhe.contrato.itens[0].quantidade_fornecida, 30.0);
        assert_eq!(detalhe.contrato.itens[0].quantidade_restante, 70.0);
        assert_eq!(detalhe.contrato.fornecimentos.len(), 1);
    }

    #[test]
    fn test_fornecimento_validacoes() {
        let (_temp_file, _conn, api) = setup_test_env();
        let criado = api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();
        let item_id = criado.itens[0].id.clone();

        // Quantidade não positiva
        assert!(matches!(
            api.registrar_fornecimento(&criado.id, fornecimento_simples(&item_id, 0.0), "teste"),
            Err(ApiError::ValidationError(_))
        ));

        // Contrato inexistente
        assert!(matches!(
            api.registrar_fornecimento("nao-existe", fornecimento_simples(&item_id, 10.0), "teste"),
            Err(ApiError::NotFound(_))
        ));

        // Item inexistente
        assert!(matches!(
            api.registrar_fornecimento(
                &criado.id,
                fornecimento_simples("item-fantasma", 10.0),
                "teste"
            ),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_fornecimento_com_despesas() {
        let (_temp_file, _conn, api) = setup_test_env();
        let criado = api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();
        let item_id = criado.itens[0].id.clone();

        let mut dados = fornecimento_simples(&item_id, 30.0);
        dados.despesas = vec![
            NovaDespesaFornecimento {
                descricao: "Transporte".to_string(),
                valor: 35.50,
            },
            NovaDespesaFornecimento {
                descricao: "Carga e descarga".to_string(),
                valor: 14.50,
            },
        ];

        let resumo = api.registrar_fornecimento(&criado.id, dados, "teste").unwrap();

        // Encargos fixos + despesas do fornecimento
        assert_eq!(resumo.despesas_totais, 475.00);

        let detalhe = api.buscar_licitacao_em(&criado.id, hoje()).unwrap();
        let fornecimento = &detalhe.contrato.fornecimentos[0];
        assert_eq!(fornecimento.despesa_total, 50.00);
        assert_eq!(fornecimento.despesas.len(), 2);
        assert_eq!(fornecimento.despesas[0].descricao, "Transporte");
    }

    #[test]
    fn test_log_de_fornecimentos_em_ordem_de_registro() {
        let (_temp_file, _conn, api) = setup_test_env();
        let criado = api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();
        let item_a = criado.itens[0].id.clone();
        let item_b = criado.itens[1].id.clone();

        api.registrar_fornecimento(&criado.id, fornecimento_simples(&item_a, 10.0), "teste")
            .unwrap();
        api.registrar_fornecimento(&criado.id, fornecimento_simples(&item_b, 5.0), "teste")
            .unwrap();
        api.registrar_fornecimento(&criado.id, fornecimento_simples(&item_a, 20.0), "teste")
            .unwrap();

        let detalhe = api.buscar_licitacao_em(&criado.id, hoje()).unwrap();
        let quantidades: Vec<f64> = detalhe
            .contrato
            .fornecimentos
            .iter()
            .map(|f| f.quantidade)
            .collect();

        assert_eq!(quantidades, vec![10.0, 5.0, 20.0]);
    }

    // ==========================================
    // Listagem e exclusão
    // ==========================================

    #[test]
    fn test_listagem_por_data_de_empenho_decrescente() {
        let (_temp_file, _conn, api) = setup_test_env();

        for (numero, dias_atras) in [("PE-A", 30), ("PE-B", 10), ("PE-C", 20)] {
            let mut dados = nova_licitacao_base(hoje() - Duration::days(dias_atras));
            dados.numero_licitacao = numero.to_string();
            api.criar_licitacao(dados, "teste").unwrap();
        }

        let lista = api.listar_licitacoes_em(hoje()).unwrap();
        let numeros: Vec<&str> = lista
            .iter()
            .map(|d| d.contrato.numero_licitacao.as_str())
            .collect();

        // Empenhos mais recentes primeiro
        assert_eq!(numeros, vec!["PE-B", "PE-C", "PE-A"]);

        // Toda entrada da listagem traz resumo e alertas calculados
        for detalhe in &lista {
            assert_eq!(detalhe.contrato.resumo.quantidade_total_contratada, 150.0);
        }
    }

    #[test]
    fn test_alertas_na_leitura() {
        let (_temp_file, _conn, api) = setup_test_env();

        // Contrato terminando em 10 dias, sem execução
        let mut dados = nova_licitacao_base(hoje() - Duration::days(355));
        dados.data_fim_contrato = hoje() + Duration::days(10);
        let criado = api.criar_licitacao(dados, "teste").unwrap();

        let detalhe = api.buscar_licitacao_em(&criado.id, hoje()).unwrap();
        assert_eq!(detalhe.alertas, vec!["Contrato vence em 10 dias".to_string()]);

        // A mesma leitura depois do vencimento muda o alerta
        let depois = api
            .buscar_licitacao_em(&criado.id, hoje() + Duration::days(11))
            .unwrap();
        assert_eq!(depois.alertas, vec!["Contrato VENCIDO".to_string()]);
    }

    #[test]
    fn test_excluir_licitacao() {
        let (_temp_file, _conn, api) = setup_test_env();
        let criado = api
            .criar_licitacao(nova_licitacao_base(hoje()), "teste")
            .unwrap();

        api.excluir_licitacao(&criado.id, "teste").unwrap();

        assert!(matches!(
            api.buscar_licitacao_em(&criado.id, hoje()),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            api.excluir_licitacao(&criado.id, "teste"),
            Err(ApiError::NotFound(_))
        ));
    }
}
