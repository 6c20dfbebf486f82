use async_trait::async_trait;
use ethereum_types::{Address, H256, U256};
use std::sync::Arc;
use vigia_core::error::Result;
use vigia_core::traits::{TransactionProvider, TxEnricher};
use vigia_core::types::{EnrichedTransaction, RawTransaction};
use vigia_core::Error;
use vigia_detector::{DetectionConfig, DetectionService, ExplainOptions};
use vigia_model::{DenseLayer, ModelWeights, MtlMlp};
use vigia_narrative::{NarrativeExplainer, NarrativeModel};

struct MockProvider {
    txs: Vec<RawTransaction>,
    fail: bool,
}

#[async_trait]
impl TransactionProvider for MockProvider {
    async fn fetch_transactions(
        &self,
        _address: Address,
        max_count: usize,
    ) -> Result<Vec<RawTransaction>> {
        if self.fail {
            return Err(Error::UpstreamUnavailable("provedor fora do ar".to_string()));
        }
        Ok(self.txs.iter().take(max_count).cloned().collect())
    }
}

struct PassthroughEnricher;

#[async_trait]
impl TxEnricher for PassthroughEnricher {
    async fn enrich(&self, tx: RawTransaction) -> EnrichedTransaction {
        EnrichedTransaction::zero_filled(tx)
    }

    async fn enrich_batch(&self, txs: Vec<RawTransaction>) -> Vec<EnrichedTransaction> {
        txs.into_iter()
            .map(EnrichedTransaction::zero_filled)
            .collect()
    }
}

struct FailingNarrative;

#[async_trait]
impl NarrativeModel for FailingNarrative {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::Narrative("transporte indisponível".to_string()))
    }
}

fn tiny_model() -> Arc<MtlMlp> {
    let shared = vec![DenseLayer {
        weights: (0..4)
            .map(|row| (0..15).map(|col| ((row + col) % 3) as f32 * 0.1).collect())
            .collect(),
        bias: vec![0.1; 4],
    }];
    let account_head = vec![DenseLayer {
        weights: vec![vec![0.5, -0.25, 0.125, 0.0625]],
        bias: vec![0.0],
    }];
    let transaction_head = vec![DenseLayer {
        weights: vec![vec![-0.5, 0.25, -0.125, 0.75]],
        bias: vec![0.2],
    }];
    Arc::new(
        MtlMlp::new(ModelWeights {
            shared,
            account_head,
            transaction_head,
        })
        .unwrap(),
    )
}

fn account() -> Address {
    Address::repeat_byte(0xaa)
}

fn history() -> Vec<RawTransaction> {
    let other = Address::repeat_byte(0xbb);
    (0u64..3)
        .map(|i| RawTransaction {
            from_address: if i % 2 == 0 { account() } else { other },
            to_address: Some(if i % 2 == 0 { other } else { account() }),
            value: U256::from(i) * U256::exp10(18),
            gas_price: 2_000_000_000,
            gas_used: 21_000,
            timestamp: 1_700_000_000 + i * 600,
            input: if i == 0 { "0x095ea7b3" } else { "0x" }.to_string(),
            hash: H256::repeat_byte(i as u8 + 1),
            block_number: 100 + i,
        })
        .collect()
}

fn service(
    provider: MockProvider,
    narrative: Option<NarrativeExplainer>,
    config: DetectionConfig,
) -> DetectionService {
    DetectionService::new(
        Arc::new(provider),
        Arc::new(PassthroughEnricher),
        tiny_model(),
        narrative,
        config,
    )
}

#[tokio::test]
async fn empty_history_is_terminal_no_data() {
    let svc = service(
        MockProvider { txs: Vec::new(), fail: false },
        None,
        DetectionConfig::default(),
    );
    // Flags de explicação não mudam o caminho terminal
    let report = svc
        .detect_account(
            account(),
            ExplainOptions {
                attributions: true,
                narratives: true,
            },
        )
        .await
        .unwrap();

    let value = serde_json::to_value(report.to_response()).unwrap();
    assert_eq!(value["detection_mode"], "no_data");
    assert!(value["account_scam_probability"].is_null());
    assert!(value["transaction_scam_probability"].is_null());
    assert_eq!(value["transactions_count"], 0);
    assert!(value["message"].as_str().unwrap().contains("No transactions found"));
    assert!(value.get("explanations").is_none());
    assert!(value.get("llm_explanations").is_none());
}

#[tokio::test]
async fn full_detection_scores_both_tasks() {
    let svc = service(
        MockProvider { txs: history(), fail: false },
        None,
        DetectionConfig::default(),
    );
    let report = svc
        .detect_account(account(), ExplainOptions::default())
        .await
        .unwrap();

    let response = report.to_response();
    assert_eq!(response.detection_mode, "full");
    assert_eq!(response.transactions_count, 3);
    for probability in [
        response.account_scam_probability.unwrap(),
        response.transaction_scam_probability.unwrap(),
    ] {
        assert!((0.0..=1.0).contains(&probability));
    }
}

#[tokio::test]
async fn respects_max_transactions_bound() {
    let svc = service(
        MockProvider { txs: history(), fail: false },
        None,
        DetectionConfig {
            max_transactions: 2,
            ..Default::default()
        },
    );
    let report = svc
        .detect_account(account(), ExplainOptions::default())
        .await
        .unwrap();
    assert_eq!(report.transactions_count, 2);
}

#[tokio::test]
async fn attribution_covers_both_tasks() {
    let svc = service(
        MockProvider { txs: history(), fail: false },
        None,
        DetectionConfig::default(),
    );
    let report = svc
        .detect_account(
            account(),
            ExplainOptions {
                attributions: true,
                narratives: false,
            },
        )
        .await
        .unwrap();

    let set = report.explanations.as_ref().expect("atribuição solicitada");
    let account_expl = set.account.as_ref().expect("bloco de conta");
    let tx_expl = set.transaction.as_ref().expect("bloco de transação");
    for explanation in [account_expl, tx_expl] {
        assert_eq!(explanation.feature_importance.len(), 15);
        for pair in explanation.feature_importance.windows(2) {
            assert!(pair[0].shap_value.abs() >= pair[1].shap_value.abs());
        }
    }
    assert!(report.narratives.is_none());
}

#[tokio::test]
async fn provider_outage_fails_the_request() {
    let svc = service(
        MockProvider { txs: Vec::new(), fail: true },
        None,
        DetectionConfig::default(),
    );
    let err = svc
        .detect_account(account(), ExplainOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn narrative_outage_degrades_each_task_in_isolation() {
    let svc = service(
        MockProvider { txs: history(), fail: false },
        Some(NarrativeExplainer::new(Arc::new(FailingNarrative))),
        DetectionConfig::default(),
    );
    let report = svc
        .detect_account(
            account(),
            ExplainOptions {
                attributions: true,
                narratives: true,
            },
        )
        .await
        .unwrap();

    // Predições intactas
    assert!(matches!(
        report.detection,
        vigia_detector::Detection::Full { .. }
    ));

    let response = report.to_response();
    let block = response.llm_explanations.expect("narrativa solicitada");
    for text in [block.account.unwrap(), block.transaction.unwrap()] {
        assert!(!text.is_empty());
        assert!(text.contains("Error generating detailed explanation"));
    }
}
