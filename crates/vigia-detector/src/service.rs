//! Serviço de detecção: sequencia os colaboradores externos por
//! requisição. As predições nunca são sacrificadas por uma explicação:
//! os estágios de explicação são estritamente aditivos e suas falhas
//! degradam localmente sem desfazer uma predição já computada.

use crate::report::{Detection, DetectionReport, ExplanationSet, NarrativeSet};
use ethereum_types::Address;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vigia_core::error::Result;
use vigia_core::traits::{TransactionProvider, TxEnricher};
use vigia_core::types::{RawTransaction, Task};
use vigia_core::utils::format_address;
use vigia_features::{account_features, feature_names, transaction_features, FeatureVector};
use vigia_model::{sigmoid, AblationExplainer, Explanation, MtlMlp};
use vigia_narrative::NarrativeExplainer;

/// Número de contribuições passadas à camada de narrativa
const NARRATIVE_TOP_FEATURES: usize = 5;

/// Configuração do orquestrador
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Limite de transações buscadas por requisição de conta
    pub max_transactions: usize,
    /// Teto de palavras das narrativas geradas
    pub narrative_max_words: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_transactions: 1000,
            narrative_max_words: 100,
        }
    }
}

/// Camadas de explicação solicitadas pela requisição
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplainOptions {
    /// Inclui atribuição por feature
    pub attributions: bool,
    /// Inclui narrativas geradas por LLM (implica atribuição)
    pub narratives: bool,
}

impl ExplainOptions {
    fn wants_attribution(&self) -> bool {
        self.attributions || self.narratives
    }
}

/// Orquestrador da detecção
pub struct DetectionService {
    provider: Arc<dyn TransactionProvider>,
    enricher: Arc<dyn TxEnricher>,
    model: Arc<MtlMlp>,
    attribution: AblationExplainer,
    narrative: Option<NarrativeExplainer>,
    config: DetectionConfig,
}

impl DetectionService {
    /// Cria o serviço. O explicador de narrativa é opcional: sem ele,
    /// requisições com narrativa seguem normalmente sem o bloco de
    /// narrativas.
    pub fn new(
        provider: Arc<dyn TransactionProvider>,
        enricher: Arc<dyn TxEnricher>,
        model: Arc<MtlMlp>,
        narrative: Option<NarrativeExplainer>,
        config: DetectionConfig,
    ) -> Self {
        if narrative.is_none() {
            warn!("Explicador de narrativa não configurado; narrativas serão omitidas");
        }
        Self {
            provider,
            enricher,
            attribution: AblationExplainer::new(model.clone()),
            model,
            narrative,
            config,
        }
    }

    /// Detecta phishing/scam para uma transação isolada. A pontuação de
    /// conta é estruturalmente impossível sem histórico, então o modo é
    /// sempre `transaction_only`.
    pub async fn detect_transaction(
        &self,
        tx: RawTransaction,
        opts: ExplainOptions,
    ) -> Result<DetectionReport> {
        let account_address = tx.from_address;
        let to_address = tx.to_address;
        debug!(from = %format_address(&account_address), "Detecção por transação");

        let enriched = self.enricher.enrich(tx).await;
        let vector = transaction_features(std::slice::from_ref(&enriched))?;
        let probability = sigmoid(self.model.predict(&vector)?);

        let mut report = DetectionReport {
            account_address,
            to_address,
            transactions_count: 1,
            detection: Detection::TransactionOnly {
                transaction_probability: probability,
            },
            explanations: None,
            narratives: None,
        };

        if opts.wants_attribution() {
            let explanation = self.try_explain(&vector);
            if let Some(explanation) = explanation {
                if opts.narratives {
                    if let Some(explainer) = &self.narrative {
                        let narrative = explainer
                            .explain(
                                probability,
                                Task::Transaction,
                                explanation.top(NARRATIVE_TOP_FEATURES),
                                self.config.narrative_max_words,
                            )
                            .await;
                        report.narratives = Some(NarrativeSet {
                            account: None,
                            transaction: Some(narrative),
                        });
                    }
                }
                report.explanations = Some(ExplanationSet {
                    account: None,
                    transaction: Some(explanation),
                });
            }
        }

        Ok(report)
    }

    /// Detecta phishing/scam para uma conta a partir do seu histórico.
    /// Um endereço sem transações é um caminho terminal de sucesso
    /// (`no_data`), não um erro.
    pub async fn detect_account(
        &self,
        address: Address,
        opts: ExplainOptions,
    ) -> Result<DetectionReport> {
        info!(address = %format_address(&address), "Detecção por conta");

        let txs = self
            .provider
            .fetch_transactions(address, self.config.max_transactions)
            .await?;

        if txs.is_empty() {
            return Ok(DetectionReport {
                account_address: address,
                to_address: None,
                transactions_count: 0,
                detection: Detection::NoData {
                    message: "No transactions found for this address. Please provide \
                              transaction data for transaction-level detection."
                        .to_string(),
                },
                explanations: None,
                narratives: None,
            });
        }

        let enriched = self.enricher.enrich_batch(txs).await;
        debug!(count = enriched.len(), "Histórico enriquecido");

        let account_vector = account_features(address, &enriched)?;
        let transaction_vector = transaction_features(&enriched)?;

        let account_probability = sigmoid(self.model.predict(&account_vector)?);
        let transaction_probability = sigmoid(self.model.predict(&transaction_vector)?);

        let mut report = DetectionReport {
            account_address: address,
            to_address: None,
            transactions_count: enriched.len(),
            detection: Detection::Full {
                account_probability,
                transaction_probability,
            },
            explanations: None,
            narratives: None,
        };

        if opts.wants_attribution() {
            let set = ExplanationSet {
                account: self.try_explain(&account_vector),
                transaction: self.try_explain(&transaction_vector),
            };

            if opts.narratives {
                if let Some(explainer) = &self.narrative {
                    // Isolamento por tarefa: a degradação de uma
                    // narrativa nunca remove a da outra tarefa.
                    let mut narratives = NarrativeSet::default();
                    if let Some(explanation) = &set.account {
                        narratives.account = Some(
                            explainer
                                .explain(
                                    account_probability,
                                    Task::Account,
                                    explanation.top(NARRATIVE_TOP_FEATURES),
                                    self.config.narrative_max_words,
                                )
                                .await,
                        );
                    }
                    if let Some(explanation) = &set.transaction {
                        narratives.transaction = Some(
                            explainer
                                .explain(
                                    transaction_probability,
                                    Task::Transaction,
                                    explanation.top(NARRATIVE_TOP_FEATURES),
                                    self.config.narrative_max_words,
                                )
                                .await,
                        );
                    }
                    if narratives.account.is_some() || narratives.transaction.is_some() {
                        report.narratives = Some(narratives);
                    }
                }
            }

            if !set.is_empty() {
                report.explanations = Some(set);
            }
        }

        Ok(report)
    }

    /// Computa a atribuição de um vetor; falhas degradam para bloco
    /// ausente sem desfazer a predição
    fn try_explain(&self, vector: &FeatureVector) -> Option<Explanation> {
        let names = feature_names(vector.task());
        match self.attribution.explain(vector, names, true) {
            Ok(explanation) => Some(explanation),
            Err(err) => {
                warn!(task = %vector.task(), "Atribuição indisponível: {}", err);
                None
            }
        }
    }
}
