//! Resultado da detecção como união etiquetada: cada modo carrega
//! apenas os campos válidos para ele, tornando irrepresentável, por
//! exemplo, uma probabilidade de conta em modo transaction_only. A
//! forma achatada do contrato público é produzida por conversão
//! explícita.

use ethereum_types::Address;
use serde::{Deserialize, Serialize};
use vigia_core::utils::format_address;
use vigia_model::Explanation;
use vigia_narrative::Narrative;

/// Número de contribuições expostas no bloco de explicações da resposta
const RESPONSE_TOP_FEATURES: usize = 5;

/// Predições válidas de uma detecção, derivadas exclusivamente da
/// disponibilidade de dados
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Histórico disponível: ambas as cabeças pontuadas
    Full {
        account_probability: f64,
        transaction_probability: f64,
    },
    /// Transação isolada: pontuação de conta estruturalmente impossível
    TransactionOnly { transaction_probability: f64 },
    /// Endereço sem histórico: caminho terminal de sucesso, não erro
    NoData { message: String },
}

impl Detection {
    /// Etiqueta do modo no contrato público
    pub fn mode(&self) -> &'static str {
        match self {
            Detection::Full { .. } => "full",
            Detection::TransactionOnly { .. } => "transaction_only",
            Detection::NoData { .. } => "no_data",
        }
    }
}

/// Blocos de atribuição por tarefa. Um lado ausente significa que a
/// atribuição daquela tarefa falhou ou não foi solicitada.
#[derive(Debug, Clone, Default)]
pub struct ExplanationSet {
    pub account: Option<Explanation>,
    pub transaction: Option<Explanation>,
}

impl ExplanationSet {
    pub fn is_empty(&self) -> bool {
        self.account.is_none() && self.transaction.is_none()
    }
}

/// Narrativas por tarefa. Degradações ficam isoladas por tarefa: a
/// falha de uma narrativa nunca remove a outra.
#[derive(Debug, Clone, Default)]
pub struct NarrativeSet {
    pub account: Option<Narrative>,
    pub transaction: Option<Narrative>,
}

/// Resultado completo de uma requisição de detecção
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub account_address: Address,
    pub to_address: Option<Address>,
    pub transactions_count: usize,
    pub detection: Detection,
    pub explanations: Option<ExplanationSet>,
    pub narratives: Option<NarrativeSet>,
}

/// Bloco de atribuição no contrato público. A lista de contribuições é
/// limitada às top-5; a lista completa permanece disponível no
/// `DetectionReport` para consumidores programáticos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationBlock {
    pub account: Option<Explanation>,
    pub transaction: Option<Explanation>,
}

/// Bloco de narrativas no contrato público
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmExplanationBlock {
    pub account: Option<String>,
    pub transaction: Option<String>,
}

/// Forma achatada e estável da resposta de detecção
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub account_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    pub account_scam_probability: Option<f64>,
    pub transaction_scam_probability: Option<f64>,
    pub transactions_count: usize,
    pub detection_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanations: Option<ExplanationBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_explanations: Option<LlmExplanationBlock>,
}

impl DetectionReport {
    /// Converte para a forma pública achatada
    pub fn to_response(&self) -> DetectionResponse {
        let (account_probability, transaction_probability, message) = match &self.detection {
            Detection::Full {
                account_probability,
                transaction_probability,
            } => (Some(*account_probability), Some(*transaction_probability), None),
            Detection::TransactionOnly {
                transaction_probability,
            } => (None, Some(*transaction_probability), None),
            Detection::NoData { message } => (None, None, Some(message.clone())),
        };

        DetectionResponse {
            account_address: format_address(&self.account_address),
            to_address: self.to_address.as_ref().map(format_address),
            account_scam_probability: account_probability,
            transaction_scam_probability: transaction_probability,
            transactions_count: self.transactions_count,
            detection_mode: self.detection.mode().to_string(),
            message,
            explanations: self.explanations.as_ref().map(|set| ExplanationBlock {
                account: set.account.as_ref().map(capped),
                transaction: set.transaction.as_ref().map(capped),
            }),
            llm_explanations: self.narratives.as_ref().map(|set| LlmExplanationBlock {
                account: set.account.as_ref().map(|n| n.text().to_string()),
                transaction: set.transaction.as_ref().map(|n| n.text().to_string()),
            }),
        }
    }
}

fn capped(explanation: &Explanation) -> Explanation {
    Explanation {
        probability: explanation.probability,
        feature_importance: explanation.top(RESPONSE_TOP_FEATURES).to_vec(),
    }
}
