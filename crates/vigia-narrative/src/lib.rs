/*!
 * Vigia Narrative
 *
 * Renderização em linguagem natural de um resultado de atribuição. O
 * texto é gerado por um serviço remoto de LLM; qualquer falha é
 * recuperada localmente com uma sentença determinística, nunca
 * propagada ao chamador.
 */

pub mod explainer;
pub mod gemini;
pub mod translate;

pub use explainer::{NarrativeExplainer, TOP_FEATURES_IN_PROMPT};
pub use gemini::{GeminiClient, NarrativeConfig};
pub use translate::translate_feature;

use async_trait::async_trait;
use vigia_core::error::Result;

/// Serviço remoto de geração de texto. O serviço é best-effort: os
/// chamadores devem tratar qualquer erro como degradação, não como
/// falha da requisição.
#[async_trait]
pub trait NarrativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Resultado da etapa de narrativa. A degradação carrega a causa para
/// diagnóstico, mas o texto resultante nunca é vazio.
#[derive(Debug, Clone, PartialEq)]
pub enum Narrative {
    Generated(String),
    Degraded { text: String, cause: String },
}

impl Narrative {
    pub fn text(&self) -> &str {
        match self {
            Narrative::Generated(text) => text,
            Narrative::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Narrative::Degraded { .. })
    }
}

/// Faixa de risco derivada da probabilidade predita
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Classifica por limiar: > 0.7 alto, > 0.4 médio, senão baixo
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.7 {
            RiskTier::High
        } else if probability > 0.4 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Rótulo usado no prompt e no fallback
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH RISK",
            RiskTier::Medium => "MEDIUM RISK",
            RiskTier::Low => "LOW RISK",
        }
    }
}
