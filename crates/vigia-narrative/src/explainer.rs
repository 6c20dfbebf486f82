//! Composição do prompt, truncamento local e fallback determinístico.
//! O serviço remoto não é confiável para respeitar o teto de palavras,
//! então o teto é imposto localmente após a geração.

use crate::translate::translate_feature;
use crate::{Narrative, NarrativeModel, RiskTier};
use std::sync::Arc;
use tracing::warn;
use vigia_core::types::{FeatureContribution, Task};

/// Número de contribuições descritas no prompt
pub const TOP_FEATURES_IN_PROMPT: usize = 5;

/// Gerador de narrativas sobre um resultado de atribuição
pub struct NarrativeExplainer {
    model: Arc<dyn NarrativeModel>,
}

impl NarrativeExplainer {
    pub fn new(model: Arc<dyn NarrativeModel>) -> Self {
        Self { model }
    }

    /// Gera a narrativa para uma predição. Nunca falha: qualquer erro
    /// do serviço remoto degrada para a sentença local, que nunca é
    /// vazia e respeita o teto de palavras.
    pub async fn explain(
        &self,
        probability: f64,
        task: Task,
        top_features: &[FeatureContribution],
        max_words: usize,
    ) -> Narrative {
        let max_words = max_words.max(1);
        let tier = RiskTier::from_probability(probability);
        let prompt = compose_prompt(probability, tier, task, top_features, max_words);

        match self.model.generate(&prompt).await {
            Ok(text) => Narrative::Generated(truncate_words(text.trim(), max_words)),
            Err(err) => {
                warn!(%task, "Narrativa degradada para o fallback local: {}", err);
                let cause = err.to_string();
                Narrative::Degraded {
                    text: fallback_text(probability, tier, top_features, &cause, max_words),
                    cause,
                }
            }
        }
    }
}

fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

fn format_features(top_features: &[FeatureContribution]) -> String {
    top_features
        .iter()
        .take(TOP_FEATURES_IN_PROMPT)
        .map(|f| {
            let impact = if f.shap_value > 0.0 {
                "increasing risk"
            } else {
                "decreasing risk"
            };
            format!(
                "- {} (value={:.2}): {}, importance={:.4}",
                translate_feature(&f.feature_name),
                f.feature_value,
                impact,
                f.shap_value.abs()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn compose_prompt(
    probability: f64,
    tier: RiskTier,
    task: Task,
    top_features: &[FeatureContribution],
    max_words: usize,
) -> String {
    format!(
        "You are a Web3 security expert. Explain why these features are important for detecting {task}-level phishing/scam activities in a short, concise way (under {max_words} words).\n\n\
         PREDICTION: {} ({})\n\n\
         TOP 5 IMPORTANT FEATURES:\n{}\n\n\
         Explain:\n\
         1. Why the most important feature (first one) is dangerous/suspicious\n\
         2. What these features indicate about potential scam activity\n\
         3. A brief risk assessment\n\n\
         Keep it concise and focused on practical implications. Maximum {max_words} words.",
        format_percent(probability),
        tier.label(),
        format_features(top_features),
    )
}

/// Sentença determinística usada quando o serviço remoto falha
fn fallback_text(
    probability: f64,
    tier: RiskTier,
    top_features: &[FeatureContribution],
    cause: &str,
    max_words: usize,
) -> String {
    let top_feature = match top_features.first() {
        Some(top) => format!(
            " Top feature: {} shows {} pattern.",
            translate_feature(&top.feature_name),
            if top.shap_value > 0.0 { "high risk" } else { "low risk" }
        ),
        None => String::new(),
    };
    let text = format!(
        "Risk level: {} ({}).{} Error generating detailed explanation: {}",
        tier.label(),
        format_percent(probability),
        top_feature,
        cause
    );
    truncate_words(&text, max_words)
}

/// Trunca o texto em `max_words` palavras, marcando com reticências
fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.to_string()
    } else {
        format!("{}...", words[..max_words].join(" "))
    }
}
