//! Atribuição por ablação: a contribuição de cada feature é a variação
//! do logit quando a feature é levada ao baseline zero. Cada explicação
//! é computada sob demanda contra os pesos correntes; não há cache
//! entre requisições.

use crate::mlp::{sigmoid, MtlMlp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vigia_core::error::Result;
use vigia_core::types::FeatureContribution;
use vigia_core::Error;
use vigia_features::FeatureVector;

/// Número de contribuições consumidas pela camada de narrativa
pub const TOP_FEATURES: usize = 5;

/// Resultado da atribuição para uma predição
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub probability: f64,
    /// Contribuições ordenadas por magnitude absoluta decrescente
    pub feature_importance: Vec<FeatureContribution>,
}

impl Explanation {
    /// Visão limitada para consumidores de narrativa
    pub fn top(&self, count: usize) -> &[FeatureContribution] {
        &self.feature_importance[..self.feature_importance.len().min(count)]
    }
}

/// Motor de atribuição amarrado ao modelo carregado
pub struct AblationExplainer {
    model: Arc<MtlMlp>,
}

impl AblationExplainer {
    pub fn new(model: Arc<MtlMlp>) -> Self {
        Self { model }
    }

    /// Explica uma predição: probabilidade (quando `squash`) e lista
    /// ranqueada de contribuições assinadas, uma por feature do vetor.
    pub fn explain(
        &self,
        vector: &FeatureVector,
        feature_names: &[&str],
        squash: bool,
    ) -> Result<Explanation> {
        if feature_names.len() != vector.len() {
            return Err(Error::ShapeMismatch {
                task: vector.task(),
                expected: feature_names.len(),
                got: vector.len(),
            });
        }

        let task = vector.task();
        let base_logit = self.model.predict(vector)?;
        let probability = if squash {
            sigmoid(base_logit)
        } else {
            base_logit as f64
        };

        let mut contributions = Vec::with_capacity(vector.len());
        let mut ablated = vector.values().to_vec();
        for (index, name) in feature_names.iter().enumerate() {
            let original = ablated[index];
            ablated[index] = 0.0;
            let ablated_logit = self.model.predict_values(&ablated, task)?;
            ablated[index] = original;

            contributions.push(FeatureContribution {
                feature_name: (*name).to_string(),
                feature_value: original as f64,
                shap_value: (base_logit - ablated_logit) as f64,
            });
        }

        contributions.sort_by(|a, b| b.shap_value.abs().total_cmp(&a.shap_value.abs()));

        Ok(Explanation {
            probability,
            feature_importance: contributions,
        })
    }
}
