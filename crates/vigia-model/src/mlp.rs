//! Forward pass do MLP multi-tarefa. Os pesos são imutáveis após a
//! carga, então `predict` é seguro para chamadas concorrentes.

use serde::{Deserialize, Serialize};
use vigia_core::error::Result;
use vigia_core::types::Task;
use vigia_core::Error;
use vigia_features::FeatureVector;

/// Camada densa: `weights[saida][entrada]` e um bias por saída
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    fn in_dim(&self) -> usize {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    fn out_dim(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                row.iter()
                    .zip(input)
                    .map(|(w, x)| w * x)
                    .sum::<f32>()
                    + bias
            })
            .collect()
    }

    fn validate(&self, name: &str, index: usize) -> Result<()> {
        if self.weights.is_empty() {
            return Err(Error::ModelLoad(format!(
                "Camada {index} de {name} sem pesos"
            )));
        }
        let in_dim = self.in_dim();
        if self.weights.iter().any(|row| row.len() != in_dim) {
            return Err(Error::ModelLoad(format!(
                "Camada {index} de {name} com linhas de tamanhos diferentes"
            )));
        }
        if self.bias.len() != self.out_dim() {
            return Err(Error::ModelLoad(format!(
                "Camada {index} de {name}: bias com {} elementos para {} saídas",
                self.bias.len(),
                self.out_dim()
            )));
        }
        Ok(())
    }
}

/// Checkpoint completo do modelo: tronco compartilhado e duas cabeças
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelWeights {
    pub shared: Vec<DenseLayer>,
    pub account_head: Vec<DenseLayer>,
    pub transaction_head: Vec<DenseLayer>,
}

/// Modelo MLP multi-tarefa com pesos congelados
#[derive(Debug)]
pub struct MtlMlp {
    weights: ModelWeights,
    input_dim: usize,
}

impl MtlMlp {
    /// Constrói o modelo validando a consistência dimensional do
    /// checkpoint (encadeamento de camadas e saída escalar das cabeças)
    pub fn new(weights: ModelWeights) -> Result<Self> {
        let shared_out = validate_chain(&weights.shared, "tronco compartilhado")?;
        for (head, name) in [
            (&weights.account_head, "cabeça de conta"),
            (&weights.transaction_head, "cabeça de transação"),
        ] {
            let head_out = validate_chain(head, name)?;
            let head_in = head
                .first()
                .map(|layer| layer.in_dim())
                .unwrap_or(0);
            if head_in != shared_out {
                return Err(Error::ModelLoad(format!(
                    "{name} espera entrada {head_in}, tronco produz {shared_out}"
                )));
            }
            if head_out != 1 {
                return Err(Error::ModelLoad(format!(
                    "{name} deve produzir um logit escalar, produz {head_out}"
                )));
            }
        }

        let input_dim = weights
            .shared
            .first()
            .map(|layer| layer.in_dim())
            .unwrap_or(0);

        Ok(Self { weights, input_dim })
    }

    /// Dimensão de entrada esperada pelo tronco compartilhado
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Calcula o logit para um vetor já validado contra o schema
    pub fn predict(&self, vector: &FeatureVector) -> Result<f32> {
        self.predict_values(vector.values(), vector.task())
    }

    /// Calcula o logit para valores crus, validando o comprimento
    pub fn predict_values(&self, values: &[f32], task: Task) -> Result<f32> {
        if values.len() != self.input_dim {
            return Err(Error::ShapeMismatch {
                task,
                expected: self.input_dim,
                got: values.len(),
            });
        }

        // Tronco: ReLU após cada camada
        let mut activation = values.to_vec();
        for layer in &self.weights.shared {
            activation = layer.forward(&activation);
            relu(&mut activation);
        }

        // Cabeça da tarefa: ReLU entre camadas, última camada linear
        let head = match task {
            Task::Account => &self.weights.account_head,
            Task::Transaction => &self.weights.transaction_head,
        };
        for (index, layer) in head.iter().enumerate() {
            activation = layer.forward(&activation);
            if index + 1 < head.len() {
                relu(&mut activation);
            }
        }

        Ok(activation[0])
    }
}

/// Valida o encadeamento dimensional de uma sequência de camadas e
/// retorna a dimensão de saída
fn validate_chain(layers: &[DenseLayer], name: &str) -> Result<usize> {
    if layers.is_empty() {
        return Err(Error::ModelLoad(format!("{name} sem camadas")));
    }
    let mut current = layers[0].in_dim();
    for (index, layer) in layers.iter().enumerate() {
        layer.validate(name, index)?;
        if layer.in_dim() != current {
            return Err(Error::ModelLoad(format!(
                "Camada {index} de {name} espera entrada {}, camada anterior produz {current}",
                layer.in_dim()
            )));
        }
        current = layer.out_dim();
    }
    Ok(current)
}

fn relu(values: &mut [f32]) {
    for value in values.iter_mut() {
        if *value < 0.0 {
            *value = 0.0;
        }
    }
}

/// Converte um logit em probabilidade no intervalo (0, 1)
pub fn sigmoid(logit: f32) -> f64 {
    1.0 / (1.0 + (-(logit as f64)).exp())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Modelo pequeno determinístico: 15 -> 4 -> 1 por cabeça, com
    /// pesos distintos entre as cabeças
    pub(crate) fn tiny_model() -> MtlMlp {
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
        MtlMlp::new(ModelWeights {
            shared,
            account_head,
            transaction_head,
        })
        .unwrap()
    }

    #[test]
    fn heads_produce_distinct_logits() {
        let model = tiny_model();
        let input = vec![1.0f32; 15];
        let account = model.predict_values(&input, Task::Account).unwrap();
        let transaction = model.predict_values(&input, Task::Transaction).unwrap();
        assert!(account.is_finite());
        assert!(transaction.is_finite());
        assert_ne!(account, transaction);
    }

    #[test]
    fn wrong_length_is_shape_mismatch() {
        let model = tiny_model();
        let err = model.predict_values(&[0.0; 3], Task::Account).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 15,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn sigmoid_stays_in_open_interval() {
        for logit in [-50.0f32, -1.0, 0.0, 1.0, 50.0] {
            let p = sigmoid(logit);
            assert!(p > 0.0 && p < 1.0, "sigmoid({logit}) = {p}");
        }
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn inconsistent_checkpoint_is_rejected() {
        let bad = ModelWeights {
            shared: vec![DenseLayer {
                weights: vec![vec![0.0; 15]; 4],
                bias: vec![0.0; 4],
            }],
            account_head: vec![DenseLayer {
                // entrada 3 não casa com a saída 4 do tronco
                weights: vec![vec![0.0; 3]],
                bias: vec![0.0],
            }],
            transaction_head: vec![DenseLayer {
                weights: vec![vec![0.0; 4]],
                bias: vec![0.0],
            }],
        };
        assert!(matches!(MtlMlp::new(bad), Err(Error::ModelLoad(_))));
    }
}
