/*!
 * Vigia Model
 *
 * Modelo MLP multi-tarefa congelado: tronco compartilhado e duas
 * cabeças de saída (conta e transação). O modelo devolve apenas
 * logits; a conversão para probabilidade é responsabilidade do
 * chamador. Inclui o carregador de pesos e a atribuição por ablação.
 */

pub mod attribution;
pub mod loader;
pub mod mlp;

pub use attribution::{AblationExplainer, Explanation};
pub use loader::{global_model, init_global_model};
pub use mlp::{sigmoid, DenseLayer, ModelWeights, MtlMlp};
