/*!
 * Vigia Features
 *
 * Schemas de features congelados e montagem de vetores para as duas
 * tarefas do modelo. A ordem dos elementos carrega significado
 * semântico: o i-ésimo valor corresponde ao i-ésimo nome do schema
 * ativo. Schema e montador são versionados juntos.
 */

pub mod account;
pub mod schema;
pub mod transaction;

pub use account::account_features;
pub use schema::{feature_names, schema_len, ACCOUNT_FEATURE_NAMES, TRANSACTION_FEATURE_NAMES};
pub use transaction::transaction_features;

use serde::{Deserialize, Serialize};
use vigia_core::error::Result;
use vigia_core::types::Task;
use vigia_core::Error;

/// Vetor de features ordenado, amarrado ao schema da tarefa.
/// O comprimento é validado na construção; um vetor fora do schema
/// nunca chega ao modelo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    task: Task,
    values: Vec<f32>,
}

impl FeatureVector {
    /// Cria um vetor validando o comprimento contra o schema da tarefa
    pub fn new(task: Task, values: Vec<f32>) -> Result<Self> {
        let expected = schema_len(task);
        if values.len() != expected {
            return Err(Error::ShapeMismatch {
                task,
                expected,
                got: values.len(),
            });
        }
        Ok(Self { task, values })
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
