//! Carga do checkpoint em JSON e handle global do processo. O modelo é
//! carregado uma única vez na inicialização e compartilhado imutável
//! entre requisições concorrentes.

use crate::mlp::{ModelWeights, MtlMlp};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use vigia_core::error::Result;
use vigia_core::Error;

static GLOBAL_MODEL: OnceCell<Arc<MtlMlp>> = OnceCell::new();

impl MtlMlp {
    /// Carrega e valida um checkpoint em JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            Error::ModelLoad(format!("Falha ao ler checkpoint {}: {}", path.display(), e))
        })?;
        let weights: ModelWeights = serde_json::from_slice(&data).map_err(|e| {
            Error::ModelLoad(format!(
                "Checkpoint {} inválido: {}",
                path.display(),
                e
            ))
        })?;
        let model = MtlMlp::new(weights)?;
        info!(
            checkpoint = %path.display(),
            input_dim = model.input_dim(),
            "Modelo carregado"
        );
        Ok(model)
    }
}

/// Inicializa o handle global do modelo. Chamadas subsequentes reusam a
/// instância já carregada, sem releitura do checkpoint.
pub fn init_global_model(path: impl AsRef<Path>) -> Result<Arc<MtlMlp>> {
    GLOBAL_MODEL
        .get_or_try_init(|| MtlMlp::from_file(path).map(Arc::new))
        .cloned()
}

/// Handle global, se já inicializado
pub fn global_model() -> Option<Arc<MtlMlp>> {
    GLOBAL_MODEL.get().cloned()
}
