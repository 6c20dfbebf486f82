use crate::types::Task;
use thiserror::Error;

/// Erros comuns da workspace Vigia
#[derive(Error, Debug)]
pub enum Error {
    /// Falha de rede ou status de erro em um provedor externo
    #[error("Upstream indisponível: {0}")]
    UpstreamUnavailable(String),

    /// Vetor de features incompatível com o schema da tarefa
    #[error("Vetor de features inválido para a tarefa {task}: esperado {expected}, recebido {got}")]
    ShapeMismatch {
        task: Task,
        expected: usize,
        got: usize,
    },

    /// Erro ao carregar ou validar os pesos do modelo
    #[error("Erro ao carregar o modelo: {0}")]
    ModelLoad(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Falha na geração de narrativa (sempre recuperada localmente)
    #[error("Erro de narrativa: {0}")]
    Narrative(String),

    /// Erro genérico
    #[error("{0}")]
    Other(String),
}

/// Tipo de resultado usado em toda a workspace
pub type Result<T> = std::result::Result<T, Error>;
