//! Cliente do serviço remoto de geração de texto (API estilo Gemini).
//! A URL base é configurável para permitir testes contra servidores
//! locais.

use crate::NarrativeModel;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use vigia_core::error::Result;
use vigia_core::Error;

/// Configuração do serviço de narrativa
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-2.0-flash-lite".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

/// Cliente HTTP do serviço de geração de texto
#[derive(Debug)]
pub struct GeminiClient {
    config: NarrativeConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Cria um novo cliente; falha se a chave de API não foi configurada
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Narrative(
                "Chave de API do serviço de narrativa não configurada".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Other(format!("Falha ao criar cliente HTTP: {}", e)))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl NarrativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Narrative(format!("Falha ao chamar o serviço de narrativa: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Narrative(format!("Serviço de narrativa retornou erro: {}", e)))?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Narrative(format!("Resposta inválida do serviço de narrativa: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| Error::Narrative("Resposta sem candidatos".to_string()))
    }
}
