use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use vigia_core::utils::hex_to_address;
use vigia_detector::{DetectionConfig, DetectionService, ExplainOptions};
use vigia_enrich::{EnrichConfig, NftEnrichClient};
use vigia_model::init_global_model;
use vigia_narrative::{GeminiClient, NarrativeConfig, NarrativeExplainer};
use vigia_provider::{EtherscanClient, ProviderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let address = env::args()
        .nth(1)
        .context("uso: detect_address <endereco> [checkpoint]")?;
    let address = hex_to_address(&address).context("endereço inválido")?;
    let checkpoint = env::args()
        .nth(2)
        .unwrap_or_else(|| "models/mtl_mlp.json".to_string());

    let model = init_global_model(&checkpoint)?;

    let provider = EtherscanClient::new(ProviderConfig {
        api_key: env::var("ETHERSCAN_API_KEY").unwrap_or_default(),
        ..Default::default()
    })?;
    let enricher = NftEnrichClient::new(EnrichConfig::default())?;

    // Narrativas só quando a chave do serviço está configurada
    let narrative = env::var("GEMINI_API_KEY")
        .ok()
        .and_then(|api_key| {
            GeminiClient::new(NarrativeConfig {
                api_key,
                ..Default::default()
            })
            .ok()
        })
        .map(|client| NarrativeExplainer::new(Arc::new(client)));
    let with_narrative = narrative.is_some();

    let service = DetectionService::new(
        Arc::new(provider),
        Arc::new(enricher),
        model,
        narrative,
        DetectionConfig::default(),
    );

    let report = service
        .detect_account(
            address,
            ExplainOptions {
                attributions: true,
                narratives: with_narrative,
            },
        )
        .await?;

    println!("{}", serde_json::to_string_pretty(&report.to_response())?);
    Ok(())
}
