/*!
 * Vigia Enrich
 *
 * Cliente de enriquecimento de transações com metadados de
 * NFT/marketplace. A ausência de metadados é comum e esperada para
 * transações que não envolvem NFTs, então falhas de consulta degradam
 * silenciosamente para campos zerados.
 */

use ethereum_types::Address;
use futures::future::join_all;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use vigia_core::error::Result;
use vigia_core::types::{EnrichedTransaction, RawTransaction};
use vigia_core::{utils, Error};

/// Configuração do cliente de enriquecimento
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.rarible.org/v0.1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Estatísticas de coleção como retornadas pelo marketplace
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CollectionStats {
    floor_price: f64,
    average_price: f64,
    total_volume: f64,
    total_sales: u64,
    num_owners: u64,
    market_cap: f64,
    seven_day_volume: f64,
    seven_day_sales: u64,
    seven_day_average_price: f64,
}

/// Cliente de enriquecimento NFT
pub struct NftEnrichClient {
    config: EnrichConfig,
    http: reqwest::Client,
}

impl NftEnrichClient {
    /// Cria um novo cliente a partir da configuração
    pub fn new(config: EnrichConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Other(format!("Falha ao criar cliente HTTP: {}", e)))?;
        Ok(Self { config, http })
    }

    /// Consulta estatísticas da coleção pelo endereço do contrato
    async fn collection_stats(&self, contract: Address) -> Result<CollectionStats> {
        let url = format!(
            "{}/collections/ETHEREUM:{}/stats",
            self.config.base_url,
            utils::format_address(&contract)
        );

        let mut request = self.http.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.header("X-API-KEY", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("Falha ao consultar marketplace: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::UpstreamUnavailable(format!("Marketplace retornou erro: {}", e)))?;

        response
            .json::<CollectionStats>()
            .await
            .map_err(|e| Error::DecodeError(format!("Resposta inválida do marketplace: {}", e)))
    }

    /// Enriquece uma única transação. Nunca falha para fora: qualquer
    /// falha de consulta resulta em metadados zerados.
    pub async fn enrich(&self, tx: RawTransaction) -> EnrichedTransaction {
        // Só interações com contrato podem envolver NFTs
        let contract = match (tx.is_contract_call(), tx.to_address) {
            (true, Some(address)) => address,
            _ => return EnrichedTransaction::zero_filled(tx),
        };

        match self.collection_stats(contract).await {
            Ok(stats) => {
                let mut enriched = EnrichedTransaction::zero_filled(tx);
                enriched.nft = vigia_core::types::NftMetadata {
                    floor_price: stats.floor_price,
                    average_price: stats.average_price,
                    total_volume: stats.total_volume,
                    total_sales: stats.total_sales,
                    num_owners: stats.num_owners,
                    market_cap: stats.market_cap,
                    seven_day_volume: stats.seven_day_volume,
                    seven_day_sales: stats.seven_day_sales,
                    seven_day_average_price: stats.seven_day_average_price,
                };
                enriched
            }
            Err(err) => {
                debug!(
                    contract = %utils::format_address(&contract),
                    "Sem metadados de NFT, usando campos zerados: {}", err
                );
                EnrichedTransaction::zero_filled(tx)
            }
        }
    }

    /// Enriquece um lote de transações, preservando ordem e
    /// cardinalidade da entrada.
    pub async fn enrich_batch(&self, txs: Vec<RawTransaction>) -> Vec<EnrichedTransaction> {
        join_all(txs.into_iter().map(|tx| self.enrich(tx))).await
    }
}

#[async_trait::async_trait]
impl vigia_core::traits::TxEnricher for NftEnrichClient {
    async fn enrich(&self, tx: RawTransaction) -> EnrichedTransaction {
        NftEnrichClient::enrich(self, tx).await
    }

    async fn enrich_batch(&self, txs: Vec<RawTransaction>) -> Vec<EnrichedTransaction> {
        NftEnrichClient::enrich_batch(self, txs).await
    }
}
