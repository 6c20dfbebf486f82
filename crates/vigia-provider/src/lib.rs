/*!
 * Vigia Provider
 *
 * Cliente para o provedor de histórico de transações (API estilo
 * Etherscan v2). Pagina o histórico de um endereço, converte os campos
 * numéricos brutos e distribui o consumo de rate-limit por um anel de
 * chaves de API.
 */

use ethereum_types::Address;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use vigia_core::{error::Result, types::RawTransaction, utils, Error};

/// Configuração do cliente de histórico
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub chain_id: u64,
    /// Chave única usada quando nenhum pool é configurado
    pub api_key: String,
    /// Pool de chaves para rotação round-robin
    pub api_keys: Vec<String>,
    pub page_size: usize,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io/v2/api".to_string(),
            chain_id: 1,
            api_key: String::new(),
            api_keys: Vec::new(),
            page_size: 100,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Anel de chaves de API com cursor round-robin.
/// O cursor avança atomicamente; duas chamadas concorrentes nunca
/// observam o mesmo índice de forma inconsistente.
pub struct KeyRing {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRing {
    /// Cria um anel a partir do pool configurado, com fallback para a
    /// chave única quando o pool está vazio.
    pub fn new(keys: Vec<String>, fallback: String) -> Self {
        let keys = if keys.is_empty() { vec![fallback] } else { keys };
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Retorna a próxima chave do anel (round-robin)
    pub fn next_key(&self) -> &str {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        &self.keys[index]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Envelope de resposta da API
#[derive(Debug, Deserialize)]
struct TxListEnvelope {
    status: String,
    #[allow(dead_code)]
    message: Option<String>,
    result: serde_json::Value,
}

/// Item de transação como retornado pela API (campos numéricos em
/// string, hexadecimal ou decimal)
#[derive(Debug, Deserialize)]
struct ProviderTx {
    from: Option<String>,
    to: Option<String>,
    value: Option<String>,
    #[serde(rename = "gasPrice")]
    gas_price: Option<String>,
    #[serde(rename = "gasUsed")]
    gas_used: Option<String>,
    #[serde(rename = "timeStamp")]
    timestamp: Option<String>,
    input: Option<String>,
    hash: Option<String>,
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
}

impl ProviderTx {
    fn into_raw(self) -> RawTransaction {
        RawTransaction {
            from_address: self
                .from
                .as_deref()
                .and_then(utils::hex_to_address)
                .unwrap_or_else(Address::zero),
            to_address: self.to.as_deref().and_then(utils::hex_to_address),
            value: utils::parse_u256(self.value.as_deref().unwrap_or("")),
            gas_price: utils::parse_u64(self.gas_price.as_deref().unwrap_or("")),
            gas_used: utils::parse_u64(self.gas_used.as_deref().unwrap_or("")),
            timestamp: utils::parse_u64(self.timestamp.as_deref().unwrap_or("")),
            input: self.input.unwrap_or_else(|| "0x".to_string()),
            hash: self
                .hash
                .as_deref()
                .and_then(utils::hex_to_h256)
                .unwrap_or_default(),
            block_number: utils::parse_u64(self.block_number.as_deref().unwrap_or("")),
        }
    }
}

/// Cliente de histórico de transações
pub struct EtherscanClient {
    config: ProviderConfig,
    keys: KeyRing,
    http: reqwest::Client,
}

impl EtherscanClient {
    /// Cria um novo cliente a partir da configuração
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Other(format!("Falha ao criar cliente HTTP: {}", e)))?;

        let keys = KeyRing::new(config.api_keys.clone(), config.api_key.clone());

        Ok(Self { config, keys, http })
    }

    /// Busca uma página do histórico de transações
    async fn transaction_page(&self, address: Address, page: usize) -> Result<TxListEnvelope> {
        let address = utils::format_address(&address);
        let chain_id = self.config.chain_id.to_string();
        let page_str = page.to_string();
        let offset = self.config.page_size.to_string();
        let params = [
            ("module", "account"),
            ("action", "txlist"),
            ("address", address.as_str()),
            ("startblock", "0"),
            ("endblock", "99999999"),
            ("page", page_str.as_str()),
            ("offset", offset.as_str()),
            ("sort", "desc"),
            ("chainid", chain_id.as_str()),
            ("apikey", self.keys.next_key()),
        ];

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("Falha ao consultar o provedor: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::UpstreamUnavailable(format!("Provedor retornou erro HTTP: {}", e)))?;

        response
            .json::<TxListEnvelope>()
            .await
            .map_err(|e| Error::DecodeError(format!("Resposta inválida do provedor: {}", e)))
    }

    /// Busca o histórico de um endereço, limitado a `max_count` registros.
    ///
    /// A paginação termina quando o limite é atingido, quando uma página
    /// retorna menos registros que o tamanho de página (fim do histórico)
    /// ou quando a API sinaliza status de erro. Uma falha de transporte
    /// após sucesso parcial retorna o que já foi coletado.
    pub async fn fetch_transactions(
        &self,
        address: Address,
        max_count: usize,
    ) -> Result<Vec<RawTransaction>> {
        let mut collected: Vec<RawTransaction> = Vec::new();
        let mut page = 1usize;

        while collected.len() < max_count {
            let envelope = match self.transaction_page(address, page).await {
                Ok(envelope) => envelope,
                Err(err) => {
                    if collected.is_empty() {
                        return Err(err);
                    }
                    warn!(page, "Falha ao buscar página, retornando resultados parciais: {}", err);
                    break;
                }
            };

            if envelope.status != "1" {
                break;
            }

            let txs: Vec<ProviderTx> =
                serde_json::from_value(envelope.result).unwrap_or_default();
            if txs.is_empty() {
                break;
            }

            let page_len = txs.len();
            for tx in txs {
                if collected.len() >= max_count {
                    break;
                }
                collected.push(tx.into_raw());
            }

            if page_len < self.config.page_size {
                break;
            }
            page += 1;
        }

        debug!(
            address = %utils::format_address(&address),
            count = collected.len(),
            "Histórico de transações coletado"
        );

        Ok(collected)
    }
}

#[async_trait::async_trait]
impl vigia_core::traits::TransactionProvider for EtherscanClient {
    async fn fetch_transactions(
        &self,
        address: Address,
        max_count: usize,
    ) -> Result<Vec<RawTransaction>> {
        EtherscanClient::fetch_transactions(self, address, max_count).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_tx(hash_byte: u8) -> serde_json::Value {
        json!({
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0x2222222222222222222222222222222222222222",
            "value": "1000000000000000000",
            "gasPrice": "0x3b9aca00",
            "gasUsed": "21000",
            "timeStamp": "1700000000",
            "input": "0x095ea7b3",
            "hash": format!("0x{}", hex_str(hash_byte)),
            "blockNumber": "0xf4240"
        })
    }

    fn hex_str(byte: u8) -> String {
        std::iter::repeat(format!("{:02x}", byte))
            .take(32)
            .collect()
    }

    fn client_for(server: &MockServer, page_size: usize) -> EtherscanClient {
        EtherscanClient::new(ProviderConfig {
            base_url: server.uri(),
            page_size,
            api_key: "k".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn key_ring_rotates_round_robin() {
        let ring = KeyRing::new(vec!["a".to_string(), "b".to_string()], String::new());
        assert_eq!(ring.next_key(), "a");
        assert_eq!(ring.next_key(), "b");
        assert_eq!(ring.next_key(), "a");
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn key_ring_falls_back_to_single_key() {
        let ring = KeyRing::new(Vec::new(), "unica".to_string());
        assert_eq!(ring.next_key(), "unica");
        assert_eq!(ring.next_key(), "unica");
    }

    #[tokio::test]
    async fn paginates_until_short_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [provider_tx(0x10), provider_tx(0x11)]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [provider_tx(0x12)]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, 2);
        let txs = client
            .fetch_transactions(Address::repeat_byte(0xaa), 10)
            .await
            .unwrap();
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[0].gas_price, 1_000_000_000);
        assert_eq!(txs[0].gas_used, 21_000);
        assert_eq!(txs[0].block_number, 1_000_000);
    }

    #[tokio::test]
    async fn respects_max_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [provider_tx(1), provider_tx(2), provider_tx(3)]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, 3);
        let txs = client
            .fetch_transactions(Address::repeat_byte(0xaa), 2)
            .await
            .unwrap();
        assert_eq!(txs.len(), 2);
    }

    #[tokio::test]
    async fn non_success_status_yields_empty_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "0",
                "message": "No transactions found",
                "result": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, 100);
        let txs = client
            .fetch_transactions(Address::repeat_byte(0xaa), 10)
            .await
            .unwrap();
        assert!(txs.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_on_first_page_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, 100);
        let err = client
            .fetch_transactions(Address::repeat_byte(0xaa), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn partial_results_survive_page_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [provider_tx(1), provider_tx(2)]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, 2);
        let txs = client
            .fetch_transactions(Address::repeat_byte(0xaa), 10)
            .await
            .unwrap();
        assert_eq!(txs.len(), 2);
    }

    #[tokio::test]
    async fn rotates_keys_across_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apikey", "k1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [provider_tx(1), provider_tx(2)]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("apikey", "k2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [provider_tx(3)]
            })))
            .mount(&server)
            .await;

        let client = EtherscanClient::new(ProviderConfig {
            base_url: server.uri(),
            page_size: 2,
            api_keys: vec!["k1".to_string(), "k2".to_string()],
            ..Default::default()
        })
        .unwrap();

        // Página 1 usa k1, página 2 usa k2; sem rotação a página 2
        // não casaria com nenhum mock e a busca retornaria só 2 registros.
        let txs = client
            .fetch_transactions(Address::repeat_byte(0xaa), 10)
            .await
            .unwrap();
        assert_eq!(txs.len(), 3);
    }
}
