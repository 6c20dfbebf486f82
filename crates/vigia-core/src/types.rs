/*!
 * Vigia Types
 *
 * Tipos comuns usados em toda a workspace Vigia
 */

use ethereum_types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alias para hash de transação
pub type TransactionHash = H256;

/// Cabeça do modelo a ser consultada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Account,
    Transaction,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Account => write!(f, "account"),
            Task::Transaction => write!(f, "transaction"),
        }
    }
}

/// Transação bruta como retornada pelo provedor de histórico.
/// Imutável após a coleta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub from_address: Address,
    pub to_address: Option<Address>,
    pub value: U256,
    pub gas_price: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    /// Payload de entrada em hexadecimal ("0x" para transferências simples)
    pub input: String,
    pub hash: TransactionHash,
    pub block_number: u64,
}

impl RawTransaction {
    /// Indica interação com contrato (payload de entrada não vazio)
    pub fn is_contract_call(&self) -> bool {
        !self.input.is_empty() && self.input != "0x"
    }
}

/// Metadados de NFT/marketplace anexados a uma transação.
/// Campos ausentes valem zero; a ausência de dados NFT é esperada
/// para transações que não envolvem NFTs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub floor_price: f64,
    pub average_price: f64,
    pub total_volume: f64,
    pub total_sales: u64,
    pub num_owners: u64,
    pub market_cap: f64,
    pub seven_day_volume: f64,
    pub seven_day_sales: u64,
    pub seven_day_average_price: f64,
}

/// Transação enriquecida: registro bruto mais metadados de NFT e
/// rótulos de chamada de função decodificados do seletor de 4 bytes.
/// Sempre completa, mesmo quando o enriquecimento falha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    pub raw: RawTransaction,
    pub function_calls: Vec<String>,
    pub nft: NftMetadata,
    pub token_value: f64,
    pub token_decimal: u8,
}

impl EnrichedTransaction {
    /// Constrói o registro enriquecido sem metadados de NFT (zero-fill)
    pub fn zero_filled(raw: RawTransaction) -> Self {
        let function_calls = crate::utils::decode_function_labels(&raw.input);
        Self {
            raw,
            function_calls,
            nft: NftMetadata::default(),
            token_value: 0.0,
            token_decimal: 0,
        }
    }
}

/// Contribuição assinada de uma feature para a predição.
/// Valores positivos aumentam o risco.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature_name: String,
    pub feature_value: f64,
    pub shap_value: f64,
}
