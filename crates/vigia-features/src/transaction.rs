//! Montagem do vetor de features no nível de transação. Para uma lista
//! com uma única transação o vetor descreve essa transação; para o
//! histórico completo de uma conta os valores por transação são
//! agregados pela média.

use crate::FeatureVector;
use ethereum_types::Address;
use vigia_core::error::Result;
use vigia_core::types::{EnrichedTransaction, Task};
use vigia_core::utils::u256_to_f64;
use vigia_core::Error;

const WEI_PER_ETH: f64 = 1e18;

/// Preço de gás acima deste limiar (100 gwei) marca a feature `high_gas`
const HIGH_GAS_THRESHOLD: u64 = 100_000_000_000;

/// Funções associadas a padrões de aprovação abusiva em golpes de NFT
const SUSPICIOUS_FUNCTIONS: [&str; 3] = ["approve", "setApprovalForAll", "permit"];

/// Monta o vetor de features de transação. Função pura e determinística.
pub fn transaction_features(txs: &[EnrichedTransaction]) -> Result<FeatureVector> {
    if txs.is_empty() {
        return Err(Error::Other(
            "Lista vazia: não há como montar features de transação".to_string(),
        ));
    }

    let count = txs.len() as f64;
    let mut sums = [0f64; 15];
    for tx in txs {
        for (slot, value) in sums.iter_mut().zip(per_transaction_values(tx)) {
            *slot += value;
        }
    }

    let values: Vec<f32> = sums.iter().map(|sum| (sum / count) as f32).collect();
    FeatureVector::new(Task::Transaction, values)
}

/// Valores por transação, na ordem exata do schema congelado
fn per_transaction_values(tx: &EnrichedTransaction) -> [f64; 15] {
    let raw = &tx.raw;
    let value_eth = u256_to_f64(raw.value) / WEI_PER_ETH;
    let has_suspicious = tx
        .function_calls
        .iter()
        .any(|name| SUSPICIOUS_FUNCTIONS.contains(&name.as_str()));

    [
        value_eth,
        raw.gas_price as f64,
        raw.gas_used as f64,
        tx.function_calls.len() as f64,
        if has_suspicious { 1.0 } else { 0.0 },
        if raw.value.is_zero() { 1.0 } else { 0.0 },
        if raw.from_address == Address::zero() { 1.0 } else { 0.0 },
        if raw.gas_price > HIGH_GAS_THRESHOLD { 1.0 } else { 0.0 },
        tx.token_value,
        tx.nft.floor_price,
        tx.nft.average_price,
        tx.nft.total_volume,
        tx.nft.total_sales as f64,
        tx.nft.num_owners as f64,
        tx.nft.market_cap,
    ]
}
