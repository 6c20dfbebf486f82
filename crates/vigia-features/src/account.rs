//! Montagem do vetor de features no nível de conta: agregação
//! determinística sobre o histórico enriquecido de um endereço.

use crate::FeatureVector;
use ethereum_types::Address;
use std::collections::HashSet;
use vigia_core::error::Result;
use vigia_core::types::{EnrichedTransaction, Task};
use vigia_core::utils::u256_to_f64;
use vigia_core::Error;

const WEI_PER_ETH: f64 = 1e18;

/// Monta o vetor de features de conta para `address` a partir do seu
/// histórico enriquecido. Função pura: mesmo histórico, mesmo vetor.
pub fn account_features(
    address: Address,
    txs: &[EnrichedTransaction],
) -> Result<FeatureVector> {
    if txs.is_empty() {
        return Err(Error::Other(
            "Histórico vazio: não há como montar features de conta".to_string(),
        ));
    }

    let total_txn = txs.len() as f64;
    let mut out_txn = 0f64;
    let mut in_txn = 0f64;
    let mut total_volume = 0f64;
    let mut total_value_in = 0f64;
    let mut total_value_out = 0f64;
    let mut gas_price_sum = 0f64;
    let mut gas_used_sum = 0f64;
    let mut in_neighbors: HashSet<Address> = HashSet::new();
    let mut out_neighbors: HashSet<Address> = HashSet::new();
    let mut giftin_txn = 0f64;
    let mut mining_txn = 0f64;
    let mut timestamps: Vec<f64> = Vec::with_capacity(txs.len());

    for tx in txs {
        let raw = &tx.raw;
        let value_eth = u256_to_f64(raw.value) / WEI_PER_ETH;
        let outgoing = raw.from_address == address;

        total_volume += value_eth;
        gas_price_sum += raw.gas_price as f64;
        gas_used_sum += raw.gas_used as f64;
        timestamps.push(raw.timestamp as f64);

        if outgoing {
            out_txn += 1.0;
            total_value_out += value_eth;
            if let Some(to) = raw.to_address {
                out_neighbors.insert(to);
            }
        } else {
            in_txn += 1.0;
            total_value_in += value_eth;
            in_neighbors.insert(raw.from_address);
            if raw.value.is_zero() {
                giftin_txn += 1.0;
            }
        }

        if raw.from_address == Address::zero() {
            mining_txn += 1.0;
        }
    }

    let in_out_ratio = if out_txn > 0.0 { in_txn / out_txn } else { in_txn };
    let avg_value_out = if out_txn > 0.0 {
        total_value_out / out_txn
    } else {
        0.0
    };
    let turnover_ratio = if total_volume > 0.0 {
        total_value_out / total_volume
    } else {
        0.0
    };

    timestamps.sort_by(|a, b| a.total_cmp(b));
    let first = timestamps.first().copied().unwrap_or(0.0);
    let last = timestamps.last().copied().unwrap_or(0.0);
    let activity_duration_days = (last - first) / 86_400.0;
    let std_time_between_txns = std_dev_of_gaps(&timestamps);

    let values = vec![
        total_txn as f32,
        out_txn as f32,
        in_out_ratio as f32,
        total_volume as f32,
        total_value_in as f32,
        avg_value_out as f32,
        (gas_price_sum / total_txn) as f32,
        (gas_used_sum / total_txn) as f32,
        activity_duration_days as f32,
        std_time_between_txns as f32,
        in_neighbors.len() as f32,
        out_neighbors.len() as f32,
        turnover_ratio as f32,
        (giftin_txn / total_txn) as f32,
        mining_txn as f32,
    ];

    FeatureVector::new(Task::Account, values)
}

/// Desvio padrão populacional dos intervalos entre timestamps ordenados
fn std_dev_of_gaps(sorted_timestamps: &[f64]) -> f64 {
    if sorted_timestamps.len() < 2 {
        return 0.0;
    }
    let gaps: Vec<f64> = sorted_timestamps
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let variance = gaps
        .iter()
        .map(|gap| (gap - mean) * (gap - mean))
        .sum::<f64>()
        / gaps.len() as f64;
    variance.sqrt()
}
