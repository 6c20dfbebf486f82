/*!
 * Vigia Traits
 *
 * Traits comuns usados em toda a workspace Vigia
 */

use crate::error::Result;
use crate::types::{EnrichedTransaction, RawTransaction};
use async_trait::async_trait;
use ethereum_types::Address;

/// Trait para provedores de histórico de transações
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    /// Busca o histórico de transações de um endereço, limitado a `max_count`
    async fn fetch_transactions(
        &self,
        address: Address,
        max_count: usize,
    ) -> Result<Vec<RawTransaction>>;
}

/// Trait para enriquecimento de transações com metadados de NFT.
/// Nunca falha para fora: falhas de consulta degradam para campos zerados.
#[async_trait]
pub trait TxEnricher: Send + Sync {
    /// Enriquece uma única transação
    async fn enrich(&self, tx: RawTransaction) -> EnrichedTransaction;

    /// Enriquece um lote preservando ordem e cardinalidade da entrada
    async fn enrich_batch(&self, txs: Vec<RawTransaction>) -> Vec<EnrichedTransaction>;
}
