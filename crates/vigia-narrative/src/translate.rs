//! Tradução de nomes técnicos de features para frases legíveis.
//! Tabela estática com pass-through: nomes desconhecidos voltam
//! inalterados.

pub fn translate_feature(name: &str) -> &str {
    match name {
        "avg_gas_price" => "average transaction fee",
        "activity_duration_days" => "account age in days",
        "std_time_between_txns" => "irregularity in transaction timing",
        "total_volume" => "total amount transferred",
        "inNeighborNum" => "number of unique senders",
        "total_txn" => "total number of transactions",
        "in_out_ratio" => "ratio of incoming to outgoing transactions",
        "total_value_in" => "total amount received",
        "outNeighborNum" => "number of unique recipients",
        "avg_gas_used" => "average transaction complexity",
        "giftinTxn_ratio" => "proportion of token transfers",
        "miningTxnNum" => "number of mining transactions",
        "avg_value_out" => "average amount sent",
        "turnover_ratio" => "frequency of fund movements",
        "out_txn" => "number of outgoing transactions",
        "gas_price" => "transaction fee",
        "gas_used" => "transaction complexity",
        "value" => "transaction amount",
        "num_functions" => "number of contract interactions",
        "has_suspicious_func" => "presence of suspicious functions",
        "nft_num_owners" => "number of NFT owners",
        "nft_total_sales" => "total NFT sales volume",
        "token_value" => "token transfer value",
        "nft_total_volume" => "total NFT trading volume",
        "is_mint" => "is a new token creation",
        "high_gas" => "high transaction fee",
        "nft_average_price" => "average NFT price",
        "nft_floor_price" => "minimum NFT price",
        "nft_market_cap" => "total NFT market value",
        "is_zero_value" => "zero-value transaction",
        other => other,
    }
}
