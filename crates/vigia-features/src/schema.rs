use vigia_core::types::Task;

/// Schema de features no nível de conta (ordem congelada)
pub const ACCOUNT_FEATURE_NAMES: [&str; 15] = [
    "total_txn",
    "out_txn",
    "in_out_ratio",
    "total_volume",
    "total_value_in",
    "avg_value_out",
    "avg_gas_price",
    "avg_gas_used",
    "activity_duration_days",
    "std_time_between_txns",
    "inNeighborNum",
    "outNeighborNum",
    "turnover_ratio",
    "giftinTxn_ratio",
    "miningTxnNum",
];

/// Schema de features no nível de transação (ordem congelada)
pub const TRANSACTION_FEATURE_NAMES: [&str; 15] = [
    "value",
    "gas_price",
    "gas_used",
    "num_functions",
    "has_suspicious_func",
    "is_zero_value",
    "is_mint",
    "high_gas",
    "token_value",
    "nft_floor_price",
    "nft_average_price",
    "nft_total_volume",
    "nft_total_sales",
    "nft_num_owners",
    "nft_market_cap",
];

/// Retorna os nomes do schema ativo para a tarefa
pub fn feature_names(task: Task) -> &'static [&'static str] {
    match task {
        Task::Account => &ACCOUNT_FEATURE_NAMES,
        Task::Transaction => &TRANSACTION_FEATURE_NAMES,
    }
}

/// Comprimento do schema da tarefa
pub fn schema_len(task: Task) -> usize {
    feature_names(task).len()
}
