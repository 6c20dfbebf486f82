/*!
 * Vigia Utils
 *
 * Utilitários comuns usados em toda a workspace Vigia
 */

use ethereum_types::{Address, H256, U256};
use std::str::FromStr;

/// Converte uma string hexadecimal para Address
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = hex.strip_prefix("0x").unwrap_or(hex);
    Address::from_str(hex_str).ok()
}

/// Converte uma string hexadecimal para H256
pub fn hex_to_h256(hex: &str) -> Option<H256> {
    let hex_str = hex.strip_prefix("0x").unwrap_or(hex);
    H256::from_str(hex_str).ok()
}

/// Converte um campo numérico do provedor (hexadecimal com prefixo `0x`
/// ou decimal puro) para u64. Valores malformados ou ausentes valem zero.
pub fn parse_u64(raw: &str) -> u64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).unwrap_or(0),
        None => raw.parse().unwrap_or(0),
    }
}

/// Converte um campo numérico do provedor para U256.
/// Valores malformados ou ausentes valem zero.
pub fn parse_u256(raw: &str) -> U256 {
    let raw = raw.trim();
    if raw.is_empty() {
        return U256::zero();
    }
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).unwrap_or_else(|_| U256::zero()),
        None => U256::from_dec_str(raw).unwrap_or_else(|_| U256::zero()),
    }
}

/// Converte um U256 para f64 (aproximação para cálculo de features)
pub fn u256_to_f64(value: U256) -> f64 {
    let mut acc = 0.0f64;
    for (i, limb) in value.0.iter().enumerate() {
        acc += (*limb as f64) * 2f64.powi(64 * i as i32);
    }
    acc
}

/// Formata um Address para exibição
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

/// Decodifica o rótulo de chamada de função a partir do seletor de
/// 4 bytes do payload de entrada. Seletores desconhecidos resultam em
/// um conjunto vazio de rótulos, nunca em erro.
pub fn decode_function_labels(input: &str) -> Vec<String> {
    let selector = match input.get(..10) {
        Some(s) => s.to_ascii_lowercase(),
        None => return Vec::new(),
    };
    let name = match selector.as_str() {
        "0x095ea7b3" => Some("approve"),
        "0xa22cb465" => Some("setApprovalForAll"),
        "0x23b872dd" => Some("transferFrom"),
        "0x42842e0e" | "0xb88d4fde" => Some("safeTransferFrom"),
        "0xf242432a" => Some("safeBatchTransferFrom"),
        "0x8fcbaf0c" => Some("permit"),
        _ => None,
    };
    match name {
        Some(n) => vec![n.to_string()],
        None => Vec::new(),
    }
}
