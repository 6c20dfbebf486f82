/*!
 * Vigia Detector
 *
 * Orquestrador da detecção de phishing/scam. Sequencia a coleta de
 * histórico, o enriquecimento, a montagem de features, a inferência
 * dual-head e as camadas opcionais de explicação, com política
 * explícita de degradação em cada estágio.
 */

mod report;
mod service;

pub use report::*;
pub use service::*;
