/*!
 * Sentinela Hook
 *
 * O caminho quente da Sentinela: o ledger de predadores (mapa de
 * endereços sinalizados, escrito só pela autoridade sentinela) e o
 * motor de decisão de taxa invocado antes de cada negociação. Três
 * sinais independentes, com exatamente uma fonte de verdade vencendo:
 * ledger primeiro, desvio de preço como retaguarda, taxa normal como
 * padrão.
 */

mod types;
mod deviation;
mod ledger;
mod engine;
mod events;

pub use types::*;
pub use deviation::*;
pub use ledger::*;
pub use engine::*;
pub use events::*;
