/*!
 * Sentinela Registry
 *
 * Registro de atestação de detecção: converte alegações off-chain
 * (assinatura ou prova ZK de inferência correta) em uma decisão de
 * confiança com garantias de frescor e vínculo ao modelo. Fora do
 * caminho quente de decisão de taxa; a autoridade sentinela faz a
 * ponte entre este registro e o ledger de predadores.
 */

mod registry;
mod events;

pub use registry::*;
pub use events::*;
