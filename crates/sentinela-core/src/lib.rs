/*!
 * Sentinela Core
 *
 * Tipos, erros e utilitários compartilhados para a workspace Sentinela
 */

pub mod types;
pub mod traits;
pub mod utils;
pub mod error;
pub mod events;

// Re-exportações públicas
pub use error::Error;
pub use types::*;
