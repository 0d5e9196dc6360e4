/*!
 * Sentinela Oracle
 *
 * Gateway de preço do núcleo Sentinela: leitura do feed de referência
 * externo (agregador estilo Chainlink) e do preço spot da própria pool
 * (slot0, sqrtPriceX96). Uma leitura por invocação; falha propaga como
 * erro tipado, nunca como valor padrão.
 */

mod feed;
mod pool;

pub use feed::*;
pub use pool::*;
