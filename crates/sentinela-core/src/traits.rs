/*!
 * Sentinela Traits
 *
 * Interfaces para os colaboradores externos do núcleo: node RPC,
 * feed de preço, preço spot da pool, verificador ZK e diretório de
 * controladores de identidade.
 */

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{AgentId, OraclePrice, PoolId};
use ethereum_types::{Address, U256};
use tracing::{debug, warn};

/// Leitor de estado on-chain: exatamente as duas consultas que o
/// núcleo precisa, uma leitura por invocação, sem cache e sem retry
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Chama um método de contrato (eth_call)
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Obtém o número do bloco atual
    async fn get_block_number(&self) -> Result<u64>;
}

/// Fonte de preço de referência externa
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Última leitura publicada pelo feed
    async fn latest_price(&self) -> Result<OraclePrice>;
}

/// Preço spot corrente da própria pool, em ponto fixo 1e18
#[async_trait]
pub trait PoolPriceSource: Send + Sync {
    async fn spot_price(&self, pool: PoolId) -> Result<U256>;
}

/// Verificador de prova de detecção correta, endereçado por referência
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    /// Submete `(proof, public_inputs)` ao verificador em `verifier_ref`.
    /// `Ok(false)` significa prova rejeitada; `Err` significa falha da
    /// própria chamada (verificador indisponível ou abortando).
    async fn verify(
        &self,
        verifier_ref: Address,
        proof: &[u8],
        public_inputs: &[U256],
    ) -> Result<bool>;
}

/// Diretório de controladores das identidades lógicas (registro de
/// identidade fora de escopo, consultado apenas na fronteira)
#[async_trait]
pub trait ControllerDirectory: Send + Sync {
    /// Controlador atual da identidade, ou `None` se desconhecida
    async fn controller_of(&self, identity: AgentId) -> Result<Option<Address>>;
}

/// Adaptador resultado-para-booleano do verificador externo.
///
/// Camada única onde falha de chamada vira `false`: um verificador
/// indisponível ou abortando nunca pode derrubar a lógica chamadora.
/// O log distingue veredito negativo de falha sistêmica, ainda que o
/// contrato booleano seja o mesmo.
pub async fn verify_or_false<V: ProofVerifier + ?Sized>(
    verifier: &V,
    verifier_ref: Address,
    proof: &[u8],
    public_inputs: &[U256],
) -> bool {
    match verifier.verify(verifier_ref, proof, public_inputs).await {
        Ok(accepted) => {
            debug!(
                verifier = %crate::utils::format_address(&verifier_ref),
                accepted,
                "Veredito do verificador"
            );
            accepted
        }
        Err(e) => {
            warn!(
                verifier = %crate::utils::format_address(&verifier_ref),
                error = %e,
                "Falha na chamada ao verificador, tratando como prova rejeitada"
            );
            false
        }
    }
}
