/*!
 * Sentinela Types
 *
 * Tipos comuns usados em toda a workspace Sentinela
 */

use ethereum_types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador de um agente detector (token id da identidade lógica)
pub type AgentId = U256;

/// Identificador de uma pool de liquidez
pub type PoolId = Address;

/// Modo de validação de evidência de um agente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationMode {
    Signature,
    ZkProof,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Signature => write!(f, "signature"),
            ValidationMode::ZkProof => write!(f, "zk_proof"),
        }
    }
}

/// Configuração de um agente detector registrado
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Digest do modelo de detecção ao qual a evidência fica vinculada
    pub model_commitment: H256,
    /// Endereço autorizado a assinar alegações em modo SIGNATURE
    pub trusted_signer: Address,
    /// Referência ao contrato verificador, obrigatória em modo ZK_PROOF
    pub zk_verifier: Option<Address>,
    pub mode: ValidationMode,
    pub active: bool,
}

/// Alegação de detecção produzida pelo detector off-chain.
///
/// Efêmera: consumida exatamente uma vez por chamada de verificação,
/// nunca armazenada pelo núcleo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionClaim {
    pub target: Address,
    pub timestamp: u64,
    pub evidence: Vec<u8>,
}

/// Leitura de preço de um feed externo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePrice {
    /// Preço publicado (assinado; valores não positivos invalidam a leitura)
    pub value: i128,
    pub decimals: u8,
    /// Momento da última atualização do feed (unix, segundos)
    pub as_of: u64,
}

impl OraclePrice {
    /// Se a leitura serve como sinal de desvio: positiva e dentro da
    /// janela de staleness. Leitura inutilizável vira "sem sinal",
    /// nunca erro, no caminho de decisão de taxa.
    pub fn is_usable(&self, now: u64, staleness_window: u64) -> bool {
        self.value > 0 && now.saturating_sub(self.as_of) <= staleness_window
    }
}
