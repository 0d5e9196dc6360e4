use sentinela_core::{types::PoolId, utils::keccak256};
use ethereum_types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxa normal, em centésimos de ponto-base (0,3%)
pub const NORMAL_FEE: u32 = 3_000;
/// Taxa-armadilha, em centésimos de ponto-base (10%)
pub const TRAP_FEE: u32 = 100_000;
/// Limiar de desvio de preço, em pontos-base (2%); comparação estrita
pub const DEVIATION_THRESHOLD_BPS: u64 = 200;
/// Janela de staleness da leitura do oráculo, em segundos
pub const STALENESS_WINDOW: u64 = 3_600;
/// Bit de override: instrui a camada de liquidação a substituir a taxa
/// configurada da pool, não a somar
pub const FEE_OVERRIDE_FLAG: u32 = 0x40_0000;

/// Assinatura canônica do ponto de entrada de decisão de taxa
const BEFORE_SWAP_SIGNATURE: &str =
    "beforeSwap(address,(address,address,uint24,int24,address),(bool,int256,uint160),bytes)";

/// Requisição de negociação vista pelo motor de decisão.
///
/// Sinal e tamanho viajam apenas como contexto; a decisão de taxa não
/// depende deles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Chamador imediato (pode ser um roteador/agregador)
    pub trader: Address,
    /// Originador último da transação (tx.origin)
    pub origin: Address,
    pub pool: PoolId,
    pub zero_for_one: bool,
    pub amount_specified: i128,
}

/// Motivo da taxa escolhida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeReason {
    None,
    AiDetected,
    PriceDeviation,
}

impl fmt::Display for FeeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeReason::None => write!(f, "none"),
            FeeReason::AiDetected => write!(f, "ai_detected"),
            FeeReason::PriceDeviation => write!(f, "price_deviation"),
        }
    }
}

/// Decisão de taxa produzida a cada negociação; nunca armazenada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDecision {
    /// Taxa em centésimos de ponto-base, sem o bit de override
    pub fee: u32,
    pub reason: FeeReason,
}

/// Acknowledgment devolvido à camada de liquidação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAck {
    /// Tag de operação exigida pelo protocolo (4 bytes)
    pub tag: [u8; 4],
    /// Delta de liquidação; este hook nunca movimenta fundos
    pub delta: i128,
    /// Taxa com o bit de override aplicado
    pub fee: u32,
}

impl SwapAck {
    pub fn from_decision(decision: &FeeDecision) -> Self {
        Self {
            tag: before_swap_tag(),
            delta: 0,
            fee: decision.fee | FEE_OVERRIDE_FLAG,
        }
    }
}

/// Primeiros 4 bytes do Keccak-256 da assinatura canônica do ponto de
/// entrada
pub fn before_swap_tag() -> [u8; 4] {
    let hash = keccak256(BEFORE_SWAP_SIGNATURE.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}
