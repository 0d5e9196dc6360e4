use ethereum_types::Address;
use serde::{Deserialize, Serialize};

/// Eventos observáveis do ledger e do motor de decisão
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HookEvent {
    /// Mudança de estado de sinalização de um endereço
    FlagChanged { bot: Address, status: bool },
    /// Taxa-armadilha escolhida para uma negociação; o caminho de taxa
    /// normal não emite nada
    TrapTriggered {
        address: Address,
        fee_applied: u32,
        reason: String,
    },
    /// Tentativa de verificação de prova no caminho com evidência
    ProofVerificationAttempted { bot: Address, accepted: bool },
    /// Rotação da autoridade sentinela
    AuthorityRotated { previous: Address, new: Address },
}
