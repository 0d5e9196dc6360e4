use sentinela_core::types::{AgentId, ValidationMode};
use ethereum_types::{Address, H256};
use serde::{Deserialize, Serialize};

/// Eventos de ciclo de vida e verificação do registro
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegistryEvent {
    Registered {
        identity: AgentId,
        model_commitment: H256,
        signer: Address,
    },
    UpgradedToZk {
        identity: AgentId,
        verifier: Address,
    },
    Activated {
        identity: AgentId,
    },
    Deactivated {
        identity: AgentId,
    },
    /// Resultado de uma verificação de alegação, qualquer que seja o modo
    DetectionChecked {
        identity: AgentId,
        target: Address,
        mode: ValidationMode,
        accepted: bool,
    },
}
