use crate::events::HookEvent;
use sentinela_core::{
    error::{Error, Result},
    events::publish,
    traits::{verify_or_false, ProofVerifier},
    utils::format_address,
};
use dashmap::DashMap;
use ethereum_types::{Address, U256};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Política de confiança para mutação do ledger.
///
/// `Open` mantém os dois pontos de entrada vivos (bootstrap e testes);
/// `EvidenceOnly` é a política recomendada em produção: o caminho sem
/// evidência falha com `EvidenceRequired`. A escolha é de implantação,
/// fixada na construção.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrustPolicy {
    #[default]
    Open,
    EvidenceOnly,
}

/// Ledger de predadores: mapa endereço → sinalizado, com a ausência de
/// chave equivalendo a `false`. Escrito exclusivamente pela autoridade
/// sentinela; lido a cada tentativa de negociação.
pub struct PredatorLedger<V> {
    authority: RwLock<Address>,
    verifier: V,
    verifier_ref: Address,
    policy: TrustPolicy,
    flags: DashMap<Address, bool>,
    events: Option<mpsc::Sender<HookEvent>>,
}

impl<V: ProofVerifier> PredatorLedger<V> {
    pub fn new(authority: Address, verifier: V, verifier_ref: Address, policy: TrustPolicy) -> Self {
        Self {
            authority: RwLock::new(authority),
            verifier,
            verifier_ref,
            policy,
            flags: DashMap::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, sender: mpsc::Sender<HookEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Autoridade sentinela corrente
    pub fn authority(&self) -> Address {
        *self.authority.read()
    }

    pub fn policy(&self) -> TrustPolicy {
        self.policy
    }

    fn ensure_authority(&self, caller: Address) -> Result<()> {
        if caller != *self.authority.read() {
            return Err(Error::OnlyAuthority);
        }
        Ok(())
    }

    /// Rotaciona a autoridade; só a autoridade vigente pode chamar
    pub fn rotate_authority(&self, caller: Address, new_authority: Address) -> Result<()> {
        self.ensure_authority(caller)?;
        if new_authority == Address::zero() {
            return Err(Error::ValidationError("autoridade não pode ser o endereço zero".into()));
        }

        let previous = {
            let mut authority = self.authority.write();
            let previous = *authority;
            *authority = new_authority;
            previous
        };

        info!(
            previous = %format_address(&previous),
            new = %format_address(&new_authority),
            "Autoridade sentinela rotacionada"
        );
        publish(&self.events, HookEvent::AuthorityRotated { previous, new: new_authority });
        Ok(())
    }

    /// Sobrescreve a sinalização de um endereço sem exigir evidência.
    /// Caminho de bootstrap/recuperação; sob `EvidenceOnly` falha com
    /// `EvidenceRequired`.
    pub fn set_flag(&self, caller: Address, bot: Address, status: bool) -> Result<()> {
        self.ensure_authority(caller)?;
        if self.policy == TrustPolicy::EvidenceOnly {
            return Err(Error::EvidenceRequired);
        }
        self.write_flag(bot, status);
        Ok(())
    }

    /// Sobrescreve a sinalização após checar a prova de detecção
    /// correta no verificador injetado. Prova rejeitada ou chamada
    /// falha significam `InvalidProof` e nenhuma mudança de estado.
    pub async fn set_flag_with_evidence(
        &self,
        caller: Address,
        bot: Address,
        status: bool,
        proof: &[u8],
        public_inputs: &[U256],
    ) -> Result<()> {
        self.ensure_authority(caller)?;

        let accepted = verify_or_false(&self.verifier, self.verifier_ref, proof, public_inputs).await;
        publish(&self.events, HookEvent::ProofVerificationAttempted { bot, accepted });
        if !accepted {
            warn!(bot = %format_address(&bot), "Prova de detecção rejeitada, ledger inalterado");
            return Err(Error::InvalidProof);
        }

        self.write_flag(bot, status);
        Ok(())
    }

    /// Consulta pura; ausência de chave é `false`
    pub fn is_flagged(&self, address: Address) -> bool {
        self.flags.get(&address).map(|entry| *entry).unwrap_or(false)
    }

    fn write_flag(&self, bot: Address, status: bool) {
        self.flags.insert(bot, status);
        info!(bot = %format_address(&bot), status, "Sinalização de predador atualizada");
        publish(&self.events, HookEvent::FlagChanged { bot, status });
    }
}
