use crate::events::RegistryEvent;
use sentinela_core::{
    error::{Error, Result},
    events::publish,
    traits::{verify_or_false, ControllerDirectory, ProofVerifier},
    types::{AgentConfig, AgentId, ValidationMode},
    utils,
};
use ethereum_types::{Address, H256};
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Idade máxima de uma alegação de detecção, em segundos
pub const MAX_DETECTION_AGE: u64 = 300;

/// Configuração do registro, fixada na construção
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub max_detection_age: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { max_detection_age: MAX_DETECTION_AGE }
    }
}

/// Registro de atestação de detecção.
///
/// Mantém a configuração por agente e aplica as duas estratégias de
/// verificação (assinatura e prova ZK) sob o guarda de frescor. Toda
/// mutação passa pelo diretório de controladores; mutações falhas não
/// deixam efeito parcial.
pub struct DetectionRegistry<V, C> {
    verifier: V,
    controllers: C,
    agents: RwLock<HashMap<AgentId, AgentConfig>>,
    config: RegistryConfig,
    events: Option<mpsc::Sender<RegistryEvent>>,
}

impl<V: ProofVerifier, C: ControllerDirectory> DetectionRegistry<V, C> {
    pub fn new(verifier: V, controllers: C, config: RegistryConfig) -> Self {
        Self {
            verifier,
            controllers,
            agents: RwLock::new(HashMap::new()),
            config,
            events: None,
        }
    }

    pub fn with_events(mut self, sender: mpsc::Sender<RegistryEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Garante que `caller` controla a identidade
    async fn ensure_controller(&self, caller: Address, identity: AgentId) -> Result<()> {
        match self.controllers.controller_of(identity).await? {
            Some(controller) if controller == caller => Ok(()),
            _ => Err(Error::NotOwner),
        }
    }

    /// Registra (ou re-registra) um agente em modo SIGNATURE.
    ///
    /// Última escrita vence: este é o único caminho para trocar
    /// `model_commitment` ou `signer`. O modo volta a SIGNATURE e a
    /// referência de verificador é limpa.
    pub async fn register(
        &self,
        caller: Address,
        identity: AgentId,
        model_commitment: H256,
        signer: Address,
    ) -> Result<()> {
        self.ensure_controller(caller, identity).await?;
        if signer == Address::zero() {
            return Err(Error::ValidationError("signer não pode ser o endereço zero".into()));
        }

        let config = AgentConfig {
            model_commitment,
            trusted_signer: signer,
            zk_verifier: None,
            mode: ValidationMode::Signature,
            active: true,
        };
        self.agents.write().insert(identity, config);

        info!(
            identity = %identity,
            signer = %utils::format_address(&signer),
            "Agente registrado em modo SIGNATURE"
        );
        publish(
            &self.events,
            RegistryEvent::Registered { identity, model_commitment, signer },
        );
        Ok(())
    }

    /// Promove o agente para modo ZK_PROOF. Transição unidirecional:
    /// não existe caminho de volta para SIGNATURE.
    pub async fn upgrade_to_zk(
        &self,
        caller: Address,
        identity: AgentId,
        verifier_ref: Address,
    ) -> Result<()> {
        self.ensure_controller(caller, identity).await?;
        if verifier_ref == Address::zero() {
            return Err(Error::VerifierAddressInvalid);
        }

        let mut agents = self.agents.write();
        let config = agents.get_mut(&identity).ok_or(Error::NotRegistered)?;
        if config.mode == ValidationMode::ZkProof {
            return Err(Error::AlreadyZk);
        }
        config.mode = ValidationMode::ZkProof;
        config.zk_verifier = Some(verifier_ref);
        drop(agents);

        info!(
            identity = %identity,
            verifier = %utils::format_address(&verifier_ref),
            "Agente promovido para modo ZK_PROOF"
        );
        publish(&self.events, RegistryEvent::UpgradedToZk { identity, verifier: verifier_ref });
        Ok(())
    }

    /// Desativa o agente; idempotente
    pub async fn deactivate(&self, caller: Address, identity: AgentId) -> Result<()> {
        self.set_active(caller, identity, false).await
    }

    /// Reativa o agente; idempotente
    pub async fn activate(&self, caller: Address, identity: AgentId) -> Result<()> {
        self.set_active(caller, identity, true).await
    }

    async fn set_active(&self, caller: Address, identity: AgentId, active: bool) -> Result<()> {
        self.ensure_controller(caller, identity).await?;

        let mut agents = self.agents.write();
        let config = agents.get_mut(&identity).ok_or(Error::NotRegistered)?;
        config.active = active;
        drop(agents);

        info!(identity = %identity, active, "Estado ativo do agente alterado");
        let event = if active {
            RegistryEvent::Activated { identity }
        } else {
            RegistryEvent::Deactivated { identity }
        };
        publish(&self.events, event);
        Ok(())
    }

    /// Verifica uma alegação de detecção contra a configuração do agente.
    ///
    /// Pré-condições viram erro tipado (`NotRegistered`, `NotActive`,
    /// `DetectionExpired`); o guarda de frescor é incondicional e
    /// precede o despacho por modo. Falha criptográfica é `Ok(false)`,
    /// nunca erro: nesta camada a verificação é um predicado.
    pub async fn verify_detection(
        &self,
        identity: AgentId,
        target: Address,
        timestamp: u64,
        evidence: &[u8],
        now: u64,
    ) -> Result<bool> {
        let config = self
            .agent_config(identity)
            .filter(|c| c.trusted_signer != Address::zero())
            .ok_or(Error::NotRegistered)?;
        if !config.active {
            return Err(Error::NotActive);
        }
        if now > timestamp.saturating_add(self.config.max_detection_age) {
            return Err(Error::DetectionExpired {
                now,
                timestamp,
                max_age: self.config.max_detection_age,
            });
        }

        let accepted = self.check_evidence(&config, target, timestamp, evidence).await;

        debug!(
            identity = %identity,
            target = %utils::format_address(&target),
            mode = %config.mode,
            accepted,
            "Alegação de detecção verificada"
        );
        publish(
            &self.events,
            RegistryEvent::DetectionChecked { identity, target, mode: config.mode, accepted },
        );
        Ok(accepted)
    }

    /// Variante não abortiva de [`verify_detection`]: mesmas regras,
    /// mas as condições de saída antecipada retornam `(false, motivo)`
    /// em vez de erro. Pensada para dry-run off-chain antes de gastar
    /// uma chamada cara.
    pub async fn check_detection(
        &self,
        identity: AgentId,
        target: Address,
        timestamp: u64,
        evidence: &[u8],
        now: u64,
    ) -> (bool, &'static str) {
        match self.verify_detection(identity, target, timestamp, evidence, now).await {
            Ok(true) => (true, "ok"),
            Ok(false) => (false, "invalid_evidence"),
            Err(Error::NotRegistered) => (false, "not_registered"),
            Err(Error::NotActive) => (false, "not_active"),
            Err(Error::DetectionExpired { .. }) => (false, "detection_expired"),
            Err(_) => (false, "invalid_evidence"),
        }
    }

    async fn check_evidence(
        &self,
        config: &AgentConfig,
        target: Address,
        timestamp: u64,
        evidence: &[u8],
    ) -> bool {
        match config.mode {
            ValidationMode::Signature => {
                let digest = utils::eth_signed_digest(&utils::claim_digest(
                    &target,
                    timestamp,
                    &config.model_commitment,
                ));
                match utils::recover_signer(&digest, evidence) {
                    Some(recovered) => recovered == config.trusted_signer,
                    None => false,
                }
            }
            ValidationMode::ZkProof => match config.zk_verifier {
                Some(verifier_ref) => {
                    let inputs = utils::claim_public_inputs(
                        &target,
                        timestamp,
                        &config.model_commitment,
                    );
                    verify_or_false(&self.verifier, verifier_ref, evidence, &inputs).await
                }
                // Invariante do modo viola apenas se o estado foi corrompido
                None => false,
            },
        }
    }

    /// Consulta a configuração de um agente
    pub fn agent_config(&self, identity: AgentId) -> Option<AgentConfig> {
        self.agents.read().get(&identity).cloned()
    }

    /// Modo de validação corrente do agente
    pub fn validation_mode(&self, identity: AgentId) -> Option<ValidationMode> {
        self.agents.read().get(&identity).map(|c| c.mode)
    }

    /// Se o agente está registrado e ativo
    pub fn is_agent_active(&self, identity: AgentId) -> bool {
        self.agents.read().get(&identity).map(|c| c.active).unwrap_or(false)
    }
}
