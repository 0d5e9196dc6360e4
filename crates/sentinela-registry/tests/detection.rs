use sentinela_core::{
    error::{Error, Result},
    traits::{ControllerDirectory, ProofVerifier},
    utils,
};
use sentinela_core::types::AgentId;
use sentinela_registry::{DetectionRegistry, RegistryConfig, RegistryEvent};
use async_trait::async_trait;
use ethereum_types::{Address, H256, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SECRET: [u8; 32] = [0x42u8; 32];

#[derive(Clone, Copy)]
enum VerifierBehavior {
    Accept,
    Reject,
    Broken,
}

/// Verificador de teste com comportamento fixo, gravando as entradas
/// que recebeu
#[derive(Clone)]
struct RecordingVerifier {
    behavior: VerifierBehavior,
    seen: Arc<Mutex<Vec<(Address, Vec<U256>)>>>,
}

impl RecordingVerifier {
    fn new(behavior: VerifierBehavior) -> Self {
        Self { behavior, seen: Arc::new(Mutex::new(Vec::new())) }
    }

    fn accepting() -> Self {
        Self::new(VerifierBehavior::Accept)
    }

    fn rejecting() -> Self {
        Self::new(VerifierBehavior::Reject)
    }

    fn broken() -> Self {
        Self::new(VerifierBehavior::Broken)
    }
}

#[async_trait]
impl ProofVerifier for RecordingVerifier {
    async fn verify(&self, verifier_ref: Address, _: &[u8], inputs: &[U256]) -> Result<bool> {
        self.seen.lock().unwrap().push((verifier_ref, inputs.to_vec()));
        match self.behavior {
            VerifierBehavior::Accept => Ok(true),
            VerifierBehavior::Reject => Ok(false),
            VerifierBehavior::Broken => Err(Error::RpcError("verificador abortou".into())),
        }
    }
}

struct StaticControllers(HashMap<AgentId, Address>);

#[async_trait]
impl ControllerDirectory for StaticControllers {
    async fn controller_of(&self, identity: AgentId) -> Result<Option<Address>> {
        Ok(self.0.get(&identity).copied())
    }
}

const OWNER: Address = Address::repeat_byte(0x01);
const BOT: Address = Address::repeat_byte(0xde);

fn agent() -> AgentId {
    AgentId::from(7u64)
}

fn model() -> H256 {
    H256::repeat_byte(0x11)
}

fn registry(verifier: RecordingVerifier) -> DetectionRegistry<RecordingVerifier, StaticControllers> {
    let mut controllers = HashMap::new();
    controllers.insert(agent(), OWNER);
    DetectionRegistry::new(verifier, StaticControllers(controllers), RegistryConfig::default())
}

async fn registered_registry(
    verifier: RecordingVerifier,
) -> DetectionRegistry<RecordingVerifier, StaticControllers> {
    let registry = registry(verifier);
    let signer = utils::address_from_secret(&SECRET).unwrap();
    registry.register(OWNER, agent(), model(), signer).await.unwrap();
    registry
}

#[tokio::test]
async fn fresh_signed_claim_verifies() {
    let registry = registered_registry(RecordingVerifier::accepting()).await;
    let sig = utils::sign_claim(&SECRET, &BOT, 1_000, &model()).unwrap();

    let accepted = registry
        .verify_detection(agent(), BOT, 1_000, &sig, 1_000)
        .await
        .unwrap();
    assert!(accepted);
}

#[tokio::test]
async fn claim_past_freshness_window_is_expired() {
    let registry = registered_registry(RecordingVerifier::accepting()).await;
    let sig = utils::sign_claim(&SECRET, &BOT, 1_000, &model()).unwrap();

    let result = registry.verify_detection(agent(), BOT, 1_000, &sig, 1_000 + 301).await;
    assert!(matches!(result, Err(Error::DetectionExpired { .. })));
}

#[tokio::test]
async fn freshness_boundary_is_inclusive() {
    let registry = registered_registry(RecordingVerifier::accepting()).await;
    let sig = utils::sign_claim(&SECRET, &BOT, 1_000, &model()).unwrap();

    // Exatamente MAX_DETECTION_AGE segundos: aceita
    let accepted = registry
        .verify_detection(agent(), BOT, 1_000, &sig, 1_300)
        .await
        .unwrap();
    assert!(accepted);

    // Um segundo a mais: expira
    let result = registry.verify_detection(agent(), BOT, 1_000, &sig, 1_301).await;
    assert!(matches!(result, Err(Error::DetectionExpired { .. })));
}

#[tokio::test]
async fn signature_binds_target_timestamp_and_model() {
    let registry = registered_registry(RecordingVerifier::accepting()).await;
    let sig = utils::sign_claim(&SECRET, &BOT, 1_000, &model()).unwrap();

    // Replay contra outro alvo
    let other_target = Address::repeat_byte(0xad);
    assert!(!registry
        .verify_detection(agent(), other_target, 1_000, &sig, 1_000)
        .await
        .unwrap());

    // Replay com outro timestamp
    assert!(!registry
        .verify_detection(agent(), BOT, 1_001, &sig, 1_001)
        .await
        .unwrap());

    // Replay contra outro modelo registrado
    let signer = utils::address_from_secret(&SECRET).unwrap();
    registry
        .register(OWNER, agent(), H256::repeat_byte(0x22), signer)
        .await
        .unwrap();
    assert!(!registry
        .verify_detection(agent(), BOT, 1_000, &sig, 1_000)
        .await
        .unwrap());
}

#[tokio::test]
async fn wrong_signer_yields_false_not_error() {
    let registry = registered_registry(RecordingVerifier::accepting()).await;
    let other_secret = [0x43u8; 32];
    let sig = utils::sign_claim(&other_secret, &BOT, 1_000, &model()).unwrap();

    let accepted = registry
        .verify_detection(agent(), BOT, 1_000, &sig, 1_000)
        .await
        .unwrap();
    assert!(!accepted);

    // Evidência malformada idem
    let accepted = registry
        .verify_detection(agent(), BOT, 1_000, &[0u8; 10], 1_000)
        .await
        .unwrap();
    assert!(!accepted);
}

#[tokio::test]
async fn unregistered_or_inactive_agent_is_rejected() {
    let registry = registry(RecordingVerifier::accepting());
    let result = registry.verify_detection(agent(), BOT, 1_000, &[], 1_000).await;
    assert!(matches!(result, Err(Error::NotRegistered)));

    let registry = registered_registry(RecordingVerifier::accepting()).await;
    registry.deactivate(OWNER, agent()).await.unwrap();
    let result = registry.verify_detection(agent(), BOT, 1_000, &[], 1_000).await;
    assert!(matches!(result, Err(Error::NotActive)));
}

#[tokio::test]
async fn zk_mode_passes_bound_public_inputs() {
    let verifier = RecordingVerifier::accepting();
    let registry = registered_registry(verifier.clone()).await;
    let verifier_ref = Address::repeat_byte(0x03);
    registry.upgrade_to_zk(OWNER, agent(), verifier_ref).await.unwrap();

    let accepted = registry
        .verify_detection(agent(), BOT, 1_000, b"proof-bytes", 1_000)
        .await
        .unwrap();
    assert!(accepted);

    let seen = verifier.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    let (reference, inputs) = &seen[0];
    assert_eq!(*reference, verifier_ref);
    assert_eq!(inputs.as_slice(), &utils::claim_public_inputs(&BOT, 1_000, &model()));
}

#[tokio::test]
async fn zk_verifier_failure_maps_to_false() {
    for verifier in [RecordingVerifier::rejecting(), RecordingVerifier::broken()] {
        let registry = registered_registry(verifier).await;
        registry
            .upgrade_to_zk(OWNER, agent(), Address::repeat_byte(0x03))
            .await
            .unwrap();

        let accepted = registry
            .verify_detection(agent(), BOT, 1_000, b"proof-bytes", 1_000)
            .await
            .unwrap();
        assert!(!accepted);
    }
}

#[tokio::test]
async fn check_detection_reports_reasons_without_erroring() {
    let registry = registry(RecordingVerifier::accepting());
    assert_eq!(
        registry.check_detection(agent(), BOT, 1_000, &[], 1_000).await,
        (false, "not_registered")
    );

    let registry = registered_registry(RecordingVerifier::accepting()).await;
    let sig = utils::sign_claim(&SECRET, &BOT, 1_000, &model()).unwrap();

    assert_eq!(
        registry.check_detection(agent(), BOT, 1_000, &sig, 1_000).await,
        (true, "ok")
    );
    assert_eq!(
        registry.check_detection(agent(), BOT, 1_000, &sig, 1_301).await,
        (false, "detection_expired")
    );
    assert_eq!(
        registry.check_detection(agent(), BOT, 1_000, &[0u8; 65], 1_000).await,
        (false, "invalid_evidence")
    );

    registry.deactivate(OWNER, agent()).await.unwrap();
    assert_eq!(
        registry.check_detection(agent(), BOT, 1_000, &sig, 1_000).await,
        (false, "not_active")
    );
}

#[tokio::test]
async fn lifecycle_and_checks_emit_events() {
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);
    let mut controllers = HashMap::new();
    controllers.insert(agent(), OWNER);
    let registry = DetectionRegistry::new(
        RecordingVerifier::accepting(),
        StaticControllers(controllers),
        RegistryConfig::default(),
    )
    .with_events(tx);

    let signer = utils::address_from_secret(&SECRET).unwrap();
    registry.register(OWNER, agent(), model(), signer).await.unwrap();
    let sig = utils::sign_claim(&SECRET, &BOT, 1_000, &model()).unwrap();
    registry.verify_detection(agent(), BOT, 1_000, &sig, 1_000).await.unwrap();

    match rx.recv().await.unwrap() {
        RegistryEvent::Registered { identity, signer: s, .. } => {
            assert_eq!(identity, agent());
            assert_eq!(s, signer);
        }
        other => panic!("esperado Registered, obtido {:?}", other),
    }
    match rx.recv().await.unwrap() {
        RegistryEvent::DetectionChecked { target, accepted, .. } => {
            assert_eq!(target, BOT);
            assert!(accepted);
        }
        other => panic!("esperado DetectionChecked, obtido {:?}", other),
    }
}
