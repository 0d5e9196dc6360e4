//! Pipeline completo da Sentinela com colaboradores em memória:
//! registro do agente detector, alegação assinada, sinalização do
//! predador via evidência e decisão de taxa nas duas pontas.
//!
//! Uso: cargo run --example trap_pipeline

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ethereum_types::{Address, H256, U256};
use sentinela_core::{
    error::Result,
    events::EventBus,
    traits::{ControllerDirectory, PoolPriceSource, PriceFeed, ProofVerifier},
    types::{AgentId, OraclePrice, PoolId},
    utils,
};
use sentinela_hook::{
    EngineConfig, FeeEngine, HookEvent, PredatorLedger, SwapRequest, TrustPolicy,
};
use sentinela_registry::{DetectionRegistry, RegistryConfig};
use tracing::info;

const ONE_E18: u64 = 1_000_000_000_000_000_000;

/// Verificador em memória que aceita qualquer prova não vazia
struct LocalVerifier;

#[async_trait]
impl ProofVerifier for LocalVerifier {
    async fn verify(&self, _: Address, proof: &[u8], _: &[U256]) -> Result<bool> {
        Ok(!proof.is_empty())
    }
}

struct StaticControllers(HashMap<AgentId, Address>);

#[async_trait]
impl ControllerDirectory for StaticControllers {
    async fn controller_of(&self, identity: AgentId) -> Result<Option<Address>> {
        Ok(self.0.get(&identity).copied())
    }
}

struct StaticFeed(OraclePrice);

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn latest_price(&self) -> Result<OraclePrice> {
        Ok(self.0)
    }
}

struct StaticPool(U256);

#[async_trait]
impl PoolPriceSource for StaticPool {
    async fn spot_price(&self, _pool: PoolId) -> Result<U256> {
        Ok(self.0)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let now = chrono::Utc::now().timestamp() as u64;
    let authority = Address::repeat_byte(0xa1);
    let owner = Address::repeat_byte(0x01);
    let bot = Address::repeat_byte(0xde);
    let honest = Address::repeat_byte(0x07);
    let pool = Address::repeat_byte(0xab);

    // Identidade do agente detector e sua chave de assinatura
    let agent = AgentId::from(7u64);
    let secret = [0x42u8; 32];
    let signer = utils::address_from_secret(&secret).expect("chave de teste válida");
    let model = H256::repeat_byte(0x11);

    // Registro de atestação com eventos
    let mut controllers = HashMap::new();
    controllers.insert(agent, owner);
    let (registry_bus, mut registry_events) = EventBus::new(64);
    let registry = DetectionRegistry::new(
        LocalVerifier,
        StaticControllers(controllers),
        RegistryConfig::default(),
    )
    .with_events(registry_bus.sender());

    registry.register(owner, agent, model, signer).await?;

    // O detector off-chain assina a alegação (bot, timestamp, modelo)
    let signature = utils::sign_claim(&secret, &bot, now, &model).expect("assinatura de teste");

    // Dry-run barato antes de gastar a chamada cara
    let (valid, reason) = registry.check_detection(agent, bot, now, &signature, now).await;
    info!(valid, reason, "Dry-run da alegação");

    let accepted = registry.verify_detection(agent, bot, now, &signature, now).await?;
    info!(accepted, "Alegação verificada pelo registro");

    // Ledger + motor, com oráculo e pool em 1.0 (sem desvio)
    let (hook_bus, mut hook_events) = EventBus::new(64);
    let ledger = Arc::new(
        PredatorLedger::new(authority, LocalVerifier, Address::repeat_byte(0x03), TrustPolicy::Open)
            .with_events(hook_bus.sender()),
    );
    let feed = StaticFeed(OraclePrice { value: 100_000_000, decimals: 8, as_of: now });
    let spot = StaticPool(U256::from(ONE_E18));
    let engine = FeeEngine::new(ledger.clone(), feed, spot, EngineConfig::default())
        .with_events(hook_bus.sender());

    // Checagem prévia do agente: pulando geração de prova se já preso
    if !ledger.is_flagged(bot) {
        let inputs = utils::claim_public_inputs(&bot, now, &model);
        ledger
            .set_flag_with_evidence(authority, bot, true, b"zk-proof-bytes", &inputs)
            .await?;
    }

    // Negociação do bot: taxa-armadilha
    let ack = engine
        .before_swap(
            &SwapRequest {
                trader: bot,
                origin: bot,
                pool,
                zero_for_one: true,
                amount_specified: 1_000_000,
            },
            now,
        )
        .await;
    info!(fee = ack.fee, "Negociação do predador respondida");

    // Negociação honesta: taxa normal
    let ack = engine
        .before_swap(
            &SwapRequest {
                trader: honest,
                origin: honest,
                pool,
                zero_for_one: false,
                amount_specified: 500_000,
            },
            now,
        )
        .await;
    info!(fee = ack.fee, "Negociação honesta respondida");

    // Drena os eventos publicados pelos dois componentes
    while let Ok(event) = registry_events.try_recv() {
        info!(?event, "Evento do registro");
    }
    while let Ok(event) = hook_events.try_recv() {
        match event {
            HookEvent::TrapTriggered { address, fee_applied, reason } => info!(
                address = %utils::format_address(&address),
                fee_applied,
                reason,
                "Armadilha disparada"
            ),
            other => info!(?other, "Evento do hook"),
        }
    }

    Ok(())
}
