use crate::deviation::{deviation_bps, exceeds_threshold, normalize_to_1e18};
use crate::events::HookEvent;
use crate::ledger::PredatorLedger;
use crate::types::{
    FeeDecision, FeeReason, SwapAck, SwapRequest, DEVIATION_THRESHOLD_BPS, NORMAL_FEE,
    STALENESS_WINDOW, TRAP_FEE,
};
use sentinela_core::{
    events::publish,
    traits::{PoolPriceSource, PriceFeed, ProofVerifier},
    types::{OraclePrice, PoolId},
    utils::format_address,
};
use ethereum_types::U256;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Constantes do motor, fixadas na implantação
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub trap_fee: u32,
    pub normal_fee: u32,
    pub deviation_threshold_bps: u64,
    pub staleness_window: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trap_fee: TRAP_FEE,
            normal_fee: NORMAL_FEE,
            deviation_threshold_bps: DEVIATION_THRESHOLD_BPS,
            staleness_window: STALENESS_WINDOW,
        }
    }
}

/// Motor de decisão de taxa, invocado uma vez por tentativa de
/// negociação.
///
/// Ordem dos sinais: ledger primeiro (O(1), curto-circuita o oráculo),
/// desvio de preço em seguida, taxa normal por padrão. O caminho é
/// infalível por contrato: qualquer defeito do oráculo degrada para
/// "sem sinal de desvio" em vez de abortar, porque um revert aqui
/// seria um vetor de negação de serviço contra a exchange inteira.
pub struct FeeEngine<V, F, S> {
    ledger: Arc<PredatorLedger<V>>,
    feed: F,
    pool_prices: S,
    config: EngineConfig,
    events: Option<mpsc::Sender<HookEvent>>,
}

impl<V, F, S> FeeEngine<V, F, S>
where
    V: ProofVerifier,
    F: PriceFeed,
    S: PoolPriceSource,
{
    pub fn new(
        ledger: Arc<PredatorLedger<V>>,
        feed: F,
        pool_prices: S,
        config: EngineConfig,
    ) -> Self {
        Self { ledger, feed, pool_prices, config, events: None }
    }

    pub fn with_events(mut self, sender: mpsc::Sender<HookEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn ledger(&self) -> &Arc<PredatorLedger<V>> {
        &self.ledger
    }

    /// Ponto de entrada chamado pela camada de liquidação antes de cada
    /// negociação. Nunca falha; a resposta carrega a tag de protocolo,
    /// delta zero e a taxa com o bit de override.
    pub async fn before_swap(&self, request: &SwapRequest, now: u64) -> SwapAck {
        let decision = self.decide_fee(request, now).await;
        SwapAck::from_decision(&decision)
    }

    /// Decide entre taxa normal e taxa-armadilha.
    pub async fn decide_fee(&self, request: &SwapRequest, now: u64) -> FeeDecision {
        // Resolução de identidade: chamador imediato, depois o
        // originador. Exatamente dois saltos; bots costumam operar
        // atrás de um roteador, e o originador pega esse padrão.
        let effective = if self.ledger.is_flagged(request.trader) {
            Some(request.trader)
        } else if self.ledger.is_flagged(request.origin) {
            Some(request.origin)
        } else {
            None
        };

        // Detecção confirmada domina: não é revista por sinal de preço
        if let Some(address) = effective {
            warn!(
                address = %format_address(&address),
                fee = self.config.trap_fee,
                "Predador sinalizado, aplicando taxa-armadilha"
            );
            publish(
                &self.events,
                HookEvent::TrapTriggered {
                    address,
                    fee_applied: self.config.trap_fee,
                    reason: FeeReason::AiDetected.to_string(),
                },
            );
            return FeeDecision { fee: self.config.trap_fee, reason: FeeReason::AiDetected };
        }

        if let Some(bps) = self.deviation_signal(request.pool, now).await {
            if exceeds_threshold(bps, self.config.deviation_threshold_bps) {
                warn!(
                    trader = %format_address(&request.trader),
                    deviation_bps = %bps,
                    "Desvio de preço acima do limiar, aplicando taxa-armadilha"
                );
                publish(
                    &self.events,
                    HookEvent::TrapTriggered {
                        address: request.trader,
                        fee_applied: self.config.trap_fee,
                        reason: FeeReason::PriceDeviation.to_string(),
                    },
                );
                return FeeDecision { fee: self.config.trap_fee, reason: FeeReason::PriceDeviation };
            }
        }

        // Caminho comum: nenhum evento, decisão barata
        FeeDecision { fee: self.config.normal_fee, reason: FeeReason::None }
    }

    /// Consulta read-only: última leitura do feed de referência
    pub async fn oracle_price(&self) -> sentinela_core::error::Result<OraclePrice> {
        self.feed.latest_price().await
    }

    /// Consulta read-only: se a pool desvia do oráculo acima do limiar
    pub async fn check_price_deviation(&self, pool: PoolId, now: u64) -> bool {
        match self.deviation_signal(pool, now).await {
            Some(bps) => exceeds_threshold(bps, self.config.deviation_threshold_bps),
            None => false,
        }
    }

    /// Desvio corrente em pontos-base, ou `None` quando não há sinal
    /// utilizável (oráculo inalcançável, inválido ou defasado; pool
    /// ilegível). Falha aberta: nunca erro.
    async fn deviation_signal(&self, pool: PoolId, now: u64) -> Option<U256> {
        let reading = match self.feed.latest_price().await {
            Ok(reading) => reading,
            Err(e) => {
                debug!(error = %e, "Oráculo inalcançável, sem sinal de desvio");
                return None;
            }
        };
        if !reading.is_usable(now, self.config.staleness_window) {
            debug!(
                value = reading.value,
                as_of = reading.as_of,
                now,
                "Leitura do oráculo inválida ou defasada, sem sinal de desvio"
            );
            return None;
        }

        let pool_price = match self.pool_prices.spot_price(pool).await {
            Ok(price) => price,
            Err(e) => {
                debug!(error = %e, "Preço da pool ilegível, sem sinal de desvio");
                return None;
            }
        };

        let oracle_1e18 = normalize_to_1e18(reading.value as u128, reading.decimals);
        Some(deviation_bps(pool_price, oracle_1e18))
    }
}
