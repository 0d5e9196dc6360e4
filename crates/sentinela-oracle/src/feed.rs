use sentinela_core::{
    error::{Error, Result},
    traits::{ChainReader, PriceFeed},
    types::OraclePrice,
};
use async_trait::async_trait;
use ethereum_types::{Address, U256};
use tracing::debug;

/// Seletor de latestRoundData()
const LATEST_ROUND_DATA: [u8; 4] = [0xfe, 0xaf, 0x96, 0x8c];
/// Seletor de decimals()
const DECIMALS: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Gateway para um agregador de preço estilo Chainlink.
///
/// Invólucro fino: cada consulta faz as leituras e decodifica, nada
/// mais. Feed inalcançável ou resposta malformada propagam como erro
/// tipado; avaliar staleness e validade é responsabilidade do chamador.
pub struct AggregatorGateway<P> {
    provider: P,
    feed: Address,
}

impl<P: ChainReader> AggregatorGateway<P> {
    pub fn new(provider: P, feed: Address) -> Self {
        Self { provider, feed }
    }

    pub fn feed(&self) -> Address {
        self.feed
    }

    /// Última leitura publicada: `(answer, decimals, updatedAt)`
    pub async fn latest_price(&self) -> Result<OraclePrice> {
        let round = self.provider.call(self.feed, LATEST_ROUND_DATA.to_vec()).await?;
        // latestRoundData devolve 5 palavras:
        // (roundId, answer, startedAt, updatedAt, answeredInRound)
        if round.len() < 160 {
            return Err(Error::DecodeError(format!(
                "Resposta de latestRoundData com {} bytes, esperados 160",
                round.len()
            )));
        }
        let value = decode_int256(&round[32..64])?;
        let as_of = decode_u64(&round[96..128])?;

        let decimals_out = self.provider.call(self.feed, DECIMALS.to_vec()).await?;
        if decimals_out.len() < 32 {
            return Err(Error::DecodeError(format!(
                "Resposta de decimals com {} bytes, esperados 32",
                decimals_out.len()
            )));
        }
        let decimals = decimals_out[31];

        debug!(
            feed = %format!("0x{:x}", self.feed),
            value,
            decimals,
            as_of,
            "Leitura do feed de preço"
        );

        Ok(OraclePrice { value, decimals, as_of })
    }
}

#[async_trait]
impl<P: ChainReader> PriceFeed for AggregatorGateway<P> {
    async fn latest_price(&self) -> Result<OraclePrice> {
        AggregatorGateway::latest_price(self).await
    }
}

/// Decodifica uma palavra int256 (complemento de dois) para i128
fn decode_int256(word: &[u8]) -> Result<i128> {
    let raw = U256::from_big_endian(word);
    let max = U256::from(i128::MAX);
    if word[0] & 0x80 != 0 {
        let magnitude = (!raw).overflowing_add(U256::one()).0;
        if magnitude > max {
            return Err(Error::DecodeError("int256 fora do alcance de i128".into()));
        }
        Ok(-(magnitude.as_u128() as i128))
    } else {
        if raw > max {
            return Err(Error::DecodeError("int256 fora do alcance de i128".into()));
        }
        Ok(raw.as_u128() as i128)
    }
}

fn decode_u64(word: &[u8]) -> Result<u64> {
    let raw = U256::from_big_endian(word);
    if raw > U256::from(u64::MAX) {
        return Err(Error::DecodeError("timestamp fora do alcance de u64".into()));
    }
    Ok(raw.as_u64())
}
