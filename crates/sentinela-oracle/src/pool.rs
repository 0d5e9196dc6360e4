use sentinela_core::{
    error::{Error, Result},
    traits::{ChainReader, PoolPriceSource},
    types::PoolId,
};
use async_trait::async_trait;
use ethereum_types::{Address, U256, U512};
use tracing::debug;

/// Seletor de slot0()
const SLOT0: [u8; 4] = [0x38, 0x50, 0xc7, 0xbd];

/// Escala de ponto fixo comum às comparações de desvio
const ONE_E18: u64 = 1_000_000_000_000_000_000;

/// Leitor do preço spot da pool a partir do slot0 (sqrtPriceX96).
pub struct SlotPriceReader<P> {
    provider: P,
}

impl<P: ChainReader> SlotPriceReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Preço spot em ponto fixo 1e18: `sqrtPriceX96² * 1e18 / 2^192`
    pub async fn spot_price(&self, pool: Address) -> Result<U256> {
        let out = self.provider.call(pool, SLOT0.to_vec()).await?;
        if out.len() < 32 {
            return Err(Error::DecodeError(format!(
                "Resposta de slot0 com {} bytes, esperados ao menos 32",
                out.len()
            )));
        }
        let sqrt_price_x96 = U256::from_big_endian(&out[0..32]);
        let price = sqrt_price_x96_to_1e18(sqrt_price_x96)
            .ok_or_else(|| Error::DecodeError("sqrtPriceX96 fora de alcance".into()))?;

        debug!(pool = %format!("0x{:x}", pool), %price, "Preço spot da pool");
        Ok(price)
    }
}

#[async_trait]
impl<P: ChainReader> PoolPriceSource for SlotPriceReader<P> {
    async fn spot_price(&self, pool: PoolId) -> Result<U256> {
        SlotPriceReader::spot_price(self, pool).await
    }
}

/// Converte sqrtPriceX96 (Q64.96) para preço em ponto fixo 1e18.
/// Intermediário em U512 para não estourar no quadrado.
pub fn sqrt_price_x96_to_1e18(sqrt_price_x96: U256) -> Option<U256> {
    let squared: U512 = sqrt_price_x96.full_mul(sqrt_price_x96);
    let scaled = squared.checked_mul(U512::from(ONE_E18))?;
    u512_to_u256(scaled >> 192)
}

fn u512_to_u256(value: U512) -> Option<U256> {
    if value.0[4..].iter().any(|&limb| limb != 0) {
        return None;
    }
    let mut bytes = [0u8; 64];
    value.to_big_endian(&mut bytes);
    Some(U256::from_big_endian(&bytes[32..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_sqrt_price_is_one() {
        // sqrtPriceX96 = 2^96 representa preço 1.0
        let sqrt = U256::one() << 96;
        assert_eq!(sqrt_price_x96_to_1e18(sqrt), Some(U256::from(ONE_E18)));
    }

    #[test]
    fn doubled_sqrt_price_quadruples() {
        let sqrt = U256::one() << 97;
        assert_eq!(
            sqrt_price_x96_to_1e18(sqrt),
            Some(U256::from(ONE_E18) * U256::from(4u64))
        );
    }

    #[test]
    fn zero_sqrt_price_is_zero() {
        assert_eq!(sqrt_price_x96_to_1e18(U256::zero()), Some(U256::zero()));
    }

    #[tokio::test]
    async fn reads_slot0_from_provider() {
        struct Slot0Provider;

        #[async_trait]
        impl ChainReader for Slot0Provider {
            async fn call(&self, _to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
                assert_eq!(&data[0..4], &SLOT0);
                let mut out = vec![0u8; 224];
                let sqrt = U256::one() << 96;
                sqrt.to_big_endian(&mut out[0..32]);
                Ok(out)
            }

            async fn get_block_number(&self) -> Result<u64> {
                Ok(0)
            }
        }

        let reader = SlotPriceReader::new(Slot0Provider);
        let price = reader.spot_price(Address::repeat_byte(0xab)).await.unwrap();
        assert_eq!(price, U256::from(ONE_E18));
    }
}
