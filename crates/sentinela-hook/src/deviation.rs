use ethereum_types::{U256, U512};

/// Escala de ponto fixo comum às duas leituras de preço
const ONE_E18_DECIMALS: u8 = 18;

/// Normaliza uma leitura `(valor, decimais)` para ponto fixo 1e18
pub fn normalize_to_1e18(value: u128, decimals: u8) -> U256 {
    let value = U256::from(value);
    if decimals < ONE_E18_DECIMALS {
        value * U256::from(10u64).pow(U256::from(ONE_E18_DECIMALS - decimals))
    } else if decimals > ONE_E18_DECIMALS {
        value / U256::from(10u64).pow(U256::from(decimals - ONE_E18_DECIMALS))
    } else {
        value
    }
}

/// Desvio relativo em pontos-base:
/// `|pool_price - oracle_price| * 10000 / oracle_price`.
///
/// Oráculo zero não produz sinal (divisão impossível), devolve 0.
pub fn deviation_bps(pool_price: U256, oracle_price: U256) -> U256 {
    if oracle_price.is_zero() {
        return U256::zero();
    }
    let diff = if pool_price > oracle_price {
        pool_price - oracle_price
    } else {
        oracle_price - pool_price
    };
    let scaled: U512 = diff.full_mul(U256::from(10_000u64));
    let bps = scaled / U512::from(oracle_price);
    // O quociente cabe em U256 sempre que diff/oracle é razoável;
    // saturamos no limite em vez de abortar o caminho quente
    u512_to_u256_saturating(bps)
}

/// Comparação estrita: exatamente no limiar não dispara
pub fn exceeds_threshold(bps: U256, threshold_bps: u64) -> bool {
    bps > U256::from(threshold_bps)
}

fn u512_to_u256_saturating(value: U512) -> U256 {
    if value.0[4..].iter().any(|&limb| limb != 0) {
        return U256::MAX;
    }
    let mut bytes = [0u8; 64];
    value.to_big_endian(&mut bytes);
    U256::from_big_endian(&bytes[32..])
}
