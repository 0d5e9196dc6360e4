/*!
 * Sentinela Utils
 *
 * Criptografia e codificação da alegação de detecção: digest canônico,
 * prefixo de mensagem assinada, recuperação ECDSA e entradas públicas
 * para o verificador ZK.
 */

use ethereum_types::{Address, H256, U256};
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

/// Prefixo padrão do Ethereum para assinatura de um digest de 32 bytes
const SIGNED_MESSAGE_PREFIX_32: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Converte uma string hexadecimal para Address
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = if hex.starts_with("0x") { &hex[2..] } else { hex };
    Address::from_str(hex_str).ok()
}

/// Formata um Address para exibição
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

/// Calcula o hash Keccak-256 de dados
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut result = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut result);
    result
}

/// Digest canônico de uma alegação de detecção:
/// `keccak256(target ‖ be256(timestamp) ‖ model_commitment)`.
///
/// A tripla vincula a evidência ao alvo, ao instante e ao modelo,
/// impedindo replay entre alvos, tempos ou modelos.
pub fn claim_digest(target: &Address, timestamp: u64, model_commitment: &H256) -> H256 {
    let mut buffer = Vec::with_capacity(20 + 32 + 32);
    buffer.extend_from_slice(target.as_bytes());
    let mut ts = [0u8; 32];
    U256::from(timestamp).to_big_endian(&mut ts);
    buffer.extend_from_slice(&ts);
    buffer.extend_from_slice(model_commitment.as_bytes());
    H256::from(keccak256(&buffer))
}

/// Aplica o prefixo de mensagem assinada a um digest de 32 bytes
pub fn eth_signed_digest(digest: &H256) -> H256 {
    let mut buffer = Vec::with_capacity(SIGNED_MESSAGE_PREFIX_32.len() + 32);
    buffer.extend_from_slice(SIGNED_MESSAGE_PREFIX_32);
    buffer.extend_from_slice(digest.as_bytes());
    H256::from(keccak256(&buffer))
}

/// Entradas públicas do circuito de detecção:
/// `[keccak256(target), keccak256(be256(timestamp)), model_commitment]`
pub fn claim_public_inputs(
    target: &Address,
    timestamp: u64,
    model_commitment: &H256,
) -> [U256; 3] {
    let mut ts = [0u8; 32];
    U256::from(timestamp).to_big_endian(&mut ts);
    [
        U256::from_big_endian(&keccak256(target.as_bytes())),
        U256::from_big_endian(&keccak256(&ts)),
        U256::from_big_endian(model_commitment.as_bytes()),
    ]
}

/// Recupera o endereço que assinou um digest prefixado
pub fn recover_signer(message_hash: &H256, signature: &[u8]) -> Option<Address> {
    if signature.len() != 65 {
        return None;
    }

    let v = signature[64];
    let secp = secp256k1::Secp256k1::new();
    let recovery_id = secp256k1::ecdsa::RecoveryId::from_i32(v as i32 - 27).ok()?;
    let message = secp256k1::Message::from_slice(message_hash.as_bytes()).ok()?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&signature[0..64]);
    let recoverable_sig =
        secp256k1::ecdsa::RecoverableSignature::from_compact(&sig_bytes, recovery_id).ok()?;

    let public_key = secp.recover_ecdsa(&message, &recoverable_sig).ok()?;
    let public_key_serialized = public_key.serialize_uncompressed();

    // O endereço é os últimos 20 bytes do Keccak-256 da chave pública
    let hash = keccak256(&public_key_serialized[1..]);
    Some(Address::from_slice(&hash[12..32]))
}

/// Assina o digest de uma alegação `(target, timestamp, model_commitment)`
/// com uma chave secreta, no formato 65 bytes (r ‖ s ‖ v)
pub fn sign_claim(
    secret: &[u8; 32],
    target: &Address,
    timestamp: u64,
    model_commitment: &H256,
) -> Option<Vec<u8>> {
    let secp = secp256k1::Secp256k1::new();
    let secret_key = secp256k1::SecretKey::from_slice(secret).ok()?;
    let digest = eth_signed_digest(&claim_digest(target, timestamp, model_commitment));
    let message = secp256k1::Message::from_slice(digest.as_bytes()).ok()?;

    let signature = secp.sign_ecdsa_recoverable(&message, &secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut out = Vec::with_capacity(65);
    out.extend_from_slice(&compact);
    out.push(recovery_id.to_i32() as u8 + 27);
    Some(out)
}

/// Endereço correspondente a uma chave secreta
pub fn address_from_secret(secret: &[u8; 32]) -> Option<Address> {
    let secp = secp256k1::Secp256k1::new();
    let secret_key = secp256k1::SecretKey::from_slice(secret).ok()?;
    let public_key = secp256k1::PublicKey::from_secret_key(&secp, &secret_key);
    let serialized = public_key.serialize_uncompressed();
    let hash = keccak256(&serialized[1..]);
    Some(Address::from_slice(&hash[12..32]))
}
