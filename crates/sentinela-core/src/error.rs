use thiserror::Error;

/// Erros comuns da biblioteca Sentinela
#[derive(Error, Debug)]
pub enum Error {
    /// Chamador não é a autoridade sentinela
    #[error("Apenas a autoridade sentinela pode executar esta operação")]
    OnlyAuthority,

    /// Chamador não controla a identidade alvo
    #[error("Chamador não é o controlador da identidade")]
    NotOwner,

    /// Prova de detecção rejeitada pelo verificador
    #[error("Prova inválida")]
    InvalidProof,

    /// Política do ledger exige evidência para mutação
    #[error("Mutação exige evidência verificável")]
    EvidenceRequired,

    /// Endereço de verificador nulo ou malformado
    #[error("Endereço de verificador inválido")]
    VerifierAddressInvalid,

    /// Alegação de detecção fora da janela de validade
    #[error("Detecção expirada: agora={now}, timestamp={timestamp}, idade máxima={max_age}s")]
    DetectionExpired {
        now: u64,
        timestamp: u64,
        max_age: u64,
    },

    /// Identidade sem configuração registrada
    #[error("Agente não registrado")]
    NotRegistered,

    /// Identidade registrada porém desativada
    #[error("Agente não está ativo")]
    NotActive,

    /// Identidade já opera em modo ZK_PROOF
    #[error("Agente já está em modo ZK_PROOF")]
    AlreadyZk,

    /// Erro de comunicação com o node
    #[error("Erro de RPC: {0}")]
    RpcError(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Erro de validação
    #[error("Erro de validação: {0}")]
    ValidationError(String),

    /// Erro genérico
    #[error("{0}")]
    Other(String),
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
