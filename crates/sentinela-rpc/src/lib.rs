/*!
 * Sentinela RPC
 *
 * Cliente RPC mínimo para as leituras on-chain do núcleo Sentinela.
 * Exatamente uma leitura por invocação: sem cache, sem retry, sem pool
 * de conexões. Quem decide o que fazer com uma leitura ausente ou
 * defasada é o chamador, nunca esta camada.
 */

use sentinela_core::{error::Result, traits::ChainReader, Error};
use ethereum_types::Address;
use web3::{
    transports::{Http, WebSocket},
    types::{Bytes, H160},
    Web3,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Configuração do cliente RPC
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Enum para diferentes tipos de transporte
pub enum TransportType {
    Http(Web3<Http>),
    WebSocket(Web3<WebSocket>),
}

/// Cliente RPC da Sentinela
pub struct SentinelaRpcClient {
    transport: TransportType,
    config: RpcConfig,
}

impl SentinelaRpcClient {
    /// Cria um novo cliente RPC HTTP
    pub async fn new_http(config: RpcConfig) -> Result<Self> {
        let transport = Http::new(&config.endpoint)
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via HTTP: {}", e)))?;

        let web3 = Web3::new(transport);

        // Verifica a conexão
        web3.eth()
            .block_number()
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar ao node Ethereum: {}", e)))?;

        Ok(Self {
            transport: TransportType::Http(web3),
            config,
        })
    }

    /// Cria um novo cliente RPC WebSocket
    pub async fn new_websocket(config: RpcConfig) -> Result<Self> {
        let transport = WebSocket::new(&config.endpoint)
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via WebSocket: {}", e)))?;

        let web3 = Web3::new(transport);

        // Verifica a conexão
        web3.eth()
            .block_number()
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar ao node Ethereum: {}", e)))?;

        Ok(Self {
            transport: TransportType::WebSocket(web3),
            config,
        })
    }

    /// Cria um novo cliente baseado na URL
    pub async fn new(config: RpcConfig) -> Result<Self> {
        if config.endpoint.starts_with("ws") {
            Self::new_websocket(config).await
        } else {
            Self::new_http(config).await
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Chama um método de contrato (eth_call)
    pub async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let call_request = web3::types::CallRequest {
            from: None,
            to: Some(H160::from_slice(to.as_bytes())),
            gas: None,
            gas_price: None,
            value: None,
            data: Some(Bytes(data)),
            transaction_type: None,
            access_list: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        };

        let result = match &self.transport {
            TransportType::Http(web3) => web3
                .eth()
                .call(call_request, None)
                .await
                .map_err(|e| Error::RpcError(format!("Falha na chamada RPC: {}", e)))?,
            TransportType::WebSocket(web3) => web3
                .eth()
                .call(call_request, None)
                .await
                .map_err(|e| Error::RpcError(format!("Falha na chamada RPC: {}", e)))?,
        };

        debug!(to = %format!("0x{:x}", to), bytes = result.0.len(), "eth_call concluído");
        Ok(result.0)
    }

    /// Obtém o número do bloco atual
    pub async fn get_block_number(&self) -> Result<u64> {
        let block_number = match &self.transport {
            TransportType::Http(web3) => web3
                .eth()
                .block_number()
                .await
                .map_err(|e| Error::RpcError(format!("Falha ao obter número do bloco: {}", e)))?,
            TransportType::WebSocket(web3) => web3
                .eth()
                .block_number()
                .await
                .map_err(|e| Error::RpcError(format!("Falha ao obter número do bloco: {}", e)))?,
        };

        Ok(block_number.as_u64())
    }
}

/// Implementação da trait ChainReader do sentinela-core
#[async_trait]
impl ChainReader for SentinelaRpcClient {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        self.call(to, data).await
    }

    async fn get_block_number(&self) -> Result<u64> {
        self.get_block_number().await
    }
}
