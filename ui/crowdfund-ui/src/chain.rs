//! Endpoint client and wallet provider.
//!
//! Two seams: [`Endpoint`] answers view calls (`eth_call`), [`Wallet`] signs
//! and broadcasts transactions and reports receipts. The ethers-backed
//! implementations are what the app runs with; tests substitute in-memory
//! ones.

use std::future::Future;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256, U256};
use tracing::debug;

use crowdfund_abi::AbiError;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("{method} is not available on this contract")]
    UnsupportedMethod { method: &'static str },
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("{0}")]
    Decode(String),
    /// Signing declined or the node refused the transaction. Carries the raw
    /// reason so it can be shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("transaction reverted")]
    Reverted,
    #[error("Please connect your wallet first")]
    NoAccount,
    #[error("wallet error: {0}")]
    Wallet(String),
}

impl From<AbiError> for ChainError {
    fn from(e: AbiError) -> Self {
        Self::Decode(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// A node that answers view calls.
pub trait Endpoint {
    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = Result<Bytes, ChainError>>;
}

/// Everything needed to broadcast one contract write.
#[derive(Clone, Debug, PartialEq)]
pub struct TxRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// The part of a receipt the UI cares about.
#[derive(Clone, Debug, PartialEq)]
pub struct TxReceipt {
    pub hash: H256,
    pub block_number: Option<u64>,
    pub success: bool,
}

impl From<TransactionReceipt> for TxReceipt {
    fn from(r: TransactionReceipt) -> Self {
        Self {
            hash: r.transaction_hash,
            block_number: r.block_number.map(|n| n.as_u64()),
            // Pre-Byzantium receipts carry no status; treat them as success.
            success: r.status.map_or(true, |s| s.as_u64() == 1),
        }
    }
}

/// Signer/broadcaster holding the currently active account.
pub trait Wallet {
    fn active_account(&self) -> Option<Address>;

    fn submit(&self, request: TxRequest) -> impl Future<Output = Result<H256, ChainError>>;

    /// `Ok(None)` while the transaction is not yet mined.
    fn receipt(&self, hash: H256) -> impl Future<Output = Result<Option<TxReceipt>, ChainError>>;
}

// ---------------------------------------------------------------------------
// JSON-RPC endpoint
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RpcClient {
    provider: Provider<Http>,
}

impl RpcClient {
    pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainError::Rpc(format!("{rpc_url}: {e}")))?;
        Ok(Self { provider })
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }
}

impl Endpoint for RpcClient {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        self.provider
            .call(&tx, None)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Wallet provider
// ---------------------------------------------------------------------------

/// Local private-key signer on top of the RPC provider.
#[derive(Clone, Debug)]
pub struct KeyWallet {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
}

impl KeyWallet {
    pub fn new(endpoint: &RpcClient, private_key: &str, chain_id: u64) -> Result<Self, ChainError> {
        let signer = private_key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| ChainError::Wallet(e.to_string()))?
            .with_chain_id(chain_id);
        Ok(Self {
            client: SignerMiddleware::new(endpoint.provider().clone(), signer),
        })
    }

    pub fn address(&self) -> Address {
        self.client.signer().address()
    }
}

/// The wallet the app was configured with. No key means no active account,
/// and every write fails before anything is signed.
#[derive(Clone, Debug, Default)]
pub struct ConfiguredWallet {
    inner: Option<KeyWallet>,
}

impl ConfiguredWallet {
    pub fn new(endpoint: &RpcClient, key: Option<&str>, chain_id: u64) -> Result<Self, ChainError> {
        let inner = key
            .map(|k| KeyWallet::new(endpoint, k, chain_id))
            .transpose()?;
        Ok(Self { inner })
    }

    fn connected(&self) -> Result<&KeyWallet, ChainError> {
        self.inner.as_ref().ok_or(ChainError::NoAccount)
    }
}

impl Wallet for ConfiguredWallet {
    fn active_account(&self) -> Option<Address> {
        self.inner.as_ref().map(KeyWallet::address)
    }

    async fn submit(&self, request: TxRequest) -> Result<H256, ChainError> {
        let wallet = self.connected()?;
        let tx: TypedTransaction = TransactionRequest::new()
            .from(wallet.address())
            .to(request.to)
            .data(request.data)
            .value(request.value)
            .into();
        let pending = wallet
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| ChainError::Rejected(e.to_string()))?;
        let hash = pending.tx_hash();
        debug!(?hash, "transaction broadcast");
        Ok(hash)
    }

    async fn receipt(&self, hash: H256) -> Result<Option<TxReceipt>, ChainError> {
        let wallet = self.connected()?;
        let receipt = wallet
            .client
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        Ok(receipt.map(TxReceipt::from))
    }
}

/// Shortened `0x1234...abcd` form for labels.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        address.to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U64;

    #[test]
    fn test_receipt_status_mapping() {
        let mut raw = TransactionReceipt {
            transaction_hash: H256::repeat_byte(1),
            block_number: Some(U64::from(7)),
            status: Some(U64::from(0)),
            ..Default::default()
        };
        let receipt = TxReceipt::from(raw.clone());
        assert!(!receipt.success);
        assert_eq!(receipt.block_number, Some(7));

        raw.status = Some(U64::from(1));
        assert!(TxReceipt::from(raw.clone()).success);

        raw.status = None;
        assert!(TxReceipt::from(raw).success);
    }

    #[test]
    fn test_unconfigured_wallet_has_no_account() {
        let endpoint = RpcClient::new("http://127.0.0.1:8545").unwrap();
        let wallet = ConfiguredWallet::new(&endpoint, None, 31_337).unwrap();
        assert_eq!(wallet.active_account(), None);
    }

    #[test]
    fn test_key_wallet_address() {
        // First default anvil/hardhat account.
        let endpoint = RpcClient::new("http://127.0.0.1:8545").unwrap();
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let wallet = ConfiguredWallet::new(&endpoint, Some(key), 31_337).unwrap();
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(wallet.active_account(), Some(expected));
    }

    #[test]
    fn test_bad_key_is_a_wallet_error() {
        let endpoint = RpcClient::new("http://127.0.0.1:8545").unwrap();
        let err = ConfiguredWallet::new(&endpoint, Some("not-a-key"), 1).unwrap_err();
        assert!(matches!(err, ChainError::Wallet(_)));
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            "0xf39F...2266"
        );
        assert_eq!(short_address("0x1234"), "0x1234");
    }

    #[test]
    fn test_short_address_splits_on_characters() {
        assert_eq!(short_address("äöüäöüäöüäöüäöü"), "äöüäöü...öüäö");
    }
}
