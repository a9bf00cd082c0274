//! Binding a deployed contract instance to a typed handle.

use std::fmt;
use std::sync::Arc;

use ethers::abi::Token;
use ethers::types::{Address, Bytes};
use tracing::debug;

use crowdfund_abi::Method;

use crate::chain::{ChainError, Endpoint};
use crate::config::Network;

/// Which ABI a handle speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractKind {
    Campaign,
    Factory,
}

impl ContractKind {
    pub fn methods(self) -> &'static [Method] {
        match self {
            ContractKind::Campaign => Method::CAMPAIGN,
            ContractKind::Factory => Method::FACTORY,
        }
    }
}

/// Client + network + address of one deployed contract.
///
/// The address is kept as given; it is only parsed when a call is made.
pub struct ContractHandle<C> {
    client: Arc<C>,
    network: Network,
    address: String,
    kind: ContractKind,
}

/// Never fails and performs no I/O.
pub fn bind<C>(
    client: Arc<C>,
    network: Network,
    address: impl Into<String>,
    kind: ContractKind,
) -> ContractHandle<C> {
    ContractHandle {
        client,
        network,
        address: address.into(),
        kind,
    }
}

impl<C> ContractHandle<C> {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn methods(&self) -> &'static [Method] {
        self.kind.methods()
    }

    pub fn supports(&self, method: Method) -> bool {
        self.methods().contains(&method)
    }

    pub fn parsed_address(&self) -> Result<Address, ChainError> {
        self.address
            .trim()
            .parse()
            .map_err(|_| ChainError::InvalidAddress(self.address.clone()))
    }

    /// Resolve the target address and check `method` belongs to this contract.
    pub fn target(&self, method: Method) -> Result<Address, ChainError> {
        if !self.supports(method) {
            return Err(ChainError::UnsupportedMethod {
                method: method.signature(),
            });
        }
        self.parsed_address()
    }
}

impl<C: Endpoint> ContractHandle<C> {
    /// Raw view call: encode, `eth_call`, return the undecoded bytes.
    pub async fn call_raw(&self, method: Method, params: &[Token]) -> Result<Bytes, ChainError> {
        let to = self.target(method)?;
        let data = method.encode_call(params)?;
        debug!(
            contract = %self.address,
            network = %self.network.name,
            method = method.declaration(),
            "eth_call"
        );
        self.client.call(to, data).await
    }
}

impl<C> Clone for ContractHandle<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            network: self.network.clone(),
            address: self.address.clone(),
            kind: self.kind,
        }
    }
}

impl<C> PartialEq for ContractHandle<C> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.client, &other.client)
            && self.network == other.network
            && self.address == other.address
            && self.kind == other.kind
    }
}

impl<C> fmt::Debug for ContractHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("network", &self.network.name)
            .field("address", &self.address)
            .field("kind", &self.kind)
            .finish()
    }
}
