//! Read synchronization: every on-chain field is an independent view call
//! whose result lands in a [`Remote`] slot.
//!
//! There is no retry, no timeout and no generation counter. Refetching a
//! field replaces whatever its slot holds with the result of the read that
//! completes *last*, so a slow stale response can overwrite a newer one.
//! Results for slots whose owner has gone away are dropped.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Weak;

use ethers::abi::{Detokenize, Token};
use ethers::types::Address;
use tracing::{debug, warn};

use crowdfund_abi::Method;

use crate::binding::ContractHandle;
use crate::chain::{ChainError, Endpoint};
use crate::remote::Remote;

/// Destination of a completed read.
pub trait Sink<T> {
    /// Store `value`; `false` means the owner is gone and the value was
    /// discarded.
    fn deliver(&mut self, value: Remote<T>) -> bool;
}

impl<T> Sink<T> for Weak<RefCell<Remote<T>>> {
    fn deliver(&mut self, value: Remote<T>) -> bool {
        match self.upgrade() {
            Some(slot) => {
                *slot.borrow_mut() = value;
                true
            }
            None => false,
        }
    }
}

/// One view call, decoded.
pub async fn read<C, T>(handle: &ContractHandle<C>, method: Method, params: &[Token]) -> Remote<T>
where
    C: Endpoint,
    T: Detokenize,
{
    let result = async {
        let raw = handle.call_raw(method, params).await?;
        Ok::<T, ChainError>(method.decode_output(&raw)?)
    }
    .await;

    if let Err(e) = &result {
        warn!(
            contract = handle.address(),
            method = method.signature(),
            error = %e,
            "read failed"
        );
    }
    result.into()
}

/// A (handle, method, params) triple bound to the slot it fills.
pub struct RemoteField<C, T, S> {
    handle: ContractHandle<C>,
    method: Method,
    params: Vec<Token>,
    sink: S,
    _value: PhantomData<fn() -> T>,
}

impl<C, T, S> RemoteField<C, T, S>
where
    C: Endpoint,
    T: Detokenize,
    S: Sink<T> + Clone,
{
    pub fn new(handle: ContractHandle<C>, method: Method, params: Vec<Token>, sink: S) -> Self {
        Self {
            handle,
            method,
            params,
            sink,
            _value: PhantomData,
        }
    }

    /// Issue the read and deliver its result. The slot keeps its current
    /// value until the read completes. Returns whether the result was kept.
    pub async fn refetch(&self) -> bool {
        let mut sink = self.sink.clone();
        let value = read::<C, T>(&self.handle, self.method, &self.params).await;
        let kept = sink.deliver(value);
        if !kept {
            debug!(
                contract = self.handle.address(),
                method = self.method.signature(),
                "owner gone, read discarded"
            );
        }
        kept
    }
}

fn parse_owner(owner: &str) -> Result<Address, ChainError> {
    owner
        .trim()
        .parse()
        .map_err(|_| ChainError::InvalidAddress(owner.to_string()))
}

/// Arguments for `getCampaigns(address)`.
pub fn owner_params(owner: &str) -> Result<Vec<Token>, ChainError> {
    Ok(vec![Token::Address(parse_owner(owner)?)])
}

/// Whether a wallet taken from a route is the active account.
pub fn is_active_account(wallet: &str, account: Option<Address>) -> bool {
    matches!((parse_owner(wallet), account), (Ok(wallet), Some(account)) if wallet == account)
}
