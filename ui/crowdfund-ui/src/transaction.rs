//! Contract writes: build a transaction from a method and its arguments,
//! hand it to the wallet, and follow it to a terminal outcome.
//!
//! The write path never re-reads anything itself. Callers that depend on the
//! written state use [`settle_then`] once the outcome is `Confirmed`.

use std::future::Future;
use std::time::Duration;

use ethers::abi::Token;
use ethers::types::{Bytes, H256, U256};
use tracing::{info, warn};

use crowdfund_abi::{AbiError, Method};

use crate::binding::ContractHandle;
use crate::chain::{ChainError, TxReceipt, TxRequest, Wallet};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TxError {
    #[error("{0} is a view method and cannot be sent as a transaction")]
    ViewMethod(&'static str),
    #[error("{0} does not accept a value")]
    NotPayable(&'static str),
    #[error("{0}")]
    Encode(String),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl From<AbiError> for TxError {
    fn from(e: AbiError) -> Self {
        Self::Encode(e.to_string())
    }
}

/// A write that has been built but not yet sent. Consumed by [`submit`].
#[derive(Clone, Debug, PartialEq)]
pub struct PendingTransaction {
    pub method: Method,
    pub params: Vec<Token>,
    request: TxRequest,
}

impl PendingTransaction {
    pub fn request(&self) -> &TxRequest {
        &self.request
    }
}

/// Where a submission ended up.
#[derive(Clone, Debug, PartialEq)]
pub enum TxOutcome {
    /// Broadcast, awaiting inclusion.
    Pending(H256),
    Confirmed(TxReceipt),
    /// Reason is shown to the user as-is.
    Failed(String),
}

/// Encode a write. No I/O.
pub fn prepare<C>(
    handle: &ContractHandle<C>,
    method: Method,
    params: Vec<Token>,
    value: U256,
) -> Result<PendingTransaction, TxError> {
    if method.is_view() {
        return Err(TxError::ViewMethod(method.signature()));
    }
    if !value.is_zero() && !method.is_payable() {
        return Err(TxError::NotPayable(method.signature()));
    }
    let to = handle.target(method)?;
    let data: Bytes = method.encode_call(&params)?;
    Ok(PendingTransaction {
        method,
        params,
        request: TxRequest { to, data, value },
    })
}

/// Hand the transaction to the wallet. Returns `Pending` or `Failed`.
pub async fn submit<W: Wallet>(wallet: &W, tx: PendingTransaction) -> TxOutcome {
    if wallet.active_account().is_none() {
        return TxOutcome::Failed(ChainError::NoAccount.to_string());
    }
    let request = tx.request();
    info!(
        method = tx.method.declaration(),
        args = tx.params.len(),
        to = ?request.to,
        value = %request.value,
        "submitting transaction"
    );
    match wallet.submit(tx.request).await {
        Ok(hash) => TxOutcome::Pending(hash),
        Err(e) => {
            warn!(method = tx.method.signature(), error = %e, "transaction rejected");
            TxOutcome::Failed(e.to_string())
        }
    }
}

/// Poll for a receipt until the transaction is mined. No upper bound on the
/// number of polls.
pub async fn confirm<W: Wallet>(wallet: &W, hash: H256, poll_interval: Duration) -> TxOutcome {
    loop {
        tokio::time::sleep(poll_interval).await;

        match wallet.receipt(hash).await {
            Ok(Some(receipt)) if receipt.success => {
                info!(?hash, block = ?receipt.block_number, "transaction confirmed");
                return TxOutcome::Confirmed(receipt);
            }
            Ok(Some(_)) => {
                warn!(?hash, "transaction reverted");
                return TxOutcome::Failed(ChainError::Reverted.to_string());
            }
            Ok(None) => continue,
            Err(e) => return TxOutcome::Failed(e.to_string()),
        }
    }
}

/// `submit` followed by `confirm` when the submission was accepted.
/// `on_pending` sees the hash once the wallet has broadcast it.
pub async fn submit_and_confirm<W, P>(
    wallet: &W,
    tx: PendingTransaction,
    poll_interval: Duration,
    on_pending: P,
) -> TxOutcome
where
    W: Wallet,
    P: FnOnce(H256),
{
    match submit(wallet, tx).await {
        TxOutcome::Pending(hash) => {
            on_pending(hash);
            confirm(wallet, hash, poll_interval).await
        }
        terminal => terminal,
    }
}

/// Wait out the remote indexing lag, then run the caller's re-fetch. Nothing
/// guarantees the re-read will see the write.
pub async fn settle_then<F, R>(delay: Duration, refetch: F) -> R
where
    F: FnOnce() -> R,
{
    tokio::time::sleep(delay).await;
    refetch()
}

/// Re-fetch after the settle delay, but only for a confirmed write.
pub async fn refetch_if_confirmed<F, Fut>(outcome: &TxOutcome, delay: Duration, refetch: F) -> bool
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    match outcome {
        TxOutcome::Confirmed(_) => {
            settle_then(delay, refetch).await.await;
            true
        }
        _ => false,
    }
}

/// "Disable the button while a write is pending": the only guard against
/// duplicate submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmitGuard {
    pending: bool,
}

impl SubmitGuard {
    /// `false` if a submission is already in flight.
    pub fn try_begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn finish(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use ethers::types::Address;

    use super::*;
    use crate::binding::{bind, ContractKind};
    use crate::chain::mock::{MockEndpoint, MockWallet};
    use crate::config::Network;
    use crate::forms::{CampaignForm, TierForm};

    fn handle(kind: ContractKind) -> ContractHandle<MockEndpoint> {
        bind(
            Arc::new(MockEndpoint::default()),
            Network {
                name: "anvil".into(),
                chain_id: 31_337,
            },
            format!("{:?}", Address::repeat_byte(0x0c)),
            kind,
        )
    }

    fn add_tier() -> PendingTransaction {
        let draft = TierForm {
            name: "Gold".into(),
            amount_eth: "1".into(),
        }
        .validate()
        .unwrap();
        prepare(
            &handle(ContractKind::Campaign),
            Method::AddTier,
            draft.params(),
            U256::zero(),
        )
        .unwrap()
    }

    fn mined(success: bool) -> Option<TxReceipt> {
        Some(TxReceipt {
            hash: H256::repeat_byte(0x42),
            block_number: Some(12),
            success,
        })
    }

    #[test]
    fn test_prepare_encodes_calldata() {
        let tx = add_tier();
        assert_eq!(&tx.request().data[..4], &Method::AddTier.selector());
        assert_eq!(tx.request().to, Address::repeat_byte(0x0c));
        assert!(tx.request().value.is_zero());
    }

    #[test]
    fn test_prepare_refuses_views_and_stray_value() {
        let campaign = handle(ContractKind::Campaign);
        assert_eq!(
            prepare(&campaign, Method::Goal, Vec::new(), U256::zero()),
            Err(TxError::ViewMethod("goal()"))
        );
        let err = prepare(
            &campaign,
            Method::RemoveTier,
            vec![Token::Uint(U256::zero())],
            U256::one(),
        )
        .unwrap_err();
        assert_eq!(err, TxError::NotPayable("removeTier(uint256)"));
    }

    #[test]
    fn test_prepare_checks_contract_kind() {
        let factory = handle(ContractKind::Factory);
        let err = prepare(
            &factory,
            Method::AddTier,
            vec![Token::String("x".into()), Token::Uint(U256::one())],
            U256::zero(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TxError::Chain(ChainError::UnsupportedMethod { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_write_triggers_refetch_after_settle_delay() {
        let wallet = MockWallet::connected();
        wallet.receipts.borrow_mut().extend([None, None, mined(true)]);

        let seen = Cell::new(None);
        let outcome = submit_and_confirm(&wallet, add_tier(), Duration::from_secs(1), |hash| {
            seen.set(Some(hash))
        })
        .await;
        assert!(matches!(outcome, TxOutcome::Confirmed(ref r) if r.block_number == Some(12)));
        assert!(seen.get().is_some());
        assert_eq!(wallet.submitted.borrow().len(), 1);

        let refetched = Cell::new(false);
        let started = tokio::time::Instant::now();
        let ran = refetch_if_confirmed(&outcome, Duration::from_secs(3), || async {
            refetched.set(true);
        })
        .await;
        assert!(ran && refetched.get());
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_write_surfaces_reason_without_refetch() {
        let wallet = MockWallet {
            reject_with: Some("User rejected the request.".into()),
            ..MockWallet::connected()
        };
        let outcome =
            submit_and_confirm(&wallet, add_tier(), Duration::from_secs(1), |_| {
                panic!("a rejected write has no hash")
            })
            .await;
        assert_eq!(outcome, TxOutcome::Failed("User rejected the request.".into()));

        let refetched = Cell::new(false);
        let ran = refetch_if_confirmed(&outcome, Duration::from_secs(3), || async {
            refetched.set(true);
        })
        .await;
        assert!(!ran && !refetched.get());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_write_fails() {
        let wallet = MockWallet::connected();
        wallet.receipts.borrow_mut().push_back(mined(false));
        let outcome =
            submit_and_confirm(&wallet, add_tier(), Duration::from_millis(10), |_| {}).await;
        assert_eq!(outcome, TxOutcome::Failed("transaction reverted".into()));
    }

    #[tokio::test]
    async fn test_no_account_fails_before_wallet_is_touched() {
        let wallet = MockWallet::default();
        let outcome = submit(&wallet, add_tier()).await;
        assert_eq!(
            outcome,
            TxOutcome::Failed("Please connect your wallet first".into())
        );
        assert!(wallet.submitted.borrow().is_empty());
    }

    #[test]
    fn test_empty_campaign_name_never_builds_a_transaction() {
        let wallet = MockWallet::connected();
        let form = CampaignForm {
            name: String::new(),
            description: "Panels".into(),
            ..CampaignForm::default()
        };
        let built = form
            .validate(wallet.active_account())
            .map(|draft| {
                prepare(
                    &handle(ContractKind::Factory),
                    Method::CreateCampaign,
                    draft.params(),
                    U256::zero(),
                )
            });
        assert!(built.is_err());
        assert!(wallet.submitted.borrow().is_empty());
    }

    #[test]
    fn test_submit_guard_blocks_duplicates() {
        let mut guard = SubmitGuard::default();
        assert!(guard.try_begin());
        assert!(guard.is_pending());
        assert!(!guard.try_begin());
        guard.finish();
        assert!(guard.try_begin());
    }
}
