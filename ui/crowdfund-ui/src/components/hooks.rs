//! Hooks connecting contract reads and writes to Dioxus signals.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use ethers::abi::{Detokenize, Token};
use ethers::types::Address;
use tracing::debug;

use crowdfund_abi::Method;

use crate::binding::{bind, ContractHandle, ContractKind};
use crate::chain::{ConfiguredWallet, RpcClient, Wallet};
use crate::config::AppConfig;
use crate::remote::Remote;
use crate::state::{AlertState, SharedEndpoint, SharedWallet};
use crate::sync::{RemoteField, Sink};
use crate::transaction::{self, PendingTransaction, SubmitGuard, TxOutcome};

/// A signal whose scope has been dropped refuses the write, so reads that
/// finish after their page unmounted are thrown away here.
impl<T: 'static> Sink<T> for Signal<Remote<T>> {
    fn deliver(&mut self, value: Remote<T>) -> bool {
        match self.try_write() {
            Ok(mut slot) => {
                *slot = value;
                true
            }
            Err(_) => false,
        }
    }
}

pub fn use_campaign(address: &str) -> ContractHandle<RpcClient> {
    let endpoint = use_context::<SharedEndpoint>();
    let config = use_context::<AppConfig>();
    bind(endpoint, config.network, address, ContractKind::Campaign)
}

pub fn use_factory() -> ContractHandle<RpcClient> {
    let endpoint = use_context::<SharedEndpoint>();
    let config = use_context::<AppConfig>();
    bind(
        endpoint,
        config.network,
        config.factory_address,
        ContractKind::Factory,
    )
}

pub fn use_account() -> Option<Address> {
    use_context::<SharedWallet>().active_account()
}

/// One on-chain field as a signal, fetched on mount.
pub struct ContractRead<T: 'static> {
    pub value: Signal<Remote<T>>,
    field: Rc<RemoteField<RpcClient, T, Signal<Remote<T>>>>,
}

impl<T: 'static> Clone for ContractRead<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value,
            field: Rc::clone(&self.field),
        }
    }
}

impl<T: 'static> PartialEq for ContractRead<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Detokenize + Clone + 'static> ContractRead<T> {
    pub fn get(&self) -> Remote<T> {
        self.value.read().clone()
    }

    /// Issue the read again. Not tied to the calling scope, so a modal can
    /// trigger a refresh of its parent page after it has closed itself.
    pub fn refetch(&self) {
        let field = Rc::clone(&self.field);
        spawn_forever(async move {
            field.refetch().await;
        });
    }
}

pub fn use_contract_read<T>(
    handle: &ContractHandle<RpcClient>,
    method: Method,
    params: Vec<Token>,
) -> ContractRead<T>
where
    T: Detokenize + Clone + 'static,
{
    let value = use_signal(Remote::<T>::default);
    let field = use_hook(|| Rc::new(RemoteField::new(handle.clone(), method, params, value)));
    let read = ContractRead { value, field };
    use_hook({
        let read = read.clone();
        move || read.refetch()
    });
    read
}

pub fn show_alert(mut alerts: Signal<AlertState>, message: impl Into<String>) {
    alerts.write().message = Some(message.into());
}

/// Submits writes for one control and keeps it disabled while pending.
pub struct Writer<W = ConfiguredWallet> {
    wallet: Arc<W>,
    poll_interval: Duration,
    settle_delay: Duration,
    alerts: Signal<AlertState>,
    busy: Signal<SubmitGuard>,
    status: Signal<Option<String>>,
}

impl<W> Clone for Writer<W> {
    fn clone(&self) -> Self {
        Self {
            wallet: Arc::clone(&self.wallet),
            poll_interval: self.poll_interval,
            settle_delay: self.settle_delay,
            alerts: self.alerts,
            busy: self.busy,
            status: self.status,
        }
    }
}

pub fn use_writer() -> Writer {
    let config = use_context::<AppConfig>();
    Writer {
        wallet: use_context::<SharedWallet>(),
        poll_interval: config.receipt_poll_interval,
        settle_delay: config.settle_delay,
        alerts: use_context::<Signal<AlertState>>(),
        busy: use_signal(SubmitGuard::default),
        status: use_signal(|| None::<String>),
    }
}

impl<W: Wallet + 'static> Writer<W> {
    pub fn is_pending(&self) -> bool {
        self.busy.read().is_pending()
    }

    pub fn status(&self) -> Option<String> {
        self.status.read().clone()
    }

    pub fn alert(&self, message: impl Into<String>) {
        show_alert(self.alerts, message);
    }

    /// Send `tx`. On confirmation: alert `success`, run `on_confirmed`, wait
    /// the settle delay, then run `refetch`. On failure: alert the reason and
    /// nothing else. Returns `false` when a write is already pending.
    pub fn send<F, R>(
        &self,
        tx: PendingTransaction,
        success: &'static str,
        on_confirmed: F,
        refetch: R,
    ) -> bool
    where
        F: FnOnce() + 'static,
        R: FnOnce() + 'static,
    {
        let mut busy = self.busy;
        if !busy.write().try_begin() {
            return false;
        }
        spawn_forever(self.clone().drive(tx, success, on_confirmed, refetch));
        true
    }

    async fn drive<F, R>(
        self,
        tx: PendingTransaction,
        success: &'static str,
        on_confirmed: F,
        refetch: R,
    ) where
        F: FnOnce(),
        R: FnOnce(),
    {
        let mut busy = self.busy;
        let mut status = self.status;

        let outcome =
            transaction::submit_and_confirm(&*self.wallet, tx, self.poll_interval, |hash| {
                if let Ok(mut s) = status.try_write() {
                    *s = Some(format!("Transaction sent: {hash:?}"));
                }
            })
            .await;

        if let Ok(mut guard) = busy.try_write() {
            guard.finish();
        }
        if let Ok(mut s) = status.try_write() {
            *s = None;
        }

        match &outcome {
            TxOutcome::Confirmed(receipt) => {
                debug!(hash = ?receipt.hash, "write confirmed, refetch scheduled");
                show_alert(self.alerts, success);
                on_confirmed();
            }
            TxOutcome::Failed(reason) => show_alert(self.alerts, format!("Error: {reason}")),
            TxOutcome::Pending(_) => {}
        }
        transaction::refetch_if_confirmed(&outcome, self.settle_delay, || async move { refetch() })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use ethers::types::{H256, U256};

    use super::*;
    use crate::chain::mock::{MockEndpoint, MockWallet};
    use crate::chain::TxReceipt;
    use crate::config::Network;
    use crate::forms::TierForm;

    fn Root() -> Element {
        rsx! {}
    }

    /// Run `f` inside the root scope of a fresh dom.
    fn in_root<R>(f: impl FnOnce() -> R) -> R {
        let mut dom = VirtualDom::new(Root);
        dom.rebuild_in_place();
        dom.in_runtime(|| ScopeId::ROOT.in_runtime(f))
    }

    fn add_tier() -> PendingTransaction {
        let campaign = bind(
            Arc::new(MockEndpoint::default()),
            Network {
                name: "anvil".into(),
                chain_id: 31_337,
            },
            format!("{:?}", Address::repeat_byte(0x0c)),
            ContractKind::Campaign,
        );
        let draft = TierForm {
            name: "Gold".into(),
            amount_eth: "1".into(),
        }
        .validate()
        .unwrap();
        transaction::prepare(&campaign, Method::AddTier, draft.params(), U256::zero()).unwrap()
    }

    fn writer(wallet: MockWallet) -> Writer<MockWallet> {
        Writer {
            wallet: Arc::new(wallet),
            poll_interval: Duration::from_millis(10),
            settle_delay: Duration::ZERO,
            alerts: Signal::new(AlertState::default()),
            busy: Signal::new(SubmitGuard::default()),
            status: Signal::new(None),
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_signal_sink_refuses_after_owner_dropped() {
        in_root(|| {
            let owner = UnsyncStorage::owner();
            let mut slot = with_owner(owner.clone(), || Signal::new(Remote::<u32>::Loading));

            assert!(slot.deliver(Remote::Ready(7)));
            assert_eq!(*slot.peek(), Remote::Ready(7));

            drop(owner);
            assert!(!slot.deliver(Remote::Ready(8)));
        });
    }

    #[test]
    fn test_second_send_while_pending_is_refused() {
        in_root(|| {
            let writer = writer(MockWallet::connected());
            assert!(writer.send(add_tier(), "Tier added successfully!", || {}, || {}));
            assert!(writer.busy.peek().is_pending());
            assert!(!writer.send(add_tier(), "Tier added successfully!", || {}, || {}));
        });
    }

    #[test]
    fn test_rejected_write_alerts_without_refetch() {
        in_root(|| {
            let writer = writer(MockWallet {
                reject_with: Some("User rejected the request.".into()),
                ..MockWallet::connected()
            });
            let confirmed = Rc::new(Cell::new(false));
            let refetched = Rc::new(Cell::new(false));
            let mut busy = writer.busy;
            busy.write().try_begin();

            block_on(writer.clone().drive(
                add_tier(),
                "Tier added successfully!",
                {
                    let confirmed = confirmed.clone();
                    move || confirmed.set(true)
                },
                {
                    let refetched = refetched.clone();
                    move || refetched.set(true)
                },
            ));

            assert_eq!(
                writer.alerts.peek().message.as_deref(),
                Some("Error: User rejected the request.")
            );
            assert!(!confirmed.get());
            assert!(!refetched.get());
            assert!(!writer.busy.peek().is_pending());
            assert!(writer.wallet.submitted.borrow().is_empty());
        });
    }

    #[test]
    fn test_confirmed_write_alerts_then_refetches() {
        in_root(|| {
            let wallet = MockWallet::connected();
            wallet.receipts.borrow_mut().push_back(Some(TxReceipt {
                hash: H256::repeat_byte(0x42),
                block_number: Some(3),
                success: true,
            }));
            let writer = writer(wallet);
            let confirmed = Rc::new(Cell::new(false));
            let refetched = Rc::new(Cell::new(false));

            block_on(writer.clone().drive(
                add_tier(),
                "Tier added successfully!",
                {
                    let confirmed = confirmed.clone();
                    move || confirmed.set(true)
                },
                {
                    let refetched = refetched.clone();
                    move || refetched.set(true)
                },
            ));

            assert_eq!(
                writer.alerts.peek().message.as_deref(),
                Some("Tier added successfully!")
            );
            assert!(confirmed.get() && refetched.get());
            assert_eq!(writer.status.peek().clone(), None);
            assert_eq!(writer.wallet.submitted.borrow().len(), 1);
        });
    }
}
