use dioxus::prelude::*;
use ethers::types::U256;

use crowdfund_abi::{Method, Tier};

use super::hooks::{use_writer, ContractRead};
use crate::binding::ContractHandle;
use crate::chain::RpcClient;
use crate::derived::format_ether;
use crate::forms;
use crate::transaction;

/// One funding tier. Backers fund it; the owner can remove it while editing.
#[component]
pub fn TierCard(
    tier: Tier,
    index: usize,
    campaign: ContractHandle<RpcClient>,
    editing: bool,
    tiers: ContractRead<Vec<Tier>>,
    balance: ContractRead<U256>,
) -> Element {
    let writer = use_writer();
    let busy = writer.is_pending();

    let on_fund = {
        let writer = writer.clone();
        let campaign = campaign.clone();
        let tiers = tiers.clone();
        let balance = balance.clone();
        move |_| {
            let snapshot = tiers.get().into_option().unwrap_or_default();
            let built = forms::fund_tier(&snapshot, index)
                .map_err(|e| e.to_string())
                .and_then(|(params, value)| {
                    transaction::prepare(&campaign, Method::Fund, params, value)
                        .map_err(|e| e.to_string())
                });
            let tx = match built {
                Ok(tx) => tx,
                Err(msg) => {
                    writer.alert(msg);
                    return;
                }
            };
            let tiers = tiers.clone();
            let balance = balance.clone();
            writer.send(tx, "Tier funded!", || {}, move || {
                tiers.refetch();
                balance.refetch();
            });
        }
    };

    let on_remove = {
        let writer = writer.clone();
        let campaign = campaign.clone();
        let tiers = tiers.clone();
        move |_| {
            let snapshot = tiers.get().into_option().unwrap_or_default();
            let built = forms::remove_tier(&snapshot, index)
                .map_err(|e| e.to_string())
                .and_then(|params| {
                    transaction::prepare(&campaign, Method::RemoveTier, params, U256::zero())
                        .map_err(|e| e.to_string())
                });
            let tx = match built {
                Ok(tx) => tx,
                Err(msg) => {
                    writer.alert(msg);
                    return;
                }
            };
            let tiers = tiers.clone();
            writer.send(tx, "Tier removed.", || {}, move || tiers.refetch());
        }
    };

    rsx! {
        div { class: "tier-card",
            div { class: "tier-card-head",
                h5 { "{tier.name}" }
                p { class: "tier-amount", "{format_ether(tier.amount)} ETH" }
            }
            p { class: "hint", "Total Backers: {tier.backers}" }
            if let Some(status) = writer.status() {
                p { class: "success-text", "{status}" }
            }
            button {
                class: "btn btn-primary",
                disabled: busy,
                onclick: on_fund,
                if busy { "Pending..." } else { "Select" }
            }
            if editing {
                button {
                    class: "btn btn-danger",
                    disabled: busy,
                    onclick: on_remove,
                    "Remove"
                }
            }
        }
    }
}
