use dioxus::prelude::*;
use ethers::types::U256;

use crowdfund_abi::{Method, Tier};

use super::hooks::{use_writer, ContractRead};
use crate::binding::ContractHandle;
use crate::chain::RpcClient;
use crate::forms::TierForm;
use crate::state::PageState;
use crate::transaction;

#[component]
pub fn CreateTierModal(
    campaign: ContractHandle<RpcClient>,
    page: Signal<PageState>,
    tiers: ContractRead<Vec<Tier>>,
) -> Element {
    let mut page = page;
    let writer = use_writer();
    let mut tier_name = use_signal(String::new);
    let mut tier_amount = use_signal(String::new);

    let busy = writer.is_pending();
    let preview = {
        let amount = tier_amount.read();
        if amount.trim().is_empty() {
            "0".to_string()
        } else {
            amount.trim().to_string()
        }
    };

    let on_add = {
        let writer = writer.clone();
        move |_| {
            let form = TierForm {
                name: tier_name.read().clone(),
                amount_eth: tier_amount.read().clone(),
            };
            let draft = match form.validate() {
                Ok(draft) => draft,
                Err(e) => {
                    writer.alert(e.to_string());
                    return;
                }
            };
            let tx = match transaction::prepare(
                &campaign,
                Method::AddTier,
                draft.params(),
                U256::zero(),
            ) {
                Ok(tx) => tx,
                Err(e) => {
                    writer.alert(e.to_string());
                    return;
                }
            };

            let tiers = tiers.clone();
            writer.send(
                tx,
                "Tier added successfully!",
                move || {
                    let mut page = page;
                    if let Ok(mut state) = page.try_write() {
                        state.close_modal();
                    };
                },
                move || tiers.refetch(),
            );
        }
    };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                div { class: "modal-header",
                    p { class: "modal-title", "Create a Funding Tier" }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| page.write().close_modal(),
                        "Close"
                    }
                }
                div { class: "form-group",
                    label { "Tier Name:" }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Tier Name",
                        value: "{tier_name}",
                        oninput: move |e| tier_name.set(e.value()),
                    }
                }
                div { class: "form-group",
                    label { "Tier Cost (in ETH):" }
                    input {
                        class: "input",
                        r#type: "number",
                        step: "0.01",
                        min: "0",
                        placeholder: "0.25",
                        value: "{tier_amount}",
                        oninput: move |e| tier_amount.set(e.value()),
                    }
                }
                p { class: "hint", "Preview: {preview} ETH" }
                if let Some(status) = writer.status() {
                    p { class: "success-text", "{status}" }
                }
                button {
                    class: "btn btn-primary",
                    disabled: busy,
                    onclick: on_add,
                    if busy { "Adding Tier..." } else { "Add Tier" }
                }
            }
        }
    }
}
