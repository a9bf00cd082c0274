use dioxus::prelude::*;
use ethers::types::U256;
use ethers::utils::to_checksum;

use crowdfund_abi::{CampaignSummary, Method};

use super::campaign_card::CampaignCard;
use super::hooks::{use_account, use_contract_read, use_factory, use_writer, ContractRead};
use crate::binding::ContractHandle;
use crate::chain::RpcClient;
use crate::forms::CampaignForm;
use crate::remote::Remote;
use crate::state::PageState;
use crate::sync::{is_active_account, owner_params};
use crate::transaction;

/// Campaigns created by one wallet, plus the create-campaign modal.
#[component]
pub fn DashboardPage(wallet: String) -> Element {
    let factory = use_factory();
    let account = use_account();
    let mut page = use_signal(PageState::default);
    // Only the wallet's own dashboard can create campaigns.
    let own_dashboard = is_active_account(&wallet, account);

    // An unparsable wallet leaves the params empty; the read then fails and
    // the page shows the message below instead of a list.
    let params = owner_params(&wallet);
    let valid_wallet = params.is_ok();
    let my_campaigns = use_contract_read::<Vec<CampaignSummary>>(
        &factory,
        Method::Campaigns,
        params.unwrap_or_default(),
    );

    rsx! {
        div { class: "page",
            div { class: "page-header",
                h1 { "Dashboard" }
                if own_dashboard {
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| page.write().open_modal(),
                        "Create Campaign"
                    }
                }
            }
            p { class: "label", "My Campaigns:" }
            if !valid_wallet {
                p { class: "error-text", "Invalid wallet address: {wallet}" }
            } else {
                match my_campaigns.get() {
                    Remote::Ready(list) if list.is_empty() => rsx! { p { "No campaigns" } },
                    Remote::Ready(list) => {
                        let addresses: Vec<String> = list
                            .iter()
                            .map(|c| to_checksum(&c.campaign_address, None))
                            .collect();
                        rsx! {
                            div { class: "card-grid",
                                for address in addresses {
                                    CampaignCard { key: "{address}", address: address.clone() }
                                }
                            }
                        }
                    }
                    _ => rsx! {},
                }
            }

            if own_dashboard && page.read().modal_open() {
                CreateCampaignModal {
                    factory: factory.clone(),
                    page: page,
                    campaigns: my_campaigns.clone(),
                }
            }
        }
    }
}

#[component]
fn CreateCampaignModal(
    factory: ContractHandle<RpcClient>,
    page: Signal<PageState>,
    campaigns: ContractRead<Vec<CampaignSummary>>,
) -> Element {
    let mut page = page;
    let account = use_account();
    let writer = use_writer();
    let mut form = use_signal(CampaignForm::default);

    let busy = writer.is_pending();

    let on_create = {
        let writer = writer.clone();
        move |_| {
            let draft = match form.read().validate(account) {
                Ok(draft) => draft,
                Err(e) => {
                    writer.alert(e.to_string());
                    return;
                }
            };
            tracing::info!(
                name = %draft.name,
                goal = %draft.goal,
                days = draft.duration_days,
                "creating campaign through factory"
            );
            let tx = match transaction::prepare(
                &factory,
                Method::CreateCampaign,
                draft.params(),
                U256::zero(),
            ) {
                Ok(tx) => tx,
                Err(e) => {
                    writer.alert(format!("Failed to prepare transaction: {e}"));
                    return;
                }
            };

            let campaigns = campaigns.clone();
            writer.send(
                tx,
                "Campaign created successfully!",
                move || {
                    let mut page = page;
                    if let Ok(mut state) = page.try_write() {
                        state.close_modal();
                    };
                },
                move || campaigns.refetch(),
            );
        }
    };

    let values = form.read().clone();

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                div { class: "modal-header",
                    p { class: "modal-title", "Create a Campaign" }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| page.write().close_modal(),
                        "Close"
                    }
                }
                div { class: "form-group",
                    label { "Campaign Name:" }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Campaign Name",
                        value: "{values.name}",
                        oninput: move |e| form.write().name = e.value(),
                    }
                }
                div { class: "form-group",
                    label { "Campaign Description:" }
                    textarea {
                        class: "input",
                        placeholder: "Campaign Description",
                        value: "{values.description}",
                        oninput: move |e| form.write().description = e.value(),
                    }
                }
                div { class: "form-group",
                    label { "Campaign Goal (ETH):" }
                    input {
                        class: "input",
                        r#type: "number",
                        min: "1",
                        step: "0.01",
                        value: "{values.goal_eth}",
                        oninput: move |e| form.write().goal_eth = e.value(),
                    }
                }
                div { class: "form-group",
                    label { "Campaign Length (Days):" }
                    input {
                        class: "input",
                        r#type: "number",
                        min: "1",
                        value: "{values.duration_days}",
                        oninput: move |e| form.write().duration_days = e.value(),
                    }
                }
                if let Some(status) = writer.status() {
                    p { class: "success-text", "{status}" }
                }
                button {
                    class: "btn btn-primary",
                    disabled: busy,
                    onclick: on_create,
                    if busy { "Creating Campaign..." } else { "Create Campaign" }
                }
            }
        }
    }
}
