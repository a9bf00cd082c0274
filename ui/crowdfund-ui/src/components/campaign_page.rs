use std::time::SystemTime;

use dioxus::prelude::*;
use ethers::types::{Address, U256};

use crowdfund_abi::{Method, Tier};

use super::create_tier_modal::CreateTierModal;
use super::hooks::{use_account, use_campaign, use_contract_read};
use super::tier_card::TierCard;
use crate::derived::{
    deadline_date, deadline_passed, format_ether, funding_percentage, progress_label, status_label,
};
use crate::state::PageState;

#[component]
pub fn CampaignPage(address: String) -> Element {
    let account = use_account();
    let campaign = use_campaign(&address);
    let mut page = use_signal(PageState::default);

    let name = use_contract_read::<String>(&campaign, Method::Name, Vec::new());
    let description = use_contract_read::<String>(&campaign, Method::Description, Vec::new());
    let deadline = use_contract_read::<U256>(&campaign, Method::Deadline, Vec::new());
    let goal = use_contract_read::<U256>(&campaign, Method::Goal, Vec::new());
    let balance = use_contract_read::<U256>(&campaign, Method::ContractBalance, Vec::new());
    let tiers = use_contract_read::<Vec<Tier>>(&campaign, Method::Tiers, Vec::new());
    let owner = use_contract_read::<Address>(&campaign, Method::Owner, Vec::new());
    let status = use_contract_read::<u8>(&campaign, Method::CampaignStatus, Vec::new());

    let is_owner = match (owner.get().into_option(), account) {
        (Some(owner), Some(account)) => owner == account,
        _ => false,
    };
    let state = *page.read();

    let deadline_value = deadline.get().into_option();
    let goal_value = goal.get().into_option();
    let balance_value = balance.get().into_option();
    let percentage = funding_percentage(balance_value, goal_value);
    let passed = deadline_passed(deadline_value, SystemTime::now());
    let tier_list = tiers.get().into_option().unwrap_or_default();

    rsx! {
        div { class: "page",
            div { class: "page-header",
                if let Some(name) = name.get().into_option() {
                    h1 { "{name}" }
                }
                if is_owner {
                    div { class: "owner-controls",
                        if state.is_editing() {
                            p { class: "status-chip",
                                "Status: {status_label(status.get().into_option())}"
                            }
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| page.write().toggle_edit(is_owner),
                            if state.is_editing() { "Done" } else { "Edit" }
                        }
                    }
                }
            }

            div { class: "section",
                p { class: "label", "Description:" }
                p { "{description.get().into_option().unwrap_or_default()}" }
            }

            div { class: "section",
                p { class: "label", "Goal:" }
                match goal_value {
                    Some(goal) => rsx! { p { "{format_ether(goal)} ETH" } },
                    None => rsx! { p { class: "hint", "Loading goal..." } },
                }
            }

            div { class: "section",
                p { class: "label", "Deadline:" }
                match deadline_date(deadline_value) {
                    Some(date) => rsx! {
                        p { "{date}" }
                        if passed {
                            p { class: "error-text", "Deadline has passed" }
                        }
                    },
                    None => rsx! { p { class: "hint", "Loading deadline..." } },
                }
            }

            if let (Some(raised), Some(goal)) = (balance_value, goal_value) {
                div { class: "section",
                    div { class: "progress",
                        div { class: "progress-fill", style: "width: {percentage}%" }
                        div { class: "progress-labels",
                            span { "{format_ether(raised)} ETH" }
                            span { "{progress_label(percentage)}" }
                        }
                    }
                    p { class: "hint",
                        "{format_ether(raised)} ETH raised of {format_ether(goal)} ETH goal"
                    }
                }
            }

            div { class: "section",
                p { class: "label", "Tiers:" }
                div { class: "card-grid",
                    if tier_list.is_empty() {
                        if !state.is_editing() {
                            p { "No tiers available for this campaign." }
                        }
                    } else {
                        for (index, tier) in tier_list.iter().cloned().enumerate() {
                            TierCard {
                                key: "{index}-{tier.name}",
                                tier: tier,
                                index: index,
                                campaign: campaign.clone(),
                                editing: state.is_editing(),
                                tiers: tiers.clone(),
                                balance: balance.clone(),
                            }
                        }
                    }
                    if state.is_editing() {
                        button {
                            class: "tier-card tier-card-add",
                            onclick: move |_| page.write().open_modal(),
                            "+ Add Tier"
                        }
                    }
                }
            }

            if state.modal_open() {
                CreateTierModal {
                    campaign: campaign.clone(),
                    page: page,
                    tiers: tiers.clone(),
                }
            }
        }
    }
}
