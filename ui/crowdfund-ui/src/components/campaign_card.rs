use dioxus::prelude::*;
use ethers::types::U256;

use crowdfund_abi::Method;

use super::hooks::{use_campaign, use_contract_read};
use crate::derived::{card_progress_label, format_ether, funding_percentage};
use crate::Route;

/// Summary card linking to a campaign page. Reads its own fields.
#[component]
pub fn CampaignCard(address: String) -> Element {
    let campaign = use_campaign(&address);
    let name = use_contract_read::<String>(&campaign, Method::Name, Vec::new());
    let description = use_contract_read::<String>(&campaign, Method::Description, Vec::new());
    let goal = use_contract_read::<U256>(&campaign, Method::Goal, Vec::new());
    let balance = use_contract_read::<U256>(&campaign, Method::ContractBalance, Vec::new());

    let goal = goal.get();
    let balance = balance.get();
    let amounts_loaded = !goal.is_loading() && !balance.is_loading();
    let percentage = funding_percentage(balance.cloned(), goal.cloned());
    let raised = format_ether(balance.cloned().unwrap_or_default());
    let name = name.get().into_option().unwrap_or_default();
    let description = description.get().into_option().unwrap_or_default();

    rsx! {
        div { class: "campaign-card",
            if amounts_loaded {
                div { class: "progress",
                    div { class: "progress-fill", style: "width: {percentage}%" }
                    div { class: "progress-labels",
                        span { "{raised} ETH" }
                        span { "{card_progress_label(percentage)}" }
                    }
                }
            }
            h5 { class: "card-title", "{name}" }
            p { class: "card-desc", "{description}" }
            Link { class: "btn btn-primary", to: Route::Campaign { address: address.clone() },
                "View Campaign"
            }
        }
    }
}
