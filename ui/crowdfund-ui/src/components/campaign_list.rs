use dioxus::prelude::*;
use ethers::utils::to_checksum;

use crowdfund_abi::{CampaignSummary, Method};

use super::campaign_card::CampaignCard;
use super::hooks::{use_contract_read, use_factory};
use crate::remote::Remote;

#[component]
pub fn CampaignListPage() -> Element {
    let factory = use_factory();
    let campaigns =
        use_contract_read::<Vec<CampaignSummary>>(&factory, Method::AllCampaigns, Vec::new());

    rsx! {
        div { class: "page",
            h1 { "Campaigns:" }
            match campaigns.get() {
                Remote::Ready(list) if list.is_empty() => rsx! {
                    p { class: "hint", "No campaigns found." }
                },
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
                // Failed reads keep the placeholder up.
                other => rsx! {
                    p { class: "hint", title: other.error().unwrap_or_default(), "Loading campaigns..." }
                },
            }
        }
    }
}
