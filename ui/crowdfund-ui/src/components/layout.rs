use dioxus::prelude::*;
use ethers::utils::to_checksum;

use super::hooks::use_account;
use crate::chain::short_address;
use crate::config::AppConfig;
use crate::Route;

#[component]
pub fn Sidebar() -> Element {
    let account = use_account();
    let config = use_context::<AppConfig>();

    rsx! {
        nav { class: "sidebar",
            div { class: "sidebar-brand",
                span { class: "brand-text", "Crowdfund" }
            }
            div { class: "sidebar-nav",
                NavLink { to: Route::Home {}, label: "Campaigns" }
                if let Some(addr) = account {
                    NavLink {
                        to: Route::Dashboard { wallet: to_checksum(&addr, None) },
                        label: "Dashboard",
                    }
                }
            }
            div { class: "sidebar-footer",
                span { class: "sidebar-footer-text", "{config.network.name}" }
            }
        }
    }
}

#[component]
pub fn TopBar() -> Element {
    let account = use_account();

    let label = match account {
        Some(addr) => short_address(&to_checksum(&addr, None)),
        None => "No wallet configured".to_string(),
    };

    rsx! {
        header { class: "topbar",
            div { class: "topbar-right",
                span { class: if account.is_some() { "dot connected" } else { "dot disconnected" } }
                span { class: "topbar-value mono", "{label}" }
            }
        }
    }
}

#[component]
fn NavLink(to: Route, label: &'static str) -> Element {
    rsx! {
        Link { class: "nav-link", to: to,
            span { "{label}" }
        }
    }
}
