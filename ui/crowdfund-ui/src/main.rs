#![allow(non_snake_case)]

mod binding;
mod chain;
mod components;
mod config;
mod derived;
mod forms;
mod remote;
mod state;
mod sync;
mod transaction;

use std::sync::Arc;

use dioxus::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chain::{ConfiguredWallet, RpcClient, Wallet};
use config::AppConfig;
use state::{AlertState, SharedEndpoint, SharedWallet};

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[layout(Layout)]
    #[route("/")]
    Home {},
    #[route("/campaign/:address")]
    Campaign { address: String },
    #[route("/dashboard/:wallet")]
    Dashboard { wallet: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crowdfund=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let endpoint = match RpcClient::new(&config.rpc_url) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            error!("cannot create RPC client: {e}");
            std::process::exit(2);
        }
    };

    let wallet = match ConfiguredWallet::new(
        &endpoint,
        config.wallet_key.as_deref(),
        config.network.chain_id,
    ) {
        Ok(wallet) => wallet,
        Err(e) => {
            error!("cannot load wallet: {e}");
            std::process::exit(2);
        }
    };

    info!(
        network = %config.network.name,
        chain_id = config.network.chain_id,
        factory = %config.factory_address,
        wallet = wallet.active_account().is_some(),
        "starting crowdfund UI"
    );

    let endpoint: SharedEndpoint = Arc::new(endpoint);
    let wallet: SharedWallet = Arc::new(wallet);

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .with_context(endpoint)
        .with_context(wallet)
        .launch(App);
}

#[component]
fn App() -> Element {
    // Alerts outlive the modals that raise them.
    use_context_provider(|| Signal::new(AlertState::default()));

    rsx! {
        Router::<Route> {}
    }
}

// ---------------------------------------------------------------------------
// Layout: sidebar + content
// ---------------------------------------------------------------------------

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app-container",
            components::layout::Sidebar {}
            div { class: "main-panel",
                components::layout::TopBar {}
                div { class: "main-content",
                    Outlet::<Route> {}
                }
            }
            components::alert::AlertDialog {}
        }
    }
}

// ---------------------------------------------------------------------------
// Route components: thin wrappers around the page components
// ---------------------------------------------------------------------------

#[component]
fn Home() -> Element {
    rsx! { components::campaign_list::CampaignListPage {} }
}

#[component]
fn Campaign(address: String) -> Element {
    // Keyed so a new address remounts the page and rebinds its reads.
    rsx! {
        components::campaign_page::CampaignPage { key: "{address}", address: address.clone() }
    }
}

#[component]
fn Dashboard(wallet: String) -> Element {
    rsx! {
        components::dashboard::DashboardPage { key: "{wallet}", wallet: wallet.clone() }
    }
}
