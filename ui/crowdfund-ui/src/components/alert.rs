use dioxus::prelude::*;

use crate::state::AlertState;

/// Blocking alert: covers the app until dismissed.
#[component]
pub fn AlertDialog() -> Element {
    let mut alerts = use_context::<Signal<AlertState>>();
    let message = alerts.read().message.clone();

    rsx! {
        if let Some(msg) = message {
            div { class: "modal-backdrop",
                div { class: "modal alert",
                    p { class: "alert-text", "{msg}" }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| alerts.write().message = None,
                        "OK"
                    }
                }
            }
        }
    }
}
