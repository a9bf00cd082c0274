pub mod alert;
pub mod campaign_card;
pub mod campaign_list;
pub mod campaign_page;
pub mod create_tier_modal;
pub mod dashboard;
pub mod hooks;
pub mod layout;
pub mod tier_card;
