//! Presentation values computed from fetched campaign fields.
//!
//! Every function here accepts partially-loaded input (`None`) and returns a
//! defined default instead of failing.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::DateTime;
use ethers::types::U256;
use ethers::utils::format_ether as format_units_ether;

use crowdfund_abi::{STATUS_ACTIVE, STATUS_FAILED, STATUS_SUCCESSFUL};

/// Lifecycle state reported by `getCampaignStatus()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignStatus {
    Active,
    Successful,
    Failed,
    Unknown,
}

impl CampaignStatus {
    pub fn from_code(code: Option<u8>) -> Self {
        match code {
            Some(STATUS_ACTIVE) => CampaignStatus::Active,
            Some(STATUS_SUCCESSFUL) => CampaignStatus::Successful,
            Some(STATUS_FAILED) => CampaignStatus::Failed,
            _ => CampaignStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CampaignStatus::Active => "Active",
            CampaignStatus::Successful => "Successful",
            CampaignStatus::Failed => "Failed",
            CampaignStatus::Unknown => "Unknown",
        }
    }
}

pub fn status_label(code: Option<u8>) -> &'static str {
    CampaignStatus::from_code(code).label()
}

/// Share of the goal raised so far, in `[0, 100]`.
pub fn funding_percentage(balance: Option<U256>, goal: Option<U256>) -> f64 {
    let goal = match goal {
        Some(g) if !g.is_zero() => g,
        _ => return 0.0,
    };
    let balance = balance.unwrap_or_default();
    if balance >= goal {
        return 100.0;
    }
    (to_f64(balance) / to_f64(goal) * 100.0).clamp(0.0, 100.0)
}

/// Text shown on the campaign page progress bar.
pub fn progress_label(percentage: f64) -> String {
    if percentage >= 100.0 {
        "Goal Reached!".to_string()
    } else {
        format!("{percentage}%")
    }
}

/// Campaign cards show nothing once the goal is met.
pub fn card_progress_label(percentage: f64) -> String {
    if percentage >= 100.0 {
        String::new()
    } else {
        format!("{percentage}%")
    }
}

/// Whether a deadline (unix seconds) lies before `now`. Unknown deadlines
/// and deadlines beyond the representable range count as not passed.
pub fn deadline_passed(deadline: Option<U256>, now: SystemTime) -> bool {
    let Some(deadline) = deadline else {
        return false;
    };
    if deadline > U256::from(u64::MAX) {
        return false;
    }
    UNIX_EPOCH
        .checked_add(Duration::from_secs(deadline.as_u64()))
        .is_some_and(|at| at < now)
}

/// `"Mon Oct 19 2026"`, UTC.
pub fn deadline_date(deadline: Option<U256>) -> Option<String> {
    let secs = i64::try_from(deadline?).ok()?;
    let at = DateTime::from_timestamp(secs, 0)?;
    Some(at.format("%a %b %d %Y").to_string())
}

/// Wei to an ETH string without trailing zeros: `5000000000000000000` → `"5"`.
pub fn format_ether(wei: U256) -> String {
    let text = format_units_ether(wei);
    match text.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{frac}")
            }
        }
        None => text,
    }
}

fn to_f64(v: U256) -> f64 {
    v.0.iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * 18_446_744_073_709_551_616.0 + limb as f64)
}
