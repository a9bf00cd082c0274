//! Validation for the create-campaign and create-tier modals.
//!
//! Nothing is built or sent unless validation passes. Amounts are entered in
//! ETH and converted to wei here.

use ethers::abi::Token;
use ethers::types::{Address, U256};
use ethers::utils::parse_ether;

use crowdfund_abi::Tier;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Please connect your wallet first")]
    NoAccount,
    #[error("Please fill in all fields")]
    MissingField,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Campaign length must be at least one day")]
    DurationTooShort,
    #[error("Invalid campaign length: {0}")]
    InvalidDuration(String),
    #[error("Tier {0} does not exist")]
    NoSuchTier(usize),
}

/// ETH decimal string to wei; must be strictly positive.
pub fn parse_amount(input: &str) -> Result<U256, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField);
    }
    if trimmed.starts_with('-') {
        return Err(FormError::NonPositiveAmount);
    }
    let wei = parse_ether(trimmed).map_err(|_| FormError::InvalidAmount(trimmed.to_string()))?;
    if wei.is_zero() {
        return Err(FormError::NonPositiveAmount);
    }
    Ok(wei)
}

/// Whole days; a fractional part is dropped.
fn parse_days(input: &str) -> Result<u64, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField);
    }
    if trimmed.starts_with('-') {
        return Err(FormError::DurationTooShort);
    }
    let whole = trimmed.split('.').next().unwrap_or_default();
    whole
        .parse()
        .map_err(|_| FormError::InvalidDuration(trimmed.to_string()))
}

// ---------------------------------------------------------------------------
// Create campaign
// ---------------------------------------------------------------------------

/// Raw modal input.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignForm {
    pub name: String,
    pub description: String,
    pub goal_eth: String,
    pub duration_days: String,
}

impl Default for CampaignForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            goal_eth: "1".to_string(),
            duration_days: "1".to_string(),
        }
    }
}

/// Validated arguments for `createCampaign`.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignDraft {
    pub name: String,
    pub description: String,
    pub goal: U256,
    pub duration_days: u64,
}

impl CampaignForm {
    pub fn validate(&self, account: Option<Address>) -> Result<CampaignDraft, FormError> {
        if account.is_none() {
            return Err(FormError::NoAccount);
        }
        let name = self.name.trim();
        let description = self.description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(FormError::MissingField);
        }
        let goal = parse_amount(&self.goal_eth)?;
        let duration_days = parse_days(&self.duration_days)?;
        if duration_days < 1 {
            return Err(FormError::DurationTooShort);
        }
        Ok(CampaignDraft {
            name: name.to_string(),
            description: description.to_string(),
            goal,
            duration_days,
        })
    }
}

impl CampaignDraft {
    pub fn params(&self) -> Vec<Token> {
        vec![
            Token::String(self.name.clone()),
            Token::String(self.description.clone()),
            Token::Uint(self.goal),
            Token::Uint(U256::from(self.duration_days)),
        ]
    }
}

// ---------------------------------------------------------------------------
// Create tier
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierForm {
    pub name: String,
    pub amount_eth: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TierDraft {
    pub name: String,
    pub amount: U256,
}

impl TierForm {
    pub fn validate(&self) -> Result<TierDraft, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingField);
        }
        Ok(TierDraft {
            name: name.to_string(),
            amount: parse_amount(&self.amount_eth)?,
        })
    }
}

impl TierDraft {
    pub fn params(&self) -> Vec<Token> {
        vec![Token::String(self.name.clone()), Token::Uint(self.amount)]
    }
}

// ---------------------------------------------------------------------------
// Fund / remove tier
// ---------------------------------------------------------------------------

/// Arguments and attached value for `fund(index)`: the tier's own amount.
pub fn fund_tier(tiers: &[Tier], index: usize) -> Result<(Vec<Token>, U256), FormError> {
    let tier = tiers.get(index).ok_or(FormError::NoSuchTier(index))?;
    Ok((vec![Token::Uint(U256::from(index))], tier.amount))
}

pub fn remove_tier(tiers: &[Tier], index: usize) -> Result<Vec<Token>, FormError> {
    if index >= tiers.len() {
        return Err(FormError::NoSuchTier(index));
    }
    Ok(vec![Token::Uint(U256::from(index))])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Option<Address> {
        Some(Address::repeat_byte(0xaa))
    }

    fn filled() -> CampaignForm {
        CampaignForm {
            name: "Solar roof".into(),
            description: "Panels for the community hall".into(),
            goal_eth: "10".into(),
            duration_days: "30".into(),
        }
    }

    #[test]
    fn test_valid_campaign() {
        let draft = filled().validate(account()).unwrap();
        assert_eq!(draft.goal, U256::exp10(18) * 10);
        assert_eq!(draft.duration_days, 30);
        assert_eq!(draft.params().len(), 4);
    }

    #[test]
    fn test_campaign_requires_name_and_description() {
        let form = CampaignForm {
            name: "   ".into(),
            ..filled()
        };
        assert_eq!(form.validate(account()), Err(FormError::MissingField));

        let form = CampaignForm {
            description: String::new(),
            ..filled()
        };
        assert_eq!(form.validate(account()), Err(FormError::MissingField));
    }

    #[test]
    fn test_campaign_requires_account() {
        assert_eq!(filled().validate(None), Err(FormError::NoAccount));
    }

    #[test]
    fn test_campaign_numeric_rules() {
        let form = CampaignForm {
            goal_eth: "0".into(),
            ..filled()
        };
        assert_eq!(form.validate(account()), Err(FormError::NonPositiveAmount));

        let form = CampaignForm {
            goal_eth: "-1".into(),
            ..filled()
        };
        assert_eq!(form.validate(account()), Err(FormError::NonPositiveAmount));

        let form = CampaignForm {
            duration_days: "0".into(),
            ..filled()
        };
        assert_eq!(form.validate(account()), Err(FormError::DurationTooShort));
    }

    #[test]
    fn test_campaign_duration_drops_fraction() {
        let form = CampaignForm {
            duration_days: "1.5".into(),
            ..filled()
        };
        assert_eq!(form.validate(account()).unwrap().duration_days, 1);

        let form = CampaignForm {
            duration_days: "0.5".into(),
            ..filled()
        };
        assert_eq!(form.validate(account()), Err(FormError::DurationTooShort));

        let form = CampaignForm {
            duration_days: "a week".into(),
            ..filled()
        };
        assert_eq!(
            form.validate(account()),
            Err(FormError::InvalidDuration("a week".into()))
        );
    }

    #[test]
    fn test_tier_amount_in_wei() {
        let draft = TierForm {
            name: "Gold".into(),
            amount_eth: "0.25".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(draft.amount, U256::exp10(16) * 25);
    }

    #[test]
    fn test_tier_rejects_garbage_amount() {
        let form = TierForm {
            name: "Gold".into(),
            amount_eth: "lots".into(),
        };
        assert!(matches!(form.validate(), Err(FormError::InvalidAmount(_))));
        let form = TierForm {
            name: "Gold".into(),
            amount_eth: String::new(),
        };
        assert_eq!(form.validate(), Err(FormError::MissingField));
    }

    #[test]
    fn test_fund_tier_uses_tier_amount() {
        let tiers = vec![Tier {
            name: "Bronze".into(),
            amount: U256::exp10(16),
            backers: U256::zero(),
        }];
        let (params, value) = fund_tier(&tiers, 0).unwrap();
        assert_eq!(params, vec![Token::Uint(U256::zero())]);
        assert_eq!(value, U256::exp10(16));
        assert_eq!(fund_tier(&tiers, 1), Err(FormError::NoSuchTier(1)));
        assert_eq!(remove_tier(&tiers, 3), Err(FormError::NoSuchTier(3)));
    }
}
