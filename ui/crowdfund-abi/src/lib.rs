//! Raw ABI for the crowdfunding factory and campaign contracts.
//!
//! Every method the UI talks to is listed in [`Method`] together with its
//! canonical signature, its argument and return types, and whether it is a
//! view call. Nothing here performs I/O; the UI crate feeds the calldata
//! produced here to an endpoint and hands the raw return bytes back for
//! decoding.

use ethers_core::abi::{
    self, Detokenize, InvalidOutputType, ParamType, Token, Tokenizable, TokenizableItem,
};
use ethers_core::types::{Address, Bytes, Selector, U256};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

// getCampaignStatus() return codes
pub const STATUS_ACTIVE: u8 = 0;
pub const STATUS_SUCCESSFUL: u8 = 1;
pub const STATUS_FAILED: u8 = 2;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("{method}: expected {expected} argument(s), got {got}")]
    Arity {
        method: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{method}: argument {index} has the wrong type")]
    ArgumentType { method: &'static str, index: usize },
    #[error("{method}: cannot decode return data: {reason}")]
    Decode { method: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Method table
// ---------------------------------------------------------------------------

/// A callable method on either the factory or a campaign contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    // Campaign contract: views
    Name,
    Description,
    Goal,
    Deadline,
    ContractBalance,
    Tiers,
    Owner,
    CampaignStatus,
    // Campaign contract: writes
    AddTier,
    RemoveTier,
    Fund,
    // Factory contract
    Campaigns,
    AllCampaigns,
    CreateCampaign,
}

impl Method {
    /// Methods exposed by a single campaign contract.
    pub const CAMPAIGN: &'static [Method] = &[
        Method::Name,
        Method::Description,
        Method::Goal,
        Method::Deadline,
        Method::ContractBalance,
        Method::Tiers,
        Method::Owner,
        Method::CampaignStatus,
        Method::AddTier,
        Method::RemoveTier,
        Method::Fund,
    ];

    /// Methods exposed by the campaign factory.
    pub const FACTORY: &'static [Method] = &[
        Method::Campaigns,
        Method::AllCampaigns,
        Method::CreateCampaign,
    ];

    /// Canonical signature, the input to the selector hash.
    pub fn signature(self) -> &'static str {
        match self {
            Method::Name => "name()",
            Method::Description => "description()",
            Method::Goal => "goal()",
            Method::Deadline => "deadline()",
            Method::ContractBalance => "getContractBalance()",
            Method::Tiers => "getTiers()",
            Method::Owner => "owner()",
            Method::CampaignStatus => "getCampaignStatus()",
            Method::AddTier => "addTier(string,uint256)",
            Method::RemoveTier => "removeTier(uint256)",
            Method::Fund => "fund(uint256)",
            Method::Campaigns => "getCampaigns(address)",
            Method::AllCampaigns => "getAllCampaigns()",
            Method::CreateCampaign => "createCampaign(string,string,uint256,uint256)",
        }
    }

    /// Human-readable declaration, used in logs.
    pub fn declaration(self) -> &'static str {
        match self {
            Method::Name => "function name() view returns (string)",
            Method::Description => "function description() view returns (string)",
            Method::Goal => "function goal() view returns (uint256)",
            Method::Deadline => "function deadline() view returns (uint256)",
            Method::ContractBalance => "function getContractBalance() view returns (uint256)",
            Method::Tiers => {
                "function getTiers() view returns ((string name, uint256 amount, uint256 backers)[])"
            }
            Method::Owner => "function owner() view returns (address)",
            Method::CampaignStatus => "function getCampaignStatus() view returns (uint8)",
            Method::AddTier => "function addTier(string _name, uint256 _amount)",
            Method::RemoveTier => "function removeTier(uint256 _index)",
            Method::Fund => "function fund(uint256 _tierIndex) payable",
            Method::Campaigns => {
                "function getCampaigns(address _user) view returns ((address campaignAddress, address creator, string name, uint256 creationTime)[])"
            }
            Method::AllCampaigns => {
                "function getAllCampaigns() view returns ((address campaignAddress, address creator, string name, uint256 creationTime)[])"
            }
            Method::CreateCampaign => {
                "function createCampaign(string _name, string _description, uint256 _goal, uint256 _duration) returns (address)"
            }
        }
    }

    pub fn selector(self) -> Selector {
        ethers_core::utils::id(self.signature())
    }

    pub fn is_view(self) -> bool {
        matches!(
            self,
            Method::Name
                | Method::Description
                | Method::Goal
                | Method::Deadline
                | Method::ContractBalance
                | Method::Tiers
                | Method::Owner
                | Method::CampaignStatus
                | Method::Campaigns
                | Method::AllCampaigns
        )
    }

    pub fn is_payable(self) -> bool {
        matches!(self, Method::Fund)
    }

    pub fn inputs(self) -> Vec<ParamType> {
        match self {
            Method::AddTier => vec![ParamType::String, ParamType::Uint(256)],
            Method::RemoveTier | Method::Fund => vec![ParamType::Uint(256)],
            Method::Campaigns => vec![ParamType::Address],
            Method::CreateCampaign => vec![
                ParamType::String,
                ParamType::String,
                ParamType::Uint(256),
                ParamType::Uint(256),
            ],
            _ => Vec::new(),
        }
    }

    pub fn outputs(self) -> Vec<ParamType> {
        match self {
            Method::Name | Method::Description => vec![ParamType::String],
            Method::Goal | Method::Deadline | Method::ContractBalance => {
                vec![ParamType::Uint(256)]
            }
            Method::Tiers => vec![ParamType::Array(Box::new(Tier::param_type()))],
            Method::Owner | Method::CreateCampaign => vec![ParamType::Address],
            Method::CampaignStatus => vec![ParamType::Uint(8)],
            Method::Campaigns | Method::AllCampaigns => {
                vec![ParamType::Array(Box::new(CampaignSummary::param_type()))]
            }
            Method::AddTier | Method::RemoveTier | Method::Fund => Vec::new(),
        }
    }

    /// Build calldata: 4-byte selector followed by the ABI-encoded arguments.
    pub fn encode_call(self, params: &[Token]) -> Result<Bytes, AbiError> {
        let inputs = self.inputs();
        if inputs.len() != params.len() {
            return Err(AbiError::Arity {
                method: self.signature(),
                expected: inputs.len(),
                got: params.len(),
            });
        }
        if let Some(index) = params
            .iter()
            .zip(&inputs)
            .position(|(token, kind)| !token.type_check(kind))
        {
            return Err(AbiError::ArgumentType {
                method: self.signature(),
                index,
            });
        }

        let mut data = self.selector().to_vec();
        data.extend_from_slice(&abi::encode(params));
        Ok(Bytes::from(data))
    }

    /// Decode raw return data into `T`.
    pub fn decode_output<T: Detokenize>(self, data: &[u8]) -> Result<T, AbiError> {
        let tokens = abi::decode(&self.outputs(), data).map_err(|e| AbiError::Decode {
            method: self.signature(),
            reason: e.to_string(),
        })?;
        T::from_tokens(tokens).map_err(|e| AbiError::Decode {
            method: self.signature(),
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Records returned by the contracts
// ---------------------------------------------------------------------------

/// `(string name, uint256 amount, uint256 backers)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub amount: U256,
    pub backers: U256,
}

impl Tier {
    fn param_type() -> ParamType {
        ParamType::Tuple(vec![
            ParamType::String,
            ParamType::Uint(256),
            ParamType::Uint(256),
        ])
    }
}

/// `(address campaignAddress, address creator, string name, uint256 creationTime)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub campaign_address: Address,
    pub creator: Address,
    pub name: String,
    pub creation_time: U256,
}

impl CampaignSummary {
    fn param_type() -> ParamType {
        ParamType::Tuple(vec![
            ParamType::Address,
            ParamType::Address,
            ParamType::String,
            ParamType::Uint(256),
        ])
    }
}

fn tuple_fields(token: Token, arity: usize, what: &str) -> Result<Vec<Token>, InvalidOutputType> {
    match token {
        Token::Tuple(fields) if fields.len() == arity => Ok(fields),
        other => Err(InvalidOutputType(format!(
            "expected {what} tuple of {arity} fields, got {other:?}"
        ))),
    }
}

fn take<T: Tokenizable>(
    fields: &mut std::vec::IntoIter<Token>,
) -> Result<T, InvalidOutputType> {
    let token = fields
        .next()
        .ok_or_else(|| InvalidOutputType("tuple ended early".into()))?;
    T::from_token(token)
}

impl Tokenizable for Tier {
    fn from_token(token: Token) -> Result<Self, InvalidOutputType> {
        let mut fields = tuple_fields(token, 3, "tier")?.into_iter();
        Ok(Self {
            name: take(&mut fields)?,
            amount: take(&mut fields)?,
            backers: take(&mut fields)?,
        })
    }

    fn into_token(self) -> Token {
        Token::Tuple(vec![
            self.name.into_token(),
            self.amount.into_token(),
            self.backers.into_token(),
        ])
    }
}

impl TokenizableItem for Tier {}

impl Tokenizable for CampaignSummary {
    fn from_token(token: Token) -> Result<Self, InvalidOutputType> {
        let mut fields = tuple_fields(token, 4, "campaign")?.into_iter();
        Ok(Self {
            campaign_address: take(&mut fields)?,
            creator: take(&mut fields)?,
            name: take(&mut fields)?,
            creation_time: take(&mut fields)?,
        })
    }

    fn into_token(self) -> Token {
        Token::Tuple(vec![
            self.campaign_address.into_token(),
            self.creator.into_token(),
            self.name.into_token(),
            self.creation_time.into_token(),
        ])
    }
}

impl TokenizableItem for CampaignSummary {}
