use crate::core::{constants::ZERO_ADDRESS, ClientError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub type ChainId = u64;

/// Returns true for `0x` followed by exactly 40 hex digits, in any case.
pub fn is_valid_address(input: &str) -> bool {
    let Some(hex) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// EVM account or contract address.
///
/// Keeps the text form it was created from; comparison and hashing ignore case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    pub fn is_zero(&self) -> bool {
        self.0.eq_ignore_ascii_case(ZERO_ADDRESS)
    }

    /// 20 raw bytes, used for ABI encoding.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        // length and digits are checked on construction
        let _ = hex::decode_to_slice(&self.0[2..], &mut out);
        out
    }

    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        Address(format!("0x{}", hex::encode(bytes)))
    }
}

impl FromStr for Address {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !is_valid_address(trimmed) {
            return Err(ClientError::InvalidAddress(s.to_string()));
        }
        Ok(Address(format!("0x{}", &trimmed[2..])))
    }
}

impl TryFrom<String> for Address {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_lowercase().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-deployment configuration read from the storage contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub admin: Option<Address>,
    pub factory: Option<Address>,
    pub router: Option<Address>,
    pub project_name: String,
    pub pair_hash: String,
    pub favicon: Option<String>,
}

impl DomainConfig {
    /// Admin, factory and router are all set to non-zero addresses.
    pub fn has_contracts(&self) -> bool {
        [&self.admin, &self.factory, &self.router]
            .iter()
            .all(|a| a.as_ref().map_or(false, |a| !a.is_zero()))
    }

    pub fn has_admin(&self) -> bool {
        self.admin.as_ref().map_or(false, |a| !a.is_zero())
    }
}

/// On-chain ERC-20 metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub address: Address,
    pub chain_id: ChainId,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Default for TokenListVersion {
    fn default() -> Self {
        Self {
            major: 1,
            minor: 0,
            patch: 0,
        }
    }
}

impl fmt::Display for TokenListVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Token list as kept in the storage contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenList {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub tokens: Option<Vec<Token>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<TokenListVersion>,
}
