use crate::core::{Address, ClientResult, Token, TokenList};
use serde::Serialize;

/// Editable form of a token list.
///
/// Absent fields of the stored list are defaulted on load (empty name and
/// logo, no tokens), so two drafts built from equivalent lists compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenListDraft {
    pub chain_id: String,
    pub list_id: String,
    pub name: String,
    pub logo_uri: String,
    pub tokens: Vec<Token>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalDraft<'a> {
    chain_id: &'a str,
    list_id: &'a str,
    name: &'a str,
    logo: &'a str,
    tokens: &'a [Token],
}

impl TokenListDraft {
    pub fn from_list(chain_id: impl Into<String>, list_id: impl Into<String>, list: &TokenList) -> Self {
        Self {
            chain_id: chain_id.into(),
            list_id: list_id.into(),
            name: list.name.clone().unwrap_or_default(),
            logo_uri: list.logo_uri.clone().unwrap_or_default(),
            tokens: list.tokens.clone().unwrap_or_default(),
        }
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.tokens.iter().any(|t| &t.address == address)
    }

    /// Drops every token with `address`. Returns whether anything was removed.
    pub fn remove(&mut self, address: &Address) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| &t.address != address);
        self.tokens.len() != before
    }

    /// First required field that is still empty. Whitespace counts as a value.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.chain_id.is_empty() {
            Some("chain id")
        } else if self.list_id.is_empty() {
            Some("list id")
        } else if self.name.is_empty() {
            Some("name")
        } else if self.tokens.is_empty() {
            Some("tokens")
        } else {
            None
        }
    }

    /// Stable JSON rendering of the draft, for display and logs.
    pub fn canonical_serialization(&self) -> ClientResult<String> {
        let canonical = CanonicalDraft {
            chain_id: &self.chain_id,
            list_id: &self.list_id,
            name: &self.name,
            logo: &self.logo_uri,
            tokens: &self.tokens,
        };
        Ok(serde_json::to_string(&canonical)?)
    }
}
