//! Token identity and native-asset aliasing
//!
//! Token addresses are normalized to lowercase 0x-prefixed hex at parse time
//! so the rest of the engine can compare them with plain equality. The
//! chain's native asset has no address of its own; requests for it are
//! resolved to the wrapped token through one canonical alias table rather
//! than string matching scattered through call sites.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized 20-byte token address (lowercase, 0x-prefixed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAddress(String);

impl TokenAddress {
    /// Parse and normalize an address string
    ///
    /// Accepts mixed-case input with or without the 0x prefix; stores the
    /// lowercase 0x-prefixed form. Rejects anything that is not exactly
    /// 20 bytes of hex.
    pub fn parse(input: &str) -> Result<Self, TypesError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 40 || hex::decode(digits).is_err() {
            return Err(TypesError::InvalidAddress {
                input: input.to_string(),
            });
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TokenAddress {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TokenAddress> for String {
    fn from(value: TokenAddress) -> Self {
        value.0
    }
}

/// A token as requested at the library boundary
///
/// The UI may ask to trade the chain's native asset, which no pool holds
/// directly. `Native` is carried as an explicit variant instead of a magic
/// address so resolution happens in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSpec {
    /// The chain's native asset, priced through its wrapped form
    Native,
    /// An ordinary token identified by address
    Token(TokenAddress),
}

impl TokenSpec {
    pub fn token(address: TokenAddress) -> Self {
        Self::Token(address)
    }
}

impl From<TokenAddress> for TokenSpec {
    fn from(address: TokenAddress) -> Self {
        Self::Token(address)
    }
}

/// Canonical native-asset to wrapped-token resolution
///
/// All pricing and path lookups run on the wrapped address; translation back
/// to "native" happens only at the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeAliasTable {
    wrapped: TokenAddress,
}

impl NativeAliasTable {
    pub fn new(wrapped: TokenAddress) -> Self {
        Self { wrapped }
    }

    /// Resolve a boundary-level token spec to the address used internally
    pub fn resolve(&self, spec: &TokenSpec) -> TokenAddress {
        match spec {
            TokenSpec::Native => self.wrapped.clone(),
            TokenSpec::Token(address) => address.clone(),
        }
    }

    /// The wrapped form of the native asset
    pub fn wrapped(&self) -> &TokenAddress {
        &self.wrapped
    }

    /// Whether an internal address is the wrapped native asset
    pub fn is_wrapped_native(&self, address: &TokenAddress) -> bool {
        *address == self.wrapped
    }
}
