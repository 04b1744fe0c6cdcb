use crate::errors::LensError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wallet address of the connected account, e.g. `0x7b1f...a3c2`.
///
/// Parsing lowercases the hex digits so the same wallet always compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EvmAddress(String);

impl EvmAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EvmAddress {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => hex,
            None => return Err(LensError::InvalidAddress(s.to_string())),
        };
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LensError::InvalidAddress(s.to_string()));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lens profile id, e.g. `0x01a4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManagedProfileVisibility {
    All,
    /// Only profiles the owner has hidden from their managed list.
    HiddenOnly,
    /// Every profile that has not been hidden.
    NoneHidden,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesManagedRequest {
    #[serde(rename = "for")]
    pub for_: EvmAddress,
    pub hidden_filter: ManagedProfileVisibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LastLoggedInProfileRequest {
    #[serde(rename = "for")]
    pub for_: EvmAddress,
}

/// Variables of the `ProfilesManaged` query document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesManagedVariables {
    pub profiles_managed_request: ProfilesManagedRequest,
    pub last_logged_in_profile_request: LastLoggedInProfileRequest,
}

impl ProfilesManagedVariables {
    pub fn new(
        viewer: EvmAddress,
        hidden_filter: ManagedProfileVisibility,
        cursor: Option<String>,
    ) -> Self {
        Self {
            profiles_managed_request: ProfilesManagedRequest {
                for_: viewer.clone(),
                hidden_filter,
                cursor,
            },
            last_logged_in_profile_request: LastLoggedInProfileRequest { for_: viewer },
        }
    }

    /// Same query positioned at `cursor`.
    pub fn with_cursor(&self, cursor: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.profiles_managed_request.cursor = Some(cursor.into());
        next
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAddress {
    pub address: EvmAddress,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleInfo {
    pub full_handle: String,
    pub local_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetadata {
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub owned_by: NetworkAddress,
    pub handle: Option<HandleInfo>,
    pub metadata: Option<ProfileMetadata>,
}

impl Profile {
    /// Name shown in lists: metadata display name, then handle, then id.
    pub fn display_name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.display_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.handle.as_ref().map(|h| h.local_name.as_str()))
            .unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PaginatedResultInfo {
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProfileResult {
    pub items: Vec<Profile>,
    pub page_info: PaginatedResultInfo,
}

/// Response data of the `ProfilesManaged` query document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesManagedData {
    pub profiles_managed: PaginatedProfileResult,
    pub last_logged_in_profile: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HideManagedProfileRequest {
    pub profile_id: ProfileId,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnhideManagedProfileRequest {
    pub profile_id: ProfileId,
}

/// `{ "request": ... }` wrapper used by single-argument mutations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestVariables<T> {
    pub request: T,
}
