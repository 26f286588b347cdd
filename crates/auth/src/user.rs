use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Permission, Role};

/// Identity of a signed-in user as issued by the session provider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// The signed-in user record handed over by the session provider.
///
/// Field names follow the provider's decoded record (`dealerRole`,
/// `dealerShopId`, ...). The record is read-only to the authorization layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_shop_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_permissions: Option<BTreeSet<Permission>>,
}

impl CurrentUser {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            dealer_role: None,
            dealer_shop_id: None,
            explicit_permissions: None,
        }
    }

    pub fn with_dealer_role(mut self, dealer_role: Role) -> Self {
        self.dealer_role = Some(dealer_role);
        self
    }

    pub fn with_dealer_shop(mut self, shop_id: impl Into<String>) -> Self {
        self.dealer_shop_id = Some(shop_id.into());
        self
    }

    pub fn with_explicit_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.explicit_permissions = Some(permissions.into_iter().collect());
        self
    }
}
