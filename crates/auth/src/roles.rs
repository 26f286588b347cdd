use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Primary access class of a user.
///
/// The set is closed: dispatch on it is an exhaustive `match`, so adding a
/// role forces every policy decision that depends on it to be revisited.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Customer,
    DealerStaff,
    DealerManager,
    PlatformAdmin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Guest,
        Role::Customer,
        Role::DealerStaff,
        Role::DealerManager,
        Role::PlatformAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Customer => "customer",
            Role::DealerStaff => "dealer_staff",
            Role::DealerManager => "dealer_manager",
            Role::PlatformAdmin => "platform_admin",
        }
    }

    /// Whether the role belongs to a dealership (staff or manager).
    pub fn is_dealer(&self) -> bool {
        match self {
            Role::DealerStaff | Role::DealerManager => true,
            Role::Guest | Role::Customer | Role::PlatformAdmin => false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Role::Guest)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Guest => "Anonymous visitor without a session",
            Role::Customer => "Retail customer browsing stock, quotations and financing",
            Role::DealerStaff => "Dealership sales staff handling quotations, orders and stock",
            Role::DealerManager => "Dealership manager with approvals, reports and staff management",
            Role::PlatformAdmin => "Platform operator managing dealerships and registrations",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownRole(s.to_string()))
    }
}
