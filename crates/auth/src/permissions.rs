use std::borrow::{Borrow, Cow};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Action that grants every action within a module (`"sales.*"`).
pub const WILDCARD_ACTION: &str = "*";

/// Permission identifier of the form `"<module>.<action>"`.
///
/// Values are not validated on construction so that requests built from
/// arbitrary input still reach the evaluator, which denies anything malformed.
/// Model construction goes through [`Permission::parse`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Parse and validate the `<module>.<action>` shape.
    pub fn parse(name: impl Into<Cow<'static, str>>) -> Result<Self, ConfigError> {
        let permission = Self::new(name);
        if split_permission(permission.as_str()).is_none() {
            return Err(ConfigError::MalformedPermission(permission.0.into_owned()));
        }
        Ok(permission)
    }

    /// Module-wide grant for `module`.
    pub fn wildcard(module: &str) -> Self {
        Self(Cow::Owned(format!("{module}.{WILDCARD_ACTION}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn module(&self) -> Option<&str> {
        split_permission(self.as_str()).map(|(module, _)| module)
    }

    pub fn action(&self) -> Option<&str> {
        split_permission(self.as_str()).map(|(_, action)| action)
    }

    pub fn is_wildcard(&self) -> bool {
        self.action() == Some(WILDCARD_ACTION)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

/// Split `"<module>.<action>"` into its parts, or `None` when malformed.
pub fn split_permission(name: &str) -> Option<(&str, &str)> {
    let (module, action) = name.split_once('.')?;
    if !is_identifier(module) {
        return None;
    }
    if action != WILDCARD_ACTION && !is_identifier(action) {
        return None;
    }
    Some((module, action))
}

fn is_identifier(part: &str) -> bool {
    !part.is_empty()
        && part
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

// ─────────────────────────────────────────────────────────────────────────────
// Permission catalogue constants
// ─────────────────────────────────────────────────────────────────────────────

pub mod sales {
    use super::Permission;

    pub const VIEW: Permission = Permission::from_static("sales.view");
    pub const VIEW_OWN_ORDERS: Permission = Permission::from_static("sales.view_own_orders");
    pub const REQUEST_QUOTATION: Permission = Permission::from_static("sales.request_quotation");
    pub const CREATE_QUOTATION: Permission = Permission::from_static("sales.create_quotation");
    pub const CREATE_ORDER: Permission = Permission::from_static("sales.create_order");
    pub const APPROVE_ORDER: Permission = Permission::from_static("sales.approve_order");
    pub const APPLY_DISCOUNT: Permission = Permission::from_static("sales.apply_discount");
    pub const ALL: Permission = Permission::from_static("sales.*");
}

pub mod inventory {
    use super::Permission;

    pub const VIEW: Permission = Permission::from_static("inventory.view");
    pub const UPDATE: Permission = Permission::from_static("inventory.update");
    pub const ADD_VEHICLE: Permission = Permission::from_static("inventory.add_vehicle");
    pub const DELETE: Permission = Permission::from_static("inventory.delete");
    pub const TRANSFER: Permission = Permission::from_static("inventory.transfer");
    pub const ALL: Permission = Permission::from_static("inventory.*");
}

pub mod customers {
    use super::Permission;

    pub const VIEW: Permission = Permission::from_static("customers.view");
    pub const CREATE: Permission = Permission::from_static("customers.create");
    pub const UPDATE: Permission = Permission::from_static("customers.update");
    pub const ALL: Permission = Permission::from_static("customers.*");
}

pub mod financing {
    use super::Permission;

    pub const APPLY: Permission = Permission::from_static("financing.apply");
    pub const VIEW: Permission = Permission::from_static("financing.view");
    pub const PROCESS: Permission = Permission::from_static("financing.process");
    pub const APPROVE: Permission = Permission::from_static("financing.approve");
}

pub mod reports {
    use super::Permission;

    pub const VIEW_OWN: Permission = Permission::from_static("reports.view_own");
    pub const VIEW: Permission = Permission::from_static("reports.view");
    pub const EXPORT: Permission = Permission::from_static("reports.export");
    pub const ALL: Permission = Permission::from_static("reports.*");
}

pub mod staff {
    use super::Permission;

    pub const VIEW: Permission = Permission::from_static("staff.view");
    pub const MANAGE: Permission = Permission::from_static("staff.manage");
}

pub mod registration {
    use super::Permission;

    pub const SUBMIT: Permission = Permission::from_static("registration.submit");
    pub const REVIEW: Permission = Permission::from_static("registration.review");
}

pub mod dealers {
    use super::Permission;

    pub const VIEW: Permission = Permission::from_static("dealers.view");
    pub const APPROVE: Permission = Permission::from_static("dealers.approve");
    pub const SUSPEND: Permission = Permission::from_static("dealers.suspend");
    pub const ALL: Permission = Permission::from_static("dealers.*");
}

pub mod platform {
    use super::Permission;

    pub const SETTINGS: Permission = Permission::from_static("platform.settings");
    pub const AUDIT: Permission = Permission::from_static("platform.audit");
    pub const ALL: Permission = Permission::from_static("platform.*");
}
