//! Configuration error model.
//!
//! These errors describe a broken authorization model and are fatal at boot.
//! Ordinary "this user may not do this" outcomes are never errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("malformed permission '{0}' (expected '<module>.<action>')")]
    MalformedPermission(String),

    #[error("permission '{permission}' references unregistered module '{module}'")]
    UnregisteredModule { permission: String, module: String },

    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidRoutePattern { pattern: String, reason: &'static str },

    #[error("route '{0}' restricts access with an empty role or permission list")]
    EmptyRouteRequirement(String),

    #[error("dealer_manager is missing '{0}' held by dealer_staff")]
    PrivilegeRegression(String),
}

impl ConfigError {
    pub fn route_pattern(pattern: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidRoutePattern {
            pattern: pattern.into(),
            reason,
        }
    }
}
