//! Permission and feature checks.
//!
//! All checks are pure and fail closed: anything the model does not know
//! about is denied. Malformed or unregistered permission strings are also
//! reported once per check through `tracing::warn!`.

use std::collections::BTreeSet;

use crate::authorize::DenialKind;
use crate::permissions::split_permission;
use crate::{AuthorizationModel, Permission, Principal, Role};

/// Whether `role` holds `permission`, literally or through `"<module>.*"`.
pub fn has_permission<P: AsRef<str>>(model: &AuthorizationModel, role: Role, permission: P) -> bool {
    check_permission(model, &Principal::from_role(role), permission.as_ref()).is_ok()
}

/// `true` when at least one permission is held. An empty list is `false`.
pub fn has_any_permission<P: AsRef<str>>(
    model: &AuthorizationModel,
    role: Role,
    permissions: &[P],
) -> bool {
    check_any_permission(model, &Principal::from_role(role), permissions).is_ok()
}

/// `true` when every permission is held.
///
/// An empty list is vacuously `true`; callers gating on a list that may be
/// empty should check for that themselves.
pub fn has_all_permissions<P: AsRef<str>>(
    model: &AuthorizationModel,
    role: Role,
    permissions: &[P],
) -> bool {
    check_all_permissions(model, &Principal::from_role(role), permissions).is_ok()
}

/// Whether `role` may use `feature`. Unregistered features are denied.
pub fn can_access_feature(model: &AuthorizationModel, role: Role, feature: &str) -> bool {
    check_feature(model, role, feature).is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Principal-level checks (shared by `authorize` and `explain`)
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn check_permission(
    model: &AuthorizationModel,
    principal: &Principal,
    permission: &str,
) -> Result<(), DenialKind> {
    let Some((module, _)) = split_permission(permission) else {
        tracing::warn!(permission, "malformed permission requested; denying");
        return Err(DenialKind::MalformedPermission);
    };

    if !model.is_registered_module(module) {
        tracing::warn!(permission, module, "permission names an unregistered module; denying");
        return Err(DenialKind::UnknownModule);
    }

    let wildcard = Permission::wildcard(module);
    let holds = |set: &BTreeSet<Permission>| {
        set.contains(permission) || set.contains(wildcard.as_str())
    };

    if holds(model.permissions_for(principal.role())) || holds(principal.grants()) {
        Ok(())
    } else {
        Err(DenialKind::MissingPermission)
    }
}

pub(crate) fn check_any_permission<P: AsRef<str>>(
    model: &AuthorizationModel,
    principal: &Principal,
    permissions: &[P],
) -> Result<(), DenialKind> {
    let mut denial = DenialKind::MissingPermission;
    for permission in permissions {
        match check_permission(model, principal, permission.as_ref()) {
            Ok(()) => return Ok(()),
            Err(DenialKind::MissingPermission) => {}
            // Surface configuration-looking failures over plain misses.
            Err(kind) if denial == DenialKind::MissingPermission => denial = kind,
            Err(_) => {}
        }
    }
    Err(denial)
}

pub(crate) fn check_all_permissions<P: AsRef<str>>(
    model: &AuthorizationModel,
    principal: &Principal,
    permissions: &[P],
) -> Result<(), DenialKind> {
    permissions
        .iter()
        .try_for_each(|permission| check_permission(model, principal, permission.as_ref()))
}

pub(crate) fn check_feature(
    model: &AuthorizationModel,
    role: Role,
    feature: &str,
) -> Result<(), DenialKind> {
    match model.allowed_roles_for(feature) {
        None => {
            tracing::debug!(feature, "feature is not registered; denying");
            Err(DenialKind::UnknownFeature)
        }
        Some(roles) if roles.contains(&role) => Ok(()),
        Some(_) => Err(DenialKind::RoleNotAllowed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelBuilder;

    fn model() -> AuthorizationModel {
        ModelBuilder::new()
            .grant("customer", ["sales.request_quotation"])
            .grant("dealer_staff", ["sales.view", "inventory.view"])
            .grant("dealer_manager", ["sales.*", "inventory.view", "staff.manage"])
            .feature("MANAGE_STAFF", ["dealer_manager"])
            .feature("NOBODY", Vec::<String>::new())
            .build()
            .unwrap()
    }

    #[test]
    fn literal_and_wildcard_membership() {
        let m = model();
        assert!(has_permission(&m, Role::DealerStaff, "sales.view"));
        assert!(!has_permission(&m, Role::DealerStaff, "sales.approve_order"));
        assert!(has_permission(&m, Role::DealerManager, "sales.approve_order"));
        assert!(has_permission(&m, Role::DealerManager, "sales.*"));
        assert!(!has_permission(&m, Role::DealerStaff, "sales.*"));
    }

    #[test]
    fn guest_holds_nothing() {
        let m = model();
        assert!(!has_permission(&m, Role::Guest, "sales.view"));
    }

    #[test]
    fn unknown_or_malformed_permissions_are_denied() {
        let m = model();
        assert!(!has_permission(&m, Role::DealerManager, "warranty.view"));
        assert!(!has_permission(&m, Role::DealerManager, "sales"));
        assert!(!has_permission(&m, Role::DealerManager, ""));
    }

    #[test]
    fn any_and_all_combinations() {
        let m = model();
        let empty: [&str; 0] = [];
        assert!(!has_any_permission(&m, Role::DealerManager, &empty));
        assert!(has_all_permissions(&m, Role::Guest, &empty));
        assert!(has_any_permission(&m, Role::DealerStaff, &["sales.approve_order", "sales.view"]));
        assert!(!has_all_permissions(&m, Role::DealerStaff, &["sales.approve_order", "sales.view"]));
        assert!(has_all_permissions(&m, Role::DealerManager, &["sales.approve_order", "staff.manage"]));
    }

    #[test]
    fn any_reports_unknown_module_over_missing() {
        let m = model();
        let principal = Principal::from_role(Role::Customer);
        assert_eq!(
            check_any_permission(&m, &principal, &["sales.view", "warranty.view"]),
            Err(DenialKind::UnknownModule)
        );
    }

    #[test]
    fn explicit_grants_extend_the_role() {
        let m = model();
        let principal = Principal::from_role(Role::DealerStaff)
            .with_grants([Permission::new("sales.approve_order")]);
        assert!(check_permission(&m, &principal, "sales.approve_order").is_ok());
        assert!(check_permission(&m, &principal, "sales.apply_discount").is_err());
    }

    #[test]
    fn explicit_grants_cannot_reach_unregistered_modules() {
        let m = model();
        let principal = Principal::from_role(Role::Customer)
            .with_grants([Permission::new("warranty.view")]);
        assert_eq!(
            check_permission(&m, &principal, "warranty.view"),
            Err(DenialKind::UnknownModule)
        );
    }

    #[test]
    fn feature_table_lookup() {
        let m = model();
        assert!(can_access_feature(&m, Role::DealerManager, "MANAGE_STAFF"));
        assert!(!can_access_feature(&m, Role::DealerStaff, "MANAGE_STAFF"));
        assert!(!can_access_feature(&m, Role::DealerManager, "NOBODY"));
        assert!(!can_access_feature(&m, Role::PlatformAdmin, "UNREGISTERED"));
    }
}
