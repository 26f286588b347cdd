//! Read-only audit view of the authorization model.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::route::RouteRule;
use crate::{AuthorizationModel, Permission, Role};

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub permissions: Vec<String>,
    pub features: Vec<String>,
    pub description: String,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct PermissionDefinition {
    pub name: String,
    pub category: String,
    pub description: String,
    pub granted_to: Vec<Role>,
}

/// Registry of all roles, permissions and route rules in a model.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub roles: BTreeMap<Role, RoleDefinition>,
    pub permissions: BTreeMap<String, PermissionDefinition>,
    pub routes: Vec<RouteRule>,
}

impl RbacRegistry {
    pub fn from_model(model: &AuthorizationModel) -> Self {
        let mut roles = BTreeMap::new();
        let mut permissions: BTreeMap<String, PermissionDefinition> = BTreeMap::new();

        for role in Role::ALL {
            let granted = model.permissions_for(role);
            let features = model
                .features()
                .filter(|(_, allowed)| allowed.contains(&role))
                .map(|(name, _)| name.to_string())
                .collect();

            roles.insert(
                role,
                RoleDefinition {
                    role,
                    permissions: granted.iter().map(ToString::to_string).collect(),
                    features,
                    description: role.description().to_string(),
                },
            );

            for permission in granted {
                permissions
                    .entry(permission.to_string())
                    .or_insert_with(|| PermissionDefinition {
                        name: permission.to_string(),
                        category: permission.module().unwrap_or_default().to_string(),
                        description: permission_description(permission),
                        granted_to: Vec::new(),
                    })
                    .granted_to
                    .push(role);
            }
        }

        Self {
            roles,
            permissions,
            routes: model.route_rules_ordered_by_specificity().to_vec(),
        }
    }
}

fn permission_description(permission: &Permission) -> String {
    let (Some(module), Some(action)) = (permission.module(), permission.action()) else {
        return permission.to_string();
    };

    if permission.is_wildcard() {
        return format!("Every {module} action");
    }

    let action = match action {
        "view" => "View",
        "view_own" | "view_own_orders" => "View own",
        "create" | "create_order" | "create_quotation" => "Create",
        "update" => "Update",
        "delete" => "Delete",
        "manage" => "Manage",
        "approve" | "approve_order" => "Approve",
        other => other,
    };

    format!("{action} {module}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelBuilder;

    #[test]
    fn registry_lists_roles_permissions_and_grantees() {
        let model = ModelBuilder::new()
            .grant("dealer_staff", ["sales.view"])
            .grant("dealer_manager", ["sales.view", "sales.*"])
            .feature("MANAGE_STAFF", ["dealer_manager"])
            .build()
            .unwrap();

        let registry = RbacRegistry::from_model(&model);
        assert_eq!(registry.roles.len(), Role::ALL.len());
        assert_eq!(registry.roles[&Role::DealerManager].features, vec!["MANAGE_STAFF"]);
        assert!(registry.roles[&Role::Guest].permissions.is_empty());

        let view = &registry.permissions["sales.view"];
        assert_eq!(view.category, "sales");
        assert_eq!(view.granted_to, vec![Role::DealerStaff, Role::DealerManager]);
        assert_eq!(registry.permissions["sales.*"].description, "Every sales action");
    }
}
