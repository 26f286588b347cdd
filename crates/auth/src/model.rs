//! Immutable authorization model and its validating builder.
//!
//! The model is assembled once at start-up. Every reference to a role,
//! permission or route pattern is validated in [`ModelBuilder::build`], so a
//! broken configuration stops the process instead of silently denying (or
//! granting) at runtime.

use std::collections::{BTreeMap, BTreeSet};

use crate::route::{PermissionMode, RouteAccess, RoutePattern, RouteRule};
use crate::{ConfigError, Permission, Role};

static NO_PERMISSIONS: BTreeSet<Permission> = BTreeSet::new();

/// Validated, immutable permission catalogue, feature table and route rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationModel {
    catalogue: BTreeMap<Role, BTreeSet<Permission>>,
    modules: BTreeSet<String>,
    features: BTreeMap<String, BTreeSet<Role>>,
    routes: Vec<RouteRule>,
}

impl AuthorizationModel {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    pub fn permissions_for(&self, role: Role) -> &BTreeSet<Permission> {
        self.catalogue.get(&role).unwrap_or(&NO_PERMISSIONS)
    }

    /// Roles allowed to use `feature`, or `None` when the feature is not registered.
    pub fn allowed_roles_for(&self, feature: &str) -> Option<&BTreeSet<Role>> {
        self.features.get(feature)
    }

    /// Route rules, most specific first; equally specific rules keep declaration order.
    pub fn route_rules_ordered_by_specificity(&self) -> &[RouteRule] {
        &self.routes
    }

    pub fn is_registered_module(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    pub fn features(&self) -> impl Iterator<Item = (&str, &BTreeSet<Role>)> {
        self.features.iter().map(|(name, roles)| (name.as_str(), roles))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Route declarations
// ─────────────────────────────────────────────────────────────────────────────

/// Unvalidated route declaration fed to [`ModelBuilder::route`].
///
/// A declaration with neither roles nor permissions is the explicit
/// "any authenticated user" marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pattern: String,
    public: bool,
    roles: Option<Vec<String>>,
    permissions: Option<Vec<String>>,
    mode: PermissionMode,
}

impl RouteSpec {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            public: false,
            roles: None,
            permissions: None,
            mode: PermissionMode::Any,
        }
    }

    pub fn public(pattern: impl Into<String>) -> Self {
        Self {
            public: true,
            ..Self::new(pattern)
        }
    }

    pub fn authenticated(pattern: impl Into<String>) -> Self {
        Self::new(pattern)
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    /// Require every listed permission instead of any one of them.
    pub fn require_all(mut self) -> Self {
        self.mode = PermissionMode::All;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Collects raw tables; [`ModelBuilder::build`] validates them into an [`AuthorizationModel`].
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    grants: Vec<(String, Vec<String>)>,
    features: Vec<(String, Vec<String>)>,
    routes: Vec<RouteSpec>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant permissions to a role. Repeated grants for one role accumulate.
    pub fn grant<I, S>(mut self, role: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grants
            .push((role.into(), permissions.into_iter().map(Into::into).collect()));
        self
    }

    /// Allow roles to use a named feature. Repeated entries accumulate.
    pub fn feature<I, S>(mut self, name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features
            .push((name.into(), roles.into_iter().map(Into::into).collect()));
        self
    }

    pub fn route(mut self, spec: RouteSpec) -> Self {
        self.routes.push(spec);
        self
    }

    pub fn build(self) -> Result<AuthorizationModel, ConfigError> {
        let mut catalogue: BTreeMap<Role, BTreeSet<Permission>> =
            Role::ALL.into_iter().map(|role| (role, BTreeSet::new())).collect();

        for (role, permissions) in self.grants {
            let role: Role = role.parse()?;
            let entry = catalogue.entry(role).or_default();
            for permission in permissions {
                entry.insert(Permission::parse(permission)?);
            }
        }

        let modules: BTreeSet<String> = catalogue
            .values()
            .flatten()
            .filter_map(|p| p.module().map(str::to_string))
            .collect();

        ensure_manager_covers_staff(&catalogue)?;

        let mut features: BTreeMap<String, BTreeSet<Role>> = BTreeMap::new();
        for (name, roles) in self.features {
            let entry = features.entry(name).or_default();
            for role in roles {
                entry.insert(role.parse()?);
            }
        }

        let mut routes = self
            .routes
            .into_iter()
            .map(|spec| build_route(spec, &modules))
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps declaration order among equally specific rules.
        routes.sort_by(|a, b| b.pattern().specificity().cmp(&a.pattern().specificity()));

        tracing::debug!(
            modules = modules.len(),
            features = features.len(),
            routes = routes.len(),
            "authorization model built"
        );

        Ok(AuthorizationModel {
            catalogue,
            modules,
            features,
            routes,
        })
    }
}

/// Monotonic escalation: a manager never lacks something staff holds.
fn ensure_manager_covers_staff(
    catalogue: &BTreeMap<Role, BTreeSet<Permission>>,
) -> Result<(), ConfigError> {
    let (Some(staff), Some(manager)) = (
        catalogue.get(&Role::DealerStaff),
        catalogue.get(&Role::DealerManager),
    ) else {
        return Ok(());
    };

    for permission in staff {
        let covered = manager.contains(permission)
            || (!permission.is_wildcard()
                && permission
                    .module()
                    .is_some_and(|module| manager.contains(&Permission::wildcard(module))));
        if !covered {
            return Err(ConfigError::PrivilegeRegression(permission.to_string()));
        }
    }
    Ok(())
}

fn build_route(spec: RouteSpec, modules: &BTreeSet<String>) -> Result<RouteRule, ConfigError> {
    let pattern = RoutePattern::parse(&spec.pattern)?;

    if spec.public {
        return Ok(RouteRule::new(pattern, RouteAccess::Public));
    }

    let roles = spec
        .roles
        .map(|roles| roles.iter().map(|r| r.parse::<Role>()).collect::<Result<BTreeSet<_>, _>>())
        .transpose()?;

    let permissions = spec
        .permissions
        .map(|perms| {
            perms
                .into_iter()
                .map(|p| {
                    let permission = Permission::parse(p)?;
                    let registered = permission.module().is_some_and(|m| modules.contains(m));
                    if registered {
                        Ok(permission)
                    } else {
                        Err(ConfigError::UnregisteredModule {
                            module: permission.module().unwrap_or_default().to_string(),
                            permission: permission.to_string(),
                        })
                    }
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    if roles.as_ref().is_some_and(BTreeSet::is_empty)
        || permissions.as_ref().is_some_and(Vec::is_empty)
    {
        return Err(ConfigError::EmptyRouteRequirement(spec.pattern));
    }

    let access = if roles.is_none() && permissions.is_none() {
        RouteAccess::Authenticated
    } else {
        RouteAccess::Restricted {
            roles,
            permissions,
            mode: spec.mode,
        }
    };

    Ok(RouteRule::new(pattern, access))
}
