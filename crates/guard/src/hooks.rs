//! Memoized query helpers for view code.
//!
//! Each helper keys its cache on the inputs that can change the answer, so a
//! re-render with the same principal and arguments does no evaluation work.

use std::collections::BTreeMap;

use dealerhub_auth::{
    CurrentUser, Permission, Principal, Requirement, Role, authorize, can_access_feature,
    effective_role,
};

use crate::context::AuthContext;
use crate::memo::Memo;

/// One permission, or a list of which any one suffices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionSpec {
    One(Permission),
    AnyOf(Vec<Permission>),
}

impl PermissionSpec {
    fn requirement(&self) -> Requirement {
        match self {
            PermissionSpec::One(permission) => Requirement::Permission(permission.clone()),
            PermissionSpec::AnyOf(permissions) => Requirement::AnyPermission(permissions.clone()),
        }
    }
}

impl From<Permission> for PermissionSpec {
    fn from(permission: Permission) -> Self {
        PermissionSpec::One(permission)
    }
}

impl From<&'static str> for PermissionSpec {
    fn from(permission: &'static str) -> Self {
        PermissionSpec::One(Permission::from(permission))
    }
}

impl From<Vec<Permission>> for PermissionSpec {
    fn from(permissions: Vec<Permission>) -> Self {
        PermissionSpec::AnyOf(permissions)
    }
}

type PermissionKey<K> = (Principal, BTreeMap<K, PermissionSpec>);

/// Named permission checks evaluated as a batch.
#[derive(Debug, Clone)]
pub struct UsePermissions<K> {
    memo: Memo<PermissionKey<K>, BTreeMap<K, bool>>,
}

impl<K> Default for UsePermissions<K> {
    fn default() -> Self {
        Self { memo: Memo::default() }
    }
}

impl<K: Ord + Clone> UsePermissions<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(
        &mut self,
        ctx: &AuthContext,
        requirements: &BTreeMap<K, PermissionSpec>,
    ) -> &BTreeMap<K, bool> {
        let model = ctx.model();
        self.memo
            .get_or_compute((ctx.principal(), requirements.clone()), |(principal, requirements)| {
                requirements
                    .iter()
                    .map(|(name, spec)| {
                        (name.clone(), authorize(model, principal, &spec.requirement()).is_granted())
                    })
                    .collect()
            })
    }

    pub fn recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UseFeatureAccess {
    memo: Memo<(Role, String), bool>,
}

impl UseFeatureAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, ctx: &AuthContext, feature: &str) -> bool {
        let model = ctx.model();
        *self
            .memo
            .get_or_compute((ctx.effective_role(), feature.to_string()), |(role, feature)| {
                can_access_feature(model, *role, feature)
            })
    }

    pub fn recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}

/// Effective role of the session, cached per signed-in user and session
/// generation.
#[derive(Debug, Clone, Default)]
pub struct UseEffectiveRole {
    memo: Memo<(u64, Option<CurrentUser>), Role>,
}

impl UseEffectiveRole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, ctx: &AuthContext) -> Role {
        *self
            .memo
            .get_or_compute(
                (ctx.session().generation(), ctx.session().current().cloned()),
                |(_, user)| effective_role(user.as_ref()),
            )
    }

    pub fn recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UseRouteAccess {
    memo: Memo<(Principal, String), bool>,
}

impl UseRouteAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, ctx: &AuthContext, path: &str) -> bool {
        let model = ctx.model();
        *self
            .memo
            .get_or_compute((ctx.principal(), path.to_string()), |(principal, path)| {
                authorize(model, principal, &Requirement::route(path.as_str())).is_granted()
            })
    }

    pub fn recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}
