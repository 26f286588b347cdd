use dealerhub_auth::{AuthorizationModel, Decision, Permission, Principal, Requirement, Role, authorize};

use crate::context::AuthContext;
use crate::render::Rendered;

/// Declarative render gate over a single [`Requirement`].
///
/// All gate flavours (permission, feature, role, route) share the one
/// evaluation path in `dealerhub_auth::authorize`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gate {
    requirement: Requirement,
}

impl Gate {
    pub fn new(requirement: Requirement) -> Self {
        Self { requirement }
    }

    pub fn permission(permission: impl Into<Permission>) -> Self {
        Self::new(Requirement::permission(permission))
    }

    pub fn permissions(permissions: impl IntoIterator<Item = Permission>, require_all: bool) -> Self {
        Self::new(Requirement::permissions(permissions, require_all))
    }

    pub fn feature(feature: impl Into<String>) -> Self {
        Self::new(Requirement::feature(feature))
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new(Requirement::any_role(roles))
    }

    pub fn route(path: impl Into<String>) -> Self {
        Self::new(Requirement::route(path))
    }

    pub fn authenticated() -> Self {
        Self::new(Requirement::Authenticated)
    }

    pub fn for_manager() -> Self {
        Self::roles([Role::DealerManager])
    }

    /// Dealer staff and above within a shop.
    pub fn for_staff() -> Self {
        Self::roles([Role::DealerStaff, Role::DealerManager])
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn check(&self, ctx: &AuthContext) -> Decision {
        ctx.authorize(&self.requirement)
    }

    pub fn check_for(&self, model: &AuthorizationModel, principal: &Principal) -> Decision {
        authorize(model, principal, &self.requirement)
    }

    pub fn render<V>(&self, ctx: &AuthContext, children: impl FnOnce() -> V) -> Rendered<V> {
        if self.check(ctx).is_granted() {
            Rendered::Children(children())
        } else {
            Rendered::Nothing
        }
    }

    pub fn render_or<V>(
        &self,
        ctx: &AuthContext,
        children: impl FnOnce() -> V,
        fallback: impl FnOnce() -> V,
    ) -> Rendered<V> {
        if self.check(ctx).is_granted() {
            Rendered::Children(children())
        } else {
            Rendered::Fallback(fallback())
        }
    }
}
