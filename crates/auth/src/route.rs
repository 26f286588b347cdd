//! Route rules and longest-prefix route resolution.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

use crate::authorize::DenialKind;
use crate::evaluator::{check_all_permissions, check_any_permission};
use crate::{AuthorizationModel, ConfigError, Permission, Principal, Role};

/// Path prefix matched segment-wise (`/dealer/order` never matches `/dealer/orders-list`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<String>,
}

impl RoutePattern {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if !raw.starts_with('/') {
            return Err(ConfigError::route_pattern(raw, "must start with '/'"));
        }
        if raw.contains(['?', '#']) {
            return Err(ConfigError::route_pattern(raw, "must not contain a query or fragment"));
        }

        let segments: Vec<String> = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.iter().any(|s| s == "." || s == "..") {
            return Err(ConfigError::route_pattern(raw, "must not contain dot segments"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of path segments; longer patterns are more specific.
    pub fn specificity(&self) -> usize {
        self.segments.len()
    }

    /// Whether the pattern is a segment prefix of an already normalized path.
    pub fn matches(&self, path_segments: &[&str]) -> bool {
        self.segments.len() <= path_segments.len()
            && self
                .segments
                .iter()
                .zip(path_segments)
                .all(|(pattern, segment)| pattern == segment)
    }
}

impl Serialize for RoutePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// How the permissions of a restricted rule combine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    #[default]
    Any,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteAccess {
    /// Open to everyone, guests included.
    Public,
    /// Any signed-in role; guests are denied.
    Authenticated,
    /// At least one of `roles` or `permissions` is present.
    Restricted {
        roles: Option<BTreeSet<Role>>,
        permissions: Option<Vec<Permission>>,
        mode: PermissionMode,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    pattern: RoutePattern,
    access: RouteAccess,
}

impl RouteRule {
    pub(crate) fn new(pattern: RoutePattern, access: RouteAccess) -> Self {
        Self { pattern, access }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn access(&self) -> &RouteAccess {
        &self.access
    }

    pub fn is_public(&self) -> bool {
        matches!(self.access, RouteAccess::Public)
    }

    pub(crate) fn check(
        &self,
        model: &AuthorizationModel,
        principal: &Principal,
    ) -> Result<(), DenialKind> {
        match &self.access {
            RouteAccess::Public => Ok(()),
            RouteAccess::Authenticated if principal.role().is_authenticated() => Ok(()),
            RouteAccess::Authenticated => Err(DenialKind::Unauthenticated),
            RouteAccess::Restricted {
                roles,
                permissions,
                mode,
            } => {
                if let Some(roles) = roles {
                    if !roles.contains(&principal.role()) {
                        return Err(if principal.role().is_authenticated() {
                            DenialKind::RoleNotAllowed
                        } else {
                            DenialKind::Unauthenticated
                        });
                    }
                }
                match (permissions, mode) {
                    (None, _) => Ok(()),
                    (Some(perms), PermissionMode::Any) => check_any_permission(model, principal, perms),
                    (Some(perms), PermissionMode::All) => check_all_permissions(model, principal, perms),
                }
            }
        }
    }
}

/// Split a concrete path into segments, dropping query, fragment and dot segments.
pub fn normalize_path(path: &str) -> Vec<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let mut segments = Vec::new();
    for segment in path[..end].split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}

/// Most specific rule for `path`; ties go to the first declared rule.
pub fn resolve_route<'m>(model: &'m AuthorizationModel, path: &str) -> Option<&'m RouteRule> {
    let segments = normalize_path(path);
    model
        .route_rules_ordered_by_specificity()
        .iter()
        .find(|rule| rule.pattern.matches(&segments))
}

pub(crate) fn check_route<'m>(
    model: &'m AuthorizationModel,
    principal: &Principal,
    path: &str,
) -> (Option<&'m RouteRule>, Result<(), DenialKind>) {
    match resolve_route(model, path) {
        Some(rule) => (Some(rule), rule.check(model, principal)),
        None => (None, Err(DenialKind::NoMatchingRoute)),
    }
}

/// Whether `role` may navigate to `path`. Unmatched paths are denied.
pub fn can_access_route(model: &AuthorizationModel, role: Role, path: &str) -> bool {
    check_route(model, &Principal::from_role(role), path).1.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelBuilder, RouteSpec};

    fn model() -> AuthorizationModel {
        ModelBuilder::new()
            .grant("dealer_staff", ["sales.view"])
            .grant("dealer_manager", ["sales.*", "reports.view"])
            .route(RouteSpec::public("/login"))
            .route(RouteSpec::authenticated("/account"))
            .route(RouteSpec::new("/dealer").roles(["dealer_staff", "dealer_manager"]))
            .route(RouteSpec::new("/dealer/reports").roles(["dealer_manager"]))
            .route(RouteSpec::new("/dealer/order").permissions(["sales.view"]))
            .route(
                RouteSpec::new("/dealer/approvals")
                    .permissions(["sales.approve_order", "reports.view"])
                    .require_all(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn pattern_rejects_bad_shapes() {
        assert!(RoutePattern::parse("dealer").is_err());
        assert!(RoutePattern::parse("/dealer?tab=1").is_err());
        assert!(RoutePattern::parse("/dealer/../admin").is_err());
        assert_eq!(RoutePattern::parse("/dealer/orders/").unwrap().specificity(), 2);
    }

    #[test]
    fn normalization_strips_query_and_dots() {
        assert_eq!(normalize_path("/dealer//orders/?page=2#top"), vec!["dealer", "orders"]);
        assert_eq!(normalize_path("/dealer/../admin/./x"), vec!["admin", "x"]);
        assert_eq!(normalize_path("/../.."), Vec::<&str>::new());
    }

    #[test]
    fn prefix_matching_is_segment_based() {
        let m = model();
        let rule = resolve_route(&m, "/dealer/orders-list").unwrap();
        assert_eq!(rule.pattern().as_str(), "/dealer");
        let rule = resolve_route(&m, "/dealer/order/42").unwrap();
        assert_eq!(rule.pattern().as_str(), "/dealer/order");
    }

    #[test]
    fn longest_prefix_wins() {
        let m = model();
        assert!(!can_access_route(&m, Role::DealerStaff, "/dealer/reports/sales-performance"));
        assert!(can_access_route(&m, Role::DealerManager, "/dealer/reports/sales-performance"));
        assert!(can_access_route(&m, Role::DealerStaff, "/dealer/orders"));
    }

    #[test]
    fn dot_segments_cannot_escape_a_rule() {
        let m = model();
        assert!(!can_access_route(&m, Role::DealerStaff, "/dealer/../dealer/reports"));
        assert!(!can_access_route(&m, Role::Customer, "/login/../dealer"));
    }

    #[test]
    fn unmatched_paths_are_denied() {
        let m = model();
        for role in Role::ALL {
            assert!(!can_access_route(&m, role, "/unknown/page"));
        }
    }

    #[test]
    fn public_and_authenticated_markers() {
        let m = model();
        assert!(can_access_route(&m, Role::Guest, "/login"));
        assert!(!can_access_route(&m, Role::Guest, "/account/profile"));
        assert!(can_access_route(&m, Role::Customer, "/account/profile"));
        assert!(can_access_route(&m, Role::PlatformAdmin, "/account"));
    }

    #[test]
    fn permission_only_rule_uses_any_semantics() {
        let m = model();
        assert!(can_access_route(&m, Role::DealerStaff, "/dealer/order"));
        assert!(!can_access_route(&m, Role::Customer, "/dealer/order"));
    }

    #[test]
    fn require_all_rule_needs_every_permission() {
        let m = model();
        assert!(can_access_route(&m, Role::DealerManager, "/dealer/approvals"));
        assert!(!can_access_route(&m, Role::DealerStaff, "/dealer/approvals"));
    }

    #[test]
    fn equal_patterns_resolve_to_first_declared() {
        let m = ModelBuilder::new()
            .grant("customer", ["sales.request_quotation"])
            .route(RouteSpec::new("/quotes").roles(["customer"]))
            .route(RouteSpec::new("/quotes/").roles(["dealer_staff"]))
            .build()
            .unwrap();
        assert!(can_access_route(&m, Role::Customer, "/quotes/new"));
        assert!(!can_access_route(&m, Role::DealerStaff, "/quotes/new"));
    }
}
