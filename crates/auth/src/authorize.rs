use serde::Serialize;

use crate::evaluator::{check_all_permissions, check_any_permission, check_feature, check_permission};
use crate::route::{RouteRule, check_route};
use crate::{AuthorizationModel, Permission, Principal, Role};

/// Anything a caller may ask the engine to authorize.
///
/// Render gates and hooks are built on this single shape instead of
/// re-implementing role and permission resolution per component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Requirement {
    Permission(Permission),
    AnyPermission(Vec<Permission>),
    AllPermissions(Vec<Permission>),
    Feature(String),
    AnyRole(Vec<Role>),
    Route(String),
    Authenticated,
}

impl Requirement {
    pub fn permission(permission: impl Into<Permission>) -> Self {
        Self::Permission(permission.into())
    }

    /// `require_all` selects AND over OR.
    pub fn permissions(permissions: impl IntoIterator<Item = Permission>, require_all: bool) -> Self {
        let permissions = permissions.into_iter().collect();
        if require_all {
            Self::AllPermissions(permissions)
        } else {
            Self::AnyPermission(permissions)
        }
    }

    pub fn feature(feature: impl Into<String>) -> Self {
        Self::Feature(feature.into())
    }

    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::AnyRole(roles.into_iter().collect())
    }

    pub fn route(path: impl Into<String>) -> Self {
        Self::Route(path.into())
    }
}

impl core::fmt::Display for Requirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fn join<T: core::fmt::Display>(items: &[T], sep: &str) -> String {
            items.iter().map(ToString::to_string).collect::<Vec<_>>().join(sep)
        }

        match self {
            Requirement::Permission(p) => write!(f, "permission '{p}'"),
            Requirement::AnyPermission(ps) => write!(f, "any of [{}]", join(ps, ", ")),
            Requirement::AllPermissions(ps) => write!(f, "all of [{}]", join(ps, ", ")),
            Requirement::Feature(name) => write!(f, "feature '{name}'"),
            Requirement::AnyRole(roles) => write!(f, "one of roles [{}]", join(roles, ", ")),
            Requirement::Route(path) => write!(f, "route '{path}'"),
            Requirement::Authenticated => f.write_str("an authenticated session"),
        }
    }
}

/// Outcome of [`authorize`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub granted: bool,
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        self.granted
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    MalformedPermission,
    UnknownModule,
    MissingPermission,
    UnknownFeature,
    RoleNotAllowed,
    NoMatchingRoute,
    Unauthenticated,
}

struct Outcome<'m> {
    result: Result<(), DenialKind>,
    rule: Option<&'m RouteRule>,
}

fn evaluate<'m>(
    model: &'m AuthorizationModel,
    principal: &Principal,
    requirement: &Requirement,
) -> Outcome<'m> {
    let result = match requirement {
        Requirement::Permission(p) => check_permission(model, principal, p.as_str()),
        Requirement::AnyPermission(ps) => check_any_permission(model, principal, ps),
        Requirement::AllPermissions(ps) => check_all_permissions(model, principal, ps),
        Requirement::Feature(name) => check_feature(model, principal.role(), name),
        Requirement::AnyRole(roles) if roles.contains(&principal.role()) => Ok(()),
        Requirement::AnyRole(_) => Err(DenialKind::RoleNotAllowed),
        Requirement::Authenticated if principal.role().is_authenticated() => Ok(()),
        Requirement::Authenticated => Err(DenialKind::Unauthenticated),
        Requirement::Route(path) => {
            let (rule, result) = check_route(model, principal, path);
            return Outcome { result, rule };
        }
    };
    Outcome { result, rule: None }
}

/// Authorize a principal against a requirement.
///
/// - No IO
/// - No panics
/// - Denial is a normal outcome, never an error
pub fn authorize(model: &AuthorizationModel, principal: &Principal, requirement: &Requirement) -> Decision {
    Decision {
        granted: evaluate(model, principal, requirement).result.is_ok(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// `granted` always agrees with [`authorize`] for the same inputs.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub requirement: Requirement,
    pub role: Role,
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Route pattern that decided a route requirement, if any matched.
    pub matched_route: Option<String>,

    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Explain why an authorization decision was made (or would be made).
pub fn explain(
    model: &AuthorizationModel,
    principal: &Principal,
    requirement: &Requirement,
) -> AuthorizationExplanation {
    let outcome = evaluate(model, principal, requirement);
    let role = principal.role();
    let matched_route = outcome.rule.map(|rule| rule.pattern().as_str().to_string());

    match outcome.result {
        Ok(()) => AuthorizationExplanation {
            requirement: requirement.clone(),
            role,
            granted: true,
            reason: match outcome.rule {
                Some(rule) if rule.is_public() => {
                    format!("route '{}' is public", rule.pattern().as_str())
                }
                Some(rule) => format!(
                    "role '{role}' satisfies route rule '{}'",
                    rule.pattern().as_str()
                ),
                None => format!("role '{role}' satisfies {requirement}"),
            },
            matched_route,
            denial_reason: None,
        },
        Err(kind) => AuthorizationExplanation {
            requirement: requirement.clone(),
            role,
            granted: false,
            reason: format!("role '{role}' does not satisfy {requirement}"),
            matched_route,
            denial_reason: Some(DenialReason {
                kind,
                message: denial_message(kind, requirement),
                suggestions: denial_suggestions(kind, requirement),
            }),
        },
    }
}

fn denial_message(kind: DenialKind, requirement: &Requirement) -> String {
    match kind {
        DenialKind::MalformedPermission => {
            format!("{requirement} contains a permission not shaped '<module>.<action>'")
        }
        DenialKind::UnknownModule => {
            format!("{requirement} references a module absent from the permission catalogue")
        }
        DenialKind::MissingPermission => format!("Missing required {requirement}"),
        DenialKind::UnknownFeature => format!("{requirement} is not registered"),
        DenialKind::RoleNotAllowed => format!("The current role is not allowed for {requirement}"),
        DenialKind::NoMatchingRoute => {
            format!("No route rule matches {requirement}; unmatched paths are denied")
        }
        DenialKind::Unauthenticated => format!("{requirement} requires a signed-in user"),
    }
}

fn denial_suggestions(kind: DenialKind, requirement: &Requirement) -> Vec<String> {
    match kind {
        DenialKind::MalformedPermission | DenialKind::UnknownModule => vec![
            "Check the permission string against the catalogue constants".to_string(),
        ],
        DenialKind::MissingPermission => vec![
            format!("Assign a role whose catalogue grants {requirement}"),
            "Grant the permission explicitly on the user record".to_string(),
        ],
        DenialKind::UnknownFeature => {
            vec!["Register the feature in the feature access table".to_string()]
        }
        DenialKind::RoleNotAllowed => vec![format!("Sign in with a role allowed for {requirement}")],
        DenialKind::NoMatchingRoute => {
            vec!["Declare a route rule (or a public rule) covering this path".to_string()]
        }
        DenialKind::Unauthenticated => vec!["Sign in before accessing this resource".to_string()],
    }
}
