//! `dealerhub-auth`: pure authorization engine for the dealership front end.
//!
//! This crate is intentionally decoupled from rendering, routing and storage:
//! it answers boolean questions over an immutable model built at start-up.

pub mod authorize;
pub mod catalogue;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod permissions;
pub mod principal;
pub mod registry;
pub mod roles;
pub mod route;
pub mod session;
pub mod user;

pub use authorize::{
    AuthorizationExplanation, Decision, DenialKind, DenialReason, Requirement, authorize, explain,
};
pub use catalogue::default_model;
pub use error::ConfigError;
pub use evaluator::{can_access_feature, has_all_permissions, has_any_permission, has_permission};
pub use model::{AuthorizationModel, ModelBuilder, RouteSpec};
pub use permissions::Permission;
pub use principal::{Principal, effective_role};
pub use registry::RbacRegistry;
pub use roles::Role;
pub use route::{RouteAccess, RouteRule, can_access_route, resolve_route};
pub use session::{Session, SessionProvider};
pub use user::{CurrentUser, UserId};
