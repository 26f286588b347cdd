//! `dealerhub-guard`: view-layer guards over `dealerhub-auth`.
//!
//! Rendering and routing stay behind small seams ([`Router`], [`Rendered`])
//! so the same guards drive any host UI.

pub mod context;
pub mod gate;
pub mod hooks;
pub mod memo;
pub mod navigation;
pub mod render;
pub mod router;

pub use context::AuthContext;
pub use gate::Gate;
pub use hooks::{PermissionSpec, UseEffectiveRole, UseFeatureAccess, UsePermissions, UseRouteAccess};
pub use memo::Memo;
pub use navigation::{GuardProps, GuardState, NavigationGuard, PendingResolution, Resolution, Settlement};
pub use render::Rendered;
pub use router::{MemoryRouter, Router};
