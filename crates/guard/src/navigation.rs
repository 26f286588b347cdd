//! Route-level guard.
//!
//! Resolution is split in two steps so a host can evaluate off the render
//! path: [`NavigationGuard::request`] captures the path and principal and
//! hands out a [`PendingResolution`]; [`NavigationGuard::settle`] applies the
//! verdict. Only the most recent request may settle, so a slow answer for a
//! previous location can never overwrite the current one.

use dealerhub_auth::catalogue::ACCESS_DENIED_PATH;
use dealerhub_auth::route::normalize_path;
use dealerhub_auth::{AuthorizationModel, Principal, Requirement, authorize};

use crate::context::AuthContext;
use crate::render::Rendered;
use crate::router::Router;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardProps {
    /// Path to check. When absent the router's current path is used.
    pub required_path: Option<String>,
    pub redirect_to: String,
}

impl GuardProps {
    pub fn require_path(mut self, path: impl Into<String>) -> Self {
        self.required_path = Some(path.into());
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = target.into();
        self
    }
}

impl Default for GuardProps {
    fn default() -> Self {
        Self {
            required_path: None,
            redirect_to: ACCESS_DENIED_PATH.to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unresolved,
    Allowed,
    Denied,
}

/// A resolution that has been requested but not yet evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResolution {
    request: u64,
    path: String,
    principal: Principal,
}

impl PendingResolution {
    pub fn request(&self) -> u64 {
        self.request
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn resolve(self, model: &AuthorizationModel) -> Resolution {
        let requirement = Requirement::route(self.path.as_str());
        let verdict = if authorize(model, &self.principal, &requirement).is_granted() {
            GuardState::Allowed
        } else {
            GuardState::Denied
        };
        Resolution {
            request: self.request,
            path: self.path,
            principal: self.principal,
            verdict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    request: u64,
    path: String,
    principal: Principal,
    verdict: GuardState,
}

impl Resolution {
    pub fn request(&self) -> u64 {
        self.request
    }

    pub fn verdict(&self) -> GuardState {
        self.verdict
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Settlement {
    Applied(GuardState),
    /// Superseded by a newer request; nothing changed.
    Discarded,
}

/// Guards one route: resolves access for the current principal and redirects on denial.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    props: GuardProps,
    state: GuardState,
    latest_request: u64,
    settled_for: Option<(String, Principal)>,
}

impl NavigationGuard {
    pub fn new(props: GuardProps) -> Self {
        Self {
            props,
            state: GuardState::Unresolved,
            latest_request: 0,
            settled_for: None,
        }
    }

    pub fn props(&self) -> &GuardProps {
        &self.props
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    fn target_path<R: Router + ?Sized>(&self, router: &R) -> String {
        self.props
            .required_path
            .clone()
            .unwrap_or_else(|| router.current_path().to_string())
    }

    /// Start a new resolution. The guard goes back to `Unresolved` and any
    /// earlier pending resolution becomes stale.
    pub fn request<R: Router + ?Sized>(&mut self, ctx: &AuthContext, router: &R) -> PendingResolution {
        self.latest_request += 1;
        self.state = GuardState::Unresolved;
        self.settled_for = None;

        let pending = PendingResolution {
            request: self.latest_request,
            path: self.target_path(router),
            principal: ctx.principal(),
        };
        tracing::debug!(
            request = pending.request,
            path = %pending.path,
            role = %pending.principal.role(),
            "navigation guard resolving"
        );
        pending
    }

    pub fn settle<R: Router + ?Sized>(&mut self, resolution: Resolution, router: &mut R) -> Settlement {
        if resolution.request != self.latest_request {
            tracing::debug!(
                request = resolution.request,
                latest = self.latest_request,
                "discarding stale navigation resolution"
            );
            return Settlement::Discarded;
        }
        if self.settled_for.is_some() {
            return Settlement::Applied(self.state);
        }

        self.state = resolution.verdict;
        tracing::debug!(
            request = resolution.request,
            path = %resolution.path,
            state = ?self.state,
            "navigation guard settled"
        );
        self.settled_for = Some((resolution.path, resolution.principal));

        if self.state == GuardState::Denied {
            self.redirect(router);
        }
        Settlement::Applied(self.state)
    }

    fn redirect<R: Router + ?Sized>(&self, router: &mut R) {
        let target = self.props.redirect_to.as_str();
        if normalize_path(router.current_path()) == normalize_path(target) {
            tracing::warn!(target_path = %target, "denied at the redirect target; not redirecting again");
            return;
        }
        tracing::info!(from = %router.current_path(), to = %target, "redirecting denied navigation");
        router.redirect(target);
    }

    /// Request, resolve and settle in one go. A no-op when the path and
    /// principal are unchanged since the last settled resolution.
    pub fn sync<R: Router + ?Sized>(&mut self, ctx: &AuthContext, router: &mut R) -> GuardState {
        let path = self.target_path(router);
        let principal = ctx.principal();
        let unchanged = self
            .settled_for
            .as_ref()
            .is_some_and(|(settled_path, settled_principal)| {
                *settled_path == path && *settled_principal == principal
            });
        if unchanged {
            return self.state;
        }

        let resolution = self.request(ctx, router).resolve(ctx.model());
        self.settle(resolution, router);
        self.state
    }

    /// Children only once access is confirmed; never while unresolved.
    pub fn render<V>(&self, children: impl FnOnce() -> V) -> Rendered<V> {
        match self.state {
            GuardState::Allowed => Rendered::Children(children()),
            GuardState::Unresolved | GuardState::Denied => Rendered::Nothing,
        }
    }

    /// Like [`render`](Self::render) but shows `fallback` while unresolved.
    pub fn render_or<V>(&self, children: impl FnOnce() -> V, fallback: impl FnOnce() -> V) -> Rendered<V> {
        match self.state {
            GuardState::Allowed => Rendered::Children(children()),
            GuardState::Unresolved => Rendered::Fallback(fallback()),
            GuardState::Denied => Rendered::Nothing,
        }
    }
}
