//! Explicit session context.
//!
//! The current user is held by a value passed to whoever needs it, never by a
//! process-wide cache. Every change bumps a generation counter so dependents
//! can tell that the user reference changed without comparing tokens.

use crate::{CurrentUser, Principal, Role, effective_role};

/// Source of the already-decoded current user (token decoding happens elsewhere).
pub trait SessionProvider {
    fn current_user(&self) -> Option<CurrentUser>;
}

impl<F> SessionProvider for F
where
    F: Fn() -> Option<CurrentUser>,
{
    fn current_user(&self) -> Option<CurrentUser> {
        self()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<CurrentUser>,
    generation: u64,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: CurrentUser) -> Self {
        Self {
            user: Some(user),
            generation: 1,
        }
    }

    pub fn sign_in(&mut self, user: CurrentUser) {
        tracing::debug!(user_id = %user.id, role = %user.role, "session signed in");
        self.user = Some(user);
        self.generation += 1;
    }

    /// Drop the current user. Dependents observe a new generation.
    pub fn invalidate(&mut self) {
        tracing::debug!(generation = self.generation + 1, "session invalidated");
        self.user = None;
        self.generation += 1;
    }

    /// Reload the user from the provider, replacing whatever was held.
    pub fn refresh<P: SessionProvider + ?Sized>(&mut self, provider: &P) {
        self.user = provider.current_user();
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            signed_in = self.user.is_some(),
            "session refreshed"
        );
    }

    pub fn current(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn effective_role(&self) -> Role {
        effective_role(self.current())
    }

    pub fn principal(&self) -> Principal {
        Principal::from_user(self.current())
    }
}
