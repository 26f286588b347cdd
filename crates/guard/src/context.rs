use std::sync::Arc;

use dealerhub_auth::{AuthorizationModel, Decision, Principal, Requirement, Role, Session, authorize};

/// Authorization context handed to guards, gates and hooks.
///
/// The model is shared and immutable; the session is owned here and changed
/// only through explicit sign-in/invalidate/refresh calls.
#[derive(Debug, Clone)]
pub struct AuthContext {
    model: Arc<AuthorizationModel>,
    session: Session,
}

impl AuthContext {
    pub fn new(model: Arc<AuthorizationModel>, session: Session) -> Self {
        Self { model, session }
    }

    pub fn anonymous(model: Arc<AuthorizationModel>) -> Self {
        Self::new(model, Session::anonymous())
    }

    pub fn model(&self) -> &AuthorizationModel {
        &self.model
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn principal(&self) -> Principal {
        self.session.principal()
    }

    pub fn effective_role(&self) -> Role {
        self.session.effective_role()
    }

    pub fn authorize(&self, requirement: &Requirement) -> Decision {
        authorize(&self.model, &self.principal(), requirement)
    }
}
