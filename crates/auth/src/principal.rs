//! Effective-role resolution and the evaluation subject built from it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{CurrentUser, Permission, Role};

/// Role actually used for authorization decisions.
///
/// - No user: `guest`.
/// - Dealer account: the dealer sub-role when it names a dealer role,
///   otherwise `dealer_staff`. A missing sub-role never defaults to manager.
/// - Any other account: its own role; a stray sub-role is ignored.
pub fn effective_role(user: Option<&CurrentUser>) -> Role {
    let Some(user) = user else {
        return Role::Guest;
    };

    match user.role {
        Role::DealerStaff | Role::DealerManager => match user.dealer_role {
            Some(sub_role) if sub_role.is_dealer() => sub_role,
            Some(sub_role) => {
                tracing::warn!(
                    user_id = %user.id,
                    role = %user.role,
                    dealer_role = %sub_role,
                    "non-dealer sub-role on dealer account; falling back to dealer_staff"
                );
                Role::DealerStaff
            }
            None => Role::DealerStaff,
        },
        Role::Guest | Role::Customer | Role::PlatformAdmin => user.role,
    }
}

/// Subject of an authorization query: effective role plus explicit grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Principal {
    role: Role,
    grants: BTreeSet<Permission>,
}

impl Principal {
    pub fn from_role(role: Role) -> Self {
        Self {
            role,
            grants: BTreeSet::new(),
        }
    }

    pub fn guest() -> Self {
        Self::from_role(Role::Guest)
    }

    pub fn from_user(user: Option<&CurrentUser>) -> Self {
        let grants = user
            .and_then(|u| u.explicit_permissions.clone())
            .unwrap_or_default();
        Self {
            role: effective_role(user),
            grants,
        }
    }

    pub fn with_grants(mut self, grants: impl IntoIterator<Item = Permission>) -> Self {
        self.grants.extend(grants);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn grants(&self) -> &BTreeSet<Permission> {
        &self.grants
    }
}

impl From<Role> for Principal {
    fn from(role: Role) -> Self {
        Self::from_role(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;

    fn user(role: Role) -> CurrentUser {
        CurrentUser::new(UserId::new(), role)
    }

    #[test]
    fn no_user_is_guest() {
        assert_eq!(effective_role(None), Role::Guest);
        assert_eq!(Principal::from_user(None), Principal::guest());
    }

    #[test]
    fn dealer_without_sub_role_defaults_to_staff() {
        assert_eq!(effective_role(Some(&user(Role::DealerStaff))), Role::DealerStaff);
        assert_eq!(effective_role(Some(&user(Role::DealerManager))), Role::DealerStaff);
    }

    #[test]
    fn explicit_sub_role_wins() {
        let demoted = user(Role::DealerManager).with_dealer_role(Role::DealerStaff);
        assert_eq!(effective_role(Some(&demoted)), Role::DealerStaff);

        let manager = user(Role::DealerStaff).with_dealer_role(Role::DealerManager);
        assert_eq!(effective_role(Some(&manager)), Role::DealerManager);
    }

    #[test]
    fn non_dealer_sub_role_on_dealer_account_is_least_privilege() {
        let odd = user(Role::DealerManager).with_dealer_role(Role::PlatformAdmin);
        assert_eq!(effective_role(Some(&odd)), Role::DealerStaff);
    }

    #[test]
    fn sub_role_is_ignored_for_other_accounts() {
        let customer = user(Role::Customer).with_dealer_role(Role::DealerManager);
        assert_eq!(effective_role(Some(&customer)), Role::Customer);

        let admin = user(Role::PlatformAdmin).with_dealer_role(Role::DealerStaff);
        assert_eq!(effective_role(Some(&admin)), Role::PlatformAdmin);
    }

    #[test]
    fn principal_carries_explicit_grants() {
        let u = user(Role::DealerStaff)
            .with_explicit_permissions([crate::permissions::reports::EXPORT]);
        let principal = Principal::from_user(Some(&u));
        assert_eq!(principal.role(), Role::DealerStaff);
        assert!(principal.grants().contains("reports.export"));
    }
}
