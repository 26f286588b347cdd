use std::sync::Arc;

use proptest::prelude::*;

use dealerhub_auth::catalogue::{ACCESS_DENIED_PATH, LOGIN_PATH};
use dealerhub_auth::{CurrentUser, Role, Session, UserId, can_access_route, default_model};
use dealerhub_guard::{
    AuthContext, GuardProps, GuardState, MemoryRouter, NavigationGuard, Rendered, Router, Settlement,
};

fn signed_in(role: Role) -> AuthContext {
    let model = Arc::new(default_model().expect("default model"));
    let mut user = CurrentUser::new(UserId::new(), role);
    if role.is_dealer() {
        user = user.with_dealer_role(role);
    }
    AuthContext::new(model, Session::signed_in(user))
}

#[test]
fn manager_account_without_sub_role_is_held_to_staff_access() {
    let model = Arc::new(default_model().expect("default model"));
    let user = CurrentUser::new(UserId::new(), Role::DealerManager);
    let ctx = AuthContext::new(model, Session::signed_in(user));
    let mut router = MemoryRouter::new("/dealer/reports");
    let mut guard = NavigationGuard::new(GuardProps::default());

    assert_eq!(ctx.effective_role(), Role::DealerStaff);
    assert_eq!(guard.sync(&ctx, &mut router), GuardState::Denied);
    assert_eq!(router.current_path(), ACCESS_DENIED_PATH);
}

#[test]
fn manager_with_sub_role_reaches_reports() {
    let ctx = signed_in(Role::DealerManager);
    let mut router = MemoryRouter::new("/dealer/reports/sales-performance");
    let mut guard = NavigationGuard::new(GuardProps::default());

    assert_eq!(guard.sync(&ctx, &mut router), GuardState::Allowed);
    assert!(guard.render(|| "reports").is_children());
}

#[test]
fn sign_out_re_evaluates_and_redirects_to_login() {
    let mut ctx = signed_in(Role::DealerStaff);
    let mut router = MemoryRouter::new("/dealer/orders");
    let mut guard = NavigationGuard::new(
        GuardProps::default()
            .require_path("/dealer/orders")
            .redirect_to(LOGIN_PATH),
    );

    assert_eq!(guard.sync(&ctx, &mut router), GuardState::Allowed);

    ctx.session_mut().invalidate();
    assert_eq!(guard.sync(&ctx, &mut router), GuardState::Denied);
    assert_eq!(router.current_path(), LOGIN_PATH);
}

#[test]
fn fallback_never_leaks_children_while_pending() {
    let ctx = signed_in(Role::Customer);
    let router = MemoryRouter::new("/dealer/inventory");
    let mut guard = NavigationGuard::new(GuardProps::default());

    let pending = guard.request(&ctx, &router);
    assert_eq!(
        guard.render_or(|| "inventory", || "checking access"),
        Rendered::Fallback("checking access")
    );

    let mut router = router;
    let settlement = guard.settle(pending.resolve(ctx.model()), &mut router);
    assert_eq!(settlement, Settlement::Applied(GuardState::Denied));
    assert_eq!(guard.render_or(|| "inventory", || "checking access"), Rendered::Nothing);
    assert_eq!(router.current_path(), ACCESS_DENIED_PATH);
}

#[test]
fn settling_twice_does_not_redirect_twice() {
    let ctx = signed_in(Role::Customer);
    let mut router = MemoryRouter::new("/admin");
    let mut guard = NavigationGuard::new(GuardProps::default());

    let resolution = guard.request(&ctx, &router).resolve(ctx.model());
    guard.settle(resolution.clone(), &mut router);
    guard.settle(resolution, &mut router);
    assert_eq!(router.redirects().len(), 1);
}

const PATHS: &[&str] = &[
    "/login",
    "/showroom/sedans",
    "/account",
    "/customer",
    "/customer/financing",
    "/dealer",
    "/dealer/orders/approvals",
    "/dealer/reports",
    "/admin/dealers",
    "/unknown",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn only_the_latest_request_settles(
        role in proptest::sample::select(Role::ALL.to_vec()),
        paths in proptest::collection::vec(proptest::sample::select(PATHS.to_vec()), 2..6),
    ) {
        let ctx = signed_in(role);
        let mut router = MemoryRouter::new(paths[0]);
        let mut guard = NavigationGuard::new(GuardProps::default().redirect_to("/nowhere-else"));

        let mut pending = Vec::new();
        for path in &paths {
            router.navigate(*path);
            pending.push(guard.request(&ctx, &router));
        }

        let latest = pending.pop().expect("at least two requests");
        let last_path = latest.path().to_string();
        for stale in pending {
            prop_assert_eq!(guard.settle(stale.resolve(ctx.model()), &mut router), Settlement::Discarded);
            prop_assert_eq!(guard.state(), GuardState::Unresolved);
        }

        let expected = if can_access_route(ctx.model(), ctx.effective_role(), &last_path) {
            GuardState::Allowed
        } else {
            GuardState::Denied
        };
        prop_assert_eq!(guard.settle(latest.resolve(ctx.model()), &mut router), Settlement::Applied(expected));
    }
}
