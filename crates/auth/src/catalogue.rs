//! Compiled-in dealership authorization model.
//!
//! Manager grants are written so that every staff permission stays covered,
//! either literally or through a module wildcard. The builder re-checks this.

use crate::permissions::{
    customers, dealers, financing, inventory, platform, registration, reports, sales, staff,
};
use crate::{AuthorizationModel, ConfigError, ModelBuilder, Permission, RouteSpec};

/// Named features gated by role membership.
pub mod feature {
    pub const VIEW_DASHBOARD: &str = "VIEW_DASHBOARD";
    pub const REQUEST_QUOTATION: &str = "REQUEST_QUOTATION";
    pub const APPLY_FINANCING: &str = "APPLY_FINANCING";
    pub const EDIT_INVENTORY: &str = "EDIT_INVENTORY";
    pub const APPROVE_ORDERS: &str = "APPROVE_ORDERS";
    pub const EXPORT_REPORTS: &str = "EXPORT_REPORTS";
    pub const MANAGE_STAFF: &str = "MANAGE_STAFF";
    pub const MANAGE_DEALERS: &str = "MANAGE_DEALERS";
}

/// Where denied navigation lands.
pub const ACCESS_DENIED_PATH: &str = "/access-denied";
pub const LOGIN_PATH: &str = "/login";

fn names(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(ToString::to_string).collect()
}

pub fn default_model() -> Result<AuthorizationModel, ConfigError> {
    const STAFF: [&str; 2] = ["dealer_staff", "dealer_manager"];
    const MANAGER: [&str; 1] = ["dealer_manager"];
    const ADMIN: [&str; 1] = ["platform_admin"];

    ModelBuilder::new()
        .grant(
            "customer",
            names(&[
                inventory::VIEW,
                sales::REQUEST_QUOTATION,
                sales::VIEW_OWN_ORDERS,
                financing::APPLY,
                registration::SUBMIT,
            ]),
        )
        .grant(
            "dealer_staff",
            names(&[
                inventory::VIEW,
                inventory::UPDATE,
                sales::VIEW,
                sales::CREATE_QUOTATION,
                sales::CREATE_ORDER,
                customers::VIEW,
                customers::CREATE,
                financing::VIEW,
                financing::PROCESS,
                reports::VIEW_OWN,
            ]),
        )
        .grant(
            "dealer_manager",
            names(&[
                inventory::ALL,
                sales::ALL,
                customers::ALL,
                reports::ALL,
                financing::VIEW,
                financing::PROCESS,
                financing::APPROVE,
                staff::VIEW,
                staff::MANAGE,
            ]),
        )
        .grant(
            "platform_admin",
            names(&[
                dealers::ALL,
                platform::ALL,
                registration::REVIEW,
                reports::ALL,
                inventory::VIEW,
                sales::VIEW,
                customers::VIEW,
                financing::VIEW,
                staff::VIEW,
            ]),
        )
        // Features
        .feature(feature::VIEW_DASHBOARD, ["dealer_staff", "dealer_manager", "platform_admin"])
        .feature(feature::REQUEST_QUOTATION, ["customer"])
        .feature(feature::APPLY_FINANCING, ["customer"])
        .feature(feature::EDIT_INVENTORY, STAFF)
        .feature(feature::APPROVE_ORDERS, MANAGER)
        .feature(feature::EXPORT_REPORTS, ["dealer_manager", "platform_admin"])
        .feature(feature::MANAGE_STAFF, ["dealer_manager", "platform_admin"])
        .feature(feature::MANAGE_DEALERS, ADMIN)
        // Public pages
        .route(RouteSpec::public(LOGIN_PATH))
        .route(RouteSpec::public("/register"))
        .route(RouteSpec::public(ACCESS_DENIED_PATH))
        .route(RouteSpec::public("/showroom"))
        // Signed-in area shared by every role
        .route(RouteSpec::authenticated("/account"))
        // Customer portal
        .route(RouteSpec::new("/customer").roles(["customer"]))
        .route(
            RouteSpec::new("/customer/financing")
                .roles(["customer"])
                .permissions([financing::APPLY.to_string()]),
        )
        // Dealer workspace
        .route(RouteSpec::new("/dealer").roles(STAFF))
        .route(
            RouteSpec::new("/dealer/orders")
                .roles(STAFF)
                .permissions([sales::VIEW.to_string()]),
        )
        .route(
            RouteSpec::new("/dealer/orders/approvals")
                .roles(MANAGER)
                .permissions([sales::APPROVE_ORDER.to_string()]),
        )
        .route(
            RouteSpec::new("/dealer/quotations")
                .roles(STAFF)
                .permissions([sales::CREATE_QUOTATION.to_string()]),
        )
        .route(
            RouteSpec::new("/dealer/inventory")
                .roles(STAFF)
                .permissions([inventory::VIEW.to_string()]),
        )
        .route(
            RouteSpec::new("/dealer/financing")
                .roles(STAFF)
                .permissions([financing::VIEW.to_string(), financing::PROCESS.to_string()]),
        )
        .route(RouteSpec::new("/dealer/reports").roles(MANAGER))
        .route(
            RouteSpec::new("/dealer/staff")
                .roles(MANAGER)
                .permissions([staff::MANAGE.to_string()]),
        )
        // Platform administration
        .route(RouteSpec::new("/admin").roles(ADMIN))
        .route(
            RouteSpec::new("/admin/dealers")
                .roles(ADMIN)
                .permissions([dealers::VIEW.to_string()]),
        )
        .route(
            RouteSpec::new("/admin/registrations")
                .roles(ADMIN)
                .permissions([registration::REVIEW.to_string()]),
        )
        .build()
}
