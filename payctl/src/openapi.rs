//! OpenAPI documentation for the gateway's browser-facing API.

use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::models::{
    auth::{LoginForm, LoginResponse, LogoutResponse},
    groups::{Group, GroupForm, Permission, PermissionForm},
    stats::DashboardStats,
    transactions::{Transaction, TransactionForm, TransactionStatus, TransactionType},
    users::{BalanceUpdateForm, CurrentUser, User, UserForm, UserProfile},
    vendors::{Vendor, VendorForm},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payment Admin Gateway API",
        description = "Authenticated proxy to the payment backend, serving the admin dashboard"
    ),
    servers((url = "/api")),
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::stats::dashboard_stats,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::update_balance,
        handlers::transactions::list_transactions,
        handlers::transactions::get_transaction,
        handlers::transactions::create_transaction,
        handlers::transactions::create_payment,
        handlers::transactions::cancel_transaction,
        handlers::vendors::list_vendors,
        handlers::vendors::get_vendor,
        handlers::vendors::create_vendor,
        handlers::vendors::update_vendor,
        handlers::vendors::delete_vendor,
        handlers::groups::list_groups,
        handlers::groups::get_group,
        handlers::groups::create_group,
        handlers::groups::update_group,
        handlers::groups::delete_group,
        handlers::permissions::list_permissions,
        handlers::permissions::get_permission,
        handlers::permissions::create_permission,
        handlers::permissions::update_permission,
        handlers::permissions::delete_permission,
    ),
    components(schemas(
        LoginForm,
        LoginResponse,
        LogoutResponse,
        CurrentUser,
        User,
        UserProfile,
        UserForm,
        BalanceUpdateForm,
        Transaction,
        TransactionForm,
        TransactionType,
        TransactionStatus,
        Vendor,
        VendorForm,
        Group,
        GroupForm,
        Permission,
        PermissionForm,
        DashboardStats,
    )),
    tags(
        (name = "authentication", description = "Session lifecycle"),
        (name = "dashboard", description = "Aggregate statistics"),
        (name = "users", description = "User management"),
        (name = "transactions", description = "Transactions and payments"),
        (name = "vendors", description = "Vendor management"),
        (name = "groups", description = "Groups and permissions"),
    )
)]
pub struct ApiDoc;
