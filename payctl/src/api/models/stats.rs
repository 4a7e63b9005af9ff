//! Dashboard statistics mirror.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::transactions::Transaction;

/// Aggregate figures rendered on the dashboard landing page. Relayed
/// verbatim from the backend aggregation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_vendors: i64,
    pub total_transactions: i64,
    pub total_amount: Decimal,
    #[serde(default)]
    pub transactions_by_type: HashMap<String, i64>,
    #[serde(default)]
    pub transactions_by_status: HashMap<String, i64>,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
}
