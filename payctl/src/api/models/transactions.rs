//! Mirrors and forms for transaction records.
//!
//! Transaction status is a one-way progression owned by the backend. The
//! gateway never transitions it; even cancellation is just a forwarded
//! request that the backend accepts only for PENDING transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::users::User;
use crate::errors::{Error, Result};
use crate::types::{TransactionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Payment,
    TopUp,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

/// A backend transaction record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: TransactionId,
    pub sender: User,
    pub receiver: User,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create form for a transaction (the sender is implied by the session).
/// The payment endpoint ignores `transaction_type`; the generic create
/// endpoint forwards it when given.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionForm {
    pub receiver_id: UserId,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionForm {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::BadRequest {
                message: "Amount must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
