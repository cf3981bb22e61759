use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLine;
use crate::rates::ShippingRate;
use crate::returns::{ReturnRecord, ReturnStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("storefront API unreachable: {0}")]
    Network(String),
    #[error("storefront API rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "context", rename_all = "snake_case")]
pub enum RateRequest {
    Cart { lines: Vec<CartLine> },
    Return { order_id: String, line_ids: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub lines: Vec<CartLine>,
    pub shipping_rate_id: String,
    pub shipping_cost: f64,
    pub order_note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub order_id: String,
    pub line_ids: Vec<String>,
    pub reason: String,
    pub shipping_rate_id: String,
    pub shipping_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub parent_id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub id: String,
}

/// The remote storefront backend. Implementations own transport, auth and
/// payload shape; callers only see these operations.
pub trait StorefrontApi: Send + Sync {
    fn shipping_rates(&self, request: &RateRequest) -> Result<Vec<ShippingRate>, ApiError>;

    fn returns(&self) -> Result<Vec<ReturnRecord>, ApiError>;

    fn update_return_status(&self, return_id: &str, status: ReturnStatus) -> Result<Ack, ApiError>;

    fn place_order(&self, request: &OrderRequest) -> Result<Ack, ApiError>;

    fn submit_return(&self, request: &ReturnRequest) -> Result<Ack, ApiError>;

    fn post_reply(&self, request: &ReplyRequest) -> Result<Ack, ApiError>;

    fn logout(&self) -> Result<(), ApiError>;
}
