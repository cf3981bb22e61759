use std::collections::VecDeque;
use std::sync::Mutex;

use sporecart_core::api::{
    Ack, ApiError, OrderRequest, RateRequest, ReplyRequest, ReturnRequest, StorefrontApi,
};
use sporecart_core::cart::CartLine;
use sporecart_core::rates::ShippingRate;
use sporecart_core::returns::{ReturnRecord, ReturnStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ShippingRates(RateRequest),
    Returns,
    UpdateReturnStatus { id: String, status: ReturnStatus },
    PlaceOrder(OrderRequest),
    SubmitReturn(ReturnRequest),
    PostReply(ReplyRequest),
    Logout,
}

#[derive(Default)]
pub struct RecordingApi {
    rates: Mutex<VecDeque<Result<Vec<ShippingRate>, ApiError>>>,
    returns: Mutex<VecDeque<Result<Vec<ReturnRecord>, ApiError>>>,
    acks: Mutex<VecDeque<Result<Ack, ApiError>>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(self, result: Result<Vec<ShippingRate>, ApiError>) -> Self {
        self.rates.lock().expect("rates lock").push_back(result);
        self
    }

    pub fn with_returns(self, result: Result<Vec<ReturnRecord>, ApiError>) -> Self {
        self.returns.lock().expect("returns lock").push_back(result);
        self
    }

    pub fn with_ack(self, result: Result<Ack, ApiError>) -> Self {
        self.acks.lock().expect("acks lock").push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn next_ack(&self) -> Result<Ack, ApiError> {
        self.acks
            .lock()
            .expect("acks lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("missing scripted ack".to_string())))
    }
}

impl StorefrontApi for RecordingApi {
    fn shipping_rates(&self, request: &RateRequest) -> Result<Vec<ShippingRate>, ApiError> {
        self.record(Call::ShippingRates(request.clone()));
        self.rates
            .lock()
            .expect("rates lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("missing scripted rates".to_string())))
    }

    fn returns(&self) -> Result<Vec<ReturnRecord>, ApiError> {
        self.record(Call::Returns);
        self.returns
            .lock()
            .expect("returns lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("missing scripted returns".to_string())))
    }

    fn update_return_status(&self, return_id: &str, status: ReturnStatus) -> Result<Ack, ApiError> {
        self.record(Call::UpdateReturnStatus {
            id: return_id.to_string(),
            status,
        });
        self.next_ack()
    }

    fn place_order(&self, request: &OrderRequest) -> Result<Ack, ApiError> {
        self.record(Call::PlaceOrder(request.clone()));
        self.next_ack()
    }

    fn submit_return(&self, request: &ReturnRequest) -> Result<Ack, ApiError> {
        self.record(Call::SubmitReturn(request.clone()));
        self.next_ack()
    }

    fn post_reply(&self, request: &ReplyRequest) -> Result<Ack, ApiError> {
        self.record(Call::PostReply(request.clone()));
        self.next_ack()
    }

    fn logout(&self) -> Result<(), ApiError> {
        self.record(Call::Logout);
        self.next_ack().map(|_| ())
    }
}

pub fn rate(id: &str, amount: &str) -> ShippingRate {
    ShippingRate {
        object_id: id.to_string(),
        provider: "USPS".to_string(),
        service: format!("service-{id}"),
        amount: amount.to_string(),
        estimated_days: Some(3),
    }
}

pub fn line(product_id: &str, price: &str, quantity: u32) -> CartLine {
    CartLine {
        product_id: product_id.to_string(),
        name: format!("{product_id} kit"),
        unit_price: price.to_string(),
        quantity,
    }
}

pub fn ack(id: &str) -> Result<Ack, ApiError> {
    Ok(Ack { id: id.to_string() })
}
