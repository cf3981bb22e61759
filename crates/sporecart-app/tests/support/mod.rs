use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use sporecart_core::api::{
    Ack, ApiError, OrderRequest, RateRequest, ReplyRequest, ReturnRequest, StorefrontApi,
};
use sporecart_core::cart::CartLine;
use sporecart_core::rates::ShippingRate;
use sporecart_core::returns::{ReturnRecord, ReturnStatus};

#[allow(dead_code)]
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

#[derive(Default)]
pub struct QueueApi {
    rates: Mutex<VecDeque<Result<Vec<ShippingRate>, ApiError>>>,
    returns: Mutex<VecDeque<Result<Vec<ReturnRecord>, ApiError>>>,
    acks: Mutex<VecDeque<Result<Ack, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

impl QueueApi {
    #[allow(dead_code)]
    pub fn new(
        rates: Vec<Result<Vec<ShippingRate>, ApiError>>,
        acks: Vec<Result<Ack, ApiError>>,
    ) -> Self {
        Self {
            rates: Mutex::new(rates.into()),
            returns: Mutex::new(VecDeque::new()),
            acks: Mutex::new(acks.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().expect("calls lock").push(call.to_string());
    }

    fn next_ack(&self) -> Result<Ack, ApiError> {
        self.acks
            .lock()
            .expect("acks lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("missing scripted ack".to_string())))
    }
}

impl StorefrontApi for QueueApi {
    fn shipping_rates(&self, _request: &RateRequest) -> Result<Vec<ShippingRate>, ApiError> {
        self.record("shipping_rates");
        self.rates
            .lock()
            .expect("rates lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("missing scripted rates".to_string())))
    }

    fn returns(&self) -> Result<Vec<ReturnRecord>, ApiError> {
        self.record("returns");
        self.returns
            .lock()
            .expect("returns lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("missing scripted returns".to_string())))
    }

    fn update_return_status(&self, _return_id: &str, _status: ReturnStatus) -> Result<Ack, ApiError> {
        self.record("update_return_status");
        self.next_ack()
    }

    fn place_order(&self, _request: &OrderRequest) -> Result<Ack, ApiError> {
        self.record("place_order");
        self.next_ack()
    }

    fn submit_return(&self, _request: &ReturnRequest) -> Result<Ack, ApiError> {
        self.record("submit_return");
        self.next_ack()
    }

    fn post_reply(&self, _request: &ReplyRequest) -> Result<Ack, ApiError> {
        self.record("post_reply");
        self.next_ack()
    }

    fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        self.next_ack().map(|_| ())
    }
}

#[allow(dead_code)]
pub fn rate(id: &str, amount: &str) -> ShippingRate {
    ShippingRate {
        object_id: id.to_string(),
        provider: "UPS".to_string(),
        service: "Ground".to_string(),
        amount: amount.to_string(),
        estimated_days: None,
    }
}

#[allow(dead_code)]
pub fn line(product_id: &str, price: &str, quantity: u32) -> CartLine {
    CartLine {
        product_id: product_id.to_string(),
        name: product_id.to_string(),
        unit_price: price.to_string(),
        quantity,
    }
}

#[allow(dead_code)]
pub fn ack(id: &str) -> Result<Ack, ApiError> {
    Ok(Ack { id: id.to_string() })
}

#[allow(dead_code)]
pub fn write_config(home: &Path, extra: &str) {
    let config_dir = home.join(".config").join("sporecart");
    fs::create_dir_all(&config_dir).expect("create config dir");

    let mut config = r#"
version = 1

[api]
base_url = "https://shop.example.test/api"
"#
    .to_string();
    config.push_str(extra);

    fs::write(config_dir.join("config.toml"), config).expect("write config");
}
