use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use sporecart_core::api::{ApiError, RateRequest, StorefrontApi};
use sporecart_core::rates::ShippingRate;
use sporecart_core::selection::{DefaultPolicy, RateSelection, SelectionError};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct RatesLoaded {
    pub token: u64,
    pub result: Result<Vec<ShippingRate>, ApiError>,
}

pub trait RatesLoader {
    fn spawn_fetch(&self, request: RateRequest, token: u64) -> Receiver<RatesLoaded>;
}

/// Fetches on a background thread. The result is dropped if the receiving
/// slot was torn down or moved on to a newer fetch.
pub struct ThreadedRatesLoader {
    api: Arc<dyn StorefrontApi>,
}

impl ThreadedRatesLoader {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }
}

impl RatesLoader for ThreadedRatesLoader {
    fn spawn_fetch(&self, request: RateRequest, token: u64) -> Receiver<RatesLoaded> {
        let (sender, receiver) = mpsc::channel();
        let api = Arc::clone(&self.api);
        std::thread::spawn(move || {
            let result = api.shipping_rates(&request);
            let _ = sender.send(RatesLoaded { token, result });
        });
        receiver
    }
}

/// Fetches inline; the result is ready on the first poll.
pub struct ImmediateRatesLoader<'a> {
    api: &'a dyn StorefrontApi,
}

impl<'a> ImmediateRatesLoader<'a> {
    pub fn new(api: &'a dyn StorefrontApi) -> Self {
        Self { api }
    }
}

impl RatesLoader for ImmediateRatesLoader<'_> {
    fn spawn_fetch(&self, request: RateRequest, token: u64) -> Receiver<RatesLoaded> {
        let (sender, receiver) = mpsc::channel();
        let result = self.api.shipping_rates(&request);
        let _ = sender.send(RatesLoaded { token, result });
        receiver
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatesState {
    Idle,
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotUpdate {
    Unchanged,
    Loaded {
        count: usize,
        selection_changed: bool,
    },
    Failed(String),
}

/// Rate collection, default selection and the in-flight fetch for one flow.
pub struct ShippingSlot {
    policy: DefaultPolicy,
    rates: Vec<ShippingRate>,
    state: RatesState,
    selection: RateSelection,
    latest_token: u64,
    inflight: Option<Receiver<RatesLoaded>>,
    warnings: Vec<String>,
}

impl ShippingSlot {
    pub fn new(policy: DefaultPolicy) -> Self {
        Self {
            policy,
            rates: Vec::new(),
            state: RatesState::Idle,
            selection: RateSelection::new(),
            latest_token: 0,
            inflight: None,
            warnings: Vec::new(),
        }
    }

    pub fn policy(&self) -> DefaultPolicy {
        self.policy
    }

    pub fn rates(&self) -> &[ShippingRate] {
        &self.rates
    }

    pub fn state(&self) -> &RatesState {
        &self.state
    }

    pub fn selection(&self) -> &RateSelection {
        &self.selection
    }

    pub fn selected_rate(&self) -> Option<&ShippingRate> {
        self.selection.selected_rate(&self.rates)
    }

    pub fn cost(&self) -> Option<f64> {
        self.selection.cost()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    /// Issues a new fetch. Any fetch still in flight is superseded.
    pub fn request(&mut self, loader: &dyn RatesLoader, request: RateRequest) -> u64 {
        self.latest_token += 1;
        let token = self.latest_token;
        if self.inflight.is_some() {
            debug!(token, "superseding in-flight shipping rate fetch");
        }
        self.inflight = Some(loader.spawn_fetch(request, token));
        self.state = RatesState::Pending;
        self.warnings.clear();
        token
    }

    pub fn poll(&mut self) -> SlotUpdate {
        loop {
            let Some(receiver) = self.inflight.as_ref() else {
                return SlotUpdate::Unchanged;
            };

            match receiver.try_recv() {
                Ok(event) if event.token != self.latest_token => {
                    debug!(
                        token = event.token,
                        latest = self.latest_token,
                        "discarding stale shipping rate response"
                    );
                }
                Ok(event) => {
                    self.inflight = None;
                    return self.apply(event.result);
                }
                Err(TryRecvError::Empty) => return SlotUpdate::Unchanged,
                Err(TryRecvError::Disconnected) => {
                    self.inflight = None;
                    return self.fail("rate fetch ended without a result".to_string());
                }
            }
        }
    }

    pub fn select(&mut self, rate_id: &str) -> Result<(), SelectionError> {
        self.selection.select(&self.rates, rate_id)
    }

    /// Drops the collection, the selection and any in-flight fetch.
    pub fn reset(&mut self) {
        *self = Self {
            latest_token: self.latest_token,
            ..Self::new(self.policy)
        };
    }

    fn apply(&mut self, result: Result<Vec<ShippingRate>, ApiError>) -> SlotUpdate {
        let rates = match result {
            Ok(rates) => rates,
            Err(error) => return self.fail(error.to_string()),
        };

        self.rates = rates;
        self.state = RatesState::Ready;
        let outcome = self.selection.synchronize(&self.rates, self.policy);
        self.warnings.extend(
            outcome
                .skipped
                .iter()
                .map(|error| format!("ignored shipping option: {error}")),
        );

        SlotUpdate::Loaded {
            count: self.rates.len(),
            selection_changed: outcome.changed,
        }
    }

    fn fail(&mut self, message: String) -> SlotUpdate {
        warn!(error = message.as_str(), "shipping rate fetch failed");
        self.state = RatesState::Failed(message.clone());
        self.warnings
            .push(format!("could not load shipping options: {message}"));
        SlotUpdate::Failed(message)
    }
}
