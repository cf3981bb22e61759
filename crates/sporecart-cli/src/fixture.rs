use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use serde::Deserialize;
use sporecart_core::api::{
    Ack, ApiError, OrderRequest, RateRequest, ReplyRequest, ReturnRequest, StorefrontApi,
};
use sporecart_core::cart::CartLine;
use sporecart_core::rates::ShippingRate;
use sporecart_core::returns::{ReturnRecord, ReturnStatus};
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub rates: Vec<ShippingRate>,
    #[serde(default)]
    pub returns: Vec<ReturnRecord>,
    #[serde(default)]
    pub cart: Vec<CartLine>,
}

/// Serves a recorded API snapshot. Mutations are acknowledged with
/// sequential ids and never change the snapshot.
#[derive(Debug)]
pub struct FixtureApi {
    fixture: Fixture,
    next_id: AtomicU64,
}

impl FixtureApi {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture at {}", path.display()))?;
        let fixture: Fixture = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse fixture at {}", path.display()))?;
        Ok(Self::new(fixture))
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.fixture.cart
    }

    fn ack(&self, prefix: &str) -> Ack {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Ack {
            id: format!("{prefix}-{id}"),
        }
    }
}

impl StorefrontApi for FixtureApi {
    fn shipping_rates(&self, request: &RateRequest) -> Result<Vec<ShippingRate>, ApiError> {
        debug!(?request, "serving fixture shipping rates");
        Ok(self.fixture.rates.clone())
    }

    fn returns(&self) -> Result<Vec<ReturnRecord>, ApiError> {
        Ok(self.fixture.returns.clone())
    }

    fn update_return_status(&self, return_id: &str, status: ReturnStatus) -> Result<Ack, ApiError> {
        if !self.fixture.returns.iter().any(|record| record.id == return_id) {
            return Err(ApiError::Rejected(format!(
                "unknown return '{return_id}' (requested {status})"
            )));
        }
        Ok(Ack {
            id: return_id.to_string(),
        })
    }

    fn place_order(&self, _request: &OrderRequest) -> Result<Ack, ApiError> {
        Ok(self.ack("order"))
    }

    fn submit_return(&self, _request: &ReturnRequest) -> Result<Ack, ApiError> {
        Ok(self.ack("return"))
    }

    fn post_reply(&self, _request: &ReplyRequest) -> Result<Ack, ApiError> {
        Ok(self.ack("reply"))
    }

    fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_default_to_empty() {
        let fixture: Fixture = serde_json::from_str("{}").expect("fixture");
        assert!(fixture.rates.is_empty());
        assert!(fixture.returns.is_empty());
        assert!(fixture.cart.is_empty());
    }

    #[test]
    fn acknowledgements_are_sequential() {
        let api = FixtureApi::new(Fixture::default());
        let request = ReplyRequest {
            parent_id: "q".to_string(),
            body: "b".to_string(),
        };
        assert_eq!(api.post_reply(&request).expect("ack").id, "reply-1");
        assert_eq!(api.post_reply(&request).expect("ack").id, "reply-2");
    }

    #[test]
    fn unknown_return_status_update_is_rejected() {
        let api = FixtureApi::new(Fixture::default());
        let error = api
            .update_return_status("nope", ReturnStatus::Approved)
            .expect_err("unknown");
        assert!(error.to_string().contains("unknown return 'nope'"));
    }
}
