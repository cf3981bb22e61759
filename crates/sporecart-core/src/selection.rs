//! Default shipping-rate selection.
//!
//! A [`RateSelection`] holds at most one selected rate id plus the cost parsed
//! from that rate. [`RateSelection::synchronize`] fills an empty slot from a
//! freshly loaded collection using a [`DefaultPolicy`] and never overwrites a
//! selection that still refers to a well-formed rate in the collection. A kept
//! selection always takes its cost from the rate's current amount.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::rates::{MalformedRateError, ShippingRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPolicy {
    /// First well-formed rate in collection order.
    #[default]
    First,
    /// Lowest amount; ties go to the earliest rate.
    Cheapest,
}

impl DefaultPolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Cheapest => "cheapest",
        }
    }

    /// Picks the default rate, skipping entries whose amount does not parse.
    pub fn pick<'r>(
        self,
        rates: &'r [ShippingRate],
    ) -> (Option<(&'r ShippingRate, f64)>, Vec<MalformedRateError>) {
        let mut skipped = Vec::new();
        let mut chosen: Option<(&ShippingRate, f64)> = None;

        for rate in rates {
            let amount = match rate.parsed_amount() {
                Ok(amount) => amount,
                Err(error) => {
                    skipped.push(error);
                    continue;
                }
            };

            chosen = match (self, chosen) {
                (_, None) => Some((rate, amount)),
                (Self::First, Some(existing)) => Some(existing),
                (Self::Cheapest, Some((existing, best))) => {
                    if amount < best {
                        Some((rate, amount))
                    } else {
                        Some((existing, best))
                    }
                }
            };
        }

        (chosen, skipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    Default,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("shipping rate '{0}' is not in the loaded collection")]
    UnknownRate(String),
    #[error(transparent)]
    Malformed(#[from] MalformedRateError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub changed: bool,
    pub skipped: Vec<MalformedRateError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSelection {
    selected: Option<String>,
    origin: Option<SelectionOrigin>,
    cost: Option<f64>,
}

impl RateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn origin(&self) -> Option<SelectionOrigin> {
        self.origin
    }

    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn selected_rate<'r>(&self, rates: &'r [ShippingRate]) -> Option<&'r ShippingRate> {
        let id = self.selected.as_deref()?;
        rates.iter().find(|rate| rate.object_id == id)
    }

    pub fn synchronize(&mut self, rates: &[ShippingRate], policy: DefaultPolicy) -> SyncOutcome {
        let mut changed = false;
        if let Some(id) = self.selected.as_deref() {
            match rates.iter().find(|rate| rate.object_id == id) {
                Some(rate) => match rate.parsed_amount() {
                    Ok(amount) => {
                        if self.cost != Some(amount) {
                            debug!(rate_id = id, amount, "selected rate amount changed");
                            self.cost = Some(amount);
                            changed = true;
                        }
                        return SyncOutcome {
                            changed,
                            skipped: Vec::new(),
                        };
                    }
                    Err(error) => {
                        warn!(%error, "selected rate is no longer well-formed; clearing selection");
                    }
                },
                None => {
                    debug!(rate_id = id, "selected rate no longer offered; clearing selection");
                }
            }
            self.clear();
            changed = true;
        }

        if rates.is_empty() {
            return SyncOutcome {
                changed,
                skipped: Vec::new(),
            };
        }

        let (chosen, skipped) = policy.pick(rates);
        for error in &skipped {
            warn!(%error, "skipping malformed shipping rate");
        }

        if let Some((rate, amount)) = chosen {
            debug!(
                rate_id = rate.object_id.as_str(),
                policy = policy.label(),
                "selected default shipping rate"
            );
            self.selected = Some(rate.object_id.clone());
            self.origin = Some(SelectionOrigin::Default);
            self.cost = Some(amount);
            changed = true;
        }

        SyncOutcome { changed, skipped }
    }

    pub fn select(&mut self, rates: &[ShippingRate], id: &str) -> Result<(), SelectionError> {
        let rate = rates
            .iter()
            .find(|rate| rate.object_id == id)
            .ok_or_else(|| SelectionError::UnknownRate(id.to_string()))?;
        let amount = rate.parsed_amount()?;

        self.selected = Some(rate.object_id.clone());
        self.origin = Some(SelectionOrigin::User);
        self.cost = Some(amount);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
