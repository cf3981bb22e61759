pub mod checkout;
pub mod events;
pub mod feedback;
pub mod return_flow;
pub mod returns_board;
pub mod session;
pub mod shipping;
#[cfg(test)]
pub(crate) mod test_support;

use anyhow::{Context, Result, anyhow, bail};
use sporecart_core::api::StorefrontApi;
use sporecart_core::config::{SporecartConfig, load_config, resolve_config_path};
use sporecart_core::doctor::{DoctorReport, run_doctor};
use tracing::debug;

pub use checkout::{CheckoutEvent, CheckoutStore, CheckoutTotals};
pub use events::{FlowEvent, SubscriptionId};
pub use feedback::FeedbackThread;
pub use return_flow::{ReturnEvent, ReturnFlowStore};
pub use returns_board::ReturnsBoard;
pub use session::{FlowPolicies, FlowSession};
pub use shipping::{
    ImmediateRatesLoader, RatesLoaded, RatesLoader, RatesState, ShippingSlot, SlotUpdate,
    ThreadedRatesLoader,
};

pub struct App<'a> {
    pub api: &'a dyn StorefrontApi,
}

impl<'a> App<'a> {
    pub fn new(api: &'a dyn StorefrontApi) -> Self {
        Self { api }
    }

    pub fn doctor(&self) -> Result<DoctorReport> {
        Ok(run_doctor())
    }

    pub fn ensure_config_ready(&self) -> Result<SporecartConfig> {
        let config_path = resolve_config_path().context("failed to resolve config path")?;

        if !config_path.exists() {
            bail!(
                "missing config at {}\nCreate ~/.config/sporecart/config.toml and see README.md for setup instructions.",
                config_path.display()
            );
        }

        load_config(&config_path).map_err(|error| {
            anyhow!(
                "invalid config at {}: {error}\nFix the config and retry. See README.md for setup instructions.",
                config_path.display()
            )
        })
    }

    /// Default-selection policies from the config file, or the built-in
    /// defaults when no config file exists yet.
    pub fn flow_policies(&self) -> Result<FlowPolicies> {
        let config_path = resolve_config_path().context("failed to resolve config path")?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "no config file; using default rate policies");
            return Ok(FlowPolicies::default());
        }

        let config = self.ensure_config_ready()?;
        Ok(FlowPolicies {
            checkout: config.checkout.default_rate,
            returns: config.returns.default_rate,
        })
    }
}
