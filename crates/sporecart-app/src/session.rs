use anyhow::{Context, Result, bail};
use sporecart_core::selection::DefaultPolicy;
use tracing::debug;

use crate::App;
use crate::checkout::CheckoutStore;
use crate::return_flow::ReturnFlowStore;
use crate::shipping::RatesLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowPolicies {
    pub checkout: DefaultPolicy,
    pub returns: DefaultPolicy,
}

impl Default for FlowPolicies {
    fn default() -> Self {
        Self {
            checkout: DefaultPolicy::First,
            returns: DefaultPolicy::Cheapest,
        }
    }
}

/// Owns the flow stores mounted for one signed-in session. Each flow type has
/// at most one live store; unmounting drops it along with any pending fetch.
pub struct FlowSession<'a> {
    loader: &'a dyn RatesLoader,
    policies: FlowPolicies,
    checkout: Option<CheckoutStore<'a>>,
    return_flow: Option<ReturnFlowStore<'a>>,
}

impl<'a> FlowSession<'a> {
    pub fn new(loader: &'a dyn RatesLoader, policies: FlowPolicies) -> Self {
        Self {
            loader,
            policies,
            checkout: None,
            return_flow: None,
        }
    }

    pub fn policies(&self) -> FlowPolicies {
        self.policies
    }

    pub fn mount_checkout(&mut self) -> Result<&mut CheckoutStore<'a>> {
        if self.checkout.is_some() {
            bail!("a checkout flow is already mounted for this session");
        }
        debug!("mounting checkout flow");
        Ok(self
            .checkout
            .insert(CheckoutStore::new(self.loader, self.policies.checkout)))
    }

    pub fn checkout(&mut self) -> Option<&mut CheckoutStore<'a>> {
        self.checkout.as_mut()
    }

    pub fn unmount_checkout(&mut self) -> bool {
        self.checkout.take().is_some()
    }

    pub fn mount_return(&mut self, order_id: &str) -> Result<&mut ReturnFlowStore<'a>> {
        if let Some(existing) = &self.return_flow {
            bail!(
                "a return flow for order '{}' is already mounted for this session",
                existing.order_id()
            );
        }
        debug!(order_id, "mounting return flow");
        Ok(self.return_flow.insert(ReturnFlowStore::new(
            self.loader,
            order_id,
            self.policies.returns,
        )))
    }

    pub fn return_flow(&mut self) -> Option<&mut ReturnFlowStore<'a>> {
        self.return_flow.as_mut()
    }

    pub fn unmount_return(&mut self) -> bool {
        self.return_flow.take().is_some()
    }

    pub fn unmount_all(&mut self) {
        self.checkout = None;
        self.return_flow = None;
    }
}

impl<'a> App<'a> {
    /// Signs out remotely and tears down every mounted flow.
    pub fn logout(&self, session: &mut FlowSession<'_>) -> Result<()> {
        self.api.logout().context("failed to log out")?;
        session.unmount_all();
        Ok(())
    }
}
