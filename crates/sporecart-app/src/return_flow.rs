use std::collections::BTreeSet;

use anyhow::{Context, Result, anyhow, bail};
use sporecart_core::api::{Ack, RateRequest, ReturnRequest};
use sporecart_core::flow::{FlowStep, InvalidStateError, ReturnStep, StepCursor};
use sporecart_core::rates::ShippingRate;
use sporecart_core::selection::{DefaultPolicy, SelectionError};
use tracing::info;

use crate::App;
use crate::events::{Broadcaster, FlowEvent, SubscriptionId};
use crate::shipping::{RatesLoader, RatesState, ShippingSlot, SlotUpdate};

pub type ReturnEvent = FlowEvent<ReturnStep>;

/// State shared by the views of one return request for a single order.
pub struct ReturnFlowStore<'a> {
    loader: &'a dyn RatesLoader,
    order_id: String,
    cursor: StepCursor<ReturnStep>,
    reason: String,
    line_ids: BTreeSet<String>,
    shipping: ShippingSlot,
    listeners: Broadcaster<'a, ReturnEvent>,
}

impl<'a> ReturnFlowStore<'a> {
    pub fn new(loader: &'a dyn RatesLoader, order_id: impl Into<String>, policy: DefaultPolicy) -> Self {
        Self {
            loader,
            order_id: order_id.into(),
            cursor: StepCursor::new(),
            reason: String::new(),
            line_ids: BTreeSet::new(),
            shipping: ShippingSlot::new(policy),
            listeners: Broadcaster::default(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ReturnEvent) + 'a) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn step(&self) -> ReturnStep {
        self.cursor.current()
    }

    pub fn set_step(&mut self, step: ReturnStep) -> Result<(), InvalidStateError> {
        let previous = self.cursor.current();
        self.cursor.set(step)?;
        self.on_step_change(previous);
        Ok(())
    }

    pub fn next(&mut self) -> ReturnStep {
        let previous = self.cursor.current();
        self.cursor.advance();
        self.on_step_change(previous);
        self.cursor.current()
    }

    pub fn prev(&mut self) -> ReturnStep {
        let previous = self.cursor.current();
        self.cursor.retreat();
        self.on_step_change(previous);
        self.cursor.current()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
        self.listeners.emit(FlowEvent::NoteChanged);
    }

    pub fn line_ids(&self) -> &BTreeSet<String> {
        &self.line_ids
    }

    pub fn toggle_line(&mut self, line_id: &str) {
        if !self.line_ids.remove(line_id) {
            self.line_ids.insert(line_id.to_string());
        }
        self.listeners.emit(FlowEvent::ItemsChanged {
            count: self.line_ids.len(),
        });
    }

    pub fn rates(&self) -> &[ShippingRate] {
        self.shipping.rates()
    }

    pub fn rates_state(&self) -> &RatesState {
        self.shipping.state()
    }

    pub fn selected_rate(&self) -> Option<&ShippingRate> {
        self.shipping.selected_rate()
    }

    pub fn shipping_cost(&self) -> Option<f64> {
        self.shipping.cost()
    }

    pub fn warnings(&self) -> &[String] {
        self.shipping.warnings()
    }

    pub fn select_rate(&mut self, rate_id: &str) -> Result<(), SelectionError> {
        self.shipping.select(rate_id)?;
        self.emit_selection();
        Ok(())
    }

    pub fn poll_rates(&mut self) -> SlotUpdate {
        let update = self.shipping.poll();
        match &update {
            SlotUpdate::Unchanged => {}
            SlotUpdate::Loaded {
                count,
                selection_changed,
            } => {
                self.listeners
                    .emit(FlowEvent::RatesLoaded { count: *count });
                if *selection_changed {
                    self.emit_selection();
                }
            }
            SlotUpdate::Failed(message) => {
                self.listeners.emit(FlowEvent::RatesFailed(message.clone()));
            }
        }
        update
    }

    pub fn start_over(&mut self) {
        self.cursor.reset();
        self.reason.clear();
        self.line_ids.clear();
        self.shipping.reset();
        self.listeners.emit(FlowEvent::Reset);
    }

    pub(crate) fn return_request(&self) -> Result<ReturnRequest> {
        if !self.cursor.is_last() {
            bail!(
                "returns can only be submitted from the {} step (current step: {})",
                ReturnStep::Confirmation,
                self.step()
            );
        }
        let reason = self.reason.trim();
        if reason.is_empty() {
            bail!("a return reason is required");
        }
        if self.line_ids.is_empty() {
            bail!("select at least one item to return");
        }

        let rate = self
            .shipping
            .selected_rate()
            .ok_or_else(|| anyhow!("no return shipping option selected"))?;
        let shipping_cost = self
            .shipping
            .cost()
            .ok_or_else(|| anyhow!("return shipping cost is not available"))?;

        Ok(ReturnRequest {
            order_id: self.order_id.clone(),
            line_ids: self.line_ids.iter().cloned().collect(),
            reason: reason.to_string(),
            shipping_rate_id: rate.object_id.clone(),
            shipping_cost,
        })
    }

    pub(crate) fn complete_return(&mut self, ack: &Ack) {
        info!(
            order_id = self.order_id.as_str(),
            return_id = ack.id.as_str(),
            "return submitted"
        );
        self.listeners.emit(FlowEvent::Submitted { id: ack.id.clone() });
        self.start_over();
    }

    fn on_step_change(&mut self, previous: ReturnStep) {
        let current = self.cursor.current();
        if current == previous {
            return;
        }

        info!(from = previous.label(), to = current.label(), "return step changed");
        self.listeners.emit(FlowEvent::StepChanged(current));

        if current == ReturnStep::ShippingOption {
            let request = RateRequest::Return {
                order_id: self.order_id.clone(),
                line_ids: self.line_ids.iter().cloned().collect(),
            };
            let token = self.shipping.request(self.loader, request);
            self.listeners.emit(FlowEvent::RatesRequested { token });
        }
    }

    fn emit_selection(&mut self) {
        let selected = self
            .shipping
            .selection()
            .selected()
            .map(str::to_string)
            .zip(self.shipping.cost());
        if let Some((rate_id, cost)) = selected {
            self.listeners
                .emit(FlowEvent::RateSelected { rate_id, cost });
        }
    }
}

impl<'a> App<'a> {
    pub fn submit_return(&self, store: &mut ReturnFlowStore<'_>) -> Result<Ack> {
        let request = store.return_request()?;
        let ack = self
            .api
            .submit_return(&request)
            .with_context(|| format!("failed to submit return for order '{}'", request.order_id))?;
        store.complete_return(&ack);
        Ok(ack)
    }
}
