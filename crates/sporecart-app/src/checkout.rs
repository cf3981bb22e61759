use anyhow::{Context, Result, anyhow, bail};
use sporecart_core::api::{Ack, OrderRequest, RateRequest};
use sporecart_core::cart::{Cart, CartLine};
use sporecart_core::flow::{CheckoutStep, FlowStep, InvalidStateError, StepCursor};
use sporecart_core::rates::{MalformedRateError, ShippingRate};
use sporecart_core::selection::{DefaultPolicy, SelectionError};
use tracing::info;

use crate::App;
use crate::events::{Broadcaster, FlowEvent, SubscriptionId};
use crate::shipping::{RatesLoader, RatesState, ShippingSlot, SlotUpdate};

pub type CheckoutEvent = FlowEvent<CheckoutStep>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutTotals {
    pub item_count: u32,
    pub subtotal: f64,
    pub shipping: Option<f64>,
    pub total: f64,
}

/// State shared by every view of one checkout session.
pub struct CheckoutStore<'a> {
    loader: &'a dyn RatesLoader,
    cursor: StepCursor<CheckoutStep>,
    cart: Cart,
    order_note: String,
    agreed: bool,
    shipping: ShippingSlot,
    listeners: Broadcaster<'a, CheckoutEvent>,
}

impl<'a> CheckoutStore<'a> {
    pub fn new(loader: &'a dyn RatesLoader, policy: DefaultPolicy) -> Self {
        Self {
            loader,
            cursor: StepCursor::new(),
            cart: Cart::new(),
            order_note: String::new(),
            agreed: false,
            shipping: ShippingSlot::new(policy),
            listeners: Broadcaster::default(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CheckoutEvent) + 'a) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn step(&self) -> CheckoutStep {
        self.cursor.current()
    }

    pub fn set_step(&mut self, step: CheckoutStep) -> Result<(), InvalidStateError> {
        let previous = self.cursor.current();
        self.cursor.set(step)?;
        self.on_step_change(previous);
        Ok(())
    }

    pub fn next(&mut self) -> CheckoutStep {
        let previous = self.cursor.current();
        self.cursor.advance();
        self.on_step_change(previous);
        self.cursor.current()
    }

    pub fn prev(&mut self) -> CheckoutStep {
        let previous = self.cursor.current();
        self.cursor.retreat();
        self.on_step_change(previous);
        self.cursor.current()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_to_cart(&mut self, line: CartLine) {
        self.cart.add(line);
        self.emit_cart_changed();
    }

    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        let changed = self.cart.set_quantity(product_id, quantity);
        if changed {
            self.emit_cart_changed();
        }
        changed
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> bool {
        let changed = self.cart.remove(product_id);
        if changed {
            self.emit_cart_changed();
        }
        changed
    }

    pub fn order_note(&self) -> &str {
        &self.order_note
    }

    pub fn set_order_note(&mut self, note: impl Into<String>) {
        self.order_note = note.into();
        self.listeners.emit(FlowEvent::NoteChanged);
    }

    pub fn agreed(&self) -> bool {
        self.agreed
    }

    pub fn set_agreed(&mut self, agreed: bool) {
        self.agreed = agreed;
        self.listeners.emit(FlowEvent::AgreementChanged(agreed));
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

    /// Applies a finished rate fetch, if any, and re-runs default selection.
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

    pub fn totals(&self) -> Result<CheckoutTotals, MalformedRateError> {
        let subtotal = self.cart.subtotal()?;
        let shipping = self.shipping.cost();
        Ok(CheckoutTotals {
            item_count: self.cart.item_count(),
            subtotal,
            shipping,
            total: subtotal + shipping.unwrap_or(0.0),
        })
    }

    pub fn start_over(&mut self) {
        self.cursor.reset();
        self.cart = Cart::new();
        self.order_note.clear();
        self.agreed = false;
        self.shipping.reset();
        self.listeners.emit(FlowEvent::Reset);
    }

    pub(crate) fn order_request(&self) -> Result<OrderRequest> {
        if !self.cursor.is_last() {
            bail!(
                "orders can only be placed from the {} step (current step: {})",
                CheckoutStep::Checkout,
                self.step()
            );
        }
        if self.cart.is_empty() {
            bail!("cart is empty");
        }
        if !self.agreed {
            bail!("terms must be accepted before placing the order");
        }

        let rate = self
            .shipping
            .selected_rate()
            .ok_or_else(|| anyhow!("no shipping option selected"))?;
        let shipping_cost = self
            .shipping
            .cost()
            .ok_or_else(|| anyhow!("shipping cost is not available"))?;

        Ok(OrderRequest {
            lines: self.cart.lines().to_vec(),
            shipping_rate_id: rate.object_id.clone(),
            shipping_cost,
            order_note: self.order_note.trim().to_string(),
        })
    }

    pub(crate) fn complete_order(&mut self, ack: &Ack) {
        info!(order_id = ack.id.as_str(), "order placed");
        self.listeners.emit(FlowEvent::Submitted { id: ack.id.clone() });
        self.start_over();
    }

    fn on_step_change(&mut self, previous: CheckoutStep) {
        let current = self.cursor.current();
        if current == previous {
            return;
        }

        info!(from = previous.label(), to = current.label(), "checkout step changed");
        self.listeners.emit(FlowEvent::StepChanged(current));

        if current == CheckoutStep::Shipping {
            let request = RateRequest::Cart {
                lines: self.cart.lines().to_vec(),
            };
            let token = self.shipping.request(self.loader, request);
            self.listeners.emit(FlowEvent::RatesRequested { token });
        }
    }

    fn emit_cart_changed(&mut self) {
        let item_count = self.cart.item_count();
        self.listeners.emit(FlowEvent::CartChanged { item_count });
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
    pub fn place_order(&self, store: &mut CheckoutStore<'_>) -> Result<Ack> {
        let request = store.order_request()?;
        let ack = self
            .api
            .place_order(&request)
            .context("failed to place order")?;
        store.complete_order(&ack);
        Ok(ack)
    }
}
