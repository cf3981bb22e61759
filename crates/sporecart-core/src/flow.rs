use std::fmt;

use thiserror::Error;

/// A named step in a multi-step flow. `SEQUENCE` lists every step in order;
/// the first element is the initial step and the last one is terminal.
pub trait FlowStep: Copy + Eq + fmt::Debug + 'static {
    const SEQUENCE: &'static [Self];

    fn label(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step '{step}' is not part of the {flow} sequence")]
pub struct InvalidStateError {
    pub flow: &'static str,
    pub step: String,
}

fn position<S: Copy + Eq + fmt::Debug>(
    steps: &[S],
    current: S,
) -> Result<usize, InvalidStateError> {
    steps
        .iter()
        .position(|step| *step == current)
        .ok_or_else(|| InvalidStateError {
            flow: std::any::type_name::<S>()
                .rsplit("::")
                .next()
                .unwrap_or("flow"),
            step: format!("{current:?}"),
        })
}

/// Returns the step after `current`, staying on the last step.
pub fn next<S: Copy + Eq + fmt::Debug>(steps: &[S], current: S) -> Result<S, InvalidStateError> {
    let index = position(steps, current)?;
    Ok(steps[(index + 1).min(steps.len() - 1)])
}

/// Returns the step before `current`, staying on the first step.
pub fn prev<S: Copy + Eq + fmt::Debug>(steps: &[S], current: S) -> Result<S, InvalidStateError> {
    let index = position(steps, current)?;
    Ok(steps[index.saturating_sub(1)])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCursor<S: FlowStep> {
    index: usize,
    current: S,
}

impl<S: FlowStep> Default for StepCursor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FlowStep> StepCursor<S> {
    pub fn new() -> Self {
        Self {
            index: 0,
            current: S::SEQUENCE[0],
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set(&mut self, step: S) -> Result<(), InvalidStateError> {
        self.index = position(S::SEQUENCE, step)?;
        self.current = step;
        Ok(())
    }

    pub fn advance(&mut self) -> S {
        self.index = (self.index + 1).min(S::SEQUENCE.len() - 1);
        self.current = S::SEQUENCE[self.index];
        self.current
    }

    pub fn retreat(&mut self) -> S {
        self.index = self.index.saturating_sub(1);
        self.current = S::SEQUENCE[self.index];
        self.current
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == S::SEQUENCE.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStep {
    Cart,
    Shipping,
    OrderNotifications,
    Checkout,
}

impl FlowStep for CheckoutStep {
    const SEQUENCE: &'static [Self] = &[
        Self::Cart,
        Self::Shipping,
        Self::OrderNotifications,
        Self::Checkout,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Shipping => "shipping",
            Self::OrderNotifications => "order_notifications",
            Self::Checkout => "checkout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnStep {
    Reason,
    Items,
    ShippingOption,
    Confirmation,
}

impl FlowStep for ReturnStep {
    const SEQUENCE: &'static [Self] = &[
        Self::Reason,
        Self::Items,
        Self::ShippingOption,
        Self::Confirmation,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Reason => "reason",
            Self::Items => "items",
            Self::ShippingOption => "shipping_option",
            Self::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ReturnStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
