use sporecart_core::flow::FlowStep;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent<S: FlowStep> {
    StepChanged(S),
    NoteChanged,
    AgreementChanged(bool),
    CartChanged { item_count: u32 },
    ItemsChanged { count: usize },
    RatesRequested { token: u64 },
    RatesLoaded { count: usize },
    RatesFailed(String),
    RateSelected { rate_id: String, cost: f64 },
    Submitted { id: String },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener<'a, E> = Box<dyn FnMut(&E) + 'a>;

/// Synchronous fan-out to every subscriber, in subscription order.
pub struct Broadcaster<'a, E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<'a, E>)>,
}

impl<E> Default for Broadcaster<'_, E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<'a, E> Broadcaster<'a, E> {
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'a) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: E) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
