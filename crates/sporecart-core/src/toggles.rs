use std::collections::BTreeSet;

/// Reply-form and thread expansion state for a feedback view.
///
/// At most one reply form is open at a time. Expanded threads are an
/// independent set with no size limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleSet {
    open_reply: Option<String>,
    expanded: BTreeSet<String>,
}

impl ToggleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_open(&mut self, id: &str) {
        if self.open_reply.as_deref() == Some(id) {
            self.open_reply = None;
        } else {
            self.open_reply = Some(id.to_string());
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open_reply.as_deref() == Some(id)
    }

    pub fn open_reply(&self) -> Option<&str> {
        self.open_reply.as_deref()
    }

    pub fn close_reply(&mut self) {
        self.open_reply = None;
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }
}
