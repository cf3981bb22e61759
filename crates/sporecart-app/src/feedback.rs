use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use sporecart_core::api::{Ack, ReplyRequest};
use sporecart_core::toggles::ToggleSet;

use crate::App;

/// Review/Q&A thread view: one open reply form plus expanded threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackThread {
    toggles: ToggleSet,
    draft: String,
}

impl FeedbackThread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening a different reply form discards the current draft.
    pub fn toggle_reply(&mut self, id: &str) {
        if !self.toggles.is_open(id) {
            self.draft.clear();
        }
        self.toggles.toggle_open(id);
    }

    pub fn is_reply_open(&self, id: &str) -> bool {
        self.toggles.is_open(id)
    }

    pub fn open_reply(&self) -> Option<&str> {
        self.toggles.open_reply()
    }

    pub fn toggle_thread(&mut self, id: &str) {
        self.toggles.toggle_expanded(id);
    }

    pub fn is_thread_expanded(&self, id: &str) -> bool {
        self.toggles.is_expanded(id)
    }

    pub fn expanded_threads(&self) -> &BTreeSet<String> {
        self.toggles.expanded()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, body: impl Into<String>) {
        self.draft = body.into();
    }
}

impl<'a> App<'a> {
    pub fn post_reply(&self, thread: &mut FeedbackThread) -> Result<Ack> {
        let Some(parent_id) = thread.open_reply().map(str::to_string) else {
            bail!("no reply form is open");
        };

        let body = thread.draft().trim().to_string();
        if body.is_empty() {
            bail!("reply cannot be empty");
        }

        let ack = self
            .api
            .post_reply(&ReplyRequest {
                parent_id: parent_id.clone(),
                body,
            })
            .with_context(|| format!("failed to post reply to '{parent_id}'"))?;

        thread.toggles.close_reply();
        thread.draft.clear();
        Ok(ack)
    }
}
