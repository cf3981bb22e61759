use std::cmp::Reverse;

use anyhow::{Context, Result, anyhow};
use sporecart_core::returns::{ReturnRecord, ReturnStatus};
use sporecart_core::time::parse_rfc3339;
use tracing::{info, warn};

use crate::App;

/// The account area's list of returns, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnsBoard {
    returns: Vec<ReturnRecord>,
    warning: Option<String>,
}

impl ReturnsBoard {
    /// Unparseable `updated_at` stamps sort after every dated record.
    pub fn from_records(mut returns: Vec<ReturnRecord>) -> Self {
        returns.sort_by_cached_key(|record| Reverse(parse_rfc3339(&record.updated_at)));
        Self {
            returns,
            warning: None,
        }
    }

    pub fn unavailable(message: String) -> Self {
        Self {
            returns: Vec::new(),
            warning: Some(message),
        }
    }

    pub fn returns(&self) -> &[ReturnRecord] {
        &self.returns
    }

    pub fn find(&self, return_id: &str) -> Option<&ReturnRecord> {
        self.returns.iter().find(|record| record.id == return_id)
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    fn apply_status(
        &mut self,
        return_id: &str,
        status: ReturnStatus,
        updated_at: String,
    ) -> Result<ReturnRecord> {
        let record = self
            .returns
            .iter_mut()
            .find(|record| record.id == return_id)
            .ok_or_else(|| anyhow!("return '{return_id}' is not in the list"))?;

        let previous = record.clone();
        record.status = record.status.transition(status)?;
        record.updated_at = updated_at;
        Ok(previous)
    }

    fn restore(&mut self, previous: ReturnRecord) {
        if let Some(record) = self
            .returns
            .iter_mut()
            .find(|record| record.id == previous.id)
        {
            *record = previous;
        }
    }
}

impl<'a> App<'a> {
    /// Loads returns; a failed fetch yields an empty board carrying a warning.
    pub fn load_returns(&self) -> ReturnsBoard {
        match self.api.returns() {
            Ok(records) => ReturnsBoard::from_records(records),
            Err(error) => {
                warn!(%error, "failed to load returns");
                ReturnsBoard::unavailable(format!("could not load returns: {error}"))
            }
        }
    }

    /// Applies the status locally first, then confirms with the API. The local
    /// change is reverted when the API call fails.
    pub fn change_return_status(
        &self,
        board: &mut ReturnsBoard,
        return_id: &str,
        status: ReturnStatus,
    ) -> Result<()> {
        let updated_at = sporecart_core::time::now_utc_rfc3339()
            .map_err(|error| anyhow!("failed to format timestamp: {error}"))?;
        let previous = board.apply_status(return_id, status, updated_at)?;

        match self.api.update_return_status(return_id, status) {
            Ok(_) => {
                info!(return_id, %status, "return status updated");
                Ok(())
            }
            Err(error) => {
                let from = previous.status;
                board.restore(previous);
                Err(error).with_context(|| {
                    format!("failed to move return '{return_id}' from {from} to {status}")
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sporecart_core::api::ApiError;

    use super::*;
    use crate::test_support::{Call, RecordingApi, ack};

    fn record(id: &str, status: ReturnStatus, updated_at: &str) -> ReturnRecord {
        ReturnRecord {
            id: id.to_string(),
            order_id: Some("order-1".to_string()),
            status,
            reason: None,
            updated_at: updated_at.to_string(),
        }
    }

    #[test]
    fn board_sorts_newest_first() {
        let board = ReturnsBoard::from_records(vec![
            record("old", ReturnStatus::Pending, "2026-01-01T00:00:00Z"),
            record("new", ReturnStatus::Pending, "2026-03-01T00:00:00Z"),
        ]);
        assert_eq!(board.returns()[0].id, "new");
    }

    #[test]
    fn board_orders_by_instant_not_by_text() {
        let board = ReturnsBoard::from_records(vec![
            record("utc", ReturnStatus::Pending, "2026-03-01T10:00:00Z"),
            record("eastern", ReturnStatus::Pending, "2026-03-01T09:00:00-05:00"),
            record("undated", ReturnStatus::Pending, "last week"),
        ]);
        let ids: Vec<&str> = board.returns().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["eastern", "utc", "undated"]);
    }

    #[test]
    fn network_failure_yields_empty_board_with_warning() {
        let api = RecordingApi::new().with_returns(Err(ApiError::Network("offline".to_string())));
        let app = App::new(&api);

        let board = app.load_returns();

        assert!(board.returns().is_empty());
        assert!(board.warning().expect("warning").contains("offline"));
    }

    #[test]
    fn status_change_is_applied_and_confirmed() {
        let api = RecordingApi::new()
            .with_returns(Ok(vec![record(
                "r1",
                ReturnStatus::Pending,
                "2026-01-01T00:00:00Z",
            )]))
            .with_ack(ack("r1"));
        let app = App::new(&api);
        let mut board = app.load_returns();

        app.change_return_status(&mut board, "r1", ReturnStatus::Approved)
            .expect("approved");

        let updated = board.find("r1").expect("record");
        assert_eq!(updated.status, ReturnStatus::Approved);
        assert_ne!(updated.updated_at, "2026-01-01T00:00:00Z");
        assert!(sporecart_core::time::is_rfc3339(&updated.updated_at));
        assert_eq!(
            api.calls()[1],
            Call::UpdateReturnStatus {
                id: "r1".to_string(),
                status: ReturnStatus::Approved
            }
        );
    }

    #[test]
    fn failed_confirmation_reverts_local_change() {
        let api = RecordingApi::new()
            .with_returns(Ok(vec![record(
                "r1",
                ReturnStatus::Pending,
                "2026-01-01T00:00:00Z",
            )]))
            .with_ack(Err(ApiError::Rejected("not allowed".to_string())));
        let app = App::new(&api);
        let mut board = app.load_returns();

        let error = app
            .change_return_status(&mut board, "r1", ReturnStatus::Rejected)
            .expect_err("rejected by api");

        assert!(error.to_string().contains("from pending to rejected"));
        let restored = board.find("r1").expect("record");
        assert_eq!(restored.status, ReturnStatus::Pending);
        assert_eq!(restored.updated_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn invalid_transition_never_reaches_the_api() {
        let api = RecordingApi::new().with_returns(Ok(vec![record(
            "r1",
            ReturnStatus::Completed,
            "2026-01-01T00:00:00Z",
        )]));
        let app = App::new(&api);
        let mut board = app.load_returns();

        let error = app
            .change_return_status(&mut board, "r1", ReturnStatus::Approved)
            .expect_err("terminal");

        assert!(error.to_string().contains("cannot move from completed"));
        assert_eq!(api.calls(), vec![Call::Returns]);
    }
}
