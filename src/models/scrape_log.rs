use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::EntityId;
use crate::utils::error::AppError;

/// Audit record for one orchestrated run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapeRunLog {
    pub run_id: Uuid,
    pub source_id: EntityId,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_successful: bool,
    pub items_scraped: usize,
    pub error_message: Option<String>,
}

impl ScrapeRunLog {
    pub fn is_finalized(&self) -> bool {
        self.end_time.is_some()
    }
}

/// A run in progress.
///
/// The only way to get a [`ScrapeRunLog`] out is [`ActiveRun::finish`],
/// which consumes the run, so every log is finalized exactly once.
#[derive(Debug)]
pub struct ActiveRun {
    log: ScrapeRunLog,
}

impl ActiveRun {
    pub fn begin(source_id: EntityId) -> Self {
        Self {
            log: ScrapeRunLog {
                run_id: Uuid::new_v4(),
                source_id,
                start_time: Utc::now(),
                end_time: None,
                is_successful: false,
                items_scraped: 0,
                error_message: None,
            },
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.log.run_id
    }

    pub fn source_id(&self) -> EntityId {
        self.log.source_id
    }

    /// Stamp the end time and record the outcome.
    ///
    /// `Ok(n)` with `n > 0` marks the run successful. `Ok(0)` leaves it
    /// unsuccessful without an error message.
    pub fn finish(mut self, outcome: Result<usize, &AppError>) -> ScrapeRunLog {
        match outcome {
            Ok(count) if count > 0 => {
                self.log.is_successful = true;
                self.log.items_scraped = count;
            }
            Ok(_) => {}
            Err(e) => {
                self.log.is_successful = false;
                self.log.items_scraped = 0;
                self.log.error_message = Some(e.to_string());
            }
        }
        self.log.end_time = Some(Utc::now());
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_has_zeroed_counters() {
        let run = ActiveRun::begin(7);
        assert_eq!(run.source_id(), 7);

        let log = run.finish(Ok(0));
        assert!(log.is_finalized());
        assert!(!log.is_successful);
        assert_eq!(log.items_scraped, 0);
        assert!(log.error_message.is_none());
    }

    #[test]
    fn test_finish_success() {
        let log = ActiveRun::begin(1).finish(Ok(4));
        assert!(log.is_successful);
        assert_eq!(log.items_scraped, 4);
        assert!(log.end_time.unwrap() >= log.start_time);
    }

    #[test]
    fn test_finish_failure_records_message() {
        let err = AppError::Fetch {
            url: "https://unreachable.invalid".to_string(),
            status: None,
            message: "connection refused".to_string(),
        };
        let log = ActiveRun::begin(1).finish(Err(&err));

        assert!(!log.is_successful);
        assert_eq!(log.items_scraped, 0);
        assert!(log.error_message.unwrap().contains("connection refused"));
    }
}
