use log::{debug, warn};

use crate::errors::{FailureKind, MarketDataError};

/// Downgrade a fallible adapter result to an absent value.
///
/// This is the adapter boundary: the error is logged with its kind and then
/// dropped.
pub(crate) trait SoftFailure<T> {
    fn soft(self, provider: &str, operation: &str, subject: &str) -> Option<T>;
}

impl<T> SoftFailure<T> for Result<T, MarketDataError> {
    fn soft(self, provider: &str, operation: &str, subject: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                match e.kind() {
                    FailureKind::NotFound | FailureKind::Cancelled => debug!(
                        "{} {} for '{}' returned no data ({}): {}",
                        provider,
                        operation,
                        subject,
                        e.kind(),
                        e
                    ),
                    _ => warn!(
                        "{} {} for '{}' failed ({}): {}",
                        provider,
                        operation,
                        subject,
                        e.kind(),
                        e
                    ),
                }
                None
            }
        }
    }
}
