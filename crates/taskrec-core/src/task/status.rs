use strum::{Display, EnumIter, EnumString, FromRepr};

use crate::error::{Result, TaskrecError};

/// Lifecycle state of a task.
///
/// Records store the ordinal, not the name. New members must be appended at
/// the end; reordering would silently change the meaning of stored records.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    FromRepr,
)]
#[strum(serialize_all = "camelCase")]
#[repr(u8)]
pub enum TaskStatus {
    /// Accepted by the engine, not started yet.
    #[default]
    Enqueued = 0,
    Running = 1,
    /// Finished successfully.
    Complete = 2,
    /// The server answered 404.
    NotFound = 3,
    /// Failed; the record carries a `TaskException`.
    Failed = 4,
    Canceled = 5,
    WaitingToRetry = 6,
    Paused = 7,
}

impl TaskStatus {
    /// Persisted ordinal of this status.
    pub fn ordinal(self) -> u64 {
        self as u64
    }

    /// Decodes a persisted ordinal, failing on values no member maps to.
    pub fn from_ordinal(ordinal: u64) -> Result<Self> {
        u8::try_from(ordinal)
            .ok()
            .and_then(Self::from_repr)
            .ok_or(TaskrecError::InvalidStatus(ordinal))
    }

    /// Returns `true` if the task will not change state again.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            TaskStatus::Complete | TaskStatus::NotFound | TaskStatus::Failed | TaskStatus::Canceled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_ordinals_are_stable() {
        let ordinals: Vec<u64> = TaskStatus::iter().map(TaskStatus::ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(TaskStatus::default(), TaskStatus::Enqueued);
        assert_eq!(TaskStatus::from_ordinal(4).unwrap(), TaskStatus::Failed);
    }

    #[test]
    fn test_out_of_range_ordinal_is_rejected() {
        assert_eq!(
            TaskStatus::from_ordinal(8),
            Err(TaskrecError::InvalidStatus(8))
        );
        assert_eq!(
            TaskStatus::from_ordinal(u64::MAX),
            Err(TaskrecError::InvalidStatus(u64::MAX))
        );
    }

    #[test]
    fn test_names_parse_in_camel_case() {
        assert_eq!(
            TaskStatus::from_str("waitingToRetry").unwrap(),
            TaskStatus::WaitingToRetry
        );
        assert_eq!(TaskStatus::NotFound.to_string(), "notFound");
    }

    #[test]
    fn test_final_states() {
        assert!(TaskStatus::Complete.is_final());
        assert!(TaskStatus::Canceled.is_final());
        assert!(!TaskStatus::Running.is_final());
        assert!(!TaskStatus::Paused.is_final());
    }
}
