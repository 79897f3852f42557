use std::sync::Arc;

use tokio::sync::OwnedSemaphorePermit;
use tokio::sync::Semaphore;

use crate::bot::error::BotError;

/// Acquires a slot for a heavyweight command, or fails with
/// [`BotError::MaxConcurrencyReached`] when `limit` commands already hold
/// one. The slot is released when the returned permit drops.
pub fn try_acquire_command_slot(
    slots: &Arc<Semaphore>,
    limit: usize,
) -> Result<OwnedSemaphorePermit, BotError> {
    slots
        .clone()
        .try_acquire_owned()
        .map_err(|_| BotError::MaxConcurrencyReached { limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_within_limit() {
        let slots = Arc::new(Semaphore::new(2));
        let _first = try_acquire_command_slot(&slots, 2).unwrap();
        let _second = try_acquire_command_slot(&slots, 2).unwrap();
    }

    #[test]
    fn test_acquire_fails_when_saturated() {
        let slots = Arc::new(Semaphore::new(1));
        let _held = try_acquire_command_slot(&slots, 1).unwrap();
        match try_acquire_command_slot(&slots, 1).unwrap_err() {
            BotError::MaxConcurrencyReached { limit } => assert_eq!(limit, 1),
            other => panic!("Expected MaxConcurrencyReached, got {other:?}"),
        }
    }

    #[test]
    fn test_slot_released_on_drop() {
        let slots = Arc::new(Semaphore::new(1));
        {
            let _held = try_acquire_command_slot(&slots, 1).unwrap();
        }
        assert!(try_acquire_command_slot(&slots, 1).is_ok());
    }
}
