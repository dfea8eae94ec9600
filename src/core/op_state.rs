use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of one asynchronous operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OpState<T> {
    #[default]
    Idle,
    InFlight,
    Succeeded(T),
    Failed(String),
}

impl<T> OpState<T> {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, OpState::InFlight)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, OpState::Succeeded(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OpState::Succeeded(value) => Some(value),
            _ => None,
        }
    }
}

/// At-most-one-in-flight token for an operation.
///
/// `try_acquire` is a compare-and-set, so a second caller racing the first
/// gets `None` instead of a duplicate submission.
#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<InFlightTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightTicket {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped.
#[derive(Debug)]
pub struct InFlightTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_allows_single_holder() {
        let guard = InFlightGuard::new();
        let ticket = guard.try_acquire();
        assert!(ticket.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());

        drop(ticket);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_op_state_accessors() {
        let state: OpState<u32> = OpState::Succeeded(7);
        assert!(state.is_resolved());
        assert_eq!(state.value(), Some(&7));

        let failed: OpState<u32> = OpState::Failed("boom".to_string());
        assert!(!failed.is_resolved());
        assert_eq!(failed.value(), None);
        assert!(OpState::<u32>::InFlight.is_in_flight());
    }
}
