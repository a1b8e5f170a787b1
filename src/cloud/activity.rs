//! Network activity indicator.
//!
//! The indicator is visible while at least one guard is alive. Guards clear
//! their share on drop, so early returns, `?`, cancellation and unwinding all
//! leave the indicator consistent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Default)]
pub struct NetworkActivity {
    in_flight: Arc<AtomicUsize>,
}

impl NetworkActivity {
    /// Process-wide indicator used by the server binary.
    pub fn global() -> &'static NetworkActivity {
        static GLOBAL: OnceLock<NetworkActivity> = OnceLock::new();
        GLOBAL.get_or_init(NetworkActivity::default)
    }

    pub fn begin(&self) -> ActivityGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            tracing::debug!("network activity indicator on");
        }
        ActivityGuard {
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

#[must_use = "the indicator turns off as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ActivityGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            tracing::debug!("network activity indicator off");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_while_guard_alive() {
        let activity = NetworkActivity::default();
        assert!(!activity.is_visible());
        {
            let _guard = activity.begin();
            assert!(activity.is_visible());
        }
        assert!(!activity.is_visible());
    }

    #[test]
    fn test_overlapping_guards() {
        let activity = NetworkActivity::default();
        let first = activity.begin();
        let second = activity.begin();
        drop(first);
        assert!(activity.is_visible());
        drop(second);
        assert!(!activity.is_visible());
    }

    #[test]
    fn test_cleared_on_panic() {
        let activity = NetworkActivity::default();
        let cloned = activity.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = cloned.begin();
            panic!("listing blew up");
        });
        assert!(result.is_err());
        assert!(!activity.is_visible());
    }
}
