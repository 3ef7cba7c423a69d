//! Wall-clock scheduled phase changes tied to a run
//!
//! A pending task only fires for the run that scheduled it, so a restart
//! can never be hijacked by a transition left over from the previous run.

use super::state::GamePhase;

/// A phase change waiting for its deadline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTransition {
    pub run_id: u64,
    pub fire_at_ms: f64,
    pub target: GamePhase,
}

/// Holds at most one pending transition
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Option<ScheduledTransition>,
}

impl Scheduler {
    /// Schedule `target` to fire `delay_ms` after `now_ms`, replacing any pending task
    pub fn schedule(&mut self, run_id: u64, now_ms: f64, delay_ms: f64, target: GamePhase) {
        if let Some(old) = self.pending.replace(ScheduledTransition {
            run_id,
            fire_at_ms: now_ms + delay_ms,
            target,
        }) {
            log::debug!("Replaced pending transition to {:?}", old.target);
        }
    }

    pub fn cancel(&mut self) {
        if let Some(old) = self.pending.take() {
            log::debug!("Cancelled pending transition to {:?}", old.target);
        }
    }

    pub fn pending(&self) -> Option<&ScheduledTransition> {
        self.pending.as_ref()
    }

    /// Fire the pending transition once its deadline has passed
    pub fn poll(&mut self, run_id: u64, now_ms: f64) -> Option<GamePhase> {
        let task = self.pending?;
        if task.run_id != run_id {
            log::debug!(
                "Dropping stale transition from run {} (current run {})",
                task.run_id,
                run_id
            );
            self.pending = None;
            return None;
        }
        if now_ms < task.fire_at_ms {
            return None;
        }
        self.pending = None;
        Some(task.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_deadline() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(1, 1000.0, 2000.0, GamePhase::Playing);

        assert_eq!(scheduler.poll(1, 2999.0), None);
        assert_eq!(scheduler.poll(1, 3000.0), Some(GamePhase::Playing));
        assert_eq!(scheduler.poll(1, 5000.0), None);
    }

    #[test]
    fn test_stale_run_is_dropped() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(1, 0.0, 2000.0, GamePhase::Playing);

        assert_eq!(scheduler.poll(2, 10_000.0), None);
        assert!(scheduler.pending().is_none());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(3, 0.0, 10.0, GamePhase::Playing);
        scheduler.cancel();
        assert_eq!(scheduler.poll(3, 100.0), None);
    }
}
