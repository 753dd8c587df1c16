use std::cell::Cell;
use std::rc::Rc;

/// Invalidates pending one-shot steps of a multi-step flow.
///
/// Each run takes a ticket from [`FlowGuard::begin`]; a step only proceeds while
/// its ticket is still current. Cancelling or starting a new run makes every
/// older ticket stale.
#[derive(Debug, Clone, Default)]
pub struct FlowGuard {
    generation: Rc<Cell<u64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTicket(u64);

impl FlowGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FlowTicket {
        self.cancel();
        FlowTicket(self.generation.get())
    }

    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub fn is_current(&self, ticket: FlowTicket) -> bool {
        self.generation.get() == ticket.0
    }
}

#[cfg(target_arch = "wasm32")]
pub use interval::TimerSet;

#[cfg(target_arch = "wasm32")]
mod interval {
    use gloo_timers::callback::Interval;

    /// Repeating timers owned by the page. Dropping an [`Interval`] clears it.
    #[derive(Default)]
    pub struct TimerSet {
        intervals: Vec<Interval>,
    }

    impl TimerSet {
        pub fn every<F>(&mut self, period_ms: u32, tick: F)
        where
            F: FnMut() + 'static,
        {
            self.intervals.push(Interval::new(period_ms, tick));
        }

        pub fn cancel_all(&mut self) {
            let n = self.intervals.len();
            self.intervals.clear();
            if n > 0 {
                log::debug!("cancelled {n} interval(s)");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_makes_ticket_stale() {
        let guard = FlowGuard::new();
        let ticket = guard.begin();
        assert!(guard.is_current(ticket));
        guard.cancel();
        assert!(!guard.is_current(ticket));
    }

    #[test]
    fn new_run_supersedes_old_one() {
        let guard = FlowGuard::new();
        let first = guard.begin();
        let shared = guard.clone();
        let second = shared.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }
}
