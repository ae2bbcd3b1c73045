//! Cancellable timers for delayed game effects.
//!
//! A [`TimerScope`] belongs to one screen. Everything it schedules is
//! delivered back through [`TimerScope::next`]; cancelling or dropping the
//! scope aborts outstanding tasks and discards events already queued.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

type Stamped<E> = (u64, E);

#[derive(Debug)]
pub struct TimerScope<E> {
    tasks: JoinSet<()>,
    tx: mpsc::UnboundedSender<Stamped<E>>,
    rx: mpsc::UnboundedReceiver<Stamped<E>>,
    generation: u64,
}

impl<E: Send + 'static> Default for TimerScope<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + 'static> TimerScope<E> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tasks: JoinSet::new(),
            tx,
            rx,
            generation: 0,
        }
    }

    /// Deliver `event` once after `delay`.
    pub fn schedule(&mut self, delay: Duration, event: E) {
        self.reap();
        let tx = self.tx.clone();
        let generation = self.generation;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send((generation, event));
        });
    }

    /// Deliver `event` every `period`, first after one full period.
    pub fn every(&mut self, period: Duration, event: E)
    where
        E: Clone,
    {
        self.reap();
        let tx = self.tx.clone();
        let generation = self.generation;
        self.tasks.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send((generation, event.clone())).is_err() {
                    break;
                }
            }
        });
    }

    /// Abort everything scheduled so far. Events already queued are dropped.
    pub fn cancel(&mut self) {
        let outstanding = self.tasks.len();
        self.tasks = JoinSet::new();
        self.generation += 1;
        if outstanding > 0 {
            tracing::debug!("Cancelled {} pending timers", outstanding);
        }
    }

    /// Number of timers still running.
    pub fn pending(&mut self) -> usize {
        self.reap();
        self.tasks.len()
    }

    /// Wait for the next live event. Never resolves while nothing is
    /// scheduled, so it can sit in a `select!` next to input.
    pub async fn next(&mut self) -> Option<E> {
        loop {
            let (generation, event) = self.rx.recv().await?;
            if generation == self.generation {
                return Some(event);
            }
        }
    }

    fn reap(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Ping {
        Fast,
        Slow,
        Tick,
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_arrive_in_deadline_order() {
        let mut scope = TimerScope::new();
        scope.schedule(Duration::from_millis(1000), Ping::Slow);
        scope.schedule(Duration::from_millis(500), Ping::Fast);

        assert_eq!(scope.next().await, Some(Ping::Fast));
        assert_eq!(scope.next().await, Some(Ping::Slow));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_delivers_nothing_afterwards() {
        let mut scope = TimerScope::new();
        scope.schedule(Duration::from_millis(400), Ping::Slow);
        scope.every(Duration::from_secs(1), Ping::Tick);
        scope.cancel();

        let waited = timeout(Duration::from_secs(5), scope.next()).await;
        assert!(waited.is_err());
        assert_eq!(scope.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_events_are_dropped_on_cancel() {
        let mut scope = TimerScope::new();
        scope.schedule(Duration::from_millis(10), Ping::Slow);
        tokio::time::sleep(Duration::from_millis(50)).await;

        scope.cancel();
        scope.schedule(Duration::from_millis(10), Ping::Fast);
        assert_eq!(scope.next().await, Some(Ping::Fast));
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_ticks_repeat() {
        let mut scope = TimerScope::new();
        let start = Instant::now();
        scope.every(Duration::from_secs(1), Ping::Tick);

        for _ in 0..3 {
            assert_eq!(scope.next().await, Some(Ping::Tick));
        }
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert_eq!(scope.pending(), 1);
    }
}
