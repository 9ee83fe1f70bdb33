//! Cancellable timers that post events into a session's channel.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a spawned timer task. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct TimerHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Post `event` every `period`, first after one full period
    pub fn repeating<E>(
        generation: u64,
        period: Duration,
        events: mpsc::UnboundedSender<E>,
        event: E,
    ) -> Self
    where
        E: Clone + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                if events.send(event.clone()).is_err() {
                    break;
                }
            }
        });

        Self { generation, task }
    }

    /// Post `event` once after `delay`
    pub fn once<E>(
        generation: u64,
        delay: Duration,
        events: mpsc::UnboundedSender<E>,
        event: E,
    ) -> Self
    where
        E: Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });

        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
