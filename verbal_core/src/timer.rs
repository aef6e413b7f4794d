//! Per-question countdown with a cancel guarantee

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{TIMER_DANGER_SECS, TIMER_WARNING_SECS};

struct Shared {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Owner of a running countdown. Dropping it cancels the countdown.
pub struct CountdownHandle {
    shared: Arc<Shared>,
}

impl CountdownHandle {
    /// Stop the countdown. Once this returns no callback will run again.
    ///
    /// Blocks while a callback is in progress, so a callback must not cancel
    /// its own countdown. Call this before taking any lock the callbacks
    /// also take: cancelling while holding it deadlocks against a callback
    /// that is waiting for it.
    pub fn cancel(&self) {
        let mut cancelled = self.shared.cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        self.shared.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.shared.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Count down from `seconds`, one step per `tick_interval`.
///
/// `on_tick` receives the remaining seconds after each step, `on_expire`
/// runs once when zero is reached. Both run on the timer thread with the
/// cancel lock held, so [`CountdownHandle::cancel`] waits for them to return.
pub fn start_countdown<T, E>(
    seconds: u32,
    tick_interval: Duration,
    mut on_tick: T,
    on_expire: E,
) -> CountdownHandle
where
    T: FnMut(u32) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    let shared = Arc::new(Shared {
        cancelled: Mutex::new(false),
        wake: Condvar::new(),
    });
    let worker = Arc::clone(&shared);

    thread::spawn(move || {
        let mut remaining = seconds;
        let mut cancelled = worker.cancelled.lock().unwrap_or_else(PoisonError::into_inner);

        while remaining > 0 {
            let deadline = Instant::now() + tick_interval;
            loop {
                if *cancelled {
                    return;
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                let (guard, _) = worker
                    .wake
                    .wait_timeout(cancelled, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner);
                cancelled = guard;
            }
            remaining -= 1;
            on_tick(remaining);
        }

        if !*cancelled {
            on_expire();
        }
    });

    CountdownHandle { shared }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUrgency {
    Calm,
    Warning,
    Danger,
}

impl TimerUrgency {
    pub fn from_remaining(seconds: u32) -> Self {
        if seconds <= TIMER_DANGER_SECS {
            TimerUrgency::Danger
        } else if seconds <= TIMER_WARNING_SECS {
            TimerUrgency::Warning
        } else {
            TimerUrgency::Calm
        }
    }
}

/// `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `1m 5s`, or `42s` under a minute
pub fn format_duration(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Event {
        Tick(u32),
        Expired,
    }

    #[test]
    fn ticks_down_then_expires_once() {
        let (tx, rx) = mpsc::channel();
        let expire_tx = tx.clone();
        let _handle = start_countdown(
            3,
            Duration::from_millis(5),
            move |left| tx.send(Event::Tick(left)).unwrap(),
            move || expire_tx.send(Event::Expired).unwrap(),
        );
        let events: Vec<Event> = (0..4)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
            .collect();
        assert_eq!(
            events,
            vec![Event::Tick(2), Event::Tick(1), Event::Tick(0), Event::Expired]
        );
    }

    #[test]
    fn nothing_fires_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let expire_tx = tx.clone();
        let handle = start_countdown(
            1_000,
            Duration::from_millis(2),
            move |left| {
                let _ = tx.send(Event::Tick(left));
            },
            move || {
                let _ = expire_tx.send(Event::Expired);
            },
        );
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        handle.cancel();
        assert!(handle.is_cancelled());
        // drain whatever was sent before cancel returned
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropping_the_handle_cancels() {
        let (tx, rx) = mpsc::channel::<Event>();
        let handle = start_countdown(
            1,
            Duration::from_millis(50),
            |_| {},
            move || {
                let _ = tx.send(Event::Expired);
            },
        );
        drop(handle);
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn urgency_and_formatting() {
        assert_eq!(TimerUrgency::from_remaining(30), TimerUrgency::Calm);
        assert_eq!(TimerUrgency::from_remaining(10), TimerUrgency::Warning);
        assert_eq!(TimerUrgency::from_remaining(5), TimerUrgency::Danger);
        assert_eq!(format_clock(75), "1:15");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_duration(65), "1m 5s");
        assert_eq!(format_duration(42), "42s");
    }
}
