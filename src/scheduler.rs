use std::path::Path;

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::player::Player;

/// current-time capability, injected so the countdown can be driven by a
/// fake clock in tests
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// wall clock used by the running application
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// time left until the next chime, as shown in the countdown label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub minutes: i64,
    pub seconds: i64,
}

/// what a single tick evaluation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// still counting down
    Pending(Remaining),
    /// the minute boundary was crossed: playback was attempted and a fresh
    /// instant scheduled
    Chimed(Remaining),
    /// stale tick after a stop, nothing happened
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Running {
        interval_minutes: u32,
        next_chime: NaiveDateTime,
    },
}

/// the chime countdown state machine
///
/// independent of whatever schedules the ticks: the gui calls `on_tick`
/// roughly once a second, tests call it directly
#[derive(Debug)]
pub struct Scheduler {
    state: State,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Stopped,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// the instant the next chime lands on, while running
    #[must_use]
    pub const fn next_chime(&self) -> Option<NaiveDateTime> {
        match self.state {
            State::Running { next_chime, .. } => Some(next_chime),
            State::Stopped => None,
        }
    }

    /// begin chiming every `interval_minutes` minutes; only valid while
    /// stopped, a second start is ignored
    pub fn start(&mut self, interval_minutes: u32, clock: &impl Clock) {
        if self.is_running() {
            log::warn!("scheduler already running, ignoring start");
            return;
        }
        let next_chime = next_chime_after(clock.now(), interval_minutes);
        log::info!("chiming every {interval_minutes} minute(s), next chime at {next_chime}");
        self.state = State::Running {
            interval_minutes,
            next_chime,
        };
    }

    /// stop chiming; idempotent, a tick evaluated after this is a no-op
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("chiming stopped");
        }
        self.state = State::Stopped;
    }

    /// evaluate one tick: report the remaining time, or fire the chime and
    /// reschedule once the boundary has passed
    pub fn on_tick(
        &mut self,
        clock: &impl Clock,
        player: &mut impl Player,
        chime: Option<&Path>,
    ) -> TickOutcome {
        let State::Running {
            interval_minutes,
            next_chime,
        } = self.state
        else {
            // a tick scheduled before a stop must not act
            return TickOutcome::Idle;
        };
        let now = clock.now();
        if now < next_chime {
            return TickOutcome::Pending(remaining_until(now, next_chime));
        }
        match chime {
            Some(path) => {
                // a playback failure never stops the countdown
                if let Err(e) = player.play(path) {
                    log::error!("couldn't play chime: {e}");
                }
            }
            None => log::warn!("no chime sound selected, skipping this chime"),
        }
        // reschedule from the current reading: intervals missed during a
        // suspend are not made up
        let next_chime = next_chime_after(now, interval_minutes);
        self.state = State::Running {
            interval_minutes,
            next_chime,
        };
        TickOutcome::Chimed(remaining_until(now, next_chime))
    }
}

/// the interval after `now`, truncated so the chime lands exactly on a
/// minute boundary
fn next_chime_after(now: NaiveDateTime, interval_minutes: u32) -> NaiveDateTime {
    floor_to_minute(now + Duration::minutes(i64::from(interval_minutes)))
}

fn floor_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    // zero is always a valid second/nanosecond, so the fallback never fires
    instant
        .with_second(0)
        .and_then(|truncated| truncated.with_nanosecond(0))
        .unwrap_or(instant)
}

fn remaining_until(now: NaiveDateTime, next_chime: NaiveDateTime) -> Remaining {
    let total_seconds = next_chime.signed_duration_since(now).num_seconds().max(0);
    Remaining {
        minutes: total_seconds / 60,
        seconds: total_seconds % 60,
    }
}
