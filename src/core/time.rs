//=========================================================================
// Time
//=========================================================================
//
// Frame timing and tick pacing.
//
//   Time         → delta / elapsed / frame counter, advanced once per frame
//   TickClock    → applies the TickPolicy (is a logic tick due?)
//   StepClock    → fixed-timestep accumulator for physics sub-steps
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== Internal Dependencies ===============================================

use crate::core::config::TickPolicy;

//=== Time ================================================================

/// Frame clock shared with components through the context.
///
/// Delta time is clamped so a debugger pause or a minimized window does
/// not feed a huge step into the simulation.
#[derive(Debug, Clone)]
pub struct Time {
    last: Instant,
    fixed_delta: Option<f32>,
    delta: f32,
    elapsed: f64,
    frame: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl Time {
    /// Creates a wall-clock driven timer.
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            fixed_delta: None,
            delta: 0.0,
            elapsed: 0.0,
            frame: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Creates a timer that advances by exactly `delta` seconds per frame.
    pub fn fixed(delta: f32) -> Self {
        Self {
            fixed_delta: Some(delta),
            ..Self::new()
        }
    }

    /// Advances one frame.
    pub fn update(&mut self) {
        let delta = match self.fixed_delta {
            Some(delta) => delta,
            None => {
                let now = Instant::now();
                let dt = now
                    .saturating_duration_since(self.last)
                    .clamp(self.dt_min, self.dt_max);
                self.last = now;
                dt.as_secs_f32()
            }
        };

        self.delta = delta;
        self.elapsed += f64::from(delta);
        self.frame += 1;
    }

    /// Resets the wall-clock baseline (e.g. right before the first frame).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Seconds between the last two frames.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Seconds since the first frame.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

//=== TickClock ===========================================================

/// Applies a [`TickPolicy`] to the frame stream.
#[derive(Debug, Clone)]
pub(crate) struct TickClock {
    policy: TickPolicy,
    accumulator: f64,
}

impl TickClock {
    pub(crate) fn new(policy: TickPolicy) -> Self {
        Self {
            policy,
            accumulator: 0.0,
        }
    }

    pub(crate) fn policy(&self) -> TickPolicy {
        self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: TickPolicy) {
        self.policy = policy;
        self.accumulator = 0.0;
    }

    /// Feeds one frame delta and returns the tick delta if a tick is due.
    pub(crate) fn advance(&mut self, delta: f32) -> Option<f32> {
        match self.policy {
            TickPolicy::EveryFrame => Some(delta),
            TickPolicy::Paused => None,
            TickPolicy::FixedRate(tps) => {
                let period = 1.0 / tps;
                self.accumulator += f64::from(delta);
                if self.accumulator + f64::EPSILON < period {
                    return None;
                }
                // Catch-up is capped at one tick per frame; drop the backlog.
                self.accumulator = (self.accumulator - period).min(period);
                Some(period as f32)
            }
        }
    }
}

//=== StepClock ===========================================================

/// Fixed-timestep accumulator for physics.
#[derive(Debug, Clone)]
pub(crate) struct StepClock {
    timestep: f32,
    max_steps: u32,
    accumulator: f32,
}

impl StepClock {
    pub(crate) fn new(timestep: f32, max_steps: u32) -> Self {
        Self {
            timestep,
            max_steps,
            accumulator: 0.0,
        }
    }

    /// Adds `delta` seconds and returns how many fixed steps to run.
    pub(crate) fn advance(&mut self, delta: f32) -> u32 {
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.timestep && steps < self.max_steps {
            self.accumulator -= self.timestep;
            steps += 1;
        }

        if steps == self.max_steps {
            // Spiral-of-death guard: forget time we could not simulate.
            self.accumulator = self.accumulator.min(self.timestep);
        }
        steps
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
