//! Headless fixed-timestep driver

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::agent::{WanderController, WanderError};
use crate::ai::{WanderEvent, WanderState};

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds per tick
    pub fixed_dt: f32,
    /// Seconds to simulate in `run`
    pub duration: f32,
    /// Seed for the agent's random source
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            duration: 30.0,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Set tick length
    pub fn with_fixed_dt(mut self, fixed_dt: f32) -> Self {
        self.fixed_dt = fixed_dt;
        self
    }

    /// Set run length
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that the timestep and duration are usable
    pub fn validate(&self) -> Result<(), WanderError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(WanderError::InvalidConfig {
                field: "fixed_dt",
                reason: "must be finite and positive",
            });
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(WanderError::InvalidConfig {
                field: "duration",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// An event stamped with the simulation time it was drained at
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    /// Seconds since the simulation started
    pub time: f32,
    /// What happened
    pub event: WanderEvent,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    /// Ticks executed
    pub frames: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// Final state
    pub state: WanderState,
    /// Final feet position
    pub position: Vec3,
    /// Number of wander targets chosen
    pub targets_chosen: usize,
    /// Number of state entries, including startup
    pub transitions: usize,
}

/// Runs one controller at a fixed timestep and keeps its event history.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    controller: WanderController,
    elapsed: f32,
    frames: u64,
    history: Vec<TimedEvent>,
}

impl Simulation {
    /// Create a simulation around a built controller
    pub fn new(config: SimConfig, controller: WanderController) -> Result<Self, WanderError> {
        config.validate()?;
        let mut sim = Self {
            config,
            controller,
            elapsed: 0.0,
            frames: 0,
            history: Vec::new(),
        };
        sim.collect_events();
        Ok(sim)
    }

    /// Advance one fixed tick
    pub fn step(&mut self) {
        self.controller.tick(self.config.fixed_dt);
        self.elapsed += self.config.fixed_dt;
        self.frames += 1;
        self.collect_events();
    }

    /// Advance until `seconds` more have been simulated. Spans that are not
    /// finite and positive do nothing.
    pub fn run_for(&mut self, seconds: f32) {
        if !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        let ticks = (seconds / self.config.fixed_dt).round() as u64;
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Run for the configured duration and summarize
    pub fn run(&mut self) -> SimReport {
        log::info!(
            "Simulating {}s at {:.1} Hz",
            self.config.duration,
            1.0 / self.config.fixed_dt
        );
        self.run_for(self.config.duration);
        self.report()
    }

    /// Summarize the run so far
    #[must_use]
    pub fn report(&self) -> SimReport {
        let count = |pred: fn(&WanderEvent) -> bool| {
            self.history.iter().filter(|e| pred(&e.event)).count()
        };

        SimReport {
            frames: self.frames,
            elapsed: self.elapsed,
            state: self.controller.state(),
            position: self.controller.pose().position,
            targets_chosen: count(|e| matches!(e, WanderEvent::TargetChosen { .. })),
            transitions: count(|e| matches!(e, WanderEvent::StateEntered { .. })),
        }
    }

    fn collect_events(&mut self) {
        let time = self.elapsed;
        for event in self.controller.drain_events() {
            log::debug!("[{time:7.2}s] {event:?}");
            self.history.push(TimedEvent { time, event });
        }
    }

    /// The driven controller
    #[must_use]
    pub fn controller(&self) -> &WanderController {
        &self.controller
    }

    /// Every event seen so far
    #[must_use]
    pub fn history(&self) -> &[TimedEvent] {
        &self.history
    }

    /// Simulated seconds so far
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
