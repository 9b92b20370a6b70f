//! Configuration for ordered simulation execution
//!
//! This module provides configuration types for controlling simulation execution behavior,
//! including concurrency settings, the scheduling discipline and precondition checking.

use crate::core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Objects of one time step are executed in order within a single thread
    #[default]
    Sequential,
    /// Objects of one time step are executed concurrently on a rayon pool
    Rayon,
}

/// How produced events reach the global schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulingDiscipline {
    /// Collect a whole time step's output, sort it, then schedule it
    #[default]
    Ordered,
    /// Schedule each event as soon as a model emits it
    Immediate,
}

/// When the receiver precondition of event execution is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CheckPolicy {
    /// Check in every build
    #[default]
    Always,
    /// Check only when debug assertions are enabled
    DebugOnly,
}

impl CheckPolicy {
    /// Whether the check runs in the current build
    pub fn is_active(self) -> bool {
        match self {
            CheckPolicy::Always => true,
            CheckPolicy::DebugOnly => cfg!(debug_assertions),
        }
    }
}

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
    pub discipline: SchedulingDiscipline,
    pub check_policy: CheckPolicy,
    /// Reject objects whose declared port counts differ from the graph degree
    pub verify_degrees: bool,
    /// Stop before processing events later than this time
    pub max_time: Option<Timestamp>,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    ///
    /// Default configuration is sequential, ordered, always-checked and degree-verified
    pub fn new() -> Self {
        Self {
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
            discipline: SchedulingDiscipline::default(),
            check_policy: CheckPolicy::default(),
            verify_degrees: true,
            max_time: None,
        }
    }

    /// Set the concurrency mode for the simulation
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_discipline(mut self, discipline: SchedulingDiscipline) -> Self {
        self.discipline = discipline;
        self
    }

    pub fn with_check_policy(mut self, policy: CheckPolicy) -> Self {
        self.check_policy = policy;
        self
    }

    pub fn with_degree_verification(mut self, verify: bool) -> Self {
        self.verify_degrees = verify;
        self
    }

    pub fn with_max_time(mut self, max_time: Timestamp) -> Self {
        self.max_time = Some(max_time);
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
