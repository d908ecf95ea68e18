use crate::error::InvalidInputError;

/// Tunables for the derived metrics.
///
/// Defaults follow the academic configuration: a 60 second target per question,
/// consistency measured over the last 10 answers once 5 exist, and learning
/// velocity once 10 answers exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsConfig {
    target_seconds_per_question: f64,
    consistency_min_events: usize,
    consistency_window: usize,
    velocity_min_events: usize,
}

impl MetricsConfig {
    pub const DEFAULT_TARGET_SECONDS: f64 = 60.0;
    pub const DEFAULT_CONSISTENCY_MIN_EVENTS: usize = 5;
    pub const DEFAULT_CONSISTENCY_WINDOW: usize = 10;
    pub const DEFAULT_VELOCITY_MIN_EVENTS: usize = 10;

    /// Default thresholds with a custom target time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError::InvalidTargetTime` unless the target is positive and finite.
    pub fn new(target_seconds_per_question: f64) -> Result<Self, InvalidInputError> {
        Self::default().with_target_seconds(target_seconds_per_question)
    }

    /// # Errors
    ///
    /// Returns `InvalidInputError::InvalidTargetTime` unless the target is positive and finite.
    pub fn with_target_seconds(mut self, seconds: f64) -> Result<Self, InvalidInputError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(InvalidInputError::InvalidTargetTime { provided: seconds });
        }
        self.target_seconds_per_question = seconds;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidInputError::InvalidWindow` if either value is zero.
    pub fn with_consistency(
        mut self,
        min_events: usize,
        window: usize,
    ) -> Result<Self, InvalidInputError> {
        if min_events == 0 || window == 0 {
            return Err(InvalidInputError::InvalidWindow);
        }
        self.consistency_min_events = min_events;
        self.consistency_window = window;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidInputError::InvalidWindow` if `min_events` is zero.
    pub fn with_velocity_min_events(mut self, min_events: usize) -> Result<Self, InvalidInputError> {
        if min_events == 0 {
            return Err(InvalidInputError::InvalidWindow);
        }
        self.velocity_min_events = min_events;
        Ok(self)
    }

    #[must_use]
    pub fn target_seconds_per_question(&self) -> f64 {
        self.target_seconds_per_question
    }

    #[must_use]
    pub fn consistency_min_events(&self) -> usize {
        self.consistency_min_events
    }

    #[must_use]
    pub fn consistency_window(&self) -> usize {
        self.consistency_window
    }

    #[must_use]
    pub fn velocity_min_events(&self) -> usize {
        self.velocity_min_events
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            target_seconds_per_question: Self::DEFAULT_TARGET_SECONDS,
            consistency_min_events: Self::DEFAULT_CONSISTENCY_MIN_EVENTS,
            consistency_window: Self::DEFAULT_CONSISTENCY_WINDOW,
            velocity_min_events: Self::DEFAULT_VELOCITY_MIN_EVENTS,
        }
    }
}
