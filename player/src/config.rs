/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Re-publish the unchanged state when an is-playing event is ignored
    pub republish_unchanged: bool,
    /// Catch observer panics so the remaining observers still run
    pub isolate_observer_panics: bool,
    /// Queue length of undelivered notifications that triggers a warning
    pub pending_warn_threshold: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            republish_unchanged: false,
            isolate_observer_panics: true,
            pending_warn_threshold: 64,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that forwards every ignored is-playing echo to observers
    ///
    /// Useful for observers that refresh their view on every notification.
    pub fn echoing() -> Self {
        Self {
            republish_unchanged: true,
            ..Self::default()
        }
    }

    pub fn with_republish_unchanged(mut self, republish: bool) -> Self {
        self.republish_unchanged = republish;
        self
    }

    pub fn with_isolate_observer_panics(mut self, isolate: bool) -> Self {
        self.isolate_observer_panics = isolate;
        self
    }

    /// Set the pending-notification warning threshold with validation
    pub fn with_pending_warn_threshold(mut self, threshold: usize) -> Result<Self, String> {
        if threshold == 0 {
            return Err("Pending notification threshold must be greater than 0".to_string());
        }
        self.pending_warn_threshold = threshold;
        Ok(self)
    }

    /// Validate the configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.pending_warn_threshold == 0 {
            return Err("Pending notification threshold must be greater than 0".to_string());
        }
        Ok(())
    }
}
