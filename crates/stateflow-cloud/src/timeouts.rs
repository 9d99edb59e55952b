//! Per-action timeouts and settings conversions

use crate::action::ActionType;
use stateflow_config::{RetrySettings, Settings, TimeoutSettings, WaitDefaults};
use stateflow_wait::{RetryConfig, WaitSpec, WaitSpecBuilder};
use std::time::Duration;

const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Wait timeouts for each lifecycle action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTimeouts {
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for ResourceTimeouts {
    fn default() -> Self {
        Self::uniform(DEFAULT_ACTION_TIMEOUT)
    }
}

impl ResourceTimeouts {
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            create: timeout,
            update: timeout,
            delete: timeout,
        }
    }

    pub fn for_action(&self, action: ActionType) -> Duration {
        match action {
            ActionType::Create => self.create,
            ActionType::Update => self.update,
            ActionType::Delete => self.delete,
        }
    }

    pub fn with_create(mut self, timeout: Duration) -> Self {
        self.create = timeout;
        self
    }

    pub fn with_update(mut self, timeout: Duration) -> Self {
        self.update = timeout;
        self
    }

    pub fn with_delete(mut self, timeout: Duration) -> Self {
        self.delete = timeout;
        self
    }
}

impl From<&TimeoutSettings> for ResourceTimeouts {
    fn from(settings: &TimeoutSettings) -> Self {
        Self {
            create: settings.create(),
            update: settings.update(),
            delete: settings.delete(),
        }
    }
}

/// Mutation retry configuration from settings
pub fn retry_config(settings: &RetrySettings) -> RetryConfig {
    RetryConfig {
        max_attempts: settings.max_attempts,
        initial_delay: settings.initial_delay(),
        max_delay: settings.max_delay(),
        backoff_multiplier: settings.multiplier,
        timeout: settings.timeout(),
    }
}

/// A spec builder seeded with configured polling defaults
pub fn spec_builder(defaults: &WaitDefaults) -> WaitSpecBuilder {
    WaitSpec::builder()
        .poll_interval(defaults.poll_interval())
        .not_found_budget(defaults.not_found_budget)
        .stabilization(defaults.stabilization)
}

/// Everything an adapter call site needs from [`Settings`]
#[derive(Debug, Clone)]
pub struct Tuning {
    pub wait: WaitDefaults,
    pub timeouts: ResourceTimeouts,
    pub retry: RetryConfig,
}

impl From<&Settings> for Tuning {
    fn from(settings: &Settings) -> Self {
        Self {
            wait: settings.wait.clone(),
            timeouts: ResourceTimeouts::from(&settings.timeouts),
            retry: retry_config(&settings.retry),
        }
    }
}

impl Tuning {
    /// Discover settings (file, then env overrides) and convert them
    pub fn discover() -> crate::error::Result<Self> {
        let settings = Settings::discover()?;
        Ok(Self::from(&settings))
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}
