//! Router, health, cost and HTTP validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::types::MAX_CALL_TIMEOUT;
use tracing::debug;

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating orchestrator configuration");

        self.providers.as_slice().validate()?;
        self.router.validate()?;
        self.health.validate()?;
        self.cost.validate()?;
        self.http.validate()?;

        Ok(())
    }
}

impl Validate for RouterConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_deadline_ms == 0 {
            return Err("Router default deadline must be greater than 0".to_string());
        }

        if self.default_deadline() > MAX_CALL_TIMEOUT {
            return Err(format!(
                "Router default deadline must not exceed {} ms",
                MAX_CALL_TIMEOUT.as_millis()
            ));
        }

        if !(self.attempt_timeout_fraction > 0.0 && self.attempt_timeout_fraction <= 1.0) {
            return Err(format!(
                "Router attempt timeout fraction must be in (0, 1], got {}",
                self.attempt_timeout_fraction
            ));
        }

        if self.max_attempts == Some(0) {
            return Err("Router max attempts must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for HealthMonitorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.unavailable_after == 0 {
            return Err("Health unavailable_after must be greater than 0".to_string());
        }

        if self.recover_after == 0 {
            return Err("Health recover_after must be greater than 0".to_string());
        }

        if !(self.degraded_failure_rate > 0.0 && self.degraded_failure_rate <= 1.0) {
            return Err(format!(
                "Health degraded failure rate must be in (0, 1], got {}",
                self.degraded_failure_rate
            ));
        }

        if self.min_samples == 0 || self.window_size == 0 || self.window_secs == 0 {
            return Err("Health window settings must be greater than 0".to_string());
        }

        if self.probe_interval_secs == 0 {
            return Err("Health probe interval must be greater than 0".to_string());
        }

        if self.probe_timeout_secs == 0 {
            return Err("Health probe timeout must be greater than 0".to_string());
        }

        if self.probe_interval() > MAX_CALL_TIMEOUT || self.probe_timeout() > MAX_CALL_TIMEOUT {
            return Err(format!(
                "Health probe interval and timeout must not exceed {} s",
                MAX_CALL_TIMEOUT.as_secs()
            ));
        }

        if self.rate_limit_backoff_base_ms == 0
            || self.rate_limit_backoff_max_ms < self.rate_limit_backoff_base_ms
        {
            return Err("Health rate-limit backoff max must be at least base, and base greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for CostConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.chars_per_token.is_finite() && self.chars_per_token > 0.0) {
            return Err("Cost chars_per_token must be greater than 0".to_string());
        }

        if self.billing_window_secs == Some(0) {
            return Err("Cost billing window must be greater than 0".to_string());
        }

        for (tenant, budget) in &self.tenant_budgets {
            if !budget.is_finite() || *budget < 0.0 {
                return Err(format!("Tenant {} has invalid budget: {}", tenant, budget));
            }
        }

        Ok(())
    }
}

impl Validate for HttpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.connect_timeout_secs == 0 {
            return Err("HTTP connect timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
