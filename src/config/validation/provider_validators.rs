//! Provider configuration validators

use super::endpoint::validate_base_url;
use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::providers::ProviderType;
use std::collections::HashSet;

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Provider name cannot be empty".to_string());
        }

        if self.model.trim().is_empty() {
            return Err(format!("Provider {} has no model", self.name));
        }

        match &self.base_url {
            Some(base_url) => validate_base_url(base_url, &format!("Provider {} base_url", self.name))?,
            None if self.provider_type == ProviderType::AzureOpenAI => {
                return Err(format!(
                    "Provider {} ({}) requires base_url",
                    self.name, self.provider_type
                ));
            }
            None => {}
        }

        if self.capabilities.is_empty() {
            return Err(format!("Provider {} declares no capabilities", self.name));
        }

        let prices = [
            ("input_cost_per_1k_tokens", self.pricing.input_cost_per_1k_tokens),
            ("output_cost_per_1k_tokens", self.pricing.output_cost_per_1k_tokens),
            ("cost_per_request", self.pricing.cost_per_request),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "Provider {} has invalid {}: {}",
                    self.name, field, value
                ));
            }
        }

        Ok(())
    }
}

impl Validate for [ProviderConfig] {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for provider in self {
            provider.validate()?;
            if !seen.insert(provider.name.as_str()) {
                return Err(format!("Duplicate provider name: {}", provider.name));
            }
        }
        Ok(())
    }
}
