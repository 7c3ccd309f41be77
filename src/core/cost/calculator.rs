//! Cost calculation
//!
//! Pure functions over a [`RateTable`]. Post-call costs use provider-reported usage;
//! pre-call estimates approximate it from the request.

use super::types::RateTable;
use crate::config::CostConfig;
use crate::core::types::{NormalizedRequest, Usage};

/// Cost of a call with the given usage
pub fn estimate_cost(rates: &RateTable, usage: &Usage) -> f64 {
    let input = usage.input_tokens as f64 / 1000.0 * rates.input_cost_per_1k_tokens;
    let output = usage.output_tokens as f64 / 1000.0 * rates.output_cost_per_1k_tokens;
    input + output + rates.cost_per_request
}

/// Approximate usage of a request before it is sent
///
/// Input tokens are prompt characters over `chars_per_token`, rounded up. Output
/// tokens are the request's maximum, or the configured default.
pub fn estimate_request_usage(request: &NormalizedRequest, config: &CostConfig) -> Usage {
    let chars_per_token = if config.chars_per_token > 0.0 {
        config.chars_per_token
    } else {
        1.0
    };
    let input = (request.prompt_chars() as f64 / chars_per_token).ceil() as u32;
    let output = request
        .max_output_tokens()
        .unwrap_or(config.default_output_tokens);
    Usage::new(input, output)
}

/// Pre-call cost estimate of a request against a rate table
pub fn estimate_request_cost(rates: &RateTable, request: &NormalizedRequest, config: &CostConfig) -> f64 {
    estimate_cost(rates, &estimate_request_usage(request, config))
}
