//! Execution helpers
//!
//! Timeout budgeting for attempts and result post-processing.

use crate::config::{CostConfig, RouterConfig};
use crate::core::types::{MAX_CALL_TIMEOUT, NormalizedRequest, Usage};
use std::time::Duration;

/// Timeout for one attempt
///
/// `min(remaining, max(overall * fraction, min_attempt_timeout))`; the last candidate
/// gets everything that is left.
pub fn attempt_timeout(config: &RouterConfig, overall: Duration, remaining: Duration, is_last: bool) -> Duration {
    if is_last {
        return remaining;
    }
    let share = overall.mul_f64(config.attempt_timeout_fraction.clamp(0.0, 1.0));
    share.max(config.min_attempt_timeout()).min(remaining)
}

/// Overall deadline for a call: the request's timeout, then the policy's, then the default
///
/// Capped at [`MAX_CALL_TIMEOUT`].
pub fn overall_deadline(config: &RouterConfig, request: &NormalizedRequest, policy_deadline: Option<Duration>) -> Duration {
    request
        .timeout()
        .or(policy_deadline)
        .unwrap_or_else(|| config.default_deadline())
        .min(MAX_CALL_TIMEOUT)
}

/// Parse the response text as JSON, tolerating a surrounding markdown code fence
pub fn parse_structured(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim()).ok()
}

/// Usage for a successful call whose provider reported none
///
/// Output tokens are estimated from the response text the same way input is.
pub fn fallback_usage(request: &NormalizedRequest, text: &str, config: &CostConfig) -> Usage {
    let chars_per_token = if config.chars_per_token > 0.0 {
        config.chars_per_token
    } else {
        1.0
    };
    let tokens = |chars: usize| (chars as f64 / chars_per_token).ceil() as u32;
    Usage::new(tokens(request.prompt_chars()), tokens(text.chars().count()))
}
