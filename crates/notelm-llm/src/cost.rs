//! Cost accounting
//!
//! Maps (model, token counts) to an estimated USD cost. The pricing table is
//! a hardcoded snapshot in USD per million tokens; treat the output as an
//! estimate for budgeting, not billing. Provider-reported cost figures are
//! never used.

use serde::Serialize;
use tracing::warn;

/// Table entry applied to models with no pricing of their own
pub const FALLBACK_MODEL: &str = "google/gemini-2.0-flash";

/// Per-model rates in USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPricing {
    /// USD per 1M prompt tokens
    pub input_cost_per_million: f64,
    /// USD per 1M completion tokens
    pub output_cost_per_million: f64,
}

impl ModelPricing {
    /// Construct a pricing entry
    #[must_use]
    pub const fn per_million(input: f64, output: f64) -> Self {
        Self {
            input_cost_per_million: input,
            output_cost_per_million: output,
        }
    }

    /// Cost in USD for the given token counts, rounded to 6 decimal places
    #[must_use]
    pub fn cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        let input_cost = f64::from(input_tokens) / 1_000_000.0 * self.input_cost_per_million;
        let output_cost = f64::from(output_tokens) / 1_000_000.0 * self.output_cost_per_million;
        round_usd(input_cost + output_cost)
    }
}

/// Pricing snapshot. OpenRouter ids are provider-qualified; the bare ids at
/// the bottom are what direct Gemini calls are routed with.
const PRICING: &[(&str, ModelPricing)] = &[
    ("anthropic/claude-3.5-sonnet", ModelPricing::per_million(3.0, 15.0)),
    ("anthropic/claude-3-opus", ModelPricing::per_million(15.0, 75.0)),
    ("openai/gpt-4", ModelPricing::per_million(30.0, 60.0)),
    ("openai/gpt-4-turbo", ModelPricing::per_million(10.0, 30.0)),
    ("google/gemini-2.0-flash", ModelPricing::per_million(0.10, 0.40)),
    ("google/gemini-2.5-flash", ModelPricing::per_million(0.15, 0.60)),
    ("google/gemini-2.5-pro", ModelPricing::per_million(1.25, 10.0)),
    ("meta/llama-3.1-70b", ModelPricing::per_million(0.70, 0.70)),
    ("zai/c3-7b", ModelPricing::per_million(0.05, 0.05)),
    ("zai/c3-13b", ModelPricing::per_million(0.10, 0.10)),
    ("zai/c3-40b", ModelPricing::per_million(0.50, 0.50)),
    ("gemini-2.0-flash", ModelPricing::per_million(0.10, 0.40)),
    ("gemini-2.0-flash-lite", ModelPricing::per_million(0.075, 0.30)),
    ("gemini-2.5-flash", ModelPricing::per_million(0.15, 0.60)),
    ("gemini-2.5-pro", ModelPricing::per_million(1.25, 10.0)),
];

/// Look up the pricing entry for a model id
#[must_use]
pub fn pricing_for(model: &str) -> Option<ModelPricing> {
    PRICING.iter().find(|(id, _)| *id == model).map(|(_, p)| *p)
}

/// Rates applied when a model has no table entry
#[must_use]
pub fn fallback_pricing() -> ModelPricing {
    // The fallback model always has a table entry
    pricing_for(FALLBACK_MODEL).unwrap_or(ModelPricing::per_million(0.10, 0.40))
}

/// Compute the USD cost for one generation
///
/// Pure function of its inputs. Models missing from the table are charged at
/// the fallback rate and logged for later reconciliation; this never fails.
#[must_use]
pub fn calculate_cost(model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
    let pricing = match pricing_for(model) {
        Some(pricing) => pricing,
        None => {
            warn!(
                model,
                fallback = FALLBACK_MODEL,
                "no pricing entry for model, using fallback rates"
            );
            fallback_pricing()
        }
    };
    pricing.cost(input_tokens, output_tokens)
}

/// Round to 6 decimal places (micro-dollar precision)
fn round_usd(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_gemini_flash_cost() {
        // 100 prompt + 50 completion tokens at 0.10/0.40 per 1M
        assert_close(calculate_cost("gemini-2.0-flash", 100, 50), 0.000_03);
    }

    #[test]
    fn test_claude_sonnet_cost() {
        // 1000 prompt + 500 completion tokens at 3.00/15.00 per 1M
        assert_close(calculate_cost("anthropic/claude-3.5-sonnet", 1000, 500), 0.010_5);
    }

    #[test]
    fn test_gpt4_cost() {
        assert_close(calculate_cost("openai/gpt-4", 1000, 1000), 0.09);
    }

    #[test]
    fn test_zero_tokens_cost_zero_for_every_entry() {
        for (model, _) in PRICING {
            assert_close(calculate_cost(model, 0, 0), 0.0);
        }
    }

    #[test]
    fn test_unknown_model_uses_fallback_rates() {
        let unknown = calculate_cost("acme/unreleased-13b", 100, 50);
        let fallback = calculate_cost(FALLBACK_MODEL, 100, 50);
        assert_close(unknown, fallback);
    }

    #[test]
    fn test_rounding_to_six_places() {
        // 1 prompt token at 0.075/1M would be 0.000000075, rounds to zero
        assert_close(calculate_cost("gemini-2.0-flash-lite", 1, 0), 0.0);
        // 7 prompt tokens at 0.075/1M is 0.000000525, rounds to 0.000001
        assert_close(calculate_cost("gemini-2.0-flash-lite", 7, 0), 0.000_001);
    }

    #[test]
    fn test_pricing_for_known_models() {
        let pricing = pricing_for("anthropic/claude-3-opus").unwrap();
        assert_close(pricing.input_cost_per_million, 15.0);
        assert_close(pricing.output_cost_per_million, 75.0);
        assert!(pricing_for("nope/never").is_none());
    }

    #[test]
    fn test_large_counts_stay_finite() {
        let cost = calculate_cost("openai/gpt-4", u32::MAX, u32::MAX);
        assert!(cost.is_finite());
        assert!(cost > 0.0);
    }
}
