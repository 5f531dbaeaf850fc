use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pusher::UpdateDecision;
use crate::types::price::{OnChainPrice, PriceQuote};

/// Threshold below which a newer-but-similar price is not worth an
/// on-chain write.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviationTolerance {
    /// In quote-currency units, after the exponent is applied.
    Absolute { value: f64 },
    /// Percent of the current on-chain value, in [0, 100].
    Percentage { value: f64 },
}

impl Default for DeviationTolerance {
    fn default() -> Self {
        DeviationTolerance::Absolute { value: 0.0 }
    }
}

/// Decide whether a freshly fetched quote warrants an on-chain write.
///
/// Pure: no I/O, no clock reads. A quote that is not strictly newer than
/// the committed value is skipped before any price comparison happens.
pub fn decide(
    quote: &PriceQuote,
    on_chain: &OnChainPrice,
    tolerance: &DeviationTolerance,
) -> Result<UpdateDecision> {
    if quote.publish_time <= on_chain.publish_time {
        return Ok(UpdateDecision::SkipStale);
    }

    // Each side carries its own exponent and is normalized independently.
    let new_value = quote.normalized()?;
    let current_value = on_chain.normalized()?;
    let deviation = (new_value - current_value).abs();

    let within = match tolerance {
        DeviationTolerance::Absolute { value } => deviation <= *value,
        DeviationTolerance::Percentage { value } => {
            if current_value == 0.0 {
                // Relative deviation from a zero baseline is unbounded:
                // never silently stall, always submit.
                false
            } else {
                deviation / current_value <= value / 100.0
            }
        }
    };

    if within {
        Ok(UpdateDecision::SkipWithinTolerance { deviation })
    } else {
        Ok(UpdateDecision::Submit { deviation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    fn quote(price: &str, expo: i32, publish_time: i64) -> PriceQuote {
        PriceQuote {
            price: price.to_string(),
            conf: "0".to_string(),
            expo,
            publish_time,
        }
    }

    fn on_chain(price: &str, expo: i32, publish_time: i64) -> OnChainPrice {
        OnChainPrice {
            price: price.to_string(),
            expo,
            publish_time,
        }
    }

    #[test]
    fn equal_publish_time_is_stale() {
        let decision = decide(
            &quote("10200", -2, 1000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::default(),
        )
        .unwrap();

        assert_eq!(decision, UpdateDecision::SkipStale);
    }

    #[test]
    fn older_quote_is_stale_regardless_of_tolerance() {
        let new_quote = quote("10200", -2, 1234567890);
        let committed = on_chain("10050", -2, 9999999999);

        for tolerance in [
            DeviationTolerance::Absolute { value: 0.0 },
            DeviationTolerance::Percentage { value: 100.0 },
        ] {
            let decision = decide(&new_quote, &committed, &tolerance).unwrap();
            assert_eq!(decision, UpdateDecision::SkipStale);
        }
    }

    #[test]
    fn deviation_within_absolute_tolerance_skips() {
        // 100.00 vs 100.50 against a tolerance of 1.0
        let decision = decide(
            &quote("10000", -2, 2000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::Absolute { value: 1.0 },
        )
        .unwrap();

        match decision {
            UpdateDecision::SkipWithinTolerance { deviation } => {
                assert!((deviation - 0.50).abs() < 1e-9);
            }
            other => panic!("expected within-tolerance skip, got {other:?}"),
        }
    }

    #[test]
    fn deviation_beyond_absolute_tolerance_submits() {
        // 102.00 vs 100.50 against a tolerance of 1.0
        let decision = decide(
            &quote("10200", -2, 2000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::Absolute { value: 1.0 },
        )
        .unwrap();

        match decision {
            UpdateDecision::Submit { deviation } => {
                assert!((deviation - 1.50).abs() < 1e-9);
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn absolute_boundary_equality_skips() {
        // deviation exactly equal to the tolerance
        let decision = decide(
            &quote("10150", -2, 2000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::Absolute { value: 1.0 },
        )
        .unwrap();

        assert!(matches!(decision, UpdateDecision::SkipWithinTolerance { .. }));
    }

    #[test]
    fn percentage_boundary_equality_skips() {
        // 101.0 vs 100.0 is exactly 1%
        let decision = decide(
            &quote("10100", -2, 2000),
            &on_chain("10000", -2, 1000),
            &DeviationTolerance::Percentage { value: 1.0 },
        )
        .unwrap();

        assert!(matches!(decision, UpdateDecision::SkipWithinTolerance { .. }));
    }

    #[test]
    fn percentage_beyond_tolerance_submits() {
        let decision = decide(
            &quote("10300", -2, 2000),
            &on_chain("10000", -2, 1000),
            &DeviationTolerance::Percentage { value: 1.0 },
        )
        .unwrap();

        assert!(matches!(decision, UpdateDecision::Submit { .. }));
    }

    #[test]
    fn zero_baseline_always_submits_under_percentage() {
        let decision = decide(
            &quote("1", -2, 2000),
            &on_chain("0", -2, 1000),
            &DeviationTolerance::Percentage { value: 100.0 },
        )
        .unwrap();

        assert!(matches!(decision, UpdateDecision::Submit { .. }));
    }

    #[test]
    fn default_tolerance_submits_on_any_move() {
        let decision = decide(
            &quote("10051", -2, 2000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::default(),
        )
        .unwrap();

        assert!(matches!(decision, UpdateDecision::Submit { .. }));
    }

    #[test]
    fn unchanged_price_with_default_tolerance_skips() {
        let decision = decide(
            &quote("10050", -2, 2000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::default(),
        )
        .unwrap();

        assert!(matches!(decision, UpdateDecision::SkipWithinTolerance { .. }));
    }

    #[test]
    fn mismatched_exponents_normalize_independently() {
        // 1000000 * 10^-4 = 100.0 against 10050 * 10^-2 = 100.5
        let decision = decide(
            &quote("1000000", -4, 2000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::Absolute { value: 1.0 },
        )
        .unwrap();

        match decision {
            UpdateDecision::SkipWithinTolerance { deviation } => {
                assert!((deviation - 0.50).abs() < 1e-9);
            }
            other => panic!("expected within-tolerance skip, got {other:?}"),
        }
    }

    #[test]
    fn malformed_mantissa_is_an_error() {
        let result = decide(
            &quote("12x45", -2, 2000),
            &on_chain("10050", -2, 1000),
            &DeviationTolerance::default(),
        );

        assert!(matches!(result, Err(Error::InvalidPriceEncoding(_))));
    }

    #[test]
    fn tolerance_deserializes_as_tagged_union() {
        let tolerance: DeviationTolerance =
            serde_json::from_value(serde_json::json!({ "kind": "percentage", "value": 2.5 }))
                .unwrap();

        assert_eq!(tolerance, DeviationTolerance::Percentage { value: 2.5 });
    }

    proptest! {
        #[test]
        fn stale_quotes_never_submit(
            quote_time in 0i64..=10_000,
            chain_time in 0i64..=10_000,
            mantissa in 0u64..=1_000_000u64,
            tolerance in 0.0f64..=1_000.0,
        ) {
            prop_assume!(quote_time <= chain_time);

            let decision = decide(
                &quote(&mantissa.to_string(), -2, quote_time),
                &on_chain("10050", -2, chain_time),
                &DeviationTolerance::Absolute { value: tolerance },
            ).unwrap();

            prop_assert_eq!(decision, UpdateDecision::SkipStale);
        }

        #[test]
        fn absolute_tolerance_skips_iff_within(
            new_mantissa in 0u64..=10_000_000u64,
            current_mantissa in 0u64..=10_000_000u64,
            tolerance in 0.0f64..=100_000.0,
        ) {
            let new_quote = quote(&new_mantissa.to_string(), -2, 2);
            let committed = on_chain(&current_mantissa.to_string(), -2, 1);

            let deviation =
                (new_quote.normalized().unwrap() - committed.normalized().unwrap()).abs();
            let decision = decide(
                &new_quote,
                &committed,
                &DeviationTolerance::Absolute { value: tolerance },
            ).unwrap();

            if deviation <= tolerance {
                prop_assert!(matches!(decision, UpdateDecision::SkipWithinTolerance { .. }), "unexpected decision: {:?}", decision);
            } else {
                prop_assert!(matches!(decision, UpdateDecision::Submit { .. }), "unexpected decision: {:?}", decision);
            }
        }

        #[test]
        fn percentage_tolerance_skips_iff_within(
            new_mantissa in 0u64..=10_000_000u64,
            current_mantissa in 1u64..=10_000_000u64,
            tolerance in 0.0f64..=100.0,
        ) {
            let new_quote = quote(&new_mantissa.to_string(), -2, 2);
            let committed = on_chain(&current_mantissa.to_string(), -2, 1);

            let new_value = new_quote.normalized().unwrap();
            let current_value = committed.normalized().unwrap();
            let ratio = (new_value - current_value).abs() / current_value;
            let decision = decide(
                &new_quote,
                &committed,
                &DeviationTolerance::Percentage { value: tolerance },
            ).unwrap();

            if ratio <= tolerance / 100.0 {
                prop_assert!(matches!(decision, UpdateDecision::SkipWithinTolerance { .. }), "unexpected decision: {:?}", decision);
            } else {
                prop_assert!(matches!(decision, UpdateDecision::Submit { .. }), "unexpected decision: {:?}", decision);
            }
        }

        #[test]
        fn percentage_never_skips_on_zero_baseline(
            new_mantissa in 1u64..=10_000_000u64,
            tolerance in 0.0f64..=100.0,
        ) {
            let decision = decide(
                &quote(&new_mantissa.to_string(), -2, 2),
                &on_chain("0", -2, 1),
                &DeviationTolerance::Percentage { value: tolerance },
            ).unwrap();

            prop_assert!(matches!(decision, UpdateDecision::Submit { .. }), "unexpected decision: {:?}", decision);
        }
    }
}
