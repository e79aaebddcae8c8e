//! Property tests for the risk aggregator bounds.

use proptest::prelude::*;
use verity_risk::{score, RiskSignals};
use verity_types::RiskLevel;

fn maybe_signal() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        (-2.0f64..3.0).prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn score_is_always_bounded(
        d in maybe_signal(),
        f in maybe_signal(),
        g in maybe_signal(),
        p in maybe_signal(),
    ) {
        let assessment = score(&RiskSignals {
            document_authenticity: d,
            face_match_score: f,
            gps_match: g,
            phone_verification: p,
        });
        prop_assert!(assessment.score <= 100);
        // The baseline is unconditional.
        prop_assert!(assessment.score >= 15);
    }

    #[test]
    fn level_is_monotone_in_score(
        d in 0.0f64..1.0,
        f in 0.0f64..1.0,
    ) {
        let low = score(&RiskSignals {
            document_authenticity: Some(d * 0.5),
            face_match_score: Some(f * 0.5),
            ..Default::default()
        });
        let high = score(&RiskSignals {
            document_authenticity: Some(d * 0.5 + 0.5),
            face_match_score: Some(f * 0.5 + 0.5),
            ..Default::default()
        });
        prop_assert!(high.score >= low.score);
        // A higher score never maps to a worse band.
        let rank = |l: RiskLevel| match l {
            RiskLevel::Red => 0,
            RiskLevel::Amber => 1,
            RiskLevel::Green => 2,
        };
        prop_assert!(rank(high.level) >= rank(low.level));
    }
}
