//! Mode-switch rules.
//!
//! Pure functions over already-fetched indicator values. The target mode
//! selects the comparison: switching to [`TradingMode::Bull`] needs values
//! strictly above their thresholds, switching to
//! [`TradingMode::Conservative`] strictly below.

use crate::config::Thresholds;
use regime_core::{ConditionSnapshot, SwitchDecision, TradingMode};

/// Prefix of the require-all reason when an input is missing.
pub const INSUFFICIENT_DATA: &str = "Insufficient data for decision";

fn passes(target: TradingMode, value: f64, threshold: f64) -> bool {
    match target {
        TradingMode::Bull => value > threshold,
        TradingMode::Conservative => value < threshold,
    }
}

fn label(target: TradingMode) -> &'static str {
    match target {
        TradingMode::Bull => "BULL",
        TradingMode::Conservative => "CONSERVATIVE",
    }
}

/// (operator when met, operator when not met)
fn operators(target: TradingMode) -> (&'static str, &'static str) {
    match target {
        TradingMode::Bull => (">", "<="),
        TradingMode::Conservative => ("<", ">="),
    }
}

fn direction_word(target: TradingMode) -> &'static str {
    match target {
        TradingMode::Bull => "above",
        TradingMode::Conservative => "below",
    }
}

/// One comparison and how to describe it either way.
struct Check {
    passed: bool,
    met: String,
    unmet: String,
}

/// Require-all rule.
///
/// Every indicator in `snapshot` must be present and pass. When
/// `thresholds.price` is set, `price` must also be present and pass.
/// The negative reason lists every failed check.
pub fn evaluate_require_all(
    target: TradingMode,
    snapshot: &ConditionSnapshot,
    price: Option<f64>,
    thresholds: &Thresholds,
) -> SwitchDecision {
    let mut missing: Vec<&str> = snapshot.missing().iter().map(|k| k.as_str()).collect();
    if thresholds.price.is_some() && price.is_none() {
        missing.push("price");
    }

    let (rsi, fg, change) = match (
        snapshot.rsi,
        snapshot.sentiment_index,
        snapshot.price_change_1h_pct,
    ) {
        (Some(rsi), Some(fg), Some(change)) if missing.is_empty() => (rsi, fg, change),
        _ => {
            return SwitchDecision::hold(format!(
                "{INSUFFICIENT_DATA} (missing: {})",
                missing.join(", ")
            ))
        }
    };

    let (ok_op, fail_op) = operators(target);
    let mut checks = vec![
        Check {
            passed: passes(target, rsi, thresholds.rsi),
            met: format!("RSI={rsi:.1}{ok_op}{}", thresholds.rsi),
            unmet: format!("RSI={rsi:.1}{fail_op}{}", thresholds.rsi),
        },
        Check {
            passed: passes(target, f64::from(fg), f64::from(thresholds.sentiment)),
            met: format!("F&G={fg}{ok_op}{}", thresholds.sentiment),
            unmet: format!("F&G={fg}{fail_op}{}", thresholds.sentiment),
        },
        Check {
            passed: passes(target, change, thresholds.price_change_pct),
            met: format!("BTC={change:+.2}%{ok_op}{}%", thresholds.price_change_pct),
            unmet: format!("BTC={change:+.2}%{fail_op}{}%", thresholds.price_change_pct),
        },
    ];
    if let (Some(level), Some(px)) = (thresholds.price, price) {
        checks.push(Check {
            passed: passes(target, px, level),
            met: format!("price={px:.2}{ok_op}{level}"),
            unmet: format!("price={px:.2}{fail_op}{level}"),
        });
    }

    if checks.iter().all(|c| c.passed) {
        let met: Vec<&str> = checks.iter().map(|c| c.met.as_str()).collect();
        SwitchDecision::switch(format!("{} conditions met: {}", label(target), met.join(", ")))
    } else {
        let unmet: Vec<&str> = checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.unmet.as_str())
            .collect();
        SwitchDecision::hold(format!(
            "{} conditions not met: {}",
            label(target),
            unmet.join(", ")
        ))
    }
}

/// Absolute price breakout trigger. A missing price never fires.
pub fn price_trigger(
    target: TradingMode,
    price: Option<f64>,
    thresholds: &Thresholds,
) -> Option<SwitchDecision> {
    let (level, px) = (thresholds.price?, price?);
    passes(target, px, level).then(|| {
        SwitchDecision::switch(format!(
            "{} trigger: BTC price {px:.2} {} breakout level {level}",
            label(target),
            direction_word(target)
        ))
    })
}

/// Hourly growth (bull) or decline (conservative) trigger.
pub fn change_trigger(
    target: TradingMode,
    change_1h_pct: Option<f64>,
    thresholds: &Thresholds,
) -> Option<SwitchDecision> {
    let change = change_1h_pct?;
    passes(target, change, thresholds.price_change_pct).then(|| {
        SwitchDecision::switch(format!(
            "{} trigger: BTC 1h change {change:+.2}% {} {:+.2}%",
            label(target),
            direction_word(target),
            thresholds.price_change_pct
        ))
    })
}

/// Sentiment index crossing trigger.
pub fn sentiment_trigger(
    target: TradingMode,
    sentiment: Option<u32>,
    thresholds: &Thresholds,
) -> Option<SwitchDecision> {
    let fg = sentiment?;
    passes(target, f64::from(fg), f64::from(thresholds.sentiment)).then(|| {
        SwitchDecision::switch(format!(
            "{} trigger: Fear & Greed {fg} {} {}",
            label(target),
            direction_word(target),
            thresholds.sentiment
        ))
    })
}

/// Any-trigger rule over already-fetched inputs.
///
/// Triggers are tried in order: absolute price breakout, hourly
/// growth/decline, sentiment. The first one that fires decides, and the
/// reason names only that trigger. Missing inputs never fire. RSI is not a
/// trigger. With no trigger the decision is negative with an empty reason.
pub fn evaluate_any_trigger(
    target: TradingMode,
    price: Option<f64>,
    change_1h_pct: Option<f64>,
    sentiment: Option<u32>,
    thresholds: &Thresholds,
) -> SwitchDecision {
    price_trigger(target, price, thresholds)
        .or_else(|| change_trigger(target, change_1h_pct, thresholds))
        .or_else(|| sentiment_trigger(target, sentiment, thresholds))
        .unwrap_or_else(SwitchDecision::no_signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(rsi: Option<f64>, fg: Option<u32>, change: Option<f64>) -> ConditionSnapshot {
        ConditionSnapshot {
            rsi,
            sentiment_index: fg,
            price_change_1h_pct: change,
            captured_at: Utc::now(),
        }
    }

    fn bull() -> Thresholds {
        Thresholds {
            rsi: 60.0,
            sentiment: 60,
            price_change_pct: 3.0,
            price: None,
        }
    }

    fn conservative() -> Thresholds {
        Thresholds {
            rsi: 40.0,
            sentiment: 50,
            price_change_pct: -2.0,
            price: None,
        }
    }

    #[test]
    fn test_require_all_bull_met() {
        let snap = snapshot(Some(72.0), Some(65), Some(4.5));
        let d = evaluate_require_all(TradingMode::Bull, &snap, None, &bull());
        assert!(d.should_switch);
        assert!(d.reason.contains("72.0"), "{}", d.reason);
        assert!(d.reason.contains("65"), "{}", d.reason);
        assert!(d.reason.contains("+4.50"), "{}", d.reason);
        assert_eq!(
            d.reason,
            "BULL conditions met: RSI=72.0>60, F&G=65>60, BTC=+4.50%>3%"
        );
    }

    #[test]
    fn test_require_all_bull_lists_every_unmet_check() {
        let snap = snapshot(Some(45.0), Some(30), Some(-0.5));
        let d = evaluate_require_all(TradingMode::Bull, &snap, None, &bull());
        assert!(!d.should_switch);
        assert_eq!(
            d.reason,
            "BULL conditions not met: RSI=45.0<=60, F&G=30<=60, BTC=-0.50%<=3%"
        );
    }

    #[test]
    fn test_require_all_partial_failure_names_only_failures() {
        let snap = snapshot(Some(72.0), Some(55), Some(4.5));
        let d = evaluate_require_all(TradingMode::Bull, &snap, None, &bull());
        assert!(!d.should_switch);
        assert!(d.reason.contains("F&G=55<=60"));
        assert!(!d.reason.contains("RSI"));
        assert!(!d.reason.contains("BTC"));
    }

    #[test]
    fn test_require_all_threshold_equality_fails() {
        // Comparisons are strict.
        let snap = snapshot(Some(60.0), Some(60), Some(3.0));
        let d = evaluate_require_all(TradingMode::Bull, &snap, None, &bull());
        assert!(!d.should_switch);
    }

    #[test]
    fn test_require_all_missing_sentiment_is_insufficient() {
        let snap = snapshot(Some(30.0), None, Some(-1.0));
        let d = evaluate_require_all(TradingMode::Conservative, &snap, None, &conservative());
        assert!(!d.should_switch);
        assert!(d.reason.starts_with(INSUFFICIENT_DATA));
        assert!(d.reason.contains("sentiment"));
    }

    #[test]
    fn test_require_all_conservative_met() {
        let snap = snapshot(Some(30.0), Some(20), Some(-3.0));
        let d = evaluate_require_all(TradingMode::Conservative, &snap, None, &conservative());
        assert!(d.should_switch);
        assert_eq!(
            d.reason,
            "CONSERVATIVE conditions met: RSI=30.0<40, F&G=20<50, BTC=-3.00%<-2%"
        );
    }

    #[test]
    fn test_require_all_conservative_unmet_operators() {
        let snap = snapshot(Some(50.0), Some(60), Some(1.0));
        let d = evaluate_require_all(TradingMode::Conservative, &snap, None, &conservative());
        assert!(!d.should_switch);
        assert_eq!(
            d.reason,
            "CONSERVATIVE conditions not met: RSI=50.0>=40, F&G=60>=50, BTC=+1.00%>=-2%"
        );
    }

    #[test]
    fn test_require_all_with_price_threshold() {
        let mut t = bull();
        t.price = Some(70_000.0);
        let snap = snapshot(Some(72.0), Some(65), Some(4.5));

        let missing = evaluate_require_all(TradingMode::Bull, &snap, None, &t);
        assert!(missing.reason.contains("missing: price"));

        let below = evaluate_require_all(TradingMode::Bull, &snap, Some(69_000.0), &t);
        assert!(!below.should_switch);
        assert!(below.reason.contains("price=69000.00<=70000"));

        let above = evaluate_require_all(TradingMode::Bull, &snap, Some(71_000.0), &t);
        assert!(above.should_switch);
        assert!(above.reason.contains("price=71000.00>70000"));
    }

    #[test]
    fn test_any_trigger_price_has_priority() {
        let mut t = bull();
        t.price = Some(70_000.0);
        let d = evaluate_any_trigger(TradingMode::Bull, Some(71_000.0), Some(5.0), Some(90), &t);
        assert!(d.should_switch);
        assert!(d.reason.contains("breakout"));
        assert!(!d.reason.contains("Fear"));
        assert!(!d.reason.contains("1h change"));
    }

    #[test]
    fn test_any_trigger_growth_before_sentiment() {
        let d = evaluate_any_trigger(
            TradingMode::Bull,
            Some(50_000.0),
            Some(4.5),
            Some(90),
            &bull(),
        );
        assert!(d.should_switch);
        assert_eq!(d.reason, "BULL trigger: BTC 1h change +4.50% above +3.00%");
    }

    #[test]
    fn test_any_trigger_sentiment_last() {
        let d = evaluate_any_trigger(TradingMode::Bull, None, Some(0.5), Some(75), &bull());
        assert!(d.should_switch);
        assert_eq!(d.reason, "BULL trigger: Fear & Greed 75 above 60");
    }

    #[test]
    fn test_any_trigger_none_fires() {
        let d = evaluate_any_trigger(TradingMode::Bull, Some(10.0), Some(0.5), Some(40), &bull());
        assert_eq!(d, SwitchDecision::no_signal());
    }

    #[test]
    fn test_any_trigger_missing_price_never_counts_as_below() {
        let mut t = conservative();
        t.price = Some(60_000.0);
        let d = evaluate_any_trigger(TradingMode::Conservative, None, None, None, &t);
        assert!(!d.should_switch);
        assert!(d.reason.is_empty());
    }

    #[test]
    fn test_single_triggers_skip_missing_inputs() {
        let mut t = bull();
        t.price = Some(70_000.0);
        assert!(price_trigger(TradingMode::Bull, None, &t).is_none());
        assert!(price_trigger(TradingMode::Bull, Some(71_000.0), &bull()).is_none());
        assert!(change_trigger(TradingMode::Bull, None, &t).is_none());
        assert!(sentiment_trigger(TradingMode::Bull, None, &t).is_none());
        assert!(sentiment_trigger(TradingMode::Bull, Some(61), &t).unwrap().should_switch);
    }

    #[test]
    fn test_any_trigger_conservative_decline() {
        let d = evaluate_any_trigger(
            TradingMode::Conservative,
            Some(60_000.0),
            Some(-2.5),
            Some(55),
            &conservative(),
        );
        assert!(d.should_switch);
        assert_eq!(d.reason, "CONSERVATIVE trigger: BTC 1h change -2.50% below -2.00%");
    }
}
