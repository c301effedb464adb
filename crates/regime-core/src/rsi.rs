//! Relative Strength Index.
//!
//! Simple-mean variant: average gain and average loss are the arithmetic
//! mean of the last `period` deltas (no Wilder smoothing).

/// Default lookback used by the monitor.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Value returned when the series is too short to say anything.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute RSI over `prices` (oldest first).
///
/// Returns [`NEUTRAL_RSI`] if fewer than `period + 1` prices are supplied
/// or `period` is zero. Returns 100.0 when the window has no losses.
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    let Some(needed) = period.checked_add(1) else {
        return NEUTRAL_RSI;
    };
    if period == 0 || prices.len() < needed {
        return NEUTRAL_RSI;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let window = &deltas[deltas.len() - period..];

    let gain_sum: f64 = window.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).sum();
    let loss_sum: f64 = window.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).sum();

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![100.0; 10];
        assert_eq!(calculate_rsi(&prices, 14), NEUTRAL_RSI);
        assert_eq!(calculate_rsi(&[], 14), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_huge_period_is_neutral() {
        assert_eq!(calculate_rsi(&[1.0, 2.0, 3.0], usize::MAX), NEUTRAL_RSI);
        assert_eq!(calculate_rsi(&[1.0, 2.0, 3.0], usize::MAX - 1), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_zero_period_is_neutral() {
        assert_eq!(calculate_rsi(&[1.0, 2.0, 3.0], 0), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_all_gains_saturates() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), 100.0);
    }

    #[test]
    fn test_rsi_flat_series_saturates() {
        // No losses at all, so the zero-loss rule applies.
        let prices = vec![100.0; 15];
        assert_eq!(calculate_rsi(&prices, 14), 100.0);
    }

    #[test]
    fn test_rsi_all_losses_near_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 200.0 - i as f64).collect();
        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi >= 0.0);
        assert!(rsi < 1e-9, "rsi = {rsi}");
    }

    #[test]
    fn test_rsi_balanced_moves_is_fifty() {
        // Alternating +1 / -1 over an even window.
        let mut prices = vec![100.0];
        for i in 0..14 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        let rsi = calculate_rsi(&prices, 14);
        assert!((rsi - 50.0).abs() < 1e-9, "rsi = {rsi}");
    }

    #[test]
    fn test_rsi_known_value() {
        // Deltas: +2, -1, +2, -1 -> avg_gain = 1.0, avg_loss = 0.5, RS = 2.
        let prices = [10.0, 12.0, 11.0, 13.0, 12.0];
        let rsi = calculate_rsi(&prices, 4);
        let expected = 100.0 - 100.0 / 3.0;
        assert!((rsi - expected).abs() < 1e-9, "rsi = {rsi}");
    }

    #[test]
    fn test_rsi_uses_most_recent_window() {
        // Old crash followed by a clean rally: only the rally is in the window.
        let mut prices = vec![500.0, 100.0];
        prices.extend((1..=3).map(|i| 100.0 + i as f64));
        assert_eq!(calculate_rsi(&prices, 3), 100.0);
    }
}
