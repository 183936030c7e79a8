/// Calculate the latest Relative Strength Index (RSI)
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    rsi_series(prices, period).last().copied().flatten()
}

/// RSI value for every price index using Wilder smoothing
///
/// The first value lands at index `period` and is seeded with the plain
/// average of the first `period` gains and losses. After that each average
/// is `(prev * (period - 1) + current) / period`.
pub fn rsi_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; prices.len()];
    if period == 0 || prices.len() < period + 1 {
        return series;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let (gain, loss) = split_change(prices[i] - prices[i - 1]);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    series[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    let smoothing = (period - 1) as f64;
    for i in (period + 1)..prices.len() {
        let (gain, loss) = split_change(prices[i] - prices[i - 1]);
        avg_gain = (avg_gain * smoothing + gain) / period as f64;
        avg_loss = (avg_loss * smoothing + loss) / period as f64;
        series[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    series
}

fn split_change(change: f64) -> (f64, f64) {
    if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, change.abs())
    }
}

// Flat window (no gains, no losses) reads as 0, same as TA-Lib
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        return 0.0;
    }
    100.0 * avg_gain / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_calculation() {
        // Test with known values
        let prices = vec![
            44.0, 44.25, 44.5, 43.75, 44.0, 44.5, 45.0, 45.5, 45.25, 45.5,
            46.0, 46.5, 46.25, 46.0, 46.5,
        ];

        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.is_some());

        let rsi_value = rsi.unwrap();
        assert!(rsi_value > 0.0 && rsi_value < 100.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![100.0, 102.0, 101.0];
        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.is_none());
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices = vec![100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let rsi = calculate_rsi(&prices, 5);
        assert!(rsi.is_some());
        assert_eq!(rsi.unwrap(), 100.0); // All gains = RSI 100
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // Changes: +1, -1, +1, -1
        let prices = vec![1.0, 2.0, 1.0, 2.0, 1.0];
        let series = rsi_series(&prices, 2);

        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        // Seed: gain 0.5, loss 0.5
        assert_eq!(series[2], Some(50.0));
        // gain (0.5 + 1) / 2 = 0.75, loss (0.5 + 0) / 2 = 0.25
        assert_eq!(series[3], Some(75.0));
        // gain 0.375, loss 0.625
        assert_eq!(series[4], Some(37.5));
    }

    #[test]
    fn test_rsi_flat_prices() {
        let prices = vec![10.0; 6];
        assert_eq!(calculate_rsi(&prices, 3), Some(0.0));
    }
}
