#[cfg(test)]
mod tests {
    use super::super::indicators::*;

    // Daily closes of a liquid IDX blue chip over four weeks
    fn sample_prices() -> Vec<f64> {
        vec![
            4410.0, 4390.0, 4400.0, 4350.0, 4420.0, 4480.0, 4510.0, 4540.0, 4580.0, 4600.0,
            4590.0, 4600.0, 4560.0, 4620.0, 4620.0, 4600.0, 4600.0, 4640.0, 4620.0, 4560.0,
        ]
    }

    #[test]
    fn test_ema_seeds_with_first_value() {
        let data = vec![22.0, 24.0, 23.0];
        let result = ema(&data, 3);

        assert_eq!(result.len(), data.len());
        assert_eq!(result[0], 22.0);
        // alpha = 0.5
        assert!((result[1] - 23.0).abs() < 1e-12);
        assert!((result[2] - 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_ema_increases_with_uptrend() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let result = ema(&data, 3);

        for i in 1..result.len() {
            assert!(result[i] > result[i - 1]);
        }
    }

    #[test]
    fn test_rsi_bounds() {
        let result = rsi(&sample_prices(), 14);

        assert_eq!(result.len(), sample_prices().len() - 14);
        for &value in &result {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_extremes() {
        let rising: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert_eq!(*rsi(&rising, 14).last().unwrap(), 100.0);

        let falling: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert_eq!(*rsi(&falling, 14).last().unwrap(), 0.0);

        let flat = vec![100.0; 20];
        assert_eq!(*rsi(&flat, 14).last().unwrap(), 50.0);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        assert!(rsi(&[1.0, 2.0, 3.0], 14).is_empty());
    }

    #[test]
    fn test_macd_lengths_align() {
        let prices = sample_prices();
        let result = macd(&prices, 12, 26, 9);

        assert_eq!(result.macd_line.len(), prices.len());
        assert_eq!(result.signal_line.len(), prices.len());
        assert_eq!(result.histogram.len(), prices.len());
        // Both EMAs start at the first close
        assert_eq!(result.macd_line[0], 0.0);
    }

    #[test]
    fn test_macd_rejects_bad_spans() {
        assert!(macd(&sample_prices(), 26, 12, 9).histogram.is_empty());
        assert!(macd(&[], 12, 26, 9).histogram.is_empty());
    }
}
