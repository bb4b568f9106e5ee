/// Exponential Moving Average seeded with the first observation
/// (recursive form, alpha = 2 / (span + 1)). Output has the same length as the input.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    let mut prev = data[0];
    result.push(prev);

    for &value in &data[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        result.push(prev);
    }

    result
}

/// Relative Strength Index with Wilder smoothing.
///
/// The first value covers the seed window of `period` changes; one value
/// follows for every later bar.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = data
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    let to_rsi = |avg_gain: f64, avg_loss: f64| {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 { 50.0 } else { 100.0 }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    };

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut values = Vec::with_capacity(gains.len() - period + 1);
    values.push(to_rsi(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        values.push(to_rsi(avg_gain, avg_loss));
    }

    values
}

/// MACD (Moving Average Convergence Divergence)
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdResult {
    fn empty() -> Self {
        MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] }
    }
}

pub fn macd(data: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdResult {
    if fast_span == 0 || signal_span == 0 || slow_span <= fast_span || data.is_empty() {
        return MacdResult::empty();
    }

    let ema_fast = ema(data, fast_span);
    let ema_slow = ema(data, slow_span);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal_span);
    let histogram = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}
