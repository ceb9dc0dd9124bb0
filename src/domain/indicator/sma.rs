//! Simple Moving Average.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n
//! Warmup: first (n-1) bars are undefined (`None`).
//!
//! Each window is summed from its own closes, so no rounding error carries
//! from one bar to the next, and a window holding a single repeated price
//! returns that price exactly.

pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut values = Vec::with_capacity(closes.len());
    // length of the run of identical closes ending at the current bar
    let mut flat_run = 0usize;

    for (i, &close) in closes.iter().enumerate() {
        flat_run = if i > 0 && closes[i - 1] == close {
            flat_run + 1
        } else {
            1
        };

        if i + 1 < period {
            values.push(None);
        } else if flat_run >= period {
            values.push(Some(close));
        } else {
            let window = &closes[i + 1 - period..=i];
            values.push(Some(window.iter().sum::<f64>() / period as f64));
        }
    }

    values
}
