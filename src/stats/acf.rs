///Sample autocorrelation of a series up to `max_lag`.
///
///Uses the direct definition on centered data with the full-sample variance in the
///denominator, so element `k - 1` of the result is the lag-k autocorrelation. Lags beyond
///`series.len() - 1` are zero.
pub fn autocorrelation(series: &[f64], max_lag: usize) -> Vec<f64> {
    let n = series.len();
    let mean = series.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = series.iter().map(|val| val - mean).collect();
    let denominator: f64 = centered.iter().map(|val| val * val).sum();

    (1..=max_lag)
        .map(|lag| {
            if lag >= n {
                return 0.0;
            }
            let numerator: f64 = centered[..n - lag]
                .iter()
                .zip(&centered[lag..])
                .map(|(early, late)| early * late)
                .sum();
            numerator / denominator
        })
        .collect()
}

///Approximate 95% confidence band for the autocorrelation of `n` serially independent
///observations: +-1.96 / sqrt(n).
pub fn confidence_band(n: usize) -> f64 {
    1.96 / (n as f64).sqrt()
}
