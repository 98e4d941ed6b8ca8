//! Small numeric helpers behind the density and histogram builders:
//! mean/median/spread, an evenly spaced grid, Gaussian kernel density
//! evaluation, and fixed-width binning.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median with the usual even/odd split. `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Sample standard deviation (ddof = 1). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// `count` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Evaluate a Gaussian kernel density estimate at each grid point.
///
/// `bandwidth` is the kernel width in data units; the caller picks it
/// (typically Scott's factor `n^(-1/5)` times the sample standard
/// deviation). Returns an empty vector when the estimate is undefined
/// (no samples, or a degenerate bandwidth).
pub fn gaussian_kde(samples: &[f64], bandwidth: f64, grid: &[f64]) -> Vec<f64> {
    if samples.is_empty() || !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Vec::new();
    }
    let norm = 1.0 / (samples.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|x| {
            samples
                .iter()
                .map(|s| {
                    let z = (x - s) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

/// Fixed-width histogram over `[min, max]` of the samples.
///
/// Returns `(counts, edges)` with `edges.len() == counts.len() + 1`. The
/// final bin is closed on the right so the maximum lands in it. A
/// degenerate single-valued sample expands to `[v - 0.5, v + 0.5]`; an
/// empty sample yields empty output.
pub fn histogram(samples: &[f64], bins: usize) -> (Vec<f64>, Vec<f64>) {
    if samples.is_empty() || bins == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut lo = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0.0; bins];
    for &v in samples {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }
    (counts, edges)
}

/// Normalize histogram counts to a density (integral one).
pub fn to_density(counts: &[f64], edges: &[f64], n: usize) -> Vec<f64> {
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let width = edges[i + 1] - edges[i];
            if n == 0 || width == 0.0 {
                0.0
            } else {
                c / (n as f64 * width)
            }
        })
        .collect()
}
