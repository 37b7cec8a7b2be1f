use ndarray::ArrayView2;

/// Feature matrix quantised into per-column bins for histogram split search.
///
/// Column `f` has thresholds `t_0 < t_1 < ... < t_{k-1}`; a value `x` falls
/// in bin `i` when exactly `i` thresholds are strictly below it. Hence
/// `bin(x) <= i` holds exactly when `x <= t_i`, so a split found on bins
/// can be replayed on raw values.
#[derive(Debug, Clone)]
pub(crate) struct BinnedMatrix {
    /// Column-major bin indices: `columns[f][row]`.
    columns: Vec<Vec<u8>>,
    thresholds: Vec<Vec<f64>>,
    n_rows: usize,
}

impl BinnedMatrix {
    /// `max_thresholds` must be at most 255 so bin indices fit in a `u8`.
    pub fn new(x: ArrayView2<'_, f64>, max_thresholds: usize) -> Self {
        let max_thresholds = max_thresholds.clamp(1, u8::MAX as usize);
        let mut columns = Vec::with_capacity(x.ncols());
        let mut thresholds = Vec::with_capacity(x.ncols());

        for column in x.columns() {
            let mut sorted: Vec<f64> = column.to_vec();
            sorted.sort_by(f64::total_cmp);
            let cuts = candidate_thresholds(&sorted, max_thresholds);
            let bins = column
                .iter()
                .map(|&value| bin_index(&cuts, value))
                .collect();
            columns.push(bins);
            thresholds.push(cuts);
        }

        Self {
            columns,
            thresholds,
            n_rows: x.nrows(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn n_bins(&self, feature: usize) -> usize {
        self.thresholds[feature].len() + 1
    }

    pub fn column(&self, feature: usize) -> &[u8] {
        &self.columns[feature]
    }

    pub fn bin(&self, row: usize, feature: usize) -> u8 {
        self.columns[feature][row]
    }

    /// Raw-value threshold equivalent to the split `bin <= bin_index`.
    pub fn threshold(&self, feature: usize, bin_index: usize) -> f64 {
        self.thresholds[feature][bin_index]
    }
}

fn bin_index(cuts: &[f64], value: f64) -> u8 {
    // Fits: at most 255 cuts, so the index is at most 255.
    cuts.partition_point(|&cut| cut < value) as u8
}

/// Midpoints between neighbouring distinct values. With more distinct values
/// than the budget, the cut positions are taken at evenly spaced quantiles.
fn candidate_thresholds(sorted: &[f64], max_thresholds: usize) -> Vec<f64> {
    let mut distinct: Vec<f64> = sorted.to_vec();
    distinct.dedup();

    if distinct.len() <= max_thresholds + 1 {
        return distinct.windows(2).map(|w| midpoint(w[0], w[1])).collect();
    }

    let n = sorted.len();
    let mut cuts = Vec::with_capacity(max_thresholds);
    for k in 1..=max_thresholds {
        let position = k * n / (max_thresholds + 1);
        if position == 0 || position >= n {
            continue;
        }
        let (below, above) = (sorted[position - 1], sorted[position]);
        if below < above {
            cuts.push(midpoint(below, above));
        }
    }
    cuts.dedup();
    cuts
}

fn midpoint(a: f64, b: f64) -> f64 {
    a + (b - a) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn binary_column_gets_one_midpoint() {
        let x = array![[0.0], [1.0], [1.0], [0.0]];
        let binned = BinnedMatrix::new(x.view(), 255);
        assert_eq!(binned.n_bins(0), 2);
        assert_eq!(binned.threshold(0, 0), 0.5);
        assert_eq!(binned.column(0), &[0, 1, 1, 0]);
    }

    #[test]
    fn bin_order_matches_raw_threshold() {
        let x = Array2::from_shape_fn((1000, 1), |(i, _)| ((i * 7919) % 1000) as f64 / 10.0);
        let binned = BinnedMatrix::new(x.view(), 32);
        assert!(binned.n_bins(0) <= 33);
        for row in 0..binned.n_rows() {
            let value = x[[row, 0]];
            let bin = binned.bin(row, 0) as usize;
            for cut in 0..binned.n_bins(0) - 1 {
                assert_eq!(bin <= cut, value <= binned.threshold(0, cut));
            }
        }
    }

    #[test]
    fn constant_column_has_single_bin() {
        let x = array![[3.0, 1.0], [3.0, 2.0], [3.0, 3.0]];
        let binned = BinnedMatrix::new(x.view(), 255);
        assert_eq!(binned.n_features(), 2);
        assert_eq!(binned.n_bins(0), 1);
        assert_eq!(binned.n_bins(1), 3);
    }
}
