use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::seq::index;

use super::binning::BinnedMatrix;

/// Splits must improve the weighted squared error by more than this.
const MIN_SPLIT_GAIN: f64 = 1e-12;

/// Below this, a Newton leaf denominator is treated as zero.
const MIN_LEAF_DENOMINATOR: f64 = 1e-150;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per node; `None` examines all of them.
    pub max_features: Option<usize>,
}

/// Per-row training signal for one tree.
///
/// Splits maximise the reduction of `Σ w (t - mean)^2`. Leaves predict
/// `Σ w t / Σ w d`, where `d` defaults to 1 (a weighted mean, used by the
/// forest) or carries the loss curvature (a Newton step, used by boosting).
pub(crate) struct TreeSignal<'a> {
    pub targets: &'a [f64],
    pub weights: &'a [f64],
    pub leaf_denominators: Option<&'a [f64]>,
}

impl TreeSignal<'_> {
    fn denominator(&self, row: usize) -> f64 {
        self.leaf_denominators.map_or(1.0, |d| d[row])
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        bin: u8,
        left: usize,
        right: usize,
    },
}

/// Binary regression tree grown on histogram bins.
#[derive(Debug, Clone)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, Default)]
struct BinStats {
    weight: f64,
    weighted_target: f64,
    count: usize,
}

impl BinStats {
    fn add(&mut self, other: &BinStats) {
        self.weight += other.weight;
        self.weighted_target += other.weighted_target;
        self.count += other.count;
    }

    fn minus(&self, other: &BinStats) -> BinStats {
        BinStats {
            weight: self.weight - other.weight,
            weighted_target: self.weighted_target - other.weighted_target,
            count: self.count - other.count,
        }
    }

    fn score(&self) -> f64 {
        if self.weight > 0.0 {
            self.weighted_target * self.weighted_target / self.weight
        } else {
            0.0
        }
    }
}

struct SplitCandidate {
    feature: usize,
    bin: usize,
    gain: f64,
}

struct Builder<'a> {
    data: &'a BinnedMatrix,
    signal: &'a TreeSignal<'a>,
    params: TreeParams,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree on `rows` (indices into `data`). Rows absent from the
    /// slice do not take part, which is how bagging and row subsampling
    /// are expressed.
    pub fn fit(
        data: &BinnedMatrix,
        signal: &TreeSignal<'_>,
        rows: Vec<usize>,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = Builder {
            data,
            signal,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(rows, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    /// Leaf value for a raw (scaled) feature row.
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Leaf value for a row of the matrix the tree was grown on.
    pub fn predict_binned(&self, data: &BinnedMatrix, row: usize) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    bin,
                    left,
                    right,
                    ..
                } => {
                    index = if data.bin(row, *feature) <= *bin { *left } else { *right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }
}

impl Builder<'_> {
    /// Returns the index of the node created for `rows`.
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: self.leaf_value(&rows),
        });

        if depth >= self.params.max_depth
            || rows.len() < self.params.min_samples_split
            || rows.len() < 2 * self.params.min_samples_leaf
        {
            return index;
        }

        let Some(best) = self.best_split(&rows) else {
            return index;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&row| self.data.bin(row, best.feature) as usize <= best.bin);
        drop(rows);

        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[index] = Node::Split {
            feature: best.feature,
            threshold: self.data.threshold(best.feature, best.bin),
            bin: best.bin as u8,
            left,
            right,
        };
        index
    }

    fn leaf_value(&self, rows: &[usize]) -> f64 {
        let (numerator, denominator) = rows.iter().fold((0.0, 0.0), |(num, den), &row| {
            let w = self.signal.weights[row];
            (
                num + w * self.signal.targets[row],
                den + w * self.signal.denominator(row),
            )
        });
        if denominator.abs() < MIN_LEAF_DENOMINATOR {
            0.0
        } else {
            numerator / denominator
        }
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let n_features = self.data.n_features();
        match self.params.max_features {
            Some(k) if k < n_features => index::sample(&mut *self.rng, n_features, k).into_vec(),
            _ => (0..n_features).collect(),
        }
    }

    fn best_split(&mut self, rows: &[usize]) -> Option<SplitCandidate> {
        let features = self.candidate_features();
        let mut best: Option<SplitCandidate> = None;

        for feature in features {
            let n_bins = self.data.n_bins(feature);
            if n_bins < 2 {
                continue;
            }

            let column = self.data.column(feature);
            let mut histogram = vec![BinStats::default(); n_bins];
            for &row in rows {
                let w = self.signal.weights[row];
                let slot = &mut histogram[column[row] as usize];
                slot.weight += w;
                slot.weighted_target += w * self.signal.targets[row];
                slot.count += 1;
            }

            let mut total = BinStats::default();
            for stats in &histogram {
                total.add(stats);
            }
            let parent_score = total.score();

            let mut left = BinStats::default();
            for (bin, stats) in histogram.iter().enumerate().take(n_bins - 1) {
                left.add(stats);
                let right = total.minus(&left);
                if left.count < self.params.min_samples_leaf
                    || right.count < self.params.min_samples_leaf
                    || left.weight <= 0.0
                    || right.weight <= 0.0
                {
                    continue;
                }
                let gain = left.score() + right.score() - parent_score;
                if gain > MIN_SPLIT_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate { feature, bin, gain });
                }
            }
        }

        best
    }
}
