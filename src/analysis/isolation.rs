//! Isolation forest over a single numeric feature.
//!
//! Each tree recursively splits a random sub-sample at a uniform point
//! between the node's min and max. Points that get isolated after few
//! splits are anomalous. Scores follow Liu, Ting & Zhou (2008):
//! `s(x) = 2^(-E[h(x)] / c(ψ))`, so higher means more anomalous.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use super::stats::{quantile_sorted, sort_values};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Detector parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsolationForest {
    pub n_trees: usize,
    /// Sub-sample size per tree, capped at the number of points.
    pub sample_size: usize,
    /// Expected fraction of anomalies, in `(0, 0.5]`.
    pub contamination: f64,
    /// `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
}

impl Default for IsolationForest {
    fn default() -> Self {
        IsolationForest {
            n_trees: 100,
            sample_size: 256,
            contamination: 0.01,
            seed: None,
        }
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A forest fitted on one sample, with its decision threshold.
#[derive(Debug)]
pub struct FittedForest {
    trees: Vec<Node>,
    sample_size: usize,
    /// Scores strictly above this are anomalies.
    pub threshold: f64,
    /// Score of every fitted value, in input order.
    pub training_scores: Vec<f64>,
}

/// Average path length of an unsuccessful BST search among `n` points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn build(values: &mut [f64], depth: usize, limit: usize, rng: &mut StdRng) -> Node {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if depth >= limit || values.len() <= 1 || min >= max {
        return Node::Leaf { size: values.len() };
    }

    // Convex combination: `max - min` may overflow for extreme finite values.
    let u: f64 = rng.gen();
    let threshold = match min * (1.0 - u) + max * u {
        t if t < max => t,
        _ => min,
    };
    // Partition in place: [< threshold | >= threshold].
    let mut mid = 0;
    for i in 0..values.len() {
        if values[i] < threshold {
            values.swap(i, mid);
            mid += 1;
        }
    }
    let (left, right) = values.split_at_mut(mid);
    Node::Split {
        threshold,
        left: Box::new(build(left, depth + 1, limit, rng)),
        right: Box::new(build(right, depth + 1, limit, rng)),
    }
}

fn path_length(node: &Node, x: f64) -> f64 {
    let mut node = node;
    let mut depth = 0.0;
    loop {
        match node {
            Node::Leaf { size } => return depth + average_path_length(*size),
            Node::Split {
                threshold,
                left,
                right,
            } => {
                node = if x < *threshold { left } else { right };
                depth += 1.0;
            }
        }
    }
}

impl IsolationForest {
    /// Fit on `values` and set the threshold so that roughly
    /// `contamination` of them score above it. `None` for an empty sample.
    pub fn fit(&self, values: &[f64]) -> Option<FittedForest> {
        if values.is_empty() {
            return None;
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let sample_size = self.sample_size.clamp(1, values.len());
        let limit = (sample_size as f64).log2().ceil() as usize;

        let trees = (0..self.n_trees.max(1))
            .map(|_| {
                let mut sample: Vec<f64> = index::sample(&mut rng, values.len(), sample_size)
                    .into_iter()
                    .map(|i| values[i])
                    .collect();
                build(&mut sample, 0, limit, &mut rng)
            })
            .collect();

        let mut forest = FittedForest {
            trees,
            sample_size,
            threshold: f64::INFINITY,
            training_scores: Vec::new(),
        };

        let scores = forest.score_samples(values);
        let mut sorted = scores.clone();
        sort_values(&mut sorted);
        forest.threshold = quantile_sorted(&sorted, 1.0 - self.contamination)?;
        forest.training_scores = scores;
        log::debug!(
            "Fitted {} trees on {} points (ψ = {sample_size}), threshold {:.4}",
            forest.trees.len(),
            values.len(),
            forest.threshold
        );
        Some(forest)
    }
}

impl FittedForest {
    pub fn score(&self, x: f64) -> f64 {
        let c = average_path_length(self.sample_size);
        if c == 0.0 {
            return 0.5;
        }
        let mean_path =
            self.trees.iter().map(|t| path_length(t, x)).sum::<f64>() / self.trees.len() as f64;
        2f64.powf(-mean_path / c)
    }

    pub fn score_samples(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.score(x)).collect()
    }

    #[cfg(test)]
    pub fn is_anomaly(&self, x: f64) -> bool {
        self.score(x) > self.threshold
    }

    /// `true` for every anomalous value of the fitted sample, in input order.
    pub fn training_anomalies(&self) -> impl Iterator<Item = bool> + '_ {
        self.training_scores.iter().map(|&s| s > self.threshold)
    }
}
