use crate::error::{BayesError, Result};
use std::{
    collections::{hash_map::Entry, HashMap},
    f64::consts::PI,
};

/// Mean and population standard deviation of one feature column within one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSummary {
    pub mean: f64,
    pub stdev: f64,
}

impl FeatureSummary {
    fn from_column(members: &[&[f64]], column: usize) -> Self {
        let count = members.len() as f64;
        let mean = members.iter().map(|row| row[column]).sum::<f64>() / count;
        let variance = members
            .iter()
            .map(|row| (row[column] - mean).powi(2))
            .sum::<f64>()
            / count;

        FeatureSummary {
            mean,
            stdev: variance.sqrt(),
        }
    }

    /// True when the variance is zero in floating point, including a stdev so
    /// small that squaring it underflows. Such a feature is a point mass at the
    /// mean.
    pub fn is_point_mass(&self) -> bool {
        self.stdev.powi(2) == 0.0
    }

    /// Gaussian probability density of `x` under this summary.
    ///
    /// For a point mass this is the probability of `x` instead: `1.0` when `x`
    /// equals the mean exactly and `0.0` everywhere else. Class scoring ranks
    /// exact point-mass hits above every finite density.
    pub fn density(&self, x: f64) -> f64 {
        if self.is_point_mass() {
            return if x == self.mean { 1.0 } else { 0.0 };
        }

        let exponent = (-(x - self.mean).powi(2) / (2.0 * self.stdev.powi(2))).exp();
        exponent / ((2.0 * PI).sqrt() * self.stdev)
    }
}

/// Joint likelihood of one class for one vector. An exact hit on a point mass
/// is an unbounded density, so hits are counted apart from the product of the
/// finite densities and compared first. A miss on a point mass zeroes the
/// whole likelihood.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct Likelihood {
    point_masses: usize,
    density: f64,
}

impl Likelihood {
    fn of(summaries: &[FeatureSummary], features: &[f64]) -> Self {
        let mut likelihood = Likelihood {
            point_masses: 0,
            density: 1.0,
        };
        for (summary, &x) in summaries.iter().zip(features.iter()) {
            if !summary.is_point_mass() {
                likelihood.density *= summary.density(x);
            } else if x == summary.mean {
                likelihood.point_masses += 1;
            } else {
                likelihood.density = 0.0;
            }
        }

        if likelihood.density == 0.0 {
            likelihood.point_masses = 0;
        }
        likelihood
    }
}

/// Per-class Gaussian summaries fitted from labeled rows. The last column of
/// every training row is the class label.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNaiveBayes {
    // Sorted ascending by label, this order decides ties:
    classes: Vec<(f64, Vec<FeatureSummary>)>,
    num_features: usize,
}

impl GaussianNaiveBayes {
    pub fn train(rows: &[Vec<f64>]) -> Result<Self> {
        let width = rows.first().ok_or(BayesError::EmptyDataset)?.len();
        if width < 2 {
            return Err(BayesError::VectorTooShort { len: width });
        }
        let num_features = width - 1;

        // Separate the rows by class. Labels are keyed by their bits, with -0.0
        // folded into 0.0 since the two compare equal:
        let mut class_map: HashMap<u64, (f64, Vec<&[f64]>)> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(BayesError::InconsistentVectorLength {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }

            let label = row[num_features];
            if label.is_nan() {
                return Err(BayesError::InvalidLabel { row: i });
            }
            let label = if label == 0.0 { 0.0 } else { label };

            match class_map.entry(label.to_bits()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert((label, Vec::new())),
            }
            .1
            .push(&row[..num_features]);
        }

        // Summarize every feature column of every class:
        let mut classes: Vec<(f64, Vec<FeatureSummary>)> = class_map
            .into_values()
            .map(|(label, members)| {
                let summaries = (0..num_features)
                    .map(|column| FeatureSummary::from_column(&members, column))
                    .collect();
                (label, summaries)
            })
            .collect();
        classes.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        for (label, summaries) in &classes {
            tracing::debug!(label, ?summaries, "class summary");
            if let Some(column) = summaries.iter().position(FeatureSummary::is_point_mass) {
                tracing::warn!(
                    label,
                    column,
                    "class has zero standard deviation, density becomes a point mass"
                );
            }
        }

        Ok(GaussianNaiveBayes {
            classes,
            num_features,
        })
    }

    /// Number of feature columns, i.e. the training row width minus the label.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Class labels with their summaries, in ascending label order.
    pub fn classes(&self) -> impl Iterator<Item = (f64, &[FeatureSummary])> + '_ {
        self.classes
            .iter()
            .map(|(label, summaries)| (*label, summaries.as_slice()))
    }

    pub fn summary(&self, label: f64) -> Option<&[FeatureSummary]> {
        self.classes
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, summaries)| summaries.as_slice())
    }

    /// Given the feature values of a single vector (no label), returns the most
    /// likely class label. The likelihood is the product of the feature
    /// densities with no class prior and no normalization. On equal
    /// likelihoods the smallest label wins.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.num_features {
            return Err(BayesError::FeatureCountMismatch {
                expected: self.num_features,
                found: features.len(),
            });
        }

        // The first class is taken unconditionally, later ones only on a strict
        // improvement:
        let best = self.classes.iter().fold(
            None,
            |best: Option<(f64, Likelihood)>, (label, summaries)| {
                let score = Likelihood::of(summaries, features);
                match best {
                    None => Some((*label, score)),
                    Some((_, best_score)) if score > best_score => Some((*label, score)),
                    _ => best,
                }
            },
        );

        best.map(|(label, _)| label).ok_or(BayesError::EmptyDataset)
    }

    /// Predicts every labeled row in order. The label column is ignored.
    pub fn predict_all(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        let width = self.num_features + 1;
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != width {
                    return Err(BayesError::InconsistentVectorLength {
                        row: i,
                        expected: width,
                        found: row.len(),
                    });
                }
                self.predict_one(&row[..self.num_features])
            })
            .collect()
    }
}

/// Percentage of `rows` whose label (last column) equals the prediction at the
/// same position.
pub fn accuracy(predictions: &[f64], rows: &[Vec<f64>]) -> Result<f64> {
    if rows.is_empty() {
        return Err(BayesError::EmptyDataset);
    }
    if predictions.len() != rows.len() {
        return Err(BayesError::PredictionCountMismatch {
            predictions: predictions.len(),
            rows: rows.len(),
        });
    }

    let correct = rows
        .iter()
        .zip(predictions.iter())
        .filter(|&(row, &prediction)| row.last() == Some(&prediction))
        .count();

    Ok((correct as f64 / rows.len() as f64) * 100.0)
}
