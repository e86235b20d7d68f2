use crate::core::instances::Instance;

/// Weighted confusion counts over predicted vs. true class codes.
#[derive(Debug, Clone)]
pub struct BasicClassificationEvaluator {
    num_classes: usize,
    confusion: Vec<Vec<f64>>,
    actual_totals: Vec<f64>,
    predicted_totals: Vec<f64>,
    weight_observed: f64,
    weight_correct: f64,
    instances_seen: u64,
    unanswered: u64,
}

impl BasicClassificationEvaluator {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            confusion: vec![vec![0.0; num_classes]; num_classes],
            actual_totals: vec![0.0; num_classes],
            predicted_totals: vec![0.0; num_classes],
            weight_observed: 0.0,
            weight_correct: 0.0,
            instances_seen: 0,
            unanswered: 0,
        }
    }

    /// Records one prediction. `None` means the learner could not answer and
    /// counts as wrong. Instances without a true class are ignored.
    pub fn add_result(&mut self, instance: &dyn Instance, prediction: Option<usize>) {
        let Some(actual) = instance.class_value() else {
            return;
        };
        let actual = actual as usize;
        let w = instance.weight();
        if w <= 0.0 {
            return;
        }
        if actual >= self.num_classes {
            self.grow(actual + 1);
        }

        self.instances_seen += 1;
        self.weight_observed += w;
        self.actual_totals[actual] += w;

        let Some(predicted) = prediction else {
            self.unanswered += 1;
            return;
        };
        if predicted >= self.num_classes {
            self.grow(predicted + 1);
        }
        self.predicted_totals[predicted] += w;
        self.confusion[actual][predicted] += w;
        if predicted == actual {
            self.weight_correct += w;
        }
    }

    fn grow(&mut self, n: usize) {
        for row in &mut self.confusion {
            row.resize(n, 0.0);
        }
        self.confusion.resize_with(n, || vec![0.0; n]);
        self.actual_totals.resize(n, 0.0);
        self.predicted_totals.resize(n, 0.0);
        self.num_classes = n;
    }

    pub fn instances_seen(&self) -> u64 {
        self.instances_seen
    }

    pub fn unanswered(&self) -> u64 {
        self.unanswered
    }

    pub fn confusion_matrix(&self) -> &[Vec<f64>] {
        &self.confusion
    }

    /// Fraction of observed weight predicted correctly; NaN before any result.
    pub fn accuracy(&self) -> f64 {
        if self.weight_observed > 0.0 {
            self.weight_correct / self.weight_observed
        } else {
            f64::NAN
        }
    }

    /// Cohen's kappa; 0 when chance agreement is total or nothing was seen.
    pub fn kappa(&self) -> f64 {
        if self.weight_observed <= 0.0 {
            return 0.0;
        }
        let total = self.weight_observed;
        let p0 = self.weight_correct / total;
        let pc: f64 = self
            .actual_totals
            .iter()
            .zip(&self.predicted_totals)
            .map(|(a, p)| (a / total) * (p / total))
            .sum();
        if (1.0 - pc).abs() < f64::EPSILON {
            0.0
        } else {
            (p0 - pc) / (1.0 - pc)
        }
    }
}
