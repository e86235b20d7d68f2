use crate::classifiers::{ClassifierError, UpdateableClassifier};
use crate::core::instances::Dataset;
use crate::evaluation::{BasicClassificationEvaluator, Snapshot};
use crate::streams::Stream;
use crate::tasks::TaskError;
use cpu_time::ThreadTime;
use tracing::debug;

/// Test-then-train: every instance is classified first, then used to update the
/// learner. The learner starts from an empty training set.
pub struct PrequentialEvaluator {
    learner: Box<dyn UpdateableClassifier>,
    stream: Box<dyn Stream>,
    evaluator: BasicClassificationEvaluator,

    curve: Vec<Snapshot>,

    max_instances: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    start_cpu: ThreadTime,
}

impl PrequentialEvaluator {
    pub fn new(
        mut learner: Box<dyn UpdateableClassifier>,
        stream: Box<dyn Stream>,
        max_instances: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, TaskError> {
        if sample_frequency == 0 {
            return Err(TaskError::InvalidParameter("sample_frequency"));
        }

        learner.train(&Dataset::new(stream.header_ref()))?;
        let evaluator = BasicClassificationEvaluator::new(stream.header().number_of_classes());

        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: Vec::new(),
            max_instances,
            sample_frequency,
            processed: 0,
            start_cpu: ThreadTime::now(),
        })
    }

    pub fn run(&mut self) -> Result<(), TaskError> {
        self.start_cpu = ThreadTime::now();

        while self.stream.has_more_instances() {
            if let Some(n) = self.max_instances
                && self.processed >= n
            {
                break;
            }

            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let prediction = match self.learner.classify(instance.as_ref()) {
                Ok(class) => Some(class),
                Err(ClassifierError::EmptyTrainingSet) => None,
                Err(e) => return Err(e.into()),
            };
            self.evaluator.add_result(instance.as_ref(), prediction);
            self.learner.update(instance.as_ref())?;

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        self.push_snapshot();
        Ok(())
    }

    pub fn curve(&self) -> &[Snapshot] {
        &self.curve
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.curve.last()
    }

    fn push_snapshot(&mut self) {
        let snapshot = Snapshot {
            instances_seen: self.evaluator.instances_seen(),
            unanswered: self.evaluator.unanswered(),
            accuracy: self.evaluator.accuracy(),
            kappa: self.evaluator.kappa(),
            seconds: self.start_cpu.elapsed().as_secs_f64(),
            model_bytes: self.learner.calc_memory_size(),
        };
        debug!(%snapshot, "prequential sample");
        self.curve.push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::lazy::NeighborClassifier;
    use crate::testing::{UpdateSpyClassifier, VecStream};

    fn alternating(n: usize) -> Box<dyn Stream> {
        Box::new(VecStream::new((0..n).map(|i| i % 2).collect()))
    }

    #[test]
    fn ctor_guards() {
        let err = PrequentialEvaluator::new(
            Box::new(NeighborClassifier::new()),
            alternating(10),
            None,
            0,
        )
        .err()
        .unwrap();
        assert!(matches!(err, TaskError::InvalidParameter("sample_frequency")));
    }

    #[test]
    fn first_prediction_is_unanswered() {
        let mut pq =
            PrequentialEvaluator::new(Box::new(NeighborClassifier::new()), alternating(100), None, 10)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 11);
        let last = pq.latest().unwrap();
        assert_eq!(last.instances_seen, 100);
        assert_eq!(last.unanswered, 1);
        // Instance 2 only has a class-0 neighbour; everything after that is exact.
        assert!((last.accuracy - 0.98).abs() < 1e-12);
    }

    #[test]
    fn stops_at_max_instances() {
        let (spy, handle) = UpdateSpyClassifier::new();
        let mut pq = PrequentialEvaluator::new(Box::new(spy), alternating(1000), Some(25), 5)
            .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 6);
        assert_eq!(pq.latest().unwrap().instances_seen, 25);
        assert_eq!(handle.classified(), 25);
        assert_eq!(handle.updated(), 25);
    }

    #[test]
    fn snapshot_frequency_math() {
        let mut pq =
            PrequentialEvaluator::new(Box::new(NeighborClassifier::new()), alternating(12), None, 5)
                .unwrap();
        pq.run().unwrap();

        assert_eq!(pq.curve().len(), 3);
        assert_eq!(pq.latest().unwrap().instances_seen, 12);
    }

    #[test]
    fn empty_stream_yields_single_nan_snapshot() {
        let mut pq =
            PrequentialEvaluator::new(Box::new(NeighborClassifier::new()), alternating(0), None, 5)
                .unwrap();
        pq.run().unwrap();
        assert_eq!(pq.curve().len(), 1);
        assert!(pq.latest().unwrap().accuracy.is_nan());
        assert_eq!(pq.latest().unwrap().kappa, 0.0);
    }
}
