use crate::classifiers::{Classifier, ClassifierError};
use crate::core::instances::Dataset;
use crate::evaluation::{BasicClassificationEvaluator, Snapshot};
use crate::streams::Stream;
use crate::tasks::TaskError;
use cpu_time::ThreadTime;
use tracing::info;

/// Trains once on a dataset, then scores every instance of a test stream.
pub struct HoldoutEvaluator {
    learner: Box<dyn Classifier>,
    train: Dataset,
    test: Box<dyn Stream>,
    evaluator: BasicClassificationEvaluator,
}

impl HoldoutEvaluator {
    pub fn new(
        learner: Box<dyn Classifier>,
        train: Dataset,
        test: Box<dyn Stream>,
    ) -> Result<Self, TaskError> {
        if !train.header().equal_headers(test.header()) {
            return Err(TaskError::HeaderMismatch);
        }
        let evaluator = BasicClassificationEvaluator::new(train.header().number_of_classes());
        Ok(Self {
            learner,
            train,
            test,
            evaluator,
        })
    }

    pub fn run(&mut self) -> Result<Snapshot, TaskError> {
        let start = ThreadTime::now();

        self.learner.train(&self.train)?;
        info!(
            instances = self.train.len(),
            relation = self.train.header().relation_name(),
            "training finished"
        );

        while self.test.has_more_instances() {
            let Some(instance) = self.test.next_instance() else {
                break;
            };
            let prediction = match self.learner.classify(instance.as_ref()) {
                Ok(class) => Some(class),
                Err(ClassifierError::EmptyTrainingSet) => None,
                Err(e) => return Err(e.into()),
            };
            self.evaluator.add_result(instance.as_ref(), prediction);
        }

        Ok(Snapshot {
            instances_seen: self.evaluator.instances_seen(),
            unanswered: self.evaluator.unanswered(),
            accuracy: self.evaluator.accuracy(),
            kappa: self.evaluator.kappa(),
            seconds: start.elapsed().as_secs_f64(),
            model_bytes: self.learner.calc_memory_size(),
        })
    }

    pub fn evaluator(&self) -> &BasicClassificationEvaluator {
        &self.evaluator
    }
}
