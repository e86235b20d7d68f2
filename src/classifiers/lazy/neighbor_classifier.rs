use crate::classifiers::lazy::AttributeRanges;
use crate::classifiers::{
    Classifier, ClassifierError, Describe, Field, PublicationType, TechnicalInformation,
    UpdateableClassifier,
};
use crate::core::capabilities::{Capabilities, Capability};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{Dataset, DenseInstance, Instance};
use crate::utils::memory::{MemoryMeter, MemorySized};
use serde::{Deserialize, Serialize};
use std::ptr;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NeighborParameters {
    /// Emit `debug` events for every train, update and classify call.
    pub debug: bool,
    /// Widen the attribute ranges with each query before scanning.
    pub observe_queries: bool,
}

impl Default for NeighborParameters {
    fn default() -> Self {
        Self {
            debug: false,
            observe_queries: true,
        }
    }
}

struct Model {
    header: Arc<InstanceHeader>,
    training_set: Vec<DenseInstance>,
    ranges: AttributeRanges,
}

enum State {
    Untrained,
    Ready(Model),
}

/// Incremental 1-nearest-neighbor classifier.
///
/// Nominal attributes contribute 0 or 1 to the distance, numeric and date
/// attributes contribute the squared difference of their min-max normalized
/// values. Every stored instance is kept forever; classification is a linear
/// scan and returns the class of the first closest instance.
///
/// Not safe for concurrent use: `update` and `classify` both mutate the model.
pub struct NeighborClassifier {
    params: NeighborParameters,
    state: State,
}

impl Default for NeighborClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NeighborClassifier {
    pub fn new() -> Self {
        Self::with_parameters(NeighborParameters::default())
    }

    pub fn with_parameters(params: NeighborParameters) -> Self {
        Self {
            params,
            state: State::Untrained,
        }
    }

    pub fn parameters(&self) -> &NeighborParameters {
        &self.params
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn header(&self) -> Option<&InstanceHeader> {
        self.model().map(|m| m.header.as_ref())
    }

    pub fn training_set_len(&self) -> usize {
        self.model().map_or(0, |m| m.training_set.len())
    }

    pub fn training_set(&self) -> &[DenseInstance] {
        match self.model() {
            Some(model) => &model.training_set,
            None => &[],
        }
    }

    pub fn ranges(&self) -> Option<&AttributeRanges> {
        self.model().map(|m| &m.ranges)
    }

    /// Distance between two instances under the current attribute ranges.
    pub fn distance(&self, a: &dyn Instance, b: &dyn Instance) -> Result<f64, ClassifierError> {
        self.model()
            .map(|m| m.distance(a, b))
            .ok_or(ClassifierError::NotTrained)
    }

    fn model(&self) -> Option<&Model> {
        match &self.state {
            State::Ready(model) => Some(model),
            State::Untrained => None,
        }
    }
}

impl Model {
    fn same_schema(&self, instance: &dyn Instance) -> bool {
        let other = instance.header();
        ptr::eq(self.header.as_ref(), other) || self.header.equal_headers(other)
    }

    fn distance(&self, first: &dyn Instance, second: &dyn Instance) -> f64 {
        let class_index = self.header.class_index();
        let mut distance = 0.0;

        for i in 0..self.header.number_of_attributes() {
            if i == class_index {
                continue;
            }

            let a = first.value_at_index(i).unwrap_or(f64::NAN);
            let b = second.value_at_index(i).unwrap_or(f64::NAN);

            if self.header.is_nominal(i) {
                if a.is_nan() || b.is_nan() || a as i64 != b as i64 {
                    distance += 1.0;
                }
                continue;
            }

            let diff = match (a.is_nan(), b.is_nan()) {
                (true, true) => 1.0,
                (false, false) => self.ranges.normalize(a, i) - self.ranges.normalize(b, i),
                (false, true) | (true, false) => {
                    let present = if a.is_nan() { b } else { a };
                    let d = self.ranges.normalize(present, i);
                    if d < 0.5 { 1.0 - d } else { d }
                }
            };
            distance += diff * diff;
        }

        distance
    }

    /// First stored instance at minimum distance wins; starts from class 0.
    fn nearest_class(&self, instance: &dyn Instance) -> (usize, f64) {
        let mut min_distance = f64::MAX;
        let mut class_value = 0.0;

        for candidate in &self.training_set {
            let Some(candidate_class) = candidate.class_value() else {
                continue;
            };
            let distance = self.distance(instance, candidate);
            if distance < min_distance {
                min_distance = distance;
                class_value = candidate_class;
            }
        }

        (class_value as usize, min_distance)
    }
}

impl Classifier for NeighborClassifier {
    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
            .with(Capability::NominalAttributes)
            .with(Capability::NumericAttributes)
            .with(Capability::DateAttributes)
            .with(Capability::MissingValues)
            .with(Capability::NominalClass)
            .with(Capability::MissingClassValues)
            .with_minimum_instances(0)
    }

    fn train(&mut self, dataset: &Dataset) -> Result<(), ClassifierError> {
        if self.is_trained() {
            return Err(ClassifierError::AlreadyTrained);
        }
        self.capabilities().test_with_fail(dataset)?;

        let header = dataset.header_ref();
        let mut ranges = AttributeRanges::new(&header);
        let mut training_set = Vec::with_capacity(dataset.len());

        for instance in dataset.iter() {
            ranges.observe(instance);
            if !instance.is_class_missing() {
                training_set.push(instance.clone());
            }
        }

        if self.params.debug {
            debug!(
                relation = header.relation_name(),
                submitted = dataset.len(),
                stored = training_set.len(),
                "trained nearest-neighbor model"
            );
        }

        self.state = State::Ready(Model {
            header,
            training_set,
            ranges,
        });
        Ok(())
    }

    fn classify(&mut self, instance: &dyn Instance) -> Result<usize, ClassifierError> {
        let observe_queries = self.params.observe_queries;
        let State::Ready(model) = &mut self.state else {
            return Err(ClassifierError::NotTrained);
        };
        if model.training_set.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if !model.same_schema(instance) {
            return Err(ClassifierError::SchemaMismatch);
        }
        Capabilities::test_finite(instance)?;

        if observe_queries {
            model.ranges.observe(instance);
        }

        let (class, distance) = model.nearest_class(instance);
        if self.params.debug {
            debug!(class, distance, scanned = model.training_set.len(), "classified instance");
        }
        Ok(class)
    }

    fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }
}

impl UpdateableClassifier for NeighborClassifier {
    fn update(&mut self, instance: &dyn Instance) -> Result<(), ClassifierError> {
        let State::Ready(model) = &mut self.state else {
            return Err(ClassifierError::NotTrained);
        };
        if !model.same_schema(instance) {
            return Err(ClassifierError::SchemaMismatch);
        }
        Capabilities::test_finite(instance)?;
        if instance.is_class_missing() {
            return Ok(());
        }

        model
            .training_set
            .push(DenseInstance::from_instance(Arc::clone(&model.header), instance));
        model.ranges.observe(instance);

        if self.params.debug {
            debug!(stored = model.training_set.len(), "added training instance");
        }
        Ok(())
    }
}

impl Describe for NeighborClassifier {
    fn name(&self) -> &'static str {
        "IBM"
    }

    fn global_info(&self) -> String {
        format!(
            "Incremental nearest-neighbour classifier. Nominal attributes add 1 to the \
             distance when they differ or are missing; numeric and date attributes add the \
             squared difference of their values normalised by the observed range. The class \
             of the closest stored instance is predicted.\n\n\
             For more information, see\n\n{}",
            self.technical_information()
        )
    }

    fn technical_information(&self) -> TechnicalInformation {
        TechnicalInformation::new(PublicationType::Article)
            .with(Field::Author, "S. Cost and S. Salzberg")
            .with(Field::Year, "1993")
            .with(
                Field::Title,
                "A Weighted Nearest Neighbor Algorithm for Learning with Symbolic Features",
            )
            .with(Field::Journal, "Machine Learning")
            .with(Field::Volume, "10")
            .with(Field::Pages, "57-78")
    }
}

impl MemorySized for NeighborClassifier {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let Some(model) = self.model() else {
            return 0;
        };
        let mut total = 0;
        total += meter.measure_field(&model.header);
        total += meter.measure_field(&model.training_set);
        total += meter.measure_field(&model.ranges);
        total
    }
}
