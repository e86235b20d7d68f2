use crate::core::attributes::AttributeKind;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{Dataset, Instance};
use std::collections::HashSet;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    NominalAttributes,
    NumericAttributes,
    DateAttributes,
    MissingValues,
    NominalClass,
    MissingClassValues,
}

impl Capability {
    fn for_attribute(kind: AttributeKind) -> Capability {
        match kind {
            AttributeKind::Nominal => Capability::NominalAttributes,
            AttributeKind::Numeric => Capability::NumericAttributes,
            AttributeKind::Date => Capability::DateAttributes,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CapabilityError {
    #[error("class index {index} is out of range for {attributes} attributes")]
    ClassIndexOutOfRange { index: usize, attributes: usize },
    #[error("attribute '{name}' at index {index} has an unsupported type")]
    UnsupportedAttribute { index: usize, name: String },
    #[error("cannot handle {kind} attributes ('{name}')")]
    AttributeKindDisabled { kind: AttributeKind, name: String },
    #[error("cannot handle a {kind} class ('{name}')")]
    ClassKindDisabled { kind: AttributeKind, name: String },
    #[error("cannot handle missing values (row {row}, attribute {index})")]
    MissingValues { row: usize, index: usize },
    #[error("cannot handle missing class values (row {row})")]
    MissingClassValues { row: usize },
    #[error("row {row} has {found} values but the header declares {expected}")]
    RowArity {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("attribute {index} holds the non-finite value {value}")]
    NonFiniteValue { index: usize, value: f64 },
    #[error("not enough training instances: {found} < {required}")]
    NotEnoughInstances { found: usize, required: usize },
}

/// A declarative allow-list of what a learner accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities {
    enabled: HashSet<Capability>,
    minimum_instances: usize,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.enable(capability);
        self
    }

    pub fn enable(&mut self, capability: Capability) {
        self.enabled.insert(capability);
    }

    pub fn disable(&mut self, capability: Capability) {
        self.enabled.remove(&capability);
    }

    pub fn handles(&self, capability: Capability) -> bool {
        self.enabled.contains(&capability)
    }

    pub fn with_minimum_instances(mut self, minimum: usize) -> Self {
        self.minimum_instances = minimum;
        self
    }

    pub fn minimum_instances(&self) -> usize {
        self.minimum_instances
    }

    /// Checks attribute and class kinds only.
    pub fn test_header(&self, header: &InstanceHeader) -> Result<(), CapabilityError> {
        let class_index = header.class_index();
        let n = header.number_of_attributes();
        if class_index >= n {
            return Err(CapabilityError::ClassIndexOutOfRange {
                index: class_index,
                attributes: n,
            });
        }

        for (index, attr) in header.attributes.iter().enumerate() {
            let kind = header
                .attribute_kind(index)
                .ok_or_else(|| CapabilityError::UnsupportedAttribute {
                    index,
                    name: attr.name(),
                })?;

            if index == class_index {
                if !(kind == AttributeKind::Nominal && self.handles(Capability::NominalClass)) {
                    return Err(CapabilityError::ClassKindDisabled {
                        kind,
                        name: attr.name(),
                    });
                }
                continue;
            }

            if !self.handles(Capability::for_attribute(kind)) {
                return Err(CapabilityError::AttributeKindDisabled {
                    kind,
                    name: attr.name(),
                });
            }
        }

        Ok(())
    }

    /// Checks the header, then every row against the missing-value capabilities
    /// and the minimum instance count.
    pub fn test_with_fail(&self, dataset: &Dataset) -> Result<(), CapabilityError> {
        let header = dataset.header();
        self.test_header(header)?;

        let expected = header.number_of_attributes();
        let class_index = header.class_index();
        let missing_ok = self.handles(Capability::MissingValues);
        let missing_class_ok = self.handles(Capability::MissingClassValues);

        for (row, instance) in dataset.iter().enumerate() {
            if instance.values.len() != expected {
                return Err(CapabilityError::RowArity {
                    row,
                    found: instance.values.len(),
                    expected,
                });
            }
            Self::test_finite(instance)?;
            if missing_ok && missing_class_ok {
                continue;
            }
            for (index, v) in instance.values.iter().enumerate() {
                if !v.is_nan() {
                    continue;
                }
                if index == class_index {
                    if !missing_class_ok {
                        return Err(CapabilityError::MissingClassValues { row });
                    }
                } else if !missing_ok {
                    return Err(CapabilityError::MissingValues { row, index });
                }
            }
        }

        if dataset.len() < self.minimum_instances {
            return Err(CapabilityError::NotEnoughInstances {
                found: dataset.len(),
                required: self.minimum_instances,
            });
        }

        Ok(())
    }

    /// Rejects infinite values. `NaN` is a missing value and passes.
    pub fn test_finite(instance: &dyn Instance) -> Result<(), CapabilityError> {
        for index in 0..instance.number_of_attributes() {
            let Some(value) = instance.value_at_index(index) else {
                continue;
            };
            if value.is_infinite() {
                return Err(CapabilityError::NonFiniteValue { index, value });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = Capability::iter()
            .filter(|c| self.handles(*c))
            .map(|c| c.to_string())
            .collect();
        write!(
            f,
            "[{}] min_instances={}",
            names.join(", "),
            self.minimum_instances
        )
    }
}
