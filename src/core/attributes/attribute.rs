use super::{DateAttribute, NominalAttribute, NumericAttribute};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

pub type AttributeRef = Arc<dyn Attribute + Send + Sync>;

pub trait Attribute: Any + Send + Sync {
    fn name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    fn arff_representation(&self) -> String;
    fn calc_memory_size(&self) -> usize;
}

/// Kinds of attribute the distance metric knows how to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AttributeKind {
    Nominal,
    Numeric,
    Date,
}

impl AttributeKind {
    /// Resolves the kind of a concrete attribute, `None` for foreign implementations.
    pub fn of(attribute: &dyn Attribute) -> Option<AttributeKind> {
        let any = attribute.as_any();
        if any.is::<NominalAttribute>() {
            Some(AttributeKind::Nominal)
        } else if any.is::<NumericAttribute>() {
            Some(AttributeKind::Numeric)
        } else if any.is::<DateAttribute>() {
            Some(AttributeKind::Date)
        } else {
            None
        }
    }

    /// Dates are compared exactly like numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, AttributeKind::Numeric | AttributeKind::Date)
    }
}

impl MemorySized for dyn Attribute + Send + Sync {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        self.calc_memory_size()
            .saturating_sub(std::mem::size_of_val(self))
    }
}
