use crate::core::attributes::{
    Attribute, AttributeKind, AttributeRef, DateAttribute, NominalAttribute,
};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::fmt;

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn class_attribute(&self) -> Option<&dyn Attribute> {
        self.attribute_at_index(self.class_index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.attributes.get(index).map(|a| a.as_ref() as &dyn Attribute)
    }

    pub fn attribute_kind(&self, index: usize) -> Option<AttributeKind> {
        self.attribute_at_index(index).and_then(AttributeKind::of)
    }

    pub fn is_nominal(&self, index: usize) -> bool {
        self.attribute_kind(index) == Some(AttributeKind::Nominal)
    }

    /// True for numeric and date attributes.
    pub fn is_numeric(&self, index: usize) -> bool {
        self.attribute_kind(index)
            .is_some_and(AttributeKind::is_numeric)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn number_of_classes(&self) -> usize {
        self.nominal_class()
            .map(NominalAttribute::number_of_values)
            .unwrap_or(0)
    }

    /// Label of a class code, when the class attribute is nominal and the code is in range.
    pub fn class_label(&self, code: usize) -> Option<&str> {
        self.nominal_class().and_then(|n| n.value_at(code))
    }

    fn nominal_class(&self) -> Option<&NominalAttribute> {
        self.attributes
            .get(self.class_index)
            .and_then(|a| a.as_any().downcast_ref::<NominalAttribute>())
    }

    /// Structural equality: same class index and, position by position, attributes
    /// with the same name, kind and domain. The relation name is not compared.
    pub fn equal_headers(&self, other: &InstanceHeader) -> bool {
        if self.class_index != other.class_index
            || self.attributes.len() != other.attributes.len()
        {
            return false;
        }

        self.attributes
            .iter()
            .zip(other.attributes.iter())
            .all(|(a, b)| same_attribute(a.as_ref(), b.as_ref()))
    }

    pub fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }
}

fn same_attribute(a: &dyn Attribute, b: &dyn Attribute) -> bool {
    if a.name() != b.name() {
        return false;
    }
    let kind = AttributeKind::of(a);
    if kind.is_none() || kind != AttributeKind::of(b) {
        return false;
    }

    match kind {
        Some(AttributeKind::Nominal) => {
            let (Some(na), Some(nb)) = (
                a.as_any().downcast_ref::<NominalAttribute>(),
                b.as_any().downcast_ref::<NominalAttribute>(),
            ) else {
                return false;
            };
            na.values == nb.values
        }
        Some(AttributeKind::Date) => {
            let (Some(da), Some(db)) = (
                a.as_any().downcast_ref::<DateAttribute>(),
                b.as_any().downcast_ref::<DateAttribute>(),
            ) else {
                return false;
            };
            da.format == db.format
        }
        _ => true,
    }
}

impl MemorySized for InstanceHeader {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = self.relation_name.capacity();
        total += self.attributes.capacity() * size_of::<AttributeRef>();
        for attr in &self.attributes {
            total += meter.measure_field(attr);
        }
        total
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}
