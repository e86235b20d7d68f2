use crate::core::attributes::Attribute;
use std::any::Any;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn new(name: String) -> NominalAttribute {
        NominalAttribute {
            name,
            values: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    pub fn with_values(
        name: String,
        values: Vec<String>,
        label_to_index: HashMap<String, usize>,
    ) -> NominalAttribute {
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    /// Builds the label index from the ordered domain.
    pub fn from_labels<S: Into<String>>(name: &str, labels: impl IntoIterator<Item = S>) -> Self {
        let values: Vec<String> = labels.into_iter().map(Into::into).collect();
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        NominalAttribute::with_values(name.to_string(), values, label_to_index)
    }

    pub fn index_of_value(&self, v: &str) -> Option<usize> {
        self.label_to_index.get(v).copied()
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn number_of_values(&self) -> usize {
        self.values.len()
    }

    pub fn enumerate_values(&self) -> impl Iterator<Item = (usize, &String)> {
        self.values.iter().enumerate()
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} {{{}}}", self.name, self.values.join(", "))
    }

    fn calc_memory_size(&self) -> usize {
        let mut total: usize = 0;

        total += size_of::<Self>();

        total += self.name.capacity();

        total += self.values.capacity() * size_of::<String>();
        total += self.values.iter().map(|s| s.capacity()).sum::<usize>();

        total += self.label_to_index.capacity() * size_of::<(String, usize)>();
        total += self
            .label_to_index
            .keys()
            .map(|k| k.capacity())
            .sum::<usize>();

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_labels_builds_index() {
        let attr = NominalAttribute::from_labels("outlook", ["sunny", "overcast", "rainy"]);
        assert_eq!(attr.number_of_values(), 3);
        assert_eq!(attr.index_of_value("overcast"), Some(1));
        assert_eq!(attr.index_of_value("snowy"), None);
        assert_eq!(attr.value_at(2), Some("rainy"));
        assert_eq!(attr.value_at(3), None);
    }

    #[test]
    fn arff_representation_lists_domain() {
        let attr = NominalAttribute::from_labels("play", ["yes", "no"]);
        assert_eq!(attr.arff_representation(), "@attribute play {yes, no}");
    }

    #[test]
    fn memory_size_grows_with_domain() {
        let small = NominalAttribute::from_labels("a", ["x"]);
        let large = NominalAttribute::from_labels("a", ["x", "y", "z", "w"]);
        assert!(large.calc_memory_size() > small.calc_memory_size());
    }
}
