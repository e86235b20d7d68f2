use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::memory::{MemoryMeter, MemorySized};

/// Two bounds closer than this are treated as a zero-width range.
pub const RANGE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    #[inline]
    fn is_degenerate(&self) -> bool {
        (self.max - self.min).abs() < RANGE_EPSILON
    }
}

/// Running min/max of every numeric and date attribute. Ranges only ever widen.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRanges {
    tracked: Vec<bool>,
    ranges: Vec<Option<Range>>,
}

impl AttributeRanges {
    pub fn new(header: &InstanceHeader) -> Self {
        let n = header.number_of_attributes();
        let class_index = header.class_index();
        let tracked = (0..n)
            .map(|i| i != class_index && header.is_numeric(i))
            .collect();
        Self {
            tracked,
            ranges: vec![None; n],
        }
    }

    pub fn observe(&mut self, instance: &dyn Instance) {
        for (index, tracked) in self.tracked.iter().enumerate() {
            if !*tracked {
                continue;
            }
            let Some(v) = instance.value_at_index(index) else {
                continue;
            };
            if v.is_nan() {
                continue;
            }

            let range = self.ranges[index].get_or_insert(Range { min: v, max: v });
            if v < range.min {
                range.min = v;
            }
            if v > range.max {
                range.max = v;
            }
        }
    }

    /// `(value - min) / (max - min)`, or 0 when the range is unknown or degenerate.
    pub fn normalize(&self, value: f64, index: usize) -> f64 {
        match self.range(index) {
            Some(range) if !range.is_degenerate() => (value - range.min) / (range.max - range.min),
            _ => 0.0,
        }
    }

    pub fn range(&self, index: usize) -> Option<Range> {
        self.ranges.get(index).copied().flatten()
    }

    pub fn is_tracked(&self, index: usize) -> bool {
        self.tracked.get(index).copied().unwrap_or(false)
    }
}

impl MemorySized for AttributeRanges {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        self.tracked.capacity() * size_of::<bool>()
            + self.ranges.capacity() * size_of::<Option<Range>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{AttributeRef, DateAttribute, NominalAttribute, NumericAttribute};
    use crate::core::instances::DenseInstance;
    use std::sync::Arc;

    const EPS: f64 = 1e-12;

    fn header() -> Arc<InstanceHeader> {
        Arc::new(InstanceHeader::new(
            "r".into(),
            vec![
                Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("n", ["a", "b", "c"])) as AttributeRef,
                Arc::new(DateAttribute::new("d".into(), None)) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("c", ["0", "1"])) as AttributeRef,
            ],
            3,
        ))
    }

    fn row(h: &Arc<InstanceHeader>, values: Vec<f64>) -> DenseInstance {
        DenseInstance::new(Arc::clone(h), values, 1.0)
    }

    #[test]
    fn only_numeric_and_date_are_tracked() {
        let h = header();
        let r = AttributeRanges::new(&h);
        assert!(r.is_tracked(0));
        assert!(!r.is_tracked(1));
        assert!(r.is_tracked(2));
        assert!(!r.is_tracked(3));
        assert!(!r.is_tracked(10));
    }

    #[test]
    fn first_observation_sets_both_bounds() {
        let h = header();
        let mut r = AttributeRanges::new(&h);
        assert_eq!(r.range(0), None);
        r.observe(&row(&h, vec![4.0, 2.0, 100.0, 1.0]));
        assert_eq!(r.range(0), Some(Range { min: 4.0, max: 4.0 }));
        assert_eq!(r.range(2), Some(Range { min: 100.0, max: 100.0 }));
        assert_eq!(r.range(1), None);
        assert_eq!(r.range(3), None);
    }

    #[test]
    fn ranges_widen_and_never_narrow() {
        let h = header();
        let mut r = AttributeRanges::new(&h);
        for x in [5.0, 1.0, 9.0, 3.0, 7.0] {
            r.observe(&row(&h, vec![x, 0.0, f64::NAN, 0.0]));
        }
        assert_eq!(r.range(0), Some(Range { min: 1.0, max: 9.0 }));
        assert_eq!(r.range(2), None);
    }

    #[test]
    fn missing_values_are_skipped() {
        let h = header();
        let mut r = AttributeRanges::new(&h);
        r.observe(&row(&h, vec![2.0, 0.0, 0.0, 0.0]));
        r.observe(&row(&h, vec![f64::NAN, 0.0, 0.0, 0.0]));
        assert_eq!(r.range(0), Some(Range { min: 2.0, max: 2.0 }));
    }

    #[test]
    fn normalize_without_statistics_is_zero() {
        let h = header();
        let r = AttributeRanges::new(&h);
        assert_eq!(r.normalize(42.0, 0), 0.0);
    }

    #[test]
    fn normalize_degenerate_range_is_zero() {
        let h = header();
        let mut r = AttributeRanges::new(&h);
        r.observe(&row(&h, vec![1.0, 0.0, 0.0, 0.0]));
        r.observe(&row(&h, vec![1.0 + 1e-9, 0.0, 0.0, 0.0]));
        assert_eq!(r.normalize(1.0, 0), 0.0);
    }

    #[test]
    fn normalize_scales_into_unit_interval() {
        let h = header();
        let mut r = AttributeRanges::new(&h);
        r.observe(&row(&h, vec![2.0, 0.0, 0.0, 0.0]));
        r.observe(&row(&h, vec![6.0, 0.0, 0.0, 0.0]));
        assert!((r.normalize(2.0, 0) - 0.0).abs() < EPS);
        assert!((r.normalize(4.0, 0) - 0.5).abs() < EPS);
        assert!((r.normalize(6.0, 0) - 1.0).abs() < EPS);
        assert!((r.normalize(8.0, 0) - 1.5).abs() < EPS);
    }
}
