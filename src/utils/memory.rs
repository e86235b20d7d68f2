use std::collections::HashSet;
use std::sync::Arc;

/// Estimates the bytes held by a model, following owned and shared pointers.
/// Data behind an `Arc` is counted once no matter how many handles point at it.
#[derive(Default)]
pub struct MemoryMeter {
    visited: HashSet<usize>,
}

impl MemoryMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline plus heap size of a root value.
    pub fn measure_root<T: MemorySized + ?Sized>(value: &T) -> usize {
        let mut meter = MemoryMeter::new();
        value.inline_size() + value.extra_heap_size(&mut meter)
    }

    /// Heap owned by a field; its inline bytes already belong to the parent.
    pub fn measure_field<T: MemorySized + ?Sized>(&mut self, value: &T) -> usize {
        value.extra_heap_size(self)
    }

    /// Returns false when the allocation at `ptr` was already counted.
    fn first_visit<T: ?Sized>(&mut self, ptr: *const T) -> bool {
        self.visited.insert(ptr as *const () as usize)
    }
}

pub trait MemorySized {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        0
    }
}

macro_rules! impl_memory_for_primitives {
    ($($t:ty),* $(,)?) => {
        $(impl MemorySized for $t {})*
    };
}

impl_memory_for_primitives!(u8, u16, u32, u64, usize, i32, i64, f32, f64, bool, char);

impl MemorySized for String {
    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        self.capacity()
    }
}

impl<T: MemorySized> MemorySized for Vec<T> {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        self.capacity() * size_of::<T>()
            + self
                .iter()
                .map(|item| item.extra_heap_size(meter))
                .sum::<usize>()
    }
}

impl<T: MemorySized> MemorySized for Option<T> {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        self.as_ref().map_or(0, |v| v.extra_heap_size(meter))
    }
}

impl<T: MemorySized + ?Sized> MemorySized for Box<T> {
    fn inline_size(&self) -> usize {
        size_of::<Box<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let inner: &T = self;
        inner.inline_size() + inner.extra_heap_size(meter)
    }
}

impl<T: MemorySized + ?Sized> MemorySized for Arc<T> {
    fn inline_size(&self) -> usize {
        size_of::<Arc<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        if !meter.first_visit(Arc::as_ptr(self)) {
            return 0;
        }
        let inner: &T = self;
        inner.inline_size() + inner.extra_heap_size(meter)
    }
}
