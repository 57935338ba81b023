use std::collections::HashSet;
use std::sync::Arc;

/// Estimates the bytes held by a value and everything reachable from it.
///
/// Shared allocations (`Arc`) are counted once per measurement.
#[derive(Default)]
pub struct MemoryMeter {
    visited: HashSet<usize>,
}

impl MemoryMeter {
    #[inline]
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
        }
    }

    #[inline]
    fn measure<T: MemorySized + ?Sized>(&mut self, value: &T) -> usize {
        value.inline_size() + value.extra_heap_size(self)
    }

    #[inline]
    pub fn measure_root<T: MemorySized + ?Sized>(value: &T) -> usize {
        let mut meter = MemoryMeter::new();
        meter.measure(value)
    }

    /// Heap bytes owned by a field; its inline bytes are already part of the
    /// enclosing value.
    #[inline]
    pub fn measure_field<T: MemorySized + ?Sized>(&mut self, value: &T) -> usize {
        value.extra_heap_size(self)
    }

    #[inline]
    fn measure_shared<T: MemorySized + ?Sized>(&mut self, shared: &Arc<T>) -> usize {
        let raw = Arc::as_ptr(shared) as *const () as usize;
        if self.visited.insert(raw) {
            let inner: &T = shared;
            inner.inline_size() + inner.extra_heap_size(self)
        } else {
            0
        }
    }
}

pub trait MemorySized {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        0
    }

    fn deep_size(&self) -> usize
    where
        Self: Sized,
    {
        MemoryMeter::measure_root(self)
    }

    fn measure_with(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure(self)
    }
}

macro_rules! impl_memory_for_primitives {
    ($($t:ty),* $(,)?) => {
        $(impl MemorySized for $t {})*
    };
}

impl_memory_for_primitives!(u8, u16, u32, u64, usize, i32, i64, f32, f64, bool, char);

impl MemorySized for String {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<String>()
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        self.capacity()
    }
}

impl<T: MemorySized> MemorySized for Vec<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Vec<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = self.capacity() * std::mem::size_of::<T>();
        for item in self.iter() {
            total += meter.measure_field(item);
        }
        total
    }
}

impl<T: MemorySized> MemorySized for Option<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Option<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        match self {
            Some(value) => meter.measure_field(value),
            None => 0,
        }
    }
}

impl<T: MemorySized + ?Sized> MemorySized for Box<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Box<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        self.as_ref().measure_with(meter)
    }
}

impl<T: MemorySized + ?Sized> MemorySized for Arc<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Arc<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_shared(self)
    }
}
