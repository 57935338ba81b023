use crate::utils::memory::{MemoryMeter, MemorySized};
use std::mem::size_of;

/// Dense index-addressed vector that grows on demand.
///
/// Setting an index past the end fills the gap with `T::default()`. Reading an
/// index that was never set yields `None` (or `0.0` through the `f64` helpers)
/// instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowableVec<T> {
    items: Vec<T>,
}

impl<T: Default> GrowableVec<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_len(len: usize) -> Self {
        let mut items = Vec::with_capacity(len);
        items.resize_with(len, T::default);
        Self { items }
    }

    pub fn set(&mut self, index: usize, value: T) {
        *self.slot_mut(index) = value;
    }

    /// Mutable access to `index`, growing the vector first if needed.
    pub fn slot_mut(&mut self, index: usize) -> &mut T {
        if index >= self.items.len() {
            self.items.resize_with(index + 1, T::default);
        }
        &mut self.items[index]
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> GrowableVec<Option<T>> {
    /// The value stored at `index`, if any.
    pub fn get_some(&self, index: usize) -> Option<&T> {
        self.items.get(index).and_then(Option::as_ref)
    }

    pub fn get_some_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index).and_then(Option::as_mut)
    }

    pub fn count_some(&self) -> usize {
        self.items.iter().filter(|v| v.is_some()).count()
    }
}

impl GrowableVec<f64> {
    pub fn value(&self, index: usize) -> f64 {
        self.items.get(index).copied().unwrap_or(0.0)
    }

    pub fn add_to_value(&mut self, index: usize, amount: f64) {
        *self.slot_mut(index) += amount;
    }

    pub fn sum_of_values(&self) -> f64 {
        self.items.iter().sum()
    }

    pub fn num_non_zero_entries(&self) -> usize {
        self.items.iter().filter(|&&v| v != 0.0).count()
    }

    pub fn max_value(&self) -> f64 {
        self.items.iter().copied().fold(f64::MIN, f64::max)
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.items.clone()
    }
}

impl From<Vec<f64>> for GrowableVec<f64> {
    fn from(items: Vec<f64>) -> Self {
        Self { items }
    }
}

impl<T: MemorySized> MemorySized for GrowableVec<T> {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_counts_backing_storage() {
        let mut v: GrowableVec<f64> = GrowableVec::new();
        let empty = v.deep_size();
        v.set(31, 1.0);
        assert!(v.deep_size() >= empty + 32 * size_of::<f64>());
    }

    #[test]
    fn test_reads_past_end_return_defaults() {
        let v: GrowableVec<f64> = GrowableVec::new();
        assert_eq!(v.value(7), 0.0);
        assert!(v.get(7).is_none());
        assert!(v.is_empty());
    }

    #[test]
    fn test_set_past_end_fills_gap_with_default() {
        let mut v: GrowableVec<f64> = GrowableVec::new();
        v.set(3, 2.5);
        assert_eq!(v.len(), 4);
        assert_eq!(v.as_slice(), &[0.0, 0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_add_to_value_grows_and_accumulates() {
        let mut v: GrowableVec<f64> = GrowableVec::new();
        v.add_to_value(1, 2.0);
        v.add_to_value(1, 3.0);
        v.add_to_value(0, 1.0);
        assert_eq!(v.to_vec(), vec![1.0, 5.0]);
        assert_eq!(v.sum_of_values(), 6.0);
        assert_eq!(v.num_non_zero_entries(), 2);
        assert_eq!(v.max_value(), 5.0);
    }

    #[test]
    fn test_option_slots_start_empty() {
        let mut v: GrowableVec<Option<u32>> = GrowableVec::with_len(3);
        assert_eq!(v.len(), 3);
        assert_eq!(v.count_some(), 0);
        v.set(5, Some(9));
        assert_eq!(v.get_some(5), Some(&9));
        assert!(v.get_some(4).is_none());
        assert!(v.get_some(100).is_none());
        if let Some(x) = v.get_some_mut(5) {
            *x += 1;
        }
        assert_eq!(v.get_some(5), Some(&10));
        assert_eq!(v.count_some(), 1);
    }
}
