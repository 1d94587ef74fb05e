use std::{
    cell::Cell,
    mem,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use advec_mem::{dyn_array, CapacityError, DynamicArray, FixedArray, RawStorage};

/// Counts live instances through a shared cell.
struct Tracked<'a> {
    live: &'a Cell<usize>,
    id: u32,
}

impl<'a> Tracked<'a> {

    fn new(live: &'a Cell<usize>, id: u32) -> Self {
        live.set(live.get() + 1);
        Self { live, id }
    }
}

impl Clone for Tracked<'_> {

    fn clone(&self) -> Self {
        Self::new(self.live, self.id)
    }
}

impl Drop for Tracked<'_> {

    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Panics on the clone made while `budget` is zero.
struct Fragile {
    budget: Rc<Cell<usize>>,
    value: u32,
}

impl Clone for Fragile {

    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.budget.set(left - 1);
        Self { budget: self.budget.clone(), value: self.value }
    }
}

fn fragile(budget: &Rc<Cell<usize>>, values: &[u32]) -> DynamicArray<Fragile> {
    let mut array = DynamicArray::with_capacity(values.len()).unwrap();
    for &value in values {
        array.push_back(Fragile { budget: budget.clone(), value }).unwrap();
    }
    array
}

fn values(array: &[Fragile]) -> Vec<u32> {
    array.iter().map(|f| f.value).collect()
}

#[test]
fn appends_double_capacity() {
    let mut array = DynamicArray::<u64>::new();
    let mut seen = vec![];
    for v in 0..8 {
        array.push_back(v).unwrap();
        seen.push(array.capacity());
    }
    assert_eq!(seen, [1, 2, 4, 4, 8, 8, 8, 8]);
    assert!(array.len() <= array.capacity());
}

#[test]
fn take_leaves_source_empty_and_reusable() {
    let mut src: DynamicArray<String> = ["a", "b", "c"].map(String::from).into();
    let ptr = src.as_ptr();
    let dst = mem::take(&mut src);
    assert_eq!(dst, ["a", "b", "c"]);
    assert_eq!(dst.as_ptr(), ptr);
    assert_eq!(src.len(), 0);
    assert_eq!(src.capacity(), 0);
    src.push_back("d".into()).unwrap();
    assert_eq!(src, ["d"]);
}

#[test]
fn copies_are_independent() {
    let mut a = dyn_array![String::from("x"), String::from("y")];
    let b = a.clone();
    a[0].push('!');
    a.push_back("z".into()).unwrap();
    assert_eq!(a, ["x!", "y", "z"]);
    assert_eq!(b, ["x", "y"]);
    assert_eq!(b.capacity(), 2);
}

#[test]
fn insert_then_erase_restores_sequence() {
    let original: DynamicArray<i32> = (0..5).collect();
    for index in 0..=original.len() {
        let mut array = original.clone();
        assert_eq!(array.insert(index, 99).unwrap(), index);
        assert_eq!(array[index], 99);
        assert_eq!(array.erase(index), index);
        assert_eq!(array, original);
    }
}

#[test]
fn at_checks_bounds() {
    let array = dyn_array![1, 2, 3];
    assert_eq!(array.at(2), Ok(&3));
    assert_eq!(
        array.at(3).unwrap_err(),
        CapacityError::IndexOutOfBounds { index: 3, len: 3 },
    );
    assert_eq!(array.at(3).unwrap_err().to_string(), "index 3 was out of bounds of len 3");
}

#[test]
fn resize_round_trip_zero_fills() {
    let mut array = dyn_array![7u32, 8, 9];
    array.resize(6).unwrap();
    assert_eq!(array, [7, 8, 9, 0, 0, 0]);
    array.resize(2).unwrap();
    assert_eq!(array, [7, 8]);
    array.resize(4).unwrap();
    assert_eq!(array, [7, 8, 0, 0]);
    assert!(array.capacity() >= 6);
}

#[test]
fn push_erase_insert_scenario() {
    let mut array = DynamicArray::<i32>::new();
    array.push_back(1).unwrap();
    array.push_back(2).unwrap();
    array.push_back(3).unwrap();
    assert_eq!(array.erase(1), 1);
    assert_eq!(array, [1, 3]);
    array.insert(1, 2).unwrap();
    assert_eq!(array, [1, 2, 3]);
    array.pop_back();
    assert_eq!(array, [1, 2]);
    assert_eq!(array.capacity(), 4);
}

#[test]
fn every_constructed_value_is_dropped_once() {
    let live = Cell::new(0);
    {
        let mut array: DynamicArray<Tracked> = DynamicArray::new();
        for id in 0..20 {
            array.push_back(Tracked::new(&live, id)).unwrap();
        }
        array.insert(3, Tracked::new(&live, 100)).unwrap();
        array.erase(0);
        let removed = array.remove(4);
        drop(removed);
        let copy = array.clone();
        array.resize_with(30, || Tracked::new(&live, 200)).unwrap();
        array.truncate(10);
        array.assign_from(&copy).unwrap();
        assert_eq!(live.get(), array.len() + copy.len());
        let mut iter = copy.into_iter();
        iter.next();
        iter.next_back();
    }
    assert_eq!(live.get(), 0);
}

#[test]
fn panicking_clone_during_copy_leaks_nothing() {
    let budget = Rc::new(Cell::new(usize::MAX));
    let source = fragile(&budget, &[1, 2, 3, 4]);
    budget.set(2);
    let result = catch_unwind(AssertUnwindSafe(|| source.try_clone()));
    assert!(result.is_err());
    // Only the source array and the local handle remain.
    assert_eq!(Rc::strong_count(&budget), 5);
    assert_eq!(values(&source), [1, 2, 3, 4]);
}

#[test]
fn panicking_clone_during_assign_keeps_valid_array() {
    let budget = Rc::new(Cell::new(usize::MAX));
    let source = fragile(&budget, &[1, 2, 3, 4, 5]);
    let mut dst = fragile(&budget, &[9]);
    dst.reserve(8).unwrap();
    budget.set(2);
    let result = catch_unwind(AssertUnwindSafe(|| dst.assign_from(&source)));
    assert!(result.is_err());
    // The prefix was overwritten, the suffix copy failed and left no partial values.
    assert_eq!(values(&dst), [1]);
    assert_eq!(Rc::strong_count(&budget), 1 + 5 + 1);
}

#[test]
fn panicking_clone_while_growing_leaves_array_untouched() {
    let budget = Rc::new(Cell::new(usize::MAX));
    let mut array = fragile(&budget, &[1, 2]);
    let extra = fragile(&budget, &[3, 4, 5]);
    budget.set(1);
    let result = catch_unwind(AssertUnwindSafe(|| array.extend_from_slice(&extra)));
    assert!(result.is_err());
    assert_eq!(values(&array), [1, 2]);
    assert_eq!(Rc::strong_count(&budget), 1 + 2 + 3);
}

#[test]
fn oversized_reserve_is_reported() {
    let mut array = dyn_array![1u64, 2, 3];
    let ptr = array.as_ptr();
    let err = array.reserve(usize::MAX / 4).unwrap_err();
    assert!(matches!(
        err,
        CapacityError::AllocFailed { .. } | CapacityError::CapacityOverflow { .. },
    ));
    assert_eq!(array, [1, 2, 3]);
    assert_eq!(array.capacity(), 3);
    assert_eq!(array.as_ptr(), ptr);
}

#[test]
fn fixed_array_refuses_to_grow() {
    let mut array = FixedArray::<u8>::with_capacity(3).unwrap();
    array.extend_from_slice(&[1, 2, 3]).unwrap();
    assert_eq!(
        array.extend_from_slice(&[4]).unwrap_err(),
        CapacityError::FixedCapacity { capacity: 3 },
    );
    assert_eq!(
        array.assign_from(&[1, 2, 3, 4]).unwrap_err(),
        CapacityError::FixedCapacity { capacity: 3 },
    );
    array.assign_from(&[5]).unwrap();
    assert_eq!(array, [5]);
    assert_eq!(array.capacity(), 3);
}

#[test]
fn swap_exchanges_contents() {
    let mut a = dyn_array![1, 2, 3];
    let mut b = DynamicArray::with_capacity(10).unwrap();
    b.push_back(4).unwrap();
    a.swap(&mut b);
    assert_eq!(a, [4]);
    assert_eq!(a.capacity(), 10);
    assert_eq!(b, [1, 2, 3]);
}

#[test]
fn raw_storage_is_usable_directly() {
    let mut storage = RawStorage::<String>::with_capacity(2).unwrap();
    unsafe {
        storage.write(0, "left".into());
        storage.write(1, "right".into());
        assert_eq!(storage.slot(0), "left");
        storage.slot_mut(1).push('!');
        assert_eq!(storage.slot(1), "right!");
        storage.address(0).drop_in_place();
        storage.address(1).drop_in_place();
    }
}
