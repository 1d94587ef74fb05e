//! Element lifecycle primitives over raw slots.
//!
//! Moving a value in Rust is a bitwise copy that cannot fail, so transfers between
//! storages always relocate. Duplication is only used where a caller needs the source
//! to stay intact, and every multi-element construction is guarded so that a panic
//! part-way drops exactly the values constructed so far.

use core::ptr::{self, NonNull};

/// Moves `len` values from `src` to `dst`. The source slots are logically uninitialized
/// afterwards and must not be dropped.
///
/// # Safety
/// `src[..len]` must be live, `dst[..len]` writable, and the ranges must not overlap.
#[inline(always)]
pub unsafe fn relocate<T>(src: NonNull<T>, dst: NonNull<T>, len: usize) {
    unsafe { src.copy_to_nonoverlapping(dst, len) }
}

/// Moves `len` values within one block. The ranges may overlap.
///
/// # Safety
/// `src[..len]` must be live and `dst[..len]` writable.
#[inline(always)]
pub unsafe fn shift<T>(src: NonNull<T>, dst: NonNull<T>, len: usize) {
    unsafe { src.copy_to(dst, len) }
}

/// Drops `len` live values starting at `ptr`.
///
/// # Safety
/// `ptr[..len]` must be live and is uninitialized afterwards.
#[inline(always)]
pub unsafe fn destroy<T>(ptr: NonNull<T>, len: usize) {
    unsafe { ptr::drop_in_place(NonNull::slice_from_raw_parts(ptr, len).as_ptr()) }
}

/// Tracks a run of freshly constructed values. Dropping the guard drops them, so a
/// panic in the middle of construction leaks nothing.
pub struct ConstructGuard<T> {
    dst: NonNull<T>,
    constructed: usize,
}

impl<T> ConstructGuard<T> {

    #[inline(always)]
    pub fn new(dst: NonNull<T>) -> Self {
        Self {
            dst,
            constructed: 0,
        }
    }

    /// # Safety
    /// The slot following the last constructed value must be writable.
    #[inline(always)]
    pub unsafe fn push(&mut self, value: T) {
        unsafe { self.dst.add(self.constructed).write(value) }
        self.constructed += 1;
    }

    /// Hands ownership of the constructed values to the caller.
    #[inline(always)]
    pub fn finish(self) -> usize {
        let constructed = self.constructed;
        core::mem::forget(self);
        constructed
    }
}

impl<T> Drop for ConstructGuard<T> {

    fn drop(&mut self) {
        unsafe { destroy(self.dst, self.constructed) }
    }
}

/// Clone-constructs `src` into the slots at `dst`.
///
/// # Safety
/// `dst[..src.len()]` must be writable and must not overlap `src`.
pub unsafe fn duplicate<T: Clone>(src: &[T], dst: NonNull<T>) {
    let mut guard = ConstructGuard::new(dst);
    for value in src {
        unsafe { guard.push(value.clone()) }
    }
    guard.finish();
}

/// Constructs `len` values produced by `f` into the slots at `dst`.
///
/// # Safety
/// `dst[..len]` must be writable.
pub unsafe fn construct_with<T>(dst: NonNull<T>, len: usize, mut f: impl FnMut() -> T) {
    let mut guard = ConstructGuard::new(dst);
    for _ in 0..len {
        unsafe { guard.push(f()) }
    }
    guard.finish();
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        panic::{catch_unwind, AssertUnwindSafe},
        rc::Rc,
    };

    use crate::RawStorage;

    #[derive(Debug)]
    struct Bomb {
        counter: Rc<()>,
        fuse: Option<usize>,
    }

    impl Clone for Bomb {

        fn clone(&self) -> Self {
            if let Some(fuse) = self.fuse {
                if Rc::strong_count(&self.counter) > fuse {
                    panic!("bomb went off")
                }
            }
            Self { counter: self.counter.clone(), fuse: self.fuse }
        }
    }

    #[test]
    fn duplicate_rolls_back_on_panic() {
        let counter = Rc::new(());
        let src: Vec<Bomb> = (0..4)
            .map(|_| Bomb { counter: counter.clone(), fuse: Some(6) })
            .collect();
        let storage = RawStorage::<Bomb>::with_capacity(4).unwrap();
        let res = catch_unwind(AssertUnwindSafe(|| unsafe {
            duplicate(&src, storage.as_non_null())
        }));
        assert!(res.is_err());
        // The two clones made before the panic were dropped again.
        assert_eq!(Rc::strong_count(&counter), 5);
    }

    #[test]
    fn construct_with_fills_slots() {
        let storage = RawStorage::<String>::with_capacity(3).unwrap();
        let mut n = 0;
        unsafe {
            construct_with(storage.as_non_null(), 3, || { n += 1; n.to_string() });
            assert_eq!(storage.slot(2), "3");
            destroy(storage.as_non_null(), 3);
        }
    }

    #[test]
    fn shift_handles_overlap() {
        let mut storage = RawStorage::<u32>::with_capacity(4).unwrap();
        unsafe {
            for i in 0..3 {
                storage.write(i, i as u32 + 1);
            }
            shift(storage.address(0), storage.address(1), 3);
            assert_eq!(*storage.slot(1), 1);
            assert_eq!(*storage.slot(3), 3);
        }
    }
}
