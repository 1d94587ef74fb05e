//! Exclusive ownership of an uninitialized block sized for `capacity` values of `T`.
//!
//! [`RawStorage`] never constructs or drops `T`. Whoever writes values into it tracks
//! which slots are live and drops them before the storage goes away.

use core::{
    marker::PhantomData,
    mem,
    ptr::NonNull,
};

use crate::{
    global_alloc::GLOBAL_ALLOC,
    errors::CapacityError,
    const_assert,
    size_of,
};

pub struct RawStorage<T> {
    buffer: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

const_assert!(size_of!(RawStorage<u32>) == size_of!(Option<RawStorage<u32>>));

unsafe impl<T: Send> Send for RawStorage<T> {}
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {

    /// Empty storage. Does not allocate.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            buffer: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates uninitialized storage for exactly `capacity` values.
    pub fn with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Ok(Self::new())
        }
        let buffer = GLOBAL_ALLOC.allocate_uninit::<T>(capacity)?;
        Ok(Self {
            buffer,
            capacity,
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *mut T {
        self.buffer.as_ptr()
    }

    #[inline(always)]
    pub fn as_non_null(&self) -> NonNull<T> {
        self.buffer
    }

    /// Address of slot `offset`. The one-past-the-end address is allowed.
    ///
    /// # Panics
    /// Panics if `offset > capacity`.
    #[inline(always)]
    pub fn address(&self, offset: usize) -> NonNull<T> {
        assert!(
            offset <= self.capacity,
            "offset {} was out of bounds of capacity {}", offset, self.capacity,
        );
        unsafe { self.buffer.add(offset) }
    }

    /// Constructs `value` in place at slot `offset` and returns a reference to it.
    ///
    /// Whatever the slot held before is overwritten without being dropped.
    ///
    /// # Safety
    /// `offset` must be less than the capacity.
    #[inline(always)]
    pub unsafe fn write(&mut self, offset: usize, value: T) -> &mut T {
        debug_assert!(offset < self.capacity);
        unsafe {
            let mut ptr = self.buffer.add(offset);
            ptr.write(value);
            ptr.as_mut()
        }
    }

    /// # Safety
    /// `offset` must be less than the capacity and the slot must hold a live value.
    #[inline(always)]
    pub unsafe fn slot(&self, offset: usize) -> &T {
        debug_assert!(offset < self.capacity);
        unsafe { self.buffer.add(offset).as_ref() }
    }

    /// # Safety
    /// `offset` must be less than the capacity and the slot must hold a live value.
    #[inline(always)]
    pub unsafe fn slot_mut(&mut self, offset: usize) -> &mut T {
        debug_assert!(offset < self.capacity);
        unsafe { self.buffer.add(offset).as_mut() }
    }

    /// Exchanges the owned blocks of `self` and `other`.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buffer, &mut other.buffer);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }
}

impl<T> Default for RawStorage<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {

    fn drop(&mut self) {
        if self.capacity != 0 {
            unsafe { GLOBAL_ALLOC.free_uninit(self.buffer, self.capacity) }
        }
    }
}

impl<T> core::fmt::Debug for RawStorage<T> {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawStorage")
            .field("buffer", &self.buffer)
            .field("capacity", &self.capacity)
            .finish()
    }
}
