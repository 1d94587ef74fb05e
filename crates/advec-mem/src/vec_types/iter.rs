use core::{
    iter::FusedIterator,
    marker::PhantomData,
    ptr::NonNull,
};

use super::{RawStorage, strategies};

/// Borrowing iterator over a run of live slots. Counts down instead of comparing
/// pointers so zero-sized elements are handled.
pub struct IterBase<'a, T, Ref> {
    ptr: NonNull<T>,
    remaining: usize,
    _markers: PhantomData<(&'a T, Ref)>,
}

pub type Iter<'a, T> = IterBase<'a, T, &'a T>;
pub type IterMut<'a, T> = IterBase<'a, T, &'a mut T>;

unsafe impl<'a, T: Sync> Send for Iter<'a, T> {}
unsafe impl<'a, T: Sync> Sync for Iter<'a, T> {}
unsafe impl<'a, T: Send> Send for IterMut<'a, T> {}
unsafe impl<'a, T: Sync> Sync for IterMut<'a, T> {}

impl<'a, T, Ref> IterBase<'a, T, Ref> {

    /// # Safety
    /// `ptr[..len]` must be live for `'a`, and exclusively borrowed when `Ref` is `&mut T`.
    #[inline(always)]
    pub(crate) unsafe fn new(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            remaining: len,
            _markers: PhantomData,
        }
    }

    #[inline(always)]
    fn take_front(&mut self) -> Option<NonNull<T>> {
        if self.remaining == 0 {
            return None
        }
        let item = self.ptr;
        self.ptr = unsafe { self.ptr.add(1) };
        self.remaining -= 1;
        Some(item)
    }

    #[inline(always)]
    fn take_back(&mut self) -> Option<NonNull<T>> {
        if self.remaining == 0 {
            return None
        }
        self.remaining -= 1;
        Some(unsafe { self.ptr.add(self.remaining) })
    }
}

impl<'a, T> Iterator for Iter<'a, T> {

    type Item = &'a T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.take_front().map(|ptr| unsafe { ptr.as_ref() })
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {

    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.take_back().map(|ptr| unsafe { ptr.as_ref() })
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {

    type Item = &'a mut T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.take_front().map(|mut ptr| unsafe { ptr.as_mut() })
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {

    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.take_back().map(|mut ptr| unsafe { ptr.as_mut() })
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for IterMut<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {

    fn clone(&self) -> Self {
        unsafe { Self::new(self.ptr, self.remaining) }
    }
}

/// Owning iterator returned by `DynamicArray::into_iter`.
///
/// Elements not yielded are dropped with the iterator, then the storage is released.
pub struct IntoIter<T> {
    storage: RawStorage<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {

    /// # Safety
    /// `storage[..len]` must be live and owned by the caller, who gives them up.
    #[inline(always)]
    pub(crate) unsafe fn new(storage: RawStorage<T>, len: usize) -> Self {
        Self {
            storage,
            start: 0,
            end: len,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        unsafe {
            core::slice::from_raw_parts(
                self.storage.address(self.start).as_ptr(),
                self.end - self.start,
            )
        }
    }
}

impl<T> Iterator for IntoIter<T> {

    type Item = T;

    #[inline(always)]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None
        }
        let value = unsafe { self.storage.address(self.start).read() };
        self.start += 1;
        Some(value)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {

    #[inline(always)]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None
        }
        self.end -= 1;
        Some(unsafe { self.storage.address(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {

    fn drop(&mut self) {
        let remaining = self.end - self.start;
        unsafe { strategies::destroy(self.storage.address(self.start), remaining) }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for IntoIter<T> {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
