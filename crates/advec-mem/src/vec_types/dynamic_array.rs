//! A growable contiguous array that owns one [`RawStorage`] and tracks how many of its
//! leading slots hold live values.
//!
//! Every operation that needs more room builds the complete new state in a second
//! storage first and commits it with a single ownership swap, so a failed allocation, a
//! failing constructor or a panicking `Clone` never leaves the array half-built.
//!
//! | Operation | Guarantee on failure |
//! |---|---|
//! | `with_len*`, `from_elem`, `try_clone`, `try_from_slice` | nothing is returned, nothing leaks |
//! | `push_back`, `emplace_back*`, `insert`, `emplace*` | strong: array unchanged |
//! | `reserve` | strong: array unchanged |
//! | `resize*`, `extend_from_slice` | size unchanged, capacity may have grown |
//! | `assign_from` | basic: valid array, the overwritten prefix may hold new values |
//! | `pop_back`, `erase`, `remove`, `truncate`, `clear`, `swap` | cannot fail |

use core::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem,
    ops::{Index, IndexMut, Deref, DerefMut},
    ptr::NonNull,
    slice,
};

use crate::{
    capacity_policy::{CapacityPolicy, Doubling},
    errors::CapacityError,
    macros::trace_storage,
    const_assert,
    size_of,
    impl_traits,
};

use super::{
    RawStorage,
    Iter,
    IterMut,
    IntoIter,
    strategies,
};

use CapacityError::{FixedCapacity, CapacityOverflow, IndexOutOfBounds};

pub type Result<T> = core::result::Result<T, CapacityError>;

pub struct DynamicArray<T, P: CapacityPolicy = Doubling> {
    storage: RawStorage<T>,
    len: usize,
    _policy: PhantomData<P>,
}

/// A [`DynamicArray`] that never grows past the capacity it was created with.
pub type FixedArray<T> = DynamicArray<T, crate::capacity_policy::Fixed>;

const_assert!(size_of!(DynamicArray<u32>) == size_of!(Option<DynamicArray<u32>>));

impl<T, P: CapacityPolicy> DynamicArray<T, P> {

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::new(),
            len: 0,
            _policy: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            storage: RawStorage::with_capacity(capacity)?,
            len: 0,
            _policy: PhantomData,
        })
    }

    /// Creates an array of `len` elements produced by `f`, with capacity `len`.
    pub fn with_len_with<F>(len: usize, f: F) -> Result<Self>
        where
            F: FnMut() -> T,
    {
        let storage = RawStorage::with_capacity(len)?;
        unsafe { strategies::construct_with(storage.as_non_null(), len, f) };
        Ok(Self {
            storage,
            len,
            _policy: PhantomData,
        })
    }

    /// Creates an array of `len` default values.
    #[inline]
    pub fn with_len(len: usize) -> Result<Self>
        where
            T: Default
    {
        Self::with_len_with(len, T::default)
    }

    #[inline]
    pub fn from_elem(len: usize, value: T) -> Result<Self>
        where
            T: Clone
    {
        Self::with_len_with(len, || value.clone())
    }

    /// Clones `src` into a new array with capacity `src.len()`.
    pub fn try_from_slice(src: &[T]) -> Result<Self>
        where
            T: Clone
    {
        let storage = RawStorage::with_capacity(src.len())?;
        unsafe { strategies::duplicate(src, storage.as_non_null()) };
        Ok(Self {
            storage,
            len: src.len(),
            _policy: PhantomData,
        })
    }

    #[inline]
    pub fn try_clone(&self) -> Result<Self>
        where
            T: Clone
    {
        Self::try_from_slice(self.as_slice())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.storage.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe { Iter::new(self.storage.as_non_null(), self.len) }
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        unsafe { IterMut::new(self.storage.as_non_null(), self.len) }
    }

    /// Bounds-checked access.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        Ok(unsafe { self.storage.slot(index) })
    }

    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        Ok(unsafe { self.storage.slot_mut(index) })
    }

    /// # Safety
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { self.storage.slot(index) }
    }

    /// # Safety
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { self.storage.slot_mut(index) }
    }

    #[inline(always)]
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            None
        }
        else {
            Some(unsafe { self.storage.slot(self.len - 1) })
        }
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            None
        }
        else {
            Some(unsafe { self.storage.slot_mut(self.len - 1) })
        }
    }

    /// Capacity for one more element when the array is full.
    fn grown_capacity(&self) -> Result<usize> {
        if !P::can_grow() {
            return Err(FixedCapacity { capacity: self.capacity() })
        }
        P::grow(self.len)
            .ok_or(CapacityOverflow { requested: self.len.saturating_add(1) })
    }

    /// Relocates the live elements into `new_storage` and swaps it in.
    ///
    /// With `gap == Some(i)`, elements from `i` on land one slot later, and slot `i` of
    /// `new_storage` must already hold a constructed value.
    ///
    /// # Safety
    /// `new_storage` must have room for `len` elements, plus one with a gap.
    unsafe fn commit_storage(&mut self, mut new_storage: RawStorage<T>, gap: Option<usize>) {
        let (split, offset) = match gap {
            Some(index) => (index, 1),
            None => (self.len, 0),
        };
        debug_assert!(self.len + offset <= new_storage.capacity());
        let old = self.storage.as_non_null();
        let new = new_storage.as_non_null();
        unsafe {
            strategies::relocate(old, new, split);
            strategies::relocate(old.add(split), new.add(split + offset), self.len - split);
        }
        trace_storage!(
            "storage of {} elements moved from {} to {} slots",
            self.len, self.capacity(), new_storage.capacity(),
        );
        self.storage.swap(&mut new_storage);
    }

    /// Ensures capacity for at least `capacity` elements. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(())
        }
        if !P::can_grow() {
            return Err(FixedCapacity { capacity: self.capacity() })
        }
        let new_storage = RawStorage::with_capacity(capacity)?;
        unsafe { self.commit_storage(new_storage, None) };
        Ok(())
    }

    /// Reserves room for `additional` more elements, growing at least as much as a
    /// single append would.
    fn reserve_additional(&mut self, additional: usize) -> Result<()> {
        let required = self.len
            .checked_add(additional)
            .ok_or(CapacityOverflow { requested: usize::MAX })?;
        if required <= self.capacity() {
            return Ok(())
        }
        let grown = P::grow(self.len).unwrap_or(0);
        self.reserve(required.max(grown))
    }

    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<&mut T> {
        self.emplace_back_with(|| value)
    }

    /// Appends the value produced by `f`.
    ///
    /// If the array is full, `f` runs after the grown storage has been allocated and its
    /// result is placed there before any existing element moves.
    #[inline]
    pub fn emplace_back_with<F>(&mut self, f: F) -> Result<&mut T>
        where
            F: FnOnce() -> T,
    {
        self.try_emplace_back_with(|| Ok(f()))
    }

    /// Appends the value produced by a fallible constructor.
    ///
    /// An error from `f` is returned as is and leaves the array unchanged.
    pub fn try_emplace_back_with<E, F>(&mut self, f: F) -> core::result::Result<&mut T, E>
        where
            E: From<CapacityError>,
            F: FnOnce() -> core::result::Result<T, E>,
    {
        let len = self.len;
        if len == self.capacity() {
            let mut new_storage = RawStorage::with_capacity(self.grown_capacity()?)?;
            unsafe {
                new_storage.write(len, f()?);
                self.commit_storage(new_storage, None);
            }
        }
        else {
            let value = f()?;
            unsafe { self.storage.write(len, value) };
        }
        self.len += 1;
        Ok(unsafe { self.storage.slot_mut(len) })
    }

    /// Drops the last element. Does nothing if the array is empty.
    #[inline]
    pub fn pop_back(&mut self) {
        if self.len == 0 {
            return
        }
        self.len -= 1;
        unsafe { strategies::destroy(self.storage.address(self.len), 1) }
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None
        }
        self.len -= 1;
        Some(unsafe { self.storage.address(self.len).read() })
    }

    /// Inserts `value` at `index`, shifting later elements back by one.
    /// Returns the index of the inserted element.
    #[inline]
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize> {
        self.emplace_with(index, || value)
    }

    #[inline]
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> Result<usize>
        where
            F: FnOnce() -> T,
    {
        self.try_emplace_with(index, || Ok(f()))
    }

    /// Inserts the value produced by a fallible constructor at `index`.
    ///
    /// The value is fully constructed before any element moves, so an error or panic
    /// from `f` leaves the array unchanged.
    ///
    /// # Panics
    /// Panics if `index > len()`.
    pub fn try_emplace_with<E, F>(&mut self, index: usize, f: F) -> core::result::Result<usize, E>
        where
            E: From<CapacityError>,
            F: FnOnce() -> core::result::Result<T, E>,
    {
        assert!(
            index <= self.len,
            "insertion index {} was out of bounds of len {}", index, self.len,
        );
        if self.len == self.capacity() {
            let mut new_storage = RawStorage::with_capacity(self.grown_capacity()?)?;
            unsafe {
                new_storage.write(index, f()?);
                self.commit_storage(new_storage, Some(index));
            }
        }
        else {
            let value = f()?;
            unsafe {
                let ptr = self.storage.address(index);
                strategies::shift(ptr, ptr.add(1), self.len - index);
                ptr.write(value);
            }
        }
        self.len += 1;
        Ok(index)
    }

    /// Removes and returns the element at `index`, shifting later elements forward.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index {} was out of bounds of len {}", index, self.len,
        );
        unsafe {
            let ptr = self.storage.address(index);
            let value = ptr.read();
            strategies::shift(ptr.add(1), ptr, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drops the element at `index`, shifting later elements forward.
    /// Returns the index of the element that followed it.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Removes the element at `index` and fills the hole with the last element.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index {} was out of bounds of len {}", index, self.len,
        );
        self.len -= 1;
        unsafe {
            let ptr = self.storage.address(index);
            let value = ptr.read();
            if index != self.len {
                strategies::relocate(self.storage.address(self.len), ptr, 1);
            }
            value
        }
    }

    /// Drops every element from `len` on. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return
        }
        let tail = self.len - len;
        self.len = len;
        unsafe { strategies::destroy(self.storage.address(len), tail) }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Resizes to `len` elements, filling new slots with values produced by `f`.
    ///
    /// If `f` panics, the values it already produced are dropped and the length is left
    /// as it was.
    pub fn resize_with<F>(&mut self, len: usize, f: F) -> Result<()>
        where
            F: FnMut() -> T,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(())
        }
        self.reserve(len)?;
        unsafe { strategies::construct_with(self.storage.address(self.len), len - self.len, f) };
        self.len = len;
        Ok(())
    }

    /// Resizes to `len` elements, filling new slots with `T::default()`.
    #[inline]
    pub fn resize(&mut self, len: usize) -> Result<()>
        where
            T: Default
    {
        self.resize_with(len, T::default)
    }

    pub fn extend_from_slice(&mut self, src: &[T]) -> Result<()>
        where
            T: Clone
    {
        self.reserve_additional(src.len())?;
        unsafe { strategies::duplicate(src, self.storage.address(self.len)) };
        self.len += src.len();
        Ok(())
    }

    /// Replaces the contents with clones of `src`.
    ///
    /// Reallocates only if `src` does not fit in the current capacity. Otherwise the
    /// common prefix is overwritten in place with `clone_from`, then the excess tail is
    /// dropped or the missing suffix is cloned in.
    pub fn assign_from(&mut self, src: &[T]) -> Result<()>
        where
            T: Clone
    {
        if src.len() > self.capacity() {
            if !P::can_grow() {
                return Err(FixedCapacity { capacity: self.capacity() })
            }
            let mut copy = Self::try_from_slice(src)?;
            self.swap(&mut copy);
            return Ok(())
        }
        let common = self.len.min(src.len());
        for (dst, src) in self.as_mut_slice()[..common].iter_mut().zip(&src[..common]) {
            dst.clone_from(src);
        }
        if self.len > src.len() {
            self.truncate(src.len());
        }
        else {
            let suffix = &src[self.len..];
            unsafe { strategies::duplicate(suffix, self.storage.address(self.len)) };
            self.len = src.len();
        }
        Ok(())
    }

    /// Exchanges storage and length with `other`. Never allocates.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    #[inline(always)]
    fn as_non_null(&self) -> NonNull<T> {
        self.storage.as_non_null()
    }
}

impl_traits!{
    for DynamicArray<T, P: CapacityPolicy>
    Drop =>

        #[inline(always)]
        fn drop(&mut self) {
            unsafe { strategies::destroy(self.as_non_null(), self.len) }
        }
    ,
    Index<usize> =>

        type Output = T;

        #[inline(always)]
        fn index(&self, index: usize) -> &Self::Output {
            if index >= self.len {
                panic!("index {} out of bounds for length {}", index, self.len)
            }
            unsafe { self.storage.slot(index) }
        }
    ,
    IndexMut<usize> =>

        #[inline(always)]
        fn index_mut(&mut self, index: usize) -> &mut Self::Output {
            if index >= self.len {
                panic!("index {} out of bounds for length {}", index, self.len)
            }
            unsafe { self.storage.slot_mut(index) }
        }
    ,
    AsRef<[T]> =>

        #[inline(always)]
        fn as_ref(&self) -> &[T] {
            self.as_slice()
        }
    ,
    AsMut<[T]> =>

        #[inline(always)]
        fn as_mut(&mut self) -> &mut [T] {
            self.as_mut_slice()
        }
    ,
    Deref =>

        type Target = [T];

        #[inline(always)]
        fn deref(&self) -> &Self::Target {
            self.as_slice()
        }
    ,
    DerefMut =>

        #[inline(always)]
        fn deref_mut(&mut self) -> &mut Self::Target {
            self.as_mut_slice()
        }
    ,
    Default =>

        #[inline(always)]
        fn default() -> Self {
            Self::new()
        }
    ,
}

impl<T: Clone, P: CapacityPolicy> Clone for DynamicArray<T, P> {

    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.raise())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_from(source.as_slice()).unwrap_or_else(|err| err.raise())
    }
}

impl<T: fmt::Debug, P: CapacityPolicy> fmt::Debug for DynamicArray<T, P> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, P, Q> PartialEq<DynamicArray<U, Q>> for DynamicArray<T, P>
    where
        T: PartialEq<U>,
        P: CapacityPolicy,
        Q: CapacityPolicy,
{

    #[inline]
    fn eq(&self, other: &DynamicArray<U, Q>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, P: CapacityPolicy> PartialEq<[U]> for DynamicArray<T, P> {

    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, P: CapacityPolicy> PartialEq<&[U]> for DynamicArray<T, P> {

    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, P: CapacityPolicy, const N: usize> PartialEq<[U; N]> for DynamicArray<T, P> {

    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, P: CapacityPolicy> Eq for DynamicArray<T, P> {}

impl<T: Hash, P: CapacityPolicy> Hash for DynamicArray<T, P> {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T, P: CapacityPolicy> Extend<T> for DynamicArray<T, P> {

    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve_additional(lower).unwrap_or_else(|err| err.raise());
        for value in iter {
            if let Err(err) = self.push_back(value) {
                err.raise()
            }
        }
    }
}

impl<'a, T: Copy + 'a, P: CapacityPolicy> Extend<&'a T> for DynamicArray<T, P> {

    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        <Self as Extend<T>>::extend(self, iter.into_iter().copied())
    }
}

impl<T, P: CapacityPolicy> FromIterator<T> for DynamicArray<T, P> {

    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut array = Self::with_capacity(lower).unwrap_or_else(|err| err.raise());
        array.extend(iter);
        array
    }
}

impl<T: Clone, P: CapacityPolicy> From<&[T]> for DynamicArray<T, P> {

    fn from(value: &[T]) -> Self {
        Self::try_from_slice(value).unwrap_or_else(|err| err.raise())
    }
}

impl<T, P: CapacityPolicy, const N: usize> From<[T; N]> for DynamicArray<T, P> {

    fn from(value: [T; N]) -> Self {
        let mut array = Self::with_capacity(N).unwrap_or_else(|err| err.raise());
        array.extend(value);
        array
    }
}

impl<T, P: CapacityPolicy> IntoIterator for DynamicArray<T, P> {

    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let storage = mem::take(&mut self.storage);
        let len = mem::replace(&mut self.len, 0);
        unsafe { IntoIter::new(storage, len) }
    }
}

impl<'vec, T, P: CapacityPolicy> IntoIterator for &'vec DynamicArray<T, P> {

    type Item = &'vec T;
    type IntoIter = Iter<'vec, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'vec, T, P: CapacityPolicy> IntoIterator for &'vec mut DynamicArray<T, P> {

    type Item = &'vec mut T;
    type IntoIter = IterMut<'vec, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
