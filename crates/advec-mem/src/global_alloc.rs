use std::alloc::{Layout, alloc, dealloc};

use core::ptr::NonNull;

use crate::CapacityError::{self, AllocFailed, CapacityOverflow};

/// The process-wide allocation strategy backing every [`RawStorage`](crate::RawStorage).
///
/// Requests whose byte size is zero never reach the system allocator and are served
/// with a dangling, well-aligned pointer.
pub struct GlobalAlloc;

pub static GLOBAL_ALLOC: GlobalAlloc = GlobalAlloc;

impl GlobalAlloc {

    #[inline(always)]
    pub fn layout_of<T>(count: usize) -> Result<Layout, CapacityError> {
        Layout::array::<T>(count)
            .map_err(|_| CapacityOverflow { requested: count })
    }

    /// Allocates uninitialized storage for `count` values of `T`.
    pub fn allocate_uninit<T>(&self, count: usize) -> Result<NonNull<T>, CapacityError> {
        let layout = Self::layout_of::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling())
        }
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr)
            .map(|ptr| ptr.cast::<T>())
            .ok_or(AllocFailed { new_capacity: count })
    }

    /// Releases storage returned by [`allocate_uninit`](Self::allocate_uninit).
    ///
    /// # Safety
    /// `ptr` must come from `allocate_uninit::<T>(count)` with the same `count` and must not
    /// be released twice. Values still living in the block are not dropped.
    pub unsafe fn free_uninit<T>(&self, ptr: NonNull<T>, count: usize) {
        let layout = match Self::layout_of::<T>(count) {
            Ok(l) => l,
            Err(_) => return,
        };
        if layout.size() == 0 {
            return
        }
        unsafe { dealloc(ptr.as_ptr().cast::<u8>(), layout) }
    }
}
