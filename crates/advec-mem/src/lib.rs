//! Growable contiguous arrays over manually managed storage.
//!
//! [`RawStorage`] owns an uninitialized block and nothing else. [`DynamicArray`] builds
//! on it, tracking the live prefix and committing every reallocation with one swap.

pub mod capacity_policy;
pub mod vec_types;

mod macros;
mod errors;
mod global_alloc;

pub use errors::CapacityError;
pub use global_alloc::{GlobalAlloc, GLOBAL_ALLOC};
pub use capacity_policy::{CapacityPolicy, Doubling, Fixed};
pub use vec_types::{RawStorage, DynamicArray, FixedArray, Iter, IterMut, IntoIter};

pub type Result<T> = core::result::Result<T, CapacityError>;
