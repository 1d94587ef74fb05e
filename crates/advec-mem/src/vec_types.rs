mod raw_storage;
pub(crate) mod strategies;
mod iter;
mod dynamic_array;

pub use raw_storage::RawStorage;
pub use iter::{IterBase, Iter, IterMut, IntoIter};
pub use dynamic_array::{DynamicArray, FixedArray};
