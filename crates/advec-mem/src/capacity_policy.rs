/// Compile-time growth configuration of a [`DynamicArray`](crate::DynamicArray).
pub trait CapacityPolicy {

    fn can_grow() -> bool;

    /// Capacity to grow to when an element must be added to a full array holding `len`
    /// elements, or `None` if the policy forbids growth.
    fn grow(len: usize) -> Option<usize>;
}

/// `max(1, 2 * len)`, so appends starting from zero capacity see 1, 2, 4, 8, ...
pub struct Doubling {}

impl CapacityPolicy for Doubling {

    #[inline]
    fn can_grow() -> bool {
        true
    }

    #[inline]
    fn grow(len: usize) -> Option<usize> {
        if len == 0 { Some(1) }
        else { len.checked_mul(2) }
    }
}

/// Never grows past the capacity the array was created with.
pub struct Fixed {}

impl CapacityPolicy for Fixed {

    #[inline]
    fn can_grow() -> bool {
        false
    }

    #[inline]
    fn grow(_: usize) -> Option<usize> {
        None
    }
}
