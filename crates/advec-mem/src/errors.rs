#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CapacityError {
    FixedCapacity {
        capacity: usize,
    },
    AllocFailed {
        new_capacity: usize,
    },
    CapacityOverflow {
        requested: usize,
    },
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
}

impl core::fmt::Display for CapacityError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FixedCapacity { capacity } => {
                write!(f, "exceeded fixed capacity of {}", capacity)
            },
            Self::AllocFailed { new_capacity } => {
                write!(f, "allocation failed with new capacity {}", new_capacity)
            },
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity {} overflows the maximum allocation size", requested)
            },
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {} was out of bounds of len {}", index, len)
            },
        }
    }
}

impl core::error::Error for CapacityError {}

impl CapacityError {

    /// Panics with this error's message.
    ///
    /// Used by trait impls whose signatures cannot report a failed allocation.
    #[cold]
    #[track_caller]
    pub fn raise(self) -> ! {
        panic!("{}", self)
    }
}
