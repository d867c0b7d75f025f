//! Strongly-typed identifiers and the [`Shape`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a grid exposed by a [`Port`](crate::Port).
///
/// Grid ids are chosen by the wrapped component; several variables may
/// share one grid id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(pub u32);

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GridId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Node counts of a structured lattice, ordered slow→fast (z, y, x).
///
/// Uses `SmallVec<[usize; 3]>` since grids have at most three axes.
pub type Shape = SmallVec<[usize; 3]>;

/// Maximum number of axes a grid may have.
pub const MAX_RANK: usize = 3;
