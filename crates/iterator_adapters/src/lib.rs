//! Iterator adapters shared by the analysis crates.

pub mod centered_means;
pub mod chunks;
pub mod with_length;

pub use centered_means::CenteredMeans;
pub use chunks::Chunks;
use num_traits::{cast, NumCast, Zero};
use std::ops::{Add, Div, Sub};
pub use with_length::WithLength;

impl<T: ?Sized> IteratorAdapter for T where T: Iterator {}
pub trait IteratorAdapter: Iterator {
    /// Groups items into vectors of `n` items. The last vector holds whatever remains.
    fn chunks(self, n: usize) -> Chunks<Self>
    where
        Self: Sized,
    {
        Chunks::new(self, n)
    }

    /// Declares the number of items this iterator will yield without consuming it.
    /// The declared length is what [`ExactSizeIterator::len`] reports.
    fn with_length(self, len: usize) -> WithLength<Self>
    where
        Self: Sized,
    {
        WithLength::new(self, len)
    }

    /// Mean of a window of `window_len` items centered on each item.
    /// The window shrinks at both ends instead of padding.
    fn centered_means(self, window_len: usize) -> CenteredMeans<Self>
    where
        Self: Sized,
        Self::Item: Copy
            + Zero
            + NumCast
            + Add<Output = Self::Item>
            + Sub<Output = Self::Item>
            + Div<Output = Self::Item>,
    {
        CenteredMeans::new(self, window_len)
    }

    /// Finds the mean of the iterator's values.
    fn mean(self) -> Self::Item
    where
        Self: Sized,
        Self::Item: Zero + NumCast + Div<Self::Item, Output = Self::Item>,
    {
        let (count, sum) = self.fold(
            (0, Zero::zero()),
            |acc: (u32, Self::Item), x: Self::Item| (acc.0 + 1, acc.1 + x),
        );
        sum / cast::<u32, Self::Item>(count)
            .expect("Can't cast iterator count as u32 to Self::Item type.")
    }
}
