use num_traits::{cast, NumCast, Zero};
use std::{
    collections::VecDeque,
    ops::{Add, Div, Sub},
};

/// Running mean over a window centered on each item.
/// Near either end the window only covers the items that exist, so the first output of a window of 5
/// averages items `0..=2`.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct CenteredMeans<I: Iterator> {
    iter: I,
    buffer: VecDeque<I::Item>,
    sum: I::Item,
    half: usize,
    /// Stream index of `buffer[0]`.
    front: usize,
    /// Stream index of the next output.
    center: usize,
    /// Items pulled from `iter` so far.
    pulled: usize,
    exhausted: bool,
}

impl<I> CenteredMeans<I>
where
    I: Iterator,
    I::Item: Zero,
{
    pub fn new(iter: I, window_len: usize) -> Self {
        assert!(
            window_len % 2 == 1,
            "window length must be odd so it can be centered"
        );
        CenteredMeans {
            iter,
            buffer: VecDeque::with_capacity(window_len),
            sum: Zero::zero(),
            half: window_len / 2,
            front: 0,
            center: 0,
            pulled: 0,
            exhausted: false,
        }
    }
}

impl<I> Iterator for CenteredMeans<I>
where
    I: Iterator,
    I::Item: Copy
        + Zero
        + NumCast
        + Add<Output = I::Item>
        + Sub<Output = I::Item>
        + Div<Output = I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        // Read ahead until the window's right edge is buffered.
        while !self.exhausted && self.pulled <= self.center + self.half {
            match self.iter.next() {
                Some(x) => {
                    self.buffer.push_back(x);
                    self.sum = self.sum + x;
                    self.pulled += 1;
                }
                None => self.exhausted = true,
            }
        }
        if self.center >= self.pulled {
            return None;
        }

        // Drop what fell off the window's left edge.
        while self.front + self.half < self.center {
            let oldest = self.buffer.pop_front()?;
            self.sum = self.sum - oldest;
            self.front += 1;
        }

        self.center += 1;
        Some(self.sum / cast::<usize, I::Item>(self.buffer.len())?)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = self.pulled - self.center;
        let (lower, upper) = self.iter.size_hint();
        (
            lower.saturating_add(buffered),
            upper.and_then(|x| x.checked_add(buffered)),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::IteratorAdapter;
    use proptest::proptest;

    fn naive(values: &[i64], window_len: usize) -> Vec<i64> {
        let half = window_len / 2;
        (0..values.len())
            .map(|i| {
                let window = &values[i.saturating_sub(half)..(i + half + 1).min(values.len())];
                window.iter().sum::<i64>() / window.len() as i64
            })
            .collect()
    }

    #[test]
    fn shrinks_at_edges() {
        let means = [3.0, 6.0, 9.0, 12.0]
            .into_iter()
            .centered_means(3)
            .collect::<Vec<f64>>();
        assert_eq!(means, vec![4.5, 6.0, 9.0, 10.5]);
    }

    #[test]
    fn window_longer_than_input() {
        let means = [2, 4, 6].into_iter().centered_means(11).collect::<Vec<_>>();
        assert_eq!(means, vec![4, 4, 4]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            Vec::<i64>::new().into_iter().centered_means(5).next(),
            None
        );
    }

    #[test]
    #[should_panic]
    fn even_window_panics() {
        [1, 2, 3].into_iter().centered_means(2).for_each(drop);
    }

    proptest! {
        #[test]
        fn matches_naive_window(values: Vec<i32>, half in 0usize..40) {
            let values = values.into_iter().map(i64::from).collect::<Vec<_>>();
            let window_len = 2 * half + 1;
            let means = values.iter().copied().centered_means(window_len).collect::<Vec<_>>();
            assert_eq!(means, naive(&values, window_len));
        }

        #[test]
        fn one_output_per_input(len in 0usize..500, half in 0usize..40) {
            let means = (0..len as i64).centered_means(2 * half + 1);
            assert_eq!(means.size_hint(), (len, Some(len)));
            assert_eq!(means.count(), len);
        }
    }
}
