/// An iterator with a length declared up front, so consumers (ex. a progress display)
/// can know the total before the first item is produced.
///
/// The declared length is trusted. If the inner iterator disagrees the remaining count saturates at 0
/// or ends early; callers that care compare the number of items actually consumed with [`WithLength::declared`].
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct WithLength<I> {
    iter: I,
    declared: usize,
    remaining: usize,
}

impl<I> WithLength<I> {
    pub fn new(iter: I, len: usize) -> Self {
        WithLength {
            iter,
            declared: len,
            remaining: len,
        }
    }

    /// The length given at construction.
    pub fn declared(&self) -> usize {
        self.declared
    }
}

impl<I> Iterator for WithLength<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.iter.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I: Iterator> ExactSizeIterator for WithLength<I> {}

#[cfg(test)]
mod tests {
    use crate::IteratorAdapter;

    #[test]
    fn len_counts_down() {
        let mut iter = (0..5).chunks(2).with_length(3);
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(vec![0, 1]));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(vec![2, 3]));
        assert_eq!(iter.next(), Some(vec![4]));
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.declared(), 3);
    }

    #[test]
    fn does_not_consume_to_know_len() {
        let mut pulled = 0;
        let iter = std::iter::from_fn(|| {
            pulled += 1;
            Some(pulled)
        })
        .take(10)
        .with_length(10);
        assert_eq!(iter.len(), 10);
        drop(iter);
        assert_eq!(pulled, 0);
    }
}
