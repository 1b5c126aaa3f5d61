#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct Chunks<I: Iterator> {
    iter: I,
    chunk_len: usize,
}

impl<I> Chunks<I>
where
    I: Iterator,
{
    pub fn new(iter: I, n: usize) -> Self {
        assert!(n != 0, "chunk size must be non-zero");
        Chunks { iter, chunk_len: n }
    }

    /// Nominal length of every chunk but (possibly) the last.
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }
}

impl<I> Iterator for Chunks<I>
where
    I: Iterator,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        // Fill a chunk (or what remains).
        let chunk = self.iter.by_ref().take(self.chunk_len).collect::<Vec<_>>();
        if chunk.is_empty() {
            return None;
        }
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.chunk_len),
            upper.map(|x| x.div_ceil(self.chunk_len)),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::IteratorAdapter;
    use proptest::proptest;

    proptest! {
        #[test]
        fn chunk_same_as_vec(vec: Vec<i32>, chunk_size in 1usize..255) {
            let iter = vec.clone().into_iter();
            assert_eq!(
                iter.chunks(chunk_size).collect::<Vec<_>>(),
                vec.chunks(chunk_size).collect::<Vec<_>>(),
            );
        }

        #[test]
        fn size_hint_is_exact_for_exact_sources(len in 0usize..2000, chunk_size in 1usize..255) {
            let chunks = (0..len).chunks(chunk_size);
            let expected = chunks.clone().count();
            assert_eq!(chunks.size_hint(), (expected, Some(expected)));
        }
    }

    #[test]
    fn last_chunk_is_short() {
        let chunks = (0..7).chunks(3).collect::<Vec<_>>();
        assert_eq!(chunks, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
    }

    #[test]
    #[should_panic]
    fn chunks_panic_on_0() {
        Vec::<i32>::new().into_iter().chunks(0).for_each(drop);
        vec![1, 2, 3].into_iter().chunks(0).for_each(drop);
    }
}
