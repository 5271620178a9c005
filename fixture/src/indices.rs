//! Row-major enumeration of multi-indices.

use std::iter::FusedIterator;

/// Yields every index of a shape exactly once, last axis fastest.
///
/// A shape with a zero extent yields nothing; the scalar shape `[]`
/// yields a single empty index.
#[derive(Debug, Clone)]
pub struct RowMajorIndices {
    shape: Vec<usize>,
    next: Option<Vec<usize>>,
    remaining: Option<usize>,
}

impl RowMajorIndices {
    #[must_use]
    pub fn new(shape: &[usize]) -> Self {
        let empty = shape.contains(&0);
        Self {
            shape: shape.to_vec(),
            next: (!empty).then(|| vec![0; shape.len()]),
            remaining: shape
                .iter()
                .try_fold(1usize, |acc, &len| acc.checked_mul(len)),
        }
    }
}

impl Iterator for RowMajorIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.remaining = self.remaining.map(|n| n.saturating_sub(1));

        let mut advanced = current.clone();
        for axis in (0..advanced.len()).rev() {
            advanced[axis] += 1;
            if advanced[axis] < self.shape[axis] {
                self.next = Some(advanced);
                return Some(current);
            }
            advanced[axis] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for RowMajorIndices {}
