//! Dense pairwise cosine-similarity matrix.
//!
//! Stored row-major in one `Vec<f32>` of N² cells. Rows are computed in
//! parallel with Rayon; each cell is the sparse dot product of two
//! L2-normalized feature rows.

use crate::vectorizer::FeatureMatrix;
use rayon::prelude::*;

/// N×N cosine similarities between catalog movies
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute every pairwise similarity.
    ///
    /// The diagonal is pinned to 1.0, also for movies whose signature has no
    /// vocabulary terms. Off-diagonal values are clamped to `[0, 1]` so float
    /// rounding on identical rows never beats the diagonal.
    pub fn compute(features: &FeatureMatrix) -> Self {
        let n = features.n_rows();
        let mut data = vec![0.0f32; n * n];

        if n > 0 {
            data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                let a = &features.rows[i];
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = if i == j {
                        1.0
                    } else {
                        a.dot(&features.rows[j]).clamp(0.0, 1.0)
                    };
                }
            });
        }

        Self { n, data }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.n
    }

    /// Similarity of movies `i` and `j`, `None` when out of range
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.n && j < self.n {
            Some(self.data[i * self.n + j])
        } else {
            None
        }
    }

    /// Full similarity row for movie `i`
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i < self.n {
            Some(&self.data[i * self.n..(i + 1) * self.n])
        } else {
            None
        }
    }

    /// Heap bytes held by the matrix
    pub fn memory_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}
