//! Immutable square distance matrix keyed by location id.

use std::collections::HashMap;

use crate::Location;

use super::error::{MatrixLookupError, MatrixShapeError};

/// Pairwise road distances in metres.
///
/// Rows and columns follow the order of the locations the matrix was built
/// from. The diagonal is zero and the matrix is symmetric; both properties are
/// checked by [`DistanceMatrix::from_rows`] and guaranteed by the builder.
///
/// # Examples
/// ```
/// use fleetroute_core::{DistanceMatrix, Location};
///
/// let locations = [Location::new(0, 0.0, 0.0), Location::new(7, 0.0, 1.0)];
/// let matrix = DistanceMatrix::from_rows(&locations, vec![vec![0, 900], vec![900, 0]])?;
/// assert_eq!(matrix.distance(7, 0)?, 900);
/// assert!(matrix.distance(3, 0).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    ids: Vec<u64>,
    index: HashMap<u64, usize>,
    cells: Vec<u64>,
}

impl DistanceMatrix {
    /// Validate explicit rows against a location list.
    ///
    /// # Errors
    /// Returns [`MatrixShapeError`] when ids repeat, the rows are not square,
    /// the diagonal is non-zero or the matrix is asymmetric.
    pub fn from_rows(
        locations: &[Location],
        rows: Vec<Vec<u64>>,
    ) -> Result<Self, MatrixShapeError> {
        let ids: Vec<u64> = locations.iter().map(|l| l.id).collect();
        let index = index_ids(&ids).map_err(|id| MatrixShapeError::DuplicateLocation { id })?;
        let n = ids.len();
        if rows.len() != n {
            return Err(MatrixShapeError::NotSquare {
                expected: n,
                found: rows.len(),
            });
        }
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(MatrixShapeError::NotSquare {
                expected: n,
                found: row.len(),
            });
        }
        let matrix = Self {
            ids,
            index,
            cells: rows.into_iter().flatten().collect(),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Assemble a matrix from already-validated parts.
    ///
    /// `cells` is row-major with `ids.len()²` entries.
    pub(crate) fn from_parts(ids: Vec<u64>, index: HashMap<u64, usize>, cells: Vec<u64>) -> Self {
        debug_assert_eq!(cells.len(), ids.len() * ids.len());
        Self { ids, index, cells }
    }

    fn validate(&self) -> Result<(), MatrixShapeError> {
        for (i, &from) in self.ids.iter().enumerate() {
            if self.cell(i, i) != Some(0) {
                return Err(MatrixShapeError::NonZeroDiagonal { id: from });
            }
            for (j, &to) in self.ids.iter().enumerate().skip(i + 1) {
                if self.cell(i, j) != self.cell(j, i) {
                    return Err(MatrixShapeError::Asymmetric { from, to });
                }
            }
        }
        Ok(())
    }

    fn cell(&self, row: usize, col: usize) -> Option<u64> {
        let n = self.ids.len();
        if row >= n || col >= n {
            return None;
        }
        self.cells.get(row * n + col).copied()
    }

    /// Distance in metres between two location ids.
    ///
    /// # Errors
    /// Returns [`MatrixLookupError::UnknownLocation`] when either id is not
    /// covered by the matrix.
    pub fn distance(&self, from: u64, to: u64) -> Result<u64, MatrixLookupError> {
        let row = self.position(from)?;
        let col = self.position(to)?;
        self.cell(row, col)
            .ok_or(MatrixLookupError::UnknownLocation { id: to })
    }

    fn position(&self, id: u64) -> Result<usize, MatrixLookupError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(MatrixLookupError::UnknownLocation { id })
    }

    /// Whether the matrix has a row for `id`.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    /// Location ids in row order.
    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Number of locations covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the matrix covers no locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The matrix as nested rows, in id order.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        let n = self.ids.len();
        if n == 0 {
            return Vec::new();
        }
        self.cells.chunks(n).map(<[u64]>::to_vec).collect()
    }
}

/// Map each id to its position, reporting the first repeated id.
pub(crate) fn index_ids(ids: &[u64]) -> Result<HashMap<u64, usize>, u64> {
    let mut index = HashMap::with_capacity(ids.len());
    for (position, &id) in ids.iter().enumerate() {
        if index.insert(id, position).is_some() {
            return Err(id);
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn locations() -> Vec<Location> {
        vec![
            Location::new(10, 0.0, 0.0),
            Location::new(20, 0.0, 1.0),
            Location::new(30, 1.0, 1.0),
        ]
    }

    fn rows() -> Vec<Vec<u64>> {
        vec![vec![0, 5, 9], vec![5, 0, 4], vec![9, 4, 0]]
    }

    #[rstest]
    fn lookups_use_ids_not_positions(locations: Vec<Location>) {
        let matrix = DistanceMatrix::from_rows(&locations, rows()).expect("valid rows");
        assert_eq!(matrix.distance(10, 30).expect("known ids"), 9);
        assert_eq!(matrix.distance(30, 20).expect("known ids"), 4);
        assert_eq!(matrix.distance(20, 20).expect("known ids"), 0);
        assert_eq!(matrix.ids(), &[10, 20, 30]);
        assert_eq!(matrix.to_rows(), rows());
    }

    #[rstest]
    fn unknown_ids_are_reported(locations: Vec<Location>) {
        let matrix = DistanceMatrix::from_rows(&locations, rows()).expect("valid rows");
        assert_eq!(
            matrix.distance(10, 99),
            Err(MatrixLookupError::UnknownLocation { id: 99 })
        );
        assert!(!matrix.contains(99));
    }

    #[rstest]
    fn asymmetric_rows_are_rejected(locations: Vec<Location>) {
        let mut bad = rows();
        if let Some(cell) = bad.get_mut(0).and_then(|row| row.get_mut(2)) {
            *cell = 8;
        }
        let err = DistanceMatrix::from_rows(&locations, bad).expect_err("asymmetric rows");
        assert_eq!(err, MatrixShapeError::Asymmetric { from: 10, to: 30 });
    }

    #[rstest]
    fn non_zero_diagonal_is_rejected(locations: Vec<Location>) {
        let mut bad = rows();
        if let Some(cell) = bad.get_mut(1).and_then(|row| row.get_mut(1)) {
            *cell = 1;
        }
        let err = DistanceMatrix::from_rows(&locations, bad).expect_err("non-zero diagonal");
        assert_eq!(err, MatrixShapeError::NonZeroDiagonal { id: 20 });
    }

    #[rstest]
    fn ragged_rows_are_rejected(locations: Vec<Location>) {
        let rows = vec![vec![0, 1, 2], vec![1, 0], vec![2, 0, 0]];
        let err = DistanceMatrix::from_rows(&locations, rows).expect_err("ragged rows");
        assert_eq!(err, MatrixShapeError::NotSquare { expected: 3, found: 2 });
    }

    #[rstest]
    fn duplicate_ids_are_rejected() {
        let dup = [Location::new(1, 0.0, 0.0), Location::new(1, 1.0, 1.0)];
        let err = DistanceMatrix::from_rows(&dup, vec![vec![0, 1], vec![1, 0]])
            .expect_err("duplicate ids");
        assert_eq!(err, MatrixShapeError::DuplicateLocation { id: 1 });
    }
}
