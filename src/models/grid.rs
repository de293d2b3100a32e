//! Floor × repair-sequence grid.
//!
//! Nearly every quantity the scheduler touches (demand, capacity, ready
//! times, start/end times, worker assignments) is indexed by a floor and a
//! repair sequence. `FloorSequenceGrid` stores them floor-major: row = floor,
//! column = sequence.
//!
//! A grid always holds exactly `floors * sequences` values. Every
//! constructor keeps that invariant, and deserialization rejects data that
//! breaks it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dense `floors × sequences` grid stored floor-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid<T>")]
pub struct FloorSequenceGrid<T> {
    floors: usize,
    sequences: usize,
    values: Vec<T>,
}

/// Serialized form, checked before it becomes a grid.
#[derive(Deserialize)]
struct RawGrid<T> {
    floors: usize,
    sequences: usize,
    values: Vec<T>,
}

/// Deserialized grid whose value count disagrees with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSizeError {
    /// Declared floors.
    pub floors: usize,
    /// Declared sequences.
    pub sequences: usize,
    /// Values actually present.
    pub values: usize,
}

impl fmt::Display for GridSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} grid needs {} values, got {}",
            self.floors,
            self.sequences,
            self.floors * self.sequences,
            self.values
        )
    }
}

impl std::error::Error for GridSizeError {}

impl<T> TryFrom<RawGrid<T>> for FloorSequenceGrid<T> {
    type Error = GridSizeError;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        let expected = raw.floors.checked_mul(raw.sequences);
        if expected != Some(raw.values.len()) {
            return Err(GridSizeError {
                floors: raw.floors,
                sequences: raw.sequences,
                values: raw.values.len(),
            });
        }
        Ok(Self {
            floors: raw.floors,
            sequences: raw.sequences,
            values: raw.values,
        })
    }
}

impl<T: Clone> FloorSequenceGrid<T> {
    /// Creates a grid with every cell set to `fill`.
    pub fn filled(floors: usize, sequences: usize, fill: T) -> Self {
        Self {
            floors,
            sequences,
            values: vec![fill; floors * sequences],
        }
    }

    /// Builds a grid from per-floor rows.
    ///
    /// Returns `None` when the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let floors = rows.len();
        let sequences = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != sequences) {
            return None;
        }
        Some(Self {
            floors,
            sequences,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// Builds a grid where every floor shares the same per-sequence values.
    pub fn broadcast(floors: usize, per_sequence: &[T]) -> Self {
        let mut values = Vec::with_capacity(floors * per_sequence.len());
        for _ in 0..floors {
            values.extend_from_slice(per_sequence);
        }
        Self {
            floors,
            sequences: per_sequence.len(),
            values,
        }
    }

    /// Applies `f` to every cell, keeping the shape.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> FloorSequenceGrid<U> {
        FloorSequenceGrid {
            floors: self.floors,
            sequences: self.sequences,
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Per-floor rows, cloned.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        if self.sequences == 0 {
            return vec![Vec::new(); self.floors];
        }
        self.values
            .chunks(self.sequences)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl<T> FloorSequenceGrid<T> {
    /// Number of floors (rows).
    #[inline]
    pub fn floors(&self) -> usize {
        self.floors
    }

    /// Number of repair sequences (columns).
    #[inline]
    pub fn sequences(&self) -> usize {
        self.sequences
    }

    /// `(floors, sequences)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.floors, self.sequences)
    }

    /// Whether two grids have identical dimensions.
    pub fn same_shape<U>(&self, other: &FloorSequenceGrid<U>) -> bool {
        self.shape() == other.shape()
    }

    #[inline]
    fn offset(&self, floor: usize, sequence: usize) -> usize {
        floor * self.sequences + sequence
    }

    /// Cell value, or `None` when out of bounds.
    pub fn get(&self, floor: usize, sequence: usize) -> Option<&T> {
        if floor < self.floors && sequence < self.sequences {
            self.values.get(self.offset(floor, sequence))
        } else {
            None
        }
    }

    /// Mutable cell value, or `None` when out of bounds.
    pub fn get_mut(&mut self, floor: usize, sequence: usize) -> Option<&mut T> {
        if floor < self.floors && sequence < self.sequences {
            let offset = self.offset(floor, sequence);
            self.values.get_mut(offset)
        } else {
            None
        }
    }

    /// Overwrites a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, floor: usize, sequence: usize, value: T) {
        if let Some(cell) = self.get_mut(floor, sequence) {
            *cell = value;
        }
    }

    /// One floor's values across all sequences, or `None` when out of bounds.
    pub fn row(&self, floor: usize) -> Option<&[T]> {
        if floor >= self.floors {
            return None;
        }
        let start = floor * self.sequences;
        self.values.get(start..start + self.sequences)
    }

    /// Iterates `(floor, sequence, &value)` in floor-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let sequences = self.sequences.max(1);
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (i / sequences, i % sequences, v))
    }

    /// Iterates one sequence's values from the lowest floor up.
    pub fn column(&self, sequence: usize) -> impl Iterator<Item = &T> {
        (0..self.floors).filter_map(move |floor| self.get(floor, sequence))
    }

    /// All values in floor-major order.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl FloorSequenceGrid<f64> {
    /// Sum of all cells.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest cell, or `0.0` for an empty grid.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_floor_major() {
        let g = FloorSequenceGrid::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(g.shape(), (2, 3));
        assert_eq!(g.get(1, 0), Some(&4.0));
        assert_eq!(g.row(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(g.row(2), None);
        assert_eq!(g.column(2).copied().collect::<Vec<_>>(), vec![3.0, 6.0]);
        assert!((g.total() - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(FloorSequenceGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_none());
    }

    #[test]
    fn test_broadcast_and_set() {
        let mut g = FloorSequenceGrid::broadcast(3, &[7.0, 9.0]);
        assert_eq!(g.shape(), (3, 2));
        assert_eq!(g.get(2, 1), Some(&9.0));
        g.set(2, 1, 1.5);
        assert_eq!(g.get(2, 1), Some(&1.5));
        g.set(5, 0, 100.0); // ignored
        assert_eq!(g.get(5, 0), None);
    }

    #[test]
    fn test_iter_positions() {
        let g = FloorSequenceGrid::from_rows(vec![vec!['a', 'b'], vec!['c', 'd']]).unwrap();
        let cells: Vec<_> = g.iter().map(|(f, s, v)| (f, s, *v)).collect();
        assert_eq!(cells, vec![(0, 0, 'a'), (0, 1, 'b'), (1, 0, 'c'), (1, 1, 'd')]);
        assert_eq!(g.to_rows(), vec![vec!['a', 'b'], vec!['c', 'd']]);
    }

    #[test]
    fn test_deserialize_checks_value_count() {
        let g: FloorSequenceGrid<f64> =
            serde_json::from_str(r#"{"floors":2,"sequences":1,"values":[10.0,4.0]}"#).unwrap();
        assert_eq!(g.get(1, 0), Some(&4.0));

        let short = serde_json::from_str::<FloorSequenceGrid<f64>>(
            r#"{"floors":2,"sequences":1,"values":[10.0]}"#,
        );
        let err = short.unwrap_err().to_string();
        assert!(err.contains("2x1 grid needs 2 values, got 1"), "{err}");

        let long = serde_json::from_str::<FloorSequenceGrid<f64>>(
            r#"{"floors":1,"sequences":1,"values":[10.0,50.0]}"#,
        );
        assert!(long.is_err());
    }

    #[test]
    fn test_serialize_round_trips_through_check() {
        let g = FloorSequenceGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: FloorSequenceGrid<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_map_keeps_shape() {
        let g = FloorSequenceGrid::filled(2, 4, 2.0);
        let doubled = g.map(|v| v * 2.0);
        assert!(doubled.same_shape(&g));
        assert!((doubled.max_value() - 4.0).abs() < 1e-12);
    }
}
