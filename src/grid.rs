use crate::error::{MapError, Result};

/// Axis selector for the bound accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Columns.
    X,
    /// Rows.
    Y,
}

/// Fixed-size rectangular grid addressed by `[min_x, min_x + width) × [min_y, min_y + height)`.
///
/// Cells are stored row-major. Dimensions never change after construction, and
/// every cell coordinate fits in `i32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedGrid<T> {
    min_x: i32,
    min_y: i32,
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Default + Clone> BoundedGrid<T> {
    /// Allocates `width * height` default-valued cells.
    pub fn new(min_x: i32, min_y: i32, width: i32, height: i32) -> Result<Self> {
        let (w, h) = checked_dims(min_x, min_y, width, height)?;
        Ok(Self {
            min_x,
            min_y,
            width: w,
            height: h,
            cells: vec![T::default(); w * h],
        })
    }
}

impl<T> BoundedGrid<T> {
    /// Wraps an existing row-major buffer. The buffer length must equal `width * height`.
    pub fn from_row_major(min_x: i32, min_y: i32, width: i32, height: i32, cells: Vec<T>) -> Result<Self> {
        let (w, h) = checked_dims(min_x, min_y, width, height)?;
        if cells.len() != w * h {
            return Err(MapError::InvalidDimension {
                width: width as i64,
                height: height as i64,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            width: w,
            height: h,
            cells,
        })
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Smallest valid coordinate along `dim`.
    #[inline]
    pub fn lower_bound(&self, dim: Dim) -> i32 {
        match dim {
            Dim::X => self.min_x,
            Dim::Y => self.min_y,
        }
    }

    /// Inclusive upper bound. For an empty axis this is `lower_bound - 1`, which
    /// may fall below `i32::MIN`, hence the wider type.
    #[inline]
    pub fn upper_bound(&self, dim: Dim) -> i64 {
        self.lower_bound(dim) as i64 + self.length(dim) as i64 - 1
    }

    /// Cell count along `dim`.
    #[inline]
    pub fn length(&self, dim: Dim) -> usize {
        match dim {
            Dim::X => self.width,
            Dim::Y => self.height,
        }
    }

    /// Whether `(x, y)` addresses a cell.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y).is_some()
    }

    /// The cell at `(x, y)`, or [`MapError::OutOfBounds`].
    pub fn get(&self, x: i32, y: i32) -> Result<&T> {
        match self.index_of(x, y) {
            Some(i) => Ok(&self.cells[i]),
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Mutable access to the cell at `(x, y)`.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut T> {
        match self.index_of(x, y) {
            Some(i) => Ok(&mut self.cells[i]),
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Overwrites the cell at `(x, y)`.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<()> {
        *self.get_mut(x, y)? = value;
        Ok(())
    }

    /// Row-major backing storage, first cell is `(min_x, min_y)`.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Cells with their coordinates, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &T)> + '_ {
        let width = self.width.max(1);
        // construction guarantees the last coordinate fits in i32
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| ((self.min_x + (i % width) as i32, self.min_y + (i / width) as i32), v))
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let dx = x as i64 - self.min_x as i64;
        let dy = y as i64 - self.min_y as i64;
        if dx < 0 || dy < 0 || dx >= self.width as i64 || dy >= self.height as i64 {
            return None;
        }
        Some(dy as usize * self.width + dx as usize)
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> MapError {
        MapError::OutOfBounds {
            x,
            y,
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.upper_bound(Dim::X),
            max_y: self.upper_bound(Dim::Y),
        }
    }
}

fn checked_dims(min_x: i32, min_y: i32, width: i32, height: i32) -> Result<(usize, usize)> {
    let past_end = |min: i32, len: i32| min as i64 + len as i64 - 1 > i32::MAX as i64;
    if width < 0 || height < 0 || past_end(min_x, width) || past_end(min_y, height) {
        return Err(MapError::InvalidDimension {
            width: width as i64,
            height: height as i64,
        });
    }
    Ok((width as usize, height as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_origin_reads_first_and_last_cell() {
        let cells: Vec<u32> = (0..8).collect();
        let grid = BoundedGrid::from_row_major(-2, 3, 4, 2, cells).unwrap();

        assert_eq!(*grid.get(-2, 3).unwrap(), 0);
        assert_eq!(*grid.get(1, 4).unwrap(), 7);
        assert!(matches!(grid.get(2, 3), Err(MapError::OutOfBounds { x: 2, y: 3, .. })));
        assert!(matches!(grid.get(-3, 3), Err(MapError::OutOfBounds { .. })));
        assert!(matches!(grid.get(0, 5), Err(MapError::OutOfBounds { .. })));
    }

    #[test]
    fn set_then_get_round_trips_across_every_cell() {
        let mut grid: BoundedGrid<i64> = BoundedGrid::new(-5, 7, 3, 4).unwrap();
        for y in grid.lower_bound(Dim::Y)..=grid.upper_bound(Dim::Y) as i32 {
            for x in grid.lower_bound(Dim::X)..=grid.upper_bound(Dim::X) as i32 {
                grid.set(x, y, (x as i64) * 100 + y as i64).unwrap();
            }
        }
        for ((x, y), v) in grid.iter() {
            assert_eq!(*v, (x as i64) * 100 + y as i64);
            assert_eq!(grid.get(x, y).unwrap(), v);
        }
    }

    #[test]
    fn bounds_agree_with_length() {
        for &(mx, my, w, h) in &[(0, 0, 1, 1), (-2, 3, 4, 2), (10, -10, 0, 5), (i32::MAX, i32::MIN, 1, 3)] {
            let grid: BoundedGrid<u8> = BoundedGrid::new(mx, my, w, h).unwrap();
            for dim in [Dim::X, Dim::Y] {
                assert_eq!(
                    grid.upper_bound(dim) - grid.lower_bound(dim) as i64 + 1,
                    grid.length(dim) as i64
                );
            }
        }
    }

    #[test]
    fn rejects_negative_dimensions() {
        assert!(matches!(
            BoundedGrid::<u32>::new(0, 0, -1, 2),
            Err(MapError::InvalidDimension { width: -1, height: 2 })
        ));
        assert!(matches!(
            BoundedGrid::<u32>::new(0, 0, 2, -1),
            Err(MapError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn rejects_cells_past_i32_range() {
        assert!(matches!(
            BoundedGrid::<u8>::new(i32::MAX, 0, 2, 1),
            Err(MapError::InvalidDimension { width: 2, height: 1 })
        ));
        assert!(BoundedGrid::<u8>::new(0, i32::MAX - 1, 1, 3).is_err());

        let grid = BoundedGrid::<u8>::new(i32::MAX - 1, 0, 2, 1).unwrap();
        assert_eq!(grid.upper_bound(Dim::X), i32::MAX as i64);
        let coords: Vec<_> = grid.iter().map(|(pos, _)| pos).collect();
        assert_eq!(coords, vec![(i32::MAX - 1, 0), (i32::MAX, 0)]);
        for (x, y) in coords {
            assert!(grid.get(x, y).is_ok());
        }
    }

    #[test]
    fn rejects_buffer_of_wrong_length() {
        let err = BoundedGrid::from_row_major(0, 0, 2, 2, vec![1u32, 2, 3]).unwrap_err();
        assert!(matches!(err, MapError::InvalidDimension { width: 2, height: 2 }));
    }

    #[test]
    fn empty_grid_rejects_every_access() {
        let grid: BoundedGrid<u32> = BoundedGrid::new(0, 0, 0, 0).unwrap();
        assert!(grid.get(0, 0).is_err());
        assert_eq!(grid.iter().count(), 0);
    }
}
