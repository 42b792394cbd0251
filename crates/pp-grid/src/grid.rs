//! `Grid<A>` — a fixed `width × height` torus of cells.
//!
//! Cells are stored row-major, so a cell's index doubles as its work token:
//! `index = y * width + x`, and `[0, len())` is the work range of one phase.

use crate::{Cell, GridError, GridResult};

/// Von Neumann neighbourhood offsets: north, east, south, west.
const VON_NEUMANN: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub struct Grid<A> {
    width:  usize,
    height: usize,
    cells:  Vec<Cell<A>>,
}

impl<A> Grid<A> {
    pub fn new(width: usize, height: usize) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;
        let cells = (0..len).map(|_| Cell::new()).collect();
        Ok(Self { width, height, cells })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells, i.e. the work size of one phase.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn cell(&self, index: usize) -> &Cell<A> {
        &self.cells[index]
    }

    pub fn cells(&self) -> &[Cell<A>] {
        &self.cells
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Indices of the four von Neumann neighbours (N, E, S, W), wrapping at
    /// the edges.
    pub fn neighbours(&self, index: usize) -> [usize; 4] {
        let (x, y) = self.coords(index);
        VON_NEUMANN.map(|(dx, dy)| {
            let nx = (x as isize + dx).rem_euclid(self.width as isize) as usize;
            let ny = (y as isize + dy).rem_euclid(self.height as isize) as usize;
            self.index(nx, ny)
        })
    }

    /// Total agents currently in all cells (arrivals not included).
    pub fn total_agents(&self) -> usize {
        self.cells.iter().map(Cell::len).sum()
    }
}

impl<A: Send> Grid<A> {
    /// Count current agents matching `pred` across all cells.
    ///
    /// Locks each cell briefly in turn; call it only while workers are parked
    /// (e.g. from a barrier observer) to get a consistent total.  With the
    /// `parallel` feature the scan runs on Rayon's pool.
    pub fn census<F>(&self, pred: F) -> usize
    where
        F: Fn(&A) -> bool + Sync,
    {
        #[cfg(not(feature = "parallel"))]
        {
            self.cells
                .iter()
                .map(|c| c.lock().iter().filter(|a| pred(a)).count())
                .sum()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.cells
                .par_iter()
                .map(|c| c.lock().iter().filter(|a| pred(a)).count())
                .sum()
        }
    }
}
