use super::offsets::moore;
use crate::error::GridError;

/// Boundary condition along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Coordinates wrap around (`rem_euclid`).
    #[default]
    Periodic,
    /// Coordinates outside `[0, extent)` do not exist.
    Fixed,
}

impl TryFrom<&str> for Boundary {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "periodic" => Ok(Self::Periodic),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!(
                "unknown boundary '{s}', expected 'periodic' or 'fixed'"
            )),
        }
    }
}

/// Bravais lattice with per-axis boundary conditions and on-the-fly neighbor
/// computation.
///
/// Sites are indexed in row-major (C) order, last axis fastest. The stencil
/// is stored as `n_neighbors` forward offsets; the backward neighbor in
/// direction `d` is the negation of offset `d`.
#[derive(Debug, Clone)]
pub struct Lattice {
    /// Extent along each dimension (e.g. `[64, 64]`).
    pub shape: Vec<usize>,
    /// Row-major strides: `strides[d] = product of shape[d+1..]`.
    pub strides: Vec<usize>,
    /// Boundary condition along each dimension.
    pub boundaries: Vec<Boundary>,
    /// Total number of sites (`shape.iter().product()`).
    pub n_sites: usize,
    /// Number of spatial dimensions (`shape.len()`).
    pub n_dims: usize,
    /// Number of forward neighbor directions per site.
    pub n_neighbors: usize,
    /// Flat forward offsets, `offsets[d * n_dims + dim]`.
    offsets: Vec<isize>,
}

impl Lattice {
    /// Create a lattice with the Moore stencil.
    pub fn new(shape: Vec<usize>, boundaries: Vec<Boundary>) -> Self {
        let n_dims = shape.len();
        Self::with_offsets(shape, boundaries, moore(n_dims))
    }

    /// Create a Moore lattice with every axis periodic.
    pub fn periodic(shape: Vec<usize>) -> Self {
        let boundaries = vec![Boundary::Periodic; shape.len()];
        Self::new(shape, boundaries)
    }

    /// Create a lattice with arbitrary forward neighbor offsets.
    ///
    /// Each offset is a vector of length `n_dims` specifying a displacement in
    /// lattice coordinates.
    pub fn with_offsets(
        shape: Vec<usize>,
        boundaries: Vec<Boundary>,
        offsets: Vec<Vec<isize>>,
    ) -> Self {
        let n_dims = shape.len();
        let n_neighbors = offsets.len();
        let n_sites: usize = shape.iter().product();

        assert_eq!(
            boundaries.len(),
            n_dims,
            "got {} boundary tags for {n_dims} dimensions",
            boundaries.len(),
        );
        for (idx, off) in offsets.iter().enumerate() {
            assert_eq!(
                off.len(),
                n_dims,
                "offset {idx} has length {}, expected {n_dims}",
                off.len(),
            );
        }

        let mut strides = vec![1usize; n_dims];
        for d in (0..n_dims.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        Self {
            shape,
            strides,
            boundaries,
            n_sites,
            n_dims,
            n_neighbors,
            offsets: offsets.into_iter().flatten().collect(),
        }
    }

    /// Map a (possibly out-of-range) coordinate on axis `dim` into `[0, extent)`.
    #[inline]
    fn wrap_axis(&self, dim: usize, c: isize) -> Option<usize> {
        let size = self.shape[dim] as isize;
        if (0..size).contains(&c) {
            return Some(c as usize);
        }
        match self.boundaries[dim] {
            Boundary::Periodic => Some(c.rem_euclid(size) as usize),
            Boundary::Fixed => None,
        }
    }

    /// Return the neighbor of site `flat_idx` in direction `dir`.
    /// `forward = true` means +offset, `forward = false` means -offset.
    ///
    /// `None` when the neighbor falls off a fixed axis or wraps back onto
    /// `flat_idx` itself.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dir: usize, forward: bool) -> Option<usize> {
        let sign = if forward { 1 } else { -1 };
        let off = &self.offsets[dir * self.n_dims..(dir + 1) * self.n_dims];
        let mut flat = 0usize;
        for dim in 0..self.n_dims {
            let coord = ((flat_idx / self.strides[dim]) % self.shape[dim]) as isize;
            let c = self.wrap_axis(dim, coord + sign * off[dim])?;
            flat += c * self.strides[dim];
        }
        (flat != flat_idx).then_some(flat)
    }

    /// Collect every neighbor of `flat_idx` into `buf` (cleared first).
    ///
    /// Wrap duplicates on short periodic axes are kept with multiplicity.
    #[inline]
    pub fn neighbors_into(&self, flat_idx: usize, buf: &mut Vec<usize>) {
        buf.clear();
        for d in 0..self.n_neighbors {
            for fwd in [true, false] {
                if let Some(j) = self.neighbor(flat_idx, d, fwd) {
                    buf.push(j);
                }
            }
        }
    }

    /// Row-major flat index of a signed coordinate, wrapping periodic axes.
    pub fn flat_index(&self, coord: &[isize]) -> Result<usize, GridError> {
        if coord.len() != self.n_dims {
            return Err(GridError::shape(format!(
                "coordinate has {} axes, lattice has {}",
                coord.len(),
                self.n_dims
            )));
        }
        let mut flat = 0usize;
        for (dim, &c) in coord.iter().enumerate() {
            let c = self.wrap_axis(dim, c).ok_or_else(|| GridError::Boundary {
                coord: coord.to_vec(),
            })?;
            flat += c * self.strides[dim];
        }
        Ok(flat)
    }

    /// Coordinates of site `flat_idx`.
    pub fn coords(&self, flat_idx: usize) -> Vec<usize> {
        (0..self.n_dims)
            .map(|d| (flat_idx / self.strides[d]) % self.shape[d])
            .collect()
    }

    /// Number of checkerboard colors, one per coordinate parity pattern.
    pub fn n_colors(&self) -> usize {
        1 << self.n_dims
    }

    /// Checkerboard color of `flat_idx`: bit `d` is the parity of coordinate `d`.
    #[inline]
    pub fn color(&self, flat_idx: usize) -> usize {
        (0..self.n_dims).fold(0, |acc, d| {
            acc | ((((flat_idx / self.strides[d]) % self.shape[d]) & 1) << d)
        })
    }

    /// Sites of one color in raster order.
    pub fn sites_of_color(&self, color: usize) -> Vec<usize> {
        (0..self.n_sites)
            .filter(|&i| self.color(i) == color)
            .collect()
    }

    /// True when no site has a Moore neighbor of its own color.
    ///
    /// Parity flips across every step except a periodic wrap on an odd axis;
    /// an axis of extent 1 only ever wraps onto the site itself.
    pub fn coloring_is_independent(&self) -> bool {
        self.shape
            .iter()
            .zip(self.boundaries.iter())
            .all(|(&size, &bc)| bc == Boundary::Fixed || size == 1 || size % 2 == 0)
    }
}
