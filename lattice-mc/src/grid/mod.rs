pub mod tag;

pub use tag::TypeTag;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::codec;
use crate::error::GridError;
use crate::geometry::{Boundary, Lattice};

/// Largest dimensionality accepted by the container and the codec.
pub const MAX_DIMENSION: usize = 3;

/// Site value type of a grid, including the vector arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    ScalarInt,
    ScalarReal,
    Vector { arity: usize },
}

impl SiteKind {
    pub fn tag(self) -> TypeTag {
        match self {
            Self::ScalarInt => TypeTag::ScalarInt,
            Self::ScalarReal => TypeTag::ScalarReal,
            Self::Vector { .. } => TypeTag::VectorReal,
        }
    }

    /// Stored components per site.
    pub fn arity(self) -> usize {
        match self {
            Self::ScalarInt | Self::ScalarReal => 1,
            Self::Vector { arity } => arity,
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScalarInt => f.write_str("scalar:int"),
            Self::ScalarReal => f.write_str("scalar:double"),
            Self::Vector { arity } => write!(f, "vector:double[{arity}]"),
        }
    }
}

/// Flat row-major site storage, one variant per site value type.
///
/// Vector sites occupy `values[i * arity .. (i + 1) * arity]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    ScalarInt(Vec<i32>),
    ScalarReal(Vec<f64>),
    VectorReal { arity: usize, values: Vec<f64> },
}

impl Field {
    /// All-zero storage for `n_sites` sites.
    pub fn zeros(kind: SiteKind, n_sites: usize) -> Self {
        match kind {
            SiteKind::ScalarInt => Self::ScalarInt(vec![0; n_sites]),
            SiteKind::ScalarReal => Self::ScalarReal(vec![0.0; n_sites]),
            SiteKind::Vector { arity } => Self::VectorReal {
                arity,
                values: vec![0.0; n_sites * arity],
            },
        }
    }

    pub fn kind(&self) -> SiteKind {
        match self {
            Self::ScalarInt(_) => SiteKind::ScalarInt,
            Self::ScalarReal(_) => SiteKind::ScalarReal,
            Self::VectorReal { arity, .. } => SiteKind::Vector { arity: *arity },
        }
    }

    pub fn n_sites(&self) -> usize {
        match self {
            Self::ScalarInt(v) => v.len(),
            Self::ScalarReal(v) => v.len(),
            Self::VectorReal { arity, values } => values.len().checked_div(*arity).unwrap_or(0),
        }
    }

    fn site(&self, i: usize) -> Site<'_> {
        match self {
            Self::ScalarInt(v) => Site::Int(v[i]),
            Self::ScalarReal(v) => Site::Real(v[i]),
            Self::VectorReal { arity, values } => Site::Vector(&values[i * arity..(i + 1) * arity]),
        }
    }
}

/// One site value, borrowed for vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Site<'a> {
    Int(i32),
    Real(f64),
    Vector(&'a [f64]),
}

impl Site<'_> {
    fn kind(&self) -> SiteKind {
        match self {
            Self::Int(_) => SiteKind::ScalarInt,
            Self::Real(_) => SiteKind::ScalarReal,
            Self::Vector(v) => SiteKind::Vector { arity: v.len() },
        }
    }
}

/// Validate a shape and return its site count.
fn checked_sites(shape: &[usize], boundaries: &[Boundary]) -> Result<usize, GridError> {
    if shape.is_empty() || shape.len() > MAX_DIMENSION {
        return Err(GridError::shape(format!(
            "dimension must be in 1..={MAX_DIMENSION}, got {}",
            shape.len()
        )));
    }
    if boundaries.len() != shape.len() {
        return Err(GridError::shape(format!(
            "{} boundary tags for {} axes",
            boundaries.len(),
            shape.len()
        )));
    }
    if let Some(axis) = shape.iter().position(|&n| n == 0) {
        return Err(GridError::shape(format!("axis {axis} has zero extent")));
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| GridError::shape(format!("site count of {shape:?} overflows")))
}

/// A lattice together with one value per site.
///
/// The shape and site type are fixed at construction; the update kernel only
/// ever rewrites values in place.
#[derive(Debug, Clone)]
pub struct Grid {
    pub(crate) lattice: Lattice,
    pub(crate) field: Field,
}

impl Grid {
    /// Allocate a zero-initialized grid.
    pub fn new(
        shape: Vec<usize>,
        boundaries: Vec<Boundary>,
        kind: SiteKind,
    ) -> Result<Self, GridError> {
        if kind.arity() == 0 {
            return Err(GridError::shape("vector arity must be at least 1"));
        }
        let n_sites = checked_sites(&shape, &boundaries)?;
        n_sites
            .checked_mul(kind.arity())
            .ok_or_else(|| GridError::shape(format!("value count of {shape:?} overflows")))?;
        Ok(Self {
            lattice: Lattice::new(shape, boundaries),
            field: Field::zeros(kind, n_sites),
        })
    }

    /// Allocate a zero-initialized grid with every axis periodic.
    pub fn periodic(shape: Vec<usize>, kind: SiteKind) -> Result<Self, GridError> {
        let boundaries = vec![Boundary::Periodic; shape.len()];
        Self::new(shape, boundaries, kind)
    }

    /// Wrap existing storage; the field must hold exactly one value per site.
    pub fn from_field(
        shape: Vec<usize>,
        boundaries: Vec<Boundary>,
        field: Field,
    ) -> Result<Self, GridError> {
        let n_sites = checked_sites(&shape, &boundaries)?;
        if field.kind().arity() == 0 {
            return Err(GridError::shape("vector arity must be at least 1"));
        }
        let expected = n_sites * field.kind().arity();
        let stored = match &field {
            Field::ScalarInt(v) => v.len(),
            Field::ScalarReal(v) => v.len(),
            Field::VectorReal { values, .. } => values.len(),
        };
        if stored != expected {
            return Err(GridError::shape(format!(
                "{stored} stored values for {n_sites} sites of {}",
                field.kind()
            )));
        }
        Ok(Self {
            lattice: Lattice::new(shape, boundaries),
            field,
        })
    }

    /// Read a grid file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GridError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Decode a grid from a stream.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, GridError> {
        codec::read(reader)
    }

    /// Decode a grid and insist on its site type.
    pub fn from_reader_as<R: BufRead>(reader: R, expected: TypeTag) -> Result<Self, GridError> {
        let mut reader = reader;
        let header = codec::read_header(&mut reader)?;
        if header.tag != expected {
            return Err(GridError::TypeMismatch {
                expected: expected.to_string(),
                found: header.tag.to_string(),
            });
        }
        codec::read_payload(reader, header)
    }

    /// Write the grid to a file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GridError> {
        let path = path.as_ref();
        let write_err = |source: std::io::Error| GridError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
        codec::write(self, &mut writer)
            .and_then(|()| Ok(writer.flush()?))
            .map_err(|e| match e {
                GridError::Io(source) => write_err(source),
                other => other,
            })
    }

    /// Encode the grid into a stream.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), GridError> {
        codec::write(self, writer)
    }

    /// Rebuild the geometry with new boundary tags; values are untouched.
    pub fn with_boundaries(self, boundaries: Vec<Boundary>) -> Result<Self, GridError> {
        Self::from_field(self.lattice.shape, boundaries, self.field)
    }

    pub fn get(&self, coord: &[isize]) -> Result<Site<'_>, GridError> {
        let i = self.lattice.flat_index(coord)?;
        Ok(self.field.site(i))
    }

    pub fn set(&mut self, coord: &[isize], value: Site<'_>) -> Result<(), GridError> {
        let i = self.lattice.flat_index(coord)?;
        match (&mut self.field, value) {
            (Field::ScalarInt(v), Site::Int(x)) => v[i] = x,
            (Field::ScalarReal(v), Site::Real(x)) => v[i] = x,
            (Field::VectorReal { arity, values }, Site::Vector(x)) if x.len() == *arity => {
                values[i * *arity..(i + 1) * *arity].copy_from_slice(x);
            }
            (field, value) => {
                return Err(GridError::TypeMismatch {
                    expected: field.kind().to_string(),
                    found: value.kind().to_string(),
                })
            }
        }
        Ok(())
    }

    /// Value at a flat row-major index.
    pub fn site(&self, flat_idx: usize) -> Site<'_> {
        self.field.site(flat_idx)
    }

    pub fn extents(&self) -> &[usize] {
        &self.lattice.shape
    }

    pub fn dimension(&self) -> usize {
        self.lattice.n_dims
    }

    pub fn n_sites(&self) -> usize {
        self.lattice.n_sites
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.lattice.boundaries
    }

    pub fn kind(&self) -> SiteKind {
        self.field.kind()
    }

    pub fn tag(&self) -> TypeTag {
        self.field.kind().tag()
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Grain ids of a `scalar:int` grid, one per site.
    pub fn ids_mut(&mut self) -> Option<&mut [i32]> {
        match &mut self.field {
            Field::ScalarInt(v) => Some(v.as_mut_slice()),
            _ => None,
        }
    }

    /// Spin components of a `vector:double` grid, `arity` per site.
    pub fn spins_mut(&mut self) -> Option<&mut [f64]> {
        match &mut self.field {
            Field::VectorReal { values, .. } => Some(values.as_mut_slice()),
            _ => None,
        }
    }
}
