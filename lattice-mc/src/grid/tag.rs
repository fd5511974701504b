use std::fmt;

use crate::error::GridError;

/// Header token identifying the site value type of a serialized grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `grid:scalar:int` (legacy `grid:int`), 4-byte grain ids.
    ScalarInt,
    /// `grid:scalar:double` (legacy `grid:double`), 8-byte reals.
    ScalarReal,
    /// `grid:vector:double`, `arity` 8-byte reals per site.
    VectorReal,
}

impl TypeTag {
    /// Every tag, in header-documentation order.
    pub const ALL: [TypeTag; 3] = [Self::ScalarInt, Self::ScalarReal, Self::VectorReal];

    /// Canonical header line (without the trailing newline).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScalarInt => "grid:scalar:int",
            Self::ScalarReal => "grid:scalar:double",
            Self::VectorReal => "grid:vector:double",
        }
    }

    /// Size in bytes of one stored component.
    pub const fn component_bytes(self) -> usize {
        match self {
            Self::ScalarInt => 4,
            Self::ScalarReal | Self::VectorReal => 8,
        }
    }
}

impl TryFrom<&str> for TypeTag {
    type Error = GridError;

    /// Parse the first header line.
    ///
    /// A line without the `grid` prefix is not grid data at all (`Format`);
    /// a `grid...` line naming anything else is a model this crate does not
    /// implement (`UnsupportedType`).
    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.starts_with("grid") {
            return Err(GridError::not_grid_data());
        }
        match line {
            "grid:scalar:int" | "grid:int" => Ok(Self::ScalarInt),
            "grid:scalar:double" | "grid:double" => Ok(Self::ScalarReal),
            "grid:vector:double" => Ok(Self::VectorReal),
            other => Err(GridError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
