//! Grid persistence: a three-line text header followed by a raw payload.
//!
//! ```text
//! grid:vector:double      type tag (legacy aliases: grid:int, grid:double)
//! 2                       dimension
//! 64 64                   extent along each axis
//! <payload>               little-endian values, row-major, last axis fastest
//! ```
//!
//! Scalar ints take 4 bytes, reals 8 bytes. Vector sites store all components
//! contiguously; the arity is not written and is recovered from the payload
//! length.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use crate::error::GridError;
use crate::geometry::Boundary;
use crate::grid::{Field, Grid, TypeTag, MAX_DIMENSION};

/// Longest header line accepted before the stream is declared malformed.
const MAX_HEADER_LINE: u64 = 4096;

/// Decoded header of a grid stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridHeader {
    pub tag: TypeTag,
    pub dimension: usize,
    pub extents: Vec<usize>,
}

impl GridHeader {
    pub fn n_sites(&self) -> Result<usize, GridError> {
        self.extents
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or_else(|| GridError::format(format!("extents {:?} overflow", self.extents)))
    }
}

fn read_header_line<R: BufRead>(reader: &mut R, what: &str) -> Result<String, GridError> {
    let mut raw = Vec::new();
    let n = reader
        .by_ref()
        .take(MAX_HEADER_LINE)
        .read_until(b'\n', &mut raw)?;
    if n == 0 {
        return Err(GridError::format(format!(
            "stream ends before the {what} line"
        )));
    }
    if raw.last() != Some(&b'\n') && n as u64 == MAX_HEADER_LINE {
        return Err(GridError::format(format!("{what} line is too long")));
    }
    let line = String::from_utf8(raw)
        .map_err(|_| GridError::format(format!("{what} line is not text")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse the three header lines, leaving the reader at the first payload byte.
///
/// The type line is checked first, so a stream that is not grid data is
/// rejected before anything else is read.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<GridHeader, GridError> {
    let line = match read_header_line(reader, "type") {
        Err(GridError::Format(_)) => return Err(GridError::not_grid_data()),
        line => line?,
    };
    let tag = TypeTag::try_from(line.as_str())?;

    let line = read_header_line(reader, "dimension")?;
    let dimension: usize = line
        .trim()
        .parse()
        .map_err(|_| GridError::format(format!("dimension '{}' is not an integer", line.trim())))?;
    if !(1..=MAX_DIMENSION).contains(&dimension) {
        return Err(GridError::format(format!(
            "dimension {dimension} is not in 1..={MAX_DIMENSION}"
        )));
    }

    let line = read_header_line(reader, "extent")?;
    let extents = line
        .split_whitespace()
        .map(|tok| match tok.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(GridError::format(format!(
                "extent '{tok}' is not a positive integer"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    if extents.len() != dimension {
        return Err(GridError::format(format!(
            "expected {dimension} extents, found {}",
            extents.len()
        )));
    }

    Ok(GridHeader {
        tag,
        dimension,
        extents,
    })
}

/// Read only the header of a grid file.
pub fn peek_header(path: impl AsRef<Path>) -> Result<GridHeader, GridError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GridError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_header(&mut BufReader::new(file))
}

fn le_f64(chunk: &[u8]) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(chunk);
    f64::from_le_bytes(b)
}

/// Decode the payload that follows `header`. The stream must end exactly
/// where the payload does.
pub fn read_payload<R: Read>(reader: R, header: GridHeader) -> Result<Grid, GridError> {
    let n_sites = header.n_sites()?;
    let width = header.tag.component_bytes();
    let site_bytes = n_sites
        .checked_mul(width)
        .ok_or_else(|| GridError::format("payload size overflows"))?;

    let mut bytes = Vec::new();
    let field = match header.tag {
        TypeTag::ScalarInt | TypeTag::ScalarReal => {
            // one byte of slack detects trailing data without reading it all
            reader
                .take(site_bytes as u64 + 1)
                .read_to_end(&mut bytes)?;
            if bytes.len() != site_bytes {
                let found = if bytes.len() > site_bytes { "more" } else { "fewer" };
                return Err(GridError::format(format!(
                    "payload has {found} than the {site_bytes} bytes {n_sites} sites require"
                )));
            }
            if header.tag == TypeTag::ScalarInt {
                Field::ScalarInt(
                    bytes
                        .chunks_exact(4)
                        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                        .collect(),
                )
            } else {
                Field::ScalarReal(bytes.chunks_exact(8).map(le_f64).collect())
            }
        }
        TypeTag::VectorReal => {
            let mut reader = reader;
            reader.read_to_end(&mut bytes)?;
            if bytes.is_empty() || bytes.len() % site_bytes != 0 {
                return Err(GridError::format(format!(
                    "payload holds {} bytes, not a positive multiple of {site_bytes}",
                    bytes.len()
                )));
            }
            Field::VectorReal {
                arity: bytes.len() / site_bytes,
                values: bytes.chunks_exact(8).map(le_f64).collect(),
            }
        }
    };

    let boundaries = vec![Boundary::Periodic; header.dimension];
    Grid::from_field(header.extents, boundaries, field)
}

/// Decode a complete grid stream. Boundaries are not persisted; every axis
/// of the result is periodic.
pub fn read<R: BufRead>(mut reader: R) -> Result<Grid, GridError> {
    let header = read_header(&mut reader)?;
    read_payload(reader, header)
}

/// Encode `grid`: canonical header, then the payload.
pub fn write<W: Write>(grid: &Grid, mut writer: W) -> Result<(), GridError> {
    writeln!(writer, "{}", grid.tag())?;
    writeln!(writer, "{}", grid.dimension())?;
    let extents: Vec<String> = grid.extents().iter().map(|n| n.to_string()).collect();
    writeln!(writer, "{}", extents.join(" "))?;

    let payload: Vec<u8> = match grid.field() {
        Field::ScalarInt(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        Field::ScalarReal(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        Field::VectorReal { values, .. } => values.iter().flat_map(|x| x.to_le_bytes()).collect(),
    };
    writer.write_all(&payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Site, SiteKind};

    fn encode(grid: &Grid) -> Vec<u8> {
        let mut buf = Vec::new();
        write(grid, &mut buf).unwrap();
        buf
    }

    fn stream(header: &str, payload: &[u8]) -> Vec<u8> {
        let mut buf = header.as_bytes().to_vec();
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn test_header_layout() {
        let mut grid = Grid::periodic(vec![2, 3], SiteKind::ScalarInt).unwrap();
        grid.set(&[0, 1], Site::Int(1)).unwrap();
        grid.set(&[1, 2], Site::Int(-2)).unwrap();
        let buf = encode(&grid);

        let header = b"grid:scalar:int\n2\n2 3\n";
        assert_eq!(&buf[..header.len()], header);
        let payload = &buf[header.len()..];
        assert_eq!(payload.len(), 6 * 4);
        // row-major, last axis fastest: (0,1) is index 1, (1,2) is index 5
        assert_eq!(&payload[4..8], &1i32.to_le_bytes());
        assert_eq!(&payload[20..24], &(-2i32).to_le_bytes());
    }

    #[test]
    fn test_vector_round_trip_recovers_arity() {
        let mut grid = Grid::periodic(vec![2, 2, 2], SiteKind::Vector { arity: 3 }).unwrap();
        grid.set(&[1, 0, 1], Site::Vector(&[0.5, -0.25, 1.0])).unwrap();
        let decoded = read(encode(&grid).as_slice()).unwrap();
        assert_eq!(decoded.kind(), SiteKind::Vector { arity: 3 });
        assert_eq!(decoded.extents(), grid.extents());
        assert_eq!(decoded.field(), grid.field());
    }

    #[test]
    fn test_legacy_alias_is_rewritten_canonically() {
        let payload: Vec<u8> = [3i32, 1, 4, 1].iter().flat_map(|x| x.to_le_bytes()).collect();
        let grid = read(stream("grid:int\n2\n2 2\n", &payload).as_slice()).unwrap();
        assert_eq!(grid.tag(), TypeTag::ScalarInt);
        assert_eq!(grid.get(&[1, 0]).unwrap(), Site::Int(4));
        assert!(encode(&grid).starts_with(b"grid:scalar:int\n"));
    }

    #[test]
    fn test_not_grid_data() {
        let err = read(&b"notgrid\n2\n4 4\n...."[..]).unwrap_err();
        assert!(matches!(err, GridError::Format(_)), "{err:?}");
        assert!(err.is_not_grid_data());

        assert!(read(&b""[..]).unwrap_err().is_not_grid_data());
        let err = read(&b"grid:scalar:int\n0\n\n"[..]).unwrap_err();
        assert!(!err.is_not_grid_data());
    }

    #[test]
    fn test_unknown_tag() {
        let err = read(&b"grid:vector:int\n2\n4 4\n"[..]).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedType(_)), "{err:?}");
    }

    #[test]
    fn test_bad_dimension_and_extents() {
        for header in [
            "grid:scalar:int\nx\n4 4\n",
            "grid:scalar:int\n0\n\n",
            "grid:scalar:int\n4\n2 2 2 2\n",
            "grid:scalar:int\n2\n4\n",
            "grid:scalar:int\n2\n4 0\n",
            "grid:scalar:int\n2\n4 -4\n",
            "grid:scalar:int\n2\n",
        ] {
            let err = read(header.as_bytes()).unwrap_err();
            assert!(matches!(err, GridError::Format(_)), "{header:?}: {err:?}");
        }
    }

    #[test]
    fn test_payload_size_must_match() {
        let short = stream("grid:scalar:double\n1\n3\n", &[0u8; 16]);
        assert!(matches!(read(short.as_slice()), Err(GridError::Format(_))));

        let long = stream("grid:scalar:double\n1\n3\n", &[0u8; 25]);
        assert!(matches!(read(long.as_slice()), Err(GridError::Format(_))));

        let ragged = stream("grid:vector:double\n1\n3\n", &[0u8; 3 * 8 + 8]);
        assert!(matches!(read(ragged.as_slice()), Err(GridError::Format(_))));

        let empty = stream("grid:vector:double\n1\n3\n", &[]);
        assert!(matches!(read(empty.as_slice()), Err(GridError::Format(_))));
    }

    #[test]
    fn test_crlf_header() {
        let payload: Vec<u8> = [1.5f64, 2.5].iter().flat_map(|x| x.to_le_bytes()).collect();
        let grid = read(stream("grid:double\r\n1\r\n2\r\n", &payload).as_slice()).unwrap();
        assert_eq!(grid.get(&[1]).unwrap(), Site::Real(2.5));
    }

    #[test]
    fn test_header_stops_at_payload() {
        let payload: Vec<u8> = [7i32].iter().flat_map(|x| x.to_le_bytes()).collect();
        let bytes = stream("grid:scalar:int\n1\n1\n", &payload);
        let mut reader = bytes.as_slice();
        let header = read_header(&mut reader).unwrap();
        assert_eq!(
            header,
            GridHeader {
                tag: TypeTag::ScalarInt,
                dimension: 1,
                extents: vec![1],
            }
        );
        assert_eq!(reader, &payload[..]);
    }

    #[test]
    fn test_from_reader_as_checks_tag() {
        let grid = Grid::periodic(vec![2], SiteKind::ScalarReal).unwrap();
        let bytes = encode(&grid);
        assert!(Grid::from_reader_as(bytes.as_slice(), TypeTag::ScalarReal).is_ok());
        assert!(matches!(
            Grid::from_reader_as(bytes.as_slice(), TypeTag::ScalarInt),
            Err(GridError::TypeMismatch { .. })
        ));
    }
}
