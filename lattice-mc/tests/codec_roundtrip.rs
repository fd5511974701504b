use std::io::Cursor;

use lattice_mc::codec;
use lattice_mc::{Boundary, Field, Grid, GridError, Site, SiteKind, TypeTag};
use proptest::prelude::*;

fn encode(grid: &Grid) -> Vec<u8> {
    let mut buf = Vec::new();
    grid.write_to(&mut buf).unwrap();
    buf
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    let shape = prop::collection::vec(1usize..6, 1..=3);
    let kind = prop_oneof![
        Just(SiteKind::ScalarInt),
        Just(SiteKind::ScalarReal),
        (1usize..5).prop_map(|arity| SiteKind::Vector { arity }),
    ];
    (shape, kind).prop_flat_map(|(shape, kind)| {
        let n_sites: usize = shape.iter().product();
        let field = match kind {
            SiteKind::ScalarInt => prop::collection::vec(any::<i32>(), n_sites)
                .prop_map(Field::ScalarInt)
                .boxed(),
            SiteKind::ScalarReal => prop::collection::vec(-1e6f64..1e6, n_sites)
                .prop_map(Field::ScalarReal)
                .boxed(),
            SiteKind::Vector { arity } => prop::collection::vec(-1.0f64..1.0, n_sites * arity)
                .prop_map(move |values| Field::VectorReal { arity, values })
                .boxed(),
        };
        field.prop_map(move |field| {
            let boundaries = vec![Boundary::Periodic; shape.len()];
            Grid::from_field(shape.clone(), boundaries, field).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_grid(grid in arb_grid()) {
        let bytes = encode(&grid);
        let back = codec::read(Cursor::new(&bytes)).unwrap();
        prop_assert_eq!(back.extents(), grid.extents());
        prop_assert_eq!(back.field(), grid.field());
        prop_assert_eq!(encode(&back), bytes);
    }
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grains.grid");

    let mut grid = Grid::periodic(vec![3, 2, 2], SiteKind::ScalarInt).unwrap();
    grid.set(&[2, 1, 0], Site::Int(-17)).unwrap();
    grid.save(&path).unwrap();

    let header = codec::peek_header(&path).unwrap();
    assert_eq!(header.tag, TypeTag::ScalarInt);
    assert_eq!(header.dimension, 3);
    assert_eq!(header.extents, vec![3, 2, 2]);

    let back = Grid::open(&path).unwrap();
    assert_eq!(back.get(&[2, 1, 0]).unwrap(), Site::Int(-17));
    assert_eq!(back.field(), grid.field());
}

#[test]
fn test_legacy_alias_rewritten_canonically() {
    let mut bytes = b"grid:int\n1\n2\n".to_vec();
    bytes.extend(7i32.to_le_bytes());
    bytes.extend(9i32.to_le_bytes());

    let grid = codec::read(Cursor::new(&bytes)).unwrap();
    assert_eq!(grid.tag(), TypeTag::ScalarInt);

    let out = encode(&grid);
    assert!(out.starts_with(b"grid:scalar:int\n1\n2\n"));
    assert_eq!(&out[out.len() - 8..], &bytes[bytes.len() - 8..]);
}

#[test]
fn test_notgrid_rejected_before_payload() {
    // payload would claim 4 GiB of sites if it were ever parsed
    let bytes = b"notgrid\n2\n65536 65536\n";
    let err = codec::read(Cursor::new(&bytes[..])).unwrap_err();
    assert!(matches!(err, GridError::Format(_)), "{err:?}");
}

#[test]
fn test_unknown_tag_is_unsupported() {
    let bytes = b"grid:complex\n1\n1\n\0\0\0\0";
    let err = codec::read(Cursor::new(&bytes[..])).unwrap_err();
    assert!(matches!(err, GridError::UnsupportedType(_)), "{err:?}");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Grid::open(dir.path().join("absent.grid")).unwrap_err();
    assert!(matches!(err, GridError::Open { .. }));
}
