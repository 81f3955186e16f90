#![allow(clippy::unwrap_used)] // okay in tests

use vectorgrid_datatypes::assert_approx_eq;
use vectorgrid_datatypes::error::Error;
use vectorgrid_datatypes::grid::{EdgePolicy, GridBuilder, build_grid};
use vectorgrid_datatypes::primitives::{BoundingBox2D, Cell, CellSize, Coordinate2D};

/// The origins `min + i * size` up to and including the first one `>= max`
fn closed_range_origins(min: f64, max: f64, size: f64) -> Vec<f64> {
    let mut origins = vec![];
    let mut i = 0;
    loop {
        let origin = min + f64::from(i) * size;
        origins.push(origin);
        if origin >= max {
            return origins;
        }
        i += 1;
    }
}

const CASES: &[(f64, f64, f64, f64, f64)] = &[
    (0., 0., 10., 10., 5.),
    (0., 0., 10., 10., 4.),
    (0., 0., 10., 10., 20.),
    (-3., -2., 7., 1., 0.5),
    (100., 200., 101., 260., 7.),
    (-180., -90., 180., 90., 15.),
    (1.25, 1.25, 1.25, 9.75, 0.25),
    (0., 0., 0.2, 0.2, 0.1),
    (0., 0., 0.4, 0.4, 0.2),
    (0., 0., 1.1, 1.1, 0.01),
];

#[test]
fn cell_count_matches_closed_range_enumeration() {
    for &(xmin, ymin, xmax, ymax, size) in CASES {
        let grid = build_grid(xmin, ymin, xmax, ymax, size, "X").unwrap();

        let cols = closed_range_origins(xmin, xmax, size);
        let rows = closed_range_origins(ymin, ymax, size);
        let expected = (cols.len() - 1) * (rows.len() - 1);

        assert_eq!(grid.len(), expected, "case {xmin} {ymin} {xmax} {ymax} {size}");
        assert_eq!(grid.columns(), cols.len() - 1);
        assert_eq!(grid.rows(), rows.len() - 1);

        let first_column: Vec<f64> = grid
            .iter()
            .filter(|cell| cell.row() == 0)
            .map(|cell| cell.lower_left().x)
            .collect();
        assert_eq!(first_column, cols[..cols.len() - 1]);
    }
}

#[test]
fn cells_are_squares_of_the_cell_size() {
    for &(xmin, ymin, xmax, ymax, size) in CASES {
        let grid = build_grid(xmin, ymin, xmax, ymax, size, "X").unwrap();

        // `origin + size - origin` is not exactly `size` for sizes like 0.01
        for cell in &grid {
            assert_approx_eq!(&[cell.width(), cell.height()], &[size, size], "{cell:?}");
        }
    }
}

#[test]
fn cells_stay_within_the_extended_box() {
    for &(xmin, ymin, xmax, ymax, size) in CASES {
        let grid = build_grid(xmin, ymin, xmax, ymax, size, "X").unwrap();

        for cell in &grid {
            let ll = cell.lower_left();
            let ur = cell.upper_right();
            assert!(ll.x >= xmin && ll.y >= ymin);
            assert!(ur.x < xmax + size, "{cell:?}");
            assert!(ur.y < ymax + size, "{cell:?}");
        }
    }
}

#[test]
fn cells_do_not_overlap_and_share_edges() {
    let grid = build_grid(0., 0., 4., 3., 1., "X").unwrap();

    for (i, a) in grid.iter().enumerate() {
        for b in grid.iter().skip(i + 1) {
            let bounds_a = BoundingBox2D::new_unchecked(a.lower_left(), a.upper_right());
            let bounds_b = BoundingBox2D::new_unchecked(b.lower_left(), b.upper_right());
            assert!(!bounds_a.overlaps_bbox(&bounds_b));
        }
    }

    for pair in grid.cells().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.column() == b.column() {
            // vertical neighbors share the horizontal edge
            assert_eq!(a.corners()[3], b.corners()[0]);
            assert_eq!(a.corners()[2], b.corners()[1]);
        }
    }

    for cell in &grid {
        if let Some(right) = grid.cell(cell.column() + 1, cell.row()) {
            assert_eq!(cell.corners()[1], right.corners()[0]);
            assert_eq!(cell.corners()[2], right.corners()[3]);
        }
    }
}

#[test]
fn fractional_cell_sizes_stop_at_max() {
    let grid = build_grid(0., 0., 0.2, 0.2, 0.1, "X").unwrap();

    assert_eq!(grid.columns(), 2);
    assert_eq!(grid.rows(), 2);

    let grid = build_grid(0., 0., 1.1, 1.1, 0.01, "X").unwrap();

    assert_eq!(grid.columns(), 110);
    assert_eq!(grid.rows(), 110);
}

#[test]
fn five_unit_cells_on_a_ten_unit_square() {
    let grid = build_grid(0., 0., 10., 10., 5., "X").unwrap();

    assert_eq!(grid.len(), 4);
    assert_eq!(
        grid.cells()[0].corners(),
        [
            Coordinate2D::new(0., 0.),
            Coordinate2D::new(5., 0.),
            Coordinate2D::new(5., 5.),
            Coordinate2D::new(0., 5.),
        ]
    );
    assert_eq!(grid.cells()[3].upper_right(), Coordinate2D::new(10., 10.));
}

#[test]
fn four_unit_cells_on_a_ten_unit_square() {
    let grid = build_grid(0., 0., 10., 10., 4., "X").unwrap();

    let origins: Vec<Coordinate2D> = grid.iter().map(Cell::lower_left).collect();
    let mut expected = vec![];
    for x in [0., 4., 8.] {
        for y in [0., 4., 8.] {
            expected.push(Coordinate2D::new(x, y));
        }
    }

    assert_eq!(origins, expected);
}

#[test]
fn invalid_inputs() {
    assert!(matches!(
        build_grid(5., 5., 1., 1., 2., "X"),
        Err(Error::InvalidBoundingBox { .. })
    ));
    assert!(matches!(
        build_grid(0., 0., 10., 10., 0., "X"),
        Err(Error::InvalidCellSize { .. })
    ));
    assert!(matches!(
        build_grid(0., 0., 10., 10., -1., "X"),
        Err(Error::InvalidCellSize { .. })
    ));
    assert!(matches!(
        build_grid(f64::NAN, 0., 10., 10., 1., "X"),
        Err(Error::NonFiniteInput { name: "xmin", .. })
    ));
    assert!(matches!(
        GridBuilder::new()
            .with_max_cells(10_000)
            .build_from_extrema(0., 0., 10., 10., 1e-9, "X"),
        Err(Error::GridTooLarge { .. })
    ));
}

#[test]
fn identical_inputs_give_identical_grids() {
    let bbox = BoundingBox2D::from_extrema(-0.3, 0.1, 2.9, 7.7).unwrap();
    let size = CellSize::new(0.3).unwrap();

    let a = GridBuilder::new().build(bbox, size, "X").unwrap();
    let b = GridBuilder::new().build(bbox, size, "X").unwrap();

    assert_eq!(a, b);
}

#[test]
fn cover_contains_every_point_of_the_box() {
    let points = [
        Coordinate2D::new(0.3, 0.2),
        Coordinate2D::new(9.9, 4.1),
        Coordinate2D::new(5.0, 0.2),
        Coordinate2D::new(7.2, 3.3),
    ];
    let bbox = BoundingBox2D::from_coord_iter(points).unwrap();

    let grid = GridBuilder::new()
        .with_edge_policy(EdgePolicy::Cover)
        .build(bbox, CellSize::new(1.5).unwrap(), "X")
        .unwrap();

    let corners = [
        bbox.lower_left(),
        bbox.lower_right(),
        bbox.upper_left(),
        bbox.upper_right(),
    ];

    for point in points.iter().chain(corners.iter()) {
        let bounds_contain = grid.iter().any(|cell| {
            BoundingBox2D::new_unchecked(cell.lower_left(), cell.upper_right())
                .contains_coordinate(point)
        });
        assert!(bounds_contain, "{point} is not covered");
    }
}
