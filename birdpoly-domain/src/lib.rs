mod core;
mod polygon;
pub use core::{floats_close, Calc, Point, PtF, PtI, Shape, ShapeF, ShapeI, TPtF, TPtI};
pub use polygon::Polygon;

pub fn make_test_polygons() -> Vec<Polygon> {
    let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    let triangle = vec![(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)];
    let bowtie = vec![(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)];
    [square, triangle, bowtie]
        .into_iter()
        .map(|pts| Polygon::from_vec(pts.into_iter().map(PtF::from).collect()).unwrap())
        .collect()
}

#[test]
fn test_area() {
    let polys = make_test_polygons();
    assert!(floats_close(polys[0].area(), 1.0));
    assert!(floats_close(polys[1].area(), 0.125));
    // the two lobes of the bow tie cancel out
    assert!(floats_close(polys[2].area(), 0.0));
}

#[test]
fn test_orientation() {
    let ccw = make_test_polygons().remove(0);
    let cw = Polygon::from_vec(ccw.points().iter().rev().copied().collect()).unwrap();
    assert!(floats_close(ccw.signed_area(), 1.0));
    assert!(floats_close(cw.signed_area(), -1.0));
    assert!(floats_close(cw.area(), ccw.area()));
}

#[test]
fn test_too_few_points() {
    assert!(Polygon::from_vec(vec![]).is_none());
    let two = vec![PtF { x: 0.0, y: 0.0 }, PtF { x: 1.0, y: 1.0 }];
    assert_eq!(Polygon::try_from(two), Err(2));
}

#[test]
fn test_to_pixels() {
    let triangle = make_test_polygons().remove(1);
    let pixels = triangle.to_pixels(ShapeI::new(100, 50));
    assert_eq!(
        pixels,
        vec![
            PtI { x: 0, y: 0 },
            PtI { x: 50, y: 0 },
            PtI { x: 50, y: 25 }
        ]
    );
}
