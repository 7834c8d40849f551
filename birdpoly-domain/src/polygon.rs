use serde::{Deserialize, Serialize};

use crate::core::{PtF, PtI, ShapeI, TPtF};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Polygon {
    points: Vec<PtF>, // should NEVER have less than 3 points, hence private!
}
impl Polygon {
    pub const MIN_POINTS: usize = 3;

    /// Returns `None` if there are not enough points to enclose an area.
    pub fn from_vec(points: Vec<PtF>) -> Option<Self> {
        if points.len() < Self::MIN_POINTS {
            None
        } else {
            Some(Self { points })
        }
    }
    pub fn points(&self) -> &[PtF] {
        &self.points
    }
    #[allow(clippy::needless_lifetimes)]
    pub fn points_iter<'a>(&'a self) -> impl Iterator<Item = PtF> + 'a + Clone {
        self.points.iter().copied()
    }
    /// Line segments including the one from the last back to the first point
    fn lineseg_iter<'a>(&'a self) -> impl Iterator<Item = (PtF, PtF)> + 'a {
        self.points.iter().enumerate().map(|(i, p1)| {
            let p2 = if i < self.points.len() - 1 {
                self.points[i + 1]
            } else {
                self.points[0]
            };
            (*p1, p2)
        })
    }
    /// Shoelace formula. Positive for counter-clockwise vertices in a y-up frame.
    pub fn signed_area(&self) -> TPtF {
        self.lineseg_iter()
            .map(|(p1, p2)| p1.cross(&p2))
            .sum::<TPtF>()
            * 0.5
    }
    /// Area enclosed by the polygon's boundary in the given vertex order. For self-intersecting
    /// polygons this is the absolute value of the shoelace sum and not the covered area.
    pub fn area(&self) -> TPtF {
        self.signed_area().abs()
    }
    /// Maps the normalized vertices onto the pixel grid of an image with the given shape
    pub fn to_pixels(&self, shape: ShapeI) -> Vec<PtI> {
        self.points_iter().map(|p| p.to_pixel(shape)).collect()
    }
}

impl TryFrom<Vec<PtF>> for Polygon {
    type Error = usize;
    /// Fails with the number of points if they are too few.
    fn try_from(points: Vec<PtF>) -> Result<Self, Self::Error> {
        let n = points.len();
        Self::from_vec(points).ok_or(n)
    }
}
