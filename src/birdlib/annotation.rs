use birdpoly_domain::{Polygon, PtF, TPtF};
use serde::{Deserialize, Serialize};

use crate::{
    result::{BirdError, BirdResult},
    species::AbbrvTable,
};

pub const INCONCLUSIVE: &str = "inconclusive";

/// One polygon drawn by the crowd on one image.
///
/// Class name and area are derived once in [`Annotation::new`] and never change afterwards,
/// hence the private fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Annotation {
    image_id: String,
    label: String,
    /// normalized to `[0, 1]` relative to the image shape
    points: Vec<PtF>,
    class_name: String,
    area: TPtF,
}
impl Annotation {
    pub fn new(
        image_id: String,
        label: String,
        points: Vec<PtF>,
        abbrv_table: &AbbrvTable,
    ) -> BirdResult<Self> {
        let class_name = abbrv_table.class_name(&image_id)?;
        let (points, area) = if label == INCONCLUSIVE {
            (vec![], 0.0)
        } else {
            let n_points = points.len();
            let area = Polygon::from_vec(points.clone())
                .ok_or_else(|| BirdError::DegeneratePolygon {
                    image_id: image_id.clone(),
                    n_points,
                })?
                .area();
            (points, area)
        };
        Ok(Self {
            image_id,
            label,
            points,
            class_name,
            area,
        })
    }
    pub fn inconclusive(image_id: String, abbrv_table: &AbbrvTable) -> BirdResult<Self> {
        Self::new(image_id, INCONCLUSIVE.to_string(), vec![], abbrv_table)
    }
    pub fn image_id(&self) -> &str {
        &self.image_id
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn points(&self) -> &[PtF] {
        &self.points
    }
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
    pub fn area(&self) -> TPtF {
        self.area
    }
    pub fn is_inconclusive(&self) -> bool {
        self.label == INCONCLUSIVE
    }
    /// The polygon of a conclusive annotation, `None` for inconclusive ones.
    pub fn polygon(&self) -> Option<Polygon> {
        if self.is_inconclusive() {
            None
        } else {
            Polygon::from_vec(self.points.clone())
        }
    }
}

#[cfg(test)]
pub(crate) fn pts(coords: &[(f64, f64)]) -> Vec<PtF> {
    coords.iter().map(|c| PtF::from(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdpoly_domain::floats_close;

    #[test]
    fn test_square() {
        let table = AbbrvTable::default();
        let square = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let anno = Annotation::new(
            "AMAV123_foo.jpg".to_string(),
            "present".to_string(),
            square,
            &table,
        )
        .unwrap();
        assert!(floats_close(anno.area(), 1.0));
        assert_eq!(anno.class_name(), "American_Avocet");
        assert_eq!(anno.label(), "present");
        assert!(!anno.is_inconclusive());
        assert!(anno.polygon().is_some());
    }

    #[test]
    fn test_inconclusive_has_no_area() {
        let table = AbbrvTable::default();
        let anno = Annotation::inconclusive("PW001.jpg".to_string(), &table).unwrap();
        assert_eq!(anno.area(), 0.0);
        assert!(anno.points().is_empty());
        assert!(anno.polygon().is_none());
        assert_eq!(anno.class_name(), "Prothonotary_Warbler");

        // points of inconclusive annotations are ignored
        let square = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let anno = Annotation::new(
            "PW001.jpg".to_string(),
            INCONCLUSIVE.to_string(),
            square,
            &table,
        )
        .unwrap();
        assert_eq!(anno.area(), 0.0);
        assert!(anno.points().is_empty());
        assert!(anno.is_inconclusive());
    }

    #[test]
    fn test_construction_errors() {
        let table = AbbrvTable::default();
        let triangle = pts(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]);
        assert!(matches!(
            Annotation::new(
                "ZZZZ123.jpg".to_string(),
                "present".to_string(),
                triangle.clone(),
                &table
            ),
            Err(BirdError::UnknownAbbreviation { .. })
        ));
        assert!(matches!(
            Annotation::new(
                "bird.jpg".to_string(),
                "present".to_string(),
                triangle,
                &table
            ),
            Err(BirdError::MalformedFilename { .. })
        ));
        assert!(matches!(
            Annotation::new(
                "BF045_x.jpg".to_string(),
                "present".to_string(),
                pts(&[(0.0, 0.0), (0.5, 0.5)]),
                &table
            ),
            Err(BirdError::DegeneratePolygon { n_points: 2, .. })
        ));
    }
}
