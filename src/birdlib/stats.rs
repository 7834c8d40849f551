use std::{collections::BTreeMap, fmt::Display};

use birdpoly_domain::TPtF;

use crate::store::AnnotationStore;

#[derive(Clone, Debug, PartialEq)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
    /// share of all annotations in the store
    pub frac: f64,
}

/// Mean and population standard deviation of the areas of conclusive annotations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaStats {
    pub n: usize,
    pub mean: TPtF,
    pub std: TPtF,
}
impl AreaStats {
    pub fn from_areas(areas: &[TPtF]) -> Option<Self> {
        if areas.is_empty() {
            return None;
        }
        let n = areas.len();
        let mean = areas.iter().sum::<TPtF>() / n as TPtF;
        let var = areas.iter().map(|a| (a - mean) * (a - mean)).sum::<TPtF>() / n as TPtF;
        Some(Self {
            n,
            mean,
            std: var.sqrt(),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub n_total: usize,
    /// sorted by label
    pub label_counts: Vec<LabelCount>,
    /// `None` if all annotations are inconclusive
    pub area: Option<AreaStats>,
}

/// # Panics
/// If the label counts do not add up to the number of annotations, which would be a bug.
pub fn stats(store: &AnnotationStore) -> Stats {
    let mut counter: BTreeMap<&str, usize> = BTreeMap::new();
    for anno in store.annotations() {
        *counter.entry(anno.label()).or_default() += 1;
    }
    let n_total = store.len();
    assert_eq!(counter.values().sum::<usize>(), n_total);
    let label_counts = counter
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
            frac: count as f64 / n_total as f64,
        })
        .collect();
    let areas = store
        .annotations()
        .filter(|anno| !anno.is_inconclusive())
        .map(|anno| anno.area())
        .collect::<Vec<_>>();
    Stats {
        n_total,
        label_counts,
        area: AreaStats::from_areas(&areas),
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "STATS:")?;
        writeln!(f, "Label Counts Frac")?;
        for lc in &self.label_counts {
            writeln!(f, "{:<20}: {:03} {:.2}", lc.label, lc.count, lc.frac)?;
        }
        writeln!(f, "Area Stats:")?;
        match &self.area {
            Some(area) => write!(f, "mean: {:.4} std: {:.4}", area.mean, area.std),
            None => write!(f, "no conclusive annotations"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        annotation::{pts, Annotation},
        species::AbbrvTable,
    };
    use birdpoly_domain::floats_close;

    fn make_store() -> AnnotationStore {
        let table = AbbrvTable::default();
        let square = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let half = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.5), (0.0, 0.5)]);
        let triangle = pts(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]);
        [
            Annotation::new("AMAV001.jpg".to_string(), "a".to_string(), square, &table),
            Annotation::new("AMAV002.jpg".to_string(), "a".to_string(), half, &table),
            Annotation::new("BF003.jpg".to_string(), "b".to_string(), triangle, &table),
            Annotation::inconclusive("PW004.jpg".to_string(), &table),
        ]
        .into_iter()
        .collect::<Result<AnnotationStore, _>>()
        .unwrap()
    }

    #[test]
    fn test_stats() {
        let s = stats(&make_store());
        assert_eq!(s.n_total, 4);
        let counts = s
            .label_counts
            .iter()
            .map(|lc| (lc.label.as_str(), lc.count))
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![("a", 2), ("b", 1), ("inconclusive", 1)]);
        assert_eq!(s.label_counts.iter().map(|lc| lc.count).sum::<usize>(), 4);
        assert!(floats_close(s.label_counts[0].frac, 0.5));
        let area = s.area.unwrap();
        // the inconclusive annotation does not contribute
        assert_eq!(area.n, 3);
        let mean = (1.0 + 0.5 + 0.125) / 3.0;
        assert!(floats_close(area.mean, mean));
        let var = ((1.0 - mean) * (1.0 - mean)
            + (0.5 - mean) * (0.5 - mean)
            + (0.125 - mean) * (0.125 - mean))
            / 3.0;
        assert!(floats_close(area.std, f64::sqrt(var)));
    }

    #[test]
    fn test_display() {
        let s = stats(&make_store()).to_string();
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "STATS:");
        assert_eq!(lines[1], "Label Counts Frac");
        assert_eq!(lines[2], "a                   : 002 0.50");
        assert_eq!(lines[4], "inconclusive        : 001 0.25");
        assert_eq!(lines[5], "Area Stats:");
        assert!(lines[6].starts_with("mean: 0.5417 std: "));
    }

    #[test]
    fn test_only_inconclusive() {
        let table = AbbrvTable::default();
        let store: AnnotationStore = [Annotation::inconclusive("PW004.jpg".to_string(), &table)]
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        let s = stats(&store);
        assert_eq!(s.area, None);
        assert!(s.to_string().ends_with("no conclusive annotations"));
        assert!(stats(&AnnotationStore::new()).label_counts.is_empty());
    }
}
