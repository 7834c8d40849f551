use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    annotation::Annotation,
    result::{BirdError, BirdResult},
};

pub const STORE_VERSION: u32 = 1;

/// All annotations of a dataset keyed by image filename
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationStore {
    annotations: BTreeMap<String, Annotation>,
}

#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    version: u32,
    annotations: Vec<&'a Annotation>,
}
#[derive(Deserialize)]
struct StoreDocument {
    annotations: Vec<Annotation>,
}
#[derive(Deserialize)]
struct StoreVersion {
    version: u32,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }
    /// Later annotations of the same image replace earlier ones, the replaced one is returned.
    pub fn insert(&mut self, annotation: Annotation) -> Option<Annotation> {
        self.annotations
            .insert(annotation.image_id().to_string(), annotation)
    }
    pub fn get(&self, image_id: &str) -> Option<&Annotation> {
        self.annotations.get(image_id)
    }
    pub fn len(&self) -> usize {
        self.annotations.len()
    }
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
    /// Iterates sorted by image filename
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Annotation)> {
        self.annotations.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }

    pub fn to_json_string(&self) -> BirdResult<String> {
        let doc = StoreDocumentRef {
            version: STORE_VERSION,
            annotations: self.annotations.values().collect(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
    pub fn from_json_str(s: &str) -> BirdResult<Self> {
        let StoreVersion { version } = serde_json::from_str(s)?;
        if version != STORE_VERSION {
            return Err(BirdError::UnsupportedStoreVersion {
                found: version,
                expected: STORE_VERSION,
            });
        }
        let doc: StoreDocument = serde_json::from_str(s)?;
        let mut store = Self::new();
        for anno in doc.annotations {
            store.insert(anno);
        }
        Ok(store)
    }
    pub fn save(&self, path: &Path) -> BirdResult<()> {
        let s = self.to_json_string()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(s.as_bytes())?;
        writer.flush()?;
        info!("saved {} annotations to {path:?}", self.len());
        Ok(())
    }
    pub fn load(path: &Path) -> BirdResult<Self> {
        let s = fs::read_to_string(path)?;
        let store = Self::from_json_str(&s)?;
        info!("loaded {} annotations from {path:?}", store.len());
        Ok(store)
    }
}

impl FromIterator<Annotation> for AnnotationStore {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        let mut store = Self::new();
        for anno in iter {
            store.insert(anno);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        annotation::pts, defer_file_removal, file_util::DEFAULT_TMPDIR, species::AbbrvTable,
    };

    fn make_store() -> AnnotationStore {
        let table = AbbrvTable::default();
        [
            Annotation::new(
                "BF045_x.jpg".to_string(),
                "present".to_string(),
                pts(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]),
                &table,
            )
            .unwrap(),
            Annotation::new(
                "AMAV123_foo.jpg".to_string(),
                "partial".to_string(),
                pts(&[(0.1, 0.1), (0.9, 0.1), (0.9, 0.7), (0.1, 0.7)]),
                &table,
            )
            .unwrap(),
            Annotation::inconclusive("WGR002.jpg".to_string(), &table).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_save_load() {
        let store = make_store();
        std::fs::create_dir_all(&*DEFAULT_TMPDIR).unwrap();
        let path = DEFAULT_TMPDIR.join("test_save_load.json");
        defer_file_removal!(&path);
        store.save(&path).unwrap();
        let loaded = AnnotationStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.len(), 3);
        let keys = loaded.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["AMAV123_foo.jpg", "BF045_x.jpg", "WGR002.jpg"]);
    }

    #[test]
    fn test_last_write_wins() {
        let table = AbbrvTable::default();
        let mut store = make_store();
        let inconclusive = Annotation::inconclusive("BF045_x.jpg".to_string(), &table).unwrap();
        let replaced = store.insert(inconclusive);
        assert_eq!(
            replaced.map(|a| a.label().to_string()),
            Some("present".to_string())
        );
        assert_eq!(store.len(), 3);
        assert!(store.get("BF045_x.jpg").unwrap().is_inconclusive());
    }

    #[test]
    fn test_document_layout() {
        let store = make_store();
        let s = store.to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&s).unwrap();
        assert_eq!(value["version"], STORE_VERSION);
        let first = &value["annotations"][0];
        assert_eq!(first["image_id"], "AMAV123_foo.jpg");
        assert_eq!(first["class_name"], "American_Avocet");
        assert_eq!(first["points"][0]["x"], 0.1);
        assert_eq!(value["annotations"][2]["label"], "inconclusive");
    }

    #[test]
    fn test_unsupported_version() {
        let s = r#"{"version": 0, "annotations": []}"#;
        assert!(matches!(
            AnnotationStore::from_json_str(s),
            Err(BirdError::UnsupportedStoreVersion {
                found: 0,
                expected: STORE_VERSION
            })
        ));
        let empty = AnnotationStore::from_json_str(r#"{"version": 1, "annotations": []}"#).unwrap();
        assert!(empty.is_empty());
        assert!(matches!(
            AnnotationStore::from_json_str("not json"),
            Err(BirdError::Json(_))
        ));
    }
}
