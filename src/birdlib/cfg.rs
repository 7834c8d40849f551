use crate::{
    file_util::DEFAULT_HOMEDIR,
    result::{trace_ok_warn, BirdError, BirdResult},
    species::AbbrvTable,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

const CFG_DEFAULT: &str = r#"
    [csv]
    image_column = 7
    annotation_column = 9
    [render]
    color = [255, 0, 0]
    title_height = 24
    # font_path =
    [log]
    # folder =
    "#;

/// Positions of the relevant columns in the crowd-sourcing export
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CsvCfg {
    pub image_column: usize,
    pub annotation_column: usize,
}
impl Default for CsvCfg {
    fn default() -> Self {
        Self {
            image_column: 7,
            annotation_column: 9,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RenderCfg {
    pub color: [u8; 3],
    /// height of the band above the image that carries the filename
    pub title_height: u32,
    /// TrueType font for the title, the bundled DejaVu Sans if not set
    pub font_path: Option<PathBuf>,
}
impl Default for RenderCfg {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            title_height: 24,
            font_path: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogCfg {
    pub folder: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Cfg {
    #[serde(default)]
    pub csv: CsvCfg,
    #[serde(default)]
    pub render: RenderCfg,
    #[serde(default)]
    pub log: LogCfg,
    /// replaces the built-in species table if present
    pub abbreviations: Option<BTreeMap<String, String>>,
}
impl Cfg {
    pub fn from_toml_str(s: &str) -> BirdResult<Self> {
        toml::from_str(s).map_err(BirdError::from)
    }
    fn read_file(path: &Path) -> BirdResult<Self> {
        info!("reading config from {path:?}");
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
    /// Reads the configuration from a toml file. Without a file, the user's config in the home
    /// folder is used if it exists and can be parsed, and the defaults otherwise.
    pub fn read(path: Option<&Path>) -> BirdResult<Self> {
        match path {
            Some(path) => Self::read_file(path),
            None => {
                let home_cfg = get_cfg_path();
                let cfg = if home_cfg.exists() {
                    trace_ok_warn(Self::read_file(&home_cfg))
                } else {
                    None
                };
                Ok(cfg.unwrap_or_else(get_default_cfg))
            }
        }
    }
    pub fn abbrv_table(&self) -> AbbrvTable {
        match &self.abbreviations {
            Some(abbreviations) => AbbrvTable::from_map(abbreviations.clone()),
            None => AbbrvTable::default(),
        }
    }
}

pub fn get_cfg_path() -> PathBuf {
    DEFAULT_HOMEDIR.join("birdpoly.toml")
}

pub fn get_default_cfg() -> Cfg {
    toml::from_str(CFG_DEFAULT).expect("default config broken")
}

#[test]
fn test_default_cfg() {
    let cfg = get_default_cfg();
    assert_eq!(cfg.csv, CsvCfg::default());
    assert_eq!(cfg.render, RenderCfg::default());
    assert_eq!(cfg.log.folder, None);
    assert_eq!(cfg, Cfg::default());
    assert_eq!(cfg.abbrv_table(), AbbrvTable::default());
}

#[test]
fn test_partial_cfg() {
    let cfg = Cfg::from_toml_str(
        r#"
        [csv]
        image_column = 0
        annotation_column = 1
        [abbreviations]
        ZZZZ = "Zebra_Finch"
        "#,
    )
    .unwrap();
    assert_eq!(cfg.csv.image_column, 0);
    assert_eq!(cfg.csv.annotation_column, 1);
    assert_eq!(cfg.render, RenderCfg::default());
    let table = cfg.abbrv_table();
    assert_eq!(table.lookup("ZZZZ"), Some("Zebra_Finch"));
    assert_eq!(table.lookup("AMAV"), None);
}

#[test]
fn test_render_font_only() {
    let cfg = Cfg::from_toml_str("[render]\nfont_path = \"fonts/DejaVuSans.ttf\"").unwrap();
    assert_eq!(cfg.render.color, [255, 0, 0]);
    assert_eq!(
        cfg.render.font_path,
        Some(PathBuf::from("fonts/DejaVuSans.ttf"))
    );
}

#[test]
fn test_broken_cfg() {
    assert!(matches!(
        Cfg::from_toml_str("[csv]\nimage_column = \"seven\""),
        Err(BirdError::Toml(_))
    ));
}

#[test]
fn test_read_cfg_file() {
    let cfg = Cfg::read(Some(&crate::get_test_folder().join("birdpoly.toml"))).unwrap();
    assert_eq!(cfg.render.color, [0, 255, 0]);
    assert_eq!(cfg.csv, CsvCfg::default());
    assert!(matches!(
        Cfg::read(Some(Path::new("does/not/exist.toml"))),
        Err(BirdError::Io(_))
    ));
    assert!(get_cfg_path().ends_with(".birdpoly/birdpoly.toml"));
}
