#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod annotation;
pub mod cfg;
pub mod file_util;
mod ingest;
mod render;
pub mod result;
mod species;
mod stats;
mod store;
pub mod tracing_setup;
pub mod util;
pub use annotation::{Annotation, INCONCLUSIVE};
pub use birdpoly_domain::{Polygon, PtF, PtI, ShapeI};
pub use cfg::{get_cfg_path, get_default_cfg, Cfg, CsvCfg, RenderCfg};
pub use ingest::{read_annotations, read_csv};
pub use render::{default_font, draw_overlay, drawable_annotation, load_font, render_overlay};
pub use result::{to_bird, trace_ok_err, trace_ok_warn, BirdError, BirdResult};
pub use species::{AbbrvTable, Species};
pub use stats::{stats, AreaStats, LabelCount, Stats};
pub use store::{AnnotationStore, STORE_VERSION};

use std::path::PathBuf;

pub fn get_test_folder() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/test_data")
}
