#![deny(clippy::all)]
#![forbid(unsafe_code)]

use birdlib::{
    render_overlay, tracing_setup, util::version_label, AnnotationStore, BirdResult, Cfg,
};
use clap::Parser;
use std::{
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    process,
};
use tracing::{error, info};

/// Annotate image with polygon
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Cli {
    /// path to image to be annotated
    #[arg(long)]
    img_file: PathBuf,
    /// path where output will be saved
    #[arg(long)]
    output_file: PathBuf,
    /// json file containing annotation data as written by bird-ingest
    #[arg(long)]
    ann_file: PathBuf,
    /// toml configuration, defaults are used if omitted
    #[arg(long)]
    cfg_file: Option<PathBuf>,
}

fn run(cli: &Cli, cfg: &Cfg) -> BirdResult<()> {
    let store = AnnotationStore::load(&cli.ann_file)?;
    render_overlay(&cli.img_file, &store, &cli.output_file, &cfg.render)
}

fn main() {
    let cli = Cli::parse();
    let cfg = Cfg::read(cli.cfg_file.as_deref());
    let log_folder = cfg.as_ref().ok().and_then(|cfg| cfg.log.folder.clone());
    let _guard_flush_to_logfile = tracing_setup::tracing_setup(log_folder.as_deref());
    info!("bird-render {}", version_label());
    match panic::catch_unwind(AssertUnwindSafe(|| cfg.and_then(|cfg| run(&cli, &cfg)))) {
        Ok(Ok(())) => (),
        Ok(Err(e)) => {
            error!("{e}");
            process::exit(1);
        }
        Err(e) => {
            tracing_setup::trace_panic(e);
            process::exit(1);
        }
    }
}
