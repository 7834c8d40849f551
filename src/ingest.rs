#![deny(clippy::all)]
#![forbid(unsafe_code)]

use birdlib::{
    read_csv, stats, tracing_setup, util::version_label, AnnotationStore, BirdResult, Cfg,
};
use clap::Parser;
use std::{
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    process,
};
use tracing::{error, info};

/// Parse polygon data from csv file
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Cli {
    /// path to csv file containing annotations
    #[arg(long)]
    csv_file: PathBuf,
    /// path where output will be saved
    #[arg(long)]
    output_file: PathBuf,
    /// print label counts and area statistics of the saved annotations
    #[arg(long)]
    stats: bool,
    /// toml configuration, defaults are used if omitted
    #[arg(long)]
    cfg_file: Option<PathBuf>,
}

fn run(cli: &Cli, cfg: &Cfg) -> BirdResult<()> {
    let abbrv_table = cfg.abbrv_table();
    let store = read_csv(&cli.csv_file, &cfg.csv, &abbrv_table)?;
    store.save(&cli.output_file)?;
    if cli.stats {
        let store = AnnotationStore::load(&cli.output_file)?;
        println!("{}", stats(&store));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let cfg = Cfg::read(cli.cfg_file.as_deref());
    let log_folder = cfg.as_ref().ok().and_then(|cfg| cfg.log.folder.clone());
    let _guard_flush_to_logfile = tracing_setup::tracing_setup(log_folder.as_deref());
    info!("bird-ingest {}", version_label());
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
