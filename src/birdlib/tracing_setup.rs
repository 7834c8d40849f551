use backtrace::Backtrace;
use std::{any::Any, cell::RefCell, io, ops::Deref, path::Path};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{writer::MakeWriterExt, Layer},
    prelude::*,
};

thread_local! {
    pub static BACKTRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

/// Logs to stdout and, if a folder is passed, additionally into daily rolling files in that
/// folder. The returned guard flushes the file log when dropped.
///
/// # Panics
/// In case tracing cannot be setup properly.
pub fn tracing_setup(log_folder: Option<&Path>) -> Option<WorkerGuard> {
    let (file_layer, guard_flush_file) = match log_folder {
        Some(log_folder) => {
            let file_appender = tracing_appender::rolling::daily(log_folder, "log");
            let (file_appender, guard) = tracing_appender::non_blocking(file_appender);
            let layer = Layer::new()
                .with_writer(file_appender.with_max_level(Level::INFO))
                .with_line_number(true)
                .compact()
                .with_ansi(false)
                .with_file(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    #[cfg(not(feature = "print_debug"))]
    let stdout = Layer::new()
        .with_writer(io::stdout.with_max_level(Level::INFO))
        .with_file(true)
        .with_line_number(true);
    #[cfg(feature = "print_debug")]
    let stdout = Layer::new()
        .with_writer(io::stdout.with_max_level(Level::DEBUG))
        .with_file(true)
        .with_line_number(true);
    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout)
        .init();
    std::panic::set_hook(Box::new(|_| {
        let trace = Backtrace::new();
        BACKTRACE.with(move |b| b.borrow_mut().replace(trace));
    }));
    guard_flush_file
}

use std::sync::Once;
static INIT: Once = Once::new();

pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// Logs the payload of a caught panic together with the backtrace recorded by the panic hook.
pub fn trace_panic(e: Box<dyn Any + Send>) {
    let panic_s = e
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| e.downcast_ref::<&'static str>().map(Deref::deref));
    tracing::error!("{:?}", panic_s);
    if let Some(b) = BACKTRACE.with(|b| b.borrow_mut().take()) {
        tracing::error!("{:?}", b);
    }
}
