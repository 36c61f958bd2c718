use flexi_logger::{
    detailed_format, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};
use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "studyplan";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 5;

/// Log spec from `STUDYPLAN_LOG`, then `RUST_LOG`, then the build default
fn log_spec() -> String {
    let default_spec = if cfg!(debug_assertions) {
        "warn,studyplan=debug"
    } else {
        "warn,studyplan=info"
    };
    ["STUDYPLAN_LOG", "RUST_LOG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_spec.to_string())
}

/// Start file logging in the data directory.
///
/// The terminal belongs to the UI, so nothing is duplicated to stdout.
/// Keep the returned handle alive for the whole run.
pub fn init_logging(data_dir: &Path) -> Result<LoggerHandle, FlexiLoggerError> {
    std::fs::create_dir_all(data_dir)?;

    let handle = Logger::try_with_str(log_spec())?
        .log_to_file(
            FileSpec::default()
                .directory(data_dir)
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .start()?;

    install_panic_hook();

    log::info!(
        "logger initialized dir={} rotate_size_bytes={} keep_files={}",
        data_dir.display(),
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(handle)
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");
        let location = info
            .location()
            .map(|loc| loc.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        log::error!("panic: payload={} location={}", payload, location);
        default_hook(info);
    }));
}
