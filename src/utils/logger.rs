use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::errors::{AppError, AppResult};

/// Console logger plus a diagnostic file mirror: every `warn`/`error` record
/// is also appended, timestamped, to the error log file.
struct FileMirrorLogger {
    console: env_logger::Logger,
    file: Mutex<File>,
}

impl log::Log for FileMirrorLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console.enabled(metadata) || metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if record.level() <= log::Level::Warn {
            if let Ok(mut file) = self.file.lock() {
                let _ = writeln!(
                    file,
                    "{} [{}] {}: {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
        self.console.log(record);
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
        self.console.flush();
    }
}

/// Initializes logging: stderr console output configured through `RUST_LOG`
/// plus the error log file, which is truncated at every process start.
pub fn init_logger(error_log_path: &Path) -> AppResult<()> {
    // Установка базового фильтра и переопределение через переменные окружения
    let env = Env::default().filter_or("RUST_LOG", "warn,deep_narrator=info");

    let console = Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .build();

    let max_level = console.filter().max(LevelFilter::Warn);

    // Файл очищается при каждом запуске
    let file = File::create(error_log_path)?;

    log::set_boxed_logger(Box::new(FileMirrorLogger {
        console,
        file: Mutex::new(file),
    }))
    .map_err(|e| AppError::ConfigurationError(format!("Failed to install logger: {}", e)))?;
    log::set_max_level(max_level);

    Ok(())
}
