//! Browser console sink for the `log` facade.
//!
//! The library logs through `log::debug!`/`log::error!` like the server does;
//! in the browser nothing prints those until [`init`] installs a logger that
//! forwards each record to `console.*` via `gloo-console`.

use log::Record;

/// Text written to the console for one record: `[LEVEL target] message`.
pub fn render(record: &Record) -> String {
    format!("[{} {}] {}", record.level(), record.target(), record.args())
}

#[cfg(target_arch = "wasm32")]
mod console {
    use super::render;
    use log::{Level, LevelFilter, Log, Metadata, Record};

    struct ConsoleLogger {
        level: LevelFilter,
    }

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= self.level
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = render(record);
            match record.level() {
                Level::Error => gloo_console::error!(line),
                Level::Warn => gloo_console::warn!(line),
                Level::Info => gloo_console::info!(line),
                Level::Debug | Level::Trace => gloo_console::debug!(line),
            }
        }

        fn flush(&self) {}
    }

    /// Installs the console logger. Calling it twice is harmless.
    pub fn init(level: LevelFilter) {
        let logger = Box::new(ConsoleLogger { level });
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use console::init;
