//! Logging setup
//!
//! Native: env_logger, `info` by default, `RUST_LOG` overrides.
//! WASM: forwards `log` records to macroquad's console logging.

/// Initialize the logging system. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, LevelFilter, Log, Metadata, Record};

    pub struct ConsoleLogger;

    pub static LOGGER: ConsoleLogger = ConsoleLogger;
    pub const MAX_LEVEL: LevelFilter = LevelFilter::Info;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= MAX_LEVEL
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = format!("[{}] {}", record.target(), record.args());
            match record.level() {
                Level::Error => macroquad::logging::error!("{}", line),
                Level::Warn => macroquad::logging::warn!("{}", line),
                Level::Info => macroquad::logging::info!("{}", line),
                Level::Debug | Level::Trace => macroquad::logging::debug!("{}", line),
            }
        }

        fn flush(&self) {}
    }
}

#[cfg(target_arch = "wasm32")]
pub fn init() {
    if log::set_logger(&console::LOGGER).is_ok() {
        log::set_max_level(console::MAX_LEVEL);
    }
}
