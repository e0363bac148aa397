use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Routes log records to stdout and appends them to `log_path`. If the log
/// file cannot be opened the harness still logs to stdout.
pub fn init(verbose: bool, log_path: &Path) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let (target, open_error) = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => (Target::Pipe(Box::new(Tee::new(io::stdout(), file))), None),
        Err(err) => (Target::Stdout, Some(err)),
    };

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .target(target);

    if builder.try_init().is_err() {
        return;
    }

    if let Some(err) = open_error {
        log::warn!("Failed to open log file `{}`: {err}", log_path.display());
    }
}

/// Writes every buffer to both sinks.
struct Tee<A, B> {
    console: A,
    file: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    fn new(console: A, file: B) -> Self {
        Self { console, file }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        self.file.flush()
    }
}
