// Logging setup
//
// env_logger behind the `log` facade. Components log under their own target
// ("engine", "game", "renderer", "vulkan"), so `RUST_LOG=renderer=debug`
// narrows output to one of them.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

use crate::config::Config;

/// Copies everything written to stderr into a log file as well.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Parse a level name, falling back to `Info` for anything unknown.
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

/// Initialize logging with optional file output
pub fn init(config: &Config) {
    let mut builder = Builder::new();
    builder.filter_level(parse_level(&config.debug.log_level));
    // RUST_LOG still wins over the configured level
    builder.parse_default_env();

    if config.debug.log_to_file {
        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&config.debug.log_file)
        {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(Tee { file })));
            }
            Err(e) => eprintln!("Failed to open log file {}: {}", config.debug.log_file, e),
        }
    }

    // A logger may already be installed (tests, embedding); keep it.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }
}
