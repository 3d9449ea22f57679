use crate::config::LoggingConfig;
use regex::Regex;
use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Rewrites every log line through the configured patterns before it
/// reaches stderr. Stdout is reserved for command output.
struct RedactingWriter<W> {
    inner: W,
    patterns: Vec<(Regex, String)>,
}

impl<W: io::Write> io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let mut redacted = s.to_string();
        for (re, replacement) in &self.patterns {
            redacted = re.replace_all(&redacted, replacement.as_str()).to_string();
        }
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter {
    patterns: Vec<(Regex, String)>,
}

impl<'a> fmt::MakeWriter<'a> for RedactingMakeWriter {
    type Writer = RedactingWriter<io::Stderr>;

    fn make_writer(&self) -> Self::Writer {
        RedactingWriter {
            inner: io::stderr(),
            patterns: self.patterns.clone(),
        }
    }
}

/// Most verbose level enabled in config; `verbose` forces debug.
fn level_from_config(config: &LoggingConfig) -> &'static str {
    if config.verbose {
        return "debug";
    }
    let levels = &config.levels;
    let mut level = "off";
    if levels.critical || levels.error {
        level = "error";
    }
    if levels.warning {
        level = "warn";
    }
    if levels.info {
        level = "info";
    }
    if levels.debug {
        level = "debug";
    }
    level
}

fn redaction_patterns(config: &LoggingConfig) -> Vec<(Regex, String)> {
    let mut patterns = Vec::new();
    if config.redaction.enabled {
        for p in &config.redaction.patterns {
            match Regex::new(&p.regex) {
                Ok(re) => patterns.push((re, p.placeholder.clone())),
                Err(e) => eprintln!("warning: skipping redaction pattern '{}': {}", p.name, e),
            }
        }
    }
    patterns
}

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    // RUST_LOG wins over the config levels
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_from_config(config)));

    let show_file = config.format.location.show_file;
    let show_line = config.format.location.show_line;
    let make_writer = RedactingMakeWriter {
        patterns: redaction_patterns(config),
    };

    // Use Layer::boxed() to unify the types of the branches
    let fmt_layer = match (config.format.json, config.format.show_time) {
        (true, _) => fmt::layer()
            .json()
            .with_writer(make_writer)
            .with_file(show_file)
            .with_line_number(show_line)
            .boxed(),
        (false, true) => fmt::layer()
            .with_writer(make_writer)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .boxed(),
        (false, false) => fmt::layer()
            .with_writer(make_writer)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .without_time()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;
    use std::io::Write;

    fn logging(levels: [bool; 5], verbose: bool) -> LoggingConfig {
        LoggingConfig {
            verbose,
            format: LoggingFormatConfig {
                show_time: false,
                json: false,
                location: LoggingLocationConfig {
                    show_file: false,
                    show_line: false,
                },
            },
            levels: LoggingLevelsConfig {
                debug: levels[0],
                info: levels[1],
                warning: levels[2],
                error: levels[3],
                critical: levels[4],
            },
            redaction: RedactionConfig {
                enabled: true,
                patterns: vec![RedactionPattern {
                    name: "deck_guid".into(),
                    regex: "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}".into(),
                    placeholder: "<deck-guid>".into(),
                }],
            },
        }
    }

    #[test]
    fn test_level_picks_most_verbose() {
        assert_eq!(level_from_config(&logging([false, false, true, true, true], false)), "warn");
        assert_eq!(level_from_config(&logging([true, false, false, false, false], false)), "debug");
        assert_eq!(level_from_config(&logging([false; 5], false)), "off");
        assert_eq!(level_from_config(&logging([false; 5], true)), "debug");
    }

    #[test]
    fn test_redacting_writer() {
        let mut w = RedactingWriter {
            inner: Vec::new(),
            patterns: redaction_patterns(&logging([false; 5], false)),
        };
        w.write_all(b"opened deck 3f2b6c1e-9a4d-4e8f-b1c2-0d9e8f7a6b5c\n").unwrap();
        assert_eq!(String::from_utf8(w.inner).unwrap(), "opened deck <deck-guid>\n");
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let mut cfg = logging([false; 5], false);
        cfg.redaction.patterns[0].regex = "([".into();
        assert!(redaction_patterns(&cfg).is_empty());
    }
}
