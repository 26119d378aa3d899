//! Writes statistics to a configured writer in the form `{PREFIX} {NAME}={VALUE}`.
//!
//! The destination is process-wide and can be configured once; before that, logging a statistic
//! does nothing.

use std::fmt::Arguments;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how statistic lines are written.
pub struct StatisticOptions {
    /// Starts every statistic line.
    prefix: &'static str,
    /// Written on its own line after a block of statistics.
    postfix: Option<&'static str>,
    /// Applied to the names of the statistics.
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

impl StatisticOptions {
    fn statistic_name(&self, name: impl Display) -> String {
        let name = name.to_string();
        match self.casing {
            Some(casing) => name.to_case(casing),
            None => name,
        }
    }

    fn write_line(&mut self, line: Arguments<'_>) {
        // Write failures are ignored.
        let _ = writeln!(self.writer, "{line}");
    }
}

static DESTINATION: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Runs `action` on the configured destination, if there is one.
fn with_destination(action: impl FnOnce(&mut StatisticOptions)) {
    let Some(destination) = DESTINATION.get() else {
        return;
    };
    if let Ok(mut options) = destination.lock() {
        action(&mut options);
    }
}

/// Configures the logging of statistics; until this is called, statistics are not written.
///
/// Only the first configuration takes effect. Without a writer, stdout is used.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = DESTINATION.set(Mutex::new(StatisticOptions {
        prefix,
        postfix: after,
        casing,
        writer: writer.unwrap_or_else(|| Box::new(std::io::stdout())),
    }));
}

/// Logs the statistic `name` with `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_destination(|options| {
        let name = options.statistic_name(name);
        let prefix = options.prefix;
        options.write_line(format_args!("{prefix} {name}={value}"));
    });
}

/// Writes the closing line of a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    with_destination(|options| {
        if let Some(postfix) = options.postfix {
            options.write_line(format_args!("{postfix}"));
        }
    });
}

/// Returns whether statistic logging has been configured.
pub fn should_log_statistics() -> bool {
    DESTINATION.get().is_some()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct Lines(Arc<Mutex<Vec<u8>>>);

    impl Write for Lines {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("not poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn options(casing: Option<Case>, lines: &Lines) -> StatisticOptions {
        StatisticOptions {
            prefix: "%%",
            postfix: None,
            casing,
            writer: Box::new(lines.clone()),
        }
    }

    #[test]
    fn names_are_converted_to_the_configured_casing() {
        let lines = Lines::default();

        assert_eq!(
            "numSweepPasses",
            options(Some(Case::Camel), &lines).statistic_name("num_sweep_passes")
        );
        assert_eq!(
            "num_sweep_passes",
            options(None, &lines).statistic_name("num_sweep_passes")
        );
    }

    #[test]
    fn every_statistic_is_terminated_by_a_newline() {
        let lines = Lines::default();
        let mut options = options(None, &lines);

        let prefix = options.prefix;
        options.write_line(format_args!("{prefix} num_passes={}", 4));
        options.write_line(format_args!("{prefix} num_conflicts={}", 0));

        let contents = lines.0.lock().expect("not poisoned").clone();
        assert_eq!(
            "%% num_passes=4\n%% num_conflicts=0\n",
            String::from_utf8(contents).expect("valid utf-8")
        );
    }
}
