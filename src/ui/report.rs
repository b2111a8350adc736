//! Verbose and error reporting

use crate::executor::ExecutionEvent;
use crate::types::InstallError;
use console::style;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Program name used as the prefix of diagnostic lines
pub const PROGRAM: &str = "winstall";

/// `'source' -> 'destination'`, plus the backup name when one was made
pub fn format_installed(source: &Path, destination: &Path, backup: Option<&Path>) -> String {
    let mut line = format!("'{}' -> '{}'", source.display(), destination.display());
    if let Some(backup) = backup {
        line.push_str(&format!(" (backup: '{}')", backup.display()));
    }
    line
}

pub fn format_creating_directory(path: &Path) -> String {
    format!("{}: creating directory '{}'", PROGRAM, path.display())
}

pub fn format_error(error: &InstallError) -> String {
    format!("{}: {}", PROGRAM, error)
}

/// Writes execution events for the user.
///
/// Verbose lines go to `out`, failures to `err`. Both sinks sit behind a
/// mutex so a reporter can be shared with an execution callback.
pub struct Reporter {
    verbose: bool,
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    /// Reporter bound to stdout and stderr
    pub fn new(verbose: bool) -> Self {
        Self::with_writers(verbose, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(
        verbose: bool,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            verbose,
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// React to an execution event
    pub fn handle(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::CreatingDirectory { path } if self.verbose => {
                self.write_out(&format_creating_directory(path));
            }
            ExecutionEvent::Installed {
                source,
                destination,
                backup,
            } if self.verbose => {
                self.write_out(&format_installed(source, destination, backup.as_deref()));
            }
            ExecutionEvent::StepFailed { error } => self.error(error),
            _ => {}
        }
    }

    /// Report a failure
    pub fn error(&self, error: &InstallError) {
        let line = format_error(error);
        let prefix = format!("{}:", PROGRAM);
        let styled = line.replacen(
            &prefix,
            &style(&prefix).for_stderr().bold().to_string(),
            1,
        );
        self.write_err(&styled);
    }

    /// Report an error that stopped the run before any step executed
    pub fn fatal(&self, error: &InstallError) {
        self.error(error);
        if error.is_usage_error() {
            self.write_err(&format!(
                "Try '{} --help' for more information.",
                PROGRAM
            ));
        }
    }

    fn write_out(&self, line: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", line);
        }
    }

    fn write_err(&self, line: &str) {
        if let Ok(mut err) = self.err.lock() {
            let _ = writeln!(err, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            let bytes = self.0.lock().expect("lock buffer").clone();
            console::strip_ansi_codes(&String::from_utf8_lossy(&bytes)).to_string()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn reporter(verbose: bool) -> (Reporter, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let reporter =
            Reporter::with_writers(verbose, Box::new(out.clone()), Box::new(err.clone()));
        (reporter, out, err)
    }

    fn installed(backup: Option<&str>) -> ExecutionEvent {
        ExecutionEvent::Installed {
            source: PathBuf::from("a.txt"),
            destination: PathBuf::from("out/a.txt"),
            backup: backup.map(PathBuf::from),
        }
    }

    #[test]
    fn test_format_installed() {
        assert_eq!(
            format_installed(Path::new("a.txt"), Path::new("b.txt"), None),
            "'a.txt' -> 'b.txt'"
        );
        assert_eq!(
            format_installed(
                Path::new("a.txt"),
                Path::new("b.txt"),
                Some(Path::new("b.txt~"))
            ),
            "'a.txt' -> 'b.txt' (backup: 'b.txt~')"
        );
    }

    #[test]
    fn test_format_creating_directory() {
        assert_eq!(
            format_creating_directory(Path::new("x/y")),
            "winstall: creating directory 'x/y'"
        );
    }

    #[test]
    fn test_verbose_reports_copies_and_directories() {
        let (reporter, out, err) = reporter(true);

        reporter.handle(&ExecutionEvent::CreatingDirectory {
            path: PathBuf::from("out"),
        });
        reporter.handle(&installed(Some("out/a.txt.~1~")));

        assert_eq!(
            out.contents(),
            "winstall: creating directory 'out'\n\
             'a.txt' -> 'out/a.txt' (backup: 'out/a.txt.~1~')\n"
        );
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_quiet_reporter_only_prints_failures() {
        let (reporter, out, err) = reporter(false);

        reporter.handle(&installed(None));
        reporter.handle(&ExecutionEvent::StepFailed {
            error: InstallError::SourceNotFound {
                path: PathBuf::from("b.txt"),
            },
        });

        assert!(out.contents().is_empty());
        assert_eq!(
            err.contents(),
            "winstall: cannot stat 'b.txt': No such file or directory\n"
        );
    }

    #[test]
    fn test_fatal_usage_error_suggests_help() {
        let (reporter, _out, err) = reporter(false);

        reporter.fatal(&InstallError::Usage("missing file operand".to_string()));

        assert_eq!(
            err.contents(),
            "winstall: missing file operand\n\
             Try 'winstall --help' for more information.\n"
        );
    }

    #[test]
    fn test_fatal_planning_error_has_no_help_hint() {
        let (reporter, _out, err) = reporter(false);

        reporter.fatal(&InstallError::NoSuchDirectory {
            path: PathBuf::from("D"),
        });

        assert_eq!(
            err.contents(),
            "winstall: target directory 'D' does not exist\n"
        );
    }
}
