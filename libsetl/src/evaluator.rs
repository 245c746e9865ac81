//! Gateway to the external evaluator process
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// Something that runs complete programs.
///
/// Output written to the error stream means the program was rejected, and is reported as
/// [`Error::Evaluation`] regardless of how the evaluator exits.
#[allow(async_fn_in_trait)]
pub trait Evaluator {
    /// Run `program`, returning its standard output
    async fn evaluate(&self, program: &str) -> Result<String>;
}

/// How program text reaches the evaluator process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// As the final command line argument
    #[default]
    Argument,
    /// Written to standard input, which is then closed
    Stdin,
}

/// Evaluator backed by an external executable, launched once per evaluation
#[derive(Debug, Clone)]
pub struct ProcessEvaluator {
    program: PathBuf,
    args: Vec<OsString>,
    transport: Transport,
}

impl ProcessEvaluator {
    /// Evaluator running `program`, e.g. `setl`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            transport: Transport::default(),
        }
    }

    /// Add an argument passed ahead of the program text
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set how program text is handed to the process
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Path of the evaluator executable
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Version banner reported by `<program> --version`
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.launch_error(e))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn launch_error(&self, e: std::io::Error) -> Error {
        debug!("failed to start {} - {e}", self.program.display());
        Error::Launch(format!("{} - {e}", self.program.display()))
    }
}

impl Evaluator for ProcessEvaluator {
    async fn evaluate(&self, program: &str) -> Result<String> {
        debug!(
            "evaluate {} {:?} via {:?} - {} bytes",
            self.program.display(),
            self.args,
            self.transport,
            program.len()
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        match self.transport {
            Transport::Argument => cmd.arg(program).stdin(Stdio::null()),
            Transport::Stdin => cmd.stdin(Stdio::piped()),
        };

        let mut child = cmd.spawn().map_err(|e| self.launch_error(e))?;
        let output = match child.stdin.take() {
            Some(mut stdin) => {
                let feed = async move {
                    let res = stdin.write_all(program.as_bytes()).await;
                    drop(stdin);
                    res
                };
                let (fed, output) = tokio::join!(feed, child.wait_with_output());
                if let Err(e) = fed {
                    // Evaluator may exit before reading everything, stderr has the reason
                    debug!("writing program to evaluator stdin failed - {e}");
                }
                output?
            }
            None => child.wait_with_output().await?,
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            debug!("evaluator rejected program - {}", output.status);
            return Err(Error::Evaluation(stderr.into_owned()));
        }
        debug!("evaluator finished - {}", output.status);
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Locate `program` the way a shell would, searching `PATH` for bare names
pub fn resolve(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable(program).then(|| program.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[cfg(unix)]
    #[tokio::test]
    #[traced_test]
    async fn logs_rejection() {
        let sh = ProcessEvaluator::new("sh").arg("-c").arg("echo nope >&2");
        assert!(sh.evaluate("x;").await.is_err());
        assert!(logs_contain("evaluator rejected program"));
    }

    #[tokio::test]
    #[traced_test]
    async fn launch_failure_logged_below_error() {
        let missing = ProcessEvaluator::new("surely-no-such-evaluator-xyz");
        assert!(missing.evaluate("x;").await.is_err());
        assert!(logs_contain("failed to start"));
        logs_assert(|lines: &[&str]| {
            match lines.iter().find(|line| line.contains("ERROR") || line.contains("WARN")) {
                Some(line) => Err(format!("launch failure logged loudly - {line}")),
                None => Ok(()),
            }
        });
    }

    #[cfg(unix)]
    #[test]
    fn resolve_bare_name() {
        let sh = resolve(Path::new("sh")).expect("sh should be on PATH");
        assert!(sh.is_absolute());
        assert!(sh.ends_with("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_path() {
        let sh = resolve(Path::new("sh")).unwrap();
        assert_eq!(resolve(&sh), Some(sh));
    }

    #[test]
    fn resolve_missing() {
        assert_eq!(resolve(Path::new("surely-no-such-evaluator-xyz")), None);
        assert_eq!(resolve(Path::new("/no/such/dir/setl")), None);
    }
}
