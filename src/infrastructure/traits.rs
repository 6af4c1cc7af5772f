//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Output;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command, feeding `stdin` and capturing stdout and stderr.
    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &str) -> io::Result<Output>;
}

/// Yes/no prompt before destructive operations.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &str) -> io::Result<Output> {
        use std::process::Stdio;

        let mut child = std::process::Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // The child is reaped even when feeding stdin fails.
        let written = match child.stdin.take() {
            Some(mut child_stdin) => child_stdin.write_all(stdin.as_bytes()),
            None => Ok(()),
        };
        let output = child.wait_with_output()?;
        written.map(|()| output)
    }
}

/// Prompts on stderr and reads the answer from stdin. Only `y`/`yes` confirm.
#[derive(Debug, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        let mut stderr = io::stderr();
        write!(stderr, "{question} [y/N] ")?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Answers every question with the same value (`--yes`, disabled confirmation).
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmer(pub bool);

impl Confirmer for FixedConfirmer {
    fn confirm(&self, _question: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn given_cat_when_running_with_stdin_then_echoes_input() {
        let output = RealCommandRunner
            .run_with_stdin("cat", &[], "fishbone")
            .unwrap();

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "fishbone");
    }

    #[test]
    fn given_child_ignoring_stdin_when_feeding_large_input_then_returns() {
        let input = "x".repeat(4 * 1024 * 1024);

        let result = RealCommandRunner.run_with_stdin("sh", &["-c", "exit 3"], &input);

        match result {
            Ok(output) => assert_eq!(output.status.code(), Some(3)),
            Err(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        }
    }
}
