//! Launch description for the child application.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where the child's stdout/stderr go
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChildOutput {
    /// Inherit the supervisor's streams
    #[default]
    Inherit,
    /// Append both streams to this file
    Append(PathBuf),
}

/// Program, arguments and environment for one child run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Executable to run (resolved through PATH if not absolute)
    pub program: PathBuf,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Working directory, defaults to the supervisor's
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
    /// Output handling
    pub output: ChildOutput,
}

impl LaunchSpec {
    /// Create a launch spec for the given program with no arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
            output: ChildOutput::Inherit,
        }
    }

    /// Add one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the working directory
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Append child output to a file instead of inheriting streams
    pub fn output_to(mut self, path: impl AsRef<Path>) -> Self {
        self.output = ChildOutput::Append(path.as_ref().to_path_buf());
        self
    }

    /// Program name used in logs and errors
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
