//! Hand-off to the system C compiler and to the produced program.

use crate::error::{TranspileError, TranspileResult};

use log::{info, warn};
use which::which;

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toolchain {
    Gcc,
    Clang,
    Msvc,
    /// Any other `cc`-compatible driver.
    Other(String),
}

impl Toolchain {
    pub const fn is_msvc(&self) -> bool {
        matches!(self, Toolchain::Msvc)
    }
}

/// A C compiler found on this machine.
#[derive(Debug, Clone)]
pub struct CCompiler {
    pub toolchain: Toolchain,
    pub path: PathBuf,
}

/// What to do once the translation unit is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Stop after writing the translation unit.
    pub compile_only: bool,
    /// Run the binary after a successful compile.
    pub run: bool,
    /// Remove the binary after running it.
    pub delete_after_run: bool,
}

/// How far the build went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Only the translation unit was written.
    Translated,
    Compiled(PathBuf),
    /// The binary ran and exited with this code.
    Ran(i32),
}

/// Finds a C compiler: `$CC` first, then the usual names on `PATH`.
pub fn get_system_compiler() -> Option<CCompiler> {
    if let Ok(env_cc) = env::var("CC")
        && let Ok(path) = which(&env_cc)
    {
        return Some(CCompiler {
            toolchain: detect_toolchain(&path),
            path,
        });
    }

    for name in ["gcc", "clang", "cl", "cc"] {
        if let Ok(path) = which(name) {
            return Some(CCompiler {
                toolchain: detect_toolchain(&path),
                path,
            });
        }
    }
    None
}

fn detect_toolchain(path: &Path) -> Toolchain {
    let exe = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    if exe.contains("gcc") {
        Toolchain::Gcc
    } else if exe.contains("clang") {
        Toolchain::Clang
    } else if exe == "cl" {
        Toolchain::Msvc
    } else {
        Toolchain::Other(exe)
    }
}

/// The binary built from `source`: same directory, no extension, plus the
/// host's executable suffix.
pub fn binary_path(source: &Path) -> PathBuf {
    source.with_extension(env::consts::EXE_EXTENSION)
}

impl CCompiler {
    pub fn command(&self, unit: &Path, binary: &Path) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.arg(unit);
        if self.toolchain.is_msvc() {
            cmd.arg(format!("/Fe:{}", binary.display()));
        } else {
            cmd.arg("-o").arg(binary);
        }
        cmd
    }

    pub fn compile(&self, unit: &Path, binary: &Path) -> TranspileResult<()> {
        info!(
            "compiling {} with {:?} ({})",
            unit.display(),
            self.toolchain,
            self.path.display()
        );

        let output = self
            .command(unit, binary)
            .output()
            .map_err(|source| TranspileError::Launch {
                program: self.path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TranspileError::CCompileError(output.stderr));
        }
        Ok(())
    }
}

/// Runs `binary` to completion and returns its exit code.
///
/// A program stopped by `SIGINT` is reported as [`TranspileError::Interrupted`];
/// any other signal (a crash, say) is [`TranspileError::ProgramKilled`].
pub fn run(binary: &Path) -> TranspileResult<i32> {
    let program = runnable(binary);
    info!("running {}", program.display());

    let status = Command::new(&program)
        .status()
        .map_err(|source| TranspileError::Launch {
            program: program.clone(),
            source,
        })?;

    status.code().ok_or_else(|| killed(signal(&status)))
}

#[cfg(unix)]
fn signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal(_status: &ExitStatus) -> Option<i32> {
    None
}

const SIGINT: i32 = 2;

fn killed(signal: Option<i32>) -> TranspileError {
    match signal {
        Some(SIGINT) => TranspileError::Interrupted,
        other => TranspileError::ProgramKilled(other),
    }
}

/// A bare file name would be looked up on `PATH`; anchor it to the current
/// directory instead.
fn runnable(binary: &Path) -> PathBuf {
    match binary.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => binary.to_path_buf(),
        _ => Path::new(".").join(binary),
    }
}

/// Deletes a generated file if present. Failure is only a warning; returns
/// whether nothing is left at `path`.
pub fn remove_artifact(path: &Path, what: &str) -> bool {
    if !path.exists() {
        return true;
    }
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            warn!("could not remove {what} '{}': {err}", path.display());
            false
        }
    }
}

/// Compiles `unit` into `binary`, then runs and cleans up according to
/// `opts`.
///
/// The translation unit is removed after a successful compile. With
/// `delete_after_run` the binary is removed whatever the run's outcome.
pub fn build(unit: &Path, binary: &Path, opts: BuildOptions) -> TranspileResult<BuildOutcome> {
    if opts.compile_only {
        return Ok(BuildOutcome::Translated);
    }

    let compiler = get_system_compiler().ok_or(TranspileError::ToolchainNotFound)?;
    compiler.compile(unit, binary)?;
    remove_artifact(unit, "temporary file");

    if !opts.run {
        return Ok(BuildOutcome::Compiled(binary.to_path_buf()));
    }

    let ran = run(binary);
    if opts.delete_after_run {
        remove_artifact(binary, "executable");
    }
    ran.map(BuildOutcome::Ran)
}
