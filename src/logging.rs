// SPDX-License-Identifier: MIT
//
// File logging for the editor.
//
// The terminal owns stdout, so log events can only go to a file. With
// `--log FILE` a fmt subscriber writes plain-text lines (no ANSI colors)
// through a non-blocking appender; without it no subscriber is installed
// and the `tracing` macros in the crates cost next to nothing.
//
// The returned guard flushes the background writer when dropped and must
// outlive the event loop.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level {level:?}: {source}")]
    Level {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("log file {0} has no file name")]
    NoFileName(PathBuf),

    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("cannot install log subscriber: {0}")]
    Install(String),
}

/// Split a log path into the directory and file name the appender wants.
fn split_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr), LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::NoFileName(path.to_path_buf()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, file_name))
}

/// Install the global subscriber writing to `path`, filtered by `level`
/// (anything `EnvFilter` accepts, e.g. `debug` or `ae_editor=trace`).
///
/// # Errors
///
/// Fails on a bad filter, a log file that cannot be created, or when a
/// subscriber is already installed.
pub fn init(path: &Path, level: &str) -> Result<WorkerGuard, LoggingError> {
    let filter = EnvFilter::try_new(level).map_err(|source| LoggingError::Level {
        level: level.to_string(),
        source,
    })?;

    let (dir, file_name) = split_path(path)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(guard)
}
