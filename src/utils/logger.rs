use crate::shared::constants;
use lazy_static::lazy_static;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Clone)]
struct LogSink {
    error_path: PathBuf,
    debug_path: PathBuf,
    echo: bool,
}

lazy_static! {
    static ref LOGGER: Mutex<Option<LogSink>> = Mutex::new(None);
}

fn sink() -> MutexGuard<'static, Option<LogSink>> {
    match LOGGER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

fn start_file(path: &Path, title: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        let _ = writeln!(
            file,
            "=== {} {} Log Started: {} ===",
            constants::APP_NAME,
            title,
            chrono::Local::now()
        );
    }
}

/// Truncates `error.log` and `debug.log` in `log_dir` and routes all
/// subsequent log calls there. With `echo` every line is mirrored to stderr.
pub fn init(log_dir: &Path, echo: bool) {
    let error_path = log_dir.join(constants::ERROR_LOG_FILE);
    let debug_path = log_dir.join(constants::DEBUG_LOG_FILE);

    start_file(&error_path, "Error");
    start_file(&debug_path, "Debug");

    let paths = LogSink {
        error_path,
        debug_path,
        echo,
    };
    *sink() = Some(paths.clone());

    panic::set_hook(Box::new(move |info| {
        let backtrace = Backtrace::capture();
        let msg = match info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<Any>",
            },
        };

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let error_msg = format!(
            "\nCRITICAL PANIC at {}:\nMessage: {}\nBacktrace:\n{:?}\n",
            location, msg, backtrace
        );

        append_line(&paths.error_path, &error_msg);
        append_line(&paths.debug_path, &error_msg);

        eprintln!(
            "{} crashed. See {} for details.",
            constants::APP_NAME,
            paths.error_path.display()
        );
    }));
}

pub fn log(level: &str, msg: &str) {
    if let Some(paths) = sink().as_ref() {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let line = format!("[{}][{}] {}", timestamp, level, msg);
        append_line(&paths.debug_path, &line);

        if level == "ERROR" {
            append_line(&paths.error_path, &line);
        }
        if paths.echo {
            eprintln!("{}", line);
        }
    }
}

pub fn info(msg: &str) {
    log("INFO", msg);
}

pub fn warn(msg: &str) {
    log("WARN", msg);
}

pub fn error(msg: &str) {
    log("ERROR", msg);
}

pub fn debug(msg: &str) {
    log("DEBUG", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_error_lines_land_in_both_files() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path(), false);

        debug("scanning Shot01");
        error("copy failed for Shot02");

        let debug_log = fs::read_to_string(dir.path().join(constants::DEBUG_LOG_FILE)).unwrap();
        let error_log = fs::read_to_string(dir.path().join(constants::ERROR_LOG_FILE)).unwrap();

        assert!(debug_log.contains("[DEBUG] scanning Shot01"));
        assert!(debug_log.contains("[ERROR] copy failed for Shot02"));
        assert!(error_log.contains("[ERROR] copy failed for Shot02"));
        assert!(!error_log.contains("scanning Shot01"));
    }
}
