//! Step Capture CLI. Grabs one frame of a monitor.
//!
//! Usage:
//!   step-capture                     Write step-capture-<unix secs>.png to the output dir
//!   step-capture --out shot.png      Write the PNG to a specific path
//!   step-capture --json              Print the CaptureResult as JSON instead
//!   step-capture --timeout 30        Give up after 30s (0 waits forever)
//!
//! Configuration is read from the environment and `.env`; see `config.rs`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use step_capture_lib::capture::{self, DataUri};
use step_capture_lib::testcase::capture_failure_message;
use step_capture_lib::{CaptureConfig, CaptureResult};

const USAGE: &str = "Usage: step-capture [--json] [--out <file.png>] [--timeout <secs>]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    json: bool,
    out: Option<PathBuf>,
    /// `Some(None)` disables the timeout.
    timeout: Option<Option<Duration>>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--out" => {
                let path = iter.next().ok_or("--out requires a file path")?;
                parsed.out = Some(PathBuf::from(path));
            }
            "--timeout" => {
                let raw = iter.next().ok_or("--timeout requires a number of seconds")?;
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| format!("Invalid --timeout value: {}", raw))?;
                parsed.timeout = Some((secs > 0).then(|| Duration::from_secs(secs)));
            }
            "-h" | "--help" => return Err(String::new()),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(parsed)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Config first so RUST_LOG from .env is honored.
    let config = CaptureConfig::from_env();
    env_logger::init();

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("{}", msg);
            }
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }

    let result = match config.timeout {
        Some(limit) => {
            match tokio::time::timeout(limit, capture::capture_with(&config)).await {
                Ok(result) => result,
                Err(_) => {
                    eprintln!(
                        "Timed out after {}s waiting for screen capture",
                        limit.as_secs()
                    );
                    return ExitCode::FAILURE;
                }
            }
        }
        None => capture::capture_with(&config).await,
    };

    if args.json {
        return match serde_json::to_string(&result) {
            Ok(json) => {
                println!("{}", json);
                if result.is_success() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match result {
        CaptureResult::Success { image_data } => {
            let path = args
                .out
                .unwrap_or_else(|| default_output_path(&config.output_dir));
            match write_png(&image_data, &path) {
                Ok(bytes) => {
                    println!("{}", path.display());
                    log::info!("[CLI] Wrote {} bytes to {}", bytes, path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        CaptureResult::Failure { reason } => {
            eprintln!("{}", capture_failure_message(&reason));
            ExitCode::FAILURE
        }
    }
}

fn default_output_path(dir: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("step-capture-{}.png", secs))
}

/// Decodes the data URI and writes the PNG bytes, returning the byte count.
fn write_png(image_data: &str, path: &Path) -> Result<usize, String> {
    let uri = DataUri::parse(image_data).map_err(|e| format!("Bad capture payload: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    std::fs::write(path, &uri.bytes)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    Ok(uri.bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let args = parse_args(&argv(&["--json", "--out", "a.png", "--timeout", "5"])).unwrap();
        assert!(args.json);
        assert_eq!(args.out, Some(PathBuf::from("a.png")));
        assert_eq!(args.timeout, Some(Some(Duration::from_secs(5))));
    }

    #[test]
    fn zero_timeout_waits_forever() {
        let args = parse_args(&argv(&["--timeout", "0"])).unwrap();
        assert_eq!(args.timeout, Some(None));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&argv(&["--out"])).is_err());
        assert!(parse_args(&argv(&["--timeout", "x"])).is_err());
        assert!(parse_args(&argv(&["--verbose"])).is_err());
    }

    #[test]
    fn default_path_is_in_output_dir() {
        let path = default_output_path(Path::new("/tmp/shots"));
        assert!(path.starts_with("/tmp/shots"));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("step-capture-") && name.ends_with(".png"));
    }
}
