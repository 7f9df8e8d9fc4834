// Output format auto-detection for the CLI.
//
// TTY → human-readable text. Piped/redirected → structured JSON.
// `--json` flag forces JSON output regardless of terminal.

use devbuilder_client::DevstateError;
use devbuilder_session::orchestrate::SubmitError;

use serde::Serialize;
use std::io::{self, IsTerminal, Write};

const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON (one object per response).
    Json,
}

impl OutputFormat {
    /// Auto-detect format: JSON if `--json` was passed or stdout is not a TTY.
    pub fn detect(json_flag: bool) -> Self {
        if json_flag {
            return Self::Json;
        }
        Self::detect_from_terminal(io::stdout().is_terminal())
    }

    /// Testable variant that takes an explicit `is_tty` flag.
    pub fn detect_from_terminal(is_tty: bool) -> Self {
        if is_tty {
            Self::Human
        } else {
            Self::Json
        }
    }
}

/// Write a value to stdout in the selected format.
///
/// - `Human`: calls `human_fn` to produce a human-readable string.
/// - `Json`: serializes `value` as JSON.
pub fn print_output<T, F>(format: OutputFormat, value: &T, human_fn: F) -> io::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let mut out = io::stdout().lock();
    write_output(&mut out, format, value, human_fn)
}

/// Write a value to a provided writer (useful for testing).
pub fn write_output<W, T, F>(
    writer: &mut W,
    format: OutputFormat,
    value: &T,
    human_fn: F,
) -> io::Result<()>
where
    W: Write,
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Human => {
            writeln!(writer, "{}", human_fn(value))
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, value).map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

/// Write an error to stderr in the selected format.
pub fn print_error(format: OutputFormat, code: &str, message: &str) {
    let mut err = io::stderr().lock();
    match format {
        OutputFormat::Human => {
            let line = render_human_error_line(message, io::stderr().is_terminal());
            let _ = writeln!(err, "{line}");
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            });
            let _ = serde_json::to_writer(&mut err, &obj);
            let _ = writeln!(err);
        }
    }
}

/// Print a mapped, actionable error for a command failure.
pub fn print_anyhow_error(format: OutputFormat, error: &anyhow::Error) {
    let (code, message) = actionable_error(error);
    print_error(format, code, &message);
}

/// Classify a failure. Server messages pass through verbatim; only
/// transport-level failures get a rewritten, actionable message.
fn actionable_error(error: &anyhow::Error) -> (&'static str, String) {
    for cause in error.chain() {
        if let Some(submit) = cause.downcast_ref::<SubmitError>() {
            return match submit {
                SubmitError::Dependent { source, .. } if is_transport(source) => {
                    ("CONNECTION_FAILED", connection_failed_message())
                }
                SubmitError::Primary(source) if is_transport(source) => {
                    ("CONNECTION_FAILED", connection_failed_message())
                }
                _ => ("API_ERROR", submit.user_message()),
            };
        }
        if let Some(devstate) = cause.downcast_ref::<DevstateError>() {
            if is_transport(devstate) {
                return ("CONNECTION_FAILED", connection_failed_message());
            }
            return ("API_ERROR", devstate.user_message());
        }
    }
    ("ERROR", format!("{error:#}"))
}

fn is_transport(error: &DevstateError) -> bool {
    matches!(error, DevstateError::Transport(_))
}

fn connection_failed_message() -> String {
    "Could not reach the devstate server. Check the URL with: devbuilder status".to_string()
}

fn render_human_error_line(message: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{ANSI_RED}error:{ANSI_RESET} {message}")
    } else {
        format!("error: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_tty_returns_human() {
        assert_eq!(OutputFormat::detect_from_terminal(true), OutputFormat::Human);
    }

    #[test]
    fn detect_pipe_returns_json() {
        assert_eq!(OutputFormat::detect_from_terminal(false), OutputFormat::Json);
    }

    #[test]
    fn detect_json_flag_overrides_tty() {
        assert_eq!(OutputFormat::detect(true), OutputFormat::Json);
    }

    #[test]
    fn write_output_human_format() {
        #[derive(Serialize)]
        struct Info {
            name: String,
        }
        let info = Info { name: "my-app".into() };
        let mut buf = Vec::new();
        write_output(&mut buf, OutputFormat::Human, &info, |i| format!("Name: {}", i.name))
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Name: my-app\n");
    }

    #[test]
    fn write_output_json_does_not_call_human_fn() {
        #[derive(Serialize)]
        struct Info {
            count: u32,
        }
        let mut buf = Vec::new();
        write_output(&mut buf, OutputFormat::Json, &Info { count: 42 }, |_| {
            unreachable!("human_fn should not be called in JSON mode")
        })
        .unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["count"], 42);
    }

    #[test]
    fn api_errors_pass_the_server_message_through_verbatim() {
        let error = anyhow::Error::from(DevstateError::Api {
            status: 500,
            message: "volume shared-data already exists".into(),
        });
        let (code, message) = actionable_error(&error);
        assert_eq!(code, "API_ERROR");
        assert_eq!(message, "volume shared-data already exists");
    }

    #[test]
    fn dependent_failures_name_the_failed_entity() {
        let error = anyhow::Error::from(SubmitError::Dependent {
            kind: "volume",
            name: "cache".into(),
            source: DevstateError::Api { status: 409, message: "cache already exists".into() },
        });
        let (code, message) = actionable_error(&error);
        assert_eq!(code, "API_ERROR");
        assert_eq!(message, "creating volume cache failed: cache already exists");
    }

    #[test]
    fn plain_errors_keep_their_context_chain() {
        let error = anyhow::anyhow!("underlying").context("reading devfile");
        let (code, message) = actionable_error(&error);
        assert_eq!(code, "ERROR");
        assert!(message.contains("reading devfile"));
        assert!(message.contains("underlying"));
    }

    #[test]
    fn render_human_error_uses_color_for_tty() {
        let line = render_human_error_line("boom", true);
        assert!(line.contains(ANSI_RED));
        assert!(line.contains("boom"));
    }

    #[test]
    fn render_human_error_without_tty_is_plain() {
        assert_eq!(render_human_error_line("boom", false), "error: boom");
    }
}
