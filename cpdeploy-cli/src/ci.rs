//! GitHub Actions workflow commands
//!
//! The step talks back to the runner through magic stdout lines
//! (`::group::`, `::error::`, `::add-mask::`) and publishes outputs through
//! the file named by `GITHUB_OUTPUT`. Only the commands this step needs are
//! implemented.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Escapes a value for use as a workflow command message.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Collapsible log group. Opens on construction, closes on drop, so a group
/// cannot be left dangling on an early return.
pub struct Group(());

impl Group {
    pub fn open(name: &str) -> Self {
        println!("::group::{}", escape_data(name));
        Group(())
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        println!("::endgroup::");
    }
}

/// Registers a secret value with the runner's log scrubber.
///
/// Empty values are skipped; masking the empty string would mangle every
/// log line.
pub fn add_mask(value: &str) {
    if value.is_empty() {
        return;
    }
    println!("::add-mask::{}", escape_data(value));
}

/// Emits an error annotation.
pub fn error(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Emits a warning annotation.
pub fn warning(message: &str) {
    println!("::warning::{}", escape_data(message));
}

/// Publishes a step output for downstream workflow steps.
///
/// Outputs travel through the file named by `GITHUB_OUTPUT`. Outside a
/// workflow run that variable is absent and the output is silently skipped,
/// which keeps local invocations working.
pub fn set_output(name: &str, value: &str) -> io::Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => append_output(Path::new(&path), name, value),
        None => Ok(()),
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if !value.contains('\n') {
        return writeln!(file, "{}={}", name, value);
    }

    // The runner reads multi-line values in heredoc form.
    const DELIMITER: &str = "CPDEPLOY_EOF";
    if value.lines().any(|line| line == DELIMITER) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "output value contains the heredoc delimiter",
        ));
    }
    writeln!(file, "{}<<{}", name, DELIMITER)?;
    writeln!(file, "{}", value)?;
    writeln!(file, "{}", DELIMITER)
}

/// Whether the workflow runs with debug logging enabled.
pub fn is_debug() -> bool {
    std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data_encodes_command_characters() {
        assert_eq!(escape_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
        assert_eq!(escape_data("plain"), "plain");
    }

    #[test]
    fn test_append_output_accumulates_name_value_lines() {
        let file = tempfile::NamedTempFile::new().unwrap();
        append_output(file.path(), "deployment-id", "42").unwrap();
        append_output(file.path(), "other", "x").unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "deployment-id=42\nother=x\n");
    }

    #[test]
    fn test_append_output_heredocs_multiline_values() {
        let file = tempfile::NamedTempFile::new().unwrap();
        append_output(file.path(), "log", "line one\nline two").unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "log<<CPDEPLOY_EOF\nline one\nline two\nCPDEPLOY_EOF\n");
    }

    #[test]
    fn test_append_output_rejects_a_colliding_delimiter_line() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = append_output(file.path(), "log", "a\nCPDEPLOY_EOF\nb").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
