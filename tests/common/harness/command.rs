//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since each test binary uses a different subset
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::Path;

/// Appends `$NOTE_TEST_BODY` (default `body`) to the file it is given.
pub const APPENDING_EDITOR: &str =
    r#"sh -c 'printf "%s\n" "${NOTE_TEST_BODY:-body}" >> "$1"' sh"#;

/// Leaves the file it is given untouched.
pub const VIEWING_EDITOR: &str = "true";

/// Fluent wrapper around `assert_cmd::Command` for the `note` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
/// The editor defaults to [`APPENDING_EDITOR`] and the pager to `cat`.
pub struct NoteCommand {
    args: Vec<String>,
    envs: Vec<(String, OsString)>,
}

impl NoteCommand {
    /// Creates a new command for the `note` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: vec![
                ("EDITOR".to_string(), APPENDING_EDITOR.into()),
                ("PAGER".to_string(), "cat".into()),
            ],
        }
    }

    /// Sets the `--dir` option to specify the data directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Sets an environment variable for the child process.
    pub fn env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.envs.retain(|(k, _)| k != key);
        self.envs.push((key.to_string(), value.into()));
        self
    }

    /// Sets the editor command.
    pub fn editor(self, command: &str) -> Self {
        self.env("EDITOR", command)
    }

    /// Sets the text the appending editor writes.
    pub fn body(self, text: &str) -> Self {
        self.env("NOTE_TEST_BODY", text)
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("note").expect("Failed to find note binary");
        cmd.env_remove("VISUAL").env_remove("RUST_LOG");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--format paths` to the command.
    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }
}

impl Default for NoteCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        NoteCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_dir() {
        let temp = TempDir::new().unwrap();
        let cmd = NoteCommand::new().dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_env_replaces_default() {
        let cmd = NoteCommand::new().editor("true");
        let editors: Vec<_> = cmd.envs.iter().filter(|(k, _)| k == "EDITOR").collect();
        assert_eq!(editors.len(), 1);
        assert_eq!(editors[0].1, "true");
    }
}
