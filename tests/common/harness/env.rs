//! Isolated test environment with temp directory.

use super::{NoteCommand, TestNote};
use notemanager::domain::Note;
use notemanager::store::NoteStore;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary data directory.
///
/// The config and home directories also live in the temp directory, so a
/// user's real configuration never leaks into a test run.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        for dir in ["data", "config", "home"] {
            std::fs::create_dir_all(root.join(dir)).expect("Failed to create directory");
        }
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Returns the path to the data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Returns the path used as `XDG_CONFIG_HOME`.
    pub fn config_home(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Returns the path used as `HOME`.
    pub fn home_dir(&self) -> PathBuf {
        self.root.join("home")
    }

    /// Opens the data directory as a store.
    pub fn store(&self) -> NoteStore {
        NoteStore::open(self.data_dir()).expect("Failed to open store")
    }

    /// Writes a note's metadata and its single version into the data directory.
    pub fn add_note(&self, test_note: &TestNote) -> PathBuf {
        let store = self.store();
        let note = test_note.to_note();
        store.save(&note).expect("Failed to write test note");
        let version = note.latest_version().expect("TestNote has a version");
        let path = store.version_path(note.id(), version);
        std::fs::write(&path, test_note.get_body()).expect("Failed to write note content");
        store.note_dir(note.id())
    }

    /// Loads a note back from the data directory.
    pub fn load(&self, test_note: &TestNote) -> Note {
        self.store()
            .load(test_note.note_id())
            .expect("Failed to load note")
    }

    /// Writes a template into the data directory's templates folder.
    pub fn add_template(&self, name: &str, content: &str) -> PathBuf {
        let path = self.store().template_path(name);
        std::fs::write(&path, content).expect("Failed to write template");
        path
    }

    /// Writes the config file `notemanager/config.toml`.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let dir = self.config_home().join("notemanager");
        std::fs::create_dir_all(&dir).expect("Failed to create config directory");
        let path = dir.join("config.toml");
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// Writes a file to the test environment and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Returns the root of the temp directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates a NoteCommand configured for this test environment.
    pub fn cmd(&self) -> NoteCommand {
        NoteCommand::new()
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("HOME", self.home_dir())
            .dir(&self.data_dir())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===========================================
    // TestEnv Foundation
    // ===========================================

    #[test]
    fn test_env_creates_temp_directories() {
        let env = TestEnv::new();
        assert!(env.data_dir().is_dir());
        assert!(env.config_home().is_dir());
        assert!(env.home_dir().is_dir());
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], env.data_dir().to_string_lossy());
    }

    // ===========================================
    // Seeding notes
    // ===========================================

    #[test]
    fn test_env_add_note_is_loadable() {
        let env = TestEnv::new();
        let note = TestNote::new("Seeded")
            .tag("integration")
            .body("# Test Content\n");

        let dir = env.add_note(&note);

        assert!(dir.join("data").is_file());
        let loaded = env.load(&note);
        assert_eq!(loaded.title(), "Seeded");
        assert_eq!(
            env.store().content(&loaded, None).unwrap(),
            "# Test Content\n"
        );
    }
}
