//! YAML codec for a note's `data` record.

use crate::domain::Note;
use crate::infra::fs::{FsError, write_atomic};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a metadata record.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("invalid metadata in {path}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to encode metadata for {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Encodes a note's metadata as YAML.
///
/// # Format
/// ```text
/// id: 1cf77aeb-fcb2-44ad-87d6-69717dba1d0c
/// title: Exam Deadline
/// versions:
/// - 20250115-093000
/// tags:
/// - important
/// - exam
/// created: 2025-01-15T09:30:00Z
/// ```
pub fn encode(note: &Note) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(note)
}

/// Decodes a note's metadata from YAML. Virtual tags are left empty.
pub fn decode(yaml: &str) -> Result<Note, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Reads and decodes the metadata record at `path`.
pub fn read_metadata(path: &Path) -> Result<Note, MetadataError> {
    let yaml = std::fs::read_to_string(path).map_err(|e| FsError::from_io(path, e))?;
    decode(&yaml).map_err(|source| MetadataError::InvalidYaml {
        path: path.into(),
        source,
    })
}

/// Encodes `note` and writes it to `path` atomically.
pub fn write_metadata(path: &Path, note: &Note) -> Result<(), MetadataError> {
    let yaml = encode(note).map_err(|source| MetadataError::Encode {
        path: path.into(),
        source,
    })?;
    write_atomic(path, yaml.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Attachment, NoteId, Tag, VersionToken};
    use crate::infra::ContentHash;
    use chrono::{DateTime, Duration, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn created() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-15T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn full_note() -> Note {
        let id: NoteId = "1cf77aeb-fcb2-44ad-87d6-69717dba1d0c".parse().unwrap();
        let mut note = Note::new(id, "Exam Deadline", created()).unwrap();
        note.add_tags(&[Tag::new("important").unwrap(), Tag::new("exam").unwrap()]);
        note.set_alias(Some("exam".to_string()));
        note.push_initial_version(VersionToken::from_datetime(created()));
        let edited = created() + Duration::hours(2);
        note.push_version(VersionToken::from_datetime(edited), edited);
        note.push_attachment(Attachment::new(
            "syllabus.pdf",
            ContentHash::compute(b"pdf"),
            edited,
        ));
        note.mark_deleted(edited + Duration::days(1));
        note
    }

    #[test]
    fn roundtrip_preserves_persisted_fields() {
        let note = full_note();
        let parsed = decode(&encode(&note).unwrap()).unwrap();

        assert_eq!(parsed.id(), note.id());
        assert_eq!(parsed.title(), note.title());
        assert_eq!(parsed.alias(), note.alias());
        assert_eq!(parsed.tags(), note.tags());
        assert_eq!(parsed.versions(), note.versions());
        assert_eq!(parsed.created(), note.created());
        assert_eq!(parsed.modified(), note.modified());
        assert_eq!(parsed.deleted(), note.deleted());
        assert_eq!(parsed.attachments(), note.attachments());
    }

    #[test]
    fn roundtrip_does_not_carry_virtual_tags() {
        let mut note = full_note();
        note.refresh_virtual_tags(&created());
        assert!(!note.virtual_tags().is_empty());

        let parsed = decode(&encode(&note).unwrap()).unwrap();
        assert!(parsed.virtual_tags().is_empty());
    }

    #[test]
    fn decode_minimal_record() {
        let yaml = "id: 1cf77aeb-fcb2-44ad-87d6-69717dba1d0c\n\
                    title: Minimal\n\
                    versions:\n- 20250115-093000\n\
                    created: 2025-01-15T09:30:00Z\n";
        let note = decode(yaml).unwrap();
        assert_eq!(note.title(), "Minimal");
        assert!(note.tags().is_empty());
        assert!(note.modified().is_empty());
        assert!(!note.is_deleted());
        assert_eq!(note.latest_version().unwrap().as_str(), "20250115-093000");
    }

    #[test]
    fn decode_rejects_missing_id() {
        let yaml = "title: No Id\ncreated: 2025-01-15T09:30:00Z\n";
        assert!(decode(yaml).is_err());
    }

    #[test]
    fn decode_rejects_invalid_tag() {
        let yaml = "id: 1cf77aeb-fcb2-44ad-87d6-69717dba1d0c\n\
                    title: Bad\n\
                    tags:\n- not valid\n\
                    created: 2025-01-15T09:30:00Z\n";
        assert!(decode(yaml).is_err());
    }

    #[test]
    fn write_then_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data");
        let note = full_note();

        write_metadata(&path, &note).unwrap();
        let loaded = read_metadata(&path).unwrap();
        assert_eq!(loaded.title(), note.title());
        assert_eq!(loaded.versions(), note.versions());
    }

    #[test]
    fn read_missing_file_is_fs_error() {
        let dir = TempDir::new().unwrap();
        let result = read_metadata(&dir.path().join("data"));
        assert!(matches!(
            result,
            Err(MetadataError::Fs(FsError::NotFound { .. }))
        ));
    }

    #[test]
    fn read_corrupt_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data");
        std::fs::write(&path, "::: not yaml").unwrap();

        let err = read_metadata(&path).unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
