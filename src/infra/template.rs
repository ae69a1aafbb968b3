//! Note template rendering.

use chrono::{DateTime, FixedOffset};

use crate::domain::{NoteId, Tag};

/// Template used when the requested template file does not exist.
pub const DEFAULT_TEMPLATE: &[u8] = b"";

const PLACEHOLDER_START: &[u8] = b"{{ nm.";

/// Values substituted into a new note's template.
///
/// | placeholder               | value                         |
/// |---------------------------|-------------------------------|
/// | `{{ nm.id }}`             | full note id                  |
/// | `{{ nm.created.date }}`   | `YYYY-MM-DD`                  |
/// | `{{ nm.created.time }}`   | `HH:MM`                       |
/// | `{{ nm.created.offset }}` | `+HH:MM`                      |
/// | `{{ nm.title }}`          | title                         |
/// | `{{ nm.tags }}`           | tags joined with `,`          |
#[derive(Debug)]
pub struct TemplateValues<'a> {
    pub id: &'a NoteId,
    pub title: &'a str,
    pub tags: &'a [Tag],
    pub created: DateTime<FixedOffset>,
}

impl TemplateValues<'_> {
    fn substitutions(&self) -> [(&'static str, String); 6] {
        let tags: Vec<&str> = self.tags.iter().map(|t| t.as_str()).collect();
        [
            ("{{ nm.id }}", self.id.to_string()),
            ("{{ nm.created.date }}", self.created.format("%Y-%m-%d").to_string()),
            ("{{ nm.created.time }}", self.created.format("%H:%M").to_string()),
            ("{{ nm.created.offset }}", self.created.format("%:z").to_string()),
            ("{{ nm.title }}", self.title.to_string()),
            ("{{ nm.tags }}", tags.join(",")),
        ]
    }
}

/// Replaces every placeholder in `template` with its value.
///
/// Only the exact placeholder tokens are recognised. All other bytes,
/// including invalid UTF-8 and unknown `{{ ... }}` text, are copied through
/// unchanged. Substituted values are never scanned again.
pub fn render_template(template: &[u8], values: &TemplateValues<'_>) -> Vec<u8> {
    let substitutions = values.substitutions();
    let mut out = Vec::with_capacity(template.len());
    let mut rest = template;

    while let Some(&byte) = rest.first() {
        if rest.starts_with(PLACEHOLDER_START) {
            let found = substitutions
                .iter()
                .find(|(token, _)| rest.starts_with(token.as_bytes()));
            if let Some((token, value)) = found {
                out.extend_from_slice(value.as_bytes());
                rest = &rest[token.len()..];
                continue;
            }
        }
        out.push(byte);
        rest = &rest[1..];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn values<'a>(id: &'a NoteId, title: &'a str, tags: &'a [Tag]) -> TemplateValues<'a> {
        TemplateValues {
            id,
            title,
            tags,
            created: FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2025, 1, 15, 9, 5, 0)
                .unwrap(),
        }
    }

    fn render(template: &str, values: &TemplateValues<'_>) -> String {
        String::from_utf8(render_template(template.as_bytes(), values)).unwrap()
    }

    #[test]
    fn replaces_every_title_and_tags_placeholder() {
        let id = NoteId::new();
        let tags = vec![Tag::new("important").unwrap(), Tag::new("exam").unwrap()];
        let template = "# {{ nm.title }}\n\ntags: {{ nm.tags }}\n\n{{ nm.title }} again\n";

        let out = render(template, &values(&id, "Exam Deadline", &tags));
        assert_eq!(
            out,
            "# Exam Deadline\n\ntags: important,exam\n\nExam Deadline again\n"
        );
    }

    #[test]
    fn renders_id_and_created_parts() {
        let id: NoteId = "1cf77aeb-fcb2-44ad-87d6-69717dba1d0c".parse().unwrap();
        let template =
            "{{ nm.id }} {{ nm.created.date }} {{ nm.created.time }} {{ nm.created.offset }}";

        let out = render(template, &values(&id, "t", &[]));
        assert_eq!(
            out,
            "1cf77aeb-fcb2-44ad-87d6-69717dba1d0c 2025-01-15 09:05 +01:00"
        );
    }

    #[test]
    fn empty_tags_render_empty() {
        let id = NoteId::new();
        assert_eq!(render("[{{ nm.tags }}]", &values(&id, "t", &[])), "[]");
    }

    #[test]
    fn title_is_not_html_escaped() {
        let id = NoteId::new();
        let out = render("{{ nm.title }}", &values(&id, "Q&A <draft>", &[]));
        assert_eq!(out, "Q&A <draft>");
    }

    #[test]
    fn unknown_placeholder_is_left_as_is() {
        let id = NoteId::new();
        let out = render("a{{ nm.missing }}b", &values(&id, "t", &[]));
        assert_eq!(out, "a{{ nm.missing }}b");
    }

    #[test]
    fn template_syntax_lookalikes_pass_through() {
        let id = NoteId::new();
        let template = "n=${#items[@]}\n{% note %}\n{# x #}\n# {{ nm.title }}\n{{ nm.title \n";

        let out = render(template, &values(&id, "Plan", &[]));
        assert_eq!(
            out,
            "n=${#items[@]}\n{% note %}\n{# x #}\n# Plan\n{{ nm.title \n"
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let id: NoteId = "1cf77aeb-fcb2-44ad-87d6-69717dba1d0c".parse().unwrap();
        let out = render("{{ nm.title }}", &values(&id, "{{ nm.id }}", &[]));
        assert_eq!(out, "{{ nm.id }}");
    }

    #[test]
    fn invalid_utf8_bytes_are_preserved() {
        let id = NoteId::new();
        let out = render_template(b"caf\xe9 {{ nm.title }}", &values(&id, "Menu", &[]));
        assert_eq!(out, b"caf\xe9 Menu".to_vec());
    }

    #[test]
    fn plain_text_passes_through() {
        let id = NoteId::new();
        assert_eq!(render("no placeholders\n", &values(&id, "t", &[])), "no placeholders\n");
    }
}
