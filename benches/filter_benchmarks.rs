//! Benchmarks for filter parsing, matching and note selection.
//!
//! Run with: cargo bench --bench filter_benchmarks

use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use notemanager::cli::filter::FilterParser;
use notemanager::domain::{Note, NoteFilter, NoteId, Tag};
use notemanager::store::{AliasTable, NoteStore};
use std::hint::black_box;
use tempfile::TempDir;

// =============================================================================
// Test Data Generation
// =============================================================================

/// Tags to assign to notes round-robin
const TAGS: &[&str] = &[
    "draft",
    "review",
    "published",
    "important",
    "exam",
    "home",
    "work",
    "ideas",
];

/// Builds `count` notes spread over a year, each with two or three tags.
fn generate_notes(count: usize) -> Vec<Note> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
    let now = start + Duration::days(365);
    (0..count)
        .map(|i| {
            let created = start + Duration::hours((i * 7) as i64 % (365 * 24));
            let mut note = Note::new(NoteId::new(), format!("Note {i}"), created).unwrap();
            let mut tags = vec![
                Tag::new(TAGS[i % TAGS.len()]).unwrap(),
                Tag::new(TAGS[(i / 3) % TAGS.len()]).unwrap(),
            ];
            if i % 5 == 0 {
                tags.push(Tag::new("archive").unwrap());
            }
            note.add_tags(&tags);
            note.refresh_virtual_tags(&now);
            note
        })
        .collect()
}

fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn setup_store_with_notes(count: usize) -> (NoteStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = NoteStore::open(dir.path()).unwrap();
    for note in generate_notes(count) {
        store.save(&note).unwrap();
    }
    (store, dir)
}

// =============================================================================
// Parsing
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let store = NoteStore::open(dir.path()).unwrap();
    let aliases = AliasTable::default();
    let parser = FilterParser::new(&store, &aliases);

    let mut group = c.benchmark_group("filter_parse");

    let tags_only = tokens(&["+exam", "+important", "-archive", "list"]);
    group.bench_function("tags", |b| {
        b.iter(|| parser.parse(black_box(&tags_only)).unwrap())
    });

    let with_dates = tokens(&[
        "+work",
        "created.after:2025-03-01",
        "created.before:20250901 120000",
        "modified.after:2025/04/01",
        "list",
    ]);
    group.bench_function("tags_and_dates", |b| {
        b.iter(|| parser.parse(black_box(&with_dates)).unwrap())
    });

    group.finish();
}

// =============================================================================
// Matching
// =============================================================================

fn bench_matches(c: &mut Criterion) {
    let filter = NoteFilter {
        tags_include: vec!["work".to_string()],
        tags_exclude: vec!["archive".to_string()],
        created_after: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
        ..NoteFilter::default()
    };
    let virtual_filter = NoteFilter {
        tags_include: vec!["YEAR".to_string(), "draft".to_string()],
        ..NoteFilter::default()
    };

    let mut group = c.benchmark_group("filter_matches");
    for size in [100, 1_000, 10_000] {
        let notes = generate_notes(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("explicit_tags", size), &notes, |b, notes| {
            b.iter(|| notes.iter().filter(|n| filter.matches(n)).count())
        });
        group.bench_with_input(BenchmarkId::new("virtual_tags", size), &notes, |b, notes| {
            b.iter(|| notes.iter().filter(|n| virtual_filter.matches(n)).count())
        });
    }
    group.finish();
}

// =============================================================================
// Selection from disk
// =============================================================================

fn bench_select(c: &mut Criterion) {
    let filter = NoteFilter {
        tags_include: vec!["exam".to_string()],
        ..NoteFilter::default()
    };

    let mut group = c.benchmark_group("store_select");
    group.sample_size(20);
    for size in [100, 1_000] {
        let (store, _dir) = setup_store_with_notes(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("notes", size), &size, |b, _| {
            b.iter(|| store.select(black_box(&filter)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_matches, bench_select);
criterion_main!(benches);
