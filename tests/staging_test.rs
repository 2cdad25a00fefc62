use bytes::Bytes;
use image_compare_intake::config::IntakeConfig;
use image_compare_intake::services::preview::{MemoryPreviewStore, PreviewStore};
use image_compare_intake::utils::validation::ValidationError;
use image_compare_intake::{
    CandidateFile, FlowState, ImageCollection, ImageStager, clear_all, paginate, remove_image,
};
use std::sync::Arc;

const MB: u64 = 1024 * 1024;

fn setup() -> (ImageStager, Arc<MemoryPreviewStore>) {
    let _ = tracing_subscriber::fmt::try_init();
    let memory = Arc::new(MemoryPreviewStore::new());
    let stager = ImageStager::new(IntakeConfig::default(), memory.clone());
    (stager, memory)
}

fn file(name: &str, declared_type: &str, size: u64) -> CandidateFile {
    CandidateFile::with_declared_size(name, declared_type, size)
}

fn pngs(prefix: &str, count: usize) -> Vec<CandidateFile> {
    (0..count)
        .map(|i| CandidateFile::new(format!("{prefix}{i}.png"), "image/png", Bytes::from_static(b"x")))
        .collect()
}

fn names(collection: &ImageCollection) -> Vec<&str> {
    collection.iter().map(|img| img.display_name.as_str()).collect()
}

#[test]
fn test_mixed_batch_against_empty_collection() {
    let (stager, memory) = setup();
    let batch = vec![
        file("a.png", "image/png", 2 * MB),
        file("b.txt", "text/plain", MB),
        file("c.jpg", "image/jpeg", 12 * MB),
        file("d.webp", "image/webp", 3 * MB),
    ];

    let (collection, outcome) = stager.accept_files(batch, ImageCollection::new());

    assert_eq!(names(&collection), vec!["a.png", "d.webp"]);
    assert_eq!(outcome.accepted_count(), 2);
    assert_eq!(outcome.rejected_count(), 2);
    assert_eq!(outcome.overflow, 0);
    assert_eq!(outcome.rejected[0].name, "b.txt");
    assert!(matches!(outcome.rejected[0].reason, ValidationError::InvalidMimeType(_)));
    assert_eq!(outcome.rejected[1].name, "c.jpg");
    assert!(matches!(outcome.rejected[1].reason, ValidationError::FileTooLarge { .. }));

    // One preview per accepted file only
    assert_eq!(memory.created_count(), 2);
    assert_eq!(collection.get(outcome.accepted[0]).unwrap().size_label, "2.0 MB");
}

#[test]
fn test_accepted_count_matches_valid_files() {
    let (stager, _) = setup();
    let batch = vec![
        file("ok.png", "image/png", 1),
        file("limit.jpg", "image/jpeg", 10 * MB),
        file("over.jpg", "image/jpeg", 10 * MB + 1),
        file("anim.gif", "image/gif", 10),
        file("upper.webp", "IMAGE/WEBP", 10),
        file("nothing", "", 0),
    ];
    let expected = 3;

    let (collection, outcome) = stager.accept_files(batch, ImageCollection::new());
    assert_eq!(outcome.accepted_count(), expected);
    assert_eq!(collection.len(), expected);
    assert_eq!(outcome.rejected_count(), 3);
}

#[test]
fn test_append_preserves_order() {
    let (stager, _) = setup();
    let (collection, _) = stager.accept_files(pngs("first-", 2), ImageCollection::new());
    let (collection, _) = stager.accept_files(pngs("second-", 2), collection);
    assert_eq!(
        names(&collection),
        vec!["first-0.png", "first-1.png", "second-0.png", "second-1.png"]
    );
}

#[test]
fn test_capacity_truncates_newest() {
    let (stager, memory) = setup();
    let (collection, _) = stager.accept_files(pngs("old-", 99), ImageCollection::new());
    assert_eq!(collection.len(), 99);

    let (collection, outcome) = stager.accept_files(pngs("new-", 5), collection);
    assert_eq!(collection.len(), 100);
    assert_eq!(outcome.accepted_count(), 1);
    assert_eq!(outcome.overflow, 4);
    assert_eq!(outcome.rejected_count(), 4);
    assert_eq!(collection.as_slice()[99].display_name, "new-0.png");
    assert_eq!(collection.as_slice()[0].display_name, "old-0.png");
    assert_eq!(memory.live_count(), 100);

    // A full collection takes nothing more
    let (collection, outcome) = stager.accept_files(pngs("late-", 3), collection);
    assert_eq!(collection.len(), 100);
    assert_eq!(outcome.overflow, 3);
}

#[test]
fn test_ids_are_unique() {
    let (stager, _) = setup();
    let (collection, _) = stager.accept_files(pngs("img-", 50), ImageCollection::new());
    let (collection, _) = stager.accept_files(pngs("more-", 50), collection);

    let mut ids = collection.ids();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_remove_is_idempotent() {
    let (stager, memory) = setup();
    let (collection, outcome) = stager.accept_files(pngs("img-", 4), ImageCollection::new());
    let target = outcome.accepted[2];

    let once = remove_image(collection, target);
    let ids_once = once.ids();
    assert_eq!(memory.released_count(), 1);

    let twice = remove_image(once, target);
    assert_eq!(twice.ids(), ids_once);
    assert_eq!(memory.released_count(), 1);
    assert!(!twice.contains(target));
}

#[test]
fn test_remove_unknown_id_is_noop() {
    let (stager, memory) = setup();
    let (collection, _) = stager.accept_files(pngs("img-", 3), ImageCollection::new());
    let before = collection.ids();

    let collection = remove_image(collection, uuid::Uuid::new_v4());
    assert_eq!(collection.ids(), before);
    assert_eq!(memory.released_count(), 0);
}

#[test]
fn test_clear_all_releases_each_handle_once() {
    let (stager, memory) = setup();
    let (collection, _) = stager.accept_files(pngs("img-", 7), ImageCollection::new());
    let urls: Vec<String> = collection.iter().map(|i| i.preview_url().to_string()).collect();
    assert!(urls.iter().all(|u| memory.resolve(u).is_some()));

    let collection = clear_all(collection);
    assert!(collection.is_empty());
    assert_eq!(memory.released_count(), 7);
    assert_eq!(memory.live_count(), 0);
    assert!(urls.iter().all(|u| memory.resolve(u).is_none()));

    // Clearing an empty collection releases nothing
    let collection = clear_all(collection);
    assert!(collection.is_empty());
    assert_eq!(memory.released_count(), 7);
}

#[test]
fn test_paginate_twenty_five_images() {
    let (stager, _) = setup();
    let (collection, _) = stager.accept_files(pngs("img-", 25), ImageCollection::new());

    let page = paginate(collection.as_slice(), 10, 1);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items[0].display_name, "img-0.png");
    assert_eq!(page.items[9].display_name, "img-9.png");

    let page = paginate(collection.as_slice(), 10, 3);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].display_name, "img-20.png");
    assert_eq!(page.items[4].display_name, "img-24.png");

    // Out of range is the caller's problem, but never a panic
    assert!(paginate(collection.as_slice(), 10, 0).items.is_empty());
    assert!(paginate(collection.as_slice(), 10, 4).items.is_empty());
}

#[test]
fn test_flow_state_transitions() {
    let (stager, _) = setup();
    let min = stager.config().min_images;

    let collection = ImageCollection::new();
    assert_eq!(collection.flow_state(min), FlowState::Empty);

    let (collection, outcome) = stager.accept_files(pngs("a-", 2), collection);
    assert_eq!(collection.flow_state(min), FlowState::Staging);

    let (collection, _) = stager.accept_files(pngs("b-", 1), collection);
    assert_eq!(collection.flow_state(min), FlowState::Ready);

    let collection = remove_image(collection, outcome.accepted[0]);
    assert_eq!(collection.flow_state(min), FlowState::Staging);

    let collection = clear_all(collection);
    assert_eq!(collection.flow_state(min), FlowState::Empty);
}

#[test]
fn test_content_verification_rejects_disguised_files() {
    let memory = Arc::new(MemoryPreviewStore::new());
    let config = IntakeConfig {
        verify_content: true,
        ..IntakeConfig::default()
    };
    let stager = ImageStager::new(config, memory.clone());

    let real_png = Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]);
    let elf = Bytes::from_static(&[0x7F, 0x45, 0x4C, 0x46, 0x02, 0x01, 0x01, 0x00]);
    let batch = vec![
        CandidateFile::new("real.png", "image/png", real_png.clone()),
        CandidateFile::new("fake.png", "image/png", elf),
        CandidateFile::new("lying.jpg", "image/jpeg", real_png),
    ];

    let (collection, outcome) = stager.accept_files(batch, ImageCollection::new());
    assert_eq!(names(&collection), vec!["real.png"]);
    assert_eq!(outcome.rejected[0].reason, ValidationError::ExecutableContent);
    assert_eq!(outcome.rejected[1].reason.code(), "CONTENT_MISMATCH");
    assert_eq!(memory.created_count(), 1);
}
