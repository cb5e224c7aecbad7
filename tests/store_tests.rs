//! Note store contract tests on a real on-disk database.

use anyhow::Result;
use voxnote::audio::AudioBlob;
use voxnote::store::{NewNote, NoteFields, NoteStore, PROCESSING};
use voxnote::VoxnoteError;

fn store(dir: &tempfile::TempDir) -> NoteStore {
    NoteStore::new(dir.path().join("notes.sqlite")).unwrap()
}

fn blob(seed: u8) -> AudioBlob {
    AudioBlob::wav(vec![seed; 64])
}

#[test]
fn save_assigns_increasing_ids_and_placeholders() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    let first = store.save(NewNote::new(blob(1), "00:05"))?;
    let second = store.save(NewNote::new(blob(2), "00:12"))?;
    assert!(second > first);

    let record = store.get(first)?;
    assert_eq!(record.id, first);
    assert_eq!(record.title, PROCESSING);
    assert_eq!(record.transcript, PROCESSING);
    assert!(record.is_processing());
    assert_eq!(record.duration_label, "00:05");
    assert_eq!(record.audio, blob(1));
    assert!(record.created_at_ms > 0);
    Ok(())
}

#[test]
fn list_all_is_newest_first_for_any_insertion_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    let mut ids = Vec::new();
    for i in 0..8 {
        ids.push(store.save(NewNote::new(blob(i), "00:01"))?);
        // Keep created_at distinct at millisecond resolution
        std::thread::sleep(std::time::Duration::from_millis(3));
    }

    let listed = store.list_all()?;
    assert_eq!(listed.len(), 8);

    for pair in listed.windows(2) {
        assert!(pair[0].created_at_ms >= pair[1].created_at_ms);
    }
    // Newest insertion comes first
    assert_eq!(listed[0].id, *ids.last().unwrap());
    assert_eq!(listed[7].id, ids[0]);
    Ok(())
}

#[test]
fn update_merges_fields_without_touching_identity() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    let id = store.save(NewNote::new(blob(3), "01:07"))?;
    let before = store.get(id)?;

    let updated = store.update(
        id,
        NoteFields::enriched("Grocery run plan", "buy milk and eggs"),
    )?;
    assert_eq!(updated.title, "Grocery run plan");
    assert_eq!(updated.transcript, "buy milk and eggs");
    assert!(!updated.is_processing());

    let reread = store.get(id)?;
    assert_eq!(reread.id, before.id);
    assert_eq!(reread.created_at_ms, before.created_at_ms);
    assert_eq!(reread.duration_label, before.duration_label);
    assert_eq!(reread.title, "Grocery run plan");

    // A partial update leaves the other field alone
    let partial = store.update(
        id,
        NoteFields {
            title: Some("Renamed".to_string()),
            transcript: None,
        },
    )?;
    assert_eq!(partial.transcript, "buy milk and eggs");
    Ok(())
}

#[test]
fn update_missing_id_reports_not_found() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    let result = store.update(999, NoteFields::enriched("x", "y"));
    assert!(matches!(result, Err(VoxnoteError::NotFound(999))));
    Ok(())
}

#[test]
fn delete_removes_and_double_delete_does_not_corrupt() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store(&dir);

    let keep = store.save(NewNote::new(blob(1), "00:01"))?;
    let gone = store.save(NewNote::new(blob(2), "00:02"))?;

    store.delete(gone)?;
    assert!(store.list_all()?.iter().all(|n| n.id != gone));

    // Second delete reports NotFound; callers tolerate it
    let again = store.delete(gone);
    assert!(matches!(again, Err(VoxnoteError::NotFound(_))));

    // The store still works
    assert_eq!(store.list_all()?.len(), 1);
    assert_eq!(store.get(keep)?.id, keep);
    Ok(())
}

#[test]
fn store_reopens_with_existing_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.sqlite");

    let id = {
        let store = NoteStore::new(&path)?;
        store.save(NewNote::new(blob(9), "00:09"))?
    };

    let reopened = NoteStore::new(&path)?;
    assert_eq!(reopened.get(id)?.duration_label, "00:09");
    Ok(())
}
