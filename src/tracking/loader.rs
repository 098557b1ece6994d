use std::path::Path;

use chrono::{DateTime, Utc};

use crate::{
    foundation::core::FrameIndex,
    foundation::error::{TrackerError, TrackerResult},
    tracking::store::TrackStore,
    tracking::wire::{TrackedFrame, TrackingFile},
};

/// Outcome of a successful tracking file load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records present in the file.
    pub records: usize,
    /// Records accepted into the store.
    pub accepted: usize,
    /// Records dropped by validation.
    pub skipped: usize,
    /// Informational save time recorded in the file.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Replaces the contents of `store` with the records of the tracking file at `path`.
///
/// The store is cleared before anything is read, so it is empty whenever this fails.
/// Records with a negative id or coordinate are skipped; a file with no valid records
/// yields an empty store and still succeeds.
#[tracing::instrument(skip(store), fields(path = %path.display()))]
pub fn load_tracking_file(path: &Path, store: &mut TrackStore) -> TrackerResult<LoadSummary> {
    store.clear();

    let bytes = std::fs::read(path).map_err(|e| {
        TrackerError::tracking_data(format!("read tracking file '{}': {e}", path.display()))
    })?;
    let file = TrackingFile::decode(&bytes).map_err(|e| {
        TrackerError::tracking_data(format!("parse tracking file '{}': {e}", path.display()))
    })?;

    let summary = populate_store(&file, store);
    tracing::info!(
        records = summary.records,
        accepted = summary.accepted,
        skipped = summary.skipped,
        "loaded tracking data"
    );
    if let Some(saved_at) = summary.last_updated {
        tracing::info!(saved_at = %saved_at.to_rfc3339(), "tracking data save time");
    }
    Ok(summary)
}

/// Writes `file` to `path` in the binary tracking format.
pub fn save_tracking_file(path: &Path, file: &TrackingFile) -> TrackerResult<()> {
    let bytes = file.encode()?;
    std::fs::write(path, bytes).map_err(|e| {
        TrackerError::tracking_data(format!("write tracking file '{}': {e}", path.display()))
    })
}

/// Clears `store` and fills it from decoded records.
pub fn populate_store(file: &TrackingFile, store: &mut TrackStore) -> LoadSummary {
    store.clear();

    let mut summary = LoadSummary {
        records: file.frames.len(),
        last_updated: file.last_updated.and_then(|ts| ts.to_datetime()),
        ..LoadSummary::default()
    };

    for record in &file.frames {
        match accept_record(record) {
            Some((frame, x, y, w, h)) => {
                store.add_box(frame, x, y, w, h);
                summary.accepted += 1;
            }
            None => {
                tracing::debug!(id = record.id, "skipping malformed tracking record");
                summary.skipped += 1;
            }
        }
    }
    summary
}

fn accept_record(record: &TrackedFrame) -> Option<(FrameIndex, f64, f64, f64, f64)> {
    let frame = FrameIndex(u64::try_from(record.id).ok()?);
    let b = &record.bounding_box;
    if ![b.x1, b.y1, b.x2, b.y2]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    {
        return None;
    }

    let (x1, y1, x2, y2) = (
        f64::from(b.x1),
        f64::from(b.y1),
        f64::from(b.x2),
        f64::from(b.y2),
    );
    // Corners given in reverse order are swapped so extents are never negative.
    Some((
        frame,
        x1.min(x2),
        y1.min(y2),
        (x2 - x1).abs(),
        (y2 - y1).abs(),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/loader.rs"]
mod tests;
