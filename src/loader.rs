//! Sequential batch loading of clean records into a store.

use tracing::{error, info};

use crate::{error::LoadError, record::CleanRecord, store::RecordStore};

/// Progress after one committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based index of the batch just written.
    pub batch: usize,
    /// Records committed so far, this batch included.
    pub inserted: usize,
    /// Records the whole load expects to commit.
    pub total: usize,
}

/// Writes `records` to `store` in order, `batch_size` at a time.
///
/// Stops at the first failed insert. Everything before the failed batch is
/// committed; nothing after it is attempted.
pub async fn load<S, F>(
    store: &mut S,
    records: &[CleanRecord],
    batch_size: usize,
    mut on_batch: F,
) -> Result<usize, LoadError>
where
    S: RecordStore,
    F: FnMut(BatchProgress),
{
    if batch_size == 0 {
        return Err(LoadError::ZeroBatchSize);
    }

    let total = records.len();
    let mut inserted = 0;

    for (idx, batch) in records.chunks(batch_size).enumerate() {
        let batch_number = idx + 1;

        if let Err(source) = store.insert(batch).await {
            error!(batch = batch_number, inserted, "batch insert failed: {source}");
            return Err(LoadError::Store {
                batch: batch_number,
                inserted,
                source,
            });
        }

        inserted += batch.len();
        info!("Inserted batch {batch_number}, total: {inserted}/{total}");
        on_batch(BatchProgress {
            batch: batch_number,
            inserted,
            total,
        });
    }

    Ok(inserted)
}

// -- Tests -------------------------------------------------------------------
