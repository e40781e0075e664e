//! One load run: schema check, validation, batch loading.

use std::fmt;

use tracing::{info, warn};

use crate::{
    error::RunError,
    loader::{load, BatchProgress},
    record::{validate_all, RawRecord, Schema},
    store::RecordStore,
};

/// Where a run is. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Loading { batch: usize },
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Validating => write!(f, "validating"),
            RunState::Loading { batch } => write!(f, "loading batch {batch}"),
            RunState::Done => write!(f, "done"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// Counts reported at the end of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub fetched: usize,
    pub valid: usize,
    pub rejected: usize,
    pub inserted: usize,
}

pub struct Pipeline<'a> {
    schema: &'a Schema,
    batch_size: usize,
    state: RunState,
}

impl<'a> Pipeline<'a> {
    pub fn new(schema: &'a Schema, batch_size: usize) -> Self {
        Pipeline {
            schema,
            batch_size,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Validates `raw` and loads the survivors into `store`.
    ///
    /// `on_batch` is called after every committed batch.
    pub async fn run<S, F>(
        &mut self,
        raw: &[RawRecord],
        store: &mut S,
        mut on_batch: F,
    ) -> Result<RunSummary, RunError>
    where
        S: RecordStore,
        F: FnMut(BatchProgress),
    {
        self.state = RunState::Validating;

        if let Err(e) = self.schema.check_input(raw) {
            self.fail(store).await;
            return Err(e.into());
        }

        let validated = validate_all(raw, self.schema);
        let rejected = validated.rejected_total();
        for (reason, count) in &validated.rejected {
            warn!(schema = self.schema.name, count, "dropped records: {reason}");
        }
        info!(
            "Prepared {} valid records for insertion ({} dropped)",
            validated.records.len(),
            rejected
        );

        self.state = RunState::Loading { batch: 1 };
        let state = &mut self.state;
        let loaded = load(store, &validated.records, self.batch_size, |progress| {
            *state = RunState::Loading {
                batch: progress.batch + 1,
            };
            on_batch(progress);
        })
        .await;

        let inserted = match loaded {
            Ok(inserted) => inserted,
            Err(e) => {
                self.fail(store).await;
                warn!(
                    inserted = e.inserted(),
                    "load stopped, records after the failed batch were not written"
                );
                return Err(e.into());
            }
        };

        if let Err(e) = store.finish().await {
            self.state = RunState::Failed;
            return Err(RunError::Finish(e));
        }

        self.state = RunState::Done;

        Ok(RunSummary {
            fetched: raw.len(),
            valid: validated.records.len(),
            rejected,
            inserted,
        })
    }

    /// Marks the run failed and closes the store over what it already holds.
    async fn fail<S: RecordStore>(&mut self, store: &mut S) {
        self.state = RunState::Failed;

        if let Err(e) = store.abort().await {
            warn!("could not close the store after a failed run: {e}");
        }
    }
}

// -- Tests -------------------------------------------------------------------
