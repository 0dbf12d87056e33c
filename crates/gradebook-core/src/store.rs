//! In-memory submission store.
//!
//! Records live in a sharded `DashMap`. Every mutation holds a single shard
//! lock for the duration of that one map operation and never across an
//! `.await`, so concurrent handlers cannot corrupt the mapping. Insertion
//! order is recovered from a per-entry sequence number.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{GradebookError, Result};
use crate::model::{Submission, SubmissionFilter};

/// Acceptable grade range. Negative grades are always rejected; the upper
/// bound is left to the deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradePolicy {
    pub max_grade: Option<f64>,
}

impl GradePolicy {
    pub fn check(&self, grade: f64) -> Result<()> {
        if !grade.is_finite() {
            return Err(GradebookError::InvalidInput("grade must be a finite number".into()));
        }
        if grade < 0.0 {
            return Err(GradebookError::InvalidInput("grade must not be negative".into()));
        }
        if let Some(max) = self.max_grade {
            if grade > max {
                return Err(GradebookError::InvalidInput(format!(
                    "grade must not exceed {max}"
                )));
            }
        }
        Ok(())
    }
}

struct StoredSubmission {
    seq: u64,
    record: Submission,
}

/// Store of all live submissions, keyed by id.
#[derive(Default)]
pub struct SubmissionStore {
    records: DashMap<Uuid, StoredSubmission>,
    seq: AtomicU64,
    policy: GradePolicy,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::with_policy(GradePolicy::default())
    }

    pub fn with_policy(policy: GradePolicy) -> Self {
        Self {
            records: DashMap::new(),
            seq: AtomicU64::new(1),
            policy,
        }
    }

    pub fn policy(&self) -> GradePolicy {
        self.policy
    }

    /// Add a record whose id the caller generated. A duplicate id is a bug in
    /// the caller, reported as `Internal`.
    pub fn insert(&self, record: Submission) -> Result<()> {
        match self.records.entry(record.id) {
            Entry::Occupied(e) => Err(GradebookError::Internal(format!(
                "duplicate submission id {}",
                e.key()
            ))),
            Entry::Vacant(e) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                e.insert(StoredSubmission { seq, record });
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &Uuid) -> Result<Submission> {
        self.records
            .get(id)
            .map(|r| r.value().record.clone())
            .ok_or_else(|| not_found(id))
    }

    /// Matching records in insertion order.
    pub fn list(&self, filter: &SubmissionFilter) -> Vec<Submission> {
        let mut hits: Vec<(u64, Submission)> = self
            .records
            .iter()
            .filter(|r| filter.matches(&r.value().record))
            .map(|r| (r.value().seq, r.value().record.clone()))
            .collect();
        hits.sort_by_key(|(seq, _)| *seq);
        hits.into_iter().map(|(_, s)| s).collect()
    }

    /// Set `grade` and `graded_at` together. Unknown ids are reported before
    /// the grade itself is checked.
    pub fn update_grade(&self, id: &Uuid, grade: f64) -> Result<Submission> {
        let mut entry = self.records.get_mut(id).ok_or_else(|| not_found(id))?;
        self.policy.check(grade)?;
        let stored = entry.value_mut();
        stored.record.set_grade(grade, Utc::now());
        Ok(stored.record.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn graded_count(&self) -> usize {
        self.records.iter().filter(|r| r.value().record.is_graded()).count()
    }
}

fn not_found(id: &Uuid) -> GradebookError {
    GradebookError::NotFound(format!("assignment {id} not found"))
}
