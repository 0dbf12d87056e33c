//! Submission records and the request shapes that create and query them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GradebookError, Result};

/// Kind of assignment a submission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Test,
    Lab,
}

impl AssignmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentType::Test => "test",
            AssignmentType::Lab => "lab",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied fields of a submission (the submit request body).
///
/// Unknown fields are ignored so older clients that still send
/// `submitted_at` keep working; the server always stamps its own time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub student_name: String,
    pub student_id: String,
    pub assignment_type: AssignmentType,
    pub assignment_name: String,
    pub submission_url: String,
}

impl NewSubmission {
    /// Reject blank required fields and URLs that cannot be a single token.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("student_name", &self.student_name),
            ("student_id", &self.student_id),
            ("assignment_name", &self.assignment_name),
            ("submission_url", &self.submission_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GradebookError::InvalidInput(format!("{field} must not be empty")));
            }
        }
        if self.submission_url.chars().any(char::is_whitespace) {
            return Err(GradebookError::InvalidInput(
                "submission_url must not contain whitespace".into(),
            ));
        }
        Ok(())
    }
}

/// A single student assignment record.
///
/// `grade` and `graded_at` are private so they can only change together,
/// through [`crate::SubmissionStore::update_grade`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Generated at creation, never reassigned.
    pub id: Uuid,
    pub student_name: String,
    pub student_id: String,
    pub assignment_type: AssignmentType,
    pub assignment_name: String,
    pub submission_url: String,
    /// Set at creation, never reassigned.
    pub submitted_at: DateTime<Utc>,
    grade: Option<f64>,
    graded_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// Build an ungraded record from validated caller input.
    pub fn new(input: NewSubmission, id: Uuid, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            student_name: input.student_name,
            student_id: input.student_id,
            assignment_type: input.assignment_type,
            assignment_name: input.assignment_name,
            submission_url: input.submission_url,
            submitted_at,
            grade: None,
            graded_at: None,
        }
    }

    pub fn grade(&self) -> Option<f64> {
        self.grade
    }

    pub fn graded_at(&self) -> Option<DateTime<Utc>> {
        self.graded_at
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    pub(crate) fn set_grade(&mut self, grade: f64, at: DateTime<Utc>) {
        self.grade = Some(grade);
        self.graded_at = Some(at);
    }
}

/// Optional list filters. Both absent means "everything".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionFilter {
    #[serde(default)]
    pub assignment_type: Option<AssignmentType>,
    #[serde(default)]
    pub student_id: Option<String>,
}

impl SubmissionFilter {
    pub fn matches(&self, s: &Submission) -> bool {
        if let Some(ty) = self.assignment_type {
            if s.assignment_type != ty {
                return false;
            }
        }
        // An empty `student_id=` query parameter does not filter.
        match self.student_id.as_deref() {
            Some(sid) if !sid.is_empty() => s.student_id == sid,
            _ => true,
        }
    }
}
