//! Narrow interfaces to the services around the drawing surface.
//!
//! Sessions, word set lookup and submission storage live outside this
//! workspace. The traits here are the seams; the in-memory implementations
//! back tests and offline demos.

use crate::storage::BoxFuture;
use crate::stroke::Stroke;
use crate::word_set::WordSet;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

impl Session {
    pub fn student(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Student,
        }
    }
}

/// Supplies the current session, or `None` when nobody is signed in.
pub trait SessionProvider: Send + Sync {
    fn session(&self) -> Option<Session>;
}

impl SessionProvider for Option<Session> {
    fn session(&self) -> Option<Session> {
        self.clone()
    }
}

/// Errors from the submission service.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Submission service unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the word set source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No active word set found")]
    NoActiveWordSet,
}

/// A drawing ready to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub word_id: u32,
    pub word: String,
    pub stroke_data: Vec<Stroke>,
    /// PNG bytes of the committed strokes.
    #[serde(skip)]
    pub image: Vec<u8>,
}

/// A stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub student_id: String,
    pub word_id: u32,
    pub word: String,
    pub stroke_data: Vec<Stroke>,
    pub image_bytes: usize,
}

/// Accepts finished drawings.
pub trait SubmissionApi: Send + Sync {
    fn submit(
        &self,
        submission: NewSubmission,
    ) -> BoxFuture<'_, Result<SubmissionRecord, SubmissionError>>;
}

/// Supplies the active word set.
pub trait WordSetSource: Send + Sync {
    fn active_word_set(&self) -> BoxFuture<'_, Result<WordSet, SourceError>>;
}

/// Word set source returning a fixed value.
#[derive(Debug, Clone, Default)]
pub struct StaticWordSets {
    active: Option<WordSet>,
}

impl StaticWordSets {
    pub fn new(active: Option<WordSet>) -> Self {
        Self { active }
    }
}

impl WordSetSource for StaticWordSets {
    fn active_word_set(&self) -> BoxFuture<'_, Result<WordSet, SourceError>> {
        Box::pin(async move { self.active.clone().ok_or(SourceError::NoActiveWordSet) })
    }
}

/// In-memory submission service.
///
/// Requires a session and non-empty word, strokes and image, then stores the
/// record under the session's user id.
pub struct MemorySubmissions<P> {
    sessions: P,
    records: RwLock<Vec<SubmissionRecord>>,
}

impl<P: SessionProvider> MemorySubmissions<P> {
    pub fn new(sessions: P) -> Self {
        Self {
            sessions,
            records: RwLock::new(Vec::new()),
        }
    }

    /// All stored records, oldest first.
    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Records belonging to one student.
    pub fn records_for(&self, student_id: &str) -> Vec<SubmissionRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.student_id == student_id)
            .collect()
    }
}

impl<P: SessionProvider> SubmissionApi for MemorySubmissions<P> {
    fn submit(
        &self,
        submission: NewSubmission,
    ) -> BoxFuture<'_, Result<SubmissionRecord, SubmissionError>> {
        Box::pin(async move {
            let session = self.sessions.session().ok_or(SubmissionError::Unauthorized)?;

            if submission.word.trim().is_empty() {
                return Err(SubmissionError::MissingField("word"));
            }
            if submission.stroke_data.is_empty() {
                return Err(SubmissionError::MissingField("strokeData"));
            }
            if submission.image.is_empty() {
                return Err(SubmissionError::MissingField("image"));
            }

            let record = SubmissionRecord {
                id: Uuid::new_v4(),
                student_id: session.user_id,
                word_id: submission.word_id,
                word: submission.word,
                stroke_data: submission.stroke_data,
                image_bytes: submission.image.len(),
            };

            let mut records = self
                .records
                .write()
                .map_err(|e| SubmissionError::Unavailable(format!("Lock error: {}", e)))?;
            records.push(record.clone());
            log::info!(
                "Stored submission {} for word {:?} ({} bytes)",
                record.id,
                record.word,
                record.image_bytes
            );
            Ok(record)
        })
    }
}
