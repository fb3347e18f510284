//! Word progression and submission.

use crate::surface::DrawingSurface;
use wordsketch_core::{
    Clock, KeyValueStore, NewSubmission, OfflineCache, SubmissionApi, SubmissionError,
    SubmissionRecord, WordItem, WordSet, WordSetSource,
};

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// No current word, no strokes, or the drawing could not be exported.
    NothingToSubmit,
    Submitted(SubmissionRecord),
}

/// Result of moving past the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the word at this index.
    Next(usize),
    /// The last word was already current.
    Completed { total: usize },
}

/// Fetch the active word set, falling back to the cache when the source fails.
///
/// A fetched set is cached for later offline use. `None` means there are no
/// words to play.
pub async fn load_word_set<W, S, C>(source: &W, cache: &OfflineCache<S, C>) -> Option<WordSet>
where
    W: WordSetSource + ?Sized,
    S: KeyValueStore,
    C: Clock,
{
    match source.active_word_set().await {
        Ok(mut word_set) => {
            word_set.sort_items();
            if word_set.is_empty() {
                log::info!("Active word set {} has no words", word_set.id);
                return None;
            }
            if let Err(e) = cache.cache_word_set(&word_set).await {
                log::warn!("Failed to cache word set {}: {e}", word_set.id);
            }
            Some(word_set)
        }
        Err(e) => {
            log::warn!("Failed to fetch active word set, trying cache: {e}");
            cache.cached_word_set().await.filter(|set| !set.is_empty())
        }
    }
}

/// Walks a child through one word set.
#[derive(Debug, Clone)]
pub struct WordGame {
    word_set: WordSet,
    index: usize,
    submitted: Vec<usize>,
    score: u32,
}

impl WordGame {
    pub fn new(mut word_set: WordSet) -> Self {
        word_set.sort_items();
        Self {
            word_set,
            index: 0,
            submitted: Vec::new(),
            score: 0,
        }
    }

    pub fn word_set(&self) -> &WordSet {
        &self.word_set
    }

    pub fn current_word(&self) -> Option<&WordItem> {
        self.word_set.get(self.index)
    }

    /// One-based position and total, e.g. `(1, 5)` for "Word 1 of 5".
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.word_set.len())
    }

    pub fn position_label(&self) -> String {
        let (current, total) = self.position();
        format!("Word {current} of {total}")
    }

    /// Share of words submitted, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        if self.word_set.is_empty() {
            return 0.0;
        }
        self.submitted.len() as f64 / self.word_set.len() as f64 * 100.0
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_submitted(&self, index: usize) -> bool {
        self.submitted.contains(&index)
    }

    /// A word is showing and the surface has something drawn.
    pub fn can_submit(&self, surface: &DrawingSurface) -> bool {
        self.current_word().is_some() && !surface.strokes().is_empty()
    }

    /// Submit the current drawing.
    ///
    /// Saved progress for the word is cleared once the submission is stored.
    /// The surface is left as is; call [`advance`](Self::advance) to move on.
    pub async fn submit<A, S, C>(
        &mut self,
        surface: &DrawingSurface,
        api: &A,
        cache: &OfflineCache<S, C>,
    ) -> Result<SubmitOutcome, SubmissionError>
    where
        A: SubmissionApi + ?Sized,
        S: KeyValueStore,
        C: Clock,
    {
        let Some(item) = self.current_word().filter(|_| self.can_submit(surface)) else {
            return Ok(SubmitOutcome::NothingToSubmit);
        };
        let word_id = item.id();
        let word = item.word.clone();

        let image = match surface.export_raster() {
            Ok(image) => image,
            Err(e) => {
                log::error!("Failed to export drawing for {word:?}: {e}");
                return Ok(SubmitOutcome::NothingToSubmit);
            }
        };

        let record = api
            .submit(NewSubmission {
                word_id,
                word,
                stroke_data: surface.strokes().to_vec(),
                image,
            })
            .await?;

        if !self.submitted.contains(&self.index) {
            self.submitted.push(self.index);
        }
        self.score += 1;

        if let Err(e) = cache.clear_progress(word_id).await {
            log::warn!("Failed to clear saved progress for word {word_id}: {e}");
        }
        Ok(SubmitOutcome::Submitted(record))
    }

    /// Move to the next word and restart the surface.
    pub fn advance(&mut self, surface: &mut DrawingSurface) -> Advance {
        if self.index + 1 >= self.word_set.len() {
            let total = self.word_set.len();
            log::info!("Completed all {total} words");
            return Advance::Completed { total };
        }
        self.index += 1;
        surface.restart();
        Advance::Next(self.index)
    }

    /// Throw away the current drawing and try the same word again.
    pub fn restart_word(&self, surface: &mut DrawingSurface) {
        surface.restart();
    }

    /// Save the current drawing so it survives a reload.
    pub async fn save_progress<S: KeyValueStore, C: Clock>(
        &self,
        surface: &DrawingSurface,
        cache: &OfflineCache<S, C>,
    ) {
        let Some(item) = self.current_word() else {
            return;
        };
        if let Err(e) = cache.save_progress(item.id(), surface.strokes()).await {
            log::warn!("Failed to save progress for word {}: {e}", item.id());
        }
    }

    /// Restore saved strokes for the current word. Returns true if any were found.
    pub async fn resume_progress<S: KeyValueStore, C: Clock>(
        &self,
        surface: &mut DrawingSurface,
        cache: &OfflineCache<S, C>,
    ) -> bool {
        let Some(item) = self.current_word() else {
            return false;
        };
        match cache.load_progress(item.id()).await {
            Some(strokes) if !strokes.is_empty() => {
                surface.load_strokes(strokes);
                true
            }
            _ => false,
        }
    }
}
