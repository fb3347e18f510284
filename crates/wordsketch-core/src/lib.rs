//! WordSketch Core Library
//!
//! Platform-agnostic data model and logic for the word drawing game: strokes,
//! brush, coordinate mapping, the capture state machine and offline caching.

pub mod brush;
pub mod cache;
pub mod capture;
pub mod collab;
pub mod drawing;
pub mod geometry;
pub mod input;
pub mod observer;
pub mod storage;
pub mod stroke;
pub mod word_set;

pub use brush::{Brush, BrushError, BrushSize, parse_color};
pub use cache::{Clock, ManualClock, OfflineCache, SystemClock, TtlPolicy};
pub use capture::{CaptureState, StrokeCapture, StrokeEnd};
pub use collab::{
    NewSubmission, Role, Session, SessionProvider, SourceError, SubmissionApi, SubmissionError,
    SubmissionRecord, WordSetSource,
};
pub use drawing::Drawing;
pub use geometry::SurfaceGeometry;
pub use input::{GesturePhase, PointerEvent, RawPointer};
pub use observer::{Observers, StrokeObserver};
pub use storage::{BoxFuture, FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use stroke::Stroke;
pub use word_set::{WordItem, WordListError, WordSet};
