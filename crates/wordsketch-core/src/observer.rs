//! Change notification for committed strokes.

use crate::stroke::Stroke;

/// Receives the full ordered stroke list whenever it changes.
pub trait StrokeObserver {
    fn strokes_changed(&mut self, strokes: &[Stroke]);
}

impl<F> StrokeObserver for F
where
    F: FnMut(&[Stroke]),
{
    fn strokes_changed(&mut self, strokes: &[Stroke]) {
        self(strokes)
    }
}

/// Registered observers, notified in subscription order.
#[derive(Default)]
pub struct Observers {
    observers: Vec<Box<dyn StrokeObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn StrokeObserver>) {
        self.observers.push(observer);
    }

    pub fn notify(&mut self, strokes: &[Stroke]) {
        log::trace!(
            "Notifying {} observers of {} strokes",
            self.observers.len(),
            strokes.len()
        );
        for observer in &mut self.observers {
            observer.strokes_changed(strokes);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}
