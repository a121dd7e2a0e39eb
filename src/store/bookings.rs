use crate::models::{BookingCandidate, BookingEntry};

use super::error::ValidationError;

/// Handle returned by [`BookingStore::subscribe`]; pass it back to
/// [`BookingStore::unsubscribe`] to stop receiving snapshots.
pub type SubscriberId = usize;

/// Callback invoked synchronously with the full entry list after every
/// committed mutation.
type Subscriber = Box<dyn FnMut(&[BookingEntry])>;

/// The authoritative in-memory booking list. Entries keep insertion order
/// (new ones are appended, nothing re-sorts) and all validation happens here,
/// at the point of mutation, before anything is written.
///
/// The store expects a single owner: every mutation originates from one UI
/// event at a time, so there is no internal locking. A multi-threaded host
/// would have to wrap the whole store in a mutex to keep each
/// mutate-then-notify sequence atomic.
#[derive(Default)]
pub struct BookingStore {
    entries: Vec<BookingEntry>,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber_id: SubscriberId,
}

impl BookingStore {
    /// Create an empty store. Nothing is loaded from disk; the list lives and
    /// dies with the process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries in insertion order. Pure read, no side effects.
    pub fn entries(&self) -> &[BookingEntry] {
        &self.entries
    }

    /// Owned copy of the current entry list, the same shape subscribers
    /// receive.
    pub fn snapshot(&self) -> Vec<BookingEntry> {
        self.entries.clone()
    }

    /// Validate a candidate and append it. The checks run in a fixed order so
    /// the user always sees a single, deterministic message: blank name,
    /// duplicate name, missing dates, inverted range. The first failing check
    /// wins and the store is left untouched; only a successful append
    /// notifies subscribers.
    pub fn add(&mut self, candidate: BookingCandidate) -> Result<(), ValidationError> {
        if candidate.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.entries.iter().any(|entry| entry.name == candidate.name) {
            return Err(ValidationError::DuplicateName);
        }
        let (arrival_date, departure_date) =
            match (candidate.arrival_date, candidate.departure_date) {
                (Some(arrival), Some(departure)) => (arrival, departure),
                _ => return Err(ValidationError::MissingDateRange),
            };
        if departure_date < arrival_date {
            return Err(ValidationError::InvertedDateRange);
        }

        self.entries.push(BookingEntry {
            name: candidate.name,
            arrival_date,
            departure_date,
        });
        self.notify();
        Ok(())
    }

    /// Remove the first entry structurally equal to `entry` (name plus both
    /// dates). Deleting something that is not there is a no-op, not an error,
    /// so repeated deletes are harmless; only an actual removal notifies
    /// subscribers.
    pub fn delete(&mut self, entry: &BookingEntry) {
        if let Some(index) = self.entries.iter().position(|existing| existing == entry) {
            self.entries.remove(index);
            self.notify();
        }
    }

    /// Register an observer that receives the full updated list after every
    /// committed add or delete. Subscribers get snapshots, never a diff, and
    /// never a mutable handle on the store's own vector.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&[BookingEntry]) + 'static) -> SubscriberId {
        let id = self.next_subscriber_id;
        self.next_subscriber_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Drop a previously registered observer. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(existing, _)| *existing != id);
    }

    fn notify(&mut self) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.entries);
        }
    }
}
