// src/load_state.rs
use std::mem;

use tracing::debug;

use crate::data_types::SheetData;
use crate::error::FetchError;

/// Identifies one load request. Only the newest generation may change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        previous: Option<SheetData>,
    },
    Loaded(SheetData),
    Failed {
        error: FetchError,
        previous: Option<SheetData>,
    },
}

/// What [`SheetSession::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded,
    Failed(FetchError),
    /// A newer request was issued, or the session was invalidated, after
    /// this one went out. Nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct SheetSession {
    state: LoadState,
    generation: Generation,
}

impl SheetSession {
    pub fn new() -> Self {
        SheetSession::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        match &self.state {
            LoadState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Data currently on screen. Survives failed and in-flight loads.
    pub fn data(&self) -> Option<&SheetData> {
        match &self.state {
            LoadState::Idle => None,
            LoadState::Loaded(data) => Some(data),
            LoadState::Loading { previous } | LoadState::Failed { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    /// Start a request; any response from an earlier one becomes stale.
    pub fn begin(&mut self) -> Generation {
        self.generation = self.generation.next();
        let previous = self.take_data();
        self.state = LoadState::Loading { previous };
        self.generation
    }

    pub fn complete(
        &mut self,
        generation: Generation,
        result: Result<SheetData, FetchError>,
    ) -> Completion {
        if generation != self.generation {
            debug!(
                response = ?generation,
                current = ?self.generation,
                "discarding stale response"
            );
            return Completion::Stale;
        }

        match result {
            Ok(data) => {
                self.state = LoadState::Loaded(data);
                Completion::Loaded
            }
            Err(error) => {
                let previous = self.take_data();
                self.state = LoadState::Failed {
                    error: error.clone(),
                    previous,
                };
                Completion::Failed(error)
            }
        }
    }

    /// Orphan whatever is in flight. A pending load falls back to the data
    /// it was started over.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.next();
        if self.is_loading() {
            let previous = self.take_data();
            self.state = previous.map_or(LoadState::Idle, LoadState::Loaded);
        }
    }

    fn take_data(&mut self) -> Option<SheetData> {
        match mem::take(&mut self.state) {
            LoadState::Idle => None,
            LoadState::Loaded(data) => Some(data),
            LoadState::Loading { previous } | LoadState::Failed { previous, .. } => previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::Excuse;

    fn list(texts: &[&str]) -> SheetData {
        SheetData::List(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| Excuse {
                    id: i + 1,
                    text: text.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn successful_load_replaces_data() {
        let mut session = SheetSession::new();
        assert_eq!(session.state(), &LoadState::Idle);

        let first = session.begin();
        assert!(session.is_loading());
        assert_eq!(session.complete(first, Ok(list(&["a"]))), Completion::Loaded);

        let second = session.begin();
        assert_eq!(session.data(), Some(&list(&["a"])));
        assert_eq!(session.complete(second, Ok(list(&["b", "c"]))), Completion::Loaded);
        assert_eq!(session.data(), Some(&list(&["b", "c"])));
    }

    #[test]
    fn failure_keeps_previous_data() {
        let mut session = SheetSession::new();
        let first = session.begin();
        session.complete(first, Ok(list(&["kept"])));

        let second = session.begin();
        let error = FetchError::Parse("missing response prologue".to_string());
        assert_eq!(
            session.complete(second, Err(error.clone())),
            Completion::Failed(error.clone())
        );
        assert_eq!(session.data(), Some(&list(&["kept"])));
        assert_eq!(session.last_error(), Some(&error));

        // A second failure in a row still keeps it.
        let third = session.begin();
        session.complete(third, Err(error));
        assert_eq!(session.data(), Some(&list(&["kept"])));
    }

    #[test]
    fn late_response_from_superseded_request_is_discarded() {
        let mut session = SheetSession::new();
        let slow = session.begin();
        let fast = session.begin();

        assert_eq!(session.complete(fast, Ok(list(&["new"]))), Completion::Loaded);
        assert_eq!(session.complete(slow, Ok(list(&["old"]))), Completion::Stale);
        assert_eq!(session.data(), Some(&list(&["new"])));

        // A stale failure does not flip the state to Failed either.
        let slower = Generation(fast.0 - 1);
        assert_eq!(
            session.complete(slower, Err(FetchError::Network("timeout".to_string()))),
            Completion::Stale
        );
        assert_eq!(session.state(), &LoadState::Loaded(list(&["new"])));
    }

    #[test]
    fn invalidate_orphans_in_flight_request() {
        let mut session = SheetSession::new();
        let first = session.begin();
        session.complete(first, Ok(list(&["shown"])));

        let pending = session.begin();
        session.invalidate();
        assert!(!session.is_loading());
        assert_eq!(session.state(), &LoadState::Loaded(list(&["shown"])));
        assert_eq!(session.complete(pending, Ok(list(&["late"]))), Completion::Stale);
        assert_eq!(session.data(), Some(&list(&["shown"])));
    }

    #[test]
    fn invalidate_when_idle_only_bumps_generation() {
        let mut session = SheetSession::new();
        let before = session.generation();
        session.invalidate();
        assert!(session.generation() > before);
        assert_eq!(session.state(), &LoadState::Idle);
    }
}
