use std::sync::{Arc, Mutex, MutexGuard};

use super::router::DEFAULT_ALIAS;

/// Mutable slot holding the database alias selected for the current request.
///
/// One slot exists per request: the tenant-context middleware creates a fresh
/// slot at request entry and attaches it to the request extensions, which is
/// what guarantees that no alias chosen by an earlier request is ever
/// observed by a later one. The slot itself performs no isolation — a caller
/// that keeps reusing one instance across requests must call [`reset`]
/// (`RouteState::reset`) at each request boundary or the previous alias
/// leaks through (see the tests below).
///
/// The alias string is not validated here; whatever is set is surfaced
/// verbatim wherever the alias is consumed.
#[derive(Debug, Clone, Default)]
pub struct RouteState {
    current: Arc<Mutex<Option<String>>>,
}

impl RouteState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Current alias, lazily initialized to `"default"` on first access.
    pub fn get_current_alias(&self) -> String {
        self.slot()
            .get_or_insert_with(|| DEFAULT_ALIAS.to_string())
            .clone()
    }

    /// Overwrite the current alias. Any string is accepted.
    pub fn set_current_alias(&self, name: impl Into<String>) {
        *self.slot() = Some(name.into());
    }

    /// Return the slot to its pristine state. Request-lifecycle glue calls
    /// this (or creates a fresh slot) at request entry.
    pub fn reset(&self) {
        *self.slot() = None;
    }
}
