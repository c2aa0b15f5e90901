//! Thread-safe memoizing holder for a single computed value.
//!
//! The initializer runs at most once at a time. Callers racing on the first
//! `get` block until the running initializer finishes and then share its
//! outcome. A failed or absent result leaves the cache empty, so a later call
//! retries.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Initializer<T> = Box<dyn Fn() -> Result<Option<T>, BoxError> + Send + Sync>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum InitializationError {
    #[error("Lazy initializer produced no value")]
    Absent,
    #[error("Lazy initialization failed: {0}")]
    Failed(Arc<BoxError>),
}

struct State<T> {
    value: Option<T>,
    running: bool,
    /// Bumped every time an initializer run completes
    generation: u64,
    last_failure: Option<InitializationError>,
}

pub struct Lazy<T> {
    initializer: Initializer<T>,
    state: Mutex<State<T>>,
    finished: Condvar,
}

impl<T: Clone> Lazy<T> {
    /// Construct with an initializer that may report an absent value.
    pub fn new<F>(initializer: F) -> Self
    where
        F: Fn() -> Result<Option<T>, BoxError> + Send + Sync + 'static,
    {
        Self {
            initializer: Box::new(initializer),
            state: Mutex::new(State {
                value: None,
                running: false,
                generation: 0,
                last_failure: None,
            }),
            finished: Condvar::new(),
        }
    }

    /// Construct with an initializer that always yields a value.
    pub fn with<F>(initializer: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(move || Ok(Some(initializer())))
    }

    /// Get the value, running the initializer if this is the first successful call.
    pub fn get(&self) -> Result<T, InitializationError> {
        let mut state = self.lock();

        if let Some(value) = &state.value {
            return Ok(value.clone());
        }

        if state.running {
            let waiting_for = state.generation;
            while state.running {
                state = self
                    .finished
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            if let Some(value) = &state.value {
                return Ok(value.clone());
            }
            if state.generation == waiting_for + 1 {
                if let Some(failure) = &state.last_failure {
                    return Err(failure.clone());
                }
            }
        }

        state.running = true;
        drop(state);

        let outcome = match (self.initializer)() {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(InitializationError::Absent),
            Err(e) => Err(InitializationError::Failed(Arc::new(e))),
        };

        let mut state = self.lock();
        state.running = false;
        state.generation += 1;
        let result = match outcome {
            Ok(value) => {
                state.value = Some(value.clone());
                state.last_failure = None;
                Ok(value)
            }
            Err(e) => {
                state.last_failure = Some(e.clone());
                Err(e)
            }
        };
        drop(state);
        self.finished.notify_all();
        result
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().value.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: fmt::Display> fmt::Display for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match &state.value {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("<not initialized>"),
        }
    }
}

impl<T> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Lazy")
            .field("initialized", &state.value.is_some())
            .finish()
    }
}
