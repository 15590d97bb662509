//! Font loading with request de-duplication.
//!
//! Concurrent requests for the same family share one in-flight future, so the
//! font service sees a single fetch however many callers are waiting.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, warn};
use parking_lot::Mutex;

/// Resolves once a family is usable, or fails with a reason
pub type FontFuture = BoxFuture<'static, Result<(), String>>;

/// External collaborator that makes a font family available for rendering
pub trait FontService: Send + Sync {
    fn load(&self, family: &str) -> FontFuture;
}

/// Font service for families bundled with the host; every request resolves
/// immediately
#[derive(Debug, Default, Clone)]
pub struct BuiltinFontService;

impl FontService for BuiltinFontService {
    fn load(&self, family: &str) -> FontFuture {
        debug!("Font '{}' served from built-in fonts", family);
        futures::future::ready(Ok(())).boxed()
    }
}

#[derive(Default)]
struct LoaderState {
    in_flight: HashMap<String, Shared<FontFuture>>,
    loaded: HashSet<String>,
}

/// De-duplicating front for a `FontService`
#[derive(Clone)]
pub struct FontLoader {
    service: Arc<dyn FontService>,
    state: Arc<Mutex<LoaderState>>,
}

impl std::fmt::Debug for FontLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FontLoader")
            .field("in_flight", &state.in_flight.len())
            .field("loaded", &state.loaded.len())
            .finish()
    }
}

impl FontLoader {
    pub fn new(service: Arc<dyn FontService>) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(LoaderState::default())),
        }
    }

    pub fn is_loaded(&self, family: &str) -> bool {
        self.state.lock().loaded.contains(family)
    }

    pub fn in_flight_count(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    /// Request `family`. The request is registered immediately; the returned
    /// future resolves to `true` when the font loaded and `false` when it
    /// failed. Failures are logged and never block the caller.
    pub fn load(&self, family: &str) -> impl Future<Output = bool> + Send + use<> {
        let family = family.to_owned();
        let pending = {
            let mut state = self.state.lock();
            if state.loaded.contains(&family) {
                None
            } else {
                let shared = state
                    .in_flight
                    .entry(family.clone())
                    .or_insert_with(|| {
                        debug!("Requesting font '{}'", family);
                        self.service.load(&family).shared()
                    })
                    .clone();
                Some(shared)
            }
        };
        let state = Arc::clone(&self.state);

        async move {
            let Some(pending) = pending else {
                return true;
            };
            let result = pending.clone().await;
            let mut state = state.lock();
            // A newer request may have replaced a failed fetch meanwhile
            if state.in_flight.get(&family).is_some_and(|f| f.ptr_eq(&pending)) {
                state.in_flight.remove(&family);
            }
            match result {
                Ok(()) => {
                    state.loaded.insert(family);
                    true
                }
                Err(reason) => {
                    warn!("Font '{}' failed to load, continuing without it: {}", family, reason);
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    struct FailingService;

    impl FontService for FailingService {
        fn load(&self, _family: &str) -> FontFuture {
            futures::future::ready(Err("offline".to_owned())).boxed()
        }
    }

    #[test]
    fn test_builtin_marks_family_loaded() {
        let loader = FontLoader::new(Arc::new(BuiltinFontService));
        assert!(block_on(loader.load("Ubuntu")));
        assert!(loader.is_loaded("Ubuntu"));
        assert_eq!(loader.in_flight_count(), 0);
    }

    #[test]
    fn test_failure_resolves_without_marking_loaded() {
        let loader = FontLoader::new(Arc::new(FailingService));
        assert!(!block_on(loader.load("Lobster")));
        assert!(!loader.is_loaded("Lobster"));
        assert_eq!(loader.in_flight_count(), 0);
    }
}
