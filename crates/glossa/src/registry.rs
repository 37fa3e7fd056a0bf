//! Registry for output backends.

use crate::traits::Backend;
use std::sync::{OnceLock, RwLock};

/// Global registry of backends, in registration order.
static BACKENDS: RwLock<Vec<&'static dyn Backend>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom backend.
///
/// Built-in backends are registered automatically on first use; a custom
/// backend with the same target name as a built-in one is shadowed by it.
pub fn register_backend(backend: &'static dyn Backend) {
    init_builtin();
    BACKENDS.write().unwrap().push(backend);
}

/// Initialize built-in backends (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let mut backends = BACKENDS.write().unwrap();
        backends.push(&crate::output::cpp::CPP_BACKEND);
        backends.push(&crate::output::typescript::TYPESCRIPT_BACKEND);
        backends.push(&crate::output::pseudocode::PSEUDOCODE_BACKEND);
    });
}

/// Get a backend by target name.
pub fn get_backend(target: &str) -> Option<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap()
        .iter()
        .find(|b| b.target() == target)
        .copied()
}

/// List all registered backends.
pub fn backends() -> Vec<&'static dyn Backend> {
    init_builtin();
    BACKENDS.read().unwrap().clone()
}

/// List all registered target names.
pub fn backend_names() -> Vec<&'static str> {
    init_builtin();
    BACKENDS.read().unwrap().iter().map(|b| b.target()).collect()
}

/// Human-readable language name of a target; `py` names the source itself.
pub fn language_name(target: &str) -> Option<&'static str> {
    if target == "py" {
        return Some("Python");
    }
    get_backend(target).map(|b| b.language())
}
