//! Mock launcher for testing
//!
//! Records every descriptor it is asked to launch instead of spawning a
//! process, and can be told to fail like a missing binary would.

use super::{AppDescriptor, LaunchError, Launcher};
use std::sync::{Arc, Mutex};

/// Mock launcher that records calls instead of executing them
#[derive(Clone, Default)]
pub struct MockLauncher {
    calls: Arc<Mutex<Vec<AppDescriptor>>>,
    fail: bool,
}

impl MockLauncher {
    /// Create a mock whose launches succeed
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose launches are recorded but reported as failed
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Get all recorded launches
    pub fn calls(&self) -> Vec<AppDescriptor> {
        self.calls.lock().unwrap().clone()
    }

    /// Assert that no launches were attempted
    pub fn assert_no_calls(&self) {
        let calls = self.calls();
        assert!(calls.is_empty(), "Expected no calls but got: {:?}", calls);
    }

    /// Assert that exactly N launches were attempted
    pub fn assert_call_count(&self, expected: usize) {
        let calls = self.calls();
        assert_eq!(
            calls.len(),
            expected,
            "Expected {} calls but got {}: {:?}",
            expected,
            calls.len(),
            calls
        );
    }
}

impl Launcher for MockLauncher {
    fn launch(&self, app: &AppDescriptor) -> Result<(), LaunchError> {
        // Record instead of executing
        self.calls.lock().unwrap().push(app.clone());

        if self.fail {
            return Err(LaunchError::Spawn {
                program: app.program().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock launch failure"),
            });
        }
        Ok(())
    }
}
