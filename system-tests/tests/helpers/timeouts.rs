// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: Timeout Helpers
// Description: Resolve request and readiness timeouts for system tests.
// Purpose: Allow slow hosts to widen timeouts through the environment.
// Dependencies: system-tests
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Default timeout when no override is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns the configured timeout or the default.
pub fn resolve_timeout(config: &SystemTestConfig) -> Duration {
    config.timeout.unwrap_or(DEFAULT_TIMEOUT)
}
