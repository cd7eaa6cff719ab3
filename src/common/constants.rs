//! Constants used throughout the crate

/// Crate version reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User a session gets when none is configured
pub const DEFAULT_USER: &str = "root";

/// Host reported for local sessions
pub const DEFAULT_HOST: &str = "localhost";

/// Longest table or column name accepted
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Cap on GET_LOCK waits that ask to wait forever (seconds)
pub const DEFAULT_LOCK_WAIT_TIMEOUT_SECS: u64 = 31_536_000;
