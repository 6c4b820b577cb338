//! Shared test data constants to avoid magic strings across integration tests

/// Long enough for the key prefix to be a strict prefix
pub const TEST_SERVICE_KEY: &str = "abc123def456ghi789jkl012mno345pqr678";

pub const USERS_PATH: &str = "/rest/v1/users";

pub const PREFER_REPRESENTATION: &str = "return=representation";
pub const PREFER_MINIMAL: &str = "return=minimal";
