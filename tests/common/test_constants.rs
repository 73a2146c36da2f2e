//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

/// Compute endpoint used by configuration fixtures.
pub const DEFAULT_ENDPOINT: &str = "https://compute.example.com/v2.1";

/// Token used by configuration fixtures.
pub const DEFAULT_TOKEN: &str = "gAAAAABexampletoken";

/// Region used by instance fixtures.
pub const DEFAULT_REGION: &str = "RegionOne";

/// Flavor used by instance fixtures.
pub const DEFAULT_FLAVOR: &str = "m1.small";

/// Image used by instance fixtures.
pub const DEFAULT_IMAGE: &str = "ubuntu-22.04";
