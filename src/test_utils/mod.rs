use std::sync::LazyLock;
use tokio::runtime::Runtime;

/// Shared tokio runtime for test utilities to avoid creating multiple runtimes
pub(crate) static SHARED_RUNTIME: LazyLock<Runtime> =
    LazyLock::new(|| Runtime::new().expect("Failed to create tokio runtime for test utilities"));

/// Embedded `PostgreSQL` for integration tests
pub mod embedded;

pub use embedded::*;

/// Schema slice and sample rows the main detector query runs against.
pub const QWPARITY_FIXTURE_SQL: &str = include_str!("../../sql/qwparity_fixture.sql");
