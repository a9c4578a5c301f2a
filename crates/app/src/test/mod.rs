//! Shared test infrastructure.

mod context;
pub(crate) mod helpers;
pub(crate) mod memory;

pub use context::TestContext;
pub use db::TestDb;
