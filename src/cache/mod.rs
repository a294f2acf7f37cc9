//! Local jar cache
//!
//! A single directory holding at most one Checkstyle jar once things settle.
//! A version switch briefly leaves the old and new jar side by side until
//! the janitor runs.
//!
//! | Entry | Meaning |
//! |-------|---------|
//! | `checkstyle-<version>-all.jar` | Downloaded artifact for `<version>` |
//! | anything else | Leftover, removed on the next cleanup |

pub mod janitor;
pub mod store;

pub use janitor::{CacheJanitor, CleanupReport};
pub use store::ArtifactStore;
