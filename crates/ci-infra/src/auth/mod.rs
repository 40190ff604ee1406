//! Auth session adapter.

mod in_memory;

pub use in_memory::InMemoryAuthSession;
