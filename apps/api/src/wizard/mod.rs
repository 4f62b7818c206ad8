// Eight-step intake wizard: explicit session context, in-memory store,
// summary view and HTTP handlers.

pub mod handlers;
pub mod session;
pub mod store;
pub mod summary;
