//! Repository Module
//!
//! Read-through accessors per entity kind. These are the only components that
//! talk to the external datastore: reads consult the cache registry first and
//! populate it on miss; writes go straight through and invalidate afterwards.

mod categories;
mod orders;
mod products;
mod users;

pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;
