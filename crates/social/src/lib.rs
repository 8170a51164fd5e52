mod lock;
mod policy;
mod query;
mod root;
mod scheduler;
pub mod store;

pub use lock::EventLocks;
pub use policy::Policy;
pub use query::*;
pub use root::*;
pub use scheduler::scheduler;
