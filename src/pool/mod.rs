//! Object pooling
//!
//! Pre-built entity pools and the registry that owns one pool per obstacle
//! category plus the pit pool.

mod object_pool;
mod pooled;
mod registry;

pub use object_pool::{Pool, PoolError, PoolIndex, PoolSpec};
pub use pooled::{CategoryId, Poolable, PooledObject};
pub use registry::{PoolHandle, PoolRegistry};
