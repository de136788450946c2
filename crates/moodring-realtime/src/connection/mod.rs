//! Connection handles and the process-wide connection pool.

pub mod handle;
pub mod pool;
