//! Eviction policy engines.
//!
//! Three implementations of [`crate::traits::DelayableCache`]:
//!
//! | Engine       | Eviction basis      | Hit behavior                |
//! |--------------|---------------------|-----------------------------|
//! | [`FifoEngine`] | insertion order   | none                        |
//! | [`LruEngine`]  | last access       | move to front               |
//! | [`LfuEngine`]  | access frequency  | advance frequency bucket    |

pub mod fifo;
pub mod lfu;
pub mod lru;

pub use fifo::FifoEngine;
pub use lfu::LfuEngine;
pub use lru::LruEngine;
