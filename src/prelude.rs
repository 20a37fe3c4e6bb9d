pub use crate::builder::{CacheBuilder, DelayCache, EvictionPolicy};
pub use crate::io::{ElementType, GroundTruth, QueryVectors, VectorProfile};
pub use crate::policy::{FifoEngine, LfuEngine, LruEngine};
pub use crate::store::FixedBuffer;
pub use crate::traits::{
    CacheRequest, CacheStats, Classification, DelayableCache, DrainMode, Key,
};
pub use crate::workload::{KeyDistribution, KeyStream};
