pub mod payload;

pub use payload::{FixedBuffer, PayloadStore};
