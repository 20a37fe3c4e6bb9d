pub mod vectors;

pub use vectors::{ElementType, GroundTruth, QueryVectors, VectorProfile};
