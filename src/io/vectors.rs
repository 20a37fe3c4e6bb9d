//! Binary vector file loaders.
//!
//! Two fixed-header little-endian formats feed request payloads into the
//! cache:
//!
//! ```text
//!   query file                        ground-truth file
//!   ┌──────────────┐                  ┌──────────────┐
//!   │ u32 num_vecs │                  │ u32 num_vecs │
//!   │ u32 dim      │                  │ u32 top_k    │
//!   ├──────────────┤                  ├──────────────┤
//!   │ vec 0        │ dim × elem_size  │ ids 0        │ top_k × 4 bytes
//!   │ vec 1        │                  │ ids 1        │
//!   │ …            │                  │ …            │
//!   └──────────────┘                  └──────────────┘
//! ```
//!
//! The declared record count is authoritative: a shorter body is rejected,
//! trailing extra bytes are ignored with a warning. Malformed files never
//! reach the cache; each query vector becomes one [`FixedBuffer`] payload.

use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

use crate::error::{ConfigError, LoadError};
use crate::store::FixedBuffer;

/// Scalar element type of a query vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// Unsigned 8-bit components.
    U8,
    /// Signed 8-bit components.
    I8,
    /// IEEE-754 single-precision components.
    F32,
}

impl ElementType {
    /// Bytes occupied by one component.
    pub fn byte_size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::F32 => 4,
        }
    }
}

impl FromStr for ElementType {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "uint8" => Ok(Self::U8),
            "int8" => Ok(Self::I8),
            "float" | "float32" => Ok(Self::F32),
            other => Err(ConfigError::new(format!("unknown vector type: {other}"))),
        }
    }
}

/// Shape of the vectors in a query file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorProfile {
    /// Component type.
    pub element: ElementType,
    /// Components per vector.
    pub dimension: usize,
}

impl VectorProfile {
    /// Creates a profile.
    pub fn new(element: ElementType, dimension: usize) -> Self {
        Self { element, dimension }
    }

    /// Bytes occupied by one vector.
    pub fn record_len(&self) -> usize {
        self.dimension * self.element.byte_size()
    }
}

fn u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Query vectors loaded into owned payload buffers.
#[derive(Debug)]
pub struct QueryVectors {
    profile: VectorProfile,
    vectors: Vec<FixedBuffer>,
}

impl QueryVectors {
    /// Loads a query file, validating its header against `profile`.
    pub fn load(path: impl AsRef<Path>, profile: VectorProfile) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = std::fs::read(path)?;
        if raw.len() < 8 {
            return Err(LoadError::Header(format!(
                "{}: file shorter than the 8-byte header",
                path.display()
            )));
        }

        let num_vectors = u32_le(&raw[0..4]) as usize;
        let dimension = u32_le(&raw[4..8]) as usize;
        if dimension == 0 {
            return Err(LoadError::Header(format!(
                "{}: zero dimension",
                path.display()
            )));
        }
        if dimension != profile.dimension {
            return Err(LoadError::Header(format!(
                "{}: file dimension {} does not match profile dimension {}",
                path.display(),
                dimension,
                profile.dimension
            )));
        }

        let record_len = profile.record_len();
        let expected = 8 + num_vectors * record_len;
        if raw.len() < expected {
            return Err(LoadError::Truncated {
                expected,
                actual: raw.len(),
            });
        }
        if raw.len() > expected {
            warn!(
                "{}: ignoring {} trailing bytes beyond the declared {} vectors",
                path.display(),
                raw.len() - expected,
                num_vectors
            );
        }

        let vectors = raw[8..expected]
            .chunks_exact(record_len)
            .map(FixedBuffer::copy_of)
            .collect();
        debug!(
            "{}: loaded {} vectors of {} bytes",
            path.display(),
            num_vectors,
            record_len
        );
        Ok(Self { profile, vectors })
    }

    /// Number of loaded vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` if the file declared no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Profile the vectors were validated against.
    pub fn profile(&self) -> VectorProfile {
        self.profile
    }

    /// Returns the `index`-th vector payload.
    pub fn get(&self, index: usize) -> Option<&FixedBuffer> {
        self.vectors.get(index)
    }

    /// Iterates vector payloads in file order.
    pub fn iter(&self) -> impl Iterator<Item = &FixedBuffer> {
        self.vectors.iter()
    }
}

/// Per-query top-K neighbor IDs.
#[derive(Debug)]
pub struct GroundTruth {
    top_k: usize,
    ids: Vec<u32>,
}

impl GroundTruth {
    /// Loads a ground-truth file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = std::fs::read(path)?;
        if raw.len() < 8 {
            return Err(LoadError::Header(format!(
                "{}: file shorter than the 8-byte header",
                path.display()
            )));
        }

        let num_vectors = u32_le(&raw[0..4]) as usize;
        let top_k = u32_le(&raw[4..8]) as usize;
        if top_k == 0 && num_vectors > 0 {
            return Err(LoadError::Header(format!(
                "{}: zero top-k for {} records",
                path.display(),
                num_vectors
            )));
        }

        let expected = 8 + num_vectors * top_k * 4;
        if raw.len() < expected {
            return Err(LoadError::Truncated {
                expected,
                actual: raw.len(),
            });
        }
        if raw.len() > expected {
            warn!(
                "{}: ignoring {} trailing bytes beyond the declared {} records",
                path.display(),
                raw.len() - expected,
                num_vectors
            );
        }

        let ids = raw[8..expected]
            .chunks_exact(4)
            .map(u32_le)
            .collect::<Vec<_>>();
        debug!(
            "{}: loaded {} ground-truth records (top-{})",
            path.display(),
            num_vectors,
            top_k
        );
        Ok(Self { top_k, ids })
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        if self.top_k == 0 {
            0
        } else {
            self.ids.len() / self.top_k
        }
    }

    /// Returns `true` if the file declared no records.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Neighbors retained per query.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Neighbor IDs of the `index`-th query.
    pub fn neighbors(&self, index: usize) -> Option<&[u32]> {
        let start = index.checked_mul(self.top_k)?;
        let end = start.checked_add(self.top_k)?;
        self.ids.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_query_file(path: &Path, dimension: u32, vectors: &[Vec<u8>]) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(&(vectors.len() as u32).to_le_bytes()).unwrap();
        file.write_all(&dimension.to_le_bytes()).unwrap();
        for vector in vectors {
            file.write_all(vector).unwrap();
        }
    }

    #[test]
    fn element_type_names_parse() {
        assert_eq!("uint8".parse::<ElementType>().unwrap(), ElementType::U8);
        assert_eq!("INT8".parse::<ElementType>().unwrap(), ElementType::I8);
        assert_eq!("float".parse::<ElementType>().unwrap(), ElementType::F32);
        assert!("double".parse::<ElementType>().is_err());
    }

    #[test]
    fn query_vectors_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.bin");
        write_query_file(&path, 4, &[vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);

        let profile = VectorProfile::new(ElementType::U8, 4);
        let vectors = QueryVectors::load(&path, profile).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.get(0).unwrap().as_slice(), &[1, 2, 3, 4]);
        assert_eq!(vectors.get(1).unwrap().as_slice(), &[5, 6, 7, 8]);
        assert!(vectors.get(2).is_none());
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.bin");
        write_query_file(&path, 4, &[vec![0; 4]]);

        let profile = VectorProfile::new(ElementType::U8, 8);
        assert!(matches!(
            QueryVectors::load(&path, profile),
            Err(LoadError::Header(_))
        ));
    }

    #[test]
    fn truncated_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&3u32.to_le_bytes()).unwrap();
        file.write_all(&4u32.to_le_bytes()).unwrap();
        file.write_all(&[0u8; 4]).unwrap(); // 1 of 3 declared vectors

        let profile = VectorProfile::new(ElementType::U8, 4);
        assert!(matches!(
            QueryVectors::load(&path, profile),
            Err(LoadError::Truncated { expected: 20, actual: 12 })
        ));
    }

    #[test]
    fn ground_truth_slices_by_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gt.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&2u32.to_le_bytes()).unwrap();
        file.write_all(&3u32.to_le_bytes()).unwrap();
        for id in [10u32, 11, 12, 20, 21, 22] {
            file.write_all(&id.to_le_bytes()).unwrap();
        }

        let gt = GroundTruth::load(&path).unwrap();
        assert_eq!(gt.len(), 2);
        assert_eq!(gt.top_k(), 3);
        assert_eq!(gt.neighbors(0), Some(&[10, 11, 12][..]));
        assert_eq!(gt.neighbors(1), Some(&[20, 21, 22][..]));
        assert_eq!(gt.neighbors(2), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let profile = VectorProfile::new(ElementType::F32, 4);
        assert!(matches!(
            QueryVectors::load("/nonexistent/query.bin", profile),
            Err(LoadError::Io(_))
        ));
    }
}
