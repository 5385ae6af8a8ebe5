#[cfg(feature = "qdrant")]
pub mod qdrant;
pub mod storage;

pub use storage::DocumentRepository;
