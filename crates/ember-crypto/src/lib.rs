pub mod hash;
pub mod merkle;

pub use hash::{blake3_hash, leaf_hash};
pub use merkle::{build_proof, build_root, verify_proof};
