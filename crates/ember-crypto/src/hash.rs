use ember_core::types::Address;

/// Compute BLAKE3 hash of arbitrary bytes → 32-byte array.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Leaf hash committing to one airdrop member: BLAKE3 of the raw address
/// bytes. The membership tree is built over these leaves.
pub fn leaf_hash(addr: &Address) -> [u8; 32] {
    blake3_hash(addr.as_bytes())
}
