use crate::hash::blake3_hash;
use ember_core::types::MerkleRoot;

/// Combine two sibling hashes into their parent. The pair is sorted
/// bytewise before hashing, so the parent is independent of left/right
/// position and a proof carries no direction bits.
fn combine(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo);
    buf[32..].copy_from_slice(hi);
    blake3_hash(&buf)
}

/// Verify a membership proof: fold the running hash with each sibling in
/// order and compare the result against the committed root. An empty proof
/// is valid exactly when the leaf is itself the root (single-leaf tree).
pub fn verify_proof(leaf: [u8; 32], proof: &[[u8; 32]], root: &MerkleRoot) -> bool {
    let mut hash = leaf;
    for sibling in proof {
        hash = combine(&hash, sibling);
    }
    &hash == root.as_bytes()
}

/// Build the root the way the compatible generator does: adjacent nodes
/// pair left-to-right, each pair sorts before hashing, and an odd trailing
/// node is promoted to the next level unhashed. Small trees therefore
/// yield single-sibling or even empty proofs. Returns `None` for an empty
/// leaf set.
pub fn build_root(leaves: &[[u8; 32]]) -> Option<MerkleRoot> {
    if leaves.is_empty() {
        return None;
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    Some(MerkleRoot::from_bytes(level[0]))
}

/// Sibling list proving membership of `leaves[index]`. Returns `None` when
/// the index is out of range. A promoted odd node contributes no sibling
/// for that level.
pub fn build_proof(leaves: &[[u8; 32]], mut index: usize) -> Option<Vec<[u8; 32]>> {
    if index >= leaves.len() {
        return None;
    }
    let mut proof = Vec::new();
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let sibling = if index % 2 == 0 { index + 1 } else { index - 1 };
        if sibling < level.len() {
            proof.push(level[sibling]);
        }
        index /= 2;
        level = next_level(&level);
    }
    Some(proof)
}

fn next_level(level: &[[u8; 32]]) -> Vec<[u8; 32]> {
    let mut next = Vec::with_capacity(level.len() / 2 + 1);
    for pair in level.chunks(2) {
        if pair.len() == 2 {
            next.push(combine(&pair[0], &pair[1]));
        } else {
            next.push(pair[0]);
        }
    }
    next
}
