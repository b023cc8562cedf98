use fairswap::{ComputationResult, Encoding};
use ruint::aliases::U256;

/// A computation result whose numbers are derived from `id`.
pub fn computation(id: u64) -> ComputationResult {
    use rand::{RngCore as _, SeedableRng as _};
    let mut seed = [0; 16];
    seed[0..8].copy_from_slice(&id.to_le_bytes());
    let mut rng = rand_pcg::Lcg64Xsh32::from_seed(seed);
    let mut number = || {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        U256::from_be_bytes(bytes)
    };
    ComputationResult {
        result: number(),
        nonce: number(),
        key: number(),
    }
}

/// Flip the lowest bit of the last byte of garbled leaf `leaf`.
#[allow(dead_code)]
pub fn tamper(encoding: &Encoding, leaf: usize) -> Encoding {
    let mut tampered = encoding.clone();
    let mut bytes = hex::decode(&tampered.leaves[leaf]).unwrap();
    *bytes.last_mut().unwrap() ^= 1;
    tampered.leaves[leaf] = hex::encode(bytes);
    tampered
}
