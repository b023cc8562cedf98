use fairswap::{
    decode_computation, encode_computation, encode_payload,
    fairswap_core::{
        dispute::{verify_complaint, Complaint},
        MismatchLevel,
    },
    Options,
};
use ruint::aliases::U256;

mod common;

#[test]
fn tampered_data_leaf_is_reported() {
    let computation = common::computation(7);
    let encoding = encode_computation(&computation, &Options::new()).unwrap();
    let tampered = common::tamper(&encoding, 1);
    let (leaves, hash_leaves) = tampered.split();

    let decoded = decode_computation(leaves, hash_leaves, computation.key).unwrap();
    assert_eq!(decoded.mismatches.len(), 1);
    let mismatch = &decoded.mismatches[0];
    assert_eq!(mismatch.level, MismatchLevel::Leaf);
    assert_eq!((mismatch.index_in, mismatch.index_out), (0, 2));
    assert_eq!(mismatch.in1, tampered.leaves[0]);
    assert_eq!(mismatch.in2, tampered.leaves[1]);
    assert_eq!(mismatch.out, tampered.leaves[2]);
    assert_ne!(mismatch.expected_digest, mismatch.actual_digest);
    assert_eq!(mismatch.proof_in1.len(), 2);
    assert_eq!(mismatch.proof_in2.len(), 2);
    assert_eq!(mismatch.proof_out.len(), 2);
}

#[test]
fn reported_mismatch_is_upheld() {
    let computation = common::computation(8);
    let encoding = encode_computation(&computation, &Options::new()).unwrap();
    let tampered = common::tamper(&encoding, 2);
    let (leaves, hash_leaves) = tampered.split();
    let root = fairswap::root_digest(leaves, hash_leaves).unwrap();
    let decoded = decode_computation(leaves, hash_leaves, computation.key).unwrap();
    assert_eq!(decoded.mismatches.len(), 1);

    let mismatch = &decoded.mismatches[0];
    let complaint = Complaint {
        garbled_leaf_count: 4,
        index_in: mismatch.index_in as u64,
        index_out: mismatch.index_out as u64,
        in1: hex::decode(&mismatch.in1).unwrap(),
        in2: hex::decode(&mismatch.in2).unwrap(),
        out: digest(&mismatch.out),
        proof_in1: digests(&mismatch.proof_in1),
        proof_in2: digests(&mismatch.proof_in2),
        proof_out: digests(&mismatch.proof_out),
    };
    let key = computation.key.to_be_bytes::<32>();
    assert_eq!(verify_complaint(&digest(&root), &key, &complaint), Ok(true));
}

fn digest(s: &str) -> [u8; 32] {
    hex::decode(s).unwrap().try_into().unwrap()
}

fn digests(v: &[String]) -> Vec<[u8; 32]> {
    v.iter().map(|s| digest(s)).collect()
}

#[test]
fn honest_encoding_has_no_mismatches() {
    let computation = common::computation(9);
    let encoding = encode_computation(&computation, &Options::new()).unwrap();
    let (leaves, hash_leaves) = encoding.split();
    let decoded = decode_computation(leaves, hash_leaves, computation.key).unwrap();
    assert!(decoded.mismatches.is_empty());
}

#[test]
fn wide_result_keeps_mismatches() {
    let encoding = encode_payload(&[9u8; 128], &[4; 32], &Options::new()).unwrap();
    let tampered = common::tamper(&encoding, 0);
    let (leaves, hash_leaves) = tampered.split();

    let decoded = decode_computation(leaves, hash_leaves, U256::from_be_bytes([4; 32])).unwrap();
    assert_eq!(decoded.result, None);
    assert_eq!(decoded.decoded.len(), 2);
    assert_eq!(decoded.mismatches.len(), 1);
    assert_eq!(decoded.mismatches[0].level, MismatchLevel::Leaf);
}
