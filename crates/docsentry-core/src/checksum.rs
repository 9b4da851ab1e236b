//! Verhoeff checksum over 12-digit identity numbers.
//!
//! The check works in the dihedral group D5: each digit is permuted by its
//! position (mod 8) and folded into an accumulator through the group's
//! multiplication table. A string is valid when the accumulator ends at 0.
//!
//! Detects every single-digit substitution and every adjacent transposition.

/// Length of a national identity number.
pub const IDENTITY_LEN: usize = 12;

/// Multiplication table of D5.
const D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Position-dependent permutation table (row = position mod 8).
const P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Returns `true` when `s` is exactly 12 ASCII digits and its Verhoeff
/// accumulator reduces to zero.
///
/// Anything else (wrong length, spaces, non-digits) is simply invalid.
pub fn validate(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != IDENTITY_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let c = bytes
        .iter()
        .rev()
        .enumerate()
        .fold(0u8, |c, (i, &b)| {
            let permuted = P[i % 8][(b - b'0') as usize];
            D[c as usize][permuted as usize]
        });

    c == 0
}
