//! Account password generation.
//!
//! Passwords are 32 characters drawn from an alphabet without look-alike
//! glyphs (no 0/O, 1/l/I) using the thread-local CSPRNG.

use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const PASSWORD_LEN: usize = 32;

/// Generate a fresh account password.
pub fn generate_password() -> String {
    let mut rng = rand::rng();

    let mut s = String::with_capacity(PASSWORD_LEN);
    for _ in 0..PASSWORD_LEN {
        s.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char);
    }
    s
}
