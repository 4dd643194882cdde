use rand::Rng;

/// Alphabet secrets are drawn from
pub const SYMBOLS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890!\"$%&/()=?{}[]-_.:+*~#<>";

/// Generate a random secret of `length` symbols
pub fn generate_secret(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| SYMBOLS[rng.gen_range(0..SYMBOLS.len())] as char)
        .collect()
}

/// Salted one-way hash (bcrypt) of a secret or password
pub fn hash_secret(secret: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(secret, cost)
}

/// Check a plaintext against a stored hash. Malformed hashes never match.
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    bcrypt::verify(secret, hash).unwrap_or(false)
}
