use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a page identifier.
pub const ID_LENGTH: usize = 6;

/// Generate a short random page identifier.
///
/// Uniqueness is not checked here; the primary key constraint catches
/// collisions and the create path retries with a fresh identifier.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
