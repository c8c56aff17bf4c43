use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::Sha256;

/// Number of PBKDF2 rounds used for new hashes
const PBKDF2_ITERATIONS: u32 = 100_000;
/// Length of the random per-password salt in bytes
const SALT_LEN: usize = 16;
/// Length of the derived key in bytes
const HASH_LEN: usize = 32;

/// Identifier prefix embedded in every hash string
const SCHEME: &str = "pbkdf2-sha256";

/// Hash a password with PBKDF2-HMAC-SHA256 and a fresh random salt.
///
/// The output is self-describing:
/// `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`, so verification
/// needs no external state and the format can evolve per password.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill(&mut salt);

    let mut derived = [0u8; HASH_LEN];
    pbkdf2::<Hmac<Sha256>>(
        password.as_bytes(),
        &salt,
        PBKDF2_ITERATIONS,
        &mut derived,
    );

    format!(
        "{}${}${}${}",
        SCHEME,
        PBKDF2_ITERATIONS,
        hex::encode(salt),
        hex::encode(derived)
    )
}

/// Verify a plaintext password against a stored hash string.
///
/// Malformed hash strings verify as false; this never panics or errors.
pub fn verify_password(plain: &str, hash_string: &str) -> bool {
    let mut parts = hash_string.split('$');

    let (scheme, iterations, salt_hex, hash_hex) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(scheme), Some(iters), Some(salt), Some(hash), None) => {
            (scheme, iters, salt, hash)
        }
        _ => return false,
    };

    if scheme != SCHEME {
        return false;
    }
    let iterations: u32 = match iterations.parse() {
        Ok(n) if n > 0 => n,
        _ => return false,
    };
    let salt = match hex::decode(salt_hex) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let expected = match hex::decode(hash_hex) {
        Ok(h) if h.len() == HASH_LEN => h,
        _ => return false,
    };

    let mut derived = [0u8; HASH_LEN];
    pbkdf2::<Hmac<Sha256>>(plain.as_bytes(), &salt, iterations, &mut derived);

    constant_time_eq(&derived, &expected)
}

/// Compare two digests without short-circuiting on the first mismatch
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
