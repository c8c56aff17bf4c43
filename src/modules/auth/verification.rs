use rand::distributions::Uniform;
use rand::Rng;

/// Default number of digits in an emailed verification code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generate a random numeric verification code of the given length.
///
/// Codes are scoped per account, so no cross-account collision avoidance
/// is attempted.
pub fn generate_verification_code(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Uniform::new(0, 10))
        .take(length)
        .map(|d: u32| d.to_string())
        .collect()
}
