use rand::Rng;

/// Number of digits in a one-time password.
pub const OTP_LENGTH: usize = 6;

/// Generates a six-digit one-time password in `100000..=999999`.
pub fn generate() -> String {
    rand::thread_rng().gen_range(100_000..=999_999u32).to_string()
}
