//! One-time sign-up codes.

use crate::error::AppError;
use ring::rand::SecureRandom;

/// Largest multiple of 9000 below `u16::MAX`, for unbiased sampling.
const SAMPLE_LIMIT: u16 = 9000 * 7;

/// Generate a 4-digit code in `1000..=9999`.
pub fn generate_otp(rng: &dyn SecureRandom) -> Result<String, AppError> {
    let mut buf = [0u8; 2];
    loop {
        rng.fill(&mut buf)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;
        let n = u16::from_be_bytes(buf);
        if n < SAMPLE_LIMIT {
            return Ok((1000 + n % 9000).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::rand::SystemRandom;

    #[test]
    fn test_codes_are_four_digits() {
        let rng = SystemRandom::new();
        for _ in 0..200 {
            let code = generate_otp(&rng).unwrap();
            assert_eq!(code.len(), 4);
            let n: u32 = code.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }
}
