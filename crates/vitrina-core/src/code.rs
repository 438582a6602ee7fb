//! Verification-code generation.
//!
//! Codes are security-relevant secrets, so they come from a CSPRNG and are
//! sampled uniformly over [0, 999999] with rejection sampling, then
//! zero-padded — a code is always exactly 6 digits, never truncated.

use rand_core::RngCore;

pub const CODE_LEN: usize = 6;

const BOUND: u32 = 1_000_000;
// Largest multiple of BOUND representable in u32; values at or above it are
// rejected to keep the modulo unbiased.
const REJECT_ABOVE: u32 = u32::MAX - (u32::MAX % BOUND);

/// Draw a uniformly random 6-digit decimal code from `rng`.
pub fn generate<R: RngCore>(rng: &mut R) -> String {
  loop {
    let n = rng.next_u32();
    if n < REJECT_ABOVE {
      return format!("{:06}", n % BOUND);
    }
  }
}

#[cfg(test)]
mod tests {
  use rand_core::{Error, RngCore, impls};

  use super::*;

  /// An `RngCore` that replays a fixed sequence of u32s.
  struct Replay(Vec<u32>);

  impl RngCore for Replay {
    fn next_u32(&mut self) -> u32 { self.0.remove(0) }
    fn next_u64(&mut self) -> u64 { self.next_u32() as u64 }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
      impls::fill_bytes_via_next(self, dest)
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  #[test]
  fn small_values_are_zero_padded() {
    let mut rng = Replay(vec![42]);
    assert_eq!(generate(&mut rng), "000042");
  }

  #[test]
  fn values_above_rejection_limit_are_resampled() {
    let mut rng = Replay(vec![u32::MAX, 123_456]);
    assert_eq!(generate(&mut rng), "123456");
  }

  #[test]
  fn output_is_always_six_ascii_digits() {
    let mut rng = rand_core::OsRng;
    for _ in 0..256 {
      let code = generate(&mut rng);
      assert_eq!(code.len(), CODE_LEN);
      assert!(code.bytes().all(|b| b.is_ascii_digit()));
    }
  }
}
