//! The reluctant doubling Luby sequence.
//!
//! This sequence is [A182105](https://oeis.org/A182105).

/// Infinite iterator yielding the Luby sequence scaled by a base value.
pub struct LubySequence {
    u: u64,
    v: u64,
    base: u64,
}

impl Default for LubySequence {
    fn default() -> LubySequence {
        LubySequence::new(1)
    }
}

impl LubySequence {
    /// Luby sequence with every term multiplied by `base`.
    pub fn new(base: u64) -> LubySequence {
        LubySequence { u: 1, v: 1, base }
    }

    /// Yields the next number of the Luby sequence.
    pub fn advance(&mut self) -> u64 {
        let result = self.v * self.base;

        // Method by Knuth 2012
        if (self.u & self.u.wrapping_neg()) == self.v {
            self.u += 1;
            self.v = 1;
        } else {
            self.v <<= 1;
        }

        result
    }
}

impl Iterator for LubySequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn luby_sequence() {
        let initial_terms: Vec<_> = LubySequence::default().take(64).collect();

        assert_eq!(
            initial_terms,
            vec![
                1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2,
                4, 8, 16, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1,
                2, 1, 1, 2, 4, 8, 16, 32, 1,
            ]
        )
    }

    proptest! {
        #[test]
        fn scaled_by_base(base in 1..1000u64) {
            let scaled = LubySequence::new(base).take(200);
            let unscaled = LubySequence::default().take(200);
            for (a, b) in scaled.zip(unscaled) {
                prop_assert_eq!(a, b * base);
            }
        }
    }
}
