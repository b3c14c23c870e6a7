//! Limits shared by every stage that operates on one expression pool.

/// Fixpoint cap for the canonicalizer.
pub const MAX_PASSES: usize = 64;
/// Largest power of a sum that expansion will multiply out.
pub const MAX_EXPAND_EXPONENT: u32 = 64;
/// Largest `|n|` for which `rational^n` is folded into one constant.
pub const MAX_EXACT_EXPONENT: u32 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub max_passes: usize,
    pub max_expand_exponent: u32,
    pub max_exact_exponent: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_passes: MAX_PASSES,
            max_expand_exponent: MAX_EXPAND_EXPONENT,
            max_exact_exponent: MAX_EXACT_EXPONENT,
        }
    }
}

impl Config {
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    pub fn with_max_expand_exponent(mut self, exponent: u32) -> Self {
        self.max_expand_exponent = exponent;
        self
    }

    pub fn with_max_exact_exponent(mut self, exponent: u32) -> Self {
        self.max_exact_exponent = exponent;
        self
    }
}
