use derive_more::Display;
use fnv::FnvHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Seed for the RNG that drives noise generation. Two maps generated from the
/// same seed and config are identical.
///
/// A seed can be given as a number or as any piece of text. Text that parses
/// as a `u64` is treated as that number, so `"42"` and `42` are the same seed.
/// Any other text is kept as-is and hashed into a `u64` when the RNG is
/// seeded, which lets people share maps with names like `"spice"`.
///
/// Seeds always serialize as a **string**, since JSON and TOML can't reliably
/// hold a full 64-bit unsigned integer.
#[derive(Clone, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SeedInput", into = "String")]
pub enum Seed {
    /// Used directly as the RNG seed
    Int(u64),
    /// Hashed into a `u64` before use
    Text(String),
}

impl Seed {
    /// Get the value that actually gets fed to the RNG
    pub fn to_u64(&self) -> u64 {
        match self {
            Self::Int(seed) => *seed,
            Self::Text(text) => {
                let mut hasher = FnvHasher::default();
                text.hash(&mut hasher);
                hasher.finish()
            }
        }
    }

    /// Pick a random integer seed
    pub fn random() -> Self {
        Self::Int(rand::random())
    }
}

impl From<u64> for Seed {
    fn from(seed: u64) -> Self {
        Self::Int(seed)
    }
}

impl From<&str> for Seed {
    fn from(seed: &str) -> Self {
        match seed.parse() {
            Ok(seed) => Self::Int(seed),
            Err(_) => Self::Text(seed.into()),
        }
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        match seed {
            Seed::Int(seed) => seed.to_string(),
            Seed::Text(text) => text,
        }
    }
}

/// Whatever a config file holds in the seed field. Numeric strings are
/// normalized to [Seed::Int] on conversion.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedInput {
    Int(u64),
    Text(String),
}

impl From<SeedInput> for Seed {
    fn from(input: SeedInput) -> Self {
        match input {
            SeedInput::Int(seed) => Self::Int(seed),
            SeedInput::Text(text) => text.as_str().into(),
        }
    }
}
