//! Per-request correlation tags.
//!
//! A tag looks like a UUID (`8-4-4-4-12` lowercase hex) but carries no
//! version or variant bits and comes from a non-cryptographic generator.
//! It is only ever written to logs. Never compare it, look anything up by
//! it, or base an access decision on it.

use std::fmt;

use rand::Rng;

/// Number of 16-bit groups drawn per tag.
const GROUPS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityTag(String);

impl IdentityTag {
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let g: [u16; GROUPS] = std::array::from_fn(|_| rng.gen());
        Self(format!(
            "{:04x}{:04x}-{:04x}-{:04x}-{:04x}-{:04x}{:04x}{:04x}",
            g[0], g[1], g[2], g[3], g[4], g[5], g[6], g[7]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn generate_tag() -> IdentityTag {
    IdentityTag::from_rng(&mut rand::thread_rng())
}
