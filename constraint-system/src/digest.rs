use md5::{Digest as Md5DigestTrait, Md5};
use plonk_cs_field::Field;
use sha2::Sha256;

/// Rolls a SHA-256 hash over every constraint accepted, in order, and
/// reduces it to an MD5 of the running 32-byte state on demand.
///
/// This is a deduplication fingerprint, not a cryptographic commitment
/// (§9): the SHA-256 -> MD5 pipeline exists only because an existing
/// downstream consumer expects exactly this byte layout, and must be
/// preserved bit-for-bit.
#[derive(Debug)]
pub struct DigestAccumulator {
    hasher: Sha256,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"plonk_constraint_system");
        DigestAccumulator { hasher }
    }

    /// Feeds a short ASCII tag identifying the constraint kind, e.g.
    /// `"equal"` or `"poseidon"` (§4.9).
    pub fn feed_tag(&mut self, tag: &str) {
        self.hasher.update(tag.as_bytes());
    }

    /// Feeds a `(coefficient, variable id)` term: the coefficient's
    /// fixed-length little-endian bytes, then the id as an 8-byte
    /// little-endian unsigned integer.
    pub fn feed_term<F: Field>(&mut self, coeff: F, id: u64) {
        self.hasher.update(coeff.to_bytes_le());
        self.hasher.update(id.to_le_bytes());
    }

    pub fn feed_terms<F: Field>(&mut self, terms: &[(F, u32)]) {
        for &(coeff, id) in terms {
            self.feed_term(coeff, id as u64);
        }
    }

    /// Feeds a bare field scalar with no accompanying id, used for the
    /// `m` and `c` selectors of a `Generic` constraint and the leading
    /// coefficient of each of its `l`/`r`/`o` arguments (§4.9).
    pub fn feed_scalar<F: Field>(&mut self, value: F) {
        self.hasher.update(value.to_bytes_le());
    }

    /// The digest at the current point: an MD5 of the SHA-256 state's raw
    /// 32-byte output. Does not consume or otherwise disturb the running
    /// hash, so it may be called at any point in the constraint stream.
    pub fn digest(&self) -> [u8; 16] {
        let sha_bytes = self.hasher.clone().finalize();
        let mut md5 = Md5::new();
        md5.update(sha_bytes);
        md5.finalize().into()
    }
}

impl Default for DigestAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
