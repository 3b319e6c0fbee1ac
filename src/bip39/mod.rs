//! BIP-39: mnemonic checksum.
//!
//! A mnemonic of N words carries 11 * N bits, MSB-first, one 11-bit index per
//! word. The first ENT = 32 * N / 3 bits are entropy, the remaining
//! CS = N / 3 bits must equal the first CS bits of SHA-256(entropy).
//!
//! | N  | ENT | CS |
//! |----|-----|----|
//! | 12 | 128 | 4  |
//! | 15 | 160 | 5  |
//! | 18 | 192 | 6  |
//! | 21 | 224 | 7  |
//! | 24 | 256 | 8  |

pub mod language;
pub mod wordlist;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::bip39::language::Language;
use crate::bip39::wordlist::Wordlist;
use crate::error::{Error, Result};

pub const ALLOWED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// A mnemonic length that BIP-39 allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordCount(usize);

impl WordCount {
  pub fn new(words: usize) -> Option<WordCount> {
    ALLOWED_WORD_COUNTS.contains(&words).then_some(WordCount(words))
  }

  pub fn from_entropy_len(bytes: usize) -> Option<WordCount> {
    // ENT = 32 * N / 3 bits  =>  N = 3 * bytes / 4
    if bytes % 4 != 0 {
      return None;
    }
    WordCount::new(3 * bytes / 4)
  }

  pub fn words(self) -> usize {
    self.0
  }

  /// CS in bits
  pub fn checksum_bits(self) -> usize {
    self.0 * 11 / 33
  }

  /// ENT in bits
  pub fn entropy_bits(self) -> usize {
    self.0 * 11 - self.checksum_bits()
  }

  /// ENT in bytes (always byte-aligned)
  pub fn entropy_bytes(self) -> usize {
    self.entropy_bits() / 8
  }
}

/// First `bits` bits of SHA-256(entropy), right-aligned.
fn checksum_of(entropy: &[u8], bits: usize) -> u8 {
  debug_assert!((1..=8).contains(&bits));
  let hash = Sha256::digest(entropy);
  hash[0] >> (8 - bits)
}

/// Reassemble 11-bit indices into entropy bytes and the trailing checksum bits.
pub(crate) fn split_indices(count: WordCount, indices: &[u16]) -> (Zeroizing<Vec<u8>>, u8) {
  debug_assert_eq!(indices.len(), count.words());

  let entropy_len = count.entropy_bytes();
  let mut entropy = Zeroizing::new(Vec::with_capacity(entropy_len));
  let mut buf: u32 = 0;
  let mut buf_bits: usize = 0;

  for &idx in indices {
    buf = (buf << 11) | u32::from(idx & 0x7FF);
    buf_bits += 11;
    while buf_bits >= 8 && entropy.len() < entropy_len {
      buf_bits -= 8;
      entropy.push((buf >> buf_bits) as u8);
      buf &= (1u32 << buf_bits) - 1;
    }
  }
  debug_assert_eq!(entropy.len(), entropy_len);
  debug_assert_eq!(buf_bits, count.checksum_bits());

  // buf now holds exactly CS bits
  (entropy, buf as u8)
}

/// Verify the BIP-39 checksum of a sequence of word indices.
///
/// Returns `Ok(false)` on a checksum mismatch. The full CS-bit values are
/// compared in constant time.
pub fn verify_checksum(indices: &[u16]) -> Result<bool> {
  let count = WordCount::new(indices.len()).ok_or(Error::InvalidWordCount(indices.len()))?;
  let (entropy, extracted) = split_indices(count, indices);
  let computed = checksum_of(&entropy, count.checksum_bits());
  Ok(computed.ct_eq(&extracted).into())
}

/// Encode entropy (16, 20, 24, 28 or 32 bytes) into 11-bit word indices,
/// checksum included.
pub fn entropy_to_indices(entropy: &[u8]) -> Result<Vec<u16>> {
  let count = WordCount::from_entropy_len(entropy.len())
    .ok_or(Error::InvalidEntropyLength(entropy.len()))?;

  // Entropy + single checksum byte, of which only CS bits are consumed
  let mut stream = Zeroizing::new(Vec::with_capacity(entropy.len() + 1));
  stream.extend_from_slice(entropy);
  stream.push(checksum_of(entropy, count.checksum_bits()) << (8 - count.checksum_bits()));

  let mut out = Vec::with_capacity(count.words());
  let mut buf: u32 = 0;
  let mut buf_bits: usize = 0;
  let mut remaining_bits = count.words() * 11;

  for &b in stream.iter() {
    if remaining_bits == 0 {
      break;
    }
    let take = remaining_bits.min(8);
    buf = (buf << take) | u32::from(b >> (8 - take));
    buf_bits += take;
    remaining_bits -= take;

    while buf_bits >= 11 {
      buf_bits -= 11;
      out.push(((buf >> buf_bits) & 0x7FF) as u16);
      buf &= (1u32 << buf_bits) - 1;
    }
  }
  debug_assert_eq!(remaining_bits, 0);
  debug_assert_eq!(buf_bits, 0);

  Ok(out)
}

/// Encode entropy as a mnemonic sentence in the given wordlist.
///
/// Japanese sentences are joined with the ideographic space (U+3000), all
/// others with a single ASCII space.
pub fn entropy_to_mnemonic(entropy: &[u8], wordlist: &Wordlist) -> Result<String> {
  let separator = match wordlist.language() {
    Language::Japanese => "\u{3000}",
    _ => " ",
  };
  let words = entropy_to_indices(entropy)?
    .into_iter()
    .filter_map(|idx| wordlist.word(idx))
    .collect::<Vec<_>>();
  Ok(words.join(separator))
}

/* ----------------------------- Tests ----------------------------- */
