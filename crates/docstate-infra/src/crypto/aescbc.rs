//! AES-256-CBC text filter pair for embedding secrets in templates.
//!
//! Wire format: `base64(iv (16 bytes) || ciphertext)`. Plaintext is padded
//! PKCS7-style before encryption: the pad value (1-16) equals the number of
//! bytes added, and a full pad block is appended even when the input already
//! ends on a block boundary, so unpadding only ever inspects the last byte.
//!
//! Key material shorter than 32 bytes is extended with a fixed known string
//! and truncated to 32. This weakens short keys considerably and exists only
//! for compatibility with templates already encrypted this way; there is no
//! key-derivation function and no authentication tag.

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;
use rand::rngs::OsRng;

use docstate_types::error::FilterError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const KEY_LEN: usize = 32;
const BLOCK_SIZE: usize = 16;

/// Fixed extension string for keys shorter than 32 bytes.
const KEY_FILL: &str = "VoyagerVoyagerVoyagerVoyagerVoyager";

/// Byte-wise `(key + KEY_FILL)[..32]`.
fn normalize_key(key: &str) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    for (slot, byte) in out.iter_mut().zip(key.bytes().chain(KEY_FILL.bytes())) {
        *slot = byte;
    }
    out
}

/// Encrypt a string for embedding in a text structure.
///
/// A fresh random 16-byte IV is drawn per call, so encrypting the same
/// plaintext twice produces different output.
pub fn encrypt(plaintext: &str, key: &str) -> String {
    let key = normalize_key(key);

    let mut iv = [0u8; BLOCK_SIZE];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut blob = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    STANDARD.encode(blob)
}

/// Decrypt a string produced by [`encrypt`].
pub fn decrypt(blob: &str, key: &str) -> Result<String, FilterError> {
    let key = normalize_key(key);

    let raw = STANDARD
        .decode(blob.trim())
        .map_err(|e| FilterError::Base64(e.to_string()))?;

    if raw.len() < BLOCK_SIZE {
        return Err(FilterError::CiphertextTooShort);
    }
    let (iv, ciphertext) = raw.split_at(BLOCK_SIZE);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(FilterError::NotBlockAligned);
    }

    let iv: [u8; BLOCK_SIZE] = iv.try_into().expect("split_at yields exactly one block");
    let plaintext = Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| FilterError::BadPadding)?;

    String::from_utf8(plaintext).map_err(|_| FilterError::NotUtf8)
}
