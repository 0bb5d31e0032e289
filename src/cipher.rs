//! Symmetric codec for recipient addresses stored in encrypted form.
//!
//! Stored tokens have the shape `iv:ciphertext`, both halves hex-encoded.
//! The ciphertext is AES-256-CBC with PKCS#7 padding. Decoding is a pure
//! function over the token and the key; the key length is a startup
//! precondition, not a per-call check.

use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{CipherError, ConfigError};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size; the IV half of a token must decode to exactly this.
const BLOCK_LEN: usize = 16;

/// Codec over `iv:ciphertext` hex tokens.
#[derive(Clone)]
pub struct AddressCipher {
    key: [u8; 32],
}

impl AddressCipher {
    /// Create a codec from a 32-byte key.
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Create a codec from a key string.
    ///
    /// Accepts either a raw 32-byte key or a hex-encoded 64-character key.
    pub fn from_key_str(master_key: &str) -> Result<Self, ConfigError> {
        let key_bytes = if master_key.len() == 32 {
            master_key.as_bytes().to_vec()
        } else if master_key.len() == 64 {
            hex::decode(master_key)
                .map_err(|e| ConfigError(format!("invalid hex cipher key: {}", e)))?
        } else {
            return Err(ConfigError(
                "cipher key must be exactly 32 bytes or 64 hex characters".into(),
            ));
        };

        let mut key = [0u8; 32];
        key.copy_from_slice(&key_bytes);
        Ok(Self::new(key))
    }

    /// Decode an `iv:ciphertext` token back into the plaintext address.
    pub fn decode(&self, token: &str) -> Result<String, CipherError> {
        let (iv_hex, cipher_hex) = token.split_once(':').ok_or(CipherError::MalformedToken)?;
        if iv_hex.is_empty() || cipher_hex.is_empty() {
            return Err(CipherError::MalformedToken);
        }

        let iv = hex::decode(iv_hex).map_err(|e| CipherError::Encoding(e.to_string()))?;
        let ciphertext =
            hex::decode(cipher_hex).map_err(|e| CipherError::Encoding(e.to_string()))?;

        let decryptor = Aes256CbcDec::new_from_slices(&self.key, &iv)
            .map_err(|e| CipherError::Decryption(e.to_string()))?;
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|e| CipherError::Decryption(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| CipherError::Encoding(e.to_string()))
    }

    /// Encode a plaintext address into an `iv:ciphertext` token.
    ///
    /// The counterpart of [`decode`](Self::decode); used when provisioning
    /// encrypted rows and by the round-trip tests.
    pub fn encode(&self, plaintext: &str, iv: &[u8; BLOCK_LEN]) -> String {
        let ciphertext = Aes256CbcEnc::new((&self.key).into(), iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        format!("{}:{}", hex::encode(iv), hex::encode(ciphertext))
    }
}

impl std::fmt::Debug for AddressCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("AddressCipher").finish_non_exhaustive()
    }
}
