//! AES-256-GCM sealing and opening with a 128-bit nonce and detached tag.
//!
//! The 16-byte nonce is non-standard for GCM (96 bits is the fast path) but is
//! what the stored envelopes use; GCM derives the initial counter block from
//! it with GHASH, as OpenSSL does for any IV length other than 12 bytes.
//!
//! Nonces are drawn at random per call. With 128 random bits a collision under
//! one key is negligible at the volumes this crate is meant for.

use aes_gcm::{
    aead::{consts::U16, generic_array::GenericArray, AeadInPlace, KeyInit, OsRng},
    aes::Aes256,
    AesGcm,
};
use common::{VaultError, NONCE_LEN, TAG_LEN};
use zeroize::Zeroizing;

use super::kdf::DerivedKey;

/// AES-256-GCM with a 16-byte nonce and 16-byte tag.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Draw a fresh nonce from the OS CSPRNG.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    use aes_gcm::aead::rand_core::RngCore;
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt `plaintext` under `key` and `nonce`.
///
/// Returns the ciphertext (same length as `plaintext`) and the detached tag.
///
/// # Errors
///
/// Returns [`VaultError::Format`] only if `plaintext` exceeds the AES-GCM
/// message length limit (about 64 GiB).
pub fn seal(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN]), VaultError> {
    let cipher = build_cipher(key);
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), b"", &mut buffer)
        .map_err(|_| VaultError::Format("plaintext exceeds the AES-GCM length limit".into()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);
    Ok((buffer, tag_bytes))
}

/// Verify `tag` and decrypt `ciphertext`.
///
/// # Errors
///
/// Returns [`VaultError::Integrity`] if authentication fails, whatever the
/// cause. No plaintext bytes are released on failure.
pub fn open(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Vec<u8>, VaultError> {
    let cipher = build_cipher(key);
    // Wiped on drop if verification fails.
    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(nonce),
            b"",
            buffer.as_mut_slice(),
            GenericArray::from_slice(tag),
        )
        .map_err(|_| VaultError::Integrity)?;
    Ok(std::mem::take(&mut *buffer))
}

fn build_cipher(key: &DerivedKey) -> Aes256Gcm16 {
    Aes256Gcm16::new(GenericArray::from_slice(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn unhex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    /// Key derived from `"test-encryption-secret"` with default scrypt cost.
    fn reference_key() -> DerivedKey {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&unhex(
            "1230bb5912c8921a18a44ac877aeccb2d90bb1f61e79e08fc5dbd16926ef130c",
        ));
        DerivedKey::from_bytes(bytes)
    }

    fn random_key() -> DerivedKey {
        use aes_gcm::aead::rand_core::RngCore;
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        DerivedKey::from_bytes(bytes)
    }

    fn reference_nonce() -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        for (i, b) in nonce.iter_mut().enumerate() {
            *b = i as u8;
        }
        nonce
    }

    #[test]
    fn seal_open_round_trip() {
        let key = random_key();
        let nonce = generate_nonce();
        let (ct, tag) = seal(&key, &nonce, b"123-45-6789").unwrap();
        assert_eq!(open(&key, &nonce, &ct, &tag).unwrap(), b"123-45-6789");
    }

    #[test]
    fn ciphertext_length_equals_plaintext_length() {
        let key = random_key();
        let nonce = generate_nonce();
        for len in [0usize, 1, 15, 16, 17, 1000] {
            let (ct, _) = seal(&key, &nonce, &vec![7u8; len]).unwrap();
            assert_eq!(ct.len(), len);
        }
    }

    #[test]
    fn matches_reference_ciphertext() {
        // nonce ‖ tag ‖ ciphertext produced by an independent AES-256-GCM
        // implementation with a 16-byte IV.
        let expected = STANDARD
            .decode("AAECAwQFBgcICQoLDA0OD2lc54t2wWZkrVi8vcfCUwj11EdNAqMwthFY9iG4jOZXvvkGuM8=")
            .unwrap();
        let (ct, tag) =
            seal(&reference_key(), &reference_nonce(), b"my-secret-plaid-token").unwrap();
        assert_eq!(&expected[NONCE_LEN..NONCE_LEN + TAG_LEN], &tag);
        assert_eq!(&expected[NONCE_LEN + TAG_LEN..], ct.as_slice());
    }

    #[test]
    fn wrong_key_fails() {
        let nonce = generate_nonce();
        let (ct, tag) = seal(&random_key(), &nonce, b"secret").unwrap();
        let err = open(&random_key(), &nonce, &ct, &tag).unwrap_err();
        assert!(matches!(err, VaultError::Integrity));
    }

    #[test]
    fn wrong_nonce_fails() {
        let key = random_key();
        let (ct, tag) = seal(&key, &generate_nonce(), b"secret").unwrap();
        let err = open(&key, &generate_nonce(), &ct, &tag).unwrap_err();
        assert!(matches!(err, VaultError::Integrity));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = random_key();
        let nonce = generate_nonce();
        let (mut ct, tag) = seal(&key, &nonce, b"tamper me").unwrap();
        ct[0] ^= 0xFF;
        assert!(matches!(
            open(&key, &nonce, &ct, &tag).unwrap_err(),
            VaultError::Integrity
        ));
    }

    #[test]
    fn tampered_tag_fails() {
        let key = random_key();
        let nonce = generate_nonce();
        let (ct, mut tag) = seal(&key, &nonce, b"tamper me").unwrap();
        tag[TAG_LEN - 1] ^= 0x01;
        assert!(matches!(
            open(&key, &nonce, &ct, &tag).unwrap_err(),
            VaultError::Integrity
        ));
    }

    #[test]
    fn nonces_are_fresh() {
        assert_ne!(generate_nonce(), generate_nonce());
    }
}
