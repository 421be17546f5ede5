//! Cipher service trait.
//!
//! The `encrypt`/`decrypt` commands delegate to an external cipher; the
//! engine only defines the seam. Sessions run fine without a provider --
//! the commands then report that no cipher service is available.

/// Abstraction over a password-based message cipher.
///
/// Implementations decide the algorithm and the text encoding of the
/// ciphertext; the engine treats both directions as opaque strings.
pub trait CipherService {
    /// Encrypt `message` with `password`, returning printable ciphertext.
    fn encrypt(&self, message: &str, password: &str) -> String;

    /// Decrypt `ciphertext` with `password`. Returns `None` when the
    /// ciphertext does not decode under the given password.
    fn decrypt(&self, ciphertext: &str, password: &str) -> Option<String>;
}
