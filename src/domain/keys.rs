//! SRA keypairs and per-player keychains.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// `(encKey, decKey, modulus)`. All three are big-integer strings; `dec_key`
/// is the secret half and is wiped on drop.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Keypair {
    pub enc_key: String,
    #[zeroize(skip)]
    pub modulus: String,
    pub dec_key: String,
}

impl Keypair {
    pub fn new(enc_key: impl Into<String>, dec_key: impl Into<String>, modulus: impl Into<String>) -> Self {
        Keypair {
            enc_key: enc_key.into(),
            dec_key: dec_key.into(),
            modulus: modulus.into(),
        }
    }
}

/// A player's ordered sequence of keypairs for the hand. The last keypair is
/// the one under which the final deck is encrypted and decrypted (§3, §9
/// self-decryption semantics).
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize, Zeroize)]
pub struct Keychain(pub Vec<Keypair>);

impl Keychain {
    pub fn new(keys: Vec<Keypair>) -> Self {
        Keychain(keys)
    }

    /// The keypair used during the hand: the last one committed.
    pub fn last(&self) -> Option<&Keypair> {
        self.0.last()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
