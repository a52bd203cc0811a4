// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use thiserror::Error;

/// The to-be-signed bytes of a certificate, CRL or OCSP response together
/// with its signature value and signature algorithm.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SignedData {
    /// Exact DER bytes covered by the signature.
    pub tbs: Vec<u8>,

    /// Raw signature value (DER for ECDSA, as it appears in the BIT STRING).
    pub signature: Vec<u8>,

    /// Dotted OID of the signature algorithm.
    pub algorithm: String,
}

impl SignedData {
    /// Bundle the pieces of a signed structure.
    pub fn new<A: Into<String>>(tbs: Vec<u8>, signature: Vec<u8>, algorithm: A) -> Self {
        Self {
            tbs,
            signature,
            algorithm: algorithm.into(),
        }
    }
}

/// A `SignatureVerifier` checks a signature against the DER-encoded
/// SubjectPublicKeyInfo of the presumed signer.
///
/// Implementations must be usable from several threads at once, since one
/// verifier is shared by every validator built from the same chain.
pub trait SignatureVerifier: Send + Sync {
    /// Return `Ok(())` if `data.signature` is a valid signature over
    /// `data.tbs` by the key in `spki`.
    fn verify(&self, data: &SignedData, spki: &[u8]) -> Result<(), SignatureError>;
}

/// Describes errors that can be identified when verifying a signature.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum SignatureError {
    /// The signature does not match the provided data or public key.
    #[error("the signature does not match the provided data or public key")]
    SignatureMismatch,

    /// An error was reported by the underlying cryptography implementation.
    #[error("an error was reported by the cryptography library: {0}")]
    CryptoLibraryError(String),

    /// An invalid public key was provided.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// An invalid signature value was provided.
    #[error("invalid signature value")]
    InvalidSignature,

    /// The signature uses an algorithm this verifier does not implement.
    #[error("signature uses an unsupported algorithm ({0})")]
    UnsupportedAlgorithm(String),
}

#[cfg(all(feature = "openssl", not(target_arch = "wasm32")))]
impl From<openssl::error::ErrorStack> for SignatureError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        Self::CryptoLibraryError(err.to_string())
    }
}
