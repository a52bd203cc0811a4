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

//! Signature verification built on the RustCrypto crates.

use ecdsa::signature::{hazmat::PrehashVerifier, Verifier};
use p256::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use sha2::{Sha256, Sha384, Sha512};

use crate::{
    hash::HashAlgorithm,
    oids,
    raw_signature::{SignatureError, SignatureVerifier, SignedData},
};

/// A [`SignatureVerifier`] that needs no system libraries.
///
/// Supports ECDSA over P-256 and P-384, Ed25519, RSA PKCS#1 v1.5 and RSA-PSS
/// with SHA-2 digests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeVerifier;

impl SignatureVerifier for NativeVerifier {
    fn verify(&self, data: &SignedData, spki: &[u8]) -> Result<(), SignatureError> {
        match data.algorithm.as_str() {
            oids::ECDSA_WITH_SHA256 => verify_ecdsa(HashAlgorithm::Sha256, data, spki),
            oids::ECDSA_WITH_SHA384 => verify_ecdsa(HashAlgorithm::Sha384, data, spki),
            oids::ECDSA_WITH_SHA512 => verify_ecdsa(HashAlgorithm::Sha512, data, spki),
            oids::ED25519 => verify_ed25519(data, spki),
            oids::SHA256_WITH_RSA | oids::SHA384_WITH_RSA | oids::SHA512_WITH_RSA => {
                verify_rsa_pkcs1(data, spki)
            }
            oids::RSA_PSS => verify_rsa_pss(data, spki),
            other => Err(SignatureError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

fn verify_ecdsa(
    hash: HashAlgorithm,
    data: &SignedData,
    spki: &[u8],
) -> Result<(), SignatureError> {
    let digest = hash.digest(&data.tbs);

    // The curve is implied by the key, not the signature algorithm.
    if let Ok(vk) = p256::ecdsa::VerifyingKey::from_public_key_der(spki) {
        let sig = p256::ecdsa::Signature::from_der(&data.signature)
            .map_err(|_| SignatureError::InvalidSignature)?;
        return vk
            .verify_prehash(&digest, &sig)
            .map_err(|_| SignatureError::SignatureMismatch);
    }

    if let Ok(vk) = p384::ecdsa::VerifyingKey::from_public_key_der(spki) {
        let sig = p384::ecdsa::Signature::from_der(&data.signature)
            .map_err(|_| SignatureError::InvalidSignature)?;
        return vk
            .verify_prehash(&digest, &sig)
            .map_err(|_| SignatureError::SignatureMismatch);
    }

    Err(SignatureError::InvalidPublicKey)
}

fn verify_ed25519(data: &SignedData, spki: &[u8]) -> Result<(), SignatureError> {
    let vk = ed25519_dalek::VerifyingKey::from_public_key_der(spki)
        .map_err(|_| SignatureError::InvalidPublicKey)?;

    let sig = ed25519_dalek::Signature::from_slice(&data.signature)
        .map_err(|_| SignatureError::InvalidSignature)?;

    vk.verify_strict(&data.tbs, &sig)
        .map_err(|_| SignatureError::SignatureMismatch)
}

fn verify_rsa_pkcs1(data: &SignedData, spki: &[u8]) -> Result<(), SignatureError> {
    let key =
        RsaPublicKey::from_public_key_der(spki).map_err(|_| SignatureError::InvalidPublicKey)?;

    let sig = rsa::pkcs1v15::Signature::try_from(data.signature.as_slice())
        .map_err(|_| SignatureError::InvalidSignature)?;

    let result = match data.algorithm.as_str() {
        oids::SHA256_WITH_RSA => {
            rsa::pkcs1v15::VerifyingKey::<Sha256>::new(key).verify(&data.tbs, &sig)
        }
        oids::SHA384_WITH_RSA => {
            rsa::pkcs1v15::VerifyingKey::<Sha384>::new(key).verify(&data.tbs, &sig)
        }
        oids::SHA512_WITH_RSA => {
            rsa::pkcs1v15::VerifyingKey::<Sha512>::new(key).verify(&data.tbs, &sig)
        }
        other => return Err(SignatureError::UnsupportedAlgorithm(other.to_string())),
    };

    result.map_err(|_| SignatureError::SignatureMismatch)
}

fn verify_rsa_pss(data: &SignedData, spki: &[u8]) -> Result<(), SignatureError> {
    let key =
        RsaPublicKey::from_public_key_der(spki).map_err(|_| SignatureError::InvalidPublicKey)?;

    let sig = rsa::pss::Signature::try_from(data.signature.as_slice())
        .map_err(|_| SignatureError::InvalidSignature)?;

    // The digest lives in the algorithm parameters, which are not carried
    // through `SignedData`; try the SHA-2 family in turn.
    let matched = rsa::pss::VerifyingKey::<Sha256>::new(key.clone())
        .verify(&data.tbs, &sig)
        .is_ok()
        || rsa::pss::VerifyingKey::<Sha384>::new(key.clone())
            .verify(&data.tbs, &sig)
            .is_ok()
        || rsa::pss::VerifyingKey::<Sha512>::new(key)
            .verify(&data.tbs, &sig)
            .is_ok();

    if matched {
        Ok(())
    } else {
        Err(SignatureError::SignatureMismatch)
    }
}
