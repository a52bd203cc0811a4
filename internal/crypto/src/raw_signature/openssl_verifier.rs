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

//! Signature verification through OpenSSL.

use openssl::{
    hash::MessageDigest,
    pkey::{PKey, Public},
    rsa::Padding,
    sign::{RsaPssSaltlen, Verifier},
};

use crate::{
    oids,
    raw_signature::{SignatureError, SignatureVerifier, SignedData},
};

/// A [`SignatureVerifier`] backed by the system (or vendored) OpenSSL.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenSslVerifier;

impl SignatureVerifier for OpenSslVerifier {
    fn verify(&self, data: &SignedData, spki: &[u8]) -> Result<(), SignatureError> {
        let key = PKey::public_key_from_der(spki).map_err(|_| SignatureError::InvalidPublicKey)?;

        let verified = match data.algorithm.as_str() {
            oids::ECDSA_WITH_SHA256 | oids::SHA256_WITH_RSA => {
                verify_digest(MessageDigest::sha256(), &key, data)?
            }
            oids::ECDSA_WITH_SHA384 | oids::SHA384_WITH_RSA => {
                verify_digest(MessageDigest::sha384(), &key, data)?
            }
            oids::ECDSA_WITH_SHA512 | oids::SHA512_WITH_RSA => {
                verify_digest(MessageDigest::sha512(), &key, data)?
            }
            oids::RSA_PSS => {
                verify_pss(MessageDigest::sha256(), &key, data)?
                    || verify_pss(MessageDigest::sha384(), &key, data)?
                    || verify_pss(MessageDigest::sha512(), &key, data)?
            }
            oids::ED25519 => {
                let mut verifier = Verifier::new_without_digest(&key)?;
                verifier.verify_oneshot(&data.signature, &data.tbs)?
            }
            other => return Err(SignatureError::UnsupportedAlgorithm(other.to_string())),
        };

        if verified {
            Ok(())
        } else {
            Err(SignatureError::SignatureMismatch)
        }
    }
}

fn verify_digest(
    md: MessageDigest,
    key: &PKey<Public>,
    data: &SignedData,
) -> Result<bool, SignatureError> {
    let mut verifier = Verifier::new(md, key)?;
    verifier.update(&data.tbs)?;
    Ok(verifier.verify(&data.signature)?)
}

fn verify_pss(
    md: MessageDigest,
    key: &PKey<Public>,
    data: &SignedData,
) -> Result<bool, SignatureError> {
    let mut verifier = Verifier::new(md, key)?;
    verifier.set_rsa_padding(Padding::PKCS1_PSS)?;
    verifier.set_rsa_pss_saltlen(RsaPssSaltlen::DIGEST_LENGTH)?;
    verifier.update(&data.tbs)?;
    Ok(verifier.verify(&data.signature).unwrap_or(false))
}
