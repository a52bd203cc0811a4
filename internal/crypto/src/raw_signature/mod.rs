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

//! Signature verification seam.
//!
//! Everything that checks a signature (certificate issuance, OCSP responses,
//! CRLs) hands a [`SignedData`] and the signer's SubjectPublicKeyInfo to a
//! [`SignatureVerifier`]. The validators never touch key material directly.

mod native_verifier;
pub use native_verifier::NativeVerifier;

#[cfg(all(feature = "openssl", not(target_arch = "wasm32")))]
mod openssl_verifier;
#[cfg(all(feature = "openssl", not(target_arch = "wasm32")))]
pub use openssl_verifier::OpenSslVerifier;

mod validator;
pub use validator::{SignatureError, SignatureVerifier, SignedData};
