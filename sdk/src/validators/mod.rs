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

//! The four cooperating validators.
//!
//! [`CertificateChainValidator`] walks a certificate up to a trust anchor and
//! asks [`RevocationDataValidator`] about every certificate on the way. That
//! one orders the available OCSP and CRL evidence by recency and hands each
//! piece to [`OcspValidator`] or [`CrlValidator`], which in turn validate the
//! chain of the responder or CRL signer through the chain validator.

mod chain;
pub use chain::CertificateChainValidator;

mod crl;
pub use crl::CrlValidator;

mod ocsp;
pub use ocsp::OcspValidator;

mod revocation;
pub use revocation::{RevocationDataValidator, RevocationEvidence};

use certval_crypto::Certificate;

/// Fingerprints of the certificates currently being validated, outermost
/// first.
#[derive(Debug, Default)]
pub(crate) struct ValidationPath(Vec<Vec<u8>>);

impl ValidationPath {
    pub(crate) fn contains(&self, cert: &Certificate) -> bool {
        let fingerprint = cert.fingerprint();
        self.0.iter().any(|f| *f == fingerprint)
    }

    pub(crate) fn push(&mut self, cert: &Certificate) {
        self.0.push(cert.fingerprint());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}
