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

#![deny(warnings)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]

//! This library decides whether an X.509 certificate can be trusted at a
//! given point in time.
//!
//! It walks the certificate's issuance chain up to a trust anchor and checks
//! every certificate on the way for validity and revocation, using OCSP
//! responses and CRLs supplied by the caller. The outcome is a
//! [`ValidationReport`]: an ordered list of findings, each one INFO,
//! INDETERMINATE or INVALID, from which an overall result is derived.
//!
//! # Example: Validating a certificate
//!
//! ```
//! # use std::sync::Arc;
//! use certval::{
//!     crypto::{raw_signature::NativeVerifier, CertificateBuilder},
//!     TrustedCertificatesStore, ValidationContext, ValidationResult, ValidatorChainBuilder,
//! };
//! use chrono::Utc;
//!
//! # fn main() -> certval::Result<()> {
//! let root = CertificateBuilder::new("CN=Example Root").build();
//!
//! let mut store = TrustedCertificatesStore::new();
//! store.add_ca_trusted([root.clone()]);
//!
//! let chain = ValidatorChainBuilder::new()
//!     .trust_store(Arc::new(store))
//!     .signature_verifier(Arc::new(NativeVerifier))
//!     .build()?;
//!
//! let report = chain.certificate_chain_validator().validate_certificate(
//!     &root,
//!     &ValidationContext::signer(),
//!     Utc::now(),
//! )?;
//!
//! // A self-signed certificate needs no revocation data.
//! assert_eq!(report.result(), ValidationResult::Valid);
//! # Ok(())
//! # }
//! ```

/// Report types, re-exported from the `certval-report` crate.
pub use certval_report::{
    check_names, report_item, ItemStatus, ReportItem, ValidationReport, ValidationResult,
};

/// Certificate, OCSP and CRL decoding and signature verification,
/// re-exported from the `certval-crypto` crate.
pub use certval_crypto as crypto;

pub mod context;
pub use context::{CertificateSource, TimeBasedContext, ValidationContext, ValidatorKind};

mod error;
pub use error::{Error, Result, SourceError};

pub mod settings;
pub use settings::{
    ContinueAfterFailure, RequiredExtension, RequiredExtensions, ValidationSettings,
    ValidationSettingsBuilder,
};

pub mod sources;
pub use sources::{
    CertificateOrigin, CertificateRetriever, CrlData, CrlSource, IssuerCandidate, IssuerRetriever,
    OcspResponseData, OcspSource, StaticRevocationSource,
};

pub mod trust_store;
pub use trust_store::{TrustDomain, TrustedCertificatesStore};

mod validator_chain;
pub use validator_chain::{ValidatorChain, ValidatorChainBuilder};

pub mod validators;

#[cfg(test)]
pub(crate) mod tests;
