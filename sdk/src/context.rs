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

//! Where in a validation pass a certificate is being looked at.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// The validator currently in charge.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// The recursive chain walker.
    CertificateChain,

    /// The OCSP/CRL orchestrator.
    RevocationData,

    /// The single OCSP response check.
    Ocsp,

    /// The single CRL check.
    Crl,
}

/// The role a certificate plays in the structure that led to it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateSource {
    /// The certificate that signed the document.
    Signer,

    /// An issuer met while walking a chain upward.
    CertIssuer,

    /// The signer of an OCSP response.
    OcspIssuer,

    /// The signer of a CRL.
    CrlIssuer,

    /// The signer of a time stamp token.
    Timestamp,
}

/// Whether the validation date is "now" or a point in the past.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBasedContext {
    /// Validation as of the present moment.
    Present,

    /// Validation as of an earlier moment, such as when an OCSP response was
    /// produced.
    Historical,
}

/// Immutable description of why a certificate is being validated.
///
/// Deriving a new context with one of the `with_*` methods keeps the old one
/// reachable through [`previous()`](Self::previous), so the full trail of
/// roles that led to a certificate can be inspected.
#[derive(Clone, Debug)]
pub struct ValidationContext {
    validator: ValidatorKind,
    certificate_source: CertificateSource,
    time_based: TimeBasedContext,
    previous: Option<Arc<ValidationContext>>,
}

impl ValidationContext {
    /// Create a root context.
    pub fn new(
        validator: ValidatorKind,
        certificate_source: CertificateSource,
        time_based: TimeBasedContext,
    ) -> Self {
        Self {
            validator,
            certificate_source,
            time_based,
            previous: None,
        }
    }

    /// Context for validating a document signer as of now.
    pub fn signer() -> Self {
        Self::new(
            ValidatorKind::CertificateChain,
            CertificateSource::Signer,
            TimeBasedContext::Present,
        )
    }

    /// The validator in charge.
    pub fn validator(&self) -> ValidatorKind {
        self.validator
    }

    /// The role of the certificate under validation.
    pub fn certificate_source(&self) -> CertificateSource {
        self.certificate_source
    }

    /// Present or historical validation.
    pub fn time_based(&self) -> TimeBasedContext {
        self.time_based
    }

    /// The context this one was derived from.
    pub fn previous(&self) -> Option<&ValidationContext> {
        self.previous.as_deref()
    }

    /// Derive a context handled by another validator.
    pub fn with_validator(&self, validator: ValidatorKind) -> Self {
        if validator == self.validator {
            return self.clone();
        }
        Self {
            validator,
            ..self.derive()
        }
    }

    /// Derive a context for a certificate playing another role.
    pub fn with_certificate_source(&self, certificate_source: CertificateSource) -> Self {
        Self {
            certificate_source,
            ..self.derive()
        }
    }

    /// Derive a context evaluated at another kind of date.
    pub fn with_time_based(&self, time_based: TimeBasedContext) -> Self {
        Self {
            time_based,
            ..self.derive()
        }
    }

    /// Return `true` if any context on the trail had the given role.
    pub fn has_source_in_trail(&self, source: CertificateSource) -> bool {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if ctx.certificate_source == source {
                return true;
            }
            current = ctx.previous();
        }
        false
    }

    fn derive(&self) -> Self {
        Self {
            previous: Some(Arc::new(self.clone())),
            ..self.clone()
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::signer()
    }
}

impl PartialEq for ValidationContext {
    // The trail is history, not identity.
    fn eq(&self, other: &Self) -> bool {
        self.validator == other.validator
            && self.certificate_source == other.certificate_source
            && self.time_based == other.time_based
    }
}

impl Eq for ValidationContext {}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} / {:?} / {:?}",
            self.validator, self.certificate_source, self.time_based
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn signer_defaults() {
        let ctx = ValidationContext::default();
        assert_eq!(ctx.validator(), ValidatorKind::CertificateChain);
        assert_eq!(ctx.certificate_source(), CertificateSource::Signer);
        assert_eq!(ctx.time_based(), TimeBasedContext::Present);
        assert!(ctx.previous().is_none());
    }

    #[test]
    fn derivation_keeps_trail() {
        let root = ValidationContext::signer();
        let issuer = root.with_certificate_source(CertificateSource::CertIssuer);
        let responder = issuer
            .with_validator(ValidatorKind::Ocsp)
            .with_certificate_source(CertificateSource::OcspIssuer)
            .with_time_based(TimeBasedContext::Historical);

        assert_eq!(responder.certificate_source(), CertificateSource::OcspIssuer);
        assert_eq!(responder.time_based(), TimeBasedContext::Historical);
        assert_eq!(responder.validator(), ValidatorKind::Ocsp);

        assert!(responder.has_source_in_trail(CertificateSource::Signer));
        assert!(responder.has_source_in_trail(CertificateSource::CertIssuer));
        assert!(!responder.has_source_in_trail(CertificateSource::CrlIssuer));

        // The original is untouched.
        assert_eq!(root.certificate_source(), CertificateSource::Signer);
        assert_eq!(
            responder.previous().unwrap().previous().unwrap().validator(),
            ValidatorKind::Ocsp
        );
    }

    #[test]
    fn same_validator_does_not_grow_trail() {
        let ctx = ValidationContext::signer();
        let same = ctx.with_validator(ValidatorKind::CertificateChain);
        assert!(same.previous().is_none());
        assert_eq!(same, ctx);
    }
}
