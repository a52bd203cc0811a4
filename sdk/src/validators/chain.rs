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

use certval_crypto::Certificate;
use certval_report::{check_names::*, report_item, ValidationReport, ValidationResult};
use chrono::{DateTime, Utc};

use crate::{
    context::{CertificateSource, ValidationContext, ValidatorKind},
    error::safe_call,
    trust_store::TrustDomain,
    validator_chain::ValidatorChain,
    validators::ValidationPath,
    Result,
};

/// Validates a certificate by walking its issuance chain up to a trust
/// anchor.
///
/// For every certificate on the way the walker checks the extensions its role
/// requires, consults the trust store, checks the validity interval and asks
/// the [`RevocationDataValidator`] for its revocation status. It then tries
/// every issuer candidate in turn, keeping the first one that leads to a
/// valid chain.
///
/// [`RevocationDataValidator`]: crate::validators::RevocationDataValidator
#[derive(Clone, Copy)]
pub struct CertificateChainValidator<'a> {
    chain: &'a ValidatorChain,
}

impl<'a> CertificateChainValidator<'a> {
    pub(crate) fn new(chain: &'a ValidatorChain) -> Self {
        Self { chain }
    }

    /// Validate `cert` as of `date` and return a new report.
    pub fn validate_certificate(
        &self,
        cert: &Certificate,
        ctx: &ValidationContext,
        date: DateTime<Utc>,
    ) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();
        self.validate(&mut report, ctx, cert, date)?;
        Ok(report)
    }

    /// Validate `cert` as of `date`, appending findings to `report`.
    ///
    /// `ctx` gives the role `cert` plays; use [`ValidationContext::signer()`]
    /// for a document signer.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        date: DateTime<Utc>,
    ) -> Result<()> {
        self.validate_with_path(report, ctx, cert, date, &mut ValidationPath::default())
    }

    pub(crate) fn validate_with_path(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        date: DateTime<Utc>,
        path: &mut ValidationPath,
    ) -> Result<()> {
        let ctx = ctx.with_validator(ValidatorKind::CertificateChain);
        self.validate_at_depth(report, &ctx, cert, date, 0, path)
    }

    fn validate_at_depth(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        date: DateTime<Utc>,
        depth: usize,
        path: &mut ValidationPath,
    ) -> Result<()> {
        log::debug!("validating {cert} as {ctx} at depth {depth}");

        if path.contains(cert) {
            report_item!(
                CERTIFICATE_CHECK,
                "possible validation cycle: certificate is already being validated"
            )
            .certificate(cert.label())
            .indeterminate(report);
            return Ok(());
        }

        self.check_required_extensions(report, ctx, cert, depth);
        if self.stop_on_failure(report) {
            return Ok(());
        }

        if self.check_trust(report, ctx, cert) {
            return Ok(());
        }

        self.check_validity(report, cert, date);

        path.push(cert);
        let outcome = self.validate_revocation_and_issuer(report, ctx, cert, date, depth, path);
        path.pop();
        outcome
    }

    fn validate_revocation_and_issuer(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        date: DateTime<Utc>,
        depth: usize,
        path: &mut ValidationPath,
    ) -> Result<()> {
        self.chain
            .revocation_data_validator()
            .validate_with_path(report, ctx, cert, date, path)?;

        if self.stop_on_failure(report) {
            return Ok(());
        }

        // Nothing above a self-signed certificate that was not trusted.
        if cert.is_self_signed() {
            return Ok(());
        }

        let label = cert.label();
        let Some(mut candidates) = safe_call(
            report,
            || self.chain.retriever().retrieve_issuer_candidates(cert),
            |err, report| {
                report_item!(CERTIFICATE_CHECK, "issuer certificate could not be retrieved")
                    .certificate(label.clone())
                    .cause(err)
                    .indeterminate(report)
            },
        )?
        else {
            return Ok(());
        };

        if candidates.is_empty() {
            report_item!(
                CERTIFICATE_CHECK,
                format!("issuer certificate {} is missing", cert.issuer())
            )
            .certificate(label)
            .indeterminate(report);
            return Ok(());
        }

        candidates.sort_by_key(|candidate| candidate.origin.rank());

        let issuer_ctx = ctx.with_certificate_source(CertificateSource::CertIssuer);
        let mut failed = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            let issuer = &candidate.certificate;
            log::debug!("trying issuer candidate {issuer} ({:?})", candidate.origin);

            let mut sub_report = ValidationReport::new();
            match self
                .chain
                .verifier()
                .verify(cert.signed_data(), issuer.spki())
            {
                Ok(()) => self.validate_at_depth(
                    &mut sub_report,
                    &issuer_ctx,
                    issuer,
                    date,
                    depth + 1,
                    path,
                )?,
                Err(err) => {
                    report_item!(
                        CERTIFICATE_CHECK,
                        format!("certificate signature could not be verified with the key of {issuer}")
                    )
                    .certificate(label.clone())
                    .cause(err)
                    .invalid(&mut sub_report);
                }
            }

            if sub_report.result() == ValidationResult::Valid {
                report.merge(&sub_report);
                return Ok(());
            }
            failed.push(sub_report);
        }

        for sub_report in &failed {
            report.merge(sub_report);
        }
        Ok(())
    }

    fn check_required_extensions(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        depth: usize,
    ) {
        for required in self
            .chain
            .settings()
            .required_extensions(ctx.certificate_source())
        {
            if !required.is_satisfied_by(cert, depth) {
                report_item!(
                    EXTENSIONS_CHECK,
                    format!("required extension {required} is missing or does not match")
                )
                .certificate(cert.label())
                .invalid(report);
            }
        }
    }

    // Returns `true` if `cert` is a trust anchor for its role.
    fn check_trust(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
    ) -> bool {
        let store = self.chain.trust_store();

        if store.is_trusted(TrustDomain::General, cert) {
            report_item!(CERTIFICATE_CHECK, "certificate is trusted, validation succeeded")
                .certificate(cert.label())
                .info(report);
            return true;
        }

        let role_domain = TrustDomain::for_source(ctx.certificate_source());
        if let Some(domain) = role_domain {
            if store.is_trusted(domain, cert) {
                report_item!(
                    CERTIFICATE_CHECK,
                    format!("certificate is trusted for {domain:?}, validation succeeded")
                )
                .certificate(cert.label())
                .info(report);
                return true;
            }
        }

        for domain in store.trusted_domains(cert) {
            report_item!(
                CERTIFICATE_CHECK,
                format!(
                    "certificate is trusted for {domain:?}, which does not apply to {:?}",
                    ctx.certificate_source()
                )
            )
            .certificate(cert.label())
            .info(report);
        }

        false
    }

    fn check_validity(&self, report: &mut ValidationReport, cert: &Certificate, date: DateTime<Utc>) {
        if date < cert.not_before() {
            report_item!(
                CERTIFICATE_CHECK,
                format!("certificate is not yet valid (valid from {})", cert.not_before())
            )
            .certificate(cert.label())
            .invalid(report);
        } else if date > cert.not_after() {
            report_item!(
                CERTIFICATE_CHECK,
                format!("certificate has expired (valid until {})", cert.not_after())
            )
            .certificate(cert.label())
            .invalid(report);
        }
    }

    fn stop_on_failure(&self, report: &ValidationReport) -> bool {
        !self
            .chain
            .settings()
            .continue_after_failure(ValidatorKind::CertificateChain)
            && report.result() == ValidationResult::Invalid
    }
}
