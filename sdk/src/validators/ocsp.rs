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

use certval_crypto::{
    ocsp::{BasicOcspResponse, CertStatus, SingleResponse},
    raw_signature::SignatureError,
    Certificate,
};
use certval_report::{check_names::*, report_item, ItemStatus, ValidationReport, ValidationResult};
use chrono::{DateTime, Utc};

use crate::{
    context::{CertificateSource, TimeBasedContext, ValidationContext, ValidatorKind},
    error::safe_call,
    trust_store::TrustDomain,
    validator_chain::ValidatorChain,
    validators::ValidationPath,
    Result,
};

/// Checks one certificate against one single response of an OCSP response.
///
/// Besides the status itself, the validator checks that the response is
/// fresh enough for the validation date and that it was signed by someone
/// entitled to speak for the certificate's issuer: the issuer itself, a
/// responder trusted for OCSP signing, or a responder the issuer delegated to.
#[derive(Clone, Copy)]
pub struct OcspValidator<'a> {
    chain: &'a ValidatorChain,
}

impl<'a> OcspValidator<'a> {
    pub(crate) fn new(chain: &'a ValidatorChain) -> Self {
        Self { chain }
    }

    /// Check `cert` against `single`, taken from `response`, as of `date`.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        single: &SingleResponse,
        response: &BasicOcspResponse,
        date: DateTime<Utc>,
    ) -> Result<()> {
        let mut path = ValidationPath::default();
        path.push(cert);
        self.validate_with_path(report, ctx, cert, single, response, date, &mut path)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn validate_with_path(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        single: &SingleResponse,
        response: &BasicOcspResponse,
        date: DateTime<Utc>,
        path: &mut ValidationPath,
    ) -> Result<()> {
        let ctx = ctx.with_validator(ValidatorKind::Ocsp);
        let label = cert.label();

        if single.cert_id.serial != cert.serial() {
            report_item!(
                OCSP_CHECK,
                "OCSP response is about another certificate (serial number mismatch)"
            )
            .certificate(label)
            .indeterminate(report);
            return Ok(());
        }

        let Some(candidates) = safe_call(
            report,
            || self.chain.retriever().retrieve_issuer_candidates(cert),
            |err, report| {
                report_item!(OCSP_CHECK, "issuer certificate could not be retrieved")
                    .certificate(label.clone())
                    .cause(err)
                    .indeterminate(report)
            },
        )?
        else {
            return Ok(());
        };

        let issuers: Vec<Certificate> = candidates
            .into_iter()
            .map(|candidate| candidate.certificate)
            .filter(|issuer| single.cert_id.matches_issuer(issuer))
            .collect();

        if issuers.is_empty() {
            report_item!(
                OCSP_CHECK,
                "OCSP response does not refer to any known issuer of the certificate"
            )
            .certificate(label)
            .indeterminate(report);
            return Ok(());
        }

        let continue_after_failure = self
            .chain
            .settings()
            .continue_after_failure(ValidatorKind::Ocsp);

        let mut failed = Vec::with_capacity(issuers.len());
        for issuer in &issuers {
            let mut sub_report = ValidationReport::new();
            self.validate_for_issuer(
                &mut sub_report,
                &ctx,
                cert,
                issuer,
                single,
                response,
                date,
                path,
            )?;

            let result = sub_report.result();
            if result == ValidationResult::Valid {
                report.merge(&sub_report);
                return Ok(());
            }
            failed.push(sub_report);

            if result == ValidationResult::Invalid && !continue_after_failure {
                break;
            }
        }

        for sub_report in &failed {
            report.merge(sub_report);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn validate_for_issuer(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        issuer: &Certificate,
        single: &SingleResponse,
        response: &BasicOcspResponse,
        date: DateTime<Utc>,
        path: &mut ValidationPath,
    ) -> Result<()> {
        let label = cert.label();
        let freshness = self.chain.settings().freshness(ctx.time_based());

        let stale = single
            .this_update
            .checked_add_signed(freshness)
            .is_some_and(|fresh_until| fresh_until < date);

        if stale {
            report_item!(
                OCSP_CHECK,
                format!(
                    "OCSP response is not fresh enough: thisUpdate {} is more than {}s before {date}",
                    single.this_update,
                    freshness.num_seconds()
                )
            )
            .certificate(label)
            .indeterminate(report);
            return Ok(());
        }

        if let Some(next_update) = single.next_update {
            if date > next_update {
                report_item!(
                    OCSP_CHECK,
                    format!("OCSP response is no longer valid: nextUpdate {next_update} is before {date}")
                )
                .certificate(label)
                .indeterminate(report);
                return Ok(());
            }
        }

        match &single.status {
            CertStatus::Good => {
                if cert.not_after() < response.produced_at {
                    let covered = response
                        .archive_cutoff_for(single)
                        .is_some_and(|cutoff| cutoff <= cert.not_after());
                    if !covered {
                        report_item!(
                            OCSP_CHECK,
                            "OCSP response was produced after the certificate expired and no archive cutoff covers it"
                        )
                        .certificate(label)
                        .indeterminate(report);
                        return Ok(());
                    }
                }

                if self.check_responder(report, ctx, cert, issuer, response, path)? {
                    report_item!(OCSP_CHECK, "certificate status is GOOD")
                        .certificate(label)
                        .info(report);
                }
            }

            CertStatus::Revoked {
                revocation_time,
                reason,
            } if *revocation_time < date => {
                if self.check_responder(report, ctx, cert, issuer, response, path)? {
                    let reason = reason.as_deref().unwrap_or("unspecified");
                    report_item!(
                        OCSP_CHECK,
                        format!("certificate was revoked on {revocation_time} (reason: {reason})")
                    )
                    .certificate(label)
                    .invalid(report);
                }
            }

            CertStatus::Revoked {
                revocation_time, ..
            } => {
                report_item!(
                    OCSP_CHECK,
                    format!("certificate was revoked on {revocation_time}, after the validation date {date}")
                )
                .certificate(label)
                .info(report);
            }

            CertStatus::Unknown => {
                report_item!(OCSP_CHECK, "certificate status is UNKNOWN")
                    .certificate(label)
                    .indeterminate(report);
            }
        }

        Ok(())
    }

    // Returns `true` if the response was signed by someone entitled to speak
    // for `issuer`. Otherwise an indeterminate item has been added.
    fn check_responder(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        issuer: &Certificate,
        response: &BasicOcspResponse,
        path: &mut ValidationPath,
    ) -> Result<bool> {
        let verifier = self.chain.verifier();

        let mut last_error = match verifier.verify(&response.signed_data, issuer.spki()) {
            Ok(()) => return Ok(true),
            Err(err) => err,
        };

        let store = self.chain.trust_store();
        let trusted_responders = store.get_domain_trusted(TrustDomain::OcspSigning);

        let mut responders: Vec<&Certificate> = Vec::new();
        for responder in response.certs.iter().chain(trusted_responders) {
            if response.responder_id.matches(responder) && !responders.contains(&responder) {
                responders.push(responder);
            }
        }

        for responder in responders {
            log::debug!("trying OCSP responder candidate {responder}");

            if let Err(err) = verifier.verify(&response.signed_data, responder.spki()) {
                last_error = err;
                continue;
            }

            if store.is_trusted(TrustDomain::General, responder)
                || store.is_trusted(TrustDomain::OcspSigning, responder)
            {
                return Ok(true);
            }

            if responder.issuer_raw() != issuer.subject_raw() {
                last_error = SignatureError::CryptoLibraryError(format!(
                    "responder {responder} is neither trusted nor issued by {issuer}"
                ));
                continue;
            }

            if let Err(err) = verifier.verify(responder.signed_data(), issuer.spki()) {
                last_error = err;
                continue;
            }

            // Delegated responder: failures of its own chain only make the
            // outcome indeterminate.
            let responder_ctx = ctx
                .with_certificate_source(CertificateSource::OcspIssuer)
                .with_time_based(TimeBasedContext::Historical);

            let mut responder_report = ValidationReport::new();
            self.chain
                .certificate_chain_validator()
                .validate_with_path(
                    &mut responder_report,
                    &responder_ctx,
                    responder,
                    response.produced_at,
                    path,
                )?;
            report.merge_with_ceiling(&responder_report, ItemStatus::Indeterminate);
            return Ok(true);
        }

        report_item!(
            OCSP_RESPONDER_CHECK,
            "OCSP response could not be verified: no authorized responder signed it"
        )
        .certificate(cert.label())
        .cause(last_error)
        .indeterminate(report);

        Ok(false)
    }
}
