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

use certval_crypto::{crl::Crl, Certificate};
use certval_report::{check_names::*, report_item, ItemStatus, ValidationReport};
use chrono::{DateTime, Utc};

use crate::{
    context::{CertificateSource, TimeBasedContext, ValidationContext, ValidatorKind},
    error::{safe_call, SourceError},
    validator_chain::ValidatorChain,
    validators::ValidationPath,
    Error, Result,
};

/// Checks one certificate against one CRL.
#[derive(Clone, Copy)]
pub struct CrlValidator<'a> {
    chain: &'a ValidatorChain,
}

impl<'a> CrlValidator<'a> {
    pub(crate) fn new(chain: &'a ValidatorChain) -> Self {
        Self { chain }
    }

    /// Check `cert` against `crl` as of `date`, appending findings to
    /// `report`.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        crl: &Crl,
        date: DateTime<Utc>,
    ) -> Result<()> {
        let mut path = ValidationPath::default();
        path.push(cert);
        self.validate_with_path(report, ctx, cert, crl, date, &mut path)
    }

    pub(crate) fn validate_with_path(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext,
        cert: &Certificate,
        crl: &Crl,
        date: DateTime<Utc>,
        path: &mut ValidationPath,
    ) -> Result<()> {
        let ctx = ctx.with_validator(ValidatorKind::Crl);
        let label = cert.label();

        if cert.is_self_signed() {
            report_item!(
                CRL_CHECK,
                "certificate is self-signed, CRL check is not applicable"
            )
            .certificate(label)
            .info(report);
            return Ok(());
        }

        // Serial numbers are only unique per issuer.
        if crl.issuer_raw != cert.issuer_raw() {
            report_item!(
                CRL_CHECK,
                format!(
                    "CRL does not cover the certificate's issuer: CRL issued by {}, certificate issued by {}",
                    crl.issuer,
                    cert.issuer()
                )
            )
            .certificate(label)
            .indeterminate(report);
            return Ok(());
        }

        let freshness = self.chain.settings().freshness(ctx.time_based());
        let stale = date
            .checked_sub_signed(freshness)
            .is_some_and(|earliest| crl.this_update < earliest);

        if stale {
            report_item!(
                CRL_CHECK,
                format!(
                    "CRL is not fresh enough: thisUpdate {} is more than {}s before {date}",
                    crl.this_update,
                    freshness.num_seconds()
                )
            )
            .certificate(label)
            .indeterminate(report);
            return Ok(());
        }

        if let Some(next_update) = crl.next_update {
            if next_update < date {
                report_item!(
                    CRL_CHECK,
                    format!("CRL is no longer valid: nextUpdate {next_update} is before {date}")
                )
                .certificate(label)
                .indeterminate(report);
                return Ok(());
            }
        }

        let Some(mut candidates) = safe_call(
            report,
            || self.chain.retriever().retrieve_crl_issuer_candidates(crl),
            |err, report| {
                report_item!(CRL_CHECK, "CRL issuer certificate could not be retrieved")
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
                CRL_CHECK,
                format!("CRL issuer certificate {} is missing", crl.issuer)
            )
            .certificate(label)
            .indeterminate(report);
            return Ok(());
        }

        candidates.sort_by_key(|candidate| candidate.origin.rank());

        let verifier = self.chain.verifier();
        let mut last_error = None;
        let mut crl_issuer = None;
        for candidate in &candidates {
            match verifier.verify(&crl.signed_data, candidate.certificate.spki()) {
                Ok(()) => {
                    crl_issuer = Some(&candidate.certificate);
                    break;
                }
                Err(err) => last_error = Some(err),
            }
        }

        let Some(crl_issuer) = crl_issuer else {
            let mut item =
                report_item!(CRL_CHECK, "CRL signature could not be verified").certificate(label);
            if let Some(err) = last_error {
                item = item.cause(err);
            }
            item.indeterminate(report);
            return Ok(());
        };

        // Failures of the CRL issuer's own chain only make the outcome
        // indeterminate.
        let issuer_ctx = ctx
            .with_certificate_source(CertificateSource::CrlIssuer)
            .with_time_based(TimeBasedContext::Historical);
        let mut issuer_report = ValidationReport::new();
        self.chain.certificate_chain_validator().validate_with_path(
            &mut issuer_report,
            &issuer_ctx,
            crl_issuer,
            crl.this_update,
            path,
        )?;
        report.merge_with_ceiling(&issuer_report, ItemStatus::Indeterminate);

        let cert_root = self.find_root(cert)?;
        let issuer_root = self.find_root(crl_issuer)?;
        if let (Some(cert_root), Some(issuer_root)) = (&cert_root, &issuer_root) {
            if cert_root != issuer_root {
                report_item!(
                    CRL_CHECK,
                    format!(
                        "CRL issuer {crl_issuer} does not chain to the same root ({issuer_root}) as the certificate ({cert_root})"
                    )
                )
                .certificate(label.clone())
                .indeterminate(report);
            }
        }

        if let Some(entry) = crl.find_revoked(cert.serial()) {
            let reason = entry.reason.as_deref().unwrap_or("unspecified");
            if entry.revocation_date < date {
                report_item!(
                    CRL_CHECK,
                    format!(
                        "certificate was revoked on {} (reason: {reason})",
                        entry.revocation_date
                    )
                )
                .certificate(label)
                .invalid(report);
            } else {
                report_item!(
                    CRL_CHECK,
                    format!(
                        "certificate was revoked on {}, after the validation date {date}",
                        entry.revocation_date
                    )
                )
                .certificate(label)
                .info(report);
            }
        }

        Ok(())
    }

    // Follows verified issuers up to a trust anchor or self-signed
    // certificate. Returns `None` if the walk dead-ends.
    fn find_root(&self, cert: &Certificate) -> Result<Option<Certificate>> {
        let store = self.chain.trust_store();
        let verifier = self.chain.verifier();

        let mut current = cert.clone();
        let mut seen = vec![current.fingerprint()];

        loop {
            if current.is_self_signed() || !store.trusted_domains(&current).is_empty() {
                return Ok(Some(current));
            }

            let mut candidates = match self.chain.retriever().retrieve_issuer_candidates(&current)
            {
                Ok(candidates) => candidates,
                Err(SourceError::Unrecoverable(msg)) => return Err(Error::Unrecoverable(msg)),
                Err(err) => {
                    log::debug!("root lookup for {current} stopped: {err}");
                    return Ok(None);
                }
            };
            candidates.sort_by_key(|candidate| candidate.origin.rank());

            let Some(issuer) = candidates.into_iter().map(|c| c.certificate).find(|issuer| {
                verifier
                    .verify(current.signed_data(), issuer.spki())
                    .is_ok()
            }) else {
                return Ok(None);
            };

            let fingerprint = issuer.fingerprint();
            if seen.contains(&fingerprint) {
                return Ok(None);
            }
            seen.push(fingerprint);
            current = issuer;
        }
    }
}
