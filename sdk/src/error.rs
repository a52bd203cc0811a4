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

use certval_report::ValidationReport;
use thiserror::Error;

/// `Error` enumerates the conditions under which a validation call does not
/// produce a report.
///
/// Almost every problem met during validation becomes a report item instead.
/// Only configuration mistakes and collaborator failures marked as
/// unrecoverable surface here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A collaborator reported a failure that must not be converted into a
    /// report item.
    #[error("unrecoverable error: {0}")]
    Unrecoverable(String),

    /// The validation settings are inconsistent or could not be parsed.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A required collaborator was not supplied to the builder.
    #[error("validator chain is missing a {0}")]
    MissingCollaborator(&'static str),

    /// Trust anchors could not be loaded.
    #[error(transparent)]
    CertificateError(#[from] certval_crypto::CertificateError),
}

/// A specialized `Result` type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by an issuer retriever or revocation data source.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum SourceError {
    /// The source could not deliver; validation records the failure and
    /// carries on with other evidence.
    #[error("source failed: {0}")]
    Failed(String),

    /// Continuing would be unsafe; the failure aborts the validation call.
    #[error("unrecoverable source failure: {0}")]
    Unrecoverable(String),
}

/// Run a collaborator call, turning ordinary failures into report items.
///
/// On [`SourceError::Failed`], `on_failure` is given the error and the report
/// so it can record an item, and `Ok(None)` is returned. A
/// [`SourceError::Unrecoverable`] is passed to the caller unmodified as
/// [`Error::Unrecoverable`].
pub(crate) fn safe_call<T, C, F>(
    report: &mut ValidationReport,
    call: C,
    on_failure: F,
) -> Result<Option<T>>
where
    C: FnOnce() -> std::result::Result<T, SourceError>,
    F: FnOnce(&SourceError, &mut ValidationReport),
{
    match call() {
        Ok(value) => Ok(Some(value)),
        Err(SourceError::Unrecoverable(msg)) => Err(Error::Unrecoverable(msg)),
        Err(err) => {
            log::debug!("collaborator call failed: {err}");
            on_failure(&err, report);
            Ok(None)
        }
    }
}
