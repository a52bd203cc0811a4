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

use std::{
    borrow::Cow,
    fmt::{self, Debug, Display, Formatter},
};

use serde::Serialize;

use crate::ValidationReport;

/// Creates a [`ReportItem`] that is annotated with the source file and line
/// number where the finding was made.
///
/// Takes two parameters, each of which may be a `&'static str` or `String`:
///
/// * `check`: name of the check that produced the finding (see
///   [`check_names`](crate::check_names))
/// * `message`: human-readable description of the finding
///
/// The item starts out with [`ItemStatus::Info`]. Use
/// [`info()`](ReportItem::info), [`indeterminate()`](ReportItem::indeterminate)
/// or [`invalid()`](ReportItem::invalid) to classify it and append it to a
/// [`ValidationReport`].
///
/// ## Example
///
/// ```
/// # use certval_report::{report_item, ItemStatus, ValidationReport, ValidationResult};
/// let mut report = ValidationReport::new();
///
/// report_item!("Certificate check.", "certificate is expired")
///     .certificate("CN=leaf (serial 01)")
///     .invalid(&mut report);
///
/// assert_eq!(report.items()[0].status, ItemStatus::Invalid);
/// assert_eq!(report.result(), ValidationResult::Invalid);
/// ```
#[macro_export]
macro_rules! report_item {
    ($check:expr, $message:expr) => {{
        $crate::ReportItem {
            check: $check.into(),
            message: $message.into(),
            file: file!().into(),
            line: line!(),
            ..Default::default()
        }
    }};
}

/// Severity of a single [`ReportItem`].
///
/// Variants are ordered from least to most severe, so `max()` over a set of
/// statuses yields the dominating one.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// The finding is informational and does not weaken the result.
    #[default]
    Info,

    /// The finding prevents a conclusive answer.
    Indeterminate,

    /// The finding conclusively fails validation.
    Invalid,
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Indeterminate => write!(f, "INDETERMINATE"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

/// One finding recorded during a validation pass.
///
/// Use the [`report_item`](crate::report_item) macro to create a `ReportItem`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ReportItem {
    /// Severity of the finding.
    pub status: ItemStatus,

    /// Label of the certificate the finding is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Cow<'static, str>>,

    /// Name of the check that produced the finding.
    pub check: Cow<'static, str>,

    /// Human-readable description of the finding.
    pub message: Cow<'static, str>,

    /// Debug rendering of the error that caused the finding, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Cow<'static, str>>,

    /// Source file where the finding was made.
    #[serde(skip)]
    pub file: Cow<'static, str>,

    /// Source line where the finding was made.
    #[serde(skip)]
    pub line: u32,
}

impl ReportItem {
    /// Attach the label of the certificate this finding is about.
    #[must_use]
    pub fn certificate<S: Into<String>>(self, label: S) -> Self {
        ReportItem {
            certificate: Some(label.into().into()),
            ..self
        }
    }

    /// Capture the error that caused this finding.
    ///
    /// IMPORTANT: This is implemented using the [`Debug`] trait, as with every
    /// error enum in this workspace.
    #[must_use]
    pub fn cause<E: Debug>(self, err: E) -> Self {
        ReportItem {
            cause: Some(format!("{err:?}").into()),
            ..self
        }
    }

    /// Return a copy of this item with a different status.
    #[must_use]
    pub fn with_status(self, status: ItemStatus) -> Self {
        ReportItem { status, ..self }
    }

    /// Set the status to [`ItemStatus::Info`] and add it to the report.
    pub fn info(self, report: &mut ValidationReport) {
        report.add_item(self.with_status(ItemStatus::Info));
    }

    /// Set the status to [`ItemStatus::Indeterminate`] and add it to the
    /// report.
    pub fn indeterminate(self, report: &mut ValidationReport) {
        report.add_item(self.with_status(ItemStatus::Indeterminate));
    }

    /// Set the status to [`ItemStatus::Invalid`] and add it to the report.
    pub fn invalid(self, report: &mut ValidationReport) {
        report.add_item(self.with_status(ItemStatus::Invalid));
    }

    /// Set the given status and add the item to the report.
    pub fn add_to(self, report: &mut ValidationReport, status: ItemStatus) {
        report.add_item(self.with_status(status));
    }
}

impl Display for ReportItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.check, self.message)?;

        if let Some(certificate) = &self.certificate {
            write!(f, " ({certificate})")?;
        }

        if let Some(cause) = &self.cause {
            write!(f, " caused by {cause}")?;
        }

        Ok(())
    }
}
