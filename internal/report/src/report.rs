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

use std::fmt::{self, Display, Formatter};

use log::{debug, warn};
use serde::Serialize;

use crate::{ItemStatus, ReportItem};

/// Overall outcome of a validation pass.
///
/// A result is never stored; it is always derived from the items of a
/// [`ValidationReport`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// No item is invalid or indeterminate.
    Valid,

    /// At least one item is indeterminate and none is invalid.
    Indeterminate,

    /// At least one item is invalid.
    Invalid,
}

impl From<ItemStatus> for ValidationResult {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Info => Self::Valid,
            ItemStatus::Indeterminate => Self::Indeterminate,
            ItemStatus::Invalid => Self::Invalid,
        }
    }
}

impl Display for ValidationResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::Indeterminate => write!(f, "INDETERMINATE"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

/// A `ValidationReport` is the ordered, append-only log of findings produced
/// by one validation pass.
///
/// Reports are call-scoped. Sub-validators write into their own report, which
/// the caller then folds into its own with [`merge()`] or
/// [`merge_with_ceiling()`].
///
/// [`merge()`]: Self::merge
/// [`merge_with_ceiling()`]: Self::merge_with_ceiling
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ValidationReport {
    items: Vec<ReportItem>,
}

impl ValidationReport {
    /// Returns an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item to this report.
    pub fn add_item(&mut self, item: ReportItem) {
        match item.status {
            ItemStatus::Info => debug!("Validation info: {item}"),
            ItemStatus::Indeterminate | ItemStatus::Invalid => warn!("Validation finding: {item}"),
        }
        self.items.push(item);
    }

    /// Returns the items in the order they were added.
    pub fn items(&self) -> &[ReportItem] {
        &self.items
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item was added yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Derives the overall result from the items of this report.
    ///
    /// `Invalid` dominates `Indeterminate`, which dominates `Valid`.
    pub fn result(&self) -> ValidationResult {
        self.items
            .iter()
            .map(|item| item.status)
            .max()
            .map_or(ValidationResult::Valid, ValidationResult::from)
    }

    /// Appends all items of `other`, unchanged.
    pub fn merge(&mut self, other: &ValidationReport) {
        self.items.extend(other.items.iter().cloned());
    }

    /// Appends all items of `other`, lowering any item more severe than
    /// `ceiling` to `ceiling`.
    ///
    /// Used when a sub-validation must not be able to fail the parent
    /// conclusively, e.g. when checking a delegated OCSP responder.
    pub fn merge_with_ceiling(&mut self, other: &ValidationReport, ceiling: ItemStatus) {
        self.items.extend(other.items.iter().map(|item| {
            if item.status > ceiling {
                item.clone().with_status(ceiling)
            } else {
                item.clone()
            }
        }));
    }

    /// Returns the items with the given status.
    pub fn items_with_status(&self, status: ItemStatus) -> impl Iterator<Item = &ReportItem> {
        self.items.iter().filter(move |item| item.status == status)
    }

    /// Returns `true` if any item was produced by the named check.
    pub fn has_check(&self, check: &str) -> bool {
        self.items.iter().any(|item| item.check == check)
    }

    /// Returns `true` if any item's message contains `fragment`.
    pub fn has_message(&self, fragment: &str) -> bool {
        self.items.iter().any(|item| item.message.contains(fragment))
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Validation result: {}", self.result())?;
        for item in &self.items {
            writeln!(f, "  {item}")?;
        }
        Ok(())
    }
}
