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

use chrono::{DateTime, FixedOffset, Utc};

/// Convert seconds since the epoch, as reported by x509-parser, to UTC.
pub(crate) fn from_timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Convert an ASN.1 GeneralizedTime, as decoded by rasn, to UTC.
pub(crate) fn from_generalized(time: &DateTime<FixedOffset>) -> DateTime<Utc> {
    time.with_timezone(&Utc)
}
