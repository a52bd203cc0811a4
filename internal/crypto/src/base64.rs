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

//! Base64 convenience functions.

use ::base64::{engine::general_purpose, DecodeError, Engine as _};

const PEM_LINE_LEN: usize = 64;

/// Encode a byte slice to a Base64 string using the standard alphabet.
pub fn encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decode a Base64 string into bytes.
pub fn decode(data: &str) -> Result<Vec<u8>, DecodeError> {
    general_purpose::STANDARD.decode(data)
}

/// Wrap DER bytes in a PEM block with the given label (for example
/// `CERTIFICATE` or `X509 CRL`).
pub fn pem_block(label: &str, der: &[u8]) -> String {
    let encoded = encode(der);

    let mut out = format!("-----BEGIN {label}-----\n");
    // Base64 output is ASCII, so byte chunks are always valid UTF-8.
    for line in encoded.as_bytes().chunks(PEM_LINE_LEN) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}
