// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::canonical::CanonicalRequest;
use crate::constants::{ALGORITHM, SCOPE_TERMINATOR};
use s3sign_core::hash::{hex_hmac_sha256, hmac_sha256};
use s3sign_core::time::{format_date, format_iso8601, DateTime};
use std::fmt::{Display, Formatter};

/// Credential scope: `<yyyymmdd>/<region>/<service>/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningScope {
    /// Date stamp in `yyyymmdd`.
    pub date: String,
    /// Region, `us-east-1` for example.
    pub region: String,
    /// Service, `s3` for example.
    pub service: String,
}

impl SigningScope {
    /// Scope for the UTC day of `time`.
    pub fn new(time: DateTime, region: &str, service: &str) -> Self {
        Self {
            date: format_date(time),
            region: region.to_string(),
            service: service.to_string(),
        }
    }

    /// Signing key for this scope, see [`derive_signing_key`].
    pub fn signing_key(&self, secret: &str) -> Vec<u8> {
        derive_signing_key(secret, &self.date, &self.region, &self.service)
    }
}

impl Display for SigningScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, SCOPE_TERMINATOR
        )
    }
}

/// Derive the signing key by chaining HMAC over date, region, service and
/// the scope terminator, starting from `AWS4<secret>`.
///
/// `date` is the `yyyymmdd` date stamp, the key is only valid for that day.
pub fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes())
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20130524T000000Z
/// 20130524/us-east-1/s3/aws4_request
/// <hex sha256 of canonical request>
/// ```
pub fn string_to_sign(time: DateTime, scope: &SigningScope, creq: &CanonicalRequest) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        format_iso8601(time),
        scope,
        creq.hash()
    )
}

/// Lowercase hex HMAC-SHA256 of the string to sign.
pub fn calculate_signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex_hmac_sha256(signing_key, string_to_sign.as_bytes())
}
