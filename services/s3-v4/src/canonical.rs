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

//! Canonical request construction.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET};
use http::{HeaderMap, Method};
use percent_encoding::utf8_percent_encode;
use s3sign_core::hash::hex_sha256;
use s3sign_core::{Error, Result};
use std::fmt::Write;

/// Percent encode a decoded absolute path, keeping `/` as segment separator.
pub fn uri_encode_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    utf8_percent_encode(path, &AWS_URI_ENCODE_SET).to_string()
}

/// Percent encode a query key or value. `/` is encoded too.
pub fn uri_encode(value: &str) -> String {
    utf8_percent_encode(value, &AWS_QUERY_ENCODE_SET).to_string()
}

/// Encode then sort query pairs and join them as `k=v&k=v`.
///
/// Pairs are ordered by encoded key, then by encoded value for duplicated keys.
pub fn canonical_query_string(query: &[(String, String)]) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect::<Vec<_>>();
    pairs.sort();

    let mut s = String::with_capacity(16);
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(&k);
        s.push('=');
        s.push_str(&v);
    }
    s
}

/// Lowercase, trim, sort and dedup header names.
pub fn normalize_signed_headers<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut names = names
        .iter()
        .map(|v| v.as_ref().trim().to_ascii_lowercase())
        .collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();
    names
}

/// Trim the value and collapse runs of spaces into one.
fn normalize_header_value(value: &str) -> String {
    let mut s = String::with_capacity(value.len());
    for (idx, part) in value.split(' ').filter(|v| !v.is_empty()).enumerate() {
        if idx != 0 {
            s.push(' ');
        }
        s.push_str(part);
    }
    s
}

/// Render `name:value\n` for every signed header.
///
/// Multiple values of the same header are joined with a single space.
fn canonical_headers(headers: &HeaderMap, signed_headers: &[String]) -> Result<String> {
    let mut s = String::with_capacity(128);

    for name in signed_headers {
        let mut values = headers.get_all(name.as_str()).iter().peekable();
        if values.peek().is_none() {
            return Err(Error::request_invalid(format!(
                "signed header {name} is missing from request"
            )));
        }

        let mut joined = Vec::new();
        for value in values {
            joined.push(normalize_header_value(value.to_str()?));
        }
        writeln!(s, "{}:{}", name, joined.join(" "))?;
    }

    Ok(s)
}

/// CanonicalRequest is the exact string a signature is computed over.
///
/// It keeps the signed header list it was built with, so the `SignedHeaders`
/// reported to the server always matches the hashed content.
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    value: String,
    signed_headers: Vec<String>,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// ```text
    /// <method>
    /// <encoded path>
    /// <canonical query>
    /// <name:value for every signed header>
    ///
    /// <signed headers joined by ;>
    /// <payload hash>
    /// ```
    pub fn build<S: AsRef<str>>(
        method: &Method,
        path: &str,
        query: &[(String, String)],
        headers: &HeaderMap,
        signed_headers: &[S],
        payload_hash: &str,
    ) -> Result<Self> {
        let signed_headers = normalize_signed_headers(signed_headers);

        // 256 is specially chosen to avoid reallocation for most requests.
        let mut f = String::with_capacity(256);
        writeln!(f, "{}", method.as_str().to_ascii_uppercase())?;
        writeln!(f, "{}", uri_encode_path(path))?;
        writeln!(f, "{}", canonical_query_string(query))?;
        f.push_str(&canonical_headers(headers, &signed_headers)?);
        writeln!(f)?;
        writeln!(f, "{}", signed_headers.join(";"))?;
        write!(f, "{payload_hash}")?;

        Ok(Self {
            value: f,
            signed_headers,
        })
    }

    /// The canonical request string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Signed header names, lowercased and sorted.
    pub fn signed_headers(&self) -> &[String] {
        &self.signed_headers
    }

    /// Hex encoded SHA-256 of the canonical request.
    pub fn hash(&self) -> String {
        hex_sha256(self.value.as_bytes())
    }
}
