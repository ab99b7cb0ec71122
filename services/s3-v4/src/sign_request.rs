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

use crate::authorization::{
    authorization_header_value, format_authorization, insert_authorization, Authorization,
};
use crate::canonical::{canonical_query_string, uri_encode_path, CanonicalRequest};
use crate::constants::{
    ALGORITHM, DEFAULT_PRESIGN_EXPIRES_SECS, MAX_PRESIGN_EXPIRES_SECS, UNSIGNED_PAYLOAD,
    X_AMZ_ALGORITHM, X_AMZ_CONTENT_SHA_256, X_AMZ_CREDENTIAL, X_AMZ_DATE, X_AMZ_DATE_QUERY,
    X_AMZ_EXPIRES, X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS,
};
use crate::signature::{calculate_signature, string_to_sign, SigningScope};
use crate::{Credential, Payload};
use http::request::Parts;
use http::{header, HeaderMap, HeaderName, HeaderValue};
use log::debug;
use s3sign_core::time::{format_iso8601, now, parse_iso8601, DateTime};
use s3sign_core::{Error, RequestDescriptor, Result};
use std::time::Duration;

/// RequestSigner that implement AWS SigV4 for s3 compatible services.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
/// - [Authenticating Requests: Using Query Parameters](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html)
///
/// The signer holds no mutable state, a single instance can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
    default_expires: Duration,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            default_expires: Duration::from_secs(DEFAULT_PRESIGN_EXPIRES_SECS),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Expiry used by [`RequestSigner::presign`] when the caller passes none.
    pub fn with_default_expires(mut self, expires: Duration) -> Self {
        self.default_expires = expires;
        self
    }

    /// Service this signer signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region this signer signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign the request in header mode.
    ///
    /// Every header of `req` except `authorization` is signed, together with
    /// `host`, `x-amz-date` and `x-amz-content-sha256`. Values already present
    /// on `req` for those three are kept; an existing `x-amz-date` also
    /// becomes the signing time.
    pub fn sign(
        &self,
        req: &RequestDescriptor,
        payload: &Payload,
        cred: &Credential,
    ) -> Result<Authorization> {
        cred.check()?;

        let mut headers = req.headers.clone();
        headers.remove(header::AUTHORIZATION);

        let now = match headers.get(X_AMZ_DATE) {
            Some(v) => parse_iso8601(v.to_str()?)?,
            None => {
                let now = self.time.unwrap_or_else(now);
                headers.insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);
                now
            }
        };

        if !headers.contains_key(header::HOST) {
            headers.insert(header::HOST, HeaderValue::try_from(req.host())?);
        }

        let payload_hash = match headers.get(X_AMZ_CONTENT_SHA_256) {
            Some(v) => v.to_str()?.to_string(),
            None => {
                let hash = payload.content_sha256();
                headers.insert(X_AMZ_CONTENT_SHA_256, HeaderValue::try_from(hash.as_str())?);
                hash
            }
        };

        let names = headers.keys().map(|k| k.as_str()).collect::<Vec<_>>();
        let creq = CanonicalRequest::build(
            &req.method,
            &req.path,
            &req.query,
            &headers,
            &names,
            &payload_hash,
        )?;
        debug!("calculated canonical request: {}", creq.as_str());

        let scope = SigningScope::new(now, &self.region, &self.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = scope.signing_key(&cred.secret_access_key);
        let signature = calculate_signature(&signing_key, &string_to_sign);

        let value = authorization_header_value(&format_authorization(
            &cred.access_key_id,
            &scope,
            creq.signed_headers(),
            &signature,
        ))?;

        let mut output = HeaderMap::with_capacity(4);
        for name in [
            header::HOST,
            HeaderName::from_static(X_AMZ_DATE),
            HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
        ] {
            if let Some(v) = headers.get(&name) {
                output.insert(name, v.clone());
            }
        }
        insert_authorization(&mut output, value.clone());

        Ok(Authorization {
            value,
            signature,
            signed_headers: creq.signed_headers().to_vec(),
            headers: output,
        })
    }

    /// Sign `parts` in header mode and write the signing headers into it.
    pub fn sign_parts(&self, parts: &mut Parts, payload: &Payload, cred: &Credential) -> Result<()> {
        let req = RequestDescriptor::from_parts(parts)?;
        self.sign(&req, payload, cred)?.apply(parts);
        Ok(())
    }

    /// Build a presigned url valid for `expires_in`, or the signer's default
    /// expiry when `None`.
    ///
    /// Only `host` is signed and the payload is always `UNSIGNED-PAYLOAD`, so
    /// the url works for any body sent with it.
    pub fn presign(
        &self,
        req: &RequestDescriptor,
        cred: &Credential,
        expires_in: Option<Duration>,
    ) -> Result<String> {
        cred.check()?;
        let expires = check_presign_expires(expires_in.unwrap_or(self.default_expires))?;

        let now = self.time.unwrap_or_else(now);
        let scope = SigningScope::new(now, &self.region, &self.service);
        debug!("calculated scope: {scope}");

        let host = req.host();
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(header::HOST, HeaderValue::try_from(host.as_str())?);

        let mut query = req.query.clone();
        query.push((X_AMZ_ALGORITHM.into(), ALGORITHM.into()));
        query.push((
            X_AMZ_CREDENTIAL.into(),
            format!("{}/{}", cred.access_key_id, scope),
        ));
        query.push((X_AMZ_DATE_QUERY.into(), format_iso8601(now)));
        query.push((X_AMZ_EXPIRES.into(), expires.to_string()));
        query.push((X_AMZ_SIGNED_HEADERS.into(), header::HOST.as_str().into()));

        let creq = CanonicalRequest::build(
            &req.method,
            &req.path,
            &query,
            &headers,
            &[header::HOST.as_str()],
            UNSIGNED_PAYLOAD,
        )?;
        debug!("calculated canonical request: {}", creq.as_str());

        let string_to_sign = string_to_sign(now, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = scope.signing_key(&cred.secret_access_key);
        let signature = calculate_signature(&signing_key, &string_to_sign);

        Ok(format!(
            "{}://{}{}?{}&{}={}",
            req.scheme,
            host,
            uri_encode_path(&req.path),
            canonical_query_string(&query),
            X_AMZ_SIGNATURE,
            signature
        ))
    }
}

/// Validate a presign expiry and return it in whole seconds.
pub(crate) fn check_presign_expires(expires: Duration) -> Result<u64> {
    let secs = expires.as_secs();
    if secs == 0 {
        return Err(Error::config_invalid(
            "presign expiry must be at least one second",
        ));
    }
    if secs > MAX_PRESIGN_EXPIRES_SECS {
        return Err(Error::config_invalid(format!(
            "presign expiry must not exceed {MAX_PRESIGN_EXPIRES_SECS} seconds, got {secs}"
        )));
    }
    Ok(secs)
}
