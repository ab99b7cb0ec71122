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

use crate::canonical::uri_encode_path;
use crate::constants::*;
use crate::sign_request::check_presign_expires;
use crate::{Credential, RequestSigner};
use http::Method;
use log::debug;
use s3sign_core::utils::Redact;
use s3sign_core::{Env, Error, RequestDescriptor, Result};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Config for signing requests against an s3 compatible service.
///
/// Every field is optional. Unset fields fall back to the defaults:
/// region `us-east-1`, service `s3`, endpoint `https://storage.yandexcloud.net`
/// and a presign expiry of one hour.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// Service name used in the credential scope, `s3` if unset.
    pub service: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ENDPOINT_URL`]
    ///
    /// - [`DEFAULT_ENDPOINT`]
    ///
    /// Must carry the scheme, like `https://storage.yandexcloud.net`.
    pub endpoint: Option<String>,
    /// `bucket` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`S3SIGN_BUCKET`]
    pub bucket: Option<String>,
    /// `presign_expires` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`S3SIGN_PRESIGN_EXPIRES`] in seconds
    pub presign_expires: Option<Duration>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("presign_expires", &self.presign_expires)
            .finish()
    }
}

impl Config {
    /// Load config from env, only filling fields that are still unset.
    pub fn from_env(mut self, env: &impl Env) -> Result<Self> {
        if self.access_key_id.is_none() {
            self.access_key_id = env.var(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = env.var(AWS_SECRET_ACCESS_KEY);
        }
        if self.region.is_none() {
            self.region = env
                .var(AWS_REGION)
                .or_else(|| env.var(AWS_DEFAULT_REGION));
        }
        if self.endpoint.is_none() {
            self.endpoint = env.var(AWS_ENDPOINT_URL);
        }
        if self.bucket.is_none() {
            self.bucket = env.var(S3SIGN_BUCKET);
        }
        if self.presign_expires.is_none() {
            if let Some(v) = env.var(S3SIGN_PRESIGN_EXPIRES) {
                let secs = v.trim().parse::<u64>().map_err(|e| {
                    Error::config_invalid(format!(
                        "{S3SIGN_PRESIGN_EXPIRES} must be a number of seconds, got {v}"
                    ))
                    .with_source(e)
                })?;
                self.presign_expires = Some(Duration::from_secs(secs));
            }
        }

        debug!("loaded config from env: {self:?}");
        Ok(self)
    }

    /// Effective region.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Effective service.
    pub fn service(&self) -> &str {
        self.service.as_deref().unwrap_or(DEFAULT_SERVICE)
    }

    /// Effective endpoint.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Effective presign expiry.
    pub fn presign_expires(&self) -> Duration {
        self.presign_expires
            .unwrap_or(Duration::from_secs(DEFAULT_PRESIGN_EXPIRES_SECS))
    }

    /// Build the credential, failing if any key is missing.
    pub fn credential(&self) -> Result<Credential> {
        let cred = Credential::new(
            self.access_key_id.as_deref().unwrap_or_default(),
            self.secret_access_key.as_deref().unwrap_or_default(),
        );
        cred.check()?;
        Ok(cred)
    }

    /// Build a signer for the configured service and region.
    pub fn signer(&self) -> Result<RequestSigner> {
        check_presign_expires(self.presign_expires())?;

        Ok(RequestSigner::new(self.service(), self.region())
            .with_default_expires(self.presign_expires()))
    }

    /// Path style url of an object: `<endpoint>/<bucket>/<key>`.
    ///
    /// The key is percent encoded like a canonical path, `/` in the key is
    /// kept as separator. Without a bucket the key is placed right after the
    /// endpoint.
    pub fn object_uri(&self, key: &str) -> Result<String> {
        let endpoint = self.endpoint().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(Error::config_invalid("endpoint must not be empty"));
        }

        let key = uri_encode_path(&format!("/{}", key.trim_start_matches('/')));
        match self.bucket.as_deref() {
            Some(bucket) => Ok(format!("{endpoint}/{}{key}", bucket.trim_matches('/'))),
            None => Ok(format!("{endpoint}{key}")),
        }
    }

    /// Descriptor of an object request, see [`Config::object_uri`].
    pub fn object_request(&self, method: Method, key: &str) -> Result<RequestDescriptor> {
        RequestDescriptor::new(method, &self.object_uri(key)?)
    }
}
