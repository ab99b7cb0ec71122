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

use super::{init_signing_test, load_static_credential};
use anyhow::Result;
use http::{Method, StatusCode};
use log::{debug, warn};
use reqwest::Client;
use s3sign_core::RequestDescriptor;
use std::time::Duration;

#[tokio::test]
async fn test_get_object_with_presigned_url() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("S3SIGN_V4_TEST is not set, skipped");
        return Ok(());
    };

    let cred = load_static_credential()?;

    let req = RequestDescriptor::new(Method::GET, &format!("{}/{}", url, "not_exist_file"))?;
    let presigned = signer.presign(&req, &cred, Some(Duration::from_secs(3600)))?;
    debug!("presigned url: {presigned}");

    let resp = Client::new().get(presigned).send().await?;

    debug!("got response: {resp:?}");
    assert_eq!(StatusCode::NOT_FOUND, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_put_object_with_presigned_url() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("S3SIGN_V4_TEST is not set, skipped");
        return Ok(());
    };

    let cred = load_static_credential()?;

    let req = RequestDescriptor::new(Method::PUT, &format!("{}/{}", url, "presigned_put_test"))?;
    let presigned = signer.presign(&req, &cred, None)?;
    debug!("presigned url: {presigned}");

    let resp = Client::new()
        .put(presigned)
        .body("Hello, World!")
        .send()
        .await?;

    debug!("got response: {resp:?}");
    assert_eq!(StatusCode::OK, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_presigned_url_with_query() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("S3SIGN_V4_TEST is not set, skipped");
        return Ok(());
    };

    let cred = load_static_credential()?;

    let req = RequestDescriptor::new(Method::GET, &format!("{url}?list-type=2&prefix=CI/"))?;
    let presigned = signer.presign(&req, &cred, Some(Duration::from_secs(60)))?;
    debug!("presigned url: {presigned}");

    let resp = Client::new().get(presigned).send().await?;

    debug!("got response: {resp:?}");
    assert_eq!(StatusCode::OK, resp.status());
    Ok(())
}
