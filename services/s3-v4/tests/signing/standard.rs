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

use super::{init_signing_test, load_static_credential, send_signed_request};
use anyhow::Result;
use http::{Method, Request, StatusCode};
use log::warn;
use s3sign_core::RequestDescriptor;
use s3sign_v4::{hash_async_reader, Payload};
use std::io::SeekFrom;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

#[tokio::test]
async fn test_head_object() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("S3SIGN_V4_TEST is not set, skipped");
        return Ok(());
    };

    let cred = load_static_credential()?;

    let mut req = Request::new(String::new());
    *req.method_mut() = Method::HEAD;
    *req.uri_mut() = format!("{}/{}", url, "not_exist_file").parse()?;

    let (status, _body) = send_signed_request(&signer, req, &cred).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("S3SIGN_V4_TEST is not set, skipped");
        return Ok(());
    };

    let cred = load_static_credential()?;

    let mut req = Request::new("Hello, World!".to_string());
    *req.method_mut() = Method::PUT;
    *req.uri_mut() = format!("{}/{}", url, "put_object_test").parse()?;

    let (status, _body) = send_signed_request(&signer, req, &cred).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object_from_file() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("S3SIGN_V4_TEST is not set, skipped");
        return Ok(());
    };

    let cred = load_static_credential()?;

    let mut f = tokio::fs::File::from_std(tempfile::tempfile()?);
    f.write_all(&vec![b'x'; 256 * 1024]).await?;
    f.seek(SeekFrom::Start(0)).await?;

    // The hash leaves the file where it was, so the same handle is sent as body.
    let payload = Payload::Hashed(hash_async_reader(&mut f).await?);
    let mut body = Vec::new();
    f.read_to_end(&mut body).await?;

    let req = RequestDescriptor::new(Method::PUT, &format!("{url}/put_object_from_file_test"))?;
    let auth = signer.sign(&req, &payload, &cred)?;

    let resp = reqwest::Client::new()
        .put(format!("{url}/put_object_from_file_test"))
        .headers(auth.headers().clone())
        .body(body)
        .send()
        .await?;
    assert_eq!(StatusCode::OK, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_list_bucket() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("S3SIGN_V4_TEST is not set, skipped");
        return Ok(());
    };

    let cred = load_static_credential()?;

    let mut req = Request::new(String::new());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = format!("{url}?list-type=2&delimiter=/&encoding-type=url").parse()?;

    let (status, _body) = send_signed_request(&signer, req, &cred).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}
