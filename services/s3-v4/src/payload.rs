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

//! Payload hashing.
//!
//! Streams are hashed incrementally from their current position to the end,
//! then rewound so the same stream can be sent as the request body.

use crate::constants::{EMPTY_STRING_SHA256, UNSIGNED_PAYLOAD};
use bytes::Bytes;
use log::debug;
use s3sign_core::hash::hex_sha256;
use s3sign_core::Result;
use sha2::{Digest, Sha256};
use std::io::{Read, Seek, SeekFrom};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

const CHUNK_SIZE: usize = 64 * 1024;

/// Body of the request to sign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// Body held in memory.
    Bytes(Bytes),
    /// Hex encoded SHA-256 computed ahead of signing, usually by [`hash_reader`].
    Hashed(String),
    /// Body excluded from the signature.
    Unsigned,
}

impl Payload {
    /// Hash a seekable stream and keep its position, see [`hash_reader`].
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        hash_reader(reader).map(Payload::Hashed)
    }

    /// Hash an async seekable stream and keep its position, see [`hash_async_reader`].
    pub async fn from_async_reader<R>(reader: &mut R) -> Result<Self>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        hash_async_reader(reader).await.map(Payload::Hashed)
    }

    /// Value for both `x-amz-content-sha256` and the last canonical request line.
    pub fn content_sha256(&self) -> String {
        match self {
            Payload::Empty => EMPTY_STRING_SHA256.to_string(),
            Payload::Bytes(bs) if bs.is_empty() => EMPTY_STRING_SHA256.to_string(),
            Payload::Bytes(bs) => hex_sha256(bs),
            Payload::Hashed(v) => v.clone(),
            Payload::Unsigned => UNSIGNED_PAYLOAD.to_string(),
        }
    }
}

impl From<Bytes> for Payload {
    fn from(bs: Bytes) -> Self {
        Payload::Bytes(bs)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bs: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bs))
    }
}

impl From<&[u8]> for Payload {
    fn from(bs: &[u8]) -> Self {
        Payload::Bytes(Bytes::copy_from_slice(bs))
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Bytes(Bytes::from(s))
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }
}

/// Hex encoded SHA-256 of everything between the current position of `reader`
/// and its end.
///
/// The reader is moved back to where it started before returning. Any read or
/// seek failure is returned as is, a partial digest is never produced.
pub fn hash_reader<R: Read + Seek>(reader: &mut R) -> Result<String> {
    let start = reader.stream_position()?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    reader.seek(SeekFrom::Start(start))?;
    debug!("hashed {total} bytes of payload starting at offset {start}");

    Ok(hex::encode(hasher.finalize()))
}

/// Async version of [`hash_reader`].
///
/// Dropping the returned future before it completes leaves the reader at an
/// unspecified position.
pub async fn hash_async_reader<R>(reader: &mut R) -> Result<String>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let start = reader.stream_position().await?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    reader.seek(SeekFrom::Start(start)).await?;
    debug!("hashed {total} bytes of async payload starting at offset {start}");

    Ok(hex::encode(hasher.finalize()))
}
