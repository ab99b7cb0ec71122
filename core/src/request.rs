use std::str::FromStr;

use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use percent_encoding::percent_decode_str;

use crate::Error;
use crate::Result;

/// RequestDescriptor describes the request to sign.
///
/// The descriptor must be fully assembled before signing: the signature is a
/// hash over its exact serialized form. Signing never mutates it, signers
/// return the authorization data as a new value instead.
///
/// `path` and `query` hold percent-decoded values. Signers encode them again
/// following their own canonicalization rules.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// Absolute path, percent decoded.
    pub path: String,
    /// Query pairs in request order, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    /// Build a descriptor from an absolute, percent-encoded uri.
    pub fn new(method: Method, uri: &str) -> Result<Self> {
        let uri = Uri::from_str(uri)?;
        Self::from_uri(method, uri, HeaderMap::new())
    }

    /// Build a descriptor from http::request::Parts.
    ///
    /// The parts are left untouched, headers are copied.
    pub fn from_parts(parts: &http::request::Parts) -> Result<Self> {
        Self::from_uri(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
    }

    fn from_uri(method: Method, uri: Uri, headers: HeaderMap) -> Result<Self> {
        let uri = uri.into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let path = percent_decode_str(paq.path()).decode_utf8()?.into_owned();

        Ok(RequestDescriptor {
            method,
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path,
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers,
        })
    }

    /// Replace the path with a percent decoded absolute path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Push a new query pair into query list.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Insert a header, replacing any value already set under the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_str(name.trim())?;
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    /// Append a header value, keeping values already set under the same name.
    pub fn append_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_str(name.trim())?;
        self.headers.append(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    /// Merge another header collection into this one.
    ///
    /// Names present in `headers` replace every existing value of the same
    /// name, they never end up duplicated.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Host as it must appear in the `host` header and the request url.
    ///
    /// The port is dropped when it is the default one of the scheme.
    pub fn host(&self) -> String {
        let default_port = match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };

        match self.authority.port_u16() {
            Some(port) if Some(port) != default_port => {
                format!("{}:{}", self.authority.host(), port)
            }
            _ => self.authority.host().to_string(),
        }
    }
}
