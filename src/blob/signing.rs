//! Shared-key request signing
//!
//! Each request is signed with HMAC-SHA256 over a canonical string built from
//! the verb, the standard headers, the `x-ms-*` headers and the resource path,
//! keyed with the base64-decoded account key.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// REST API version sent as `x-ms-version`.
pub const API_VERSION: &str = "2021-08-06";

/// Content-Encoding through Range: the standard headers covered by the
/// signature. None of the requests made here set any of them.
const STANDARD_HEADER_SLOTS: usize = 11;

#[derive(Clone)]
pub struct SharedKeyCredential {
    account_name: String,
    key: Vec<u8>,
}

impl fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

impl SharedKeyCredential {
    /// Build a credential from the account name and its base64 access key.
    pub fn new(account_name: &str, account_key: &str) -> Result<Self, base64::DecodeError> {
        Ok(Self {
            account_name: account_name.to_string(),
            key: BASE64.decode(account_key.trim())?,
        })
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    fn sign(&self, string_to_sign: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    /// Value of the `Authorization` header for a body-less request.
    pub fn authorization(&self, method: &str, url: &Url, ms_headers: &[(&str, &str)]) -> String {
        let string_to_sign = string_to_sign(&self.account_name, method, url, ms_headers);
        format!("SharedKey {}:{}", self.account_name, self.sign(&string_to_sign))
    }
}

fn string_to_sign(
    account_name: &str,
    method: &str,
    url: &Url,
    ms_headers: &[(&str, &str)],
) -> String {
    let mut out = String::new();
    out.push_str(method);
    out.push('\n');
    for _ in 0..STANDARD_HEADER_SLOTS {
        out.push('\n');
    }
    out.push_str(&canonicalized_headers(ms_headers));
    out.push_str(&canonicalized_resource(account_name, url));
    out
}

fn canonicalized_headers(ms_headers: &[(&str, &str)]) -> String {
    let headers: BTreeMap<String, &str> = ms_headers
        .iter()
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim()))
        .filter(|(name, _)| name.starts_with("x-ms-"))
        .collect();

    headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect()
}

fn canonicalized_resource(account_name: &str, url: &Url) -> String {
    let mut resource = format!("/{}{}", account_name, url.path());

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into_owned());
    }

    for (name, mut values) in params {
        values.sort();
        resource.push('\n');
        resource.push_str(&name);
        resource.push(':');
        resource.push_str(&values.join(","));
    }

    resource
}
