//! HTTP-backed blob source signed with a shared key

use super::error::StorageError;
use super::signing::{SharedKeyCredential, API_VERSION};
use super::source::BlobSource;
use super::types::{BlobConfig, BlobResult, BlobSegment, PageToken};
use super::xml;
use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, Url};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct BlobClient {
    http: Client,
    config: BlobConfig,
    credential: SharedKeyCredential,
}

impl BlobClient {
    pub fn new(config: BlobConfig, credential: SharedKeyCredential) -> BlobResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            config,
            credential,
        })
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    fn parse_url(raw: &str) -> BlobResult<Url> {
        Url::parse(raw).map_err(|e| StorageError::Malformed(format!("invalid URL {}: {}", raw, e)))
    }

    fn signed_get(&self, url: &Url) -> RequestBuilder {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let headers = [("x-ms-date", date.as_str()), ("x-ms-version", API_VERSION)];
        let authorization = self.credential.authorization("GET", url, &headers);

        let mut request = self.http.get(url.clone());
        for (name, value) in headers {
            request = request.header(name, value);
        }
        request.header(AUTHORIZATION, authorization)
    }

    async fn get(&self, url: &Url) -> BlobResult<Response> {
        let response = self.signed_get(url).send().await?;
        if !response.status().is_success() {
            return Err(service_error(response).await);
        }
        Ok(response)
    }
}

/// Turn a non-2xx response into a `StorageError::Service`, reading the error
/// code from `x-ms-error-code` or, failing that, the XML body.
async fn service_error(response: Response) -> StorageError {
    let status = response.status().as_u16();
    let header_code = response
        .headers()
        .get("x-ms-error-code")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();

    let code = header_code
        .or_else(|| xml::element_text(&body, "Code").map(|c| xml::unescape(c).into_owned()))
        .unwrap_or_default();
    let message = xml::element_text(&body, "Message")
        .map(|m| xml::unescape(m).into_owned())
        .unwrap_or_else(|| body.trim().to_string());

    StorageError::service(status, code, message)
}

#[async_trait]
impl BlobSource for BlobClient {
    async fn list_segment(&self, token: &PageToken) -> BlobResult<BlobSegment> {
        let mut url = Self::parse_url(&self.config.container_url())?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("restype", "container");
            query.append_pair("comp", "list");
            if let Some(marker) = token.marker() {
                query.append_pair("marker", marker);
            }
        }

        let body = self.get(&url).await?.text().await?;
        xml::parse_list_blobs(&body)
    }

    async fn download_to_file(&self, name: &str, file: &mut File) -> BlobResult<u64> {
        let url = Self::parse_url(&self.config.blob_url(name))?;
        let response = self.get(&url).await?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    fn blob_url(&self, name: &str) -> String {
        self.config.blob_url(name)
    }
}
