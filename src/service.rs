use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::err::{Error, Result};
use crate::models::{Certificate, CertificateForm, RecordId};

/// The remote collaborator that owns durable certificate storage.
///
/// Replies to mutating calls are opaque JSON: callers only log them.
#[async_trait]
pub trait CertificateService: Send + Sync {
    async fn register_certificate(&self, candidate: &CertificateForm) -> Result<Value>;
    async fn get_certificates(&self) -> Result<Vec<Certificate>>;
    async fn update_certificate(&self, certificate: &Certificate) -> Result<Value>;
    async fn delete_certificate(&self, id: &RecordId) -> Result<Value>;
}

/// REST client for the certificate API.
#[derive(Debug, Clone)]
pub struct HttpCertificateService {
    client: Client,
    api: ApiConfig,
}

impl HttpCertificateService {
    pub fn new(api: ApiConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, api))
    }

    pub fn with_client(client: Client, api: ApiConfig) -> Self {
        Self { client, api }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api.base_url.trim_end_matches('/'), endpoint)
    }

    fn delete_url(&self, id: &RecordId) -> Result<Url> {
        let mut url = Url::parse(&self.url(&self.api.delete_endpoint))
            .map_err(|err| Error::call_failed("UrlError", err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| Error::call_failed("UrlError", "base url cannot carry a path"))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl CertificateService for HttpCertificateService {
    async fn register_certificate(&self, candidate: &CertificateForm) -> Result<Value> {
        let url = self.url(&self.api.register_endpoint);
        log::debug!("POST {}", url);
        let resp = self.client.post(url).json(candidate).send().await?;
        read_reply(resp).await
    }

    async fn get_certificates(&self) -> Result<Vec<Certificate>> {
        let url = self.url(&self.api.fetch_all_endpoint);
        log::debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;
        match read_reply(resp).await? {
            Value::Null => Ok(Vec::new()),
            body => Ok(serde_json::from_value(body)?),
        }
    }

    async fn update_certificate(&self, certificate: &Certificate) -> Result<Value> {
        let url = self.url(&self.api.update_endpoint);
        log::debug!("PUT {}", url);
        let resp = self.client.put(url).json(certificate).send().await?;
        read_reply(resp).await
    }

    async fn delete_certificate(&self, id: &RecordId) -> Result<Value> {
        let url = self.delete_url(id)?;
        log::debug!("DELETE {}", url);
        let resp = self.client.delete(url).send().await?;
        read_reply(resp).await
    }
}

async fn read_reply(resp: Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(Error::call_failed("HttpStatus", format!("{}: {}", status, body)));
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    // plain-text confirmations are kept as a JSON string
    Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
}
