use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::buffer::ResponseBuffer;
use crate::error::TransportError;

/// Network backend a [`QueryTask`](crate::task::QueryTask) delegates to.
///
/// Implementations write whatever body they receive into `sink`, including
/// the body of a non-2xx answer, before reporting the outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, sink: &mut ResponseBuffer) -> Result<(), TransportError>;

    async fn post(
        &self,
        url: &Url,
        body: Vec<u8>,
        sink: &mut ResponseBuffer,
    ) -> Result<(), TransportError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url, sink: &mut ResponseBuffer) -> Result<(), TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::connection(url, e))?;
        read_body(url, response, sink).await
    }

    async fn post(
        &self,
        url: &Url,
        body: Vec<u8>,
        sink: &mut ResponseBuffer,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::connection(url, e))?;
        read_body(url, response, sink).await
    }
}

async fn read_body(
    url: &Url,
    mut response: Response,
    sink: &mut ResponseBuffer,
) -> Result<(), TransportError> {
    let status = response.status();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| TransportError::connection(url, e))?
    {
        sink.extend_from_slice(&chunk);
    }
    debug!("{} {} ({} bytes)", status.as_u16(), url, sink.len());
    if !status.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}
