//! How a [`SupabaseClient`](super::SupabaseClient) talks to the network.
//!
//! The client only ever issues authenticated GETs, so the seam is a single
//! method. Tests swap in a transport that records the URL and key instead
//! of sending anything.

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Sends one authenticated GET and decodes the JSON body.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, api_key: &SecretString) -> impl Future<Output = Result<Value>> + Send;
}

/// reqwest-backed transport. Building it does not touch the network.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("supabase-bootstrap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, api_key: &SecretString) -> Result<Value> {
        let key = api_key.expose_secret();
        let resp = self
            .http
            .get(url)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn get(&self, url: &str, api_key: &SecretString) -> impl Future<Output = Result<Value>> + Send {
        (**self).get(url, api_key)
    }
}
