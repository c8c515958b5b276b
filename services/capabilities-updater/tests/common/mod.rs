//! Shared helpers for the updater integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;

use capabilities_updater::{capabilities_url, CapabilitiesSource, FetchRequest, FetchedCapabilities};
use ogc_common::{simplify_url, ServiceError, ServiceResult};

/// Capabilities source answering from a fixed table keyed by simplified URL.
///
/// URLs without an entry fail with a network error.
#[derive(Default)]
pub struct MockSource {
    documents: HashMap<String, String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, xml: &str) -> Self {
        self.documents.insert(simplify_url(url), xml.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CapabilitiesSource for MockSource {
    async fn fetch(&self, request: &FetchRequest) -> ServiceResult<FetchedCapabilities> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let url = capabilities_url(&request.url, request.service_type, request.version.as_deref());
        match self.documents.get(&simplify_url(&request.url)) {
            Some(xml) => Ok(FetchedCapabilities {
                url,
                encoding: "UTF-8".to_string(),
                data: xml.clone(),
            }),
            None => Err(ServiceError::NetworkError(format!("Connection refused: {}", url))),
        }
    }
}

/// Serve `app` on an ephemeral local port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
