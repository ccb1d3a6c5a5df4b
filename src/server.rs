//! HTTP front end: `GET /generate-card?username=...`
//!
//! Requests are accepted on a blocking `tiny_http` loop and each one is
//! handed to the tokio runtime, so a slow upstream only holds up its own
//! response.

use crate::rendering::OutputFormat;
use crate::{CardGenerator, Error, Result};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response};
use url::Url;

pub const CARD_ROUTE: &str = "/generate-card";

/// JSON body returned for every failure
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
}

/// A response ready to be written to the client
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::to_vec(&ErrorBody {
            success: false,
            message,
        })
        .unwrap_or_else(|_| b"{\"success\":false}".to_vec());
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut resp = Response::from_data(self.body).with_status_code(self.status);
        for (k, v) in [
            ("Content-Type", self.content_type),
            ("Access-Control-Allow-Origin", "*"),
        ] {
            if let Ok(h) = Header::from_bytes(k.as_bytes(), v.as_bytes()) {
                resp.add_header(h);
            }
        }
        resp
    }
}

/// Route a request line to a reply. `target` is the raw request target, e.g. `/generate-card?username=x`.
pub async fn route(generator: &CardGenerator, method: &Method, target: &str) -> Reply {
    let Ok(url) = Url::parse("http://localhost").and_then(|base| base.join(target)) else {
        return Reply::error(400, "Malformed request target");
    };

    if *method != Method::Get || url.path() != CARD_ROUTE {
        return Reply::error(404, "Route not found");
    }

    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
    };

    let Some(username) = query("username").filter(|u| !u.is_empty()) else {
        return Reply::error(400, "Username is required");
    };

    let format = match query("format").filter(|f| !f.is_empty()) {
        None => OutputFormat::default(),
        Some(f) => match f.parse::<OutputFormat>() {
            Ok(f) => f,
            Err(e) => return Reply::error(400, &e.to_string()),
        },
    };

    log::info!("generating {:?} card for {}", format, username);
    match generator.generate(&username, format).await {
        Ok(card) => Reply {
            status: 200,
            content_type: card.content_type(),
            body: card.data,
        },
        Err(e) => {
            log::error!("card for {} failed: {}", username, e);
            Reply::error(500, &format!("Failed to generate card: {}", e))
        }
    }
}

/// Listening HTTP server bound to an address
pub struct Server {
    http: tiny_http::Server,
    generator: Arc<CardGenerator>,
}

impl Server {
    pub fn bind(addr: &str, generator: CardGenerator) -> Result<Self> {
        let http = tiny_http::Server::http(addr)
            .map_err(|e| Error::ConfigError(format!("Failed to bind {}: {}", addr, e)))?;
        Ok(Self {
            http,
            generator: Arc::new(generator),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Accept requests until the listener fails, spawning each onto `runtime`.
    ///
    /// Blocks the calling thread; run it via `spawn_blocking` or a dedicated thread.
    pub fn serve(self, runtime: tokio::runtime::Handle) {
        if let Some(addr) = self.local_addr() {
            log::info!("listening on http://{}", addr);
        }
        for request in self.http.incoming_requests() {
            let generator = Arc::clone(&self.generator);
            runtime.spawn(handle(generator, request));
        }
    }
}

async fn handle(generator: Arc<CardGenerator>, request: Request) {
    let method = request.method().clone();
    let target = request.url().to_string();
    log::debug!("{} {}", method, target);
    let reply = route(&generator, &method, &target).await;
    let status = reply.status;
    if let Err(e) = request.respond(reply.into_response()) {
        log::warn!("failed to write {} response: {}", status, e);
    }
}
