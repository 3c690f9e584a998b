//! In-process stand-in for the DIP API.
//!
//! [`MockDip`] is an axum app with a single fallback handler, listening on a
//! random local port and answering from a routing table keyed by path.
//! Every request is recorded so tests can assert on the query string and
//! headers the client actually sent.
//!
//! The server runs on its own thread with its own tokio runtime, so it keeps
//! serving while the test thread blocks (e.g. on a child process).

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Path prefix the mock mounts the API under
pub const API_PREFIX: &str = "/api/v1";

/// Canned response for one route
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
    /// Wait this long before answering
    pub delay: Option<Duration>,
}

impl MockResponse {
    /// `200 OK` with a JSON body
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "application/json".to_string(),
            body: body.into(),
            delay: None,
        }
    }

    /// `200 OK` with an XML body
    pub fn xml(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "application/xml".to_string(),
            body: body.into(),
            delay: None,
        }
    }

    /// Arbitrary status with a plain-text body
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            body: body.into(),
            delay: None,
        }
    }

    /// Hold the response back for `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// One request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Header names are lower-cased
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// First value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Header value, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

type Routes = Arc<Mutex<HashMap<String, MockResponse>>>;
type Requests = Arc<Mutex<Vec<RecordedRequest>>>;

/// A running mock DIP server. Stops when dropped.
pub struct MockDip {
    addr: SocketAddr,
    routes: Routes,
    requests: Requests,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockDip {
    /// Start the server on `127.0.0.1` with an empty routing table.
    ///
    /// # Panics
    /// Panics if the listener cannot be bound or the runtime cannot start.
    pub fn start() -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|e| panic!("MockDip: failed to bind: {e}"));
        listener
            .set_nonblocking(true)
            .unwrap_or_else(|e| panic!("MockDip: failed to set non-blocking: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("MockDip: no local address: {e}"));

        let routes: Routes = Arc::default();
        let requests: Requests = Arc::default();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let thread_routes = Arc::clone(&routes);
        let thread_requests = Arc::clone(&requests);
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap_or_else(|e| panic!("MockDip: failed to build runtime: {e}"));
            runtime.block_on(serve(listener, thread_routes, thread_requests, shutdown_rx));
        });

        Self {
            addr,
            routes,
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Base URL to configure the client with (includes [`API_PREFIX`])
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }

    /// Absolute URL for a server path
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Register (or replace) the response for a path
    pub fn route(&self, path: &str, response: MockResponse) -> &Self {
        lock(&self.routes).insert(path.to_string(), response);
        self
    }

    /// Register the plenary protocol listing response
    pub fn route_listing(&self, response: MockResponse) -> &Self {
        self.route(&format!("{API_PREFIX}/plenarprotokoll"), response)
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

impl Drop for MockDip {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A base URL on which nothing is listening.
///
/// Binds an ephemeral port and releases it again, so connections are refused.
pub fn unreachable_base_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .unwrap_or_else(|e| panic!("unreachable_base_url: failed to bind: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("unreachable_base_url: no local address: {e}"));
    drop(listener);
    format!("http://{addr}{API_PREFIX}")
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone)]
struct MockState {
    routes: Routes,
    requests: Requests,
}

fn router(state: MockState) -> Router {
    Router::new().fallback(respond).with_state(state)
}

async fn serve(
    listener: StdTcpListener,
    routes: Routes,
    requests: Requests,
    shutdown: oneshot::Receiver<()>,
) {
    let listener = TcpListener::from_std(listener)
        .unwrap_or_else(|e| panic!("MockDip: failed to register listener: {e}"));
    axum::serve(listener, router(MockState { routes, requests }))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
        .unwrap_or_else(|e| panic!("MockDip: server error: {e}"));
}

async fn respond(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
    };
    let response = lock(&state.routes)
        .get(&request.path)
        .cloned()
        .unwrap_or_else(|| MockResponse::status(404, "not found"));
    lock(&state.requests).push(request);

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, response.content_type)],
        response.body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().get(url)
    }

    #[tokio::test]
    async fn records_query_and_headers() {
        let mock = MockDip::start();
        mock.route_listing(MockResponse::json("{}"));

        let response = get(&format!("{}/plenarprotokoll", mock.base_url()))
            .query(&[("f.zuordnung", "BT"), ("sort", "-datum"), ("q", "a b&c")])
            .header("Authorization", "ApiKey abc")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "{}");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/v1/plenarprotokoll");
        assert_eq!(request.query_param("f.zuordnung"), Some("BT"));
        assert_eq!(request.query_param("sort"), Some("-datum"));
        assert_eq!(request.query_param("q"), Some("a b&c"));
        assert_eq!(request.header("AUTHORIZATION"), Some("ApiKey abc"));
    }

    #[tokio::test]
    async fn unrouted_paths_are_not_found() {
        let mock = MockDip::start();

        let response = get(&mock.url("/nowhere")).send().await.unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(mock.requests()[0].path, "/nowhere");
    }

    #[tokio::test]
    async fn status_responses_keep_their_body() {
        let mock = MockDip::start();
        mock.route("/down", MockResponse::status(503, "maintenance"));

        let response = get(&mock.url("/down")).send().await.unwrap();

        assert_eq!(response.status(), 503);
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert_eq!(response.text().await.unwrap(), "maintenance");
    }
}
