//! Loopback axum server for exercising the fetch paths without the network

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::get;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    status: StatusCode,
    body: String,
}

impl Route {
    pub fn ok(path: &str, body: impl Into<String>) -> Self {
        Route::status(path, 200, body)
    }

    pub fn status(path: &str, status: u16, body: impl Into<String>) -> Self {
        Route {
            path: path.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub target: String,
    pub headers: HeaderMap,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type RequestLog = Arc<Mutex<Vec<Request>>>;

fn record(log: &RequestLog, uri: &Uri, headers: HeaderMap) {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    log.lock().unwrap().push(Request { target, headers });
}

pub struct TestServer {
    base: String,
    requests: RequestLog,
}

impl TestServer {
    /// Serve `routes` on an ephemeral port; unknown paths get a 404
    pub async fn start(routes: Vec<Route>) -> Self {
        TestServer::start_with(|_| routes).await
    }

    /// Like `start`, for routes whose bodies embed the server's own base URL
    pub async fn start_with(routes: impl FnOnce(&str) -> Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));

        let mut app = Router::new();
        for route in routes(&base) {
            let log = requests.clone();
            let Route { path, status, body } = route;
            app = app.route(
                &path,
                get(move |uri: Uri, headers: HeaderMap| async move {
                    record(&log, &uri, headers);
                    (status, body)
                }),
            );
        }
        let log = requests.clone();
        app = app.fallback(move |uri: Uri, headers: HeaderMap| async move {
            record(&log, &uri, headers);
            (StatusCode::NOT_FOUND, "not found")
        });

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { base, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

/// Client that never routes loopback requests through an env proxy
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
