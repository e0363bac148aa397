use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

use crate::error::{HarnessError, TransportErrorKind, TransportFailure};

use super::request::RequestInput;
use super::response::{HttpResponse, ResponseJson};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Shared client for one run: a single connection pool, the base URL and the
/// default JSON headers every request starts from.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HarnessError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| HarnessError::Configuration(format!("Invalid base URL `{base_url}`: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        default_headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

        Ok(Self {
            client,
            base_url,
            default_headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &str) -> Result<Url, String> {
        let raw = format!("{}{endpoint}", self.base_url);
        Url::parse(&raw).map_err(|e| format!("Invalid URL `{raw}`: {e}"))
    }

    /// Issues exactly one request. Anything short of a complete HTTP response
    /// comes back as a `TransportFailure`; status codes are never judged here.
    pub async fn send(&self, request: RequestInput<'_>) -> Result<HttpResponse, TransportFailure> {
        let url = self
            .url_for(request.endpoint)
            .map_err(|reason| TransportFailure::new(TransportErrorKind::Request, reason))?;
        let headers = build_headers(&self.default_headers, request.header_overrides)
            .map_err(|reason| TransportFailure::new(TransportErrorKind::Request, reason))?;

        let mut req_builder = self
            .client
            .request(request.method.into(), url)
            .headers(headers);

        if let Some(payload) = request.payload.filter(|_| request.method.accepts_body()) {
            let body = serde_json::to_vec(payload).map_err(|e| {
                TransportFailure::new(TransportErrorKind::Request, format!("Failed to encode payload: {e}"))
            })?;
            req_builder = req_builder.body(body);
        }

        log::debug!("{} {}{}", request.method, self.base_url, request.endpoint);

        let started = Instant::now();
        let response = req_builder
            .send()
            .await
            .map_err(|e| TransportFailure::from_reqwest(&e))?;
        let status_code = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            TransportFailure::new(TransportErrorKind::Read, format!("Failed to read response: {e}"))
        })?;
        let duration_ms = started.elapsed().as_millis();

        log::debug!(
            "{} {} -> {status_code} ({} bytes, {duration_ms} ms)",
            request.method,
            request.endpoint,
            bytes.len()
        );

        Ok(HttpResponse {
            status_code,
            duration_ms,
            json: ResponseJson::from_bytes(&bytes),
            body: bytes.to_vec(),
        })
    }
}

/// Applies per-case overrides on top of the defaults; an override replaces
/// the default value for the same header name.
pub fn build_headers(defaults: &HeaderMap, overrides: &[(String, String)]) -> Result<HeaderMap, String> {
    let mut headers = defaults.clone();

    for (key, value) in overrides {
        let key = key.trim();
        if key.is_empty() {
            return Err("Header key cannot be empty".to_string());
        }

        let header_name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| format!("Invalid header key `{key}`: {e}"))?;
        let header_value = HeaderValue::from_str(value.trim())
            .map_err(|e| format!("Invalid header value for `{key}`: {e}"))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::HttpMethod;
    use serde_json::json;
    use std::io::Read;
    use std::thread;
    use tiny_http::{Header, Response, Server};

    struct Captured {
        method: String,
        content_type: Option<String>,
        accept: Option<String>,
        body: String,
    }

    fn capture_one(status: u16, body: &'static str) -> (String, thread::JoinHandle<Captured>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let header = |name: &str| {
                request
                    .headers()
                    .iter()
                    .find(|header| header.field.as_str().as_str().eq_ignore_ascii_case(name))
                    .map(|header| header.value.as_str().to_string())
            };
            let content_type = header("Content-Type");
            let accept = header("Accept");
            let method = request.method().as_str().to_string();
            let mut received = String::new();
            request.as_reader().read_to_string(&mut received).unwrap();
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            request.respond(response).unwrap();
            Captured {
                method,
                content_type,
                accept,
                body: received,
            }
        });
        (format!("http://{addr}"), handle)
    }

    fn client(base_url: &str) -> HttpClient {
        HttpClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = client("http://127.0.0.1:5000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(
            client.url_for("/v1/health").unwrap().as_str(),
            "http://127.0.0.1:5000/v1/health"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = HttpClient::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn override_replaces_default_content_type() {
        let defaults = client("http://127.0.0.1:5000").default_headers;
        let overrides = vec![("Content-Type".to_string(), "text/plain".to_string())];
        let headers = build_headers(&defaults, &overrides).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get(ACCEPT).unwrap(), JSON_MEDIA_TYPE);
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = vec![("Bad Header".to_string(), "x".to_string())];
        assert!(build_headers(&HeaderMap::new(), &overrides).is_err());
    }

    #[tokio::test]
    async fn posts_json_payload_with_default_headers() {
        let (url, handle) = capture_one(200, r#"{"ok": true}"#);
        let payload = json!({"sma_period": 20, "threshold_pct": 1.5});
        let request = RequestInput {
            payload: Some(&payload),
            ..RequestInput::new(HttpMethod::Post, "/v1/analytics/sma-nearby")
        };

        let response = client(&url).send(request).await.unwrap();
        let captured = handle.join().unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.json.value(), Some(&json!({"ok": true})));
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.content_type.as_deref(), Some(JSON_MEDIA_TYPE));
        assert_eq!(captured.accept.as_deref(), Some(JSON_MEDIA_TYPE));
        let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(sent, payload);
    }

    #[tokio::test]
    async fn payload_is_dropped_for_delete() {
        let (url, handle) = capture_one(405, "");
        let payload = json!({"ignored": true});
        let request = RequestInput {
            payload: Some(&payload),
            ..RequestInput::new(HttpMethod::Delete, "/v1/health")
        };

        let response = client(&url).send(request).await.unwrap();
        let captured = handle.join().unwrap();

        assert_eq!(response.status_code, 405);
        assert_eq!(response.json, ResponseJson::Empty);
        assert_eq!(captured.method, "DELETE");
        assert!(captured.body.is_empty());
    }

    #[tokio::test]
    async fn header_override_reaches_the_wire() {
        let (url, handle) = capture_one(400, r#"{"error": "bad content type"}"#);
        let payload = json!({"test": "data"});
        let overrides = vec![("Content-Type".to_string(), "text/plain".to_string())];
        let request = RequestInput {
            payload: Some(&payload),
            header_overrides: &overrides,
            ..RequestInput::new(HttpMethod::Post, "/v1/analytics/sma-nearby")
        };

        let response = client(&url).send(request).await.unwrap();
        let captured = handle.join().unwrap();

        assert_eq!(response.status_code, 400);
        assert_eq!(captured.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = client(&format!("http://127.0.0.1:{port}"));

        let failure = client
            .send(RequestInput::new(HttpMethod::Get, "/v1/health"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, TransportErrorKind::Connect);
    }
}
