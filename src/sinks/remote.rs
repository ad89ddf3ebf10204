//! Remote sink for centralized logging
//!
//! Posts each event as a form-encoded body to the configured URL. Success is
//! a 200 response; anything else disables the sink. There is no retry.

use crate::core::formatter::REMOTE_CONTENT_TYPE;
use crate::core::{LogEvent, LoggerError, Result, SessionConfig, Sink, SinkKind};
use std::sync::Arc;
use url::Url;

/// Sends one form-encoded POST and returns the response status.
///
/// Transport failures (DNS, connect, TLS, I/O) are errors; any status the
/// server answers with, including 4xx and 5xx, is `Ok(status)`.
pub trait HttpTransport: Send + Sync {
    fn post_form(&self, url: &Url, body: &str) -> Result<u16>;
}

/// [`HttpTransport`] backed by a `ureq` agent with its default timeouts
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn post_form(&self, url: &Url, body: &str) -> Result<u16> {
        let response = self
            .agent
            .post(url.as_str())
            .set("Content-Type", REMOTE_CONTENT_TYPE)
            .send_string(body);

        match response {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(status, _)) => Ok(status),
            Err(ureq::Error::Transport(transport)) => {
                Err(LoggerError::transport(url.as_str(), transport.to_string()))
            }
        }
    }
}

/// Posts each event to `remote_url`
pub struct RemoteSink {
    transport: Arc<dyn HttpTransport>,
}

impl RemoteSink {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl Sink for RemoteSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Remote
    }

    fn deliver(&mut self, event: &LogEvent, config: &SessionConfig) -> Result<()> {
        let url = Url::parse(&config.remote_url)
            .map_err(|e| LoggerError::invalid_url(&config.remote_url, e.to_string()))?;
        let body = event.render_remote_body(&config.remote_identifier);

        match self.transport.post_form(&url, &body)? {
            200 => Ok(()),
            status => Err(LoggerError::http_status(url.as_str(), status)),
        }
    }

    fn failure_notice(&self, error: &LoggerError) -> String {
        match error {
            LoggerError::HttpStatus { status, .. } => {
                format!("Remote returned non-OK-status {} - disabling remote-logging", status)
            }
            _ => "Remote returned an error - disabling remote-logging".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use chrono::{Local, TimeZone};
    use parking_lot::Mutex;

    struct FixedStatus {
        status: u16,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl HttpTransport for FixedStatus {
        fn post_form(&self, url: &Url, body: &str) -> Result<u16> {
            self.requests.lock().push((url.to_string(), body.to_string()));
            Ok(self.status)
        }
    }

    struct Unreachable;

    impl HttpTransport for Unreachable {
        fn post_form(&self, url: &Url, _body: &str) -> Result<u16> {
            Err(LoggerError::transport(url.as_str(), "connection refused"))
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            remote_enabled: true,
            remote_url: "http://logs.internal/ingest".to_string(),
            remote_identifier: "node-7".to_string(),
            ..SessionConfig::default()
        }
    }

    fn event() -> LogEvent {
        let timestamp = Local
            .with_ymd_and_hms(2024, 2, 29, 23, 59, 58)
            .single()
            .expect("valid local datetime");
        LogEvent::at(timestamp, LogLevel::Warning, "sync.rs[200]", "lagging")
    }

    #[test]
    fn test_posts_form_body() {
        let transport = Arc::new(FixedStatus {
            status: 200,
            requests: Mutex::new(Vec::new()),
        });
        let mut sink = RemoteSink::new(transport.clone());

        sink.deliver(&event(), &config()).expect("200 is success");

        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "http://logs.internal/ingest");
        assert_eq!(
            requests[0].1,
            "loglevel=WRN&timestamp=2024-02-29+23%3A59%3A58.000&message=lagging\
             &position=sync.rs%5B200%5D&identifier=node-7"
        );
    }

    #[test]
    fn test_any_other_status_is_failure() {
        for status in [201, 204, 301, 404, 500] {
            let mut sink = RemoteSink::new(Arc::new(FixedStatus {
                status,
                requests: Mutex::new(Vec::new()),
            }));
            let err = sink.deliver(&event(), &config()).expect_err("only 200 succeeds");
            assert!(matches!(err, LoggerError::HttpStatus { status: s, .. } if s == status));
            assert!(!sink.reports_error_object(&err));
            assert!(sink.failure_notice(&err).contains("non-OK-status"));
        }
    }

    #[test]
    fn test_transport_error_is_failure() {
        let mut sink = RemoteSink::new(Arc::new(Unreachable));
        let err = sink.deliver(&event(), &config()).expect_err("unreachable");
        assert!(matches!(err, LoggerError::Transport { .. }));
        assert!(sink.reports_error_object(&err));
        assert_eq!(
            sink.failure_notice(&err),
            "Remote returned an error - disabling remote-logging"
        );
    }
}
