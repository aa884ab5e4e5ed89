//! CalDAV client
//!
//! Talks to CalDAV servers (Nextcloud, Baïkal, Radicale) over plain HTTP
//! verbs: PROPFIND for health checks, REPORT for queries, PUT and DELETE for
//! writes. Bodies are produced and consumed by [`crate::ical`].

use std::time::Duration;

use domain::DateRange;
use quick_xml::{Reader, escape::escape, events::Event};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::ical::{MergeError, date::format_utc, has_uid};

/// CalDAV client errors
#[derive(Debug, Error)]
pub enum CalDavError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Calendar object not found: {0}")]
    ObjectNotFound(String),

    #[error("Precondition failed: {0} was modified concurrently")]
    PreconditionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Malformed calendar object: {0}")]
    MalformedResource(#[from] MergeError),
}

impl CalDavError {
    /// Transport-level failures that a fresh connection may fix
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout)
    }
}

fn transport_error(e: reqwest::Error) -> CalDavError {
    if e.is_timeout() {
        return CalDavError::Timeout;
    }
    CalDavError::ConnectionFailed(e.to_string())
}

/// CalDAV server configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct CalDavConfig {
    /// Server URL (e.g., <https://cloud.example.com>)
    pub server_url: String,
    /// Username
    pub username: String,
    /// Password (excluded from serialization to prevent leaks)
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Path of the calendar collections, defaults to the Nextcloud layout
    #[serde(default)]
    pub calendar_home: Option<String>,
    /// Verify TLS certificates (default: true)
    #[serde(default = "default_true")]
    pub verify_certs: bool,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for CalDavConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalDavConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("calendar_home", &self.calendar_home)
            .field("verify_certs", &self.verify_certs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

const fn default_true() -> bool {
    true
}

const fn default_timeout() -> u64 {
    30
}

/// Calendar component a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Event,
    Todo,
}

impl ComponentKind {
    /// iCalendar component name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
        }
    }
}

/// One `<response>` of a multistatus body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavResource {
    /// Resource path as sent by the server
    pub href: String,
    /// Entity tag, quotes included
    pub etag: Option<String>,
    /// Raw iCalendar text
    pub calendar_data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultistatusField {
    Href,
    Etag,
    CalendarData,
}

/// Extract href, etag and calendar data from a multistatus body
///
/// Elements are matched by local name, so `D:href`, `d:href` and a default
/// namespace all work. Responses without an href are skipped.
#[must_use]
pub fn parse_multistatus(xml_body: &str) -> Vec<DavResource> {
    let mut reader = Reader::from_str(xml_body);
    reader.config_mut().trim_text(true);

    let mut resources = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<DavResource> = None;
    let mut field: Option<MultistatusField> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"response" => current = Some(DavResource::default()),
                b"href" if current.as_ref().is_some_and(|r| r.href.is_empty()) => {
                    field = Some(MultistatusField::Href);
                    text.clear();
                },
                b"getetag" if current.is_some() => {
                    field = Some(MultistatusField::Etag);
                    text.clear();
                },
                b"calendar-data" if current.is_some() => {
                    field = Some(MultistatusField::CalendarData);
                    text.clear();
                },
                _ => {},
            },
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    if let Ok(chunk) = e.unescape() {
                        text.push_str(&chunk);
                    }
                }
            },
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    if let Ok(chunk) = std::str::from_utf8(e.as_ref()) {
                        text.push_str(chunk);
                    }
                }
            },
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"response" {
                    if let Some(resource) = current.take().filter(|r| !r.href.is_empty()) {
                        resources.push(resource);
                    }
                    field = None;
                } else if let Some(resource) = current.as_mut() {
                    match (name.as_ref(), field) {
                        (b"href", Some(MultistatusField::Href)) => {
                            resource.href = text.trim().to_string();
                            field = None;
                        },
                        (b"getetag", Some(MultistatusField::Etag)) => {
                            let etag = text.trim();
                            resource.etag = (!etag.is_empty()).then(|| etag.to_string());
                            field = None;
                        },
                        (b"calendar-data", Some(MultistatusField::CalendarData)) => {
                            resource.calendar_data =
                                (!text.trim().is_empty()).then(|| text.clone());
                            field = None;
                        },
                        _ => {},
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(error = ?e, "XML parsing error in CalDAV response");
                break;
            },
            _ => {},
        }
        buf.clear();
    }

    resources
}

/// REPORT body selecting every `kind` component, optionally within `range`
#[must_use]
pub fn calendar_query(kind: ComponentKind, range: Option<&DateRange>) -> String {
    let filter = match range {
        Some(range) => format!(
            r#"<C:comp-filter name="{}">
        <C:time-range start="{}" end="{}"/>
      </C:comp-filter>"#,
            kind.name(),
            format_utc(range.start()),
            format_utc(range.end())
        ),
        None => format!(r#"<C:comp-filter name="{}"/>"#, kind.name()),
    };

    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <D:getetag/>
    <C:calendar-data/>
  </D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      {filter}
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#
    )
}

/// REPORT body selecting the `kind` component whose UID matches `uid`
#[must_use]
pub fn uid_query(kind: ComponentKind, uid: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <D:getetag/>
    <C:calendar-data/>
  </D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="{}">
        <C:prop-filter name="UID">
          <C:text-match collation="i;octet">{}</C:text-match>
        </C:prop-filter>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>"#,
        kind.name(),
        escape(uid)
    )
}

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:propfind xmlns:D="DAV:">
  <D:prop>
    <D:resourcetype/>
  </D:prop>
</D:propfind>"#;

/// HTTP-based CalDAV client implementation
#[derive(Debug)]
pub struct HttpCalDavClient {
    pub(crate) client: Client,
    pub(crate) config: CalDavConfig,
}

impl HttpCalDavClient {
    /// Create a new CalDAV client
    pub fn new(config: CalDavConfig) -> Result<Self, CalDavError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_certs)
            .build()
            .map_err(|e| CalDavError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Client configuration
    #[must_use]
    pub const fn config(&self) -> &CalDavConfig {
        &self.config
    }

    /// Build a request with authentication
    pub(crate) fn build_request(&self, method: &str, url: &str) -> reqwest::RequestBuilder {
        let method =
            reqwest::Method::from_bytes(method.as_bytes()).unwrap_or(reqwest::Method::GET);
        self.client
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
    }

    fn server(&self) -> &str {
        self.config.server_url.trim_end_matches('/')
    }

    /// Path holding the user's calendar collections
    #[must_use]
    pub fn calendar_home(&self) -> String {
        match self.config.calendar_home.as_deref() {
            Some(home) if !home.trim().is_empty() => {
                format!("/{}", home.trim().trim_matches('/'))
            },
            _ => format!("/remote.php/dav/calendars/{}", self.config.username),
        }
    }

    /// Collection URL for `calendar`, always ending in `/`
    ///
    /// Absolute URLs are used as-is, paths starting with `/` are joined to
    /// the server, and bare names live under the calendar home.
    #[must_use]
    pub fn calendar_url(&self, calendar: &str) -> String {
        let mut url = if calendar.starts_with("http://") || calendar.starts_with("https://") {
            calendar.to_string()
        } else if calendar.starts_with('/') {
            format!("{}{calendar}", self.server())
        } else {
            format!(
                "{}{}/{}",
                self.server(),
                self.calendar_home(),
                calendar.trim_matches('/')
            )
        };
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }

    /// URL of the object named after `uid` in `calendar`
    #[must_use]
    pub fn resource_url(&self, calendar: &str, uid: &str) -> String {
        format!("{}{uid}.ics", self.calendar_url(calendar))
    }

    /// Absolute URL for an href taken from a multistatus response
    #[must_use]
    pub fn resolve_href(&self, href: &str) -> String {
        Url::parse(&self.config.server_url)
            .and_then(|base| base.join(href))
            .map_or_else(|_| format!("{}{href}", self.server()), String::from)
    }

    /// PROPFIND on the calendar home
    #[instrument(skip(self), fields(server = %self.config.server_url))]
    pub async fn health_check(&self) -> Result<(), CalDavError> {
        let home = self.calendar_home();
        let url = format!("{}{home}/", self.server());

        let response = self
            .build_request("PROPFIND", &url)
            .header("Depth", "0")
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(PROPFIND_BODY)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(CalDavError::AuthenticationFailed),
            StatusCode::NOT_FOUND => Err(CalDavError::CalendarNotFound(home)),
            status if status.is_success() => {
                debug!(%status, "CalDAV server reachable");
                Ok(())
            },
            status => Err(CalDavError::RequestFailed(format!("HTTP {status}"))),
        }
    }

    /// Run a calendar-query REPORT against `calendar`
    pub(crate) async fn report(
        &self,
        calendar: &str,
        body: String,
    ) -> Result<Vec<DavResource>, CalDavError> {
        let url = self.calendar_url(calendar);

        let response = self
            .build_request("REPORT", &url)
            .header("Depth", "1")
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(CalDavError::AuthenticationFailed),
            StatusCode::NOT_FOUND => {
                return Err(CalDavError::CalendarNotFound(calendar.to_string()));
            },
            status if !status.is_success() => {
                return Err(CalDavError::RequestFailed(format!("HTTP {status}")));
            },
            _ => {},
        }

        let body = response
            .text()
            .await
            .map_err(|e| CalDavError::RequestFailed(e.to_string()))?;

        debug!(response_len = body.len(), "REPORT response received");

        Ok(parse_multistatus(&body))
    }

    /// Fetch the object holding `uid`
    pub(crate) async fn find_by_uid(
        &self,
        calendar: &str,
        kind: ComponentKind,
        uid: &str,
    ) -> Result<DavResource, CalDavError> {
        self.report(calendar, uid_query(kind, uid))
            .await?
            .into_iter()
            .find(|r| {
                r.calendar_data
                    .as_deref()
                    .is_some_and(|data| has_uid(data, kind.name(), uid))
            })
            .ok_or_else(|| CalDavError::ObjectNotFound(uid.to_string()))
    }

    /// PUT a new object, refusing to overwrite an existing one
    pub(crate) async fn put_new(
        &self,
        calendar: &str,
        uid: &str,
        ics: String,
    ) -> Result<(), CalDavError> {
        let url = self.resource_url(calendar, uid);

        let response = self
            .build_request("PUT", &url)
            .header("Content-Type", "text/calendar; charset=utf-8")
            .header("If-None-Match", "*")
            .body(ics)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(CalDavError::AuthenticationFailed),
            StatusCode::NOT_FOUND => Err(CalDavError::CalendarNotFound(calendar.to_string())),
            StatusCode::PRECONDITION_FAILED => Err(CalDavError::PreconditionFailed(url)),
            status if status.is_success() => {
                debug!(uid = %uid, "Calendar object created");
                Ok(())
            },
            status => Err(CalDavError::RequestFailed(format!("HTTP {status}"))),
        }
    }

    /// PUT a rewritten object back to where it was fetched from
    pub(crate) async fn put_existing(
        &self,
        resource: &DavResource,
        ics: String,
    ) -> Result<(), CalDavError> {
        let url = self.resolve_href(&resource.href);

        let mut request = self
            .build_request("PUT", &url)
            .header("Content-Type", "text/calendar; charset=utf-8");
        if let Some(etag) = &resource.etag {
            request = request.header("If-Match", etag);
        }

        let response = request.body(ics).send().await.map_err(transport_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(CalDavError::AuthenticationFailed),
            StatusCode::NOT_FOUND => Err(CalDavError::ObjectNotFound(resource.href.clone())),
            StatusCode::PRECONDITION_FAILED => {
                Err(CalDavError::PreconditionFailed(resource.href.clone()))
            },
            status if status.is_success() => {
                debug!(href = %resource.href, "Calendar object updated");
                Ok(())
            },
            status => Err(CalDavError::RequestFailed(format!("HTTP {status}"))),
        }
    }

    async fn delete_url(&self, url: &str) -> Result<StatusCode, CalDavError> {
        let response = self
            .build_request("DELETE", url)
            .send()
            .await
            .map_err(transport_error)?;
        Ok(response.status())
    }

    /// Delete the object holding `uid`
    ///
    /// Tries `{uid}.ics` first. Objects created by other clients often live
    /// under a different name, so on failure the UID is looked up and every
    /// matching href is tried until one delete succeeds.
    pub(crate) async fn delete_by_uid(
        &self,
        calendar: &str,
        kind: ComponentKind,
        uid: &str,
    ) -> Result<(), CalDavError> {
        let direct = self.resource_url(calendar, uid);
        match self.delete_url(&direct).await? {
            status if status.is_success() => {
                debug!(uid = %uid, "Calendar object deleted");
                return Ok(());
            },
            StatusCode::UNAUTHORIZED => return Err(CalDavError::AuthenticationFailed),
            status => debug!(uid = %uid, %status, "Direct delete failed, searching by UID"),
        }

        let matches = self.report(calendar, uid_query(kind, uid)).await?;
        for resource in matches.iter().filter(|r| {
            r.calendar_data
                .as_deref()
                .is_none_or(|data| has_uid(data, kind.name(), uid))
        }) {
            let url = self.resolve_href(&resource.href);
            match self.delete_url(&url).await {
                Ok(status) if status.is_success() => {
                    debug!(uid = %uid, href = %resource.href, "Calendar object deleted");
                    return Ok(());
                },
                Ok(status) => warn!(href = %resource.href, %status, "Delete by href failed"),
                Err(e) => warn!(href = %resource.href, error = %e, "Delete by href failed"),
            }
        }

        Err(CalDavError::ObjectNotFound(uid.to_string()))
    }
}
