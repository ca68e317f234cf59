// Sign-up service HTTP client
//
// Wraps `reqwest::Client` with URL construction for the four service
// endpoints and shared response parsing. Activity names and student
// emails are embedded as path segments or query parameters, so both go
// through `url`'s percent-encoding — never string concatenation.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::model::{ApiErrorBody, Catalog, Message, MyActivities};
use crate::transport::TransportConfig;

/// HTTP client for the activity sign-up service.
///
/// One instance per server; cheap to clone the underlying `reqwest`
/// client. All methods return decoded payloads — on a non-2xx status
/// the JSON `{detail}` body is folded into [`Error::Api`] before the
/// caller sees anything.
pub struct ActivitiesClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ActivitiesClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the service root (e.g. `http://localhost:8000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Used by tests that point at a mock server.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL from path segments, percent-encoding each one.
    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().expect("invalid base URL");
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /activities` — the full catalog, in server order.
    pub async fn activities(&self) -> Result<Catalog, Error> {
        let url = self.api_url(&["activities"]);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// `POST /activities/{activity}/signup?email={email}` — register a
    /// student for an activity.
    pub async fn signup(&self, activity: &str, email: &str) -> Result<Message, Error> {
        let mut url = self.api_url(&["activities", activity, "signup"]);
        url.query_pairs_mut().append_pair("email", email);
        debug!("POST {url}");

        let resp = self.http.post(url).send().await.map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// `DELETE /activities/{activity}/participants/{email}` — remove a
    /// registered participant.
    pub async fn unregister(&self, activity: &str, email: &str) -> Result<Message, Error> {
        let url = self.api_url(&["activities", activity, "participants", email]);
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// `GET /my-activities?email={email}` — the reduced mapping of
    /// activities the given student is enrolled in. Empty mapping if
    /// none.
    pub async fn my_activities(&self, email: &str) -> Result<MyActivities, Error> {
        let mut url = self.api_url(&["my-activities"]);
        url.query_pairs_mut().append_pair("email", email);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    // ── Response parsing ─────────────────────────────────────────────

    /// Decode a 2xx body as `T`, or fold a non-2xx response into
    /// `Error::Api`, salvaging the `{detail}` field when the error
    /// body carries one.
    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail);
            return Err(Error::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
