//! Authenticated OpenReview API client.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    config::ApiConfig,
    models::{Group, Note},
};

/// Largest page size the notes endpoint accepts.
const PAGE_LIMIT: usize = 1000;

/// Query describing one logical note fetch.
#[derive(Debug, Clone)]
pub struct NoteQuery {
    invitation: Option<String>,
    venue_id: Option<String>,
    with_replies: bool,
}

impl NoteQuery {
    /// Fetch notes posted under an invitation path.
    pub fn by_invitation(invitation: impl Into<String>) -> Self {
        Self {
            invitation: Some(invitation.into()),
            venue_id: None,
            with_replies: false,
        }
    }

    /// Fetch notes whose `venueid` content field matches a value.
    pub fn by_venue_id(venue_id: impl Into<String>) -> Self {
        Self {
            invitation: None,
            venue_id: Some(venue_id.into()),
            with_replies: false,
        }
    }

    /// Request nested reply details alongside each note.
    pub fn with_replies(mut self) -> Self {
        self.with_replies = true;
        self
    }

    /// Invitation path this query filters on, if any.
    pub fn invitation(&self) -> Option<&str> {
        self.invitation.as_deref()
    }

    /// `venueid` content value this query filters on, if any.
    pub fn venue_id(&self) -> Option<&str> {
        self.venue_id.as_deref()
    }

    /// Whether reply details are requested.
    pub fn includes_replies(&self) -> bool {
        self.with_replies
    }

    fn params(&self, offset: usize) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(invitation) = &self.invitation {
            params.push(("invitation", invitation.clone()));
        }
        if let Some(venue_id) = &self.venue_id {
            params.push(("content.venueid", venue_id.clone()));
        }
        if self.with_replies {
            params.push(("details", "replies".to_string()));
        }
        params.push(("limit", PAGE_LIMIT.to_string()));
        params.push(("offset", offset.to_string()));
        params
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct GroupsPage {
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct NotesPage {
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    count: u64,
}

/// Authenticated handle to the OpenReview API.
///
/// Built once by the entry point and passed by reference into every
/// operation; requests run strictly sequentially over one connection pool.
#[derive(Debug)]
pub struct OpenReviewClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl OpenReviewClient {
    /// Build an HTTP client and log in with the configured credentials.
    pub async fn connect(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build http client")?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let response = http
            .post(format!("{base_url}/login"))
            .json(&json!({ "id": config.username, "password": config.password }))
            .send()
            .await
            .context("failed to reach the login endpoint")?;
        let response = check_status(response, "login").await?;
        let login: LoginResponse = response
            .json()
            .await
            .context("failed to parse login response")?;

        Ok(Self {
            http,
            base_url,
            token: login.token,
        })
    }

    /// Look up a single group by id.
    pub async fn get_group(&self, id: &str) -> Result<Group> {
        let response = self
            .http
            .get(format!("{}/groups", self.base_url))
            .bearer_auth(&self.token)
            .query(&[("id", id)])
            .send()
            .await
            .with_context(|| format!("failed to fetch group {id}"))?;
        let response = check_status(response, "group lookup").await?;
        let page: GroupsPage = response
            .json()
            .await
            .with_context(|| format!("failed to parse group {id}"))?;
        page.groups
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("group {id} not found"))
    }

    /// Fetch every note matching the query, paging until exhausted.
    ///
    /// Callers see one complete list; the limit/offset protocol stays
    /// internal to the client.
    pub async fn get_all_notes(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        loop {
            let page = self.fetch_page(query, notes.len()).await?;
            let fetched = page.notes.len();
            notes.extend(page.notes);
            debug!("fetched {} of {} notes", notes.len(), page.count);
            if fetched < PAGE_LIMIT || notes.len() as u64 >= page.count {
                break;
            }
        }
        Ok(notes)
    }

    async fn fetch_page(&self, query: &NoteQuery, offset: usize) -> Result<NotesPage> {
        let response = self
            .http
            .get(format!("{}/notes", self.base_url))
            .bearer_auth(&self.token)
            .query(&query.params(offset))
            .send()
            .await
            .context("failed to fetch notes")?;
        let response = check_status(response, "note fetch").await?;
        response.json().await.context("failed to parse notes page")
    }
}

async fn check_status(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(anyhow!("{operation} failed with status {status}: {body}"))
}
