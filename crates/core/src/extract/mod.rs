//! Submission extraction and aggregation over the OpenReview API.

pub mod project;
pub mod status;

pub use project::{build_accepted_record, project_workshop, review_invitation};
pub use status::{InvalidStatusError, SubmissionStatus};

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    client::{NoteQuery, OpenReviewClient},
    models::{AcceptedRecord, Note},
};

/// Content key holding the venue's review stage name.
const REVIEW_NAME_KEY: &str = "review_name";

/// Extracts submission records through a borrowed authenticated client.
pub struct SubmissionExtractor<'a> {
    client: &'a OpenReviewClient,
    accepted_venues: Vec<String>,
}

impl<'a> SubmissionExtractor<'a> {
    /// Create an extractor over the given client and accepted-venue labels.
    pub fn new(client: &'a OpenReviewClient, accepted_venues: Vec<String>) -> Self {
        Self {
            client,
            accepted_venues,
        }
    }

    /// Venue ids available to the authenticated session.
    pub async fn list_venues(&self) -> Result<Vec<String>> {
        let group = self.client.get_group("venues").await?;
        Ok(group.members)
    }

    /// Every submission under a venue matching the given lifecycle status.
    pub async fn fetch_submissions(
        &self,
        venue_id: &str,
        status: SubmissionStatus,
    ) -> Result<Vec<Note>> {
        let group = self.client.get_group(venue_id).await?;
        let query = status.locate(&group, venue_id)?;
        debug!("listing {status} submissions for {venue_id}");
        self.client.get_all_notes(&query).await
    }

    /// Accepted submissions joined with their reviews and derived ratings.
    ///
    /// Performs one deep fetch with replies attached; records come back in
    /// fetch order, one per submission whose venue label is accepted.
    pub async fn fetch_accepted_with_reviews(&self, venue_id: &str) -> Result<Vec<AcceptedRecord>> {
        let group = self.client.get_group(venue_id).await?;
        let submission_name = group.require_str(status::SUBMISSION_NAME_KEY)?.to_string();
        let review_name = group.require_str(REVIEW_NAME_KEY)?.to_string();

        let query =
            NoteQuery::by_invitation(format!("{venue_id}/-/{submission_name}")).with_replies();
        let submissions = self.client.get_all_notes(&query).await?;
        info!("fetched {} submissions for {venue_id}", submissions.len());

        let mut records = Vec::new();
        for note in &submissions {
            let invitation =
                review_invitation(venue_id, &submission_name, note.number, &review_name);
            if let Some(record) =
                build_accepted_record(note, &invitation, &self.accepted_venues)?
            {
                records.push(record);
            }
        }
        info!("kept {} accepted submissions", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VENUE: &str = "ICLR.cc/2025/Conference";

    async fn harness(server: &MockServer) -> Result<OpenReviewClient> {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "token": "test-token" })),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/groups"))
            .and(query_param("id", VENUE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "groups": [{
                    "id": VENUE,
                    "content": {
                        "submission_name": { "value": "Submission" },
                        "review_name": { "value": "Official_Review" },
                        "submission_venue_id": { "value": "ICLR.cc/2025/Conference/Submission" },
                        "withdrawn_venue_id": { "value": "ICLR.cc/2025/Conference/Withdrawn_Submission" },
                        "desk_rejected_venue_id": { "value": "ICLR.cc/2025/Conference/Desk_Rejected_Submission" }
                    }
                }]
            })))
            .mount(server)
            .await;

        let config = ApiConfig {
            base_url: server.uri(),
            username: "user@example.com".to_string(),
            password: "secret".to_string(),
            timeout_secs: 5,
        };
        OpenReviewClient::connect(&config).await
    }

    fn accepted_labels() -> Vec<String> {
        vec![
            "ICLR 2025 Poster".to_string(),
            "ICLR 2025 Spotlight".to_string(),
            "ICLR 2025 Oral".to_string(),
        ]
    }

    #[tokio::test]
    async fn list_venues_returns_group_members() -> Result<()> {
        let server = MockServer::start().await;
        let client = harness(&server).await?;
        Mock::given(method("GET"))
            .and(path("/groups"))
            .and(query_param("id", "venues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "groups": [{ "id": "venues", "members": [VENUE, "ICLR.cc/2025/Workshop/GEM"] }]
            })))
            .mount(&server)
            .await;

        let extractor = SubmissionExtractor::new(&client, accepted_labels());
        let venues = extractor.list_venues().await?;
        assert_eq!(venues, vec![VENUE, "ICLR.cc/2025/Workshop/GEM"]);
        Ok(())
    }

    #[tokio::test]
    async fn all_status_fetches_by_invitation_path() -> Result<()> {
        let server = MockServer::start().await;
        let client = harness(&server).await?;
        Mock::given(method("GET"))
            .and(path("/notes"))
            .and(query_param("invitation", "ICLR.cc/2025/Conference/-/Submission"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "notes": [{ "id": "n1", "forum": "n1", "number": 1 }],
                "count": 1,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = SubmissionExtractor::new(&client, accepted_labels());
        let notes = extractor
            .fetch_submissions(VENUE, SubmissionStatus::All)
            .await?;
        assert_eq!(notes.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn withdrawn_status_fetches_by_venue_id_filter() -> Result<()> {
        let server = MockServer::start().await;
        let client = harness(&server).await?;
        Mock::given(method("GET"))
            .and(path("/notes"))
            .and(query_param(
                "content.venueid",
                "ICLR.cc/2025/Conference/Withdrawn_Submission",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "notes": [{ "id": "n2", "forum": "n2", "number": 2 }],
                "count": 1,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = SubmissionExtractor::new(&client, accepted_labels());
        let notes = extractor
            .fetch_submissions(VENUE, SubmissionStatus::Withdrawn)
            .await?;
        assert_eq!(notes.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn accepted_extraction_filters_and_aggregates() -> Result<()> {
        let server = MockServer::start().await;
        let client = harness(&server).await?;
        Mock::given(method("GET"))
            .and(path("/notes"))
            .and(query_param("details", "replies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "notes": [
                    {
                        "id": "kept",
                        "forum": "kept",
                        "number": 7,
                        "content": {
                            "title": { "value": "Kept Paper" },
                            "venue": { "value": "ICLR 2025 Poster" }
                        },
                        "details": { "replies": [
                            {
                                "invitations": ["ICLR.cc/2025/Conference/Submission7/-/Official_Review"],
                                "content": { "rating": { "value": 6 }, "confidence": { "value": 4 } }
                            },
                            {
                                "invitations": ["ICLR.cc/2025/Conference/Submission7/-/Official_Comment"],
                                "content": { "comment": { "value": "nice" } }
                            },
                            {
                                "invitations": ["ICLR.cc/2025/Conference/Submission7/-/Official_Review"],
                                "content": { "rating": { "value": 8 }, "confidence": { "value": 3 } }
                            }
                        ]}
                    },
                    {
                        "id": "dropped",
                        "forum": "dropped",
                        "number": 8,
                        "content": { "venue": { "value": "ICLR 2025 Reject" } }
                    }
                ],
                "count": 2,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = SubmissionExtractor::new(&client, accepted_labels());
        let records = extractor.fetch_accepted_with_reviews(VENUE).await?;

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.forum, "kept");
        assert_eq!(record.ratings, vec![json!(6), json!(8)]);
        assert_eq!(record.confidence, vec![json!(4), json!(3)]);
        assert_eq!(record.average_rating, Some(7.0));
        Ok(())
    }
}
