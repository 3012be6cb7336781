//! Submission lifecycle statuses and their fetch strategies.

use std::{fmt, str::FromStr};

use anyhow::Result;
use thiserror::Error;

use crate::{client::NoteQuery, models::Group};

/// Content key holding the venue's submission stage name.
pub(crate) const SUBMISSION_NAME_KEY: &str = "submission_name";
const SUBMISSION_VENUE_ID_KEY: &str = "submission_venue_id";
const WITHDRAWN_VENUE_ID_KEY: &str = "withdrawn_venue_id";
const DESK_REJECTED_VENUE_ID_KEY: &str = "desk_rejected_venue_id";

/// Lifecycle status a submission listing can be filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Every submission regardless of disposition.
    All,
    /// Submissions accepted into the venue.
    Accepted,
    /// Submissions still under review.
    UnderReview,
    /// Withdrawn submissions.
    Withdrawn,
    /// Desk-rejected submissions.
    DeskRejected,
}

impl SubmissionStatus {
    /// Every recognised status, in canonical order.
    pub const ALL: [SubmissionStatus; 5] = [
        SubmissionStatus::All,
        SubmissionStatus::Accepted,
        SubmissionStatus::UnderReview,
        SubmissionStatus::Withdrawn,
        SubmissionStatus::DeskRejected,
    ];

    /// Keyword form used on the command line and in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::All => "all",
            SubmissionStatus::Accepted => "accepted",
            SubmissionStatus::UnderReview => "under_review",
            SubmissionStatus::Withdrawn => "withdrawn",
            SubmissionStatus::DeskRejected => "desk_rejected",
        }
    }

    /// Resolve the fetch strategy for this status against a venue group.
    ///
    /// `all` resolves to the invitation path built from the venue's
    /// submission stage name; every other status resolves to a `venueid`
    /// content filter. A status whose stage key is absent from the group
    /// fails with an error naming the missing key.
    pub fn locate(self, group: &Group, venue_id: &str) -> Result<NoteQuery> {
        let query = match self {
            SubmissionStatus::All => {
                let submission_name = group.require_str(SUBMISSION_NAME_KEY)?;
                NoteQuery::by_invitation(format!("{venue_id}/-/{submission_name}"))
            }
            SubmissionStatus::Accepted => NoteQuery::by_venue_id(group.id.clone()),
            SubmissionStatus::UnderReview => {
                NoteQuery::by_venue_id(group.require_str(SUBMISSION_VENUE_ID_KEY)?)
            }
            SubmissionStatus::Withdrawn => {
                NoteQuery::by_venue_id(group.require_str(WITHDRAWN_VENUE_ID_KEY)?)
            }
            SubmissionStatus::DeskRejected => {
                NoteQuery::by_venue_id(group.require_str(DESK_REJECTED_VENUE_ID_KEY)?)
            }
        };
        Ok(query)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = InvalidStatusError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        SubmissionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == input)
            .ok_or_else(|| InvalidStatusError {
                given: input.to_string(),
            })
    }
}

/// Error returned when a status keyword is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status '{given}'; valid options are: {}", valid_options())]
pub struct InvalidStatusError {
    /// The rejected keyword.
    pub given: String,
}

fn valid_options() -> String {
    SubmissionStatus::ALL.map(SubmissionStatus::as_str).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn venue_group(content: serde_json::Value) -> Group {
        serde_json::from_value(json!({
            "id": "ICLR.cc/2025/Conference",
            "content": content
        }))
        .unwrap()
    }

    #[test]
    fn every_keyword_parses() {
        for status in SubmissionStatus::ALL {
            assert_eq!(status.as_str().parse::<SubmissionStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_lists_the_valid_keywords() {
        let err = "rejected".parse::<SubmissionStatus>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("rejected"));
        for keyword in ["all", "accepted", "under_review", "withdrawn", "desk_rejected"] {
            assert!(message.contains(keyword), "message missing '{keyword}'");
        }
    }

    #[test]
    fn all_resolves_to_the_invitation_path() {
        let group = venue_group(json!({ "submission_name": { "value": "Submission" } }));
        let query = SubmissionStatus::All
            .locate(&group, "ICLR.cc/2025/Conference")
            .unwrap();
        assert_eq!(
            query.invitation(),
            Some("ICLR.cc/2025/Conference/-/Submission")
        );
        assert_eq!(query.venue_id(), None);
    }

    #[test]
    fn all_only_needs_the_submission_name_key() {
        // A sparse venue group is enough for the unfiltered listing.
        let group = venue_group(json!({ "submission_name": { "value": "Submission" } }));
        assert!(SubmissionStatus::All
            .locate(&group, "ICLR.cc/2025/Conference")
            .is_ok());
    }

    #[test]
    fn accepted_filters_on_the_group_id() {
        let group = venue_group(json!({}));
        let query = SubmissionStatus::Accepted
            .locate(&group, "ICLR.cc/2025/Conference")
            .unwrap();
        assert_eq!(query.venue_id(), Some("ICLR.cc/2025/Conference"));
        assert_eq!(query.invitation(), None);
    }

    #[test]
    fn withdrawn_filters_on_the_resolved_stage_venue_id() {
        let group = venue_group(json!({
            "withdrawn_venue_id": { "value": "ICLR.cc/2025/Conference/Withdrawn_Submission" }
        }));
        let query = SubmissionStatus::Withdrawn
            .locate(&group, "ICLR.cc/2025/Conference")
            .unwrap();
        assert_eq!(
            query.venue_id(),
            Some("ICLR.cc/2025/Conference/Withdrawn_Submission")
        );
    }

    #[test]
    fn missing_stage_key_fails_with_the_key_name() {
        let group = venue_group(json!({ "submission_name": { "value": "Submission" } }));
        let err = SubmissionStatus::DeskRejected
            .locate(&group, "ICLR.cc/2025/Conference")
            .unwrap_err();
        assert!(err.to_string().contains("desk_rejected_venue_id"));
    }
}
