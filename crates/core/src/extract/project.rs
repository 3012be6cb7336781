//! Projection and rating aggregation for harvested submissions.

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::models::{AcceptedRecord, Note, Reply, WorkshopRecord};

/// Review invitation id for one submission, e.g.
/// `ICLR.cc/2025/Conference/Submission42/-/Official_Review`.
pub fn review_invitation(
    venue_id: &str,
    submission_name: &str,
    number: u64,
    review_name: &str,
) -> String {
    format!("{venue_id}/{submission_name}{number}/-/{review_name}")
}

/// Project the workshop metadata fields out of a submission.
pub fn project_workshop(note: &Note) -> WorkshopRecord {
    WorkshopRecord {
        tldr: note.content.value_or_null("TLDR"),
        abstract_text: note.content.value_or_null("abstract"),
        authors: note.content.value_or_null("authors"),
        authorids: note.content.value_or_null("authorids"),
        keywords: note.content.value_or_null("keywords"),
        title: note.content.value_or_null("title"),
        venue: note.content.value_or_null("venue"),
        pdf: note.content.value_or_null("pdf"),
        forum: note.forum.clone(),
    }
}

/// Build the accepted record for one submission.
///
/// Returns `None` when the submission's venue label is not in the
/// accepted set; the label is the sole accept/reject signal. A reply
/// counts as a review iff its invitation set contains the constructed
/// per-submission review invitation.
pub fn build_accepted_record(
    note: &Note,
    review_invitation: &str,
    accepted_venues: &[String],
) -> Result<Option<AcceptedRecord>> {
    let Some(venue) = note.content.str_value("venue") else {
        return Ok(None);
    };
    if !accepted_venues.iter().any(|label| label == venue) {
        return Ok(None);
    }

    let mut ratings = Vec::new();
    let mut confidence = Vec::new();
    for reply in note.replies() {
        if !reply.invitations.iter().any(|inv| inv == review_invitation) {
            continue;
        }
        ratings.push(numeric_field(reply, "rating", &note.forum)?);
        confidence.push(numeric_field(reply, "confidence", &note.forum)?);
    }
    let average_rating = average(&ratings);

    Ok(Some(AcceptedRecord {
        tldr: note.content.value_or_null("TLDR"),
        abstract_text: note.content.value_or_null("abstract"),
        authors: note.content.value_or_null("authors"),
        authorids: note.content.value_or_null("authorids"),
        keywords: note.content.value_or_null("keywords"),
        title: note.content.value_or_null("title"),
        venue: note.content.value_or_null("venue"),
        primary_area: note.content.value_or_null("primary_area"),
        pdf: note.content.value_or_null("pdf"),
        forum: note.forum.clone(),
        ratings,
        confidence,
        average_rating,
    }))
}

fn numeric_field(reply: &Reply, key: &str, forum: &str) -> Result<Value> {
    let value = reply
        .content
        .get(key)
        .cloned()
        .ok_or_else(|| anyhow!("review for forum {forum} is missing '{key}'"))?;
    if !value.is_number() {
        return Err(anyhow!("review for forum {forum} has a non-numeric '{key}'"));
    }
    Ok(value)
}

/// Arithmetic mean of numeric JSON values; `None` for an empty list.
fn average(ratings: &[Value]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: f64 = ratings.iter().filter_map(Value::as_f64).sum();
    Some(sum / ratings.len() as f64)
}
