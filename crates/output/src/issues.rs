use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::{
    display_empty, display_error_status, escape_html, link, Outcome, ResultSink, CANNOT_DISPLAY,
    NO_RESULTS,
};

/// Body of `GET /rest/api/2/search`, restricted to the requested fields.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key: String,
    #[serde(rename = "self", default, deserialize_with = "null_as_empty")]
    pub self_link: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default)]
    pub status: Option<IssueStatus>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueStatus {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Assignee {
    #[serde(rename = "self", default, deserialize_with = "null_as_empty")]
    pub self_link: String,
    #[serde(rename = "displayName", default, deserialize_with = "null_as_empty")]
    pub display_name: String,
    #[serde(rename = "emailAddress", default, deserialize_with = "null_as_empty")]
    pub email_address: String,
}

/// JIRA sends `null` for hidden or unset text fields.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders search results as a nested list, one outer item per issue.
///
/// The list is only shown when `total` is positive and matches the number
/// of issues returned; otherwise the status line explains why nothing is
/// shown.
pub fn render_query_results<S: ResultSink + ?Sized>(
    value: &Value,
    url: &str,
    sink: &mut S,
) -> Outcome {
    sink.set_status(format!("Query term: {}\n", escape_html(url)));
    sink.show_status(true);

    let results = match SearchResults::deserialize(value) {
        Ok(results) => results,
        Err(e) => return display_error_status(sink, &format!("Invalid response format: {e}")),
    };

    let total = results.total.unwrap_or(0);
    if total == 0 {
        return display_empty(sink, NO_RESULTS);
    }

    if total != results.issues.len() as u64 {
        debug!(total, returned = results.issues.len(), "Issue count mismatch");
        return display_empty(sink, CANNOT_DISPLAY);
    }

    let mut html = String::from("<ul>");
    for issue in &results.issues {
        html.push_str(&issue_item(issue));
    }
    html.push_str("</ul>");

    sink.set_result(html);
    sink.show_result(true);
    Outcome::Rendered
}

fn issue_item(issue: &Issue) -> String {
    let fields = &issue.fields;
    let (status_name, status_description) = fields
        .status
        .as_ref()
        .map(|s| (s.name.as_str(), s.description.as_str()))
        .unwrap_or(("", ""));

    let assigned = match &fields.assignee {
        Some(assignee) => format!(
            "Assigned To: {} ({})",
            link(&assignee.self_link, &assignee.display_name),
            escape_html(&assignee.email_address)
        ),
        None => "Assigned To: nobody".to_string(),
    };

    format!(
        "<li>{}: {}<ul><li>Status: {}. {}</li><li>{}</li></ul></li>",
        link(&issue.self_link, &issue.key),
        escape_html(&fields.summary),
        escape_html(status_name),
        escape_html(status_description),
        assigned
    )
}
