pub mod activity;
pub mod jql;

use jira_activity_api::ResponseFormat;
use thiserror::Error;

/// A required input was left empty. Raised before any request is sent.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("You must enter a project name to query for")]
    MissingProject,
    #[error("You must choose a status to query for")]
    MissingStatus,
    #[error("You must choose a for longer than value in your query")]
    MissingDaysInStatus,
    #[error("You must enter a maximum number of results")]
    MissingMaxResults,
    #[error("Please enter a user name to view feed activity")]
    MissingUser,
    #[error("Please enter a maximum number of results to view feed activity")]
    MissingFeedMaxResults,
}

/// A single GET and how to read its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub format: ResponseFormat,
}

/// Endpoint used to check that a project exists before running an action.
pub fn project_request(base_url: &str, project: &str) -> Result<Request, ValidationError> {
    let project = required(project, ValidationError::MissingProject)?;
    Ok(Request {
        url: format!(
            "{}/rest/api/2/project/{}",
            trim_base(base_url),
            urlencoding::encode(project)
        ),
        format: ResponseFormat::Json,
    })
}

fn required(value: &str, missing: ValidationError) -> Result<&str, ValidationError> {
    if value.trim().is_empty() {
        Err(missing)
    } else {
        Ok(value)
    }
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
