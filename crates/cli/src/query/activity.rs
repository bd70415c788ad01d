use jira_activity_api::ResponseFormat;
use urlencoding::encode;

use super::{required, trim_base, Request, ValidationError};

/// Recent issue activity of one user.
#[derive(Clone, Copy, Debug)]
pub struct FeedQuery<'a> {
    pub user: &'a str,
    pub max_results: &'a str,
}

impl<'a> FeedQuery<'a> {
    pub fn new(user: &'a str, max_results: &'a str) -> Self {
        Self { user, max_results }
    }

    pub fn build(&self, base_url: &str) -> Result<Request, ValidationError> {
        let user = required(self.user, ValidationError::MissingUser)?;
        let max = required(self.max_results, ValidationError::MissingFeedMaxResults)?;

        Ok(Request {
            url: format!(
                "{}/activity?maxResults={}&streams=user+IS+{}&providers=issues",
                trim_base(base_url),
                encode(max),
                encode(user)
            ),
            format: ResponseFormat::Xml,
        })
    }
}
