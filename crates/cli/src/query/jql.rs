use jira_activity_api::ResponseFormat;
use urlencoding::encode;

use super::{required, trim_base, Request, ValidationError};

/// Issues of a project that have sat in one status for longer than a number
/// of days.
#[derive(Clone, Copy, Debug)]
pub struct SearchQuery<'a> {
    pub project: &'a str,
    pub status: &'a str,
    pub days_in_status: &'a str,
    pub max_results: &'a str,
}

impl<'a> SearchQuery<'a> {
    pub fn new(
        project: &'a str,
        status: &'a str,
        days_in_status: &'a str,
        max_results: &'a str,
    ) -> Self {
        Self {
            project,
            status,
            days_in_status,
            max_results,
        }
    }

    /// Checks the inputs in form order; the first empty one wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(self.project, ValidationError::MissingProject)?;
        required(self.status, ValidationError::MissingStatus)?;
        required(self.days_in_status, ValidationError::MissingDaysInStatus)?;
        required(self.max_results, ValidationError::MissingMaxResults)?;
        Ok(())
    }

    /// Query string following `search?jql=`, every value percent-encoded.
    pub fn finish(&self) -> String {
        let status = encode(self.status);
        format!(
            "project={}+and+status={status}+and+status+changed+to+{status}+before+-{}d&fields=id,status,key,assignee,summary&maxresults={}",
            encode(self.project),
            encode(self.days_in_status),
            encode(self.max_results),
        )
    }

    pub fn build(&self, base_url: &str) -> Result<Request, ValidationError> {
        self.validate()?;
        Ok(Request {
            url: format!("{}/rest/api/2/search?jql={}", trim_base(base_url), self.finish()),
            format: ResponseFormat::Json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://jira.secondlife.com";

    #[test]
    fn test_example_url() {
        let request = SearchQuery::new("Sunshine", "Open", "7", "50").build(BASE).unwrap();
        assert_eq!(
            request.url,
            "https://jira.secondlife.com/rest/api/2/search?jql=project=Sunshine+and+status=Open+and+status+changed+to+Open+before+-7d&fields=id,status,key,assignee,summary&maxresults=50"
        );
        assert_eq!(request.format, ResponseFormat::Json);
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let query = SearchQuery::new("My Project", "In Progress", "1&2", "5=5");
        assert_eq!(
            query.finish(),
            "project=My%20Project+and+status=In%20Progress+and+status+changed+to+In%20Progress+before+-1%262d&fields=id,status,key,assignee,summary&maxresults=5%3D5"
        );
    }

    #[test]
    fn test_trailing_slash_on_base() {
        let request = SearchQuery::new("A", "B", "1", "2")
            .build("https://jira.example.com/")
            .unwrap();
        assert!(request
            .url
            .starts_with("https://jira.example.com/rest/api/2/search?jql=project=A+"));
    }

    #[test]
    fn test_missing_project() {
        let err = SearchQuery::new("", "Open", "7", "50").build(BASE).unwrap_err();
        assert_eq!(err, ValidationError::MissingProject);
        assert_eq!(err.to_string(), "You must enter a project name to query for");
    }

    #[test]
    fn test_missing_status() {
        let err = SearchQuery::new("Sunshine", "", "7", "50").build(BASE).unwrap_err();
        assert_eq!(err, ValidationError::MissingStatus);
    }

    #[test]
    fn test_missing_days() {
        let err = SearchQuery::new("Sunshine", "Open", "", "50").build(BASE).unwrap_err();
        assert_eq!(err, ValidationError::MissingDaysInStatus);
        assert_eq!(
            err.to_string(),
            "You must choose a for longer than value in your query"
        );
    }

    #[test]
    fn test_missing_max_results() {
        let err = SearchQuery::new("Sunshine", "Open", "7", " ").build(BASE).unwrap_err();
        assert_eq!(err, ValidationError::MissingMaxResults);
    }

    #[test]
    fn test_first_missing_field_wins() {
        let err = SearchQuery::new("", "", "", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingProject);
    }
}
