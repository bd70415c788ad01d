pub mod actions;
pub mod options;

use jira_activity_api::error::ApiError;
use jira_activity_api::{Fetch, Payload};
use jira_activity_output::{
    display_error_status, render_feed_results, render_query_results, Outcome, ResultSink,
};
use tracing::{debug, info};

use crate::query::{project_request, Request};

/// What an action needs besides its own inputs.
pub struct ActivityContext<'a, F: Fetch + ?Sized> {
    pub client: &'a F,
    pub base_url: &'a str,
    /// Run the project existence check before the action's own request.
    pub check_project: bool,
}

/// Sends `request` and hands the settled result to `render` or to the
/// error presenter. Exactly one of the two runs.
pub async fn make_and_process<F, S, R>(
    client: &F,
    request: &Request,
    sink: &mut S,
    render: R,
) -> Outcome
where
    F: Fetch + ?Sized,
    S: ResultSink + ?Sized,
    R: FnOnce(Payload, &str, &mut S) -> Outcome,
{
    debug!(url = %request.url, format = ?request.format, "Performing request");
    match client.fetch(&request.url, request.format).await {
        Ok(payload) => render(payload, &request.url, sink),
        Err(err) => present(sink, &err),
    }
}

/// Fails with the presenter's outcome when the project cannot be fetched.
pub async fn check_project_exists<F, S>(
    client: &F,
    base_url: &str,
    project: &str,
    sink: &mut S,
) -> Result<(), Outcome>
where
    F: Fetch + ?Sized,
    S: ResultSink + ?Sized,
{
    let request = project_request(base_url, project)
        .map_err(|err| display_error_status(sink, &err.to_string()))?;

    match client.fetch(&request.url, request.format).await {
        Ok(_) => {
            debug!(project, "Project exists");
            Ok(())
        }
        Err(err) => Err(present(sink, &err)),
    }
}

fn present<S: ResultSink + ?Sized>(sink: &mut S, err: &ApiError) -> Outcome {
    if let Some(hint) = err.suggestion() {
        info!("{hint}");
    }
    display_error_status(sink, &err.to_string())
}

pub fn render_search<S: ResultSink + ?Sized>(payload: Payload, url: &str, sink: &mut S) -> Outcome {
    match payload {
        Payload::Json(value) => render_query_results(&value, url, sink),
        Payload::Xml(_) => display_error_status(sink, "Invalid response format: expected JSON"),
    }
}

pub fn render_feed<S: ResultSink + ?Sized>(payload: Payload, url: &str, sink: &mut S) -> Outcome {
    match payload {
        Payload::Xml(xml) => render_feed_results(&xml, url, sink),
        Payload::Json(_) => display_error_status(sink, "Invalid response format: expected XML"),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use jira_activity_api::error::{ApiError, Result};
    use jira_activity_api::{Fetch, Payload, ResponseFormat};

    /// Answers requests from a queue and records what was asked.
    pub struct FakeFetch {
        responses: Mutex<Vec<Result<Payload>>>,
        pub requests: Mutex<Vec<(String, ResponseFormat)>>,
    }

    impl FakeFetch {
        pub fn new(mut responses: Vec<Result<Payload>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Fetch for FakeFetch {
        async fn fetch(&self, url: &str, format: ResponseFormat) -> Result<Payload> {
            self.requests.lock().unwrap().push((url.to_string(), format));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ApiError::InvalidResponse("no response queued".into())))
        }
    }
}
