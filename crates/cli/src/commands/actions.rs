use jira_activity_api::Fetch;
use jira_activity_output::{display_error_status, escape_html, Outcome, ResultSink};

use super::{check_project_exists, make_and_process, render_feed, render_search, ActivityContext};
use crate::query::{activity::FeedQuery, jql::SearchQuery};

/// Validates the search inputs, optionally checks the project, then runs the
/// search.
pub async fn run_query<F, S>(
    ctx: &ActivityContext<'_, F>,
    query: SearchQuery<'_>,
    sink: &mut S,
) -> Outcome
where
    F: Fetch + ?Sized,
    S: ResultSink + ?Sized,
{
    let request = match query.build(ctx.base_url) {
        Ok(request) => request,
        Err(err) => return display_error_status(sink, &err.to_string()),
    };

    if ctx.check_project {
        let checked = check_project_exists(ctx.client, ctx.base_url, query.project, sink).await;
        if let Err(outcome) = checked {
            return outcome;
        }
    }

    sink.set_status(format!("Performing JIRA search for {}", escape_html(&request.url)));
    sink.show_status(true);

    make_and_process(ctx.client, &request, sink, render_search).await
}

/// Validates the feed inputs, optionally checks `project`, then fetches the
/// activity feed.
pub async fn run_feed<F, S>(
    ctx: &ActivityContext<'_, F>,
    query: FeedQuery<'_>,
    project: &str,
    sink: &mut S,
) -> Outcome
where
    F: Fetch + ?Sized,
    S: ResultSink + ?Sized,
{
    let request = match query.build(ctx.base_url) {
        Ok(request) => request,
        Err(err) => return display_error_status(sink, &err.to_string()),
    };

    if ctx.check_project {
        let checked = check_project_exists(ctx.client, ctx.base_url, project, sink).await;
        if let Err(outcome) = checked {
            return outcome;
        }
    }

    make_and_process(ctx.client, &request, sink, render_feed).await
}

/// Reports whether `project` can be fetched.
pub async fn run_check<F, S>(ctx: &ActivityContext<'_, F>, project: &str, sink: &mut S) -> Outcome
where
    F: Fetch + ?Sized,
    S: ResultSink + ?Sized,
{
    match check_project_exists(ctx.client, ctx.base_url, project, sink).await {
        Ok(()) => {
            sink.set_status(format!("Project {} exists.", escape_html(project)));
            sink.show_status(true);
            sink.show_result(false);
            Outcome::Rendered
        }
        Err(outcome) => outcome,
    }
}
