use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use roxmltree::{Document, Node};
use scraper::Html;
use tracing::debug;

use crate::{display_empty, display_error_status, escape_html, Outcome, ResultSink, NO_RESULTS};

/// One renderable `<entry>` of an Atom activity feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEntry {
    /// Plain text of the entry title, markup removed.
    pub title: String,
    pub updated: String,
}

/// Renders an activity feed with timestamps in the local time zone.
pub fn render_feed_results<S: ResultSink + ?Sized>(xml: &str, url: &str, sink: &mut S) -> Outcome {
    render_feed_results_in(xml, url, &Local, sink)
}

pub fn render_feed_results_in<Tz, S>(xml: &str, url: &str, tz: &Tz, sink: &mut S) -> Outcome
where
    Tz: TimeZone,
    Tz::Offset: Display,
    S: ResultSink + ?Sized,
{
    sink.set_status(format!("Activity query: {}\n", escape_html(url)));
    sink.show_status(true);

    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => return display_error_status(sink, &format!("Invalid response format: {e}")),
    };

    let entries = feed_entries(&doc);
    if entries.is_empty() {
        return display_empty(sink, NO_RESULTS);
    }

    let mut html = String::from("<ul>");
    for entry in &entries {
        html.push_str(&format!(
            "<li>{} - {}</li>",
            escape_html(&localize(&entry.updated, tz)),
            escape_html(&entry.title)
        ));
    }
    html.push_str("</ul>");

    sink.set_result(html);
    sink.show_result(true);
    Outcome::Rendered
}

/// Entries of the first `feed` element that carry both a `title` and an
/// `updated` child. Others are skipped.
pub fn feed_entries(doc: &Document<'_>) -> Vec<FeedEntry> {
    let Some(feed) = doc.descendants().find(|n| n.has_tag_name("feed")) else {
        debug!("Document has no feed element");
        return Vec::new();
    };

    feed.descendants()
        .filter(|n| n.has_tag_name("entry"))
        .filter_map(|entry| {
            let title = first_descendant(entry, "title")?;
            let updated = first_descendant(entry, "updated")?;
            Some(FeedEntry {
                title: strip_markup(&text_content(title)),
                updated: text_content(updated).trim().to_string(),
            })
        })
        .collect()
}

fn first_descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants().skip(1).find(|n| n.has_tag_name(name))
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// `M/D/YYYY, h:mm:ss AM` in `tz`; the raw value if it is not RFC 3339.
pub fn localize<Tz>(updated: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::parse_from_rfc3339(updated) {
        Ok(parsed) => parsed
            .with_timezone(tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        Err(e) => {
            debug!(updated, error = %e, "Unparseable feed timestamp");
            updated.to_string()
        }
    }
}

/// Text content of an HTML fragment with whitespace collapsed.
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
