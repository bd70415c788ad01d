pub mod feed;
pub mod issues;

use clap::ValueEnum;
use colored::Colorize;

pub use feed::render_feed_results;
pub use issues::render_query_results;

pub const NO_RESULTS: &str = "There are no activity results.";
pub const CANNOT_DISPLAY: &str = "Could not display activity results.";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Full document with both regions, hidden ones marked `hidden`
    #[default]
    Html,
    /// Only the visible regions
    Text,
}

/// How a single action ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Results were written to the result container.
    Rendered,
    /// Nothing to show; the status line says why.
    Empty,
    /// The error presenter ran with this message.
    Errored(String),
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Errored(_))
    }
}

/// The two regions a renderer may write: a status line and a result
/// container. Content is markup; callers escape before writing.
pub trait ResultSink {
    fn set_status(&mut self, html: String);
    fn show_status(&mut self, visible: bool);
    fn set_result(&mut self, html: String);
    fn show_result(&mut self, visible: bool);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub status: String,
    pub status_visible: bool,
    pub result: String,
    pub result_visible: bool,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Html => self.render_html(),
            OutputFormat::Text => self.render_text(),
        }
    }

    fn render_html(&self) -> String {
        format!(
            "<!doctype html>\n<html>\n<body>\n{}\n{}\n</body>\n</html>\n",
            region("status", &self.status, self.status_visible),
            region("query-result", &self.result, self.result_visible),
        )
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        if self.status_visible {
            let status = self.status.trim_end();
            if status.starts_with(ERROR_PREFIX) {
                out.push_str(&status.red().bold().to_string());
            } else {
                out.push_str(&status.cyan().to_string());
            }
            out.push('\n');
        }
        if self.result_visible {
            out.push_str(&self.result);
            out.push('\n');
        }
        out
    }
}

fn region(id: &str, html: &str, visible: bool) -> String {
    let hidden = if visible { "" } else { " hidden" };
    format!("<div id=\"{id}\"{hidden}>{html}</div>")
}

impl ResultSink for Page {
    fn set_status(&mut self, html: String) {
        self.status = html;
    }

    fn show_status(&mut self, visible: bool) {
        self.status_visible = visible;
    }

    fn set_result(&mut self, html: String) {
        self.result = html;
    }

    fn show_result(&mut self, visible: bool) {
        self.result_visible = visible;
    }
}

const ERROR_PREFIX: &str = "ERROR.";

/// Writes `ERROR. <message>` to the status line and hides the results.
pub fn display_error_status<S: ResultSink + ?Sized>(sink: &mut S, message: &str) -> Outcome {
    tracing::warn!(error = message, "Action failed");
    sink.set_status(format!("{ERROR_PREFIX} {}", escape_html(message)));
    sink.show_status(true);
    sink.show_result(false);
    Outcome::Errored(message.to_string())
}

/// Shows `message` on the status line and hides the result container.
pub(crate) fn display_empty<S: ResultSink + ?Sized>(sink: &mut S, message: &str) -> Outcome {
    sink.set_status(escape_html(message));
    sink.show_status(true);
    sink.show_result(false);
    Outcome::Empty
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// `<a href="...">text</a>` with both parts escaped.
pub(crate) fn link(href: &str, text: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape_html(href),
        escape_html(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Html);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#"say "hi" 'there'"#), "say &quot;hi&quot; &#39;there&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_link_escapes_href_and_text() {
        assert_eq!(
            link("https://x/?a=1&b=\"2\"", "<b>KEY</b>"),
            "<a href=\"https://x/?a=1&amp;b=&quot;2&quot;\">&lt;b&gt;KEY&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn test_display_error_status() {
        let mut page = Page {
            result: "<ul></ul>".to_string(),
            result_visible: true,
            ..Default::default()
        };

        let outcome = display_error_status(&mut page, "Network Error");

        assert_eq!(outcome, Outcome::Errored("Network Error".to_string()));
        assert!(outcome.is_error());
        assert_eq!(page.status, "ERROR. Network Error");
        assert!(page.status_visible);
        assert!(!page.result_visible);
    }

    #[test]
    fn test_display_error_status_escapes_message() {
        let mut page = Page::new();
        display_error_status(&mut page, "<img src=x onerror=alert(1)>");
        assert_eq!(page.status, "ERROR. &lt;img src=x onerror=alert(1)&gt;");
    }

    #[test]
    fn test_render_html_marks_hidden_regions() {
        let page = Page {
            status: "Query term: x".to_string(),
            status_visible: true,
            result: String::new(),
            result_visible: false,
        };

        let html = page.render(OutputFormat::Html);
        assert!(html.contains("<div id=\"status\">Query term: x</div>"));
        assert!(html.contains("<div id=\"query-result\" hidden></div>"));
    }

    #[test]
    fn test_render_text_only_visible_regions() {
        colored::control::set_override(false);
        let page = Page {
            status: "ERROR. nope".to_string(),
            status_visible: true,
            result: "<ul><li>hidden</li></ul>".to_string(),
            result_visible: false,
        };

        let text = page.render(OutputFormat::Text);
        assert_eq!(text, "ERROR. nope\n");
    }
}
