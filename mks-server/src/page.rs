//! HTML for the single page the service serves.

use std::time::Duration;

use crate::expiry::ExpiryOption;

/// What a rendered page shows besides the form
#[derive(Debug, Default)]
pub struct PageView {
    pub short_url: Option<String>,
    pub error: Option<String>,
    pub stats: Option<Stats>,
}

#[derive(Debug, Clone, Copy)]
pub struct Stats {
    pub links: usize,
    pub uptime: Duration,
}

impl PageView {
    pub fn success(short_url: impl Into<String>) -> Self {
        Self {
            short_url: Some(short_url.into()),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_stats(mut self, stats: Option<Stats>) -> Self {
        self.stats = stats;
        self
    }
}

/// Renders the full page titled `name`
pub fn render(name: &str, view: &PageView) -> String {
    let name = escape_html(name);
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", name));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", name));

    html.push_str("<form method=\"post\" action=\"/\">\n");
    html.push_str("<input type=\"text\" name=\"link\" placeholder=\"https://\" required>\n");
    html.push_str("<select name=\"expiresIn\">\n");
    for option in ExpiryOption::ALL {
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            option.token(),
            option.label()
        ));
    }
    html.push_str("</select>\n<button type=\"submit\">Shorten</button>\n</form>\n");

    if let Some(short_url) = &view.short_url {
        let short_url = escape_html(short_url);
        html.push_str(&format!(
            "<p class=\"success\"><a id=\"short-url\" href=\"{0}\">{0}</a></p>\n",
            short_url
        ));
    }

    if let Some(error) = &view.error {
        html.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }

    if let Some(stats) = view.stats {
        html.push_str(&format!(
            "<p class=\"stats\">Links stored: {} &middot; Uptime: {}</p>\n",
            stats.links,
            format_uptime(stats.uptime)
        ));
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Escapes text for use in element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats `uptime` rounded to the nearest second, e.g. `1h2m3s`
pub fn format_uptime(uptime: Duration) -> String {
    let mut secs = uptime.as_secs();
    if uptime.subsec_millis() >= 500 {
        secs += 1;
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::ZERO), "0s");
        assert_eq!(format_uptime(Duration::from_millis(499)), "0s");
        assert_eq!(format_uptime(Duration::from_millis(1500)), "2s");
        assert_eq!(format_uptime(Duration::from_secs(59)), "59s");
        assert_eq!(format_uptime(Duration::from_secs(60)), "1m0s");
        assert_eq!(format_uptime(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h2m3s");
        assert_eq!(format_uptime(Duration::from_secs(90_000)), "25h0m0s");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_lists_every_expiry_option() {
        let html = render("mks", &PageView::default());
        for option in ExpiryOption::ALL {
            assert!(html.contains(&format!("value=\"{}\"", option.token())));
        }
        assert!(html.contains("<title>mks</title>"));
        assert!(!html.contains("class=\"success\""));
        assert!(!html.contains("class=\"error\""));
        assert!(!html.contains("class=\"stats\""));
    }

    #[test]
    fn test_render_success_escapes_url() {
        let html = render("mks", &PageView::success("http://x/a\"b"));
        assert!(html.contains("href=\"http://x/a&quot;b\""));
    }

    #[test]
    fn test_render_error_and_stats() {
        let view = PageView::error("Link not found.").with_stats(Some(Stats {
            links: 3,
            uptime: Duration::from_secs(61),
        }));
        let html = render("<mks>", &view);

        assert!(html.contains("<h1>&lt;mks&gt;</h1>"));
        assert!(html.contains("<p class=\"error\">Link not found.</p>"));
        assert!(html.contains("Links stored: 3 &middot; Uptime: 1m1s"));
    }
}
