//! The configuration page.
//!
//! One self-contained HTML document: an option table with a checkbox per
//! option, the build directory status, four action buttons and an output
//! pane.  The inline script posts the checkbox state to `/save` or `/apply`
//! and reads the `/build` response body incrementally so output appears
//! while the compiler is still running.
//!
//! Every identifier and description is escaped before it is written into
//! the document.

use crate::domain::{BuildStatus, OptionSet};

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>CMake Configuration</title>
<style>
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; }
td, th { padding: 4px 12px; text-align: left; border-bottom: 1px solid #ddd; }
code { font-size: 0.95em; }
.status-missing { color: #b00; }
.actions button { margin-right: 8px; }
#output { background: #111; color: #eee; padding: 1em; max-height: 40em; overflow: auto; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>CMake Configuration</h1>
"#;

const SCRIPT: &str = r#"<script>
function collectOptions() {
  const options = {};
  document.querySelectorAll('input.cmake-option').forEach(function (box) {
    options[box.dataset.name] = { description: box.dataset.description, value: box.checked };
  });
  return options;
}

function show(text) {
  document.getElementById('output').textContent = text;
}

async function postJson(path, body) {
  const init = { method: 'POST' };
  if (body !== undefined) {
    init.headers = { 'Content-Type': 'application/json' };
    init.body = JSON.stringify(body);
  }
  const res = await fetch(path, init);
  return res.json();
}

async function saveOptions() {
  const result = await postJson('/save', collectOptions());
  show(result.status === 'success' ? 'Options saved.' : 'Save failed.');
}

async function applyOptions() {
  show('Configuring...\n');
  const result = await postJson('/apply', collectOptions());
  show(result.output + '\n[' + result.status + ']');
}

async function cleanBuild() {
  const result = await postJson('/clean');
  show(result.message);
}

async function runBuild() {
  show('');
  const pane = document.getElementById('output');
  const res = await fetch('/build', { method: 'POST' });
  const reader = res.body.getReader();
  const decoder = new TextDecoder();
  for (;;) {
    const { done, value } = await reader.read();
    if (done) break;
    pane.textContent += decoder.decode(value, { stream: true });
    pane.scrollTop = pane.scrollHeight;
  }
}
</script>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Renders the full page for `options` and the build directory `status`.
pub fn render_page(options: &OptionSet, status: &BuildStatus) -> String {
    let mut html = String::with_capacity(HEAD.len() + SCRIPT.len() + options.len() * 160 + 1024);
    html.push_str(HEAD);

    html.push_str("<p>Build directory: <code>");
    html.push_str(&escape_html(&status.path));
    html.push_str("</code> ");
    if status.exists {
        html.push_str("<span class=\"status-ok\">(exists)</span>");
    } else {
        html.push_str("<span class=\"status-missing\">(missing)</span>");
    }
    html.push_str("</p>\n");

    if options.is_empty() {
        html.push_str("<p>No <code>option(...)</code> declarations found.</p>\n");
    } else {
        html.push_str("<table>\n<tr><th>Option</th><th>Description</th><th>Enabled</th></tr>\n");
        for (name, entry) in options {
            let name = escape_html(name);
            let description = escape_html(&entry.description);
            html.push_str("<tr><td><code>");
            html.push_str(&name);
            html.push_str("</code></td><td>");
            html.push_str(&description);
            html.push_str("</td><td><input type=\"checkbox\" class=\"cmake-option\" data-name=\"");
            html.push_str(&name);
            html.push_str("\" data-description=\"");
            html.push_str(&description);
            html.push('"');
            if entry.value {
                html.push_str(" checked");
            }
            html.push_str("></td></tr>\n");
        }
        html.push_str("</table>\n");
    }

    html.push_str(
        "<p class=\"actions\">\
<button onclick=\"saveOptions()\">Save</button>\
<button onclick=\"applyOptions()\">Apply (configure)</button>\
<button onclick=\"cleanBuild()\">Clean</button>\
<button onclick=\"runBuild()\">Build</button></p>\n\
<pre id=\"output\"></pre>\n",
    );

    html.push_str(SCRIPT);
    html.push_str(TAIL);
    html
}

/// Escapes text for use in element content and double-quoted attributes.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
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

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OptionEntry;

    fn status(exists: bool) -> BuildStatus {
        BuildStatus {
            exists,
            path: "/tmp/aimrt_build".to_string(),
        }
    }

    #[test]
    fn test_render_lists_every_option_with_state() {
        // Arrange
        let mut options = OptionSet::new();
        options.insert("FOO".to_string(), OptionEntry::new("enable foo", true));
        options.insert("BAR".to_string(), OptionEntry::new("enable bar", false));

        // Act
        let html = render_page(&options, &status(true));

        // Assert
        assert!(html.contains("data-name=\"FOO\" data-description=\"enable foo\" checked>"));
        assert!(html.contains("data-name=\"BAR\" data-description=\"enable bar\">"));
        assert!(html.find("FOO").unwrap() < html.find("BAR").unwrap());
    }

    #[test]
    fn test_render_shows_build_dir_status() {
        let html = render_page(&OptionSet::new(), &status(false));
        assert!(html.contains("<code>/tmp/aimrt_build</code>"));
        assert!(html.contains("(missing)"));

        let html = render_page(&OptionSet::new(), &status(true));
        assert!(html.contains("(exists)"));
    }

    #[test]
    fn test_render_escapes_descriptions() {
        let mut options = OptionSet::new();
        options.insert("X".to_string(), OptionEntry::new("<b>bold</b> & 'q'", false));

        let html = render_page(&options, &status(true));

        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; &#39;q&#39;"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn test_render_without_options_says_so() {
        let html = render_page(&OptionSet::new(), &status(true));
        assert!(html.contains("No <code>option(...)</code> declarations found."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_escape_html_plain_text_unchanged() {
        assert_eq!(escape_html("enable foo"), "enable foo");
        assert_eq!(escape_html("a\"b"), "a&quot;b");
    }
}
