//! HTML answer-key generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use darkblue_core::report::AnswerKey;
use darkblue_core::statistics::CategoryBreakdown;
use darkblue_core::store::write_atomic;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page from an answer key.
pub fn generate_html(key: &AnswerKey) -> String {
    let evaluation = &key.evaluation;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Answer key: {}</title>\n",
        html_escape(key.source.as_deref().unwrap_or("configuration"))
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Answer key</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{}{} image | {} findings | {}</p>\n",
        key.source
            .as_deref()
            .map(|s| format!("<strong>{}</strong> | ", html_escape(s)))
            .unwrap_or_default(),
        evaluation.os,
        evaluation.findings.len(),
        key.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let score_class = if evaluation.total_scored > evaluation.possible_score {
        "over"
    } else {
        "ok"
    };
    html.push_str(&format!(
        "<p class=\"score {score_class}\">Score: {}/{}</p>\n",
        evaluation.total_scored, evaluation.possible_score
    ));
    html.push_str("</header>\n");

    // Category summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Categories</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Category</th><th>Entries</th><th>Findings</th><th>Points</th><th>Unused deductions</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for b in &key.breakdown {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            b.category.label(),
            b.entries,
            b.findings,
            b.points_awarded,
            b.unused_negative_points,
        ));
    }
    html.push_str("</tbody></table>\n");

    if key.breakdown.iter().any(|b| b.points_awarded > 0) {
        html.push_str(&generate_bar_chart(&key.breakdown));
    }

    html.push_str("</section>\n");

    // Findings
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Findings</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Category</th><th onclick=\"sortTable(2)\">Points</th><th onclick=\"sortTable(3)\">Finding</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, f) in evaluation.findings.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"points\">+{}</td><td>{}</td></tr>\n",
            i + 1,
            f.category.label(),
            f.points,
            html_escape(&f.message)
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(key).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML answer key to a file.
pub fn write_html_report(key: &AnswerKey, path: &Path) -> Result<()> {
    let html = generate_html(key);
    write_atomic(path, html.as_bytes())
        .with_context(|| format!("failed to write HTML answer key to {}", path.display()))
}

fn generate_bar_chart(breakdown: &[CategoryBreakdown]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 160;

    let max_points = breakdown
        .iter()
        .map(|b| b.points_awarded)
        .max()
        .unwrap_or(0)
        .max(1);

    let total_height = breakdown.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, b) in breakdown.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (b.points_awarded.max(0) as f64 / max_points as f64 * max_width as f64) as usize;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            b.category.label()
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#1e3a8a\" rx=\"4\"/>\n",
            label_width, y, width, bar_height
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{} pts</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            b.points_awarded
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --ok: #dcfce7; --over: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --ok: #064e3b; --over: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { display: inline-block; padding: 0.5rem 1rem; border-radius: 8px; font-size: 1.25rem; font-weight: bold; }
.ok { background: var(--ok); }
.over { background: var(--over); }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
td.points { font-variant-numeric: tabular-nums; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const numeric = col === 0 || col === 2;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const cmp = numeric ? parseInt(va, 10) - parseInt(vb, 10) : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use darkblue_core::model::*;
    use std::path::Path;

    fn make_test_key() -> AnswerKey {
        let mut doc = ConfigurationDocument::new(Os::Windows);
        doc.score = 20;
        doc.services = Some(vec![Service {
            common_name: "Telnet".into(),
            default_state: "Running".into(),
            desired_state: "Stopped".into(),
            positive_points: 8,
            ..Default::default()
        }]);
        doc.registry_entries = Some(vec![RegistryEntry {
            entry_name: "AllowGuest".into(),
            default_value: "1".into(),
            positive_value: "0".into(),
            positive_message: "Guest <access> disabled".into(),
            positive_points: 6,
            ..Default::default()
        }]);
        let mut key = AnswerKey::generate(&doc, Some(Path::new("windows.json"))).unwrap();
        key.id = uuid::Uuid::nil();
        key
    }

    #[test]
    fn html_report_contains_required_elements() {
        let key = make_test_key();
        let html = generate_html(&key);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Score: 14/20"));
        assert!(html.contains("Service Telnet was stopped."));
        assert!(html.contains("windows.json"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn html_report_escapes_messages() {
        let html = generate_html(&make_test_key());
        assert!(html.contains("Guest &lt;access&gt; disabled"));
        assert!(!html.contains("Guest <access> disabled"));
    }

    #[test]
    fn html_report_write_to_file() {
        let key = make_test_key();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answerkey.html");

        write_html_report(&key, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
