//! HTML rendering of a [`BenchmarkReport`].

use crate::benchmark::{BenchmarkReport, ScenarioResult};
use crate::record::HASH_META_KEY;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn render_scenario(
    html: &mut String,
    heading: &str,
    description: &str,
    scenario: &ScenarioResult,
) {
    html.push_str(&format!("  <h3>{}</h3>\n", escape_html(heading)));
    html.push_str(&format!("  <p>{description}</p>\n"));
    for query in &scenario.queries {
        html.push_str(&format!("  <pre><code>{}</code></pre>\n", escape_html(query)));
    }
    html.push_str(&format!(
        "  <p>Rows returned: <code>{}</code> of <code>{}</code> matching.</p>\n",
        scenario.rows_returned, scenario.total_count
    ));
    html.push_str(&format!(
        "  <p>Execution Time: <strong>{:.6}</strong> seconds</p>\n",
        scenario.elapsed.as_secs_f64()
    ));
}

/// Render the benchmark page.
///
/// Never fails; zero timings and empty scenarios render like any other.
pub fn render_html(report: &BenchmarkReport) -> String {
    let key = escape_html(HASH_META_KEY);
    let mut html = String::new();

    html.push_str("<div class=\"wrap\">\n");
    html.push_str("  <h2>MySQL Stress Test</h2>\n");

    html.push_str("  <h3>Scenario Prep</h3>\n  <ul>\n");
    html.push_str(&format!(
        "    <li><code>{}</code> dummy records are present. They are deleted on deactivation.</li>\n",
        report.record_total
    ));
    html.push_str(&format!(
        "    <li>All records have <code>{key}</code> meta that contains a SHA-256 hash of the record ID.</li>\n"
    ));
    html.push_str(&format!(
        "    <li>The exclusion set holds <code>{}</code> hashes of distinct integers drawn from <code>[{}, {}]</code>{}.</li>\n",
        report.sampled,
        report.settings.sample_min,
        report.settings.sample_max,
        report
            .example_hash
            .as_deref()
            .map(|h| format!(", e.g. <code>{}</code>", escape_html(h)))
            .unwrap_or_default()
    ));
    html.push_str("  </ul>\n");

    render_scenario(
        &mut html,
        "Scenario 1",
        &format!(
            "Retrieve every record that has the <code>{key}</code> meta but whose hash is not in the \
             exclusion set. The unbounded page size makes the store count every matching row."
        ),
        &report.exclusion_scan,
    );

    render_scenario(
        &mut html,
        "Scenario 2",
        &format!(
            "Retrieve a random page of <code>{}</code> record IDs carrying the <code>{key}</code> meta, \
             then fetch the records with those IDs in a second query. Both queries are timed together. \
             The first query returned <code>{}</code> IDs.",
            report.record_total / 2,
            report.narrowed_ids
        ),
        &report.id_narrowing,
    );

    html.push_str("</div>\n");
    html
}
