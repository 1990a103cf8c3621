//! Server-rendered HTML for the dashboard.

use std::fmt::Write;

use advis_allocation::{AllocationReport, RankIssue, Roster, REQUIRED_COLUMNS};
use advis_id::UploadId;

use crate::state::Session;

/// Rows shown in the uploaded data sample.
pub const PREVIEW_ROWS: usize = 10;

const STYLE: &str = r#"
body { background: #f9fbff; font-family: 'Helvetica Neue', Arial, sans-serif; margin: 0 auto; max-width: 1100px; padding: 1.5rem; color: #1c2833; }
h1 { color: #1a5276; }
h2, h3 { color: #154360; }
.caption { color: #5d6d7e; margin-top: -0.5rem; }
.banner { padding: 0.75rem 1rem; border-radius: 8px; margin: 1rem 0; }
.banner.ok { background: #e8f8f5; border: 1px solid #48c9b0; }
.banner.info { background: #ebf5fb; border: 1px solid #5dade2; }
.banner.warn { background: #fef9e7; border: 1px solid #f4d03f; }
.banner.error { background: #fdedec; border: 1px solid #e74c3c; }
button { background: #2e86c1; color: #fff; border: 0; border-radius: 8px; height: 3em; width: 100%; font-size: 16px; font-weight: bold; cursor: pointer; }
button:hover { background: #21618c; }
table { border-collapse: collapse; width: 100%; background: #fff; border-radius: 10px; overflow: hidden; }
th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #e5e8e8; text-align: left; }
th { background: #d6eaf8; }
.metrics { display: flex; gap: 1rem; }
.metric { flex: 1; background: #e8f8f5; padding: 10px; border-radius: 8px; }
.metric .value { font-size: 1.8rem; font-weight: bold; }
.chart .row { display: flex; align-items: center; margin: 0.3rem 0; }
.chart .label { width: 12rem; }
.chart .bar { background: #2e86c1; height: 1.4rem; color: #fff; padding-left: 0.4rem; border-radius: 4px; }
footer { text-align: center; color: gray; margin-top: 2rem; }
"#;

pub fn escape(raw: &str) -> String {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Faculty Allocation Dashboard</h1>
<p class="caption">Advisor assignment by CGPA order, round-robin across faculties</p>
{body}
<footer>Uploads and errors are recorded in the service log.</footer>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn banner(kind: &str, message: &str) -> String {
    format!(r#"<div class="banner {kind}">{}</div>"#, escape(message))
}

fn upload_form() -> String {
    r#"<form method="post" action="/uploads" enctype="multipart/form-data">
<label for="file"><strong>Upload student preference CSV</strong></label><br>
<input type="file" id="file" name="file" accept=".csv,text/csv" required>
<button type="submit">Upload</button>
</form>"#
        .to_string()
}

fn table(headers: &[String], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut html = String::from("<table><thead><tr>");
    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape(header));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(&cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn rank_issue_banner(issues: &[RankIssue]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let listed: Vec<String> = issues
        .iter()
        .take(5)
        .map(|i| format!("row {} ({}): '{}' for {}", i.row, i.roll, i.value, i.faculty))
        .collect();
    let more = issues.len().saturating_sub(listed.len());
    let mut message = format!(
        "{} preference cell(s) were not valid ranks and were ignored: {}",
        issues.len(),
        listed.join("; ")
    );
    if more > 0 {
        let _ = write!(message, "; and {more} more");
    }
    banner("warn", &message)
}

pub fn index_page() -> String {
    let columns = REQUIRED_COLUMNS.map(|c| format!("<code>{c}</code>")).join(", ");
    let body = format!(
        r#"{form}
{info}
<h3>CSV format</h3>
<ul>
<li>Columns: {columns}, then one column per faculty, e.g. <code>Faculty_A</code>, <code>Faculty_B</code>.</li>
<li>Each faculty column holds the student's rank for that faculty (1 = highest preference).</li>
</ul>
<h3>How allocation works</h3>
<ol>
<li>Students are sorted by CGPA, highest first; equal CGPAs keep their upload order.</li>
<li>Faculties are handed out in column order, round-robin.</li>
<li>Preference ranks are tallied per faculty for review; they do not influence the allocation.</li>
</ol>"#,
        form = upload_form(),
        info = banner("info", "Upload a CSV file to continue."),
    );
    layout("Faculty Allocation", &body)
}

fn student_rows(roster: &Roster) -> (Vec<String>, Vec<Vec<String>>) {
    let mut headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    headers.extend(roster.faculties().iter().map(|f| f.to_string()));

    let rows = roster
        .preview(PREVIEW_ROWS)
        .iter()
        .map(|s| {
            let mut row = vec![s.roll.clone(), s.name.clone(), s.email.clone(), s.cgpa.to_string()];
            row.extend(
                roster
                    .faculties()
                    .iter()
                    .map(|f| s.rank_for(f).map(|r| r.to_string()).unwrap_or_default()),
            );
            row
        })
        .collect();

    (headers, rows)
}

pub fn preview_page(upload_id: UploadId, session: &Session) -> String {
    let roster = &session.roster;
    let (headers, rows) = student_rows(roster);
    let body = format!(
        r#"{ok}
{issues}
<details>
<summary>View uploaded data sample (first {PREVIEW_ROWS} rows)</summary>
{sample}
</details>
<form method="post" action="/uploads/{upload_id}/allocate">
<button type="submit">Start allocation</button>
</form>
<p><a href="/">Upload a different file</a></p>"#,
        ok = banner(
            "ok",
            &format!(
                "Uploaded {} at {} with {} records and {} faculties.",
                session.file_name,
                session.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
                roster.len(),
                roster.faculties().len()
            ),
        ),
        issues = rank_issue_banner(roster.rank_issues()),
        sample = table(&headers, rows),
    );
    layout("Roster uploaded", &body)
}

fn metrics(report: &AllocationReport) -> String {
    let m = &report.metrics;
    format!(
        r#"<div class="metrics">
<div class="metric"><div>Total students</div><div class="value">{}</div></div>
<div class="metric"><div>Total faculties</div><div class="value">{}</div></div>
<div class="metric"><div>Average CGPA</div><div class="value">{:.2}</div></div>
</div>"#,
        m.student_count, m.faculty_count, m.mean_cgpa
    )
}

fn load_chart(report: &AllocationReport) -> String {
    let max = report.max_load().max(1);
    let mut html = String::from(r#"<div class="chart">"#);
    for load in &report.loads {
        let width = load.assigned * 100 / max;
        let _ = write!(
            html,
            r#"<div class="row"><span class="label">{}</span><span class="bar" style="width: {width}%">{}</span></div>"#,
            escape(load.faculty.as_str()),
            load.assigned
        );
    }
    html.push_str("</div>");
    html
}

pub fn results_page(upload_id: UploadId, session: &Session, report: &AllocationReport) -> String {
    let allocation_headers: Vec<String> = ["Roll", "Name", "Email", "CGPA", "Assigned Faculty"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let allocation_rows = report.allocations.iter().map(|r| {
        vec![
            r.student.roll.clone(),
            r.student.name.clone(),
            r.student.email.clone(),
            r.student.cgpa.to_string(),
            r.faculty.to_string(),
        ]
    });

    let pivot = report.summary.pivot();
    let mut summary_headers = vec!["Faculty".to_string()];
    summary_headers.extend(pivot.ranks.iter().map(|r| format!("Pref {r}")));
    let summary_rows = pivot.rows.iter().map(|(faculty, counts)| {
        let mut row = vec![faculty.to_string()];
        row.extend(counts.iter().map(|c| c.to_string()));
        row
    });

    let body = format!(
        r#"{ok}
<h2>Allocation results</h2>
{allocations}
<p><a href="/uploads/{upload_id}/allocation.csv" download>Download allocation CSV</a></p>
<h2>Preference summary</h2>
{summary}
<p><a href="/uploads/{upload_id}/preferences.csv" download>Download preference stats CSV</a></p>
<h2>Summary metrics</h2>
{metrics}
<p>{hits} of {total} students were assigned their first-choice faculty.</p>
<h2>Faculty assignment count</h2>
{chart}
<p><a href="/">Upload another file</a></p>"#,
        ok = banner(
            "ok",
            &format!("Allocation complete for {}.", session.file_name)
        ),
        allocations = table(&allocation_headers, allocation_rows),
        summary = table(&summary_headers, summary_rows),
        metrics = metrics(report),
        hits = report.first_choice_hits(),
        total = report.metrics.student_count,
        chart = load_chart(report),
    );
    layout("Allocation results", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "{}\n{}",
        banner("error", &format!("Error processing file: {message}")),
        upload_form()
    );
    layout("Upload failed", &body)
}
