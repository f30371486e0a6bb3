//! Compact table output for `list`

use crate::sync::RemoteListing;
use crate::templates::LocalTemplate;

const REMOTE_COLUMNS: [&str; 7] = [
    "has_diff",
    "name",
    "slug",
    "from_email",
    "from_name",
    "subject",
    "labels",
];

const REMOTE_VERBOSE_COLUMNS: [&str; 13] = [
    "has_diff",
    "name",
    "slug",
    "publish_name",
    "draft_updated_at",
    "published_at",
    "labels",
    "subject",
    "publish_subject",
    "from_email",
    "publish_from_email",
    "from_name",
    "publish_from_name",
];

const LOCAL_COLUMNS: [&str; 6] = ["name", "slug", "from_email", "from_name", "subject", "labels"];

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn remote_cell(listing: &RemoteListing, column: &str) -> String {
    let t = &listing.template;
    match column {
        "has_diff" => listing.has_diff.to_string(),
        "name" => opt(&t.name),
        "slug" => t.slug.clone(),
        "labels" => t.labels.join(", "),
        "subject" => opt(&t.subject),
        "from_email" => opt(&t.from_email),
        "from_name" => opt(&t.from_name),
        "publish_name" => opt(&t.publish_name),
        "publish_subject" => opt(&t.publish_subject),
        "publish_from_email" => opt(&t.publish_from_email),
        "publish_from_name" => opt(&t.publish_from_name),
        "draft_updated_at" => opt(&t.draft_updated_at),
        "published_at" => opt(&t.published_at),
        _ => String::new(),
    }
}

fn local_cell(template: &LocalTemplate, column: &str) -> String {
    let m = &template.metadata;
    match column {
        "name" => opt(&m.name),
        "slug" => m.slug.clone(),
        "from_email" => opt(&m.from_email),
        "from_name" => opt(&m.from_name),
        "subject" => opt(&m.subject),
        "labels" => m.labels.join(", "),
        _ => String::new(),
    }
}

/// Table of remote templates
pub fn remote_table(listings: &[RemoteListing], verbose: bool) -> String {
    let columns: &[&str] = if verbose {
        &REMOTE_VERBOSE_COLUMNS
    } else {
        &REMOTE_COLUMNS
    };

    let rows = listings
        .iter()
        .map(|l| columns.iter().map(|c| remote_cell(l, c)).collect())
        .collect::<Vec<Vec<String>>>();

    render_table(columns, &rows)
}

/// Table of local templates
pub fn local_table(templates: &[LocalTemplate]) -> String {
    let rows = templates
        .iter()
        .map(|t| LOCAL_COLUMNS.iter().map(|c| local_cell(t, c)).collect())
        .collect::<Vec<Vec<String>>>();

    render_table(&LOCAL_COLUMNS, &rows)
}

/// Render a bordered table. Multi-line cells are flattened to one line.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.replace('\n', " ")).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {}{} ", c, " ".repeat(w - c.chars().count())))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = vec![border.clone(), line(headers.to_vec()), border.clone()];
    for row in &rows {
        let cells: Vec<&str> = (0..headers.len())
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        out.push(line(cells));
    }
    out.push(border);

    out.join("\n")
}
