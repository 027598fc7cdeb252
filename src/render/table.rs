//! Table primitives for the structured formats
//!
//! Tables are column-major: `columns[i][j]` is the cell of column `i` in row
//! `j`. Callers sometimes insert synthetic columns (e.g. a `versionsuffix`
//! column that only shows up when needed), so the number of titles and the
//! number of columns are allowed to differ; missing cells render empty.

/// Two-space indentation used in nested lists
pub const INDENT_2SPACES: &str = "  ";

/// Four-space indentation used in plain-text listings and literal blocks
pub const INDENT_4SPACES: &str = "    ";

fn width(s: &str) -> usize {
    s.chars().count()
}

fn column_count(titles: &[String], columns: &[Vec<String>]) -> usize {
    titles.len().max(columns.len())
}

fn row_count(columns: &[Vec<String>]) -> usize {
    columns.iter().map(Vec::len).max().unwrap_or(0)
}

fn cell<'a>(columns: &'a [Vec<String>], col: usize, row: usize) -> &'a str {
    columns
        .get(col)
        .and_then(|c| c.get(row))
        .map(String::as_str)
        .unwrap_or("")
}

/// Pipe-delimited MarkDown table with a header separator row
pub fn md_table(titles: &[String], columns: &[Vec<String>]) -> Vec<String> {
    let ncols = column_count(titles, columns);
    let title = |i: usize| titles.get(i).map(String::as_str).unwrap_or("");

    let mut lines = Vec::with_capacity(row_count(columns) + 2);
    lines.push(format!(
        "|{}|",
        (0..ncols).map(title).collect::<Vec<_>>().join("|")
    ));
    lines.push(format!(
        "|{}|",
        (0..ncols)
            .map(|i| "-".repeat(width(title(i)).max(3)))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in 0..row_count(columns) {
        lines.push(format!(
            "|{}|",
            (0..ncols)
                .map(|col| cell(columns, col, row))
                .collect::<Vec<_>>()
                .join("|")
        ));
    }
    lines
}

/// reST simple table; every column is as wide as its widest cell or title
pub fn rst_table(titles: &[String], columns: &[Vec<String>]) -> Vec<String> {
    let ncols = column_count(titles, columns);
    let nrows = row_count(columns);
    let title = |i: usize| titles.get(i).map(String::as_str).unwrap_or("");

    let widths: Vec<usize> = (0..ncols)
        .map(|col| {
            (0..nrows)
                .map(|row| width(cell(columns, col, row)))
                .chain(std::iter::once(width(title(col))))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[&str], fill: char| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let pad = w.saturating_sub(width(c));
                format!("{}{}", c, fill.to_string().repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(INDENT_4SPACES)
    };

    let empty = vec![""; ncols];
    let border = line(&empty, '=');

    let mut lines = Vec::with_capacity(nrows + 5);
    lines.push(border.clone());
    let header: Vec<&str> = (0..ncols).map(title).collect();
    lines.push(line(&header, ' '));
    lines.push(border.clone());
    for row in 0..nrows {
        let cells: Vec<&str> = (0..ncols).map(|col| cell(columns, col, row)).collect();
        lines.push(line(&cells, ' '));
    }
    lines.push(border);
    lines.push(String::new());
    lines
}

/// MarkDown section: optional `#`-prefixed title at `level`, then the table
pub fn md_title_and_table(
    title: Option<&str>,
    titles: &[String],
    columns: &[Vec<String>],
    level: usize,
) -> Vec<String> {
    let mut doc = Vec::new();
    if let Some(title) = title {
        doc.push(format!("{} {}", "#".repeat(level), title));
        doc.push(String::new());
    }
    doc.extend(md_table(titles, columns));
    doc
}

/// reST section: optional underlined title, then the table
pub fn rst_title_and_table(
    title: Option<&str>,
    titles: &[String],
    columns: &[Vec<String>],
) -> Vec<String> {
    let mut doc = Vec::new();
    if let Some(title) = title {
        doc.extend(rst_heading(title, '-'));
        doc.push(String::new());
    }
    doc.extend(rst_table(titles, columns));
    doc
}

/// Title underlined with `underline`, matching the title's width
pub fn rst_heading(title: &str, underline: char) -> [String; 2] {
    [
        title.to_string(),
        underline.to_string().repeat(width(title)),
    ]
}

/// Owned column titles from string literals
pub fn titles(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Removes duplicates, keeping the first occurrence of each item
pub fn nub<T: PartialEq + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Wraps `s` in double backticks (reST/MarkDown inline literal)
pub fn literal(s: &str) -> String {
    format!("``{}``", s)
}
