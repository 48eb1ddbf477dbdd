use crate::document::{Document, DocumentBody, HoleSummary};
use crate::table::PropertyTable;

const TABLE_STYLE: &str = "table { border-collapse: collapse; width: 100%; table-layout: fixed; } \
th, td { border: 1px solid black; text-align: center; padding: 3px; width: 25%; word-wrap: break-word; }";

const MATHJAX: &str = r#"<script type="text/javascript" id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3.1.2/es5/tex-svg.js"></script>"#;

pub(crate) fn html(document: &Document) -> String {
    let title = escape(&document.title);
    let (head, body) = match &document.body {
        DocumentBody::Table(table) => (
            format!("<style>{TABLE_STYLE}</style>{MATHJAX}"),
            table_html(table),
        ),
        DocumentBody::Hole(summary) => (String::new(), hole_html(summary)),
        DocumentBody::Placeholder(placeholder) => {
            (String::new(), format!("<p>{}</p>", escape(&placeholder.message)))
        }
    };
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>{title}</title>{head}</head><body>{body}</body></html>"
    )
}

fn table_html(table: &PropertyTable) -> String {
    let mut out = String::from("<table><tr><th>Item</th><th>Value</th><th>Item</th><th>Value</th></tr>");
    for row in &table.rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            symbol(&row.left_symbol),
            escape(&row.left_value),
            symbol(&row.right_symbol),
            escape(&row.right_value),
        ));
    }
    out.push_str("</table>");
    out
}

fn hole_html(summary: &HoleSummary) -> String {
    let mut out = format!(
        "Hole Dimension: {}<br>{}",
        escape(&summary.dimension),
        escape(&summary.reference)
    );
    if let Some(diagram) = &summary.diagram {
        out.push_str(&diagram.to_svg());
    }
    out
}

/// Symbols are TeX fragments typeset by MathJax.
fn symbol(tex: &str) -> String {
    if tex.is_empty() {
        String::new()
    } else {
        format!("\\({}\\)", escape(tex))
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
