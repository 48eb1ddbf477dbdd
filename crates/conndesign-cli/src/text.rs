//! Plain-text views for the terminal.

use std::fmt::Write;

use conndesign_host::HostSettings;
use conndesign_plugin_db::PluginDescriptor;
use conndesign_render::{format_length, Document, DocumentBody};
use conndesign_sdk::SelectionGraph;

pub fn describe_plugins(descriptors: &[PluginDescriptor]) -> String {
    let width = descriptors
        .iter()
        .map(|descriptor| descriptor.name.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for descriptor in descriptors {
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:<8}  {}",
            descriptor.load_order, descriptor.name, descriptor.category, descriptor.description,
        );
    }
    out
}

pub fn describe_fields(graph: &SelectionGraph) -> String {
    let mut out = String::new();
    for field in graph.fields() {
        let current = field.current_value().unwrap_or("<unset>");
        let optional = if field.is_required() { "" } else { " (optional)" };
        let _ = writeln!(
            out,
            "{} [{}]{}: {}",
            field.label(),
            field.id(),
            optional,
            current
        );
        if !field.depends_on().is_empty() {
            let upstream: Vec<&str> = field.depends_on().iter().map(|id| id.as_str()).collect();
            let _ = writeln!(out, "    depends on: {}", upstream.join(", "));
        }
        let _ = writeln!(out, "    allowed: {}", field.allowed_values().join(" | "));
    }
    out
}

pub fn describe_document(document: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", document.title);
    match &document.body {
        DocumentBody::Table(table) => {
            for row in &table.rows {
                let _ = writeln!(
                    out,
                    "{:<14} {:>12}    {:<14} {:>12}",
                    row.left_symbol, row.left_value, row.right_symbol, row.right_value
                );
            }
        }
        DocumentBody::Hole(summary) => {
            let _ = writeln!(out, "Hole Dimension: {}", summary.dimension);
            if !summary.reference.is_empty() {
                let _ = writeln!(out, "Reference: {}", summary.reference);
            }
            if let Some(diagram) = &summary.diagram {
                let _ = writeln!(
                    out,
                    "Slot: {} wide x {} long",
                    format_length(diagram.width_mm, diagram.unit),
                    format_length(diagram.length_mm, diagram.unit)
                );
            }
        }
        DocumentBody::Placeholder(placeholder) => {
            let _ = writeln!(out, "{}", placeholder.message);
        }
    }
    out
}

pub fn describe_settings(settings: &HostSettings) -> String {
    let mut out = String::new();
    if settings.plugin_roots.is_empty() {
        let _ = writeln!(out, "plugin roots: <none>");
    }
    for root in &settings.plugin_roots {
        let _ = writeln!(out, "plugin root: {}", root.display());
    }
    let catalog = settings
        .catalog_path
        .as_ref()
        .map_or_else(|| "<bundled>".to_string(), |path| path.display().to_string());
    let _ = writeln!(out, "catalog: {catalog}");
    let _ = writeln!(out, "strict field events: {}", settings.strict_field_events);
    let _ = writeln!(out, "background compute: {}", settings.background_compute);
    out
}
