//! Command-line host shell for ConnDesign panels.

mod setup;
mod text;

pub use setup::*;
pub use text::*;

/// Parse a `field=value` assignment. The value may be empty, which clears
/// the field.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_string(), value.trim().to_string()))
}
