use serde::{Deserialize, Serialize};

use crate::diagram::SlotDiagram;
use crate::markup;
use crate::table::PropertyTable;

/// Why a panel is showing a placeholder instead of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceholderKind {
    /// Nothing has been computed yet.
    Initial,
    /// A computation is running and there is no earlier result to show.
    Pending,
    /// The provider rejected or failed the last request.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub message: String,
}

/// Text result of a hole lookup, optionally with a slot diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleSummary {
    pub dimension: String,
    pub reference: String,
    pub diagram: Option<SlotDiagram>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentBody {
    Table(PropertyTable),
    Hole(HoleSummary),
    Placeholder(Placeholder),
}

/// A rendered panel output, ready for the host to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub body: DocumentBody,
}

impl Document {
    pub fn table(title: impl Into<String>, table: PropertyTable) -> Self {
        Self {
            title: title.into(),
            body: DocumentBody::Table(table),
        }
    }

    pub fn hole(title: impl Into<String>, summary: HoleSummary) -> Self {
        Self {
            title: title.into(),
            body: DocumentBody::Hole(summary),
        }
    }

    pub fn initial(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: DocumentBody::Placeholder(Placeholder {
                kind: PlaceholderKind::Initial,
                message: "Select inputs to see results".into(),
            }),
        }
    }

    pub fn pending(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: DocumentBody::Placeholder(Placeholder {
                kind: PlaceholderKind::Pending,
                message: "Computing...".into(),
            }),
        }
    }

    pub fn unavailable(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: DocumentBody::Placeholder(Placeholder {
                kind: PlaceholderKind::Unavailable,
                message: format!("Computation unavailable: {}", reason.into()),
            }),
        }
    }

    pub fn placeholder_kind(&self) -> Option<PlaceholderKind> {
        match &self.body {
            DocumentBody::Placeholder(placeholder) => Some(placeholder.kind),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        markup::html(self)
    }
}
