//! Member Property panel: section properties of a steel shape as a table.

use conndesign_render::{tabulate, Document};
use conndesign_sdk::prelude::*;
use tracing::debug;

use crate::{design_code_aliases, DEFAULT_DESIGN_CODE, DESIGN_CODES};

pub const TITLE: &str = "Member Property";
pub const ENTRY: &str = "member_property";

pub const DESIGN_CODE: &str = "design_code";
pub const SHAPE: &str = "shape";
pub const SECTION: &str = "section";
pub const GRADE: &str = "grade";

pub const SHAPES: [&str; 3] = ["W-Shapes", "Angles", "Rectangular HSS"];
pub const GRADES: [&str; 3] = ["A992", "A58", "A36"];

const W_SHAPE_SYMBOLS: &[&str] = &[
    "A", "d", "d_{det}", "t_w", "t_{w,det}", "b_f", "b_{f,det}", "t_f", "t_{f,det}", "k_{des}",
    "k_{det}", "k_1", "T", "g", "W_t", "I_x", "S_x", "r_x", "Z_x", "I_y", "S_y", "r_y", "Z_y", "J",
    "C_w",
];

const ANGLE_SYMBOLS: &[&str] = &[
    "k", "W_t", "A", "I_x", "S_x", "r_x", "\\overline{y}", "Z_x", "y_p", "J", "Cw", "r_o", "I_y",
    "S_y", "r_y", "\\overline{x}", "Z_y", "x_p", "I_z", "S_z", "r_z", "T_{\\alpha}", "Qs", "d", "B",
    "t",
];

const DEFAULT_SYMBOLS: &[&str] = &[
    "t_{des}", "t_{nom}", "W", "A", "I_x", "S_x", "r_x", "Z_x", "I_y", "S_y", "r_y", "Z_y", "J",
    "C", "H_t", "B",
];

/// Property symbols, in provider value order, for a shape family.
pub fn symbols_for(shape: &str) -> &'static [&'static str] {
    match shape {
        "W-Shapes" => W_SHAPE_SYMBOLS,
        "Angles" => ANGLE_SYMBOLS,
        _ => DEFAULT_SYMBOLS,
    }
}

pub struct MemberPropertyPanel {
    graph: SelectionGraph,
}

impl MemberPropertyPanel {
    /// Build the panel, loading the section catalogs from `provider`.
    pub fn new(provider: &dyn ComputationProvider) -> Result<Self, PanelError> {
        let sections = CatalogValues::load(
            provider,
            DESIGN_CODES,
            design_code_aliases(),
            DESIGN_CODE,
            SHAPE,
        )?;
        let graph = SelectionGraph::builder()
            .field(
                FieldDefinition::new(DESIGN_CODE, "Design code", StaticValues::new(DESIGN_CODES))
                    .with_default(DEFAULT_DESIGN_CODE),
            )
            .field(FieldDefinition::new(SHAPE, "Shape List", StaticValues::new(SHAPES)))
            .field(
                FieldDefinition::new(SECTION, "Section list", sections)
                    .depends_on(DESIGN_CODE)
                    .depends_on(SHAPE),
            )
            .field(FieldDefinition::new(GRADE, "Grade", StaticValues::new(GRADES)).optional())
            .build()?;
        Ok(Self { graph })
    }
}

impl Panel for MemberPropertyPanel {
    fn title(&self) -> &str {
        TITLE
    }

    fn graph(&self) -> &SelectionGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SelectionGraph {
        &mut self.graph
    }

    fn compute_job(&self) -> Box<dyn ComputeJob> {
        let selection = self.graph.selection();
        let value = |field: &str| selection.get(field).unwrap_or_default().to_string();
        Box::new(MemberPropertyJob {
            design_code: value(DESIGN_CODE),
            shape: value(SHAPE),
            section: value(SECTION),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemberPropertyJob {
    design_code: String,
    shape: String,
    section: String,
}

impl ComputeJob for MemberPropertyJob {
    fn run(self: Box<Self>, provider: &dyn ComputationProvider) -> Result<Document, ComputeError> {
        debug!(
            design_code = %self.design_code,
            shape = %self.shape,
            section = %self.section,
            "computing section properties"
        );
        let values =
            provider.compute_section_values(&self.design_code, &self.shape, &self.section)?;
        let table = tabulate(symbols_for(&self.shape), &values);
        Ok(Document::table(TITLE, table))
    }
}

pub struct MemberPropertyFactory;

impl PanelFactory for MemberPropertyFactory {
    fn entry(&self) -> &'static str {
        ENTRY
    }

    fn create(&self, provider: &dyn ComputationProvider) -> Result<Box<dyn Panel>, PanelError> {
        Ok(Box::new(MemberPropertyPanel::new(provider)?))
    }
}
