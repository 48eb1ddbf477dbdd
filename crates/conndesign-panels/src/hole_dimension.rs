//! Nominal Hole Dimension panel: hole size for a bolt diameter and hole
//! type, with a dimensioned sketch for slotted holes.

use conndesign_render::{Document, HoleSummary, SlotDiagram, MM_PER_INCH};
use conndesign_sdk::prelude::*;
use tracing::debug;

use crate::dimensions::{parse_diameter, slot_dimensions};
use crate::{DEFAULT_DESIGN_CODE, DESIGN_CODES};

pub const TITLE: &str = "Nominal Hole Dimension";
pub const ENTRY: &str = "hole_dimension";

pub const DESIGN_CODE: &str = "design_code";
pub const UNIT: &str = "unit";
pub const DIAMETER: &str = "diameter";
pub const HOLE_TYPE: &str = "hole_type";

pub const IMPERIAL_DIAMETERS: [&str; 8] = [
    "1/2 in.", "5/8 in.", "3/4 in.", "7/8 in.", "1 in.", "1 1/8 in.", "1 1/4 in.", "1 1/2 in.",
];
pub const METRIC_DIAMETERS: [&str; 8] = [
    "16 mm", "20 mm", "22 mm", "24 mm", "27 mm", "30 mm", "33 mm", "36 mm",
];
pub const HOLE_TYPES: [&str; 4] = ["Standard", "Oversize", "Short Slot", "Long Slot"];

const HOLE_DIAMETER: &str = "Hole diameter";
const HOLE_REFERENCE: &str = "Hole diameter reference";

fn is_slot(hole_type: &str) -> bool {
    matches!(hole_type, "Short Slot" | "Long Slot")
}

pub struct HoleDimensionPanel {
    graph: SelectionGraph,
}

impl HoleDimensionPanel {
    pub fn new() -> Result<Self, PanelError> {
        let units = UnitSystem::ALL.map(UnitSystem::label);
        let diameters = KeyedValues::new(UNIT)
            .with_entry(UnitSystem::Imperial.label(), IMPERIAL_DIAMETERS)
            .with_entry(UnitSystem::Metric.label(), METRIC_DIAMETERS);
        let graph = SelectionGraph::builder()
            .field(
                FieldDefinition::new(DESIGN_CODE, "Design Code", StaticValues::new(DESIGN_CODES))
                    .with_default(DEFAULT_DESIGN_CODE),
            )
            .field(FieldDefinition::new(UNIT, "Measurement Unit", StaticValues::new(units)))
            .field(FieldDefinition::new(DIAMETER, "Bolt Diameter", diameters).depends_on(UNIT))
            .field(FieldDefinition::new(
                HOLE_TYPE,
                "Hole Type",
                StaticValues::new(HOLE_TYPES),
            ))
            .build()?;
        Ok(Self { graph })
    }
}

impl Panel for HoleDimensionPanel {
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
        Box::new(HoleDimensionJob {
            design_code: value(DESIGN_CODE),
            unit: value(UNIT),
            diameter: value(DIAMETER),
            hole_type: value(HOLE_TYPE),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HoleDimensionJob {
    design_code: String,
    unit: String,
    diameter: String,
    hole_type: String,
}

impl ComputeJob for HoleDimensionJob {
    fn run(self: Box<Self>, provider: &dyn ComputationProvider) -> Result<Document, ComputeError> {
        let unit = UnitSystem::from_label(&self.unit)
            .ok_or_else(|| ComputeError::InvalidInput(format!("unknown unit `{}`", self.unit)))?;
        let diameter = parse_diameter(&self.diameter)?;
        debug!(
            design_code = %self.design_code,
            %unit,
            diameter,
            hole_type = %self.hole_type,
            "computing hole dimension"
        );
        let mut results =
            provider.compute_hole_info(&self.design_code, unit, diameter, &self.hole_type)?;
        let dimension = results
            .remove(HOLE_DIAMETER)
            .ok_or_else(|| ComputeError::MissingResult(HOLE_DIAMETER.into()))?
            .content;
        let reference = results
            .remove(HOLE_REFERENCE)
            .map(|entry| entry.content)
            .unwrap_or_default();

        let diagram = if is_slot(&self.hole_type) {
            let (mut width, mut length) = slot_dimensions(&dimension)?;
            if unit == UnitSystem::Imperial {
                width *= MM_PER_INCH;
                length *= MM_PER_INCH;
            }
            Some(SlotDiagram::new(width, length, unit.display_unit()))
        } else {
            None
        };

        Ok(Document::hole(
            TITLE,
            HoleSummary {
                dimension,
                reference,
                diagram,
            },
        ))
    }
}

pub struct HoleDimensionFactory;

impl PanelFactory for HoleDimensionFactory {
    fn entry(&self) -> &'static str {
        ENTRY
    }

    fn create(&self, _provider: &dyn ComputationProvider) -> Result<Box<dyn Panel>, PanelError> {
        Ok(Box::new(HoleDimensionPanel::new()?))
    }
}
