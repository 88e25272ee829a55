use crate::encode::TileProgram;
use crate::geometry::GridPos;
use crate::grid::GridPlan;
use crate::schematic::{link_name, DisplayTile, LogicLink, ProcessorTile, Schematic, TilePair};

/// Running maximum extent of the layout, in grid units per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

/// Receives placed entities from the assembly walk, so the walk itself has no
/// dependency on any particular entity model.
pub trait LayoutSink {
    fn place_display(&mut self, position: GridPos, size: u32);
    fn place_processor(&mut self, position: GridPos, code: String, link: LogicLink);
}

/// Position one processor and one display per active grid cell and wire them
/// together by name.
///
/// Cells are visited in row-major order; cells with `index >= requested_count`
/// are skipped. Processors occupy a compact block at the origin, one grid unit
/// per cell; displays sit in a second block to the right of a one-unit
/// separation strip, `unit_size` grid units per cell. A `requested_count` of 0
/// produces an empty layout with zero bounds.
pub fn assemble<S: LayoutSink>(
    plan: &GridPlan,
    requested_count: u32,
    unit_size: u32,
    programs: &[TileProgram],
    sink: &mut S,
) -> Bounds {
    let display_grid_start_x = plan.columns + 1;
    let mut bounds = Bounds::default();

    for cell in plan.cells() {
        if cell.index >= requested_count {
            continue;
        }

        let display_x = display_grid_start_x + cell.column * unit_size;
        let display_y = cell.row * unit_size;
        let display_pos = GridPos::new(display_x as i32, display_y as i32);
        sink.place_display(display_pos, unit_size);

        let code = programs
            .get(cell.index as usize)
            .map(|p| p.source())
            .unwrap_or_default();
        let link = LogicLink::new(&link_name(cell.index), display_pos);
        sink.place_processor(
            GridPos::new(cell.column as i32, cell.row as i32),
            code,
            link,
        );

        bounds.width = bounds.width.max(display_x + unit_size);
        bounds.height = bounds.height.max(display_y + unit_size);
    }

    bounds
}

/// Default sink: collects placements into a [`Schematic`].
#[derive(Debug, Default)]
pub struct SchematicSink {
    pairs: Vec<TilePair>,
    pending_display: Option<DisplayTile>,
}

impl SchematicSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self, name: &str, bounds: Bounds) -> Schematic {
        let mut schematic = Schematic::new(name);
        schematic.pairs = self.pairs;
        schematic.width = bounds.width;
        schematic.height = bounds.height;
        schematic
    }
}

impl LayoutSink for SchematicSink {
    fn place_display(&mut self, position: GridPos, size: u32) {
        self.pending_display = Some(DisplayTile::new(position, size));
    }

    fn place_processor(&mut self, position: GridPos, code: String, link: LogicLink) {
        let display = self
            .pending_display
            .take()
            .unwrap_or_else(|| DisplayTile::new(link.target, 0));
        self.pairs.push(TilePair {
            display,
            processor: ProcessorTile::new(position, code, vec![link]),
        });
    }
}

/// Assemble the whole layout into a schematic named after its display grid.
pub fn assemble_schematic(
    plan: &GridPlan,
    requested_count: u32,
    unit_size: u32,
    programs: &[TileProgram],
) -> Schematic {
    let mut sink = SchematicSink::new();
    let bounds = assemble(plan, requested_count, unit_size, programs, &mut sink);
    let name = format!("{}x{} display grid", plan.columns, plan.rows);
    log::info!(
        "assembled {} of {} cells into '{}' ({} x {})",
        requested_count.min(plan.cell_count()),
        plan.cell_count(),
        name,
        bounds.width,
        bounds.height
    );
    sink.finish(&name, bounds)
}
