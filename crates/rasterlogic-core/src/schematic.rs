use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::GridPos;

/// The link name wired between the processor and display of tile `index`.
///
/// The same string is embedded as the flush operand in the tile's program and
/// declared as the processor's link; generating it in one place keeps the two
/// from disagreeing. Names are 1-based.
pub fn link_name(index: u32) -> String {
    format!("display{}", index + 1)
}

/// A named wiring declaration from a processor to a peripheral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicLink {
    pub name: String,
    pub target: GridPos,
}

impl LogicLink {
    pub fn new(name: &str, target: GridPos) -> Self {
        Self {
            name: name.to_string(),
            target,
        }
    }
}

/// A placed display entity occupying `size` grid units square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTile {
    pub id: Uuid,
    pub position: GridPos,
    pub size: u32,
}

impl DisplayTile {
    pub fn new(position: GridPos, size: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
        }
    }
}

/// A placed processor entity carrying its generated program and link wiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorTile {
    pub id: Uuid,
    pub position: GridPos,
    pub code: String,
    pub links: Vec<LogicLink>,
}

impl ProcessorTile {
    pub fn new(position: GridPos, code: String, links: Vec<LogicLink>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            code,
            links,
        }
    }
}

/// One tile of the layout: a display and the processor driving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePair {
    pub display: DisplayTile,
    pub processor: ProcessorTile,
}

/// The assembled layout: positioned entity pairs, wiring, and pixel bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schematic {
    pub id: Uuid,
    pub name: String,
    pub pairs: Vec<TilePair>,
    pub width: u32,
    pub height: u32,
}

impl Schematic {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            pairs: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_names_are_one_based() {
        assert_eq!(link_name(0), "display1");
        assert_eq!(link_name(4), "display5");
    }

    #[test]
    fn test_schematic_json_roundtrip() {
        let mut schem = Schematic::new("2x1 display grid");
        let display = DisplayTile::new(GridPos::new(3, 0), 32);
        let processor = ProcessorTile::new(
            GridPos::new(0, 0),
            "draw color 1 2 3 255\ndrawflush display1".to_string(),
            vec![LogicLink::new("display1", display.position)],
        );
        schem.pairs.push(TilePair { display, processor });
        schem.width = 35;
        schem.height = 32;

        let json = schem.to_json().unwrap();
        let back = Schematic::from_json(&json).unwrap();
        assert_eq!(back, schem);
    }
}
