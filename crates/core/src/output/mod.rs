//! Snapshot generation for hosts and tooling.

use std::fs;
use std::io;
use std::path::Path;

use wriggle_events::{generate_snapshot_id, CellPos, SnakeSnapshot, WorldSnapshot};

use crate::components::WorldState;
use crate::grid::Cell;

fn cell_pos(cell: Cell) -> CellPos {
    CellPos {
        x: cell.x,
        y: cell.y,
    }
}

/// Captures the complete world state.
pub fn snapshot_world(world: &WorldState, sequence: u64) -> WorldSnapshot {
    WorldSnapshot {
        snapshot_id: generate_snapshot_id(sequence),
        at_ms: world.now_ms,
        cols: world.dims.cols,
        rows: world.dims.rows,
        status: world.status.label().to_string(),
        snakes: world
            .snakes
            .iter()
            .map(|s| SnakeSnapshot {
                id: s.id.0,
                personality: s.personality.label().to_string(),
                body: s.body.iter().copied().map(cell_pos).collect(),
                food: s.food.map(cell_pos),
                direction: CellPos {
                    x: s.dir.dx,
                    y: s.dir.dy,
                },
                behavior: s.behavior.map(|b| b.label().to_string()),
                behavior_target: s.behavior_target.map(|t| t.0),
                satiety: s.satiety,
                wandering: s.wandering,
                respawning: s.respawning,
                desperation: s.desperation,
            })
            .collect(),
        walls: world
            .terrain
            .solid_cells()
            .into_iter()
            .map(cell_pos)
            .collect(),
        incoming_walls: world
            .terrain
            .incoming_cells()
            .into_iter()
            .map(cell_pos)
            .collect(),
    }
}

/// Writes a snapshot as pretty JSON into `dir`, named by its id.
pub fn write_snapshot(dir: &Path, snapshot: &WorldSnapshot) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(dir.join(format!("{}.json", snapshot.snapshot_id)), json)
}
