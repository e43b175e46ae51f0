//! Cautious evasion.
//!
//! A cautious snake with any rival head inside its evade range flees:
//! among open neighbor cells that keep at least its body length
//! reachable, it picks the one farthest from the threat, breaking ties
//! toward more space. When no neighbor clears the bar it falls through
//! to the ordinary phases (still marked as evading).

use crate::components::{BehaviorState, WorldState};
use crate::events::EventLog;
use crate::grid::{manhattan, Dir, OccupancyGrid};
use crate::search::{reachable_count, SearchArena};
use crate::tuning::Tuning;

use super::mark_behavior;

pub(super) fn evade(
    world: &mut WorldState,
    idx: usize,
    occupancy: &OccupancyGrid,
    sim: &OccupancyGrid,
    arena: &mut SearchArena,
    tuning: &Tuning,
    events: &mut EventLog,
) -> Option<Dir> {
    let (id, head, len) = {
        let me = &world.snakes[idx];
        (me.id, me.head(), me.len())
    };

    let threat = world
        .snakes
        .iter()
        .filter(|s| s.id != id && s.is_active())
        .map(|s| (manhattan(head, s.head()), s.id, s.head()))
        .filter(|(dist, _, _)| *dist <= tuning.evade_range)
        .min_by_key(|(dist, _, _)| *dist);
    let (_, threat_id, threat_head) = threat?;

    mark_behavior(world, idx, BehaviorState::Evading, Some(threat_id), events);

    // (distance from threat, reachable space) - maximize lexicographically.
    let mut best: Option<(i32, usize, Dir)> = None;
    for dir in Dir::CARDINALS {
        let next = head.step(dir);
        if !world.dims.contains(next) || occupancy.is_blocked(next) {
            continue;
        }
        let space = reachable_count(next, sim, None, None, arena);
        if space < len {
            continue;
        }
        let dist = manhattan(next, threat_head);
        let better = match best {
            None => true,
            Some((best_dist, best_space, _)) => {
                dist > best_dist || (dist == best_dist && space > best_space)
            }
        };
        if better {
            best = Some((dist, space, dir));
        }
    }
    best.map(|(_, _, dir)| dir)
}
