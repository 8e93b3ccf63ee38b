//! Factory transition engine
//!
//! One cellular-automaton step per fixed tick. Every grid-locked object is
//! advanced by the rule of the tile it sits on:
//! - Conveyors and intakes: accumulate, then step by the tile's delta
//! - Furnaces: accumulate (slowly for raw rock), refine, then `conveyor_away`
//! - Engines: eat the object, banking fuel if it was refined
//! - Destroyed tiles: the object is lost through the breach

use rand::Rng;

use super::grid::{Dir, GridSpace, TileKind};
use super::object::{ObjectId, ObjectKind, ObjectPool, ObjectState};
use crate::consts::{CONVEYOR_AWAY_GATE, FUEL_PER_OBJECT, TRANSITION_THRESHOLD};
use crate::tuning::Tuning;

/// What happened during one factory step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FactoryReport {
    /// Objects that moved to another tile
    pub moved: u32,
    /// Asteroids turned into fuel
    pub refined: u32,
    /// Objects eaten by engines
    pub consumed: u32,
    pub fuel_deposited: f32,
    /// Objects lost through destroyed tiles
    pub breached: u32,
}

/// Advance every grid-locked object by one tick
pub fn do_factory<R: Rng>(
    grid: &mut GridSpace,
    pool: &mut ObjectPool,
    dt: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> FactoryReport {
    let mut report = FactoryReport::default();
    let mut doomed: Vec<ObjectId> = Vec::new();

    for (id, object) in pool.iter_mut() {
        let ObjectState::GridLocked {
            tile_x,
            tile_y,
            transition,
        } = &mut object.state
        else {
            continue;
        };

        // A grid edit can't shrink the ship, but a stale tile must not index out of range
        let Some(cell) = grid.get(*tile_x as i32, *tile_y as i32) else {
            doomed.push(id);
            report.breached += 1;
            continue;
        };
        let kind = cell.kind;

        match kind {
            TileKind::Conveyor(_) | TileKind::Intake(_) => {
                *transition += tuning.conveyor_rate * dt;
                if *transition > TRANSITION_THRESHOLD {
                    let Some((dx, dy)) = kind.conveyance() else {
                        continue;
                    };
                    // Belts pointing off the hull hold their cargo at the edge
                    if let Some((nx, ny)) =
                        grid.in_bounds(*tile_x as i32 + dx, *tile_y as i32 + dy)
                    {
                        *tile_x = nx;
                        *tile_y = ny;
                        *transition = 0.0;
                        report.moved += 1;
                    }
                }
            }
            TileKind::Furnace => {
                let rate = match object.kind {
                    ObjectKind::Asteroid => tuning.furnace_raw_rate,
                    ObjectKind::Fuel => tuning.furnace_refined_rate,
                };
                *transition += rate * dt;
                if *transition > TRANSITION_THRESHOLD {
                    if object.kind == ObjectKind::Asteroid {
                        object.kind = ObjectKind::Fuel;
                        report.refined += 1;
                    }
                    if let Some((nx, ny)) = conveyor_away(grid, *tile_x, *tile_y, rng) {
                        *tile_x = nx;
                        *tile_y = ny;
                        *transition = 0.0;
                        report.moved += 1;
                    }
                }
            }
            TileKind::Engine(_) => {
                if object.kind == ObjectKind::Fuel {
                    grid.cell_mut(*tile_x, *tile_y).engine.fuel += FUEL_PER_OBJECT;
                    report.fuel_deposited += FUEL_PER_OBJECT;
                }
                doomed.push(id);
                report.consumed += 1;
            }
            TileKind::Destroyed => {
                doomed.push(id);
                report.breached += 1;
            }
            TileKind::Wall | TileKind::Floor => {}
        }
    }

    for id in doomed {
        pool.destroy(id);
    }

    if report.refined > 0 || report.consumed > 0 || report.breached > 0 {
        log::debug!(
            "Factory: refined {}, consumed {} (+{:.1} fuel), breached {}",
            report.refined,
            report.consumed,
            report.fuel_deposited,
            report.breached
        );
    }
    report
}

/// Pick an outgoing conveyor next to a furnace.
///
/// Neighbours are visited up, down, left, right. Off-grid neighbours are
/// skipped, as are belts flowing back into the furnace. The first candidate
/// that passes the random gate wins; `None` means try again next tick.
pub fn conveyor_away<R: Rng>(grid: &GridSpace, x: u8, y: u8, rng: &mut R) -> Option<(u8, u8)> {
    for dir in Dir::ALL {
        let (dx, dy) = dir.delta();
        let Some((nx, ny)) = grid.in_bounds(x as i32 + dx, y as i32 + dy) else {
            continue;
        };
        let TileKind::Conveyor(flow) = grid.cell(nx, ny).kind else {
            continue;
        };
        if flow == dir.opposite() {
            continue;
        }
        if rng.next_u32() % CONVEYOR_AWAY_GATE == 0 {
            return Some((nx, ny));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::object::Object;
    use crate::sim::rng::ConstRng;

    fn grid(width: u8, height: u8, template: &str) -> GridSpace {
        GridSpace::from_template(width, height, template, 0.0).expect("valid template")
    }

    fn locked_with(pool: &mut ObjectPool, kind: ObjectKind, x: u8, y: u8, transition: f32) -> ObjectId {
        let mut object = Object::locked(kind, x, y);
        if let ObjectState::GridLocked { transition: t, .. } = &mut object.state {
            *t = transition;
        }
        pool.spawn(object).expect("pool has room")
    }

    fn transition_of(pool: &ObjectPool, id: ObjectId) -> f32 {
        match pool.get(id).expect("alive").state {
            ObjectState::GridLocked { transition, .. } => transition,
            ObjectState::FreeFlying { .. } => panic!("object escaped the factory"),
        }
    }

    #[test]
    fn test_conveyors_step_by_their_delta() {
        let tuning = Tuning::default();
        let cases = [
            ('>', (1, 1), (2, 1)),
            ('<', (1, 1), (0, 1)),
            ('A', (1, 1), (1, 0)),
            ('V', (1, 1), (1, 2)),
            ('L', (1, 1), (2, 1)),
            ('R', (1, 1), (0, 1)),
            ('U', (1, 1), (1, 2)),
            ('D', (1, 1), (1, 0)),
        ];
        for (glyph, from, to) in cases {
            let template: String = (0..9).map(|i| if i == 4 { glyph } else { '.' }).collect();
            let mut grid = grid(3, 3, &template);
            let mut pool = ObjectPool::new(4);
            let id = locked_with(&mut pool, ObjectKind::Asteroid, from.0, from.1, TRANSITION_THRESHOLD);

            do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(1));

            let object = pool.get(id).expect("alive");
            assert_eq!(object.tile(), Some(to), "tile {glyph}");
            assert_eq!(transition_of(&pool, id), 0.0);
        }
    }

    #[test]
    fn test_conveyor_accumulates_below_threshold() {
        let tuning = Tuning::default();
        let mut grid = grid(2, 1, ">.");
        let mut pool = ObjectPool::new(4);
        let id = locked_with(&mut pool, ObjectKind::Asteroid, 0, 0, 0.0);

        do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(0));
        assert_eq!(pool.get(id).unwrap().tile(), Some((0, 0)));
        assert!((transition_of(&pool, id) - tuning.conveyor_rate * SIM_DT).abs() < 1e-4);
    }

    #[test]
    fn test_conveyor_off_the_edge_holds() {
        let tuning = Tuning::default();
        let mut grid = grid(2, 1, ".>");
        let mut pool = ObjectPool::new(4);
        let id = locked_with(&mut pool, ObjectKind::Asteroid, 1, 0, TRANSITION_THRESHOLD);

        do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(0));
        assert_eq!(pool.get(id).unwrap().tile(), Some((1, 0)));
    }

    #[test]
    fn test_furnace_refines_and_routes_out() {
        let tuning = Tuning::default();
        let mut grid = grid(3, 1, ">f>");
        let mut pool = ObjectPool::new(4);
        let id = locked_with(&mut pool, ObjectKind::Asteroid, 1, 0, TRANSITION_THRESHOLD);

        let report = do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(0));
        let object = pool.get(id).unwrap();
        assert_eq!(object.kind, ObjectKind::Fuel);
        // Left belt flows into the furnace, so only the right one qualifies
        assert_eq!(object.tile(), Some((2, 0)));
        assert_eq!(report.refined, 1);
    }

    #[test]
    fn test_furnace_raw_is_slower_than_refined() {
        let tuning = Tuning::default();
        let mut grid = grid(1, 1, "f");
        let mut pool = ObjectPool::new(4);
        let raw = locked_with(&mut pool, ObjectKind::Asteroid, 0, 0, 0.0);
        let refined = locked_with(&mut pool, ObjectKind::Fuel, 0, 0, 0.0);

        do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(0));
        assert!(transition_of(&pool, raw) < transition_of(&pool, refined));
    }

    #[test]
    fn test_furnace_gate_failure_retries() {
        let tuning = Tuning::default();
        let mut grid = grid(2, 1, "f>");
        let mut pool = ObjectPool::new(4);
        let id = locked_with(&mut pool, ObjectKind::Asteroid, 0, 0, TRANSITION_THRESHOLD);

        // 1 % 4 != 0: the gate never opens
        for _ in 0..10 {
            do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(1));
        }
        let object = pool.get(id).unwrap();
        assert_eq!(object.tile(), Some((0, 0)));
        assert_eq!(object.kind, ObjectKind::Fuel);

        do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(4));
        assert_eq!(pool.get(id).unwrap().tile(), Some((1, 0)));
    }

    #[test]
    fn test_conveyor_away_skips_edges_and_inbound() {
        let boxed_in = grid(3, 3, ".V.>f.#A.");
        // (1,0) V flows into the furnace at (1,1); (0,1) > flows into it too;
        // (1,2) A flows into it from below. Nothing qualifies.
        assert_eq!(conveyor_away(&boxed_in, 1, 1, &mut ConstRng(0)), None);

        let corner = grid(2, 2, "f>V.");
        assert_eq!(conveyor_away(&corner, 0, 0, &mut ConstRng(0)), Some((0, 1)));
    }

    #[test]
    fn test_engine_consumes_and_banks_refined_only() {
        let tuning = Tuning::default();
        let mut grid = grid(2, 1, "ur");
        let mut pool = ObjectPool::new(4);
        locked_with(&mut pool, ObjectKind::Fuel, 0, 0, 0.0);
        locked_with(&mut pool, ObjectKind::Asteroid, 1, 0, 0.0);

        let report = do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(0));
        assert!(pool.is_empty());
        assert_eq!(report.consumed, 2);
        assert_eq!(grid.cell(0, 0).engine.fuel, 1.0);
        assert_eq!(grid.cell(1, 0).engine.fuel, 0.0);
    }

    #[test]
    fn test_destroyed_tile_breaches() {
        let tuning = Tuning::default();
        let mut grid = grid(2, 1, "0.");
        let mut pool = ObjectPool::new(4);
        locked_with(&mut pool, ObjectKind::Asteroid, 0, 0, 0.0);
        let safe = locked_with(&mut pool, ObjectKind::Asteroid, 1, 0, 0.0);

        let report = do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(0));
        assert_eq!(report.breached, 1);
        assert_eq!(pool.len(), 1);
        assert!(pool.get(safe).is_some());
    }

    #[test]
    fn test_free_objects_are_ignored() {
        let tuning = Tuning::default();
        let mut grid = grid(1, 1, "0");
        let mut pool = ObjectPool::new(4);
        pool.spawn(Object::free(ObjectKind::Asteroid, glam::Vec2::ZERO, glam::Vec2::ZERO));
        do_factory(&mut grid, &mut pool, SIM_DT, &tuning, &mut ConstRng(0));
        assert_eq!(pool.len(), 1);
    }
}
