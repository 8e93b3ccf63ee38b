//! Goals and the phase script
//!
//! A run is a list of timed phases. Free and construction phases simply run
//! out their clock. Goal phases want the ship inside a randomly placed box
//! before time is up; missing one tears holes in the hull. Too many misses
//! and the ship is lost.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::GridSpace;
use crate::tuning::Tuning;
use crate::{point_in_rect, rect_corners};

/// What a phase asks of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    None,
    ShipConstruct,
    ReachGoalPoint,
}

/// One scripted phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDef {
    pub prompt: String,
    /// Time budget in seconds
    pub seconds: f32,
    pub objective: Objective,
}

impl PhaseDef {
    pub fn new(prompt: impl Into<String>, seconds: f32, objective: Objective) -> Self {
        Self {
            prompt: prompt.into(),
            seconds,
            objective,
        }
    }
}

/// Target box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub min: Vec2,
    pub size: Vec2,
}

impl Goal {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Place a goal somewhere inside the margin-bounded region of the world
    pub fn random<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let lo = tuning.goal_margin;
        let hi = tuning.space_size - tuning.goal_margin - tuning.goal_size;
        let mut coord = || if hi > lo { rng.random_range(lo..hi) } else { lo.max(0.0) };
        let min = Vec2::new(coord(), coord());
        Self::new(min, Vec2::splat(tuning.goal_size))
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }
}

/// Does the ship box touch the goal?
///
/// Checks the goal's corners against the ship and the ship's corners against
/// the goal. A cross-shaped overlap with no corner inside either box is missed.
pub fn check_goal_satisfied(ship_min: Vec2, ship_size: Vec2, goal: &Goal) -> bool {
    rect_corners(goal.min, goal.size)
        .iter()
        .any(|&c| point_in_rect(c, ship_min, ship_size))
        || rect_corners(ship_min, ship_size)
            .iter()
            .any(|&c| point_in_rect(c, goal.min, goal.size))
}

/// How the run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Outcome {
    #[default]
    InProgress,
    /// Every phase completed
    Won,
    /// Damage exceeded the threshold
    Destroyed,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Moved on to phase `index`
    Advanced { index: usize },
    GoalReached,
    /// Goal timed out; `cells` tiles were destroyed
    GoalMissed { cells: u32 },
    Won,
    Destroyed,
}

/// Cursor over the phase script plus damage bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTracker {
    pub index: usize,
    /// Seconds spent in the current phase
    pub elapsed: f32,
    pub goal: Option<Goal>,
    pub damage_count: u32,
    /// Remaining seconds of the "damaged" flash
    pub damaged_timer: f32,
    pub outcome: Outcome,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the first phase
    pub fn start<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) {
        *self = Self::default();
        self.enter(tuning, rng);
    }

    pub fn current<'a>(&self, tuning: &'a Tuning) -> Option<&'a PhaseDef> {
        tuning.phases.get(self.index)
    }

    /// Seconds left in the current phase
    pub fn time_remaining(&self, tuning: &Tuning) -> f32 {
        self.current(tuning)
            .map(|p| (p.seconds - self.elapsed).max(0.0))
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn is_damaged(&self) -> bool {
        self.damaged_timer > 0.0
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome != Outcome::InProgress
    }

    /// Set up whatever the phase at `index` needs
    fn enter<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) -> Option<PhaseEvent> {
        self.elapsed = 0.0;
        self.goal = None;
        let Some(phase) = tuning.phases.get(self.index) else {
            self.outcome = Outcome::Won;
            log::info!("All {} phases complete", tuning.phases.len());
            return Some(PhaseEvent::Won);
        };
        if phase.objective == Objective::ReachGoalPoint {
            let goal = Goal::random(rng, tuning);
            log::info!("New goal at ({:.0}, {:.0})", goal.min.x, goal.min.y);
            self.goal = Some(goal);
        }
        log::info!("Phase {}: {}", self.index, phase.prompt);
        None
    }

    fn advance<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) -> PhaseEvent {
        self.index += 1;
        self.enter(tuning, rng)
            .unwrap_or(PhaseEvent::Advanced { index: self.index })
    }

    /// Developer skip: next phase, no success or failure effects
    pub fn skip<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) -> Option<PhaseEvent> {
        if self.is_finished() {
            return None;
        }
        log::info!("Skipping phase {}", self.index);
        Some(self.advance(tuning, rng))
    }

    /// Run the phase clock for one tick
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        ship_min: Vec2,
        ship_size: Vec2,
        grid: &mut GridSpace,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<PhaseEvent> {
        self.damaged_timer = (self.damaged_timer - dt).max(0.0);
        if self.is_finished() {
            return None;
        }
        let Some(phase) = tuning.phases.get(self.index) else {
            return self.enter(tuning, rng);
        };
        self.elapsed += dt;
        let timed_out = self.elapsed >= phase.seconds;

        match phase.objective {
            Objective::None | Objective::ShipConstruct => {
                timed_out.then(|| self.advance(tuning, rng))
            }
            Objective::ReachGoalPoint => {
                let reached = self
                    .goal
                    .is_some_and(|goal| check_goal_satisfied(ship_min, ship_size, &goal));
                if reached {
                    log::info!("Goal reached with {:.1}s to spare", phase.seconds - self.elapsed);
                    return match self.advance(tuning, rng) {
                        PhaseEvent::Won => Some(PhaseEvent::Won),
                        _ => Some(PhaseEvent::GoalReached),
                    };
                }
                if !timed_out {
                    return None;
                }

                let cells = grid.damage_ship(rng, tuning.damage_chance);
                self.damage_count += 1;
                self.damaged_timer = tuning.damaged_display_seconds;
                log::warn!(
                    "Goal missed: {} cells destroyed (damage {}/{})",
                    cells,
                    self.damage_count,
                    tuning.destroyed_threshold
                );
                if self.damage_count > tuning.destroyed_threshold {
                    self.outcome = Outcome::Destroyed;
                    log::warn!("Ship destroyed");
                    return Some(PhaseEvent::Destroyed);
                }
                match self.advance(tuning, rng) {
                    PhaseEvent::Won => Some(PhaseEvent::Won),
                    _ => Some(PhaseEvent::GoalMissed { cells }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ConstRng, seeded};

    fn script(phases: Vec<PhaseDef>) -> Tuning {
        Tuning {
            phases,
            ..Default::default()
        }
    }

    #[test]
    fn test_goal_overlap_by_corners() {
        let goal = Goal::new(Vec2::new(100.0, 100.0), Vec2::splat(50.0));
        // Ship corner inside goal
        assert!(check_goal_satisfied(Vec2::new(140.0, 140.0), Vec2::splat(20.0), &goal));
        // Goal inside a big ship
        assert!(check_goal_satisfied(Vec2::ZERO, Vec2::splat(400.0), &goal));
        // Apart
        assert!(!check_goal_satisfied(Vec2::new(200.0, 200.0), Vec2::splat(20.0), &goal));
        // Cross-shaped overlap: no corner of either box inside the other
        assert!(!check_goal_satisfied(Vec2::new(90.0, 110.0), Vec2::new(70.0, 10.0), &goal));
    }

    #[test]
    fn test_random_goal_respects_margin() {
        let tuning = Tuning::default();
        let mut rng = seeded(3);
        for _ in 0..100 {
            let goal = Goal::random(&mut rng, &tuning);
            assert!(goal.min.x >= tuning.goal_margin);
            assert!(goal.min.y + goal.size.y <= tuning.space_size - tuning.goal_margin);
        }
    }

    #[test]
    fn test_timed_phases_advance_then_win() {
        let tuning = script(vec![
            PhaseDef::new("a", 1.0, Objective::None),
            PhaseDef::new("b", 1.0, Objective::ShipConstruct),
        ]);
        let mut grid = GridSpace::new(2, 2);
        let mut tracker = PhaseTracker::new();
        let mut rng = seeded(1);
        tracker.start(&tuning, &mut rng);

        let mut events = Vec::new();
        for _ in 0..30 {
            if let Some(e) = tracker.update(0.1, Vec2::ZERO, Vec2::ONE, &mut grid, &tuning, &mut rng) {
                events.push(e);
            }
        }
        assert_eq!(events, vec![PhaseEvent::Advanced { index: 1 }, PhaseEvent::Won]);
        assert_eq!(tracker.outcome, Outcome::Won);
    }

    #[test]
    fn test_reaching_goal_advances_without_damage() {
        let tuning = script(vec![
            PhaseDef::new("go", 5.0, Objective::ReachGoalPoint),
            PhaseDef::new("rest", 5.0, Objective::None),
        ]);
        let mut grid = GridSpace::new(2, 2);
        let mut tracker = PhaseTracker::new();
        let mut rng = seeded(1);
        tracker.start(&tuning, &mut rng);
        let goal = tracker.goal.expect("goal phase places a goal");

        let event = tracker.update(0.1, goal.center(), Vec2::ONE, &mut grid, &tuning, &mut rng);
        assert_eq!(event, Some(PhaseEvent::GoalReached));
        assert_eq!(tracker.index, 1);
        assert_eq!(tracker.damage_count, 0);
        assert!(tracker.goal.is_none());
    }

    #[test]
    fn test_missed_goal_damages_once() {
        let tuning = script(vec![
            PhaseDef::new("go", 5.0, Objective::ReachGoalPoint),
            PhaseDef::new("rest", 100.0, Objective::None),
        ]);
        let mut grid = GridSpace::new(4, 4);
        grid.set_from_str("################", 0.0);
        let mut tracker = PhaseTracker::new();
        tracker.start(&tuning, &mut ConstRng(0));
        tracker.goal = Some(Goal::new(Vec2::splat(3000.0), Vec2::splat(10.0)));

        let mut misses = 0;
        for _ in 0..600 {
            if let Some(PhaseEvent::GoalMissed { cells }) =
                tracker.update(1.0 / 60.0, Vec2::ZERO, Vec2::ONE, &mut grid, &tuning, &mut ConstRng(0))
            {
                misses += 1;
                assert_eq!(cells, 16);
            }
        }
        assert_eq!(misses, 1);
        assert_eq!(tracker.damage_count, 1);
        assert_eq!(tracker.index, 1);
        assert_eq!(tracker.outcome, Outcome::InProgress);
    }

    #[test]
    fn test_damaged_flag_expires() {
        let tuning = script(vec![
            PhaseDef::new("go", 0.5, Objective::ReachGoalPoint),
            PhaseDef::new("rest", 100.0, Objective::None),
        ]);
        let mut grid = GridSpace::new(1, 1);
        let mut tracker = PhaseTracker::new();
        let mut rng = ConstRng(u64::MAX);
        tracker.start(&tuning, &mut rng);
        tracker.goal = Some(Goal::new(Vec2::splat(3000.0), Vec2::splat(10.0)));

        for _ in 0..6 {
            tracker.update(0.1, Vec2::ZERO, Vec2::ONE, &mut grid, &tuning, &mut rng);
        }
        assert!(tracker.is_damaged());
        for _ in 0..40 {
            tracker.update(0.1, Vec2::ZERO, Vec2::ONE, &mut grid, &tuning, &mut rng);
        }
        assert!(!tracker.is_damaged());
    }

    #[test]
    fn test_too_much_damage_destroys() {
        let phases = (0..5)
            .map(|_| PhaseDef::new("go", 1.0, Objective::ReachGoalPoint))
            .collect();
        let tuning = Tuning {
            destroyed_threshold: 2,
            goal_margin: 0.0,
            goal_size: 1.0,
            ..script(phases)
        };
        let mut grid = GridSpace::new(1, 1);
        let mut tracker = PhaseTracker::new();
        let mut rng = ConstRng(u64::MAX);
        tracker.start(&tuning, &mut rng);

        let mut last = None;
        // Ship box far from any goal the max-valued source can place
        let ship = Vec2::splat(-500.0);
        for _ in 0..100 {
            if let Some(e) = tracker.update(0.1, ship, Vec2::ONE, &mut grid, &tuning, &mut rng) {
                last = Some(e);
            }
        }
        assert_eq!(last, Some(PhaseEvent::Destroyed));
        assert_eq!(tracker.damage_count, 3);
        assert!(tracker.is_finished());

        // Terminal: nothing moves any more
        let index = tracker.index;
        tracker.skip(&tuning, &mut rng);
        assert_eq!(tracker.index, index);
    }

    #[test]
    fn test_skip_has_no_side_effects() {
        let tuning = script(vec![
            PhaseDef::new("go", 5.0, Objective::ReachGoalPoint),
            PhaseDef::new("rest", 5.0, Objective::None),
        ]);
        let mut tracker = PhaseTracker::new();
        let mut rng = seeded(9);
        tracker.start(&tuning, &mut rng);
        assert_eq!(tracker.skip(&tuning, &mut rng), Some(PhaseEvent::Advanced { index: 1 }));
        assert_eq!(tracker.damage_count, 0);
        assert_eq!(tracker.skip(&tuning, &mut rng), Some(PhaseEvent::Won));
    }
}
