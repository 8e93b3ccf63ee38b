//! Drifting objects and the pool that owns them
//!
//! An object is either flying free under physics or locked onto a ship tile.
//! Locked objects have no body; their world position is always derived from
//! the tile and the ship origin.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use super::body::RigidBody;
use crate::tuning::Tuning;

new_key_type! {
    /// Handle to an object in the session pool
    pub struct ObjectId;
}

/// What an object is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw asteroid (`a`)
    Asteroid,
    /// Refined fuel (`g`)
    Fuel,
}

impl ObjectKind {
    pub fn glyph(self) -> char {
        match self {
            ObjectKind::Asteroid => 'a',
            ObjectKind::Fuel => 'g',
        }
    }
}

/// Free flight or grid lock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectState {
    FreeFlying {
        body: RigidBody,
    },
    GridLocked {
        tile_x: u8,
        tile_y: u8,
        /// Progress toward the next tile
        transition: f32,
    },
}

/// A movable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub kind: ObjectKind,
    pub state: ObjectState,
}

impl Object {
    pub fn free(kind: ObjectKind, position: Vec2, velocity: Vec2) -> Self {
        Self {
            kind,
            state: ObjectState::FreeFlying {
                body: RigidBody::new(position, velocity),
            },
        }
    }

    pub fn locked(kind: ObjectKind, tile_x: u8, tile_y: u8) -> Self {
        Self {
            kind,
            state: ObjectState::GridLocked {
                tile_x,
                tile_y,
                transition: 0.0,
            },
        }
    }

    #[inline]
    pub fn in_factory(&self) -> bool {
        matches!(self.state, ObjectState::GridLocked { .. })
    }

    /// Tile coordinates when locked
    pub fn tile(&self) -> Option<(u8, u8)> {
        match self.state {
            ObjectState::GridLocked { tile_x, tile_y, .. } => Some((tile_x, tile_y)),
            ObjectState::FreeFlying { .. } => None,
        }
    }

    /// Body when free
    pub fn body(&self) -> Option<&RigidBody> {
        match &self.state {
            ObjectState::FreeFlying { body } => Some(body),
            ObjectState::GridLocked { .. } => None,
        }
    }

    /// Lock onto a ship tile, dropping the body
    pub fn capture(&mut self, tile_x: u8, tile_y: u8) {
        self.state = ObjectState::GridLocked {
            tile_x,
            tile_y,
            transition: 0.0,
        };
    }

    /// World position: the body for free objects, `tile * tile_size + ship` for locked ones
    pub fn world_position(&self, ship_position: Vec2, tile_size: f32) -> Vec2 {
        match self.state {
            ObjectState::FreeFlying { body } => body.position,
            ObjectState::GridLocked { tile_x, tile_y, .. } => {
                Vec2::new(tile_x as f32, tile_y as f32) * tile_size + ship_position
            }
        }
    }
}

/// Fixed-capacity arena of objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPool {
    objects: SlotMap<ObjectId, Object>,
    capacity: usize,
}

impl ObjectPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            objects: SlotMap::with_capacity_and_key(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add an object; `None` once the pool is full
    pub fn spawn(&mut self, object: Object) -> Option<ObjectId> {
        if self.objects.len() >= self.capacity {
            log::warn!("Object pool full ({}), dropping spawn", self.capacity);
            return None;
        }
        Some(self.objects.insert(object))
    }

    /// Remove an object, freeing its slot
    pub fn destroy(&mut self, id: ObjectId) -> Option<Object> {
        self.objects.remove(id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    /// Iterate in slot order (stable for a given spawn/destroy history)
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut Object)> {
        self.objects.iter_mut()
    }

    /// Number of objects locked into the factory
    pub fn in_factory_count(&self) -> usize {
        self.objects.values().filter(|o| o.in_factory()).count()
    }

    /// Objects locked on a given tile
    pub fn grid_locked_at(&self, x: u8, y: u8) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .filter(move |(_, o)| o.tile() == Some((x, y)))
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

/// Scatter the opening asteroid field across the world
pub fn spawn_field<R: Rng>(pool: &mut ObjectPool, rng: &mut R, tuning: &Tuning) -> usize {
    let mut spawned = 0;
    let max_v = tuning.object_max_speed;
    for _ in 0..tuning.object_count {
        let position = Vec2::new(
            rng.random_range(0.0..tuning.space_size),
            rng.random_range(0.0..tuning.space_size),
        );
        let velocity = if max_v > 0.0 {
            Vec2::new(rng.random_range(-max_v..max_v), rng.random_range(-max_v..max_v))
        } else {
            Vec2::ZERO
        };
        let kind = if rng.random::<f32>() < tuning.fuel_spawn_ratio {
            ObjectKind::Fuel
        } else {
            ObjectKind::Asteroid
        };
        if pool.spawn(Object::free(kind, position, velocity)).is_none() {
            break;
        }
        spawned += 1;
    }
    log::debug!("Spawned {} objects", spawned);
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;

    #[test]
    fn test_pool_respects_capacity() {
        let mut pool = ObjectPool::new(2);
        let a = pool.spawn(Object::free(ObjectKind::Asteroid, Vec2::ZERO, Vec2::ZERO));
        let b = pool.spawn(Object::locked(ObjectKind::Fuel, 1, 1));
        assert!(a.is_some() && b.is_some());
        assert!(pool.spawn(Object::locked(ObjectKind::Fuel, 0, 0)).is_none());

        pool.destroy(a.unwrap());
        assert!(pool.get(a.unwrap()).is_none());
        assert!(pool.spawn(Object::locked(ObjectKind::Fuel, 0, 0)).is_some());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_world_position_of_locked_object() {
        let object = Object::locked(ObjectKind::Asteroid, 2, 3);
        let pos = object.world_position(Vec2::new(100.0, 200.0), 32.0);
        assert_eq!(pos, Vec2::new(164.0, 296.0));
        assert!(object.body().is_none());
    }

    #[test]
    fn test_capture_drops_body() {
        let mut object = Object::free(ObjectKind::Asteroid, Vec2::ONE, Vec2::new(5.0, 5.0));
        assert!(!object.in_factory());
        object.capture(0, 4);
        assert_eq!(object.tile(), Some((0, 4)));
        assert!(object.in_factory());
    }

    #[test]
    fn test_spawn_field_stays_in_world() {
        let tuning = Tuning {
            object_count: 50,
            ..Default::default()
        };
        let mut pool = ObjectPool::new(tuning.max_objects);
        let spawned = spawn_field(&mut pool, &mut seeded(7), &tuning);
        assert_eq!(spawned, 50);
        for (_, object) in pool.iter() {
            let body = object.body().expect("spawned free");
            assert!(body.position.x >= 0.0 && body.position.x < tuning.space_size);
            assert!(body.velocity.y.abs() <= tuning.object_max_speed);
        }
    }

    #[test]
    fn test_grid_locked_at() {
        let mut pool = ObjectPool::new(8);
        pool.spawn(Object::locked(ObjectKind::Asteroid, 1, 0));
        pool.spawn(Object::locked(ObjectKind::Fuel, 1, 0));
        pool.spawn(Object::locked(ObjectKind::Fuel, 2, 0));
        assert_eq!(pool.grid_locked_at(1, 0).count(), 2);
        assert_eq!(pool.in_factory_count(), 3);
    }
}
