// Copyright 2025 stoa contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::component::Component;
use super::world::World;

// --- DUMMY COMPONENTS FOR TESTING ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position(i32);
impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Velocity(i32);
impl Component for Velocity {}

// --- TESTS ---

#[test]
fn test_spawn_and_insert_round_trip() {
    // --- 1. SETUP ---
    let mut world = World::new();

    // --- 2. ACTION ---
    let entity = world.spawn();
    let stored = world.insert(entity, Position(10));

    // --- 3. ASSERTIONS ---
    assert!(stored, "Insert on a live entity should succeed");
    assert_eq!(entity.index, 0, "The first entity should have index 0");
    assert_eq!(entity.generation, 0);
    assert!(world.is_alive(entity));
    assert_eq!(world.get::<Position>(entity), Some(&Position(10)));
    assert!(world.has::<Position>(entity));
    assert!(!world.has::<Velocity>(entity));
    assert_eq!(world.entity_count(), 1);
    assert_eq!(world.component_count::<Position>(), 1);
}

#[test]
fn test_insert_replaces_existing_value() {
    let mut world = World::new();
    let entity = world.spawn();
    world.insert(entity, Position(1));

    world.insert(entity, Position(2));

    assert_eq!(world.get::<Position>(entity), Some(&Position(2)));
    assert_eq!(
        world.component_count::<Position>(),
        1,
        "Replacing must not grow the column"
    );
}

#[test]
fn test_get_mut_mutates_in_place() {
    let mut world = World::new();
    let entity = world.spawn();
    world.insert(entity, Position(5));

    if let Some(position) = world.get_mut::<Position>(entity) {
        position.0 += 10;
    }

    assert_eq!(world.get::<Position>(entity), Some(&Position(15)));
}

#[test]
fn test_remove_returns_the_stored_value() {
    let mut world = World::new();
    let entity = world.spawn();
    world.insert(entity, Position(7));

    let removed = world.remove::<Position>(entity);

    assert_eq!(removed, Some(Position(7)));
    assert!(!world.has::<Position>(entity));
    assert!(
        world.is_alive(entity),
        "Removing a component must not despawn the entity"
    );
    assert_eq!(world.remove::<Position>(entity), None);
}

#[test]
fn test_despawn_removes_all_components_atomically() {
    // --- 1. SETUP ---
    let mut world = World::new();
    let entity = world.spawn();
    world.insert(entity, Position(1));
    world.insert(entity, Velocity(2));

    // --- 2. ACTION ---
    let despawned = world.despawn(entity);

    // --- 3. ASSERTIONS ---
    // Every column lets go of the entity in the same call; there is no
    // state where one component is gone and the other still resolves.
    assert!(despawned);
    assert!(!world.is_alive(entity));
    assert!(!world.has::<Position>(entity));
    assert!(!world.has::<Velocity>(entity));
    assert_eq!(world.component_count::<Position>(), 0);
    assert_eq!(world.component_count::<Velocity>(), 0);
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn test_entity_id_recycling_and_aba_protection() {
    // --- 1. SETUP ---
    let mut world = World::new();
    let stale = world.spawn();
    world.insert(stale, Position(1));
    world.despawn(stale);

    // --- 2. ACTION ---
    // The freed slot is recycled with a bumped generation.
    let fresh = world.spawn();
    world.insert(fresh, Position(99));

    // --- 3. ASSERTIONS ---
    assert_eq!(fresh.index, stale.index, "The slot index should be reused");
    assert_eq!(fresh.generation, stale.generation + 1);

    // The stale id must not reach the recycled slot's new occupant.
    assert!(!world.is_alive(stale));
    assert_eq!(world.get::<Position>(stale), None);
    assert!(!world.insert(stale, Position(123)));
    assert!(!world.despawn(stale));
    assert_eq!(
        world.get::<Position>(fresh),
        Some(&Position(99)),
        "The new occupant must be untouched by stale-id traffic"
    );
}

#[test]
fn test_swap_remove_keeps_remaining_lookups_intact() {
    // --- 1. SETUP ---
    // Three rows in the Position column; removing the middle one swaps the
    // last row into its place.
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    let c = world.spawn();
    world.insert(a, Position(1));
    world.insert(b, Position(2));
    world.insert(c, Position(3));

    // --- 2. ACTION ---
    world.despawn(b);

    // --- 3. ASSERTIONS ---
    assert_eq!(world.get::<Position>(a), Some(&Position(1)));
    assert_eq!(
        world.get::<Position>(c),
        Some(&Position(3)),
        "The row moved by swap_remove must still resolve through its id"
    );
    assert_eq!(world.component_count::<Position>(), 2);
}

#[test]
fn test_entities_with_snapshots_current_membership() {
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    let c = world.spawn();
    world.insert(a, Position(1));
    world.insert(b, Velocity(2));
    world.insert(c, Position(3));

    let with_position = world.entities_with::<Position>();

    assert_eq!(with_position, vec![a, c]);
    assert_eq!(world.entities_with::<Velocity>(), vec![b]);

    // The snapshot is owned; later world changes do not affect it.
    world.despawn(a);
    assert_eq!(with_position.len(), 2);
    assert_eq!(world.entities_with::<Position>(), vec![c]);
}

#[test]
fn test_entities_with_unknown_component_is_empty() {
    let world = World::new();
    assert!(world.entities_with::<Position>().is_empty());
    assert_eq!(world.component_count::<Position>(), 0);
}

#[test]
fn test_clear_resets_everything() {
    let mut world = World::new();
    let entity = world.spawn();
    world.insert(entity, Position(1));
    world.insert(entity, Velocity(2));

    world.clear();

    assert_eq!(world.entity_count(), 0);
    assert!(!world.is_alive(entity));
    assert_eq!(world.component_count::<Position>(), 0);

    // Indices restart from zero after a clear.
    let reborn = world.spawn();
    assert_eq!(reborn.index, 0);
    assert_eq!(reborn.generation, 0);
}
