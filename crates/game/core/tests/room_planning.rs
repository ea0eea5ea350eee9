use content_core::{
    ContentSession, FloorId, MapColor, NewRoom, PcgStream, RegistryConfig, RoomAssignment,
    RoomCategoryId, RoomSlot, RoomStyle, TableKind, WeightedEntry,
};

fn weighted(handle: &'static str, weight: i64) -> WeightedEntry<&'static str> {
    WeightedEntry::new(handle, weight).unwrap()
}

fn new_room(name: &str, floors: Vec<FloorId>, min: u32, max: u32) -> NewRoom<&'static str> {
    NewRoom {
        name: name.to_owned(),
        builder_name: format!("{name}_builder"),
        builder: "builder",
        weight: 100,
        floors,
        only_halls: false,
        min_count: min,
        max_count: max,
        style: RoomStyle {
            door: Some("door"),
            ceilings: vec![weighted("tiles", 100), weighted("granite", 50)],
            walls: vec![weighted("bricks", 100)],
            floors: vec![weighted("carpet", 100), weighted("wood", 100)],
            lights: vec![weighted("lamp", 100)],
            map_color: MapColor(40, 90, 200),
            dark: false,
        },
    }
}

/// A(1..1, F1) and B(2..4, F1 F2).
fn session() -> (ContentSession<&'static str>, RoomCategoryId, RoomCategoryId) {
    let mut session = ContentSession::new(RegistryConfig::default());
    let registry = session.registry_mut();
    let a = registry
        .register_new_room(new_room("a", vec![FloorId::F1], 1, 1))
        .unwrap();
    let b = registry
        .register_new_room(new_room("b", vec![FloorId::F1, FloorId::F2], 2, 4))
        .unwrap();
    (session, a, b)
}

fn plan(seed: u64) -> (Vec<RoomSlot>, Vec<RoomAssignment<&'static str>>) {
    let (mut session, _, _) = session();
    let mut slots = vec![RoomSlot::unclaimed(false); 5];
    let mut rng = PcgStream::for_level(seed, FloorId::F1, 0);
    session.room_count(FloorId::F1, false, &mut rng);
    let assignments = session.assign_rooms(FloorId::F1, &mut slots, &mut rng);
    (slots, assignments)
}

#[test]
fn counts_follow_ranges_and_scope() {
    for seed in 0..50 {
        let (mut session, a, b) = session();
        let mut rng = PcgStream::new(seed);
        let total = session.room_count(FloorId::F1, false, &mut rng);
        assert!((3..=5).contains(&total), "seed {seed}: total {total}");

        let counts = session.planner().counts().unwrap().to_vec();
        assert_eq!(counts[0], 1);
        assert!((2..=4).contains(&counts[1]));

        let mut slots = vec![RoomSlot::unclaimed(false); 5];
        let assignments = session.assign_rooms(FloorId::F1, &mut slots, &mut rng);
        let claimed_a = slots.iter().filter(|slot| slot.category == a).count();
        let claimed_b = slots.iter().filter(|slot| slot.category == b).count();
        assert_eq!(claimed_a, 1);
        assert_eq!(claimed_b as u32, counts[1]);
        assert_eq!(assignments.len() as u32, total);
    }
}

#[test]
fn out_of_scope_rooms_count_zero() {
    let (mut session, _, _) = session();
    let mut rng = PcgStream::new(4);
    let total = session.room_count(FloorId::F2, false, &mut rng);
    let counts = session.planner().counts().unwrap();
    assert_eq!(counts[0], 0);
    assert_eq!(total, counts[1]);
    assert_eq!(session.room_count(FloorId::F3, false, &mut rng), 0);
}

#[test]
fn planning_is_deterministic_per_seed() {
    let (slots_a, first) = plan(1234);
    let (slots_b, second) = plan(1234);
    assert_eq!(slots_a, slots_b);
    assert_eq!(first, second);
}

#[test]
fn assignments_carry_room_style() {
    let (slots, assignments) = plan(77);
    for assignment in &assignments {
        assert_eq!(slots[assignment.slot].category, assignment.category);
        assert_eq!(assignment.door, Some("door"));
        assert_eq!(assignment.wall, Some("bricks"));
        assert_eq!(assignment.light, Some("lamp"));
        assert!(matches!(assignment.ceiling, Some("tiles" | "granite")));
        assert!(matches!(assignment.floor, Some("carpet" | "wood")));
        assert_eq!(assignment.builder, "builder");
        assert_eq!(assignment.map_color, MapColor(40, 90, 200));
    }
}

#[test]
fn too_few_slots_is_a_soft_cap() {
    let (mut session, _, _) = session();
    let mut slots = vec![RoomSlot::unclaimed(false); 2];
    let assignments = session.assign_rooms(FloorId::F1, &mut slots, &mut PcgStream::new(9));
    assert_eq!(assignments.len(), 2);
    assert!(slots.iter().all(|slot| !slot.is_unclaimed()));
}

#[test]
fn reset_forgets_counts_and_flags() {
    let (mut session, _, _) = session();
    session.room_count(FloorId::F1, true, &mut PcgStream::new(5));
    assert!(session.registry_mut().fetch(TableKind::Rooms, FloorId::F1).len() == 2);
    assert!(session.registry_mut().fetch(TableKind::Rooms, FloorId::F1).is_empty());

    session.reset_per_level_state();
    assert!(session.planner().counts().is_none());
    assert_eq!(session.registry_mut().fetch(TableKind::Rooms, FloorId::F1).len(), 2);
}

#[test]
fn duplicated_room_uses_its_own_range() {
    let (mut session, _, b) = session();
    session
        .registry_mut()
        .duplicate_room("b", &[FloorId::End], 6, 6)
        .unwrap();
    let total = session.room_count(FloorId::End, false, &mut PcgStream::new(2));
    assert_eq!(total, 6);
    assert_eq!(session.registry().rooms().rooms_for_category(b).count(), 2);
}
