use std::fs;

use content_core::{FloorId, PcgStream, PosterBoard, RoomKind, RoomSlot, Surface, TableKind};
use content_loaders::{AssetKey, ContentFactory};
use tempfile::TempDir;

const MANIFEST: &str = r#"(
    npcs: [
        (name: "pomp", asset: "npc/pomp", weight: 50, floors: ["F1", "F2"]),
        (name: "substitute", asset: "npc/substitute", floors: ["F3"], replaces: ["principal"]),
        (name: "clock", asset: "npc/clock", floors: ["F3"], is_static: true),
        (name: "ghost", asset: "npc/ghost", floors: ["attic"]),
    ],
    items: [
        (
            name: "gps",
            asset: "items/gps",
            weight: 20,
            floors: ["F2", "END"],
            shop: Some((weight: 245, floors: ["F2", "F3"])),
            party: true,
            field_trip: true,
        ),
        (name: "broken", asset: "items/broken", weight: 0, floors: ["F1"]),
    ],
    events: [
        (name: "flood", asset: "events/flood", floors: ["F2"]),
    ],
    textures: [
        (name: "carpet", asset: "tex/carpet", floors: ["F1", "F2", "F3", "END"], surfaces: [floor], classrooms: true, rooms_only: true),
        (name: "granite", asset: "tex/granite", floors: ["F2", "F3", "END"], surfaces: [ceiling]),
    ],
    rooms: [
        (
            name: "bathroom",
            builder: "bathroom_builder",
            asset: "rooms/bathroom",
            floors: ["F1"],
            min_count: 1,
            max_count: 2,
            door: Some("doors/bathroom"),
            walls: [(asset: "tex/tiles")],
            lights: [(asset: "lights/fluorescent")],
            map_color: (30, 140, 200),
        ),
    ],
    room_builders: [
        (name: "desks", asset: "builders/desks", weight: 40, categories: ["class", "faculty"], floors: ["F1"]),
        (name: "nowhere", asset: "builders/nowhere", categories: ["attic"], floors: ["F1"]),
    ],
    room_additions: [
        (room: "bathroom", name: "stalls", asset: "rooms/stalls", weight: 50),
    ],
    room_copies: [
        (room: "bathroom", floors: ["END"], min_count: 2, max_count: 2),
    ],
    hall_builders: [
        (name: "lockers", asset: "halls/lockers", chance: 35),
    ],
    object_builders: [
        (name: "bells", asset: "objects/bells", floors: ["F1", "F2", "F3", "END"]),
        (name: "vents", asset: "objects/vents", weight: Some(85), floors: ["F2"]),
    ],
    decorators: [
        (name: "wall_clocks", asset: "decorators/clocks", categories: ["class", "office"]),
        (name: "bad_decorator", asset: "decorators/bad", categories: ["bathroom"]),
    ],
    decorations: [
        (name: "sink", asset: "decor/sink", weight: 1, categories: ["bathroom"], independent: true),
    ],
    posters: [
        (name: "cookie", asset: "posters/cookie", board: hallway),
    ],
)"#;

fn data_dir(config: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("content.ron"), MANIFEST).unwrap();
    if let Some(config) = config {
        fs::write(temp_dir.path().join("config.toml"), config).unwrap();
    }
    temp_dir
}

#[test]
fn manifest_registers_and_reports_rejections() {
    let temp = data_dir(None);
    let (session, report) = ContentFactory::new(temp.path()).build_session().unwrap();

    let mut rejected: Vec<_> = report
        .rejected
        .iter()
        .map(|rejection| (rejection.section, rejection.name.as_str()))
        .collect();
    rejected.sort();
    assert_eq!(
        rejected,
        vec![
            ("decorators", "bad_decorator"),
            ("items", "broken"),
            ("npcs", "ghost"),
            ("room_builders", "nowhere"),
        ]
    );
    assert_eq!(report.accepted, 17);

    let registry = session.registry();
    assert!(registry.has_entry(TableKind::Characters, "pomp"));
    assert!(registry.has_entry(TableKind::Rooms, "bathroom"));
    assert!(registry.is_npc_static("clock"));
    assert_eq!(
        registry.get_entry(TableKind::Rooms, "bathroom"),
        Ok(&AssetKey::new("rooms/bathroom"))
    );
}

#[test]
fn registered_content_serves_per_floor() {
    let temp = data_dir(None);
    let (mut session, _) = ContentFactory::new(temp.path()).build_session().unwrap();
    let registry = session.registry_mut();

    let npcs = registry.fetch(TableKind::Characters, FloorId::F3);
    assert_eq!(npcs.len(), 1);
    assert_eq!(npcs[0].handle, "npc/clock");
    assert_eq!(registry.fetch_replacements(FloorId::F3)[0].handle, "npc/substitute");

    let shop = registry.fetch_shop_items(FloorId::F3);
    assert_eq!(shop[0].weight(), 245);
    assert_eq!(registry.party_items().len(), 1);
    assert_eq!(registry.field_trip_items().len(), 1);

    assert_eq!(
        registry.school_textures(FloorId::F1, Surface::Floor, Some(RoomKind::Classroom)).len(),
        1
    );
    assert!(registry.school_textures(FloorId::F1, Surface::Ceiling, None).is_empty());

    let class = registry.room_category("class").unwrap();
    assert_eq!(registry.rooms().new_room_builders(class).len(), 1);
    assert_eq!(registry.builders().standard_hall_builders()[0].chance(), 35);
    assert_eq!(registry.builders().forced_object_builders(FloorId::F2).len(), 1);
    assert_eq!(registry.builders().decorators_for(class).len(), 1);
    assert_eq!(registry.decor().posters(PosterBoard::Hallway).len(), 1);

    let bathroom = registry.room_category("bathroom").unwrap();
    assert_eq!(
        registry.decor().find_decoration(bathroom, true, "SINK"),
        Some(AssetKey::new("decor/sink"))
    );
}

#[test]
fn rooms_plan_from_manifest() {
    let temp = data_dir(Some("mystery_room_bonus = 2\n"));
    let (mut session, _) = ContentFactory::new(temp.path()).build_session().unwrap();
    assert_eq!(session.config().mystery_room_bonus, 2);

    let mut rng = PcgStream::for_level(99, FloorId::End, 0);
    assert_eq!(session.room_count(FloorId::End, true, &mut rng), 4);

    let mut slots = vec![RoomSlot::unclaimed(false); 3];
    let placed = session.assign_rooms(FloorId::End, &mut slots, &mut rng);
    assert_eq!(placed.len(), 2);
    for room in &placed {
        assert_eq!(room.door, Some(AssetKey::new("doors/bathroom")));
        assert_eq!(room.wall, Some(AssetKey::new("tex/tiles")));
        assert!(room.builder == "rooms/bathroom" || room.builder == "rooms/stalls");
    }
}

#[test]
fn missing_manifest_is_an_error() {
    let temp = TempDir::new().unwrap();
    let factory = ContentFactory::new(temp.path());
    assert!(factory.load_config().is_ok());
    assert!(factory.load_manifest().is_err());
}
