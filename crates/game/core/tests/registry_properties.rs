use content_core::{
    ContentRegistry, ContentSession, FloorId, LookupError, NpcTraits, PcgStream,
    RegistrationError, RegistryConfig, RoomCategoryId, SelectionError, TableKind, WeightedEntry,
    WeightedSampler,
};

fn session() -> ContentSession<&'static str> {
    ContentSession::new(RegistryConfig::default())
}

#[test]
fn non_positive_weights_are_rejected_without_growth() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    for (name, weight) in [("zero", 0), ("negative", -10)] {
        assert_eq!(
            registry.register_event(name, name, weight, &[FloorId::F1]),
            Err(RegistrationError::InvalidWeight { weight })
        );
    }
    assert!(registry.events().is_empty());
    assert!(!registry.has_entry(TableKind::Events, "zero"));
}

#[test]
fn empty_or_sentinel_scope_is_rejected() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    assert_eq!(
        registry.register_npc("ghost", "ghost", 10, &[], NpcTraits::default()),
        Err(RegistrationError::EmptyFloorScope)
    );
    assert_eq!(
        registry.register_npc(
            "ghost",
            "ghost",
            10,
            &[FloorId::from_name("basement")],
            NpcTraits::default()
        ),
        Err(RegistrationError::EmptyFloorScope)
    );
    assert!(registry.characters().is_empty());
}

#[test]
fn npc_is_served_once_per_floor_until_reset() {
    let mut session = session();
    session
        .registry_mut()
        .register_npc("pomp", "pomp", 50, &[FloorId::F1, FloorId::F2], NpcTraits::default())
        .unwrap();

    let registry = session.registry_mut();
    let first = registry.fetch(TableKind::Characters, FloorId::F1);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].handle, "pomp");
    assert_eq!(first[0].weight(), 50);
    assert!(registry.fetch(TableKind::Characters, FloorId::F1).is_empty());
    assert_eq!(registry.fetch(TableKind::Characters, FloorId::F2).len(), 1);
    assert!(registry.fetch(TableKind::Characters, FloorId::F3).is_empty());
    assert!(registry.fetch(TableKind::Characters, FloorId::End).is_empty());
    assert_eq!(registry.characters().double_fetch_count(FloorId::F1), 1);

    session.reset_per_level_state();
    assert_eq!(
        session
            .registry_mut()
            .fetch(TableKind::Characters, FloorId::F1)
            .len(),
        1
    );
}

#[test]
fn tables_keep_independent_flags() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    registry.register_event("party", "party", 100, &[FloorId::F2]).unwrap();
    registry
        .register_npc("pomp", "pomp", 50, &[FloorId::F2], NpcTraits::default())
        .unwrap();

    assert_eq!(registry.fetch(TableKind::Events, FloorId::F2).len(), 1);
    assert!(!registry.characters().is_accessed(FloorId::F2));
    assert_eq!(registry.fetch(TableKind::Characters, FloorId::F2).len(), 1);
}

#[test]
fn replacements_ignore_access_flags() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    registry
        .register_npc(
            "substitute",
            "substitute",
            40,
            &[FloorId::F3],
            NpcTraits {
                replaces: vec!["principal".into()],
                is_static: false,
            },
        )
        .unwrap();

    assert!(registry.fetch(TableKind::Characters, FloorId::F3).is_empty());
    assert!(registry.characters().is_accessed(FloorId::F3));
    assert_eq!(registry.fetch_replacements(FloorId::F3).len(), 1);
    assert_eq!(registry.fetch_replacements(FloorId::F3).len(), 1);
    assert!(registry.fetch_replacements(FloorId::F1).is_empty());
}

#[test]
fn duplicate_name_keeps_first_handle() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    registry.register_event("flood", "flood_v1", 100, &[FloorId::F1]).unwrap();
    assert_eq!(
        registry.register_event("flood", "flood_v2", 100, &[FloorId::F1]),
        Err(RegistrationError::DuplicateName("flood".into()))
    );
    assert_eq!(registry.get_entry(TableKind::Events, "flood"), Ok(&"flood_v1"));
    assert_eq!(registry.events().len(), 1);
}

#[test]
fn sentinel_fetch_is_empty_and_harmless() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    registry.register_event("flood", "flood", 100, &FloorId::ALL).unwrap();
    assert!(registry.fetch(TableKind::Events, FloorId::None).is_empty());
    for floor in FloorId::ALL {
        assert!(!registry.events().is_accessed(floor));
    }
}

#[test]
fn weighted_selection_converges_to_weights() {
    let entries = vec![
        WeightedEntry::new('a', 1).unwrap(),
        WeightedEntry::new('b', 3).unwrap(),
    ];
    let mut rng = PcgStream::new(0x5eed);
    let draws = 10_000;
    let mut counts = [0u32; 2];
    for _ in 0..draws {
        counts[WeightedSampler::select_index(&entries, &mut rng).unwrap()] += 1;
    }

    let expected = [draws as f64 * 0.25, draws as f64 * 0.75];
    let chi_square: f64 = counts
        .iter()
        .zip(expected)
        .map(|(&observed, expected)| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // p = 0.001 critical value, one degree of freedom.
    assert!(chi_square < 10.83, "chi-square {chi_square}, counts {counts:?}");
}

#[test]
fn empty_selection_reports_error() {
    let empty: Vec<WeightedEntry<&str>> = Vec::new();
    assert_eq!(
        WeightedSampler::controlled(&empty, &mut PcgStream::new(1)),
        Err(SelectionError::EmptySelectionSet)
    );
    let registry: ContentRegistry<&str> = ContentRegistry::new();
    assert_eq!(registry.random_item(), Err(SelectionError::EmptySelectionSet));
}

#[test]
fn missing_names_are_not_found_in_every_table() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    registry.register_event("flood", "flood", 100, &[FloorId::F1]).unwrap();
    for table in [
        TableKind::Characters,
        TableKind::Items,
        TableKind::Events,
        TableKind::Textures,
        TableKind::Rooms,
    ] {
        assert_eq!(
            registry.get_entry(table, "attic"),
            Err(LookupError::NotFound("attic".into())),
            "{table:?}"
        );
        assert!(!registry.has_entry(table, "attic"));
    }
}

#[test]
fn built_in_category_without_builders_is_not_found() {
    let mut registry: ContentRegistry<&str> = ContentRegistry::new();
    assert_eq!(
        registry.get_entry(TableKind::Rooms, "class"),
        Err(LookupError::NotFound("class".into()))
    );

    registry
        .register_room_builder("desk_rows", "desk_rows", 100, &[RoomCategoryId::CLASS], &[FloorId::F1])
        .unwrap();
    assert_eq!(registry.get_entry(TableKind::Rooms, "class"), Ok(&"desk_rows"));
}

#[test]
fn silenced_double_fetch_still_blocks_and_counts() {
    let mut session: ContentSession<&str> = ContentSession::new(RegistryConfig {
        warn_on_double_fetch: false,
        ..RegistryConfig::default()
    });
    let registry = session.registry_mut();
    registry.register_event("flood", "flood", 100, &[FloorId::F1]).unwrap();
    assert!(!registry.events().double_fetch_warning());
    assert!(!registry.rooms().double_fetch_warning());

    assert_eq!(registry.fetch(TableKind::Events, FloorId::F1).len(), 1);
    assert!(registry.fetch(TableKind::Events, FloorId::F1).is_empty());
    assert_eq!(registry.events().double_fetch_count(FloorId::F1), 1);
}

#[test]
fn repeated_room_fetch_is_counted() {
    let mut session = session();
    session
        .registry_mut()
        .register_room_builder("desk_rows", "desk_rows", 100, &[RoomCategoryId::CLASS], &[FloorId::F1])
        .unwrap();
    let registry = session.registry_mut();

    assert_eq!(registry.fetch(TableKind::Rooms, FloorId::F1).len(), 1);
    assert!(registry.fetch(TableKind::Rooms, FloorId::F1).is_empty());
    assert_eq!(registry.rooms().double_fetch_count(FloorId::F1), 1);
    assert_eq!(registry.rooms().double_fetch_count(FloorId::F2), 0);
}
