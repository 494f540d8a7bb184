use stagemap::*;
use vegetables::*;

#[test]
fn it_should_keep_key_and_group_registries_in_agreement() {
    let tomato = Tomato::new("t1", 10);
    let meta = tomato.actions();

    for group in meta.groups() {
        for key in meta.keys_in(group) {
            match key {
                ActionKey::Named(key) => {
                    assert!(
                        meta.groups_of(key).unwrap().contains(&group),
                        "key '{key}' indexed under group '{group}' it does not record"
                    );
                }
                ActionKey::Wildcard => assert!(meta.has_wildcard(group.name())),
            }
        }
    }
    for key in ["ripe", "rotten", "diced"] {
        for group in meta.groups_of(key).unwrap() {
            assert!(meta.keys_in(*group).contains(&ActionKey::Named(key)));
        }
    }
}

#[test]
fn it_should_let_derived_declarations_override_inherited_keys_wholesale() {
    let tomato = Tomato::new("t1", 10);

    // the base Vegetable block put `ripe` in `freshness`; Tomato re-declares
    // it under `aging` only, so the base group is dropped with the handler
    assert_eq!(tomato.actions().groups_of("ripe").unwrap(), [Group::Named("aging")]);
    assert!(tomato.actions().keys_in(Group::Named("freshness")).is_empty());

    let data = tomato.collate("ripe", None).data().unwrap();
    assert!(data.get("fresh").is_none());
    assert!(data.get("age").is_some());

    // the un-overridden base behavior is still what plain vegetables do
    let vegetable = Vegetable::new("carrot", "orange");
    assert_eq!(vegetable.actions().groups_of("ripe").unwrap(), [Group::Named("freshness")]);
    let data = vegetable.collate("ripe", None).data().unwrap();
    assert_eq!(data.get("fresh").unwrap(), true);
}

#[test]
fn it_should_gate_wildcard_dispatch_behind_an_explicit_group() {
    let tomato = Tomato::new("t1", 10);

    // no group context: unregistered keys never fall through to `cut`
    assert_eq!(tomato.collate("slice", None), Collation::UnknownKey);

    // naming the group opts in, and the handler receives the key
    let sliced = tomato.collate("slice", Some("cut")).data().unwrap();
    assert!(sliced.get("pieces").is_some());

    // a named group without a wildcard handler is still a miss
    assert_eq!(tomato.collate("slice", Some("aging")), Collation::NoWildcard);

    // the base wildcard was overridden, not merged: vegetables cut nothing
    let vegetable = Vegetable::new("carrot", "orange");
    assert_eq!(vegetable.collate("slice", Some("cut")), Collation::Empty);
}

#[test]
fn it_should_stage_four_rows_for_a_collected_tomato() {
    let mut mapper = vegetable_mapper();
    let tomato = Tomato::new("t1", 10);

    let receipts = mapper.collect(&tomato, &["ripe", "diced"]);
    let inserts = mapper.collector_mut().collect_inserts(Some(&receipts));

    assert_eq!(inserts.row_count(), 4);
    assert_eq!(inserts.get("vegetable").unwrap()[0], row! { "name": "t1", "color": "red" });
    assert_eq!(inserts.get("tomato").unwrap()[0], row! { "name": "t1", "radius": 10 });

    let aging = &inserts.get("tomato_aging_states").unwrap()[0];
    assert_eq!(aging.get("name").unwrap(), "t1");
    assert_eq!(aging.get("state").unwrap(), "ripe");
    assert!(aging.get("age").is_some());

    let cooking = &inserts.get("tomato_cooking_states").unwrap()[0];
    assert_eq!(cooking.get("name").unwrap(), "t1");
    assert_eq!(cooking.get("state").unwrap(), "diced");
    assert!(cooking.get("pieces").is_some());
}

#[test]
fn it_should_stage_attribute_rows_before_collation_rows_per_ancestor() {
    let mut mapper = vegetable_mapper();
    let tomato = Tomato::new("t2", 4);

    let receipts = mapper.collect(&tomato, &["rotten"]);
    let inserts = mapper.collector_mut().collect_inserts(Some(&receipts));

    let order: Vec<&str> = inserts.iter().map(|(c, _)| c.name()).collect();
    assert_eq!(order, ["vegetable", "tomato", "tomato_aging_states"]);
}

#[test]
fn it_should_produce_the_same_shape_on_repeated_collection() {
    let mut mapper = vegetable_mapper();
    let tomato = Tomato::new("t3", 7);

    let mut shapes = Vec::new();
    for _ in 0..2 {
        let receipts = mapper.collect(&tomato, &["ripe", "diced"]);
        let inserts = mapper.collector_mut().collect_inserts(Some(&receipts));
        let shape: Vec<(String, Vec<String>)> = inserts
            .iter()
            .map(|(component, rows)| {
                (
                    component.name().to_string(),
                    rows[0].keys().cloned().collect(),
                )
            })
            .collect();
        shapes.push(shape);
    }
    assert_eq!(shapes[0], shapes[1]);
}

#[test]
fn it_should_isolate_sessions_by_receipt() {
    let mut mapper = vegetable_mapper();
    let first = Tomato::new("t4", 2);
    let second = Tomato::new("t5", 3);

    let receipts_first = mapper.collect(&first, &[]);
    let receipts_second = mapper.collect(&second, &[]);

    let flushed = mapper.collector_mut().collect_inserts(Some(&receipts_second));
    assert_eq!(flushed.get("tomato").unwrap()[0].get("name").unwrap(), "t5");

    // the first session is untouched and flushes on its own later
    assert_eq!(mapper.collector().pending(), receipts_first.len());
    let remaining = mapper.collector_mut().collect_inserts(None);
    assert_eq!(remaining.get("tomato").unwrap()[0].get("name").unwrap(), "t4");
}

#[test]
fn it_should_report_an_empty_batch_when_nothing_was_staged() {
    let mut mapper = vegetable_mapper();
    let inserts = mapper.collector_mut().collect_inserts(None);
    assert!(inserts.is_empty());
}

#[test]
fn it_should_compose_one_vertical_join_for_two_ancestors() {
    let mapper = vegetable_mapper();
    let tomato = Tomato::new("t6", 5);

    let view = mapper.compose_instance(&tomato, &[]).unwrap();
    assert_eq!(view.join_count(), 1);
    let names: Vec<String> = view.relations().iter().map(|r| r.name().to_string()).collect();
    assert_eq!(names, ["vegetable", "tomato"]);

    let single = mapper.compose(VEGETABLE_LINEAGE, &[]).unwrap();
    assert_eq!(single.join_count(), 0);
}

#[test]
fn it_should_fold_requested_groups_in_horizontally() {
    let mapper = vegetable_mapper();

    let view = mapper
        .compose(TOMATO_LINEAGE, &[Group::Named("aging"), Group::Named("cooking")])
        .unwrap();
    // one vertical join plus one horizontal join per tomato-level group
    assert_eq!(view.join_count(), 3);

    let leaves: Vec<String> = view.relations().iter().map(|r| r.name().to_string()).collect();
    assert!(leaves.contains(&"tomato_aging_states".to_string()));
    assert!(leaves.contains(&"tomato_cooking_states".to_string()));

    // a group with no collation component for any ancestor folds nothing
    let unmapped = mapper.compose(TOMATO_LINEAGE, &[Group::Named("juicing")]).unwrap();
    assert_eq!(unmapped.join_count(), 1);
}

#[test]
fn it_should_reject_foreign_components_at_attach_time() {
    let mut mapper = vegetable_mapper();

    let err = mapper.attach(TOMATO, "tomato_juicing_states", None, None).unwrap_err();
    assert!(matches!(err, MapError::ComponentNotFound(_)));

    let foreign = Arc::new(Relation::new("tomato", &["name", "radius"]));
    let err = mapper.attach(TOMATO, &foreign, None, None).unwrap_err();
    assert!(matches!(err, MapError::ForeignComponent(_)));
}
