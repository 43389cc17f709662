//! Tests for controlled and uncontrolled field state.

use std::sync::{Arc, Mutex};

use gridhost::{
    Controllable, EngineError, FieldBinding, FieldMode, PluginDefinition, PluginHost, Value,
};

fn tags(binding: FieldBinding) -> PluginDefinition {
    PluginDefinition::new("Tags")
        .field(binding)
        .getter("tags", &[], |cx| cx.field("tags").cloned())
        .action("addTag", |cx, payload| {
            cx.apply_typed_reducer("tags", payload, |tags: &Vec<String>, tag: &String| {
                let mut next = tags.clone();
                next.push(tag.clone());
                next
            })?;
            Ok(())
        })
}

fn tags_from(props: &Controllable<Vec<String>>) -> PluginDefinition {
    tags(props.bind("tags").compare_by_value::<Vec<String>>())
}

fn tag(name: &str) -> Value {
    Value::new(name.to_string())
}

fn current_tags(host: &mut PluginHost) -> Vec<String> {
    host.resolve_as::<Vec<String>>("tags")
        .unwrap()
        .map(|v| (*v).clone())
        .unwrap()
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn test_uncontrolled_field_starts_empty() {
    let mut host = PluginHost::default();
    let id = host.mount(&tags(FieldBinding::of::<Vec<String>>("tags"))).unwrap();

    assert_eq!(host.field_mode(id, "tags").unwrap(), FieldMode::Uncontrolled);
    assert!(current_tags(&mut host).is_empty());
}

#[test]
fn test_uncontrolled_field_seeded_from_default() {
    let props = Controllable::new().default_value(vec!["a".to_string()]);
    let mut host = PluginHost::default();
    host.mount(&tags_from(&props)).unwrap();

    host.dispatch("addTag", tag("b")).unwrap();

    assert_eq!(current_tags(&mut host), vec!["a", "b"]);
}

#[test]
fn test_controlled_field_ignores_default() {
    let props = Controllable::new()
        .value(vec!["controlled".to_string()])
        .default_value(vec!["default".to_string()]);
    let mut host = PluginHost::default();
    let id = host.mount(&tags_from(&props)).unwrap();

    assert_eq!(host.field_mode(id, "tags").unwrap(), FieldMode::Controlled);
    assert_eq!(current_tags(&mut host), vec!["controlled"]);
}

#[test]
fn test_typed_change_callback() {
    let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let props = Controllable::new()
        .value(vec!["a".to_string()])
        .on_change(move |tags: &Arc<Vec<String>>| sink.lock().unwrap().push((**tags).clone()));
    let mut host = PluginHost::default();
    host.mount(&tags_from(&props)).unwrap();

    host.dispatch("addTag", tag("b")).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![vec!["a".to_string(), "b".to_string()]]);
    assert_eq!(current_tags(&mut host), vec!["a"]);
}

#[test]
fn test_unknown_field() {
    let mut host = PluginHost::default();
    let id = host.mount(&tags(FieldBinding::of::<Vec<String>>("tags"))).unwrap();

    assert!(matches!(
        host.field_value(id, "missing"),
        Err(EngineError::UnknownField { .. })
    ));
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_update_keeps_uncontrolled_state() {
    let props = Controllable::new().default_value(vec!["a".to_string()]);
    let mut host = PluginHost::default();
    let id = host.mount(&tags_from(&props)).unwrap();
    host.dispatch("addTag", tag("b")).unwrap();

    // A new default only seeds fresh state.
    let props = Controllable::new().default_value(vec!["z".to_string()]);
    host.update(id, &tags_from(&props)).unwrap();

    assert_eq!(current_tags(&mut host), vec!["a", "b"]);
}

#[test]
fn test_update_replaces_controlled_value() {
    let mut host = PluginHost::default();
    let id = host
        .mount(&tags_from(&Controllable::new().value(vec!["a".to_string()])))
        .unwrap();

    host.update(id, &tags_from(&Controllable::new().value(vec!["b".to_string()])))
        .unwrap();

    assert_eq!(current_tags(&mut host), vec!["b"]);
}

#[test]
fn test_switching_modes_keeps_internal_state() {
    let mut host = PluginHost::default();
    let id = host.mount(&tags_from(&Controllable::new())).unwrap();
    host.dispatch("addTag", tag("internal")).unwrap();

    host.update(id, &tags_from(&Controllable::new().value(vec!["outside".to_string()])))
        .unwrap();
    assert_eq!(host.field_mode(id, "tags").unwrap(), FieldMode::Controlled);
    assert_eq!(current_tags(&mut host), vec!["outside"]);

    host.update(id, &tags_from(&Controllable::new())).unwrap();
    assert_eq!(host.field_mode(id, "tags").unwrap(), FieldMode::Uncontrolled);
    assert_eq!(current_tags(&mut host), vec!["internal"]);
}

#[test]
fn test_remount_starts_fresh() {
    let props = Controllable::new().default_value(vec!["a".to_string()]);
    let mut host = PluginHost::default();
    let id = host.mount(&tags_from(&props)).unwrap();
    host.dispatch("addTag", tag("b")).unwrap();

    host.unmount(id).unwrap();
    host.mount(&tags_from(&props)).unwrap();

    assert_eq!(current_tags(&mut host), vec!["a"]);
}

#[test]
fn test_field_dropped_by_update_is_gone() {
    let mut host = PluginHost::default();
    let id = host.mount(&tags(FieldBinding::of::<Vec<String>>("tags"))).unwrap();

    host.update(id, &PluginDefinition::new("Tags")).unwrap();

    assert!(host.resolve("tags").unwrap().is_none());
    assert!(matches!(
        host.field_value(id, "tags"),
        Err(EngineError::UnknownField { .. })
    ));
}
