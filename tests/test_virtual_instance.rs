extern crate bean_types;


use bean_fixtures::*;
use bean_types::types::ds::class::ClassRef;
use bean_types::types::ds::error::BeanError;
use bean_types::types::ds::object::borrow_bean;
use bean_types::types::ds::value::Value;

// ── Interface backed instances ───────────────────────────────────────

#[test]
fn test_reader_only_interface_round_trip() {
    let resolver = resolver();
    let test_type = resolver.resolve_class(&ClassRef::lazy(test_interface));
    let instance = test_type.new_instance().unwrap();
    instance.set("name", "bob").unwrap();
    assert_eq!(instance.get("name").unwrap(), Value::from("bob"));
}

#[test]
fn test_unset_field_reads_null() {
    let resolver = resolver();
    let instance = resolver
        .resolve_class(&ClassRef::lazy(test_interface))
        .new_instance()
        .unwrap();
    assert_eq!(instance.get("name").unwrap(), Value::Null);
}

#[test]
fn test_store_is_keyed_by_reader_name() {
    let resolver = resolver();
    let renamed = resolver.resolve_class(&ClassRef::lazy(renamed_interface));
    assert!(renamed.element("renamed").unwrap().is_some());
    assert!(renamed.element("thing").unwrap().is_none());

    let instance = renamed.new_instance().unwrap();
    instance.set("renamed", "v").unwrap();
    assert_eq!(instance.get("renamed").unwrap(), Value::from("v"));

    let bean = borrow_bean(instance.unwrapped()).unwrap();
    let stored = bean.as_virtual().unwrap();
    assert_eq!(stored.get("thing"), Some(&Value::from("v")));
    assert_eq!(stored.get("renamed"), None);
}

#[test]
fn test_interface_with_writer() {
    let resolver = resolver();
    let instance = resolver
        .resolve_class(&ClassRef::lazy(tagged_interface))
        .new_instance()
        .unwrap();
    instance.set("tags[1]", "b").unwrap();
    instance.set("tags[0]", "a").unwrap();
    assert_eq!(
        instance.get("tags").unwrap(),
        Value::List(vec![Value::from("a"), Value::from("b")])
    );
}

#[test]
fn test_virtual_objects_have_distinct_identity() {
    let resolver = resolver();
    let test_type = resolver.resolve_class(&ClassRef::lazy(test_interface));
    let first = test_type.new_instance().unwrap();
    let second = test_type.new_instance().unwrap();

    let first_bean = borrow_bean(first.unwrapped()).unwrap();
    let second_bean = borrow_bean(second.unwrapped()).unwrap();
    let first_virtual = first_bean.as_virtual().unwrap();
    let second_virtual = second_bean.as_virtual().unwrap();
    assert_ne!(first_virtual.id(), second_virtual.id());
    assert!(first_virtual.to_string().starts_with("demo.Test@"));
}

#[test]
fn test_wrapping_recovers_interface_type() {
    let resolver = resolver();
    let instance = resolver
        .resolve_class(&ClassRef::lazy(test_interface))
        .new_instance()
        .unwrap();
    instance.set("name", "zed").unwrap();

    let rewrapped = resolver.wrap(instance.unwrapped().clone()).unwrap();
    assert_eq!(rewrapped.definition().id(), "demo.Test");
    assert_eq!(rewrapped.get("name").unwrap(), Value::from("zed"));
}

#[test]
fn test_class_without_factory_can_not_be_instantiated() {
    let resolver = resolver();
    let result = resolver
        .resolve_class(&ClassRef::lazy(ordered_class))
        .new_instance();
    assert!(matches!(result, Err(BeanError::Instantiation { .. })));
}
