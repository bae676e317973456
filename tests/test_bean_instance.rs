extern crate bean_types;


use std::sync::Arc;

use bean_fixtures::*;
use bean_types::types::ds::class::{ClassRef, NativeType, PrimitiveKind};
use bean_types::types::ds::error::BeanError;
use bean_types::types::ds::object::new_object;
use bean_types::types::ds::value::Value;
use bean_types::types::instance::bean_instance::BeanInstance;
use bean_types::types::plugin::config::{ResolverConfig, UnknownFieldPolicy};
use bean_types::types::plugin::registry::BeanResolver;

fn new_person(resolver: &Arc<BeanResolver>) -> BeanInstance {
    resolver
        .resolve_class(&ClassRef::lazy(person_class))
        .new_instance()
        .unwrap()
}

// ── Leaf fields ──────────────────────────────────────────────────────

#[test]
fn test_set_then_get_string() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("name", "bob").unwrap();
    assert_eq!(person.get("name").unwrap(), Value::from("bob"));
}

#[test]
fn test_primitive_field_converts_lexical_value() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("age", "42").unwrap();
    assert_eq!(person.get("age").unwrap(), Value::Integer(42));
    person.set("age", Value::Long(7)).unwrap();
    assert_eq!(person.get("age").unwrap(), Value::Integer(7));
}

#[test]
fn test_unconvertible_value_fails() {
    let resolver = resolver();
    let person = new_person(&resolver);
    let result = person.set("age", "forty-two");
    assert!(matches!(result, Err(BeanError::ConversionFailure { .. })));
}

#[test]
fn test_setting_null_clears_field() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("name", "bob").unwrap();
    person.set("name", Value::Null).unwrap();
    assert_eq!(person.get("name").unwrap(), Value::Null);
}

#[test]
fn test_varargs_getter_is_called_without_values() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("name", "ann").unwrap();
    assert_eq!(person.get("greeting").unwrap(), Value::from("hello ann"));
}

#[test]
fn test_field_without_setter_is_not_writable() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert!(matches!(
        person.set("greeting", "hi"),
        Err(BeanError::NoAccessor { .. })
    ));
}

#[test]
fn test_invalid_path_is_rejected() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert!(matches!(person.get("tags["), Err(BeanError::InvalidPath { .. })));
}

// ── Unknown fields ───────────────────────────────────────────────────

#[test]
fn test_unknown_field_lenient_by_default() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert_eq!(person.get("doesNotExist").unwrap(), Value::Null);
    person.set("doesNotExist", "x").unwrap();
}

#[test]
fn test_unknown_field_strict_registry() {
    let resolver = strict_resolver();
    let person = new_person(&resolver);
    assert!(matches!(
        person.get("doesNotExist"),
        Err(BeanError::UnknownField { .. })
    ));
    assert!(matches!(
        person.set("doesNotExist", "x"),
        Err(BeanError::UnknownField { .. })
    ));
}

#[test]
fn test_unknown_field_policy_per_instance() {
    let resolver = resolver();
    let person = new_person(&resolver).with_unknown_fields(UnknownFieldPolicy::Strict);
    assert!(matches!(
        person.get("nothing"),
        Err(BeanError::UnknownField { .. })
    ));
}

#[test]
fn test_policy_override_reaches_nested_instances() {
    let resolver = resolver();
    let person = new_person(&resolver).with_unknown_fields(UnknownFieldPolicy::Strict);
    person.set("address.street", "Main").unwrap();
    assert!(matches!(
        person.get("address.nothing"),
        Err(BeanError::UnknownField { field, .. }) if field == "nothing"
    ));
}

// ── Shape errors ─────────────────────────────────────────────────────

#[test]
fn test_index_on_single_valued_field() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert!(matches!(
        person.get("name[0]"),
        Err(BeanError::InvalidIndexUsage { .. })
    ));
    assert!(matches!(
        person.set("name[0]", "x"),
        Err(BeanError::InvalidIndexUsage { .. })
    ));
}

#[test]
fn test_recursion_into_leaf_field() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert!(matches!(
        person.get("name.first"),
        Err(BeanError::InvalidRecursion { .. })
    ));
}

// ── Nested objects ───────────────────────────────────────────────────

#[test]
fn test_nested_set_creates_intermediate() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert_eq!(person.get("address.street").unwrap(), Value::Null);
    person.set("address.street", "Main Street").unwrap();
    assert_eq!(person.get("address.street").unwrap(), Value::from("Main Street"));
    assert!(matches!(person.get("address").unwrap(), Value::Object(_)));
}

#[test]
fn test_null_value_does_not_create_intermediate() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("address.street", Value::Null).unwrap();
    assert_eq!(person.get("address").unwrap(), Value::Null);
}

#[test]
fn test_null_value_creates_intermediate_when_configured() {
    let mut config = ResolverConfig::default();
    config.create_parent_for_null_value = true;
    let resolver = BeanResolver::with_config(config);
    let person = new_person(&resolver);
    person.set("address.street", Value::Null).unwrap();
    assert!(matches!(person.get("address").unwrap(), Value::Object(_)));
}

#[test]
fn test_setting_wrapped_instance_stores_native_object() {
    let resolver = resolver();
    let person = new_person(&resolver);
    let address = resolver
        .resolve_class(&ClassRef::lazy(address_class))
        .new_instance()
        .unwrap();
    address.set("street", "Elm").unwrap();
    person.set("address", address.clone()).unwrap();
    assert_eq!(person.get("address.street").unwrap(), Value::from("Elm"));
    assert_eq!(
        person.get("address").unwrap(),
        Value::Object(address.unwrapped().clone())
    );
}

#[test]
fn test_wrong_bean_type_is_rejected() {
    let resolver = resolver();
    let person = new_person(&resolver);
    let other = new_object(Person::default());
    assert!(matches!(
        person.set("address", other),
        Err(BeanError::ConversionFailure { .. })
    ));
}

// ── Indexed access ───────────────────────────────────────────────────

#[test]
fn test_list_write_back_grows_absent_list() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("tags[3]", "x").unwrap();
    match person.get("tags").unwrap() {
        Value::List(items) => {
            assert_eq!(items.len(), 4);
            assert_eq!(items[3], Value::from("x"));
            assert_eq!(items[0], Value::Null);
        }
        other => panic!("expected a list, got {}", other),
    }
    assert_eq!(person.get("tags[3]").unwrap(), Value::from("x"));
}

#[test]
fn test_list_component_conversion() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("tags[0]", 12).unwrap();
    assert_eq!(person.get("tags[0]").unwrap(), Value::from("12"));
}

#[test]
fn test_out_of_range_read_is_null() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert_eq!(person.get("tags[5]").unwrap(), Value::Null);
    person.set("tags[0]", "a").unwrap();
    assert_eq!(person.get("tags[5]").unwrap(), Value::Null);
}

#[test]
fn test_huge_index_is_rejected_without_growing() {
    let resolver = resolver();
    let person = new_person(&resolver);
    assert!(matches!(
        person.set("tags[18446744073709551615]", "x"),
        Err(BeanError::InvalidIndex { .. })
    ));
    person.set("tags[0]", "a").unwrap();
    assert!(matches!(
        person.set("tags[4000000000]", "x"),
        Err(BeanError::InvalidIndex { .. })
    ));
    assert!(matches!(
        person.set("scores[4000000000]", 1),
        Err(BeanError::InvalidIndex { .. })
    ));
    assert_eq!(
        person.get("tags").unwrap(),
        Value::List(vec![Value::from("a")])
    );
}

#[test]
fn test_bad_list_index() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("tags[0]", "a").unwrap();
    assert!(matches!(
        person.get("tags[first]"),
        Err(BeanError::InvalidIndex { .. })
    ));
}

#[test]
fn test_indexed_nested_objects() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("friends[1].name", "carol").unwrap();
    person.set("friends[1].address.street", "Fjordgata").unwrap();
    assert_eq!(person.get("friends[1].name").unwrap(), Value::from("carol"));
    assert_eq!(
        person.get("friends[1].address.street").unwrap(),
        Value::from("Fjordgata")
    );
    assert_eq!(person.get("friends[0]").unwrap(), Value::Null);
    assert_eq!(person.get("friends[0].name").unwrap(), Value::Null);
    // demo.Address declares no writer for city
    assert!(matches!(
        person.set("friends[1].address.city", "Oslo"),
        Err(BeanError::NoAccessor { .. })
    ));
}

#[test]
fn test_map_entries() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("labels[en]", "Person").unwrap();
    person.set("labels[de]", "Mensch").unwrap();
    assert_eq!(person.get("labels[en]").unwrap(), Value::from("Person"));
    assert_eq!(person.get("labels[fr]").unwrap(), Value::Null);
    match person.get("labels").unwrap() {
        Value::Map(map) => assert_eq!(map.keys().collect::<Vec<_>>(), vec!["en", "de"]),
        other => panic!("expected a map, got {}", other),
    }
}

#[test]
fn test_array_entries() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("scores[2]", "9").unwrap();
    match person.get("scores").unwrap() {
        Value::Array { component, items } => {
            assert_eq!(component, NativeType::Boxed(PrimitiveKind::Integer));
            assert_eq!(items, vec![Value::Null, Value::Null, Value::Integer(9)]);
        }
        other => panic!("expected an array, got {}", other),
    }
}

// ── Conversion rules ─────────────────────────────────────────────────

#[test]
fn test_single_element_collection_collapses() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("name", vec!["solo"]).unwrap();
    assert_eq!(person.get("name").unwrap(), Value::from("solo"));
}

#[test]
fn test_empty_collection_collapses_to_null() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person.set("name", "bob").unwrap();
    person.set("name", Value::List(vec![])).unwrap();
    assert_eq!(person.get("name").unwrap(), Value::Null);
}

#[test]
fn test_ambiguous_collection_collapse() {
    let resolver = resolver();
    let person = new_person(&resolver);
    let result = person.set("name", vec!["a", "b"]);
    assert!(matches!(
        result,
        Err(BeanError::AmbiguousCollectionCollapse { size: 2, .. })
    ));
}

#[test]
fn test_list_into_array_field() {
    let resolver = resolver();
    let person = new_person(&resolver);
    person
        .set("scores", Value::List(vec![Value::from("1"), Value::Integer(2)]))
        .unwrap();
    assert_eq!(person.get("scores[0]").unwrap(), Value::Integer(1));
    assert_eq!(person.get("scores[1]").unwrap(), Value::Integer(2));
}

// ── Inheritance ──────────────────────────────────────────────────────

#[test]
fn test_inherited_field_through_subtype() {
    let resolver = resolver();
    let employee = resolver
        .resolve_class(&ClassRef::lazy(employee_class))
        .new_instance()
        .unwrap();
    employee.set("id", "E-1").unwrap();
    employee.set("salary", 1000).unwrap();
    assert_eq!(employee.get("id").unwrap(), Value::from("E-1"));
    assert_eq!(employee.get("salary").unwrap(), Value::Long(1000));
}

// ── Wrapping ─────────────────────────────────────────────────────────

#[test]
fn test_wrap_native_object() {
    let resolver = resolver();
    let raw = new_object(Person {
        name: Some("dave".to_string()),
        ..Person::default()
    });
    let wrapped = resolver.wrap(raw.clone()).unwrap();
    assert_eq!(wrapped.definition().id(), "demo.Person");
    assert_eq!(wrapped.get("name").unwrap(), Value::from("dave"));
    assert!(wrapped.as_bean(&ClassRef::lazy(person_class)).is_some());
    assert!(wrapped.as_bean(&ClassRef::lazy(address_class)).is_none());
}

#[test]
fn test_detached_instance_keeps_working() {
    let person = {
        let resolver = resolver();
        let person = new_person(&resolver);
        // build the structure while the registry is alive
        person.definition().elements().unwrap();
        person
    };
    person.set("name", "eve").unwrap();
    assert_eq!(person.get("name").unwrap(), Value::from("eve"));
}
