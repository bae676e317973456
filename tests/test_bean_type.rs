extern crate bean_types;


use bean_fixtures::*;
use bean_types::types::descriptor::simple_bean_type::{SimpleBeanType, SIMPLE_TYPE_VALUE};
use bean_types::types::ds::class::{ClassRef, NativeType, PrimitiveKind};
use bean_types::types::ds::element::FieldType;
use bean_types::types::ds::error::BeanError;
use bean_types::types::ds::simple_type::SimpleType;
use bean_types::types::ds::value::Value;
use bean_types::types::plugin::config::ResolverConfig;
use bean_types::types::plugin::registry::BeanResolver;

fn element_names(elements: Vec<&bean_types::types::ds::element::Element>) -> Vec<String> {
    elements.iter().map(|e| e.name().to_string()).collect()
}

// ── Field graph ──────────────────────────────────────────────────────

#[test]
fn test_fields_are_sorted_without_declared_order() {
    let resolver = resolver();
    let person = resolver.resolve_class(&ClassRef::lazy(person_class));
    assert_eq!(
        element_names(person.elements().unwrap()),
        vec![
            "address", "age", "friends", "greeting", "labels", "name", "scores", "tags"
        ]
    );
}

#[test]
fn test_type_properties() {
    let resolver = resolver();
    let person = resolver.resolve_class(&ClassRef::lazy(person_class));
    assert_eq!(person.id(), "demo.Person");
    assert_eq!(person.name(), "person");
    assert_eq!(person.namespace(), None);
    assert_eq!(person.to_string(), "BeanType: person");

    let constrained = resolver.resolve_class(&ClassRef::lazy(constrained_class));
    assert_eq!(constrained.name(), "constrainedThing");
    assert_eq!(constrained.namespace(), Some("urn:demo"));
    assert_eq!(
        constrained.properties().collection_name.as_deref(),
        Some("things")
    );

    let color = resolver.resolve_class(&ClassRef::lazy(color_class));
    assert_eq!(color.properties().enumeration, vec!["RED", "GREEN"]);
}

#[test]
fn test_element_kinds_and_types() {
    let resolver = resolver();
    let person = resolver.resolve_class(&ClassRef::lazy(person_class));

    let age = person.element("age").unwrap().unwrap();
    assert_eq!(age.simple_type(), Some(SimpleType::Integer));
    assert!(!age.is_nillable());
    assert!(!age.is_list());
    assert_eq!(
        person.actual_type("age").unwrap(),
        Some(&NativeType::Boxed(PrimitiveKind::Integer))
    );

    let friends = person.element("friends").unwrap().unwrap();
    assert!(friends.is_list());
    assert_eq!(friends.max_occurs(), 0);
    match friends.field_type() {
        FieldType::Complex(nested) => assert_eq!(nested.id(), "demo.Person"),
        other => panic!("expected a complex field, got {:?}", other),
    }
    assert_eq!(
        person.component_type("friends").unwrap(),
        Some(&NativeType::bean(ClassRef::lazy(person_class)))
    );

    let tags = person.element("tags").unwrap().unwrap();
    assert_eq!(tags.simple_type(), Some(SimpleType::String));
    assert_eq!(
        tags.properties().collection_handler.as_ref().map(|h| h.name().to_string()),
        Some("list".to_string())
    );

    assert!(person.element("secret").unwrap().is_none());
    assert!(person.element("class").unwrap().is_none());
}

#[test]
fn test_constraint_metadata() {
    let resolver = resolver();
    let constrained = resolver.resolve_class(&ClassRef::lazy(constrained_class));

    let code = constrained.element("code").unwrap().unwrap();
    assert_eq!(code.properties().length, Some(3));
    assert_eq!(code.properties().min_length, None);
    assert_eq!(code.properties().pattern.as_deref(), Some("[A-Z]+"));
    assert!(!code.is_nillable());
    assert_eq!(code.min_occurs(), 1);

    let count = constrained.element("count").unwrap().unwrap();
    assert_eq!(count.properties().min_inclusive.as_deref(), Some("1"));
    assert_eq!(count.properties().max_inclusive.as_deref(), Some("10"));
    assert!(count.is_nillable());
    assert_eq!(count.min_occurs(), 0);

    let items = constrained.element("items").unwrap().unwrap();
    assert_eq!(items.min_occurs(), 0);
    assert_eq!(items.max_occurs(), 5);

    let note = constrained.element("remark").unwrap().unwrap();
    assert_eq!(note.properties().alias.as_deref(), Some("comment"));
    assert!(constrained.element("note").unwrap().is_none());

    assert!(constrained.element("ignored").unwrap().is_none());
}

#[test]
fn test_declared_order_drops_unlisted_fields() {
    let resolver = resolver();
    let ordered = resolver.resolve_class(&ClassRef::lazy(ordered_class));
    assert_eq!(
        element_names(ordered.elements().unwrap()),
        vec!["zeta", "alpha"]
    );
}

#[test]
fn test_declared_order_keeps_unlisted_fields_when_configured() {
    let mut config = ResolverConfig::default();
    config.include_children_not_in_prop_order = true;
    let resolver = BeanResolver::with_config(config);
    let ordered = resolver.resolve_class(&ClassRef::lazy(ordered_class));
    assert_eq!(
        element_names(ordered.elements().unwrap()),
        vec!["zeta", "alpha", "middle"]
    );
}

#[test]
fn test_declared_order_with_unknown_field_fails() {
    let resolver = resolver();
    let broken = resolver.resolve_class(&ClassRef::lazy(broken_order_class));
    assert!(matches!(
        broken.elements(),
        Err(BeanError::ConstructionFailure { .. })
    ));
}

#[test]
fn test_erased_list_without_contract_fails() {
    let resolver = resolver();
    let erased = resolver.resolve_class(&ClassRef::lazy(erased_class));
    assert!(matches!(
        erased.element("things"),
        Err(BeanError::ConstructionFailure { .. })
    ));
}

#[test]
fn test_varargs_getters_can_be_disabled() {
    let mut config = ResolverConfig::default();
    config.allow_varargs_getters = false;
    let resolver = BeanResolver::with_config(config);
    let person = resolver.resolve_class(&ClassRef::lazy(person_class));
    assert!(person.element("greeting").unwrap().is_none());
}

// ── Inheritance ──────────────────────────────────────────────────────

#[test]
fn test_supertype_chain() {
    let resolver = resolver();
    let employee = resolver.resolve_class(&ClassRef::lazy(employee_class));
    let base = employee.super_type().unwrap();
    assert_eq!(base.id(), "demo.Base");

    assert_eq!(element_names(employee.elements().unwrap()), vec!["salary"]);
    assert_eq!(
        element_names(employee.all_elements().unwrap()),
        vec!["id", "salary"]
    );
    assert!(employee.element("id").unwrap().is_some());
    assert!(employee.getter("id").unwrap().is_some());
    assert!(employee.setter("id").unwrap().is_some());
    assert_eq!(
        employee.actual_type("id").unwrap(),
        Some(&NativeType::String)
    );
}

#[test]
fn test_interface_is_supertype_without_superclass() {
    let resolver = resolver();
    let tagged_impl = resolver.resolve_class(&ClassRef::lazy(tagged_impl_class));
    assert_eq!(tagged_impl.super_type().unwrap().class().name(), "demo.Tagged");
}

#[test]
fn test_synthetic_class_uses_interface_component_type() {
    let resolver = resolver();
    let tagged_impl = resolver.resolve_class(&ClassRef::lazy(tagged_impl_class));
    assert_eq!(tagged_impl.id(), "demo.Tagged");
    assert_eq!(
        tagged_impl.component_type("tags").unwrap(),
        Some(&NativeType::String)
    );
    let instance = tagged_impl.new_instance().unwrap();
    instance.set("tags[0]", 5).unwrap();
    assert_eq!(instance.get("tags[0]").unwrap(), Value::from("5"));
}

// ── Simple types ─────────────────────────────────────────────────────

#[test]
fn test_simple_type_collapse() {
    let resolver = resolver();
    let amount = resolver.resolve_class(&ClassRef::lazy(amount_class));
    assert!(amount.is_simple_type().unwrap());
    assert_eq!(amount.value_element().unwrap().unwrap().name(), "value");
    assert!(amount.element("currency").unwrap().unwrap().is_attribute());

    let labelled = resolver.resolve_class(&ClassRef::lazy(labelled_class));
    assert!(!labelled.is_simple_type().unwrap());

    let person = resolver.resolve_class(&ClassRef::lazy(person_class));
    assert!(!person.is_simple_type().unwrap());
}

#[test]
fn test_simple_bean_type_redirects_value_token() {
    let resolver = resolver();
    let amount = SimpleBeanType::new(resolver.resolve_class(&ClassRef::lazy(amount_class)));
    assert_eq!(amount.simple_type().unwrap(), Some(SimpleType::String));
    assert_eq!(amount.instance_type().unwrap(), Some(NativeType::String));
    assert_eq!(
        amount.element(SIMPLE_TYPE_VALUE).unwrap().unwrap().name(),
        "value"
    );
    assert_eq!(amount.getter(SIMPLE_TYPE_VALUE).unwrap().unwrap().name(), "getValue");
    assert_eq!(amount.setter(SIMPLE_TYPE_VALUE).unwrap().unwrap().name(), "setValue");
    assert_eq!(
        amount.actual_type(SIMPLE_TYPE_VALUE).unwrap(),
        Some(&NativeType::String)
    );
    assert_eq!(amount.getter("currency").unwrap().unwrap().name(), "getCurrency");
}

#[test]
fn test_simple_type_path_access() {
    let resolver = resolver();
    populate_class_path(&resolver);
    let amount = resolver.resolve("demo.Amount").unwrap().unwrap();
    assert!(amount.as_simple().is_some());

    let instance = amount.new_instance().unwrap();
    instance.set("$value", 12.5).unwrap();
    instance.set("@currency", "EUR").unwrap();
    assert_eq!(instance.get("$value").unwrap(), Value::from("12.5"));
    assert_eq!(instance.get("value").unwrap(), Value::from("12.5"));
    assert_eq!(instance.get("@currency").unwrap(), Value::from("EUR"));
}
