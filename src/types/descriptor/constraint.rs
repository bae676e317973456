use crate::types::ds::class::{BeanClass, Method, NativeType};

/// Per-accessor metadata queries the descriptor builder relies on.
pub trait ConstraintProvider: Send + Sync {
    /// Field name remap, `None` keeps the name derived from the accessor.
    fn indicated_name(&self, method: &Method) -> Option<String>;

    fn namespace(&self, method: &Method) -> Option<String>;

    fn is_transient(&self, method: &Method) -> bool;

    fn is_attribute(&self, method: &Method) -> bool;

    /// Whether the accessor holds the single value of a simple type.
    fn is_value(&self, method: &Method) -> bool;

    fn is_nillable(&self, method: &Method) -> bool;

    fn min_occurs(&self, method: &Method) -> Option<u32>;

    fn max_occurs(&self, method: &Method) -> Option<u32>;

    fn min_length(&self, method: &Method) -> Option<usize>;

    fn max_length(&self, method: &Method) -> Option<usize>;

    fn pattern(&self, method: &Method) -> Option<String>;

    /// Lexical lower bound, converted to the field type by the builder.
    fn min_inclusive(&self, method: &Method) -> Option<String>;

    fn max_inclusive(&self, method: &Method) -> Option<String>;

    fn is_generated(&self, method: &Method) -> bool;

    fn is_primary(&self, method: &Method) -> bool;

    fn is_raw(&self, method: &Method) -> bool;

    fn alias(&self, method: &Method) -> Option<String>;

    fn prop_order(&self, class: &BeanClass) -> Option<Vec<String>>;

    fn is_attribute_qualified(&self, class: &BeanClass) -> bool;

    fn is_element_qualified(&self, class: &BeanClass) -> bool;
}

/// Reads the [`FieldAnnotations`](crate::types::ds::annotations::FieldAnnotations) and
/// [`TypeAnnotations`](crate::types::ds::annotations::TypeAnnotations) declared on class tables.
#[derive(Debug, Default)]
pub struct AnnotationConstraintProvider;

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

fn returns_collection(method: &Method) -> bool {
    matches!(
        method.return_type(),
        Some(NativeType::List(_)) | Some(NativeType::Array(_))
    )
}

fn returns_text(method: &Method) -> bool {
    matches!(method.return_type(), Some(NativeType::String))
}

impl ConstraintProvider for AnnotationConstraintProvider {
    fn indicated_name(&self, method: &Method) -> Option<String> {
        non_blank(&method.annotations().name)
    }

    fn namespace(&self, method: &Method) -> Option<String> {
        non_blank(&method.annotations().namespace)
    }

    fn is_transient(&self, method: &Method) -> bool {
        method.annotations().transient
    }

    fn is_attribute(&self, method: &Method) -> bool {
        method.annotations().attribute
    }

    fn is_value(&self, method: &Method) -> bool {
        method.annotations().value
    }

    fn is_nillable(&self, method: &Method) -> bool {
        let annotations = method.annotations();
        if annotations.min_occurs.map_or(false, |min| min != 0) {
            return false;
        }
        !annotations.not_null
    }

    fn min_occurs(&self, method: &Method) -> Option<u32> {
        if returns_collection(method) {
            method.annotations().min_occurs
        } else {
            None
        }
    }

    fn max_occurs(&self, method: &Method) -> Option<u32> {
        if returns_collection(method) {
            method.annotations().max_occurs
        } else {
            None
        }
    }

    fn min_length(&self, method: &Method) -> Option<usize> {
        if returns_text(method) {
            method.annotations().min_length
        } else {
            None
        }
    }

    fn max_length(&self, method: &Method) -> Option<usize> {
        if returns_text(method) {
            method.annotations().max_length
        } else {
            None
        }
    }

    fn pattern(&self, method: &Method) -> Option<String> {
        if returns_text(method) {
            non_blank(&method.annotations().pattern)
        } else {
            None
        }
    }

    fn min_inclusive(&self, method: &Method) -> Option<String> {
        let annotations = method.annotations();
        annotations
            .min
            .map(|min| min.to_string())
            .or_else(|| non_blank(&annotations.min_decimal))
    }

    fn max_inclusive(&self, method: &Method) -> Option<String> {
        let annotations = method.annotations();
        annotations
            .max
            .map(|max| max.to_string())
            .or_else(|| non_blank(&annotations.max_decimal))
    }

    fn is_generated(&self, method: &Method) -> bool {
        method.annotations().generated
    }

    fn is_primary(&self, method: &Method) -> bool {
        method.annotations().primary
    }

    fn is_raw(&self, method: &Method) -> bool {
        method.annotations().raw
    }

    fn alias(&self, method: &Method) -> Option<String> {
        non_blank(&method.annotations().alias)
    }

    fn prop_order(&self, class: &BeanClass) -> Option<Vec<String>> {
        class
            .annotations()
            .prop_order
            .clone()
            .filter(|order| !order.is_empty())
    }

    fn is_attribute_qualified(&self, class: &BeanClass) -> bool {
        class.annotations().attribute_qualified
    }

    fn is_element_qualified(&self, class: &BeanClass) -> bool {
        class.annotations().element_qualified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ds::annotations::FieldAnnotations;
    use crate::types::ds::class::PrimitiveKind;

    fn method(return_type: NativeType, annotations: FieldAnnotations) -> Method {
        let class = BeanClass::interface("test.Annotated")
            .abstract_getter("getField", return_type)
            .annotated(annotations)
            .build();
        class.methods()[0].clone()
    }

    #[test]
    fn test_nillable_rules() {
        let provider = AnnotationConstraintProvider;
        assert!(provider.is_nillable(&method(NativeType::String, FieldAnnotations::new())));
        assert!(!provider.is_nillable(&method(
            NativeType::String,
            FieldAnnotations::new().not_null()
        )));
        assert!(!provider.is_nillable(&method(
            NativeType::String,
            FieldAnnotations::new().min_occurs(1)
        )));
    }

    #[test]
    fn test_occurs_only_apply_to_collections() {
        let provider = AnnotationConstraintProvider;
        let annotations = FieldAnnotations::new().occurs(1, 5);
        assert_eq!(provider.max_occurs(&method(NativeType::String, annotations.clone())), None);
        assert_eq!(
            provider.max_occurs(&method(NativeType::list_of(NativeType::String), annotations)),
            Some(5)
        );
    }

    #[test]
    fn test_length_only_applies_to_text() {
        let provider = AnnotationConstraintProvider;
        let annotations = FieldAnnotations::new().length(2, 4);
        assert_eq!(
            provider.min_length(&method(
                NativeType::Boxed(PrimitiveKind::Integer),
                annotations.clone()
            )),
            None
        );
        assert_eq!(provider.min_length(&method(NativeType::String, annotations)), Some(2));
    }

    #[test]
    fn test_blank_names_are_ignored() {
        let provider = AnnotationConstraintProvider;
        assert_eq!(
            provider.indicated_name(&method(NativeType::String, FieldAnnotations::new().name("  "))),
            None
        );
    }
}
