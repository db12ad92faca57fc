use crate::types::TypeKind;
use crate::types::TypeRef;
use proptest::prelude::*;

fn arb_named() -> impl Strategy<Value = TypeRef> {
    (
        "[A-Z][a-z]{1,6}",
        prop_oneof![
            Just(TypeKind::Scalar),
            Just(TypeKind::Object),
            Just(TypeKind::Enum),
        ],
    )
        .prop_map(|(name, kind)| TypeRef::resolved(name, kind))
}

/// Well-formed refs: a non-null wrapper never wraps another.
fn arb_type_ref() -> impl Strategy<Value = TypeRef> {
    arb_named().prop_recursive(4, 16, 1, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeRef::list),
            inner.prop_map(|t| if t.is_non_null() { t } else { TypeRef::non_null(t) }),
        ]
    })
}

// =============================================================================
// Shape
// =============================================================================

#[test]
fn display_uses_sdl_notation() {
    let t = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("User"))));
    assert_eq!(t.to_string(), "[User!]!");
    assert!(t.is_list());
    assert!(t.is_non_null());
    assert_eq!(t.named_type().name, "User");
    assert_eq!(t.named_kind(), None);
}

#[test]
fn wrapper_kinds_are_known_before_resolution() {
    let t = TypeRef::list(TypeRef::named("User"));
    assert_eq!(t.kind(), Some(TypeKind::List));
    assert_eq!(t.of_type().and_then(TypeRef::kind), None);
}

// =============================================================================
// Interface compatibility
// =============================================================================

#[test]
fn implementations_may_tighten_nullability() {
    let interface = TypeRef::list(TypeRef::resolved("ID", TypeKind::Scalar));
    let tightened = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::resolved(
        "ID",
        TypeKind::Scalar,
    ))));
    assert!(tightened.is_compatible_with(&interface));
    assert!(!interface.is_compatible_with(&tightened));
}

#[test]
fn list_depth_must_match() {
    let flat = TypeRef::resolved("ID", TypeKind::Scalar);
    let nested = TypeRef::list(flat.clone());
    assert!(!nested.is_compatible_with(&flat));
    assert!(!flat.is_compatible_with(&nested));
}

proptest! {
    #[test]
    fn compatibility_is_reflexive(t in arb_type_ref()) {
        prop_assert!(t.is_compatible_with(&t));
    }

    #[test]
    fn adding_non_null_stays_compatible(t in arb_type_ref()) {
        prop_assume!(!t.is_non_null());
        let tightened = TypeRef::non_null(t.clone());
        prop_assert!(tightened.is_compatible_with(&t));
        prop_assert_eq!(tightened.nullable(), &t);
        prop_assert_eq!(tightened.named_type(), t.named_type());
    }

    #[test]
    fn renaming_breaks_compatibility(t in arb_type_ref()) {
        let mut renamed = t.clone();
        renamed.named_type_mut().name.push_str("Other");
        prop_assert!(!renamed.is_compatible_with(&t));
    }
}
