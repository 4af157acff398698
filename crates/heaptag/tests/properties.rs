use std::collections::BTreeSet;

use proptest::prelude::*;

use heaptag::classify::CategoryClassifier;
use heaptag::error::ErrorKind;
use heaptag::extension::ExtensionRegistry;
use heaptag::kind::{Boundary, Catalog};
use heaptag::standard::standard_space;
use heaptag::tag_space::TagSpace;
use heaptag::{Category, TagId};

const PROP_CASES: u32 = 128;

fn names(prefix: &'static str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}-{i}")).collect()
}

/// Catalog with the given number of kinds per category; names are unique.
fn catalog(syntax: usize, values: usize, runtime: usize) -> Catalog {
    let mut c = Catalog::new();
    for n in names("form", syntax) {
        c = c.kind(n, Category::CompiledSyntaxForm);
    }
    c = c.boundary(Boundary::Values);
    for n in names("slot", values) {
        c = c.kind(n, Category::RegisteredValueOrSlot);
    }
    c = c.boundary(Boundary::CompiledValues);
    for n in names("kind", runtime) {
        c = c.kind(n, Category::RuntimeKind);
    }
    c
}

fn frozen(syntax: usize, values: usize, runtime: usize, internal: usize) -> TagSpace {
    let space = TagSpace::build(&catalog(syntax, values, runtime), internal > 0).expect("build");
    let mut space = if internal > 0 {
        let mut registry = ExtensionRegistry::new();
        for n in names("internal", internal) {
            registry.push(n);
        }
        registry.append_to(space).expect("append")
    } else {
        space
    };
    space.freeze();
    space
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROP_CASES))]

    #[test]
    fn boundaries_are_always_ordered(
        syntax in 0usize..20,
        values in 0usize..10,
        runtime in 0usize..40,
        internal in 0usize..20,
    ) {
        let b = frozen(syntax, values, runtime, internal).boundaries();
        prop_assert!(b.is_ordered());
        prop_assert_eq!(b.values.index(), syntax);
        prop_assert_eq!(b.last.index(), syntax + values + runtime + internal + 2);
    }

    #[test]
    fn classification_is_total_below_last(
        syntax in 0usize..20,
        values in 0usize..10,
        runtime in 0usize..40,
        internal in 0usize..20,
        raw in 0u32..200,
    ) {
        let space = frozen(syntax, values, runtime, internal);
        let classifier = CategoryClassifier::new(&space).expect("classifier");
        let b = space.boundaries();
        let tag = TagId::new(raw);
        match classifier.classify(tag) {
            Ok(category) => {
                prop_assert!(tag < b.last);
                let (lo, hi) = b.range_of(category);
                prop_assert!(lo <= tag && tag < hi);
                if let Some(kind) = space.kind(tag) {
                    prop_assert_eq!(kind.category, category);
                }
            }
            Err(err) => {
                prop_assert!(tag >= b.last);
                prop_assert_eq!(err.kind, ErrorKind::UnknownTag);
            }
        }
    }

    #[test]
    fn tags_are_unique_and_names_round_trip(
        syntax in 0usize..20,
        values in 0usize..10,
        runtime in 0usize..40,
        internal in 0usize..20,
    ) {
        let space = frozen(syntax, values, runtime, internal);
        let mut seen = BTreeSet::new();
        for kind in space.kinds() {
            prop_assert!(seen.insert(kind.tag));
            prop_assert_eq!(space.tag_of(kind.name).expect("declared"), kind.tag);
        }
        prop_assert_eq!(seen.len(), syntax + values + runtime + internal);
    }

    #[test]
    fn building_twice_gives_the_same_space(
        syntax in 0usize..20,
        values in 0usize..10,
        runtime in 0usize..40,
        internal in 0usize..20,
    ) {
        let mut a = frozen(syntax, values, runtime, internal);
        let b = frozen(syntax, values, runtime, internal);
        a.freeze();
        prop_assert_eq!(a.boundaries(), b.boundaries());
        let ca = CategoryClassifier::new(&a).expect("classifier");
        let cb = CategoryClassifier::new(&b).expect("classifier");
        for t in 0..=a.last().get() {
            let tag = TagId::new(t);
            prop_assert_eq!(ca.classify(tag).ok(), cb.classify(tag).ok());
            prop_assert_eq!(a.name_of(tag), b.name_of(tag));
        }
    }

    #[test]
    fn duplicate_names_never_build(
        runtime in 1usize..20,
        pick in any::<prop::sample::Index>(),
    ) {
        let dup = format!("kind-{}", pick.index(runtime));
        let c = catalog(2, 1, runtime).kind(dup, Category::RuntimeKind);
        let err = TagSpace::build(&c, false).expect_err("duplicate");
        prop_assert_eq!(err.kind, ErrorKind::DuplicateKind);
    }

    #[test]
    fn standard_space_classifies_every_tag(raw in 0u32..300, internal in any::<bool>()) {
        let space = standard_space(internal).expect("standard space");
        let classifier = CategoryClassifier::new(&space).expect("classifier");
        prop_assert_eq!(classifier.classify(TagId::new(raw)).is_ok(), raw < space.last().get());
    }
}
