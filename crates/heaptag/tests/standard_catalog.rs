use heaptag::config::ModelConfig;
use heaptag::error::ErrorKind;
use heaptag::standard::{self, INTERNAL_KINDS};
use heaptag::{Category, ObjectModel, TagId};

fn model(include_internal_tags: bool) -> ObjectModel {
    ObjectModel::standard(&ModelConfig {
        include_internal_tags,
    })
    .expect("standard object model")
}

#[test]
fn application_is_a_syntax_form_and_char_string_a_runtime_kind() {
    let model = model(false);
    assert_eq!(
        model.classify(TagId::new(4)).expect("tag 4"),
        Category::CompiledSyntaxForm
    );
    assert_eq!(model.space().name_of(TagId::new(4)), Some("application"));
    assert_eq!(
        model.classify(TagId::new(44)).expect("tag 44"),
        Category::RuntimeKind
    );
    assert_eq!(model.space().name_of(TagId::new(44)), Some("char-string"));
}

#[test]
fn lookup_past_the_last_tag_is_an_unknown_tag() {
    for include_internal_tags in [false, true] {
        let model = model(include_internal_tags);
        let err = model.lookup(TagId::new(9999)).expect_err("out of range");
        assert_eq!(err.kind, ErrorKind::UnknownTag);
        let err = model.classify(TagId::new(9999)).expect_err("out of range");
        assert_eq!(err.kind, ErrorKind::UnknownTag);
    }
}

#[test]
fn both_configurations_share_the_primary_numbering() {
    let plain = model(false);
    let extended = model(true);
    let b0 = plain.space().boundaries();
    let b1 = extended.space().boundaries();
    assert_eq!(b0.values, b1.values);
    assert_eq!(b0.compiled_values, b1.compiled_values);
    assert_eq!(b0.last_normal, b1.last_normal);

    assert_eq!(b0.last, b0.last_normal);
    for t in 0..b0.last.get() {
        assert_ne!(
            plain.classify(TagId::new(t)).expect("in range"),
            Category::InternalOnly
        );
    }

    assert_eq!(b1.last.get(), b1.last_normal.get() + INTERNAL_KINDS.len() as u32);
    assert_eq!(b1.last.get(), b1.last_normal.get() + 66);
    assert_eq!(
        extended.classify(b1.last_normal).expect("first internal"),
        Category::InternalOnly
    );
    assert_eq!(
        extended
            .classify(TagId::new(b1.last.get() - 1))
            .expect("last internal"),
        Category::InternalOnly
    );
}

#[test]
fn every_runtime_kind_has_the_full_operation_set() {
    let model = model(true);
    for kind in model.space().kinds() {
        let entry = model.lookup(kind.tag).expect("entry");
        assert!(entry.scan.is_some(), "{} has no scan descriptor", kind.name);
        if kind.category == Category::RuntimeKind {
            assert!(entry.describe.is_some(), "{} has no printer", kind.name);
            assert!(entry.equals_and_hash.is_some(), "{} has no equality", kind.name);
        }
    }
}

#[test]
fn boundary_slots_classify_but_cannot_be_allocated() {
    let model = model(false);
    let b = model.space().boundaries();
    assert_eq!(
        model.classify(b.values).expect("values slot"),
        Category::RegisteredValueOrSlot
    );
    assert!(model.lookup(b.compiled_values).is_ok());
    for slot in [b.values, b.compiled_values] {
        let err = model.allocate_header(slot).expect_err("reserved");
        assert_eq!(err.kind, ErrorKind::InvalidKind);
    }
    let err = model.allocate_header(b.last).expect_err("past last");
    assert_eq!(err.kind, ErrorKind::InvalidKind);
}

#[test]
fn internal_tier_needs_the_flag_at_build_time() {
    let space = heaptag::tag_space::TagSpace::build(&standard::standard_catalog(), false)
        .expect("build");
    let err = standard::internal_kinds()
        .append_to(space)
        .expect_err("disabled");
    assert_eq!(err.kind, ErrorKind::ExtensionDisabled);
}
