//! End-to-end scenarios against the session API.

use javatype_core::{Argument, Session, TypeSystemError};

fn animals() -> Session {
    let mut session = Session::new();
    session.define_type("Animal", "Object").unwrap();
    session.define_type("Dog", "Animal").unwrap();
    session
}

// ────────────────────────────────────────────────────────────────────────────
// Hierarchy
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dog_is_an_animal() {
    let session = animals();
    assert!(session.is_subtype("Dog", "Animal").unwrap());
    assert!(!session.is_subtype("Animal", "Dog").unwrap());
    assert!(session.is_subtype("Dog", "Object").unwrap());
}

#[test]
fn test_subtyping_is_reflexive_and_transitive() {
    let mut session = Session::new();
    // A small tree: two branches of depth three under Object
    for (name, parent) in [
        ("A", "Object"),
        ("B", "A"),
        ("C", "B"),
        ("X", "Object"),
        ("Y", "X"),
        ("Z", "Y"),
        ("W", "A"),
    ] {
        session.define_type(name, parent).unwrap();
    }

    let names: Vec<String> = session.types().into_iter().map(|t| t.name).collect();
    for a in &names {
        assert!(session.is_subtype(a, a).unwrap(), "{} <: {}", a, a);
        for b in &names {
            for c in &names {
                if session.is_subtype(a, b).unwrap() && session.is_subtype(b, c).unwrap() {
                    assert!(session.is_subtype(a, c).unwrap(), "{} <: {} <: {}", a, b, c);
                }
            }
            if a != b && session.is_subtype(a, b).unwrap() {
                assert!(!session.is_subtype(b, a).unwrap(), "cycle {} {}", a, b);
            }
        }
    }
}

#[test]
fn test_failed_declarations_leave_no_trace() {
    let mut session = animals();
    let before = session.types().len();
    assert!(session.define_type("Dog", "Object").is_err());
    assert!(session.define_type("Bird", "Wing").is_err());
    assert_eq!(session.types().len(), before);
}

// ────────────────────────────────────────────────────────────────────────────
// Overriding
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_covariant_override_accepted() {
    let mut session = animals();
    session
        .define_method("Animal", "speak", &[], Some("Object"))
        .unwrap();
    let entry = session.define_method("Dog", "speak", &[], Some("Dog")).unwrap();
    assert_eq!(entry.to_string(), "Dog::speak() -> Dog");
}

#[test]
fn test_incompatible_override_rejected() {
    let mut session = animals();
    session
        .define_method("Animal", "speak", &[], Some("Object"))
        .unwrap();
    let err = session
        .define_method("Dog", "speak", &[], Some("int"))
        .unwrap_err();
    assert!(matches!(err, TypeSystemError::InvalidOverrideReturnType { .. }));
    assert_eq!(session.methods().len(), 1);
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatch
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_virtual_call_binds_statically_then_dispatches() {
    let mut session = animals();
    session
        .define_method("Animal", "speak", &[], Some("Object"))
        .unwrap();
    session.define_method("Dog", "speak", &[], Some("Dog")).unwrap();
    session.define_object("a", "Animal", Some("Dog")).unwrap();

    let call = session.resolve_call("a", "speak", &[]).unwrap();
    assert_eq!(call.static_type, "Animal");
    assert_eq!(call.dynamic_type, "Dog");
    assert_eq!(
        call.to_string(),
        "a.speak() -> Animal::speak() (ctt) -> Dog::speak() (rtt)"
    );
}

#[test]
fn test_ambiguous_overloads() {
    let mut session = animals();
    session
        .define_method("Animal", "pair", &["Dog", "Animal"], None)
        .unwrap();
    session
        .define_method("Animal", "pair", &["Animal", "Dog"], None)
        .unwrap();
    session.define_object("a", "Animal", Some("Animal")).unwrap();
    session.define_object("d", "Dog", Some("Dog")).unwrap();

    let args = [
        Argument::Object("d".to_string()),
        Argument::Object("d".to_string()),
    ];
    let err = session.resolve_call("a", "pair", &args).unwrap_err();
    assert!(matches!(err, TypeSystemError::AmbiguousSignature { .. }));
}

#[test]
fn test_cast_selects_overload() {
    let mut session = animals();
    session
        .define_method("Animal", "pair", &["Dog", "Animal"], None)
        .unwrap();
    session
        .define_method("Animal", "pair", &["Animal", "Dog"], None)
        .unwrap();
    session.define_object("a", "Animal", Some("Animal")).unwrap();
    session.define_object("x", "Object", Some("Dog")).unwrap();

    let args = [
        Argument::Cast {
            ty: "Animal".to_string(),
            object: "x".to_string(),
        },
        Argument::Cast {
            ty: "Dog".to_string(),
            object: "x".to_string(),
        },
    ];
    let call = session.resolve_call("a", "pair", &args).unwrap();
    assert_eq!(call.signature, vec!["Animal".to_string(), "Dog".to_string()]);
}

#[test]
fn test_dispatch_from_every_subtype() {
    let mut session = animals();
    session.define_type("Puppy", "Dog").unwrap();
    session.define_type("Cat", "Animal").unwrap();
    session.define_method("Animal", "speak", &[], None).unwrap();
    session.define_method("Dog", "speak", &[], None).unwrap();

    for (name, rtt, expected) in [
        ("a", "Animal", "Animal"),
        ("d", "Dog", "Dog"),
        ("p", "Puppy", "Dog"),
        ("c", "Cat", "Animal"),
    ] {
        session.define_object(name, "Animal", Some(rtt)).unwrap();
        let call = session.resolve_call(name, "speak", &[]).unwrap();
        assert_eq!(call.static_type, "Animal");
        assert_eq!(call.dynamic_type, expected, "rtt {}", rtt);
    }
}

#[test]
fn test_actual_type_stays_below_declared_type() {
    let mut session = animals();
    session.define_type("Cat", "Animal").unwrap();
    session.define_object("a", "Animal", None).unwrap();

    for target in ["Dog", "Object", "Cat", "int", "Animal"] {
        let _ = session.reassign_object("a", target);
        for object in session.objects() {
            if let Some(actual) = &object.actual {
                assert!(session.is_subtype(actual, &object.declared).unwrap());
            }
        }
    }
    assert_eq!(
        session.object("a").unwrap().actual,
        session.graph().lookup("Animal")
    );
}
