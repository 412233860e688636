//! End-to-end scenarios pinning down the TOML v0.4.0 behavior this
//! crate commits to: literal inputs with their expected trees, the
//! tokenization priorities, and the builder's duplicate rules.

use toml_scribe::{parse, Builder, Error, Value};

fn parse_ok(input: &str) -> toml_scribe::TomlMap {
    parse(input).unwrap().unwrap()
}

#[test]
fn booleans_parse_to_their_values() {
    let root = parse_ok("t = true\nf = false");
    assert_eq!(root.get("t"), Some(&Value::Boolean(true)));
    assert_eq!(root.get("f"), Some(&Value::Boolean(false)));
}

#[test]
fn integers_with_signs_and_underscores() {
    let root = parse_ok("answer = 42\nneganswer = -42\nunderscore = 1_2_3_4_5");
    assert_eq!(root.get("answer"), Some(&Value::Integer(42)));
    assert_eq!(root.get("neganswer"), Some(&Value::Integer(-42)));
    assert_eq!(root.get("underscore"), Some(&Value::Integer(12345)));
}

#[test]
fn quoted_key_with_a_dot_stays_one_key() {
    let root = parse_ok("[dog.\"tater.man\"]\ntype = \"pug\"");
    let dog = root.get("dog").and_then(|v| v.as_table()).unwrap();
    let tater = dog.get("tater.man").and_then(|v| v.as_table()).unwrap();
    assert_eq!(tater.get("type").and_then(|v| v.as_str()), Some("pug"));
}

#[test]
fn array_of_tables_collects_elements_in_order() {
    let root = parse_ok(
        "[[products]]\nname = \"Hammer\"\nsku = 1\n[[products]]\nname = \"Nail\"\nsku = 2",
    );
    let products = root.get("products").and_then(|v| v.as_array()).unwrap();
    assert_eq!(products.len(), 2);

    let first = products[0].as_table().unwrap();
    assert_eq!(first.get("name").and_then(|v| v.as_str()), Some("Hammer"));
    assert_eq!(first.get("sku").and_then(|v| v.as_i64()), Some(1));

    let second = products[1].as_table().unwrap();
    assert_eq!(second.get("name").and_then(|v| v.as_str()), Some("Nail"));
    assert_eq!(second.get("sku").and_then(|v| v.as_i64()), Some(2));
}

#[test]
fn parent_table_may_follow_its_children() {
    let root = parse_ok("[a.b.c]\nanswer = 42\n[a]\nbetter = 43");
    let a = root.get("a").and_then(|v| v.as_table()).unwrap();
    assert_eq!(a.get("better").and_then(|v| v.as_i64()), Some(43));
    let b = a.get("b").and_then(|v| v.as_table()).unwrap();
    let c = b.get("c").and_then(|v| v.as_table()).unwrap();
    assert_eq!(c.get("answer").and_then(|v| v.as_i64()), Some(42));
}

#[test]
fn mixed_array_error_names_the_offending_value() {
    let err = parse("strings-and-ints = [\"hi\", 42]").unwrap_err();
    match err {
        Error::Syntax { line, msg } => {
            assert_eq!(line, 1);
            assert!(msg.contains("Data types cannot be mixed"));
            assert!(msg.contains("\"42\""));
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

// Tokenization priority laws

#[test]
fn date_literal_is_one_datetime_not_arithmetic() {
    let root = parse_ok("when = 1979-05-27");
    assert!(root.get("when").unwrap().is_datetime());
}

#[test]
fn hex_octal_binary_literals_are_rejected() {
    assert!(parse("x = 0xDEADBEEF").is_err());
    assert!(parse("x = 0o755").is_err());
    assert!(parse("x = 0b11010110").is_err());
}

// Integer underscore laws

#[test]
fn underscore_placement_laws() {
    assert_eq!(
        parse_ok("x = 1_000_000").get("x"),
        Some(&Value::Integer(1_000_000))
    );
    assert!(parse("x = _42").is_err());
    assert!(parse("x = 42_").is_err());
    assert!(parse("x = 0_42").is_err());
    assert!(parse("x = 042").is_err());
}

// Array homogeneity laws

#[test]
fn homogeneous_arrays_parse_and_mixed_ones_fail() {
    assert!(parse("a = [1, 2, 3]").is_ok());
    assert!(parse("a = [1, \"two\"]").is_err());
}

#[test]
fn sibling_inner_arrays_may_differ_in_type() {
    let root = parse_ok("a = [[1, 2], [\"x\", \"y\"]]");
    let a = root.get("a").and_then(|v| v.as_array()).unwrap();
    assert_eq!(a.len(), 2);
    assert!(a[0].is_array());
    assert!(a[1].is_array());
}

// Implicit-table laws

#[test]
fn implicit_parent_can_become_an_explicit_table() {
    assert!(parse("[[a.b.c]]\n[a]").is_ok());
}

#[test]
fn implicit_parent_cannot_become_an_array_of_tables() {
    assert!(parse("[[a.b.c]]\n[[a]]").is_err());
}

// Builder scenarios

#[test]
fn builder_rejects_a_redefined_table() {
    let mut builder = Builder::new();
    builder
        .add_table("a")
        .unwrap()
        .add_value("x", 1)
        .unwrap();
    assert!(matches!(
        builder.add_table("a"),
        Err(Error::DuplicateTableKey { .. })
    ));
}

#[test]
fn builder_rejects_an_array_over_an_implicit_table() {
    let mut builder = Builder::new();
    builder
        .add_array_of_table("albums.songs")
        .unwrap()
        .add_value("name", "Glory Days")
        .unwrap();
    assert!(matches!(
        builder.add_array_of_table("albums"),
        Err(Error::KeyDefinedAsImplicitTable { .. })
    ));
}

#[test]
fn at_prefixed_strings_emit_and_reparse_as_literals() {
    let mut builder = Builder::with_indent(0);
    builder.add_value("regex", r"@<\i\c*\s*>").unwrap();
    let text = builder.build();
    assert_eq!(text, "regex = '<\\i\\c*\\s*>'\n");

    let root = parse_ok(&text);
    assert_eq!(
        root.get("regex").and_then(|v| v.as_str()),
        Some(r"<\i\c*\s*>")
    );
}

// Line-reporting law

#[test]
fn parse_errors_report_the_offending_line() {
    let err = parse("ok = 1\nfine = 2\nbroken = ]").unwrap_err();
    assert_eq!(err.line(), Some(3));

    let err = parse("ok = 1\nok = 2").unwrap_err();
    assert_eq!(err.line(), Some(2));
}
