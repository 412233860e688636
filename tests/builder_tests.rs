//! Builder behavior end to end: emission shape, the duplicate rule
//! book, and build-then-parse agreement.

use toml_scribe::{parse, Builder, Datetime, Error, Value};

#[test]
fn a_full_document_builds_and_reparses() {
    let dob = Datetime::from_literal("1979-05-27T07:32:00Z").unwrap();

    let mut builder = Builder::new();
    builder
        .add_comment(" generated configuration")
        .add_value("title", "TOML Example")
        .unwrap()
        .add_table("owner")
        .unwrap()
        .add_value("name", "Tom Preston-Werner")
        .unwrap()
        .add_value("dob", dob)
        .unwrap()
        .add_table("database")
        .unwrap()
        .add_value(
            "ports",
            vec![Value::from(8001), Value::from(8001), Value::from(8002)],
        )
        .unwrap()
        .add_value("enabled", true)
        .unwrap();

    let text = builder.build();
    let root = parse(&text).unwrap().unwrap();

    assert_eq!(
        root.get("title").and_then(|v| v.as_str()),
        Some("TOML Example")
    );
    let owner = root.get("owner").and_then(|v| v.as_table()).unwrap();
    assert_eq!(
        owner.get("dob").and_then(|v| v.as_datetime()),
        Some(&dob)
    );
    let database = root.get("database").and_then(|v| v.as_table()).unwrap();
    let ports = database.get("ports").and_then(|v| v.as_array()).unwrap();
    assert_eq!(ports.len(), 3);
}

#[test]
fn emitted_shape_matches_the_wire_format() {
    let mut builder = Builder::with_indent(0);
    builder
        .add_value("top", 1)
        .unwrap()
        .add_table("a.b")
        .unwrap()
        .add_value("x", "y")
        .unwrap()
        .add_array_of_table("items")
        .unwrap()
        .add_value("id", 1)
        .unwrap();

    assert_eq!(
        builder.build(),
        "top = 1\n\n[a.b]\nx = \"y\"\n\n[[items]]\nid = 1\n"
    );
}

#[test]
fn duplicate_table_is_rejected_with_its_own_kind() {
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
fn table_over_an_array_of_tables_is_rejected() {
    let mut builder = Builder::new();
    builder.add_array_of_table("fruit").unwrap();
    assert!(matches!(
        builder.add_table("fruit"),
        Err(Error::TableAlreadyDefinedAsArray { .. })
    ));
}

#[test]
fn array_of_tables_over_an_implicit_table_is_rejected() {
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
fn array_of_tables_over_an_existing_key_is_rejected() {
    let mut builder = Builder::new();
    builder.add_value("x", 1).unwrap();
    assert!(matches!(
        builder.add_array_of_table("x"),
        Err(Error::DuplicateArrayTableKey { .. })
    ));
}

#[test]
fn same_key_in_different_tables_is_fine() {
    let mut builder = Builder::new();
    builder
        .add_table("alpha")
        .unwrap()
        .add_value("ip", "10.0.0.1")
        .unwrap()
        .add_table("beta")
        .unwrap()
        .add_value("ip", "10.0.0.2")
        .unwrap();

    let root = parse(&builder.build()).unwrap().unwrap();
    let alpha = root.get("alpha").and_then(|v| v.as_table()).unwrap();
    assert_eq!(alpha.get("ip").and_then(|v| v.as_str()), Some("10.0.0.1"));
    let beta = root.get("beta").and_then(|v| v.as_table()).unwrap();
    assert_eq!(beta.get("ip").and_then(|v| v.as_str()), Some("10.0.0.2"));
}

#[test]
fn array_of_tables_elements_reparse_in_order() {
    let mut builder = Builder::new();
    builder
        .add_array_of_table("products")
        .unwrap()
        .add_value("name", "Hammer")
        .unwrap()
        .add_value("sku", 1)
        .unwrap()
        .add_array_of_table("products")
        .unwrap()
        .add_value("name", "Nail")
        .unwrap()
        .add_value("sku", 2)
        .unwrap();

    let root = parse(&builder.build()).unwrap().unwrap();
    let products = root.get("products").and_then(|v| v.as_array()).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(
        products[0]
            .as_table()
            .and_then(|t| t.get("name"))
            .and_then(|v| v.as_str()),
        Some("Hammer")
    );
    assert_eq!(
        products[1]
            .as_table()
            .and_then(|t| t.get("sku"))
            .and_then(|v| v.as_i64()),
        Some(2)
    );
}

#[test]
fn the_backslash_b_quirk_round_trips() {
    let mut builder = Builder::with_indent(0);
    builder.add_value("s", r"a\bc").unwrap();
    let text = builder.build();
    assert_eq!(text, "s = \"a\\bc\"\n");

    let root = parse(&text).unwrap().unwrap();
    assert_eq!(root.get("s").and_then(|v| v.as_str()), Some(r"a\bc"));
}

#[test]
fn doubled_backslashes_round_trip() {
    let mut builder = Builder::with_indent(0);
    builder.add_value("s", r"x\\y").unwrap();
    let root = parse(&builder.build()).unwrap().unwrap();
    assert_eq!(root.get("s").and_then(|v| v.as_str()), Some(r"x\\y"));
}

#[test]
fn comments_survive_a_reparse() {
    let mut builder = Builder::with_indent(0);
    builder
        .add_comment(" header")
        .add_value_with_comment("x", 1, " inline note")
        .unwrap();
    let root = parse(&builder.build()).unwrap().unwrap();
    assert_eq!(root.get("x").and_then(|v| v.as_i64()), Some(1));
}

#[test]
fn boolean_named_keys_round_trip_quoted() {
    let mut builder = Builder::with_indent(0);
    builder
        .add_value("true", 1)
        .unwrap()
        .add_value("false", 2)
        .unwrap();
    let text = builder.build();
    assert_eq!(text, "\"true\" = 1\n\"false\" = 2\n");

    let root = parse(&text).unwrap().unwrap();
    assert_eq!(root.get("true").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(root.get("false").and_then(|v| v.as_i64()), Some(2));
}

#[test]
fn quoted_value_keys_reparse_to_the_same_key() {
    let mut builder = Builder::with_indent(0);
    builder.add_value("key with space", 42).unwrap();
    let root = parse(&builder.build()).unwrap().unwrap();
    assert_eq!(
        root.get("key with space").and_then(|v| v.as_i64()),
        Some(42)
    );
}

#[test]
fn chaining_stops_at_the_first_error() {
    let mut builder = Builder::new();
    let result = builder
        .add_value("x", 1)
        .and_then(|b| b.add_value("x", 2))
        .and_then(|b| b.add_value("never", 3));
    assert!(matches!(result, Err(Error::DuplicateKey { .. })));

    // The failed call emitted nothing.
    assert_eq!(builder.build(), "x = 1\n");
}
