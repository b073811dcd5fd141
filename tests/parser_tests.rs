//! Structural parser tests
//!
//! These verify that:
//! - Parsing terminates on arbitrary input, including malformed documents
//! - Shapes, containers, connections, and comments build the expected tree
//! - Multi-word identifiers survive verbatim
//! - Nested namespaces resolve through dotted paths

use d2_completion_engine::analysis::{collect_shapes, lookup_path};
use d2_completion_engine::parser::{parse, ConnectionKind};
use indoc::indoc;
use quickcheck::quickcheck;

#[test]
fn test_parse_terminates_on_malformed_input() {
    let garbled = [
        "",
        "   \n\t  ",
        "{}{}{}",
        ":::;;;...",
        "###",
        "\"unterminated",
        "\"\"\"unterminated block",
        "-> -> ->",
        "a -> ",
        "....",
        "][.}{",
    ];
    for source in garbled {
        // Must return some tree, never hang or panic.
        let result = parse(source);
        assert_eq!(result.root.span.end, source.len(), "span covers {source:?}");
    }
}

quickcheck! {
    fn parse_terminates_on_arbitrary_text(text: String) -> bool {
        let result = parse(&text);
        result.root.span.start == 0 && result.root.span.end == text.len()
    }
}

#[test]
fn test_scalar_statement_is_one_labelled_shape() {
    let result = parse(r#"server: "Web Server""#);
    assert_eq!(result.context.shapes.len(), 1, "exactly one shape");
    let server = &result.context.shapes["server"];
    assert_eq!(server.identifier, "server");
    assert_eq!(
        server.attributes.get("label").map(String::as_str),
        Some("Web Server")
    );
}

#[test]
fn test_connection_with_label() {
    let result = parse("client -> server: HTTP Request");
    assert_eq!(result.context.connections.len(), 1);
    let conn = &result.context.connections[0];
    assert_eq!(conn.source, "client");
    assert_eq!(conn.target, "server");
    assert_eq!(conn.kind, ConnectionKind::Directed);
    assert_eq!(conn.label.as_deref(), Some("HTTP Request"));
}

#[test]
fn test_all_connection_kinds() {
    let cases = [
        ("a -> b", ConnectionKind::Directed),
        ("a <- b", ConnectionKind::ReverseDirected),
        ("a <-> b", ConnectionKind::Bidirectional),
        ("a -- b", ConnectionKind::Undirected),
    ];
    for (source, kind) in cases {
        let result = parse(source);
        assert_eq!(result.context.connections.len(), 1, "{source}");
        assert_eq!(result.context.connections[0].kind, kind, "{source}");
    }
}

#[test]
fn test_quoted_multi_word_endpoints_become_shapes() {
    let result = parse(r#""database server" -> "web server""#);
    assert_eq!(result.context.shapes.len(), 2);
    assert!(result.context.shapes.contains_key("database server"));
    assert!(result.context.shapes.contains_key("web server"));
}

#[test]
fn test_unquoted_multi_word_identifiers() {
    let result = parse("load balancer -> api gateway");
    assert!(result.context.shapes.contains_key("load balancer"));
    assert!(result.context.shapes.contains_key("api gateway"));
}

#[test]
fn test_nested_path_distinct_from_top_level() {
    let source = indoc! {"
        Middle: {
          Backbone
          AIS
        }
        AIS
    "};
    let result = parse(source);
    let shapes = &result.context.shapes;

    let nested = lookup_path(shapes, "Middle.AIS").expect("Middle.AIS resolves");
    let top = lookup_path(shapes, "AIS").expect("top-level AIS resolves");
    assert!(!std::ptr::eq(nested, top), "distinct shapes");

    let paths: Vec<String> = collect_shapes(shapes).into_iter().map(|(p, _)| p).collect();
    assert!(paths.contains(&"Middle.AIS".to_string()));
    assert!(paths.contains(&"AIS".to_string()));
}

#[test]
fn test_comments_do_not_produce_shapes() {
    let source = indoc! {"
        # a line comment
        server
        \"\"\"
        a block comment with server -> client inside
        \"\"\"
    "};
    let result = parse(source);
    assert_eq!(result.context.shapes.len(), 1);
    assert!(result.context.connections.is_empty());
}

#[test]
fn test_unterminated_block_comment_swallows_remainder() {
    let result = parse("\"\"\"\neverything after this is comment\nserver\nclient -> server");
    assert!(result.context.shapes.is_empty());
    assert!(result.context.connections.is_empty());
}

#[test]
fn test_connection_missing_target_recovers() {
    let result = parse("client -> ");
    assert_eq!(result.context.connections.len(), 1);
    assert_eq!(result.context.connections[0].target, "");
    assert!(result.context.shapes.contains_key("client"));
}

#[test]
fn test_container_attributes_and_nested_containers() {
    let source = indoc! {"
        network: {
          gateway: {
            shape: hexagon
          }
          direction: right
        }
    "};
    let result = parse(source);
    let network = &result.context.shapes["network"];
    assert_eq!(
        network.attributes.get("direction").map(String::as_str),
        Some("right")
    );
    let gateway = lookup_path(&result.context.shapes, "network.gateway").unwrap();
    assert_eq!(
        gateway.attributes.get("shape").map(String::as_str),
        Some("hexagon")
    );
}

#[test]
fn test_redeclaration_merges_not_duplicates() {
    let source = indoc! {"
        server: {
          api
        }
        other
        server: {
          db
          shape: cylinder
        }
    "};
    let result = parse(source);
    assert_eq!(result.context.shapes.len(), 2);
    let server = &result.context.shapes["server"];
    assert!(server.child_shape("api").is_some(), "earlier children kept");
    assert!(server.child_shape("db").is_some(), "later children merged");
    assert_eq!(
        server.attributes.get("shape").map(String::as_str),
        Some("cylinder")
    );
    // Position in the namespace is preserved.
    assert_eq!(
        result.context.shapes.keys().collect::<Vec<_>>(),
        vec!["server", "other"]
    );
}

#[test]
fn test_semicolon_separated_statements() {
    let result = parse("a; b; c");
    assert_eq!(result.context.shapes.len(), 3);
}
