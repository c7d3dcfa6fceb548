use super::api::Rule;
use super::api::XmlParser;
use super::ast::{MarkupNode, RawName};

use pest::consumes_to;
use pest::parses_to;

#[test]
fn test_prefixed_qname() {
    parses_to! {
        parser: XmlParser,
        input: "a:data",
        rule: Rule::qname,
        tokens: [
            qname(0, 6, [
                prefix(0, 1),
                local_name(2, 6)
            ])
        ]
    };
}

#[test]
fn test_unprefixed_qname() {
    parses_to! {
        parser: XmlParser,
        input: "item",
        rule: Rule::qname,
        tokens: [
            qname(0, 4, [
                local_name(0, 4)
            ])
        ]
    };
}

#[test]
fn test_document_with_declaration_and_namespaces() {
    let doc = XmlParser::parse_document(
        "<?xml version=\"1.0\"?>\n<a:data xmlns:a=\"a\" val=\"10\">\n    <a:item/>\n</a:data>\n",
    )
    .unwrap();
    let root = doc.root().unwrap();
    assert_eq!(root.name, RawName::new(Some("a"), "data"));
    assert_eq!(root.attributes.len(), 2);
    assert_eq!(root.attributes[0].name, RawName::new(Some("xmlns"), "a"));
    assert_eq!(root.attributes[0].name.as_namespace_declaration(), Some(Some("a")));
    assert_eq!(root.attributes[1].value, "10");
    let elements: Vec<_> = root
        .children
        .iter()
        .filter_map(|c| match c {
            MarkupNode::Element(e) => Some(e),
            _ => None,
        })
        .collect();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].name, RawName::new(Some("a"), "item"));
    assert!(elements[0].children.is_empty());
}

#[test]
fn test_whitespace_before_declaration() {
    let doc = XmlParser::parse_document("\n  <?xml version=\"1.0\"?>\n<r/>\n").unwrap();
    assert_eq!(doc.root().unwrap().name, RawName::new(None, "r"));
}

#[test]
fn test_text_entities_cdata_and_comments() {
    let doc = XmlParser::parse_document(
        "<r><!-- note --><t>1 &lt; 2</t><![CDATA[<raw>]]><?pi some data?></r>",
    )
    .unwrap();
    let root = doc.root().unwrap();
    assert_eq!(root.children.len(), 4);
    assert_eq!(root.children[0], MarkupNode::Comment(" note ".to_string()));
    match &root.children[1] {
        MarkupNode::Element(t) => {
            assert_eq!(t.children, vec![MarkupNode::Text("1 < 2".to_string())])
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(root.children[2], MarkupNode::CData("<raw>".to_string()));
    assert_eq!(
        root.children[3],
        MarkupNode::ProcessingInstruction {
            target: "pi".to_string(),
            data: "some data".to_string()
        }
    );
}

#[test]
fn test_single_quoted_attribute() {
    let doc = XmlParser::parse_document("<r k='v &amp; w'/>").unwrap();
    assert_eq!(doc.root().unwrap().attributes[0].value, "v & w");
}

#[test]
fn test_default_namespace_declaration_is_recognised() {
    let doc = XmlParser::parse_document("<data xmlns=\"a\"/>").unwrap();
    let attr = &doc.root().unwrap().attributes[0];
    assert_eq!(attr.name.as_namespace_declaration(), Some(None));
}

#[test]
fn test_mismatched_end_tag_fails() {
    assert!(XmlParser::parse_document("<a><b></a></b>").is_err());
    assert!(XmlParser::parse_document("<a></b>").is_err());
}

#[test]
fn test_duplicate_attribute_fails() {
    assert!(XmlParser::parse_document("<a x=\"1\" x=\"2\"/>").is_err());
}

#[test]
fn test_two_roots_fail_but_parse_as_fragment() {
    assert!(XmlParser::parse_document("<a/><b/>").is_err());
    let nodes = XmlParser::parse_fragment("<a/>text<b/>").unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1], MarkupNode::Text("text".to_string()));
}

#[test]
fn test_unknown_entity_fails() {
    assert!(XmlParser::parse_document("<a>&nope;</a>").is_err());
}
