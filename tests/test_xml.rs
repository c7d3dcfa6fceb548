//! Tests for the XML data model: parsing with namespace declarations,
//! child and attribute queries, mutation, and serialization.

extern crate actioncore;

use actioncore::runner::api::{
    call_property, construct, delete_property, get_attribute, get_property, package_ns,
    set_attribute, set_property, user_ns,
};
use actioncore::runner::config::{RuntimeConfig, XmlSettings};
use actioncore::runner::context::EvalContext;
use actioncore::runner::ds::error::ErrorType;
use actioncore::runner::ds::value::Value;

fn new_ctx() -> EvalContext {
    EvalContext::new().unwrap()
}

fn xml(ctx: &mut EvalContext, text: &str) -> Value {
    let class = ctx.xml_class();
    construct(ctx, &class, vec![Value::from(text)]).unwrap()
}

/// The first top-level element of a parsed document.
fn root_element(ctx: &mut EvalContext, text: &str) -> Value {
    let doc = xml(ctx, text);
    let elements = call_property(ctx, &doc, None, "elements", vec![]).unwrap();
    get_property(ctx, &elements, None, 0).unwrap()
}

fn call0(ctx: &mut EvalContext, receiver: &Value, name: &str) -> Value {
    call_property(ctx, receiver, None, name, vec![]).unwrap()
}

fn text_of(ctx: &mut EvalContext, receiver: &Value) -> String {
    match call0(ctx, receiver, "toString") {
        Value::String(s) => s,
        other => panic!("toString returned {:?}", other),
    }
}

/// Arena slots behind an XML value.
fn arena_slots(value: &Value) -> usize {
    match value {
        Value::Xml(x) => x.tree().borrow().len(),
        other => panic!("expected an XML value, got {:?}", other),
    }
}

fn markup_of(ctx: &mut EvalContext, receiver: &Value) -> String {
    match call0(ctx, receiver, "toXMLString") {
        Value::String(s) => s,
        other => panic!("toXMLString returned {:?}", other),
    }
}

// ============================================================================
// Namespaces
// ============================================================================

mod namespace_tests {
    use super::*;

    fn check_item_in_namespace_a(text: &str) {
        let mut ctx = new_ctx();
        let doc = xml(&mut ctx, text);
        let data_list = get_property(&mut ctx, &doc, Some(&user_ns("a")), "data").unwrap();
        let data = get_property(&mut ctx, &data_list, None, 0).unwrap();
        let items = get_property(&mut ctx, &data, Some(&user_ns("a")), "item").unwrap();
        assert_eq!(call0(&mut ctx, &items, "length"), Value::from(1));
        let item = get_property(&mut ctx, &items, None, 0).unwrap();
        assert_eq!(call0(&mut ctx, &item, "nodeKind"), Value::from("element"));
        assert_eq!(call0(&mut ctx, &item, "localName"), Value::from("item"));
        assert_eq!(
            call0(&mut ctx, &item, "namespace"),
            Value::Namespace(user_ns("a"))
        );
        let val = get_attribute(&mut ctx, &data, None, "val").unwrap();
        assert_eq!(text_of(&mut ctx, &val), "10");
    }

    #[test]
    fn test_prefixed_declaration() {
        check_item_in_namespace_a("<a:data xmlns:a=\"a\" val=\"10\"><a:item/></a:data>");
    }

    #[test]
    fn test_default_declaration_is_equivalent() {
        check_item_in_namespace_a("<data xmlns=\"a\" val=\"10\"><item/></data>");
    }

    #[test]
    fn test_declaration_after_leading_whitespace() {
        check_item_in_namespace_a(
            "\n<?xml version=\"1.0\"?>\n<a:data xmlns:a=\"a\" val=\"10\">\n    <a:item/>\n</a:data>\n",
        );
    }

    #[test]
    fn test_child_queries_collect_across_namespaces() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r xmlns:p=\"u1\"><p:i>1</p:i><i>2</i></r>");
        let all = get_property(&mut ctx, &r, None, "i").unwrap();
        assert_eq!(call0(&mut ctx, &all, "length"), Value::from(2));
        let prefixed = get_property(&mut ctx, &r, Some(&user_ns("u1")), "i").unwrap();
        assert_eq!(text_of(&mut ctx, &prefixed), "1");
        let plain = get_property(&mut ctx, &r, Some(&package_ns("")), "i").unwrap();
        assert_eq!(text_of(&mut ctx, &plain), "2");
        let none = get_property(&mut ctx, &r, Some(&user_ns("u2")), "i").unwrap();
        assert_eq!(call0(&mut ctx, &none, "length"), Value::from(0));
    }

    #[test]
    fn test_nearest_default_declaration_wins() {
        let mut ctx = new_ctx();
        let r = root_element(
            &mut ctx,
            "<r xmlns=\"outer\" xmlns:o=\"outer\"><m xmlns=\"inner\"><o:x/><y/></m></r>",
        );
        let m = get_property(&mut ctx, &r, Some(&user_ns("inner")), "m").unwrap();
        let x = get_property(&mut ctx, &m, Some(&user_ns("outer")), "x").unwrap();
        let y = get_property(&mut ctx, &m, Some(&user_ns("inner")), "y").unwrap();
        assert_eq!(call0(&mut ctx, &x, "length"), Value::from(1));
        assert_eq!(call0(&mut ctx, &y, "length"), Value::from(1));
    }

    #[test]
    fn test_namespace_lookup_by_prefix() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r xmlns:p=\"u1\"><c/></r>");
        let c = get_property(&mut ctx, &r, None, "c").unwrap();
        let c = get_property(&mut ctx, &c, None, 0).unwrap();
        let ns = call_property(&mut ctx, &c, None, "namespace", vec![Value::from("p")]).unwrap();
        assert_eq!(ns, Value::Namespace(user_ns("u1")));
        let prefix = get_property(&mut ctx, &ns, None, "prefix").unwrap();
        assert_eq!(prefix, Value::from("p"));
        assert_eq!(
            call_property(&mut ctx, &c, None, "namespace", vec![Value::from("q")]).unwrap(),
            Value::Undefined
        );
    }

    #[test]
    fn test_unbound_prefix_fails_to_parse() {
        let mut ctx = new_ctx();
        let class = ctx.xml_class();
        assert!(matches!(
            construct(&mut ctx, &class, vec![Value::from("<p:r/>")]),
            Err(ErrorType::SyntaxError(_))
        ));
    }
}

// ============================================================================
// Attributes
// ============================================================================

mod attribute_tests {
    use super::*;

    const TWO_X: &str = "<r xmlns:p=\"u1\" xmlns:q=\"u2\" p:x=\"1\" q:x=\"2\" y=\"3\"/>";

    #[test]
    fn test_wildcard_attribute_lookup_is_ambiguous() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, TWO_X);
        assert!(matches!(
            get_attribute(&mut ctx, &r, None, "x"),
            Err(ErrorType::AmbiguousReferenceError(_))
        ));
        let p = get_attribute(&mut ctx, &r, Some(&user_ns("u1")), "x").unwrap();
        assert_eq!(text_of(&mut ctx, &p), "1");
        assert_eq!(call0(&mut ctx, &p, "nodeKind"), Value::from("attribute"));
    }

    #[test]
    fn test_star_collects_every_attribute() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, TWO_X);
        let all = get_attribute(&mut ctx, &r, None, "*").unwrap();
        assert_eq!(call0(&mut ctx, &all, "length"), Value::from(3));
        let only_u2 = get_attribute(&mut ctx, &r, Some(&user_ns("u2")), "*").unwrap();
        assert_eq!(text_of(&mut ctx, &only_u2), "2");
    }

    #[test]
    fn test_missing_attribute_is_an_empty_list() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, TWO_X);
        let missing = get_attribute(&mut ctx, &r, None, "nope").unwrap();
        assert_eq!(call0(&mut ctx, &missing, "length"), Value::from(0));
        assert_eq!(text_of(&mut ctx, &missing), "");
    }

    #[test]
    fn test_set_attribute_updates_or_adds() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r y=\"3\"/>");
        set_attribute(&mut ctx, &r, None, "y", &Value::from(4)).unwrap();
        set_attribute(&mut ctx, &r, None, "z", &Value::from("new")).unwrap();
        set_attribute(&mut ctx, &r, Some(&user_ns("u9")), "w", &Value::from(1)).unwrap();
        assert_eq!(
            markup_of(&mut ctx, &r),
            "<r xmlns:ns0=\"u9\" y=\"4\" z=\"new\" ns0:w=\"1\"/>"
        );
        let w = get_attribute(&mut ctx, &r, Some(&user_ns("u9")), "w").unwrap();
        assert_eq!(text_of(&mut ctx, &w), "1");
    }

    #[test]
    fn test_unprefixed_attribute_follows_default_namespace() {
        let mut ctx = new_ctx();
        let data = root_element(&mut ctx, "<data xmlns=\"a\" val=\"10\"/>");
        let val = get_attribute(&mut ctx, &data, Some(&user_ns("a")), "val").unwrap();
        assert_eq!(text_of(&mut ctx, &val), "10");
        let public = get_attribute(&mut ctx, &data, Some(&package_ns("")), "val").unwrap();
        assert_eq!(call0(&mut ctx, &public, "length"), Value::from(0));

        set_attribute(&mut ctx, &data, None, "extra", &Value::from(1)).unwrap();
        assert_eq!(
            markup_of(&mut ctx, &data),
            "<data xmlns=\"a\" val=\"10\" extra=\"1\"/>"
        );
        let extra = get_attribute(&mut ctx, &data, Some(&user_ns("a")), "extra").unwrap();
        assert_eq!(text_of(&mut ctx, &extra), "1");
    }

    #[test]
    fn test_attributes_on_non_xml_are_type_errors() {
        let mut ctx = new_ctx();
        assert!(matches!(
            get_attribute(&mut ctx, &Value::from("s"), None, "x"),
            Err(ErrorType::TypeError(_))
        ));
    }
}

// ============================================================================
// Children: assignment, deletion, appending
// ============================================================================

mod mutation_tests {
    use super::*;

    #[test]
    fn test_assigning_existing_child_replaces_its_text() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r><a>1</a><a>2</a><b/></r>");
        set_property(&mut ctx, &r, None, "a", Value::from("x")).unwrap();
        assert_eq!(markup_of(&mut ctx, &r), "<r>\n  <a>x</a>\n  <b/>\n</r>");
    }

    #[test]
    fn test_assigning_missing_child_appends_element() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r/>");
        set_property(&mut ctx, &r, None, "c", Value::from(3)).unwrap();
        assert_eq!(markup_of(&mut ctx, &r), "<r>\n  <c>3</c>\n</r>");
        let c = get_property(&mut ctx, &r, None, "c").unwrap();
        assert_eq!(text_of(&mut ctx, &c), "3");
    }

    #[test]
    fn test_delete_removes_matching_children() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r><a/><b/><a/></r>");
        assert!(delete_property(&mut ctx, &r, None, "a").unwrap());
        assert!(!delete_property(&mut ctx, &r, None, "a").unwrap());
        assert_eq!(markup_of(&mut ctx, &r), "<r>\n  <b/>\n</r>");
    }

    #[test]
    fn test_repeated_assignment_reuses_arena_slots() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r><c>0</c></r>");
        set_property(&mut ctx, &r, None, "c", Value::from(0)).unwrap();
        let slots = arena_slots(&r);
        for i in 1..=1000 {
            set_property(&mut ctx, &r, None, "c", Value::from(i)).unwrap();
        }
        assert_eq!(arena_slots(&r), slots);
        let c = get_property(&mut ctx, &r, None, "c").unwrap();
        assert_eq!(text_of(&mut ctx, &c), "1000");
    }

    #[test]
    fn test_deleted_child_stays_usable_while_held() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r><c>7</c></r>");
        let held = get_property(&mut ctx, &r, None, "c").unwrap();
        let held = get_property(&mut ctx, &held, None, 0).unwrap();
        assert!(delete_property(&mut ctx, &r, None, "c").unwrap());
        set_property(&mut ctx, &r, None, "d", Value::from("new")).unwrap();
        assert_eq!(text_of(&mut ctx, &held), "7");
        assert_eq!(call0(&mut ctx, &held, "parent"), Value::Undefined);
        assert_eq!(markup_of(&mut ctx, &r), "<r>\n  <d>new</d>\n</r>");
    }

    #[test]
    fn test_append_child_copies_across_trees() {
        let mut ctx = new_ctx();
        let p = root_element(&mut ctx, "<p xmlns:x=\"u\"><x:q/></p>");
        let q = get_property(&mut ctx, &p, Some(&user_ns("u")), "q").unwrap();

        let same_decl = root_element(&mut ctx, "<s xmlns:x=\"u\"/>");
        call_property(&mut ctx, &same_decl, None, "appendChild", vec![q.clone()]).unwrap();
        assert_eq!(markup_of(&mut ctx, &same_decl), "<s xmlns:x=\"u\">\n  <x:q/>\n</s>");

        let bare = root_element(&mut ctx, "<t/>");
        call_property(&mut ctx, &bare, None, "appendChild", vec![q]).unwrap();
        assert_eq!(markup_of(&mut ctx, &bare), "<t>\n  <x:q xmlns:x=\"u\"/>\n</t>");

        // The source keeps its child.
        let still = call0(&mut ctx, &p, "children");
        assert_eq!(call0(&mut ctx, &still, "length"), Value::from(1));
    }

    #[test]
    fn test_append_child_parses_markup_and_wraps_text() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r/>");
        call_property(&mut ctx, &r, None, "appendChild", vec![Value::from("<z/>")]).unwrap();
        call_property(&mut ctx, &r, None, "appendChild", vec![Value::from("tail")]).unwrap();
        let kinds = call0(&mut ctx, &r, "children");
        let first = get_property(&mut ctx, &kinds, None, 0).unwrap();
        let second = get_property(&mut ctx, &kinds, None, 1).unwrap();
        assert_eq!(call0(&mut ctx, &first, "nodeKind"), Value::from("element"));
        assert_eq!(call0(&mut ctx, &second, "nodeKind"), Value::from("text"));
        assert_eq!(call0(&mut ctx, &first, "childIndex"), Value::from(0));
        assert_eq!(call0(&mut ctx, &first, "parent"), r);
    }

    #[test]
    fn test_append_into_own_subtree_is_type_error() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r><c/></r>");
        let c = get_property(&mut ctx, &r, None, "c").unwrap();
        let c = get_property(&mut ctx, &c, None, 0).unwrap();
        assert!(matches!(
            call_property(&mut ctx, &c, None, "appendChild", vec![r.clone()]),
            Err(ErrorType::TypeError(_))
        ));
    }
}

// ============================================================================
// Values, indexing and serialization
// ============================================================================

mod value_tests {
    use super::*;

    #[test]
    fn test_index_zero_of_xml_is_itself() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r/>");
        assert_eq!(get_property(&mut ctx, &r, None, 0).unwrap(), r);
        assert!(matches!(
            get_property(&mut ctx, &r, None, 1),
            Err(ErrorType::RangeError(_))
        ));
        let list = call0(&mut ctx, &r, "children");
        assert!(matches!(
            get_property(&mut ctx, &list, None, 0),
            Err(ErrorType::RangeError(_))
        ));
    }

    #[test]
    fn test_index_under_a_user_namespace_is_reference_error() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r><c/></r>");
        let list = get_property(&mut ctx, &r, None, "c").unwrap();
        assert!(matches!(
            get_property(&mut ctx, &list, Some(&user_ns("x")), 0),
            Err(ErrorType::ReferenceError(_))
        ));
        assert!(matches!(
            get_property(&mut ctx, &r, Some(&user_ns("x")), 0),
            Err(ErrorType::ReferenceError(_))
        ));
        assert!(get_property(&mut ctx, &list, Some(&package_ns("")), 0).is_ok());
    }

    #[test]
    fn test_simple_and_complex_content() {
        let mut ctx = new_ctx();
        let r = root_element(&mut ctx, "<r><a>hi</a></r>");
        let a = get_property(&mut ctx, &r, None, "a").unwrap();
        assert_eq!(text_of(&mut ctx, &a), "hi");
        assert_eq!(call0(&mut ctx, &r, "hasComplexContent"), Value::from(true));
        assert_eq!(call0(&mut ctx, &r, "hasSimpleContent"), Value::from(false));
        assert_eq!(text_of(&mut ctx, &r), "<r><a>hi</a></r>");
    }

    #[test]
    fn test_constructor_inputs() {
        let mut ctx = new_ctx();
        let class = ctx.xml_class();
        let text = construct(&mut ctx, &class, vec![Value::from(5)]).unwrap();
        assert_eq!(call0(&mut ctx, &text, "nodeKind"), Value::from("text"));
        assert_eq!(text_of(&mut ctx, &text), "5");

        let doc = xml(&mut ctx, "<r/>");
        assert_eq!(call0(&mut ctx, &doc, "nodeKind"), Value::from("document"));
        let copy = construct(&mut ctx, &class, vec![doc.clone()]).unwrap();
        assert_ne!(copy, doc);
        assert_eq!(markup_of(&mut ctx, &copy), "<r/>");
    }

    #[test]
    fn test_pretty_printing_follows_configuration() {
        let source = "<r><a>1</a><b/></r>";
        let mut pretty = new_ctx();
        let r = root_element(&mut pretty, source);
        assert_eq!(markup_of(&mut pretty, &r), "<r>\n  <a>1</a>\n  <b/>\n</r>");

        let config = RuntimeConfig::new()
            .with_xml_settings(XmlSettings::default().with_pretty_printing(false));
        let mut compact = EvalContext::with_config(config).unwrap();
        let r = root_element(&mut compact, source);
        assert_eq!(markup_of(&mut compact, &r), source);
    }

    #[test]
    fn test_xml_list_methods() {
        let mut ctx = new_ctx();
        let class = ctx.xml_list_class();
        let list = construct(&mut ctx, &class, vec![Value::from("<a k=\"1\">x</a><b k=\"2\"/>")]).unwrap();
        assert_eq!(call0(&mut ctx, &list, "length"), Value::from(2));
        let attrs = call0(&mut ctx, &list, "attributes");
        assert_eq!(text_of(&mut ctx, &attrs), "12");
        let text = call0(&mut ctx, &list, "text");
        assert_eq!(text_of(&mut ctx, &text), "x");
        assert_eq!(markup_of(&mut ctx, &list), "<a k=\"1\">x</a>\n<b k=\"2\"/>");
    }
}
