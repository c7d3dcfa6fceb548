//! End to end scenarios combining classes, namespaces, vectors and XML
//! through the host-facing api.

extern crate actioncore;

use actioncore::runner::api::{
    call_property, construct, define_class, get_attribute, get_property, method, name,
    package_ns, post_increment_property, set_property, user_ns,
};
use actioncore::runner::context::EvalContext;
use actioncore::runner::ds::error::ErrorType;
use actioncore::runner::ds::value::Value;

fn new_ctx() -> EvalContext {
    EvalContext::new().unwrap()
}

fn english(_ctx: &mut EvalContext, _this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(Value::from("Hello"))
}

fn spanish(_ctx: &mut EvalContext, _this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
    Ok(Value::from("Hola"))
}

#[test]
fn test_speaker_dispatches_by_namespace() {
    let mut ctx = new_ctx();
    let public = package_ns("");
    let es = user_ns("http://example.org/es");
    let speaker = define_class(
        name(&package_ns("demo"), "Speaker"),
        None,
        vec![
            (name(&public, "speak"), method(english)),
            (name(&es, "speak"), method(spanish)),
        ],
        None,
    )
    .unwrap();
    let s = construct(&mut ctx, &speaker, vec![]).unwrap();
    assert_eq!(
        call_property(&mut ctx, &s, Some(&public), "speak", vec![]).unwrap(),
        Value::from("Hello")
    );
    assert_eq!(
        call_property(&mut ctx, &s, Some(&es), "speak", vec![]).unwrap(),
        Value::from("Hola")
    );
    assert!(matches!(
        call_property(&mut ctx, &s, None, "speak", vec![]),
        Err(ErrorType::AmbiguousReferenceError(_))
    ));
}

#[test]
fn test_vector_of_numbers() {
    let mut ctx = new_ctx();
    let class = ctx.vector_float_class();
    let v = construct(&mut ctx, &class, vec![]).unwrap();
    call_property(&mut ctx, &v, None, "push", vec![Value::from(10.5)]).unwrap();
    post_increment_property(&mut ctx, &v, None, 0).unwrap();
    assert_eq!(get_property(&mut ctx, &v, None, 0).unwrap(), Value::from(11.5));
    assert_eq!(get_property(&mut ctx, &v, None, "length").unwrap(), Value::from(1));
    assert!(matches!(
        get_property(&mut ctx, &v, None, 1),
        Err(ErrorType::RangeError(_))
    ));
    set_property(&mut ctx, &v, None, 1, Value::from(2)).unwrap();
    assert!(matches!(
        set_property(&mut ctx, &v, None, 3, Value::from(2)),
        Err(ErrorType::RangeError(_))
    ));
}

#[test]
fn test_xml_document_with_namespaces() {
    let mut ctx = new_ctx();
    let class = ctx.xml_class();
    let root = construct(
        &mut ctx,
        &class,
        vec![Value::from("<a:data xmlns:a=\"a\" val=\"10\"><a:item/></a:data>")],
    )
    .unwrap();
    let a = user_ns("a");
    let data_list = get_property(&mut ctx, &root, Some(&a), "data").unwrap();
    let data = get_property(&mut ctx, &data_list, None, 0).unwrap();
    let item_list = get_property(&mut ctx, &data, Some(&a), "item").unwrap();
    let item = get_property(&mut ctx, &item_list, None, 0).unwrap();
    assert_eq!(
        call_property(&mut ctx, &item, None, "nodeKind", vec![]).unwrap(),
        Value::from("element")
    );
    let val = get_attribute(&mut ctx, &data, None, "val").unwrap();
    assert_eq!(
        call_property(&mut ctx, &val, None, "toString", vec![]).unwrap(),
        Value::from("10")
    );
    // Repeating a lookup without mutation yields the same node.
    let again = get_property(&mut ctx, &item_list, None, 0).unwrap();
    assert_eq!(item, again);
}

#[test]
fn test_string_methods_through_resolution() {
    let mut ctx = new_ctx();
    let s = Value::from("abc");
    assert_eq!(get_property(&mut ctx, &s, None, "length").unwrap(), Value::from(3));
    assert_eq!(
        call_property(&mut ctx, &s, None, "toUpperCase", vec![]).unwrap(),
        Value::from("ABC")
    );
    assert!(matches!(
        set_property(&mut ctx, &s, None, "length", Value::from(1)),
        Err(ErrorType::ReferenceError(_))
    ));
    assert!(matches!(
        get_property(&mut ctx, &Value::Undefined, None, "x"),
        Err(ErrorType::TypeError(_))
    ));
}
