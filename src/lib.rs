//! # actioncore - namespace-aware object model for an ActionScript-style runtime
//!
//! The crate provides the property resolution core of a scripting runtime:
//! - Namespaces and qualified names
//! - Classes with trait tables linearized at definition time
//! - A property resolver shared by objects, XML (E4X) and typed vectors
//! - An XML parser and tree model with namespace-scoped names
//!
//! ## Quick Start
//!
//! ### Classes and namespaces
//!
//! ```
//! use actioncore::runner::api::{call_property, construct, define_class, method, name, package_ns, user_ns};
//! use actioncore::runner::context::EvalContext;
//! use actioncore::runner::ds::error::ErrorType;
//! use actioncore::runner::ds::value::Value;
//!
//! fn hello(_ctx: &mut EvalContext, _this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
//!     Ok(Value::from("hello"))
//! }
//! fn bonjour(_ctx: &mut EvalContext, _this: Value, _args: Vec<Value>) -> Result<Value, ErrorType> {
//!     Ok(Value::from("bonjour"))
//! }
//!
//! let mut ctx = EvalContext::new().unwrap();
//! let public = package_ns("");
//! let french = user_ns("urn:fr");
//! let speaker = define_class(
//!     name(&public, "Speaker"),
//!     None,
//!     vec![
//!         (name(&public, "speak"), method(hello)),
//!         (name(&french, "speak"), method(bonjour)),
//!     ],
//!     None,
//! )
//! .unwrap();
//! let s = construct(&mut ctx, &speaker, vec![]).unwrap();
//! let said = call_property(&mut ctx, &s, Some(&french), "speak", vec![]).unwrap();
//! assert_eq!(said, Value::from("bonjour"));
//! assert!(call_property(&mut ctx, &s, None, "speak", vec![]).is_err());
//! ```
//!
//! ### XML
//!
//! ```
//! use actioncore::runner::api::{construct, get_attribute, get_property, user_ns};
//! use actioncore::runner::context::EvalContext;
//! use actioncore::runner::ds::operations::type_conversion::to_string;
//! use actioncore::runner::ds::value::Value;
//!
//! let mut ctx = EvalContext::new().unwrap();
//! let xml_class = ctx.xml_class();
//! let doc = construct(
//!     &mut ctx,
//!     &xml_class,
//!     vec![Value::from("<a:data xmlns:a=\"a\" val=\"10\"><a:item/></a:data>")],
//! )
//! .unwrap();
//! let data = get_property(&mut ctx, &doc, Some(&user_ns("a")), "data").unwrap();
//! let data = get_property(&mut ctx, &data, None, 0).unwrap();
//! let val = get_attribute(&mut ctx, &data, None, "val").unwrap();
//! assert_eq!(to_string(&val), "10");
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG grammar for XML text and the raw markup tree
//! - **[`runner`]** - Runtime
//!   - **[`runner::ds`]** - Data structures (values, classes, objects, XML, vectors)
//!   - **[`runner::ds::operations`]** - Type conversion and property resolution
//!   - **[`runner::std_lib`]** - Built-in classes
//!   - **[`runner::api`]** - Entry points for hosts
//!
//! The library logs through `tracing` and never installs a subscriber.

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
