use crate::runner::ds::value::Value;

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";
pub const TYPE_STR_XML: &str = "xml";

pub fn get_type(a: &Value) -> &'static str {
    match a {
        Value::Undefined => TYPE_STR_UNDEFINED,
        Value::Null => TYPE_STR_NULL,
        Value::Boolean(_) => TYPE_STR_BOOLEAN,
        Value::String(_) => TYPE_STR_STRING,
        Value::Number(_) => TYPE_STR_NUMBER,
        Value::Function(_) => TYPE_STR_FUNCTION,
        Value::Xml(_) | Value::XmlList(_) => TYPE_STR_XML,
        Value::Namespace(_) | Value::Object(_) | Value::Class(_) | Value::Vector(_) => {
            TYPE_STR_OBJECT
        }
    }
}

pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub fn to_string(v: &Value) -> String {
    match v {
        Value::Undefined => TYPE_STR_UNDEFINED.to_string(),
        Value::Null => TYPE_STR_NULL.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(*n),
        Value::Namespace(ns) => ns.uri().to_string(),
        Value::Object(o) => format!("[object {}]", o.borrow().class().name().local_name()),
        Value::Class(c) => format!("[class {}]", c.name().local_name()),
        Value::Function(_) => "function Function() {}".to_string(),
        Value::Xml(x) => x.to_string_value(),
        Value::XmlList(l) => l.to_string_value(),
        Value::Vector(v) => v.borrow().join(","),
    }
}

pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16)
            .map(|i| i as f64)
            .unwrap_or(f64::NAN);
    }
    match t {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => t.parse::<f64>().unwrap_or(f64::NAN),
    }
}

pub fn to_number(v: &Value) -> f64 {
    match v {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s),
        Value::Xml(_) | Value::XmlList(_) => string_to_number(&to_string(v)),
        _ => f64::NAN,
    }
}

pub fn to_boolean(v: &Value) -> bool {
    match v {
        Value::Undefined | Value::Null => false,
        Value::Boolean(b) => *b,
        Value::Number(n) => !(n.is_nan() || *n == 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn to_integer_modulo(v: &Value, modulo: f64) -> f64 {
    let n = to_number(v);
    if n.is_nan() || n.is_infinite() {
        return 0.0;
    }
    let m = n.trunc() % modulo;
    if m < 0.0 {
        m + modulo
    } else {
        m
    }
}

pub fn to_uint_32(v: &Value) -> u32 {
    to_integer_modulo(v, 4294967296.0) as u32
}

pub fn to_int_32(v: &Value) -> i32 {
    to_uint_32(v) as i32
}

/// Index value of a canonical array-index string ("0", "17"); leading zeros,
/// signs and fractions are not indices.
pub fn canonical_numeric_index_string(s: &str) -> Option<usize> {
    if s.is_empty() || (s.len() > 1 && s.starts_with('0')) {
        return None;
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<usize>().ok()
}
