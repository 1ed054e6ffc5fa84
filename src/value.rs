// ABOUTME: The value model: tagged runtime values, the hash-key structure
// ABOUTME: backing maps, and the integer flyweight cache

use crate::ast::{BlockStatement, Expression, Identifier};
use crate::env::Environment;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A native function backing a built-in. Built-ins never fail with a Rust
/// `Err` — an argument-count or type problem is reported the same way any
/// other runtime error is, as a `Value::Error`.
pub type BuiltinFn = fn(&[Value]) -> Value;

#[derive(Clone)]
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

#[derive(Clone)]
pub struct MacroValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

/// Runtime values (spec.md §3). `Integer` carries an `Rc` rather than a bare
/// `i64` so the small-integer flyweight (see `make_integer`) can give two
/// evaluations of the same literal the same object identity.
#[derive(Clone)]
pub enum Value {
    Integer(Rc<i64>),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Value>),
    Map(MapValue),
    Function(Rc<FunctionValue>),
    Builtin(BuiltinFn),
    /// Produced only by evaluating a `return` statement; unwrapped by the
    /// nearest enclosing call frame. Never surfaces to user code.
    ReturnValue(Box<Value>),
    /// The runtime error sentinel. Short-circuits every evaluator rule.
    Error(String),
    Quote(Box<Expression>),
    Macro(Rc<MacroValue>),
}

impl Value {
    pub fn boolean(b: bool) -> Value {
        Value::Boolean(b)
    }

    pub fn null() -> Value {
        Value::Null
    }

    pub fn error(message: impl Into<String>) -> Value {
        Value::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Value::ReturnValue(_))
    }

    /// Truthy is defined as "not FALSE and not NULL" (spec.md §4.5): every
    /// integer including zero, and every string, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Map(_) => "MAP",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Quote(_) => "QUOTE",
            Value::Macro(_) => "MACRO",
        }
    }

    /// The hash key backing map storage, for values in the hashable subset
    /// (Integer, Boolean, String). Anything else fails with the exact
    /// message the evaluator surfaces as a runtime error.
    pub fn hash_key(&self) -> Result<HashKey, String> {
        match self {
            Value::Integer(n) => Ok(HashKey {
                tag: "INTEGER",
                hash: **n as u64,
            }),
            Value::Boolean(b) => Ok(HashKey {
                tag: "BOOLEAN",
                hash: if *b { 1 } else { 0 },
            }),
            Value::String(s) => Ok(HashKey {
                tag: "STRING",
                hash: fnv1a(s.as_bytes()),
            }),
            other => Err(format!("unusable as hash key: {}", other.type_tag())),
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// `(type-tag, 64-bit hash)` — the hash-key space is partitioned by type tag
/// so an integer and a boolean with numerically equal hashes never collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    tag: &'static str,
    hash: u64,
}

/// A mapping from hash-key to the original key/value pair. The key value is
/// retained (not just its hash) so iteration and display recover the source
/// form (spec.md §3).
#[derive(Clone, Default)]
pub struct MapValue {
    pairs: HashMap<HashKey, (Value, Value)>,
}

impl MapValue {
    pub fn new() -> Self {
        MapValue {
            pairs: HashMap::new(),
        }
    }

    /// Later duplicate keys overwrite earlier ones (spec.md §4.5).
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), String> {
        let hash_key = key.hash_key()?;
        self.pairs.insert(hash_key, (key, value));
        Ok(())
    }

    pub fn get(&self, key: &Value) -> Result<Option<&Value>, String> {
        let hash_key = key.hash_key()?;
        Ok(self.pairs.get(&hash_key).map(|(_, v)| v))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.pairs.values().map(|(k, v)| (k, v))
    }
}

thread_local! {
    /// The small-integer flyweight: a fixed-size table indexed by
    /// `value + 128`, covering `[-128, 128]` (spec.md §9).
    static INT_CACHE: RefCell<Vec<Option<Rc<i64>>>> = RefCell::new(vec![None; 257]);
}

/// Construct an integer value, sharing identity with any prior evaluation
/// of the same small integer. Identity outside `[-128, 128]` is not
/// guaranteed (spec.md §3).
pub fn make_integer(n: i64) -> Value {
    if (-128..=128).contains(&n) {
        let idx = (n + 128) as usize;
        let cached = INT_CACHE.with(|cache| {
            let mut cache = cache.borrow_mut();
            if cache[idx].is_none() {
                cache[idx] = Some(Rc::new(n));
            }
            cache[idx].clone().unwrap()
        });
        Value::Integer(cached)
    } else {
        Value::Integer(Rc::new(n))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
            Value::Array(items) => {
                let elems: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", elems.join(", "))
            }
            Value::Map(map) => {
                let pairs: Vec<String> =
                    map.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Value::Function(func) => {
                let params: Vec<String> =
                    func.parameters.iter().map(|p| p.name.clone()).collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), func.body)
            }
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::ReturnValue(inner) => write!(f, "{}", inner),
            Value::Error(msg) => write!(f, "ERROR: {}", msg),
            Value::Quote(node) => write!(f, "QUOTE({})", node),
            Value::Macro(_) => write!(f, "macro"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_in_flyweight_range_share_identity() {
        let a = make_integer(42);
        let b = make_integer(42);
        match (&a, &b) {
            (Value::Integer(x), Value::Integer(y)) => assert!(Rc::ptr_eq(x, y)),
            _ => panic!("expected integers"),
        }

        let boundary_a = make_integer(-128);
        let boundary_b = make_integer(-128);
        match (&boundary_a, &boundary_b) {
            (Value::Integer(x), Value::Integer(y)) => assert!(Rc::ptr_eq(x, y)),
            _ => panic!("expected integers"),
        }

        let boundary_a = make_integer(128);
        let boundary_b = make_integer(128);
        match (&boundary_a, &boundary_b) {
            (Value::Integer(x), Value::Integer(y)) => assert!(Rc::ptr_eq(x, y)),
            _ => panic!("expected integers"),
        }
    }

    #[test]
    fn integers_outside_flyweight_range_are_not_required_to_share_identity() {
        let a = make_integer(2024);
        let b = make_integer(2024);
        match (&a, &b) {
            (Value::Integer(x), Value::Integer(y)) => assert!(!Rc::ptr_eq(x, y)),
            _ => panic!("expected integers"),
        }
    }

    #[test]
    fn hash_keys_partition_by_type_tag() {
        let one = make_integer(1);
        let truthy = Value::Boolean(true);
        assert_ne!(one.hash_key().unwrap(), truthy.hash_key().unwrap());
    }

    #[test]
    fn hash_keys_equal_for_equal_contents() {
        let a = Value::String("two".to_string());
        let b = Value::String("two".to_string());
        assert_eq!(a.hash_key().unwrap(), b.hash_key().unwrap());
    }

    #[test]
    fn non_hashable_value_reports_type_in_error() {
        let arr = Value::Array(vec![]);
        let err = arr.hash_key().unwrap_err();
        assert_eq!(err, "unusable as hash key: ARRAY");
    }

    #[test]
    fn display_forms_match_spec() {
        assert_eq!(make_integer(-5).to_string(), "-5");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::String("hi".to_string()).to_string(), "hi");
        assert_eq!(
            Value::Array(vec![make_integer(1), make_integer(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(Value::Error("boom".to_string()).to_string(), "ERROR: boom");
    }

    #[test]
    fn truthiness_excludes_only_false_and_null() {
        assert!(make_integer(0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Null.is_truthy());
    }
}
