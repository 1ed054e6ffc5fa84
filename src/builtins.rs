// ABOUTME: The fixed set of built-in functions available in every
// ABOUTME: environment, registered once at startup

use crate::env::Environment;
use crate::value::{make_integer, Value};
use std::rc::Rc;

/// Bind every built-in under its name in `env`. Built-ins live alongside
/// ordinary bindings and can be shadowed by `let`, but are never removed
/// (spec.md §4.5).
pub fn register_builtins(env: &Rc<Environment>) {
    env.set("len".to_string(), Value::Builtin(builtin_len));
    env.set("first".to_string(), Value::Builtin(builtin_first));
    env.set("last".to_string(), Value::Builtin(builtin_last));
    env.set("tail".to_string(), Value::Builtin(builtin_tail));
    env.set("push".to_string(), Value::Builtin(builtin_push));
    env.set("print".to_string(), Value::Builtin(builtin_print));
    env.set("typeOf".to_string(), Value::Builtin(builtin_type_of));
}

fn arity_error(expected: &str, actual: usize) -> Value {
    Value::error(format!(
        "wrong number of arguments: expected {}, got {}",
        expected, actual
    ))
}

fn not_supported(name: &str, got: &Value) -> Value {
    Value::error(format!(
        "argument to `{}` not supported, got {}",
        name,
        got.type_tag()
    ))
}

fn builtin_len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return arity_error("1", args.len());
    }
    match &args[0] {
        Value::String(s) => make_integer(s.chars().count() as i64),
        Value::Array(items) => make_integer(items.len() as i64),
        other => not_supported("len", other),
    }
}

fn builtin_first(args: &[Value]) -> Value {
    if args.len() != 1 {
        return arity_error("1", args.len());
    }
    match &args[0] {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => not_supported("first", other),
    }
}

fn builtin_last(args: &[Value]) -> Value {
    if args.len() != 1 {
        return arity_error("1", args.len());
    }
    match &args[0] {
        Value::Array(items) => items.last().cloned().unwrap_or(Value::Null),
        other => not_supported("last", other),
    }
}

fn builtin_tail(args: &[Value]) -> Value {
    if args.len() != 1 {
        return arity_error("1", args.len());
    }
    match &args[0] {
        Value::Array(items) => {
            if items.is_empty() {
                Value::Null
            } else {
                Value::Array(items[1..].to_vec())
            }
        }
        other => not_supported("tail", other),
    }
}

fn builtin_push(args: &[Value]) -> Value {
    if args.len() < 2 {
        return arity_error("at least 2", args.len());
    }
    match &args[0] {
        Value::Array(items) => {
            let mut new_items = items.clone();
            new_items.extend_from_slice(&args[1..]);
            Value::Array(new_items)
        }
        other => not_supported("push", other),
    }
}

fn builtin_print(args: &[Value]) -> Value {
    let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", rendered.join(" "));
    Value::Null
}

fn builtin_type_of(args: &[Value]) -> Value {
    if args.len() != 1 {
        return arity_error("1", args.len());
    }
    Value::String(args[0].type_tag().to_string())
}
