// ABOUTME: The tree-walking evaluator — a post-order walk threading an
// ABOUTME: environment and short-circuiting on return/error sentinels

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::env::Environment;
use crate::quote;
use crate::value::{make_integer, FunctionValue, MapValue, Value};
use std::rc::Rc;

/// Evaluate an entire program: the last statement's value is the result,
/// except that a `ReturnValue` is unwrapped at this boundary and an
/// `Error` short-circuits immediately (spec.md §4.5).
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;
    for statement in &program.statements {
        result = eval_statement(statement, env);
        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

/// Evaluate a block's statements in order, stopping early on a return or
/// error sentinel *without* unwrapping the return — only the program
/// boundary and a function call frame unwrap it (spec.md §4.5).
pub fn eval_block_statement(block: &BlockStatement, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;
    for statement in &block.statements {
        result = eval_statement(statement, env);
        if result.is_return() || result.is_error() {
            return result;
        }
    }
    result
}

fn eval_statement(statement: &Statement, env: &Rc<Environment>) -> Value {
    match statement {
        Statement::Expression(s) => eval_expression(&s.expression, env),
        Statement::Return(s) => {
            let value = eval_expression(&s.value, env);
            if value.is_error() {
                value
            } else {
                Value::ReturnValue(Box::new(value))
            }
        }
        Statement::Let(s) => {
            let value = eval_expression(&s.value, env);
            if value.is_error() {
                return value;
            }
            env.set(s.name.name.clone(), value.clone());
            value
        }
        Statement::Block(b) => eval_block_statement(b, env),
    }
}

pub fn eval_expression(expr: &Expression, env: &Rc<Environment>) -> Value {
    match expr {
        Expression::IntegerLiteral(n) => make_integer(*n),
        Expression::BooleanLiteral(b) => Value::Boolean(*b),
        Expression::StringLiteral(s) => Value::String(s.clone()),
        Expression::NullLiteral => Value::Null,
        Expression::Identifier(id) => eval_identifier(&id.name, env),
        Expression::Prefix(p) => {
            let right = eval_expression(&p.right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(&p.operator, right)
        }
        Expression::Infix(i) => {
            let left = eval_expression(&i.left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(&i.right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(&i.operator, left, right)
        }
        Expression::If(e) => eval_if_expression(e, env),
        Expression::FunctionLiteral(f) => Value::Function(Rc::new(FunctionValue {
            parameters: f.parameters.clone(),
            body: f.body.clone(),
            env: Rc::clone(env),
        })),
        Expression::Call(c) => {
            if c.function.identifier_name() == Some("quote") {
                return eval_quote_call(c, env);
            }
            let function = eval_expression(&c.function, env);
            if function.is_error() {
                return function;
            }
            let args = match eval_expressions(&c.arguments, env) {
                Ok(args) => args,
                Err(err) => return err,
            };
            apply_function(function, &args)
        }
        Expression::ArrayLiteral(a) => match eval_expressions(&a.elements, env) {
            Ok(elements) => Value::Array(elements),
            Err(err) => err,
        },
        Expression::Index(i) => {
            let left = eval_expression(&i.left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(&i.index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        Expression::MapLiteral(m) => eval_map_literal(m, env),
        Expression::MacroLiteral(_) => {
            Value::error("macro literals may only appear as the value of a top-level let")
        }
    }
}

fn eval_quote_call(call: &crate::ast::CallExpression, env: &Rc<Environment>) -> Value {
    if call.arguments.len() != 1 {
        return Value::error(format!(
            "wrong number of arguments: expected 1, got {}",
            call.arguments.len()
        ));
    }
    quote::quote(call.arguments[0].clone(), env, &|expr, env| {
        eval_expression(&expr, &env)
    })
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Value {
    match env.get(name) {
        Some(value) => value,
        None => Value::error(format!("identifier not found: {}", name)),
    }
}

fn eval_expressions(exprs: &[Expression], env: &Rc<Environment>) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => eval_bang_operator(right),
        "-" => match right {
            Value::Integer(n) => make_integer(-*n),
            other => Value::error(format!("unkown operator: -{}", other.type_tag())),
        },
        other => Value::error(format!("unkown operator: {}{}", other, right.type_tag())),
    }
}

fn eval_bang_operator(value: Value) -> Value {
    match value {
        Value::Boolean(true) => Value::Boolean(false),
        Value::Boolean(false) => Value::Boolean(true),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, **l, **r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        (Value::Boolean(l), Value::Boolean(r)) if matches!(operator, "==" | "!=") => {
            eval_identity_infix(operator, *l == *r)
        }
        (Value::Null, _) | (_, Value::Null) if matches!(operator, "==" | "!=") => {
            eval_identity_infix(operator, matches!((&left, &right), (Value::Null, Value::Null)))
        }
        _ if left.type_tag() != right.type_tag() => Value::error(format!(
            "type mismatch: {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
        _ => Value::error(format!(
            "unkown operator: {} {} {}",
            left.type_tag(),
            operator,
            right.type_tag()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => make_integer(left + right),
        "-" => make_integer(left - right),
        "*" => make_integer(left * right),
        "/" => make_integer(left / right),
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "<=" => Value::Boolean(left <= right),
        ">=" => Value::Boolean(left >= right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        other => Value::error(format!("unkown operator: INTEGER {} INTEGER", other)),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::String(format!("{}{}", left, right)),
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "<=" => Value::Boolean(left <= right),
        ">=" => Value::Boolean(left >= right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        other => Value::error(format!("unkown operator: STRING {} STRING", other)),
    }
}

/// Booleans and NULL only support `==`/`!=`, compared by singleton
/// identity (spec.md §4.5) — `identical` is already that comparison since
/// both sides were matched as the same variant.
fn eval_identity_infix(operator: &str, identical: bool) -> Value {
    match operator {
        "==" => Value::Boolean(identical),
        "!=" => Value::Boolean(!identical),
        other => Value::error(format!("unkown operator: {}", other)),
    }
}

fn eval_if_expression(expr: &crate::ast::IfExpression, env: &Rc<Environment>) -> Value {
    let condition = eval_expression(&expr.condition, env);
    if condition.is_error() {
        return condition;
    }
    if condition.is_truthy() {
        eval_block_statement(&expr.consequence, env)
    } else if let Some(alternative) = &expr.alternative {
        eval_block_statement(alternative, env)
    } else {
        Value::Null
    }
}

fn apply_function(function: Value, args: &[Value]) -> Value {
    match function {
        Value::Function(func) => {
            if args.len() != func.parameters.len() {
                return Value::error(format!(
                    "wrong number of arguments: expected {}, got {}",
                    func.parameters.len(),
                    args.len()
                ));
            }
            let call_env = Environment::with_parent(Rc::clone(&func.env));
            for (param, arg) in func.parameters.iter().zip(args) {
                call_env.set(param.name.clone(), arg.clone());
            }
            let result = eval_block_statement(&func.body, &call_env);
            match result {
                Value::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(builtin) => builtin(args),
        other => Value::error(format!("not a function: {}", other.type_tag())),
    }
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(items), Value::Integer(idx)) => {
            let idx = **idx;
            if idx < 0 || idx as usize >= items.len() {
                Value::Null
            } else {
                items[idx as usize].clone()
            }
        }
        (Value::Map(map), key) => match map.get(key) {
            Ok(Some(value)) => value.clone(),
            Ok(None) => Value::Null,
            Err(type_tag) => Value::error(format!("unusable as hash key: {}", type_tag)),
        },
        (Value::Array(_), other) => {
            Value::error(format!("index operator not supported: ARRAY[{}]", other.type_tag()))
        }
        (other, _) => Value::error(format!("index operator not supported: {}", other.type_tag())),
    }
}

fn eval_map_literal(literal: &crate::ast::MapLiteral, env: &Rc<Environment>) -> Value {
    let mut map = MapValue::new();
    for (key_expr, value_expr) in &literal.pairs {
        let key = eval_expression(key_expr, env);
        if key.is_error() {
            return key;
        }
        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }
        if let Err(type_tag) = map.insert(key, value) {
            return Value::error(format!("unusable as hash key: {}", type_tag));
        }
    }
    Value::Map(map)
}
