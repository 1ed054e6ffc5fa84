// ABOUTME: quote/unquote evaluation — wraps an expression as data, and
// ABOUTME: splices evaluated unquote(...) calls back into it as AST

use crate::ast::{
    modify, ArrayLiteral, Expression, FunctionLiteral, MapLiteral, Node,
};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

/// Evaluate a `quote(expr)` call: `expr` is returned unevaluated, as a
/// `Value::Quote`, except that every `unquote(inner)` call nested inside it
/// is replaced first by the AST form of `inner` evaluated in `env`
/// (spec.md §6.1-6.2).
pub fn quote(node: Expression, env: &Rc<Environment>, eval_fn: &dyn Fn(Expression, Rc<Environment>) -> Value) -> Value {
    let node = eval_unquote_calls(node, env, eval_fn);
    Value::Quote(Box::new(node))
}

fn eval_unquote_calls(
    node: Expression,
    env: &Rc<Environment>,
    eval_fn: &dyn Fn(Expression, Rc<Environment>) -> Value,
) -> Expression {
    let env = Rc::clone(env);
    let rewritten = modify(Node::Expression(node), &mut |n| {
        let Node::Expression(expr) = &n else {
            return n;
        };
        if !is_unquote_call(expr) {
            return n;
        }
        let Expression::Call(call) = expr else {
            return n;
        };
        if call.arguments.len() != 1 {
            return n;
        }
        let arg = call.arguments[0].clone();
        let value = eval_fn(arg, Rc::clone(&env));
        Node::Expression(value_to_ast(value))
    });
    rewritten
        .into_expression()
        .expect("modify preserves the Expression category for expression input")
}

fn is_unquote_call(expr: &Expression) -> bool {
    match expr {
        Expression::Call(call) => call.function.identifier_name() == Some("unquote"),
        _ => false,
    }
}

/// Convert an evaluated value back into an AST node it can be spliced in
/// as, so `unquote` results read naturally inside the surrounding quote
/// (spec.md §6.2). Quoted values splice their captured node through
/// verbatim; collections recursively convert their contents; anything
/// else (including Null, Error, Builtin, Macro) becomes `null`.
fn value_to_ast(value: Value) -> Expression {
    match value {
        Value::Integer(n) => Expression::IntegerLiteral(*n),
        Value::Boolean(b) => Expression::BooleanLiteral(b),
        Value::String(s) => Expression::StringLiteral(s),
        Value::Array(items) => Expression::ArrayLiteral(ArrayLiteral {
            elements: items.into_iter().map(value_to_ast).collect(),
        }),
        Value::Map(map) => Expression::MapLiteral(MapLiteral {
            pairs: map
                .iter()
                .map(|(k, v)| (value_to_ast(k.clone()), value_to_ast(v.clone())))
                .collect(),
        }),
        Value::Function(func) => Expression::FunctionLiteral(FunctionLiteral {
            parameters: func.parameters.clone(),
            body: func.body.clone(),
        }),
        Value::Quote(node) => *node,
        _ => Expression::NullLiteral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CallExpression, Identifier, InfixExpression};
    use crate::value::make_integer;

    fn ident(name: &str) -> Expression {
        Expression::Identifier(Identifier {
            name: name.to_string(),
        })
    }

    #[test]
    fn quote_without_unquote_returns_node_verbatim() {
        let env = Environment::new();
        let node = Expression::IntegerLiteral(5);
        let result = quote(node.clone(), &env, &|_, _| Value::Null);
        match result {
            Value::Quote(n) => assert_eq!(*n, node),
            _ => panic!("expected quote"),
        }
    }

    #[test]
    fn unquote_splices_in_evaluated_integer() {
        let env = Environment::new();
        let call = Expression::Call(CallExpression {
            function: Box::new(ident("unquote")),
            arguments: vec![Expression::Infix(InfixExpression {
                left: Box::new(Expression::IntegerLiteral(2)),
                operator: "+".to_string(),
                right: Box::new(Expression::IntegerLiteral(2)),
            })],
        });

        let result = quote(call, &env, &|_, _| make_integer(4));
        match result {
            Value::Quote(n) => assert_eq!(*n, Expression::IntegerLiteral(4)),
            _ => panic!("expected quote"),
        }
    }

    #[test]
    fn unquote_of_a_quote_value_splices_in_its_captured_node() {
        let env = Environment::new();
        let call = Expression::Call(CallExpression {
            function: Box::new(ident("unquote")),
            arguments: vec![ident("quoted_infix")],
        });

        let captured = Expression::Infix(InfixExpression {
            left: Box::new(Expression::IntegerLiteral(1)),
            operator: "+".to_string(),
            right: Box::new(Expression::IntegerLiteral(1)),
        });
        let captured_clone = captured.clone();

        let result = quote(call, &env, &move |_, _| {
            Value::Quote(Box::new(captured_clone.clone()))
        });
        match result {
            Value::Quote(n) => assert_eq!(*n, captured),
            _ => panic!("expected quote"),
        }
    }
}
