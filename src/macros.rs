// ABOUTME: Two-phase macro expansion: pull `let NAME = macro(...) {...}`
// ABOUTME: definitions out of the program, then rewrite call sites against
// ABOUTME: the registry they built

use crate::ast::{modify_program, Expression, Identifier, Node, Program, Statement};
use crate::env::Environment;
use crate::eval::eval_block_statement;
use crate::value::{MacroValue, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Macros registered by `define_macros`, keyed by the name they were bound
/// to. Looked up by callee name during `expand_macros`.
#[derive(Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Rc<MacroValue>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        MacroRegistry {
            macros: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<MacroValue>> {
        self.macros.get(name).cloned()
    }
}

/// First phase (spec.md §6.3): find every top-level `let NAME = macro(...)
/// {...}` statement, register it, and remove it from the program. Removal
/// happens in reverse index order so earlier indices stay valid as later
/// ones are deleted.
pub fn define_macros(program: &mut Program, registry: &mut MacroRegistry, env: &Rc<Environment>) {
    let mut definition_indices = Vec::new();

    for (i, statement) in program.statements.iter().enumerate() {
        if let Some((name, macro_value)) = as_macro_definition(statement, env) {
            registry.macros.insert(name, macro_value);
            definition_indices.push(i);
        }
    }

    for i in definition_indices.into_iter().rev() {
        program.statements.remove(i);
    }
}

fn as_macro_definition(
    statement: &Statement,
    env: &Rc<Environment>,
) -> Option<(String, Rc<MacroValue>)> {
    let Statement::Let(let_stmt) = statement else {
        return None;
    };
    let Expression::MacroLiteral(literal) = &let_stmt.value else {
        return None;
    };
    let macro_value = Rc::new(MacroValue {
        parameters: literal.parameters.clone(),
        body: literal.body.clone(),
        env: Rc::clone(env),
    });
    Some((let_stmt.name.name.clone(), macro_value))
}

/// Second phase (spec.md §6.3): rewrite every call site whose callee
/// resolves to a registered macro. Each argument is quoted (not
/// evaluated) before being bound; the macro body is evaluated with those
/// bindings and must produce a `Value::Quote`, whose captured node
/// replaces the call expression. The expansion itself is never
/// re-expanded — `modify_program`'s bottom-up walk only ever visits each
/// original node once.
pub fn expand_macros(program: Program, registry: &MacroRegistry) -> Result<Program, String> {
    let mut expansion_error = None;

    let expanded = modify_program(program, &mut |node| {
        if expansion_error.is_some() {
            return node;
        }
        let Node::Expression(Expression::Call(call)) = &node else {
            return node;
        };
        let Some(name) = call.function.identifier_name() else {
            return node;
        };
        let Some(macro_value) = registry.get(name) else {
            return node;
        };

        if call.arguments.len() != macro_value.parameters.len() {
            expansion_error = Some(format!(
                "macro {} called with {} argument(s), expected {}",
                name,
                call.arguments.len(),
                macro_value.parameters.len()
            ));
            return node;
        }

        let extended_env = Environment::with_parent(Rc::clone(&macro_value.env));
        for (param, arg) in macro_value.parameters.iter().zip(&call.arguments) {
            extended_env.set(param.name.clone(), Value::Quote(Box::new(arg.clone())));
        }

        let evaluated = eval_block_statement(&macro_value.body, &extended_env);
        match evaluated {
            Value::Quote(quoted_node) => Node::Expression(*quoted_node),
            Value::Error(msg) => {
                expansion_error = Some(format!("macro {} expansion failed: {}", name, msg));
                node
            }
            other => {
                expansion_error = Some(format!(
                    "macro {} did not expand to a quoted AST node, got {}",
                    name,
                    other.type_tag()
                ));
                node
            }
        }
    });

    match expansion_error {
        Some(err) => Err(err),
        None => Ok(expanded),
    }
}

#[allow(dead_code)]
fn macro_parameter_names(params: &[Identifier]) -> Vec<&str> {
    params.iter().map(|p| p.name.as_str()).collect()
}
