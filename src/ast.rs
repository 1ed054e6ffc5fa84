// ABOUTME: AST node types, their canonical string form, and the generic
// ABOUTME: bottom-up rewrite (`modify`) the macro/quote subsystem builds on

use std::fmt;

/// The root of a parsed program: a flat sequence of statements.
/// Structurally identical to a block; distinguished only by being the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

/// Statement-level AST nodes (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Block(BlockStatement),
    Expression(ExpressionStatement),
}

impl Statement {
    /// The literal of the token that introduced this node.
    pub fn token_literal(&self) -> String {
        match self {
            Statement::Let(_) => "let".to_string(),
            Statement::Return(_) => "return".to_string(),
            Statement::Block(b) => b
                .statements
                .first()
                .map(|s| s.token_literal())
                .unwrap_or_default(),
            Statement::Expression(e) => e.expression.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "let {} = {};", s.name, s.value),
            Statement::Return(s) => write!(f, "return {};", s.value),
            Statement::Block(b) => write!(f, "{}", b),
            Statement::Expression(s) => write!(f, "{}", s.expression),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacroLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

/// Map literal pairs keep their source order (spec.md §3): later duplicate
/// keys are resolved by the evaluator, not the parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapLiteral {
    pub pairs: Vec<(Expression, Expression)>,
}

/// Expression-level AST nodes (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    StringLiteral(String),
    NullLiteral,
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    FunctionLiteral(FunctionLiteral),
    Call(CallExpression),
    ArrayLiteral(ArrayLiteral),
    Index(IndexExpression),
    MapLiteral(MapLiteral),
    MacroLiteral(MacroLiteral),
}

impl Expression {
    pub fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(id) => id.name.clone(),
            Expression::IntegerLiteral(n) => n.to_string(),
            Expression::BooleanLiteral(b) => b.to_string(),
            Expression::StringLiteral(s) => s.clone(),
            Expression::NullLiteral => "null".to_string(),
            Expression::Prefix(p) => p.operator.clone(),
            Expression::Infix(i) => i.operator.clone(),
            Expression::If(_) => "if".to_string(),
            Expression::FunctionLiteral(_) => "fn".to_string(),
            Expression::Call(c) => c.function.token_literal(),
            Expression::ArrayLiteral(_) => "[".to_string(),
            Expression::Index(i) => i.left.token_literal(),
            Expression::MapLiteral(_) => "{".to_string(),
            Expression::MacroLiteral(_) => "macro".to_string(),
        }
    }

    /// The identifier name this expression would be called as, if it's a
    /// bare identifier. Used by the macro subsystem to recognize `unquote`
    /// calls and macro-call sites without re-deriving names from display text.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            Expression::Identifier(id) => Some(&id.name),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(id) => write!(f, "{}", id.name),
            Expression::IntegerLiteral(n) => write!(f, "{}", n),
            Expression::BooleanLiteral(b) => write!(f, "{}", b),
            Expression::StringLiteral(s) => write!(f, "{}", s),
            Expression::NullLiteral => write!(f, "null"),
            Expression::Prefix(p) => write!(f, "({}{})", p.operator, p.right),
            Expression::Infix(i) => write!(f, "({} {} {})", i.left, i.operator, i.right),
            Expression::If(e) => {
                write!(f, "if{} {}", e.condition, e.consequence)?;
                if let Some(alt) = &e.alternative {
                    write!(f, "else {}", alt)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral(fl) => {
                let params: Vec<String> = fl.parameters.iter().map(|p| p.name.clone()).collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), fl.body)
            }
            Expression::Call(c) => {
                let args: Vec<String> = c.arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", c.function, args.join(", "))
            }
            Expression::ArrayLiteral(a) => {
                let elems: Vec<String> = a.elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elems.join(", "))
            }
            Expression::Index(i) => write!(f, "({}[{}])", i.left, i.index),
            Expression::MapLiteral(m) => {
                let pairs: Vec<String> = m
                    .pairs
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k, v))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Expression::MacroLiteral(ml) => {
                let params: Vec<String> = ml.parameters.iter().map(|p| p.name.clone()).collect();
                write!(f, "macro({}) {{\n{}\n}}", params.join(", "), ml.body)
            }
        }
    }
}

/// Either an expression or a statement; the unit `modify` rewrites.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Expression(Expression),
    Statement(Statement),
}

impl Node {
    pub fn into_expression(self) -> Option<Expression> {
        match self {
            Node::Expression(e) => Some(e),
            Node::Statement(_) => None,
        }
    }

    pub fn into_statement(self) -> Option<Statement> {
        match self {
            Node::Statement(s) => Some(s),
            Node::Expression(_) => None,
        }
    }
}

/// Bottom-up AST rewrite (spec.md §4.3). Recurses into every child first,
/// reassigns it with whatever the modifier returns (re-tagged to the
/// expected category), then applies the modifier to the node itself. This
/// is the sole splicing mechanism `quote`/`unquote` and macro expansion use.
pub fn modify(node: Node, modifier: &mut impl FnMut(Node) -> Node) -> Node {
    let node = match node {
        Node::Statement(Statement::Expression(mut s)) => {
            s.expression = modify_expression(s.expression, modifier);
            Node::Statement(Statement::Expression(s))
        }
        Node::Statement(Statement::Let(mut s)) => {
            s.value = modify_expression(s.value, modifier);
            Node::Statement(Statement::Let(s))
        }
        Node::Statement(Statement::Return(mut s)) => {
            s.value = modify_expression(s.value, modifier);
            Node::Statement(Statement::Return(s))
        }
        Node::Statement(Statement::Block(b)) => {
            Node::Statement(Statement::Block(modify_block(b, modifier)))
        }
        Node::Expression(Expression::Prefix(mut p)) => {
            *p.right = modify_expression((*p.right).clone(), modifier);
            Node::Expression(Expression::Prefix(p))
        }
        Node::Expression(Expression::Infix(mut i)) => {
            *i.left = modify_expression((*i.left).clone(), modifier);
            *i.right = modify_expression((*i.right).clone(), modifier);
            Node::Expression(Expression::Infix(i))
        }
        Node::Expression(Expression::Index(mut idx)) => {
            *idx.left = modify_expression((*idx.left).clone(), modifier);
            *idx.index = modify_expression((*idx.index).clone(), modifier);
            Node::Expression(Expression::Index(idx))
        }
        Node::Expression(Expression::If(mut e)) => {
            *e.condition = modify_expression((*e.condition).clone(), modifier);
            e.consequence = modify_block(e.consequence, modifier);
            e.alternative = e.alternative.map(|alt| modify_block(alt, modifier));
            Node::Expression(Expression::If(e))
        }
        Node::Expression(Expression::FunctionLiteral(mut fl)) => {
            fl.body = modify_block(fl.body, modifier);
            Node::Expression(Expression::FunctionLiteral(fl))
        }
        Node::Expression(Expression::ArrayLiteral(mut a)) => {
            a.elements = a
                .elements
                .into_iter()
                .map(|e| modify_expression(e, modifier))
                .collect();
            Node::Expression(Expression::ArrayLiteral(a))
        }
        Node::Expression(Expression::Call(mut c)) => {
            *c.function = modify_expression((*c.function).clone(), modifier);
            c.arguments = c
                .arguments
                .into_iter()
                .map(|a| modify_expression(a, modifier))
                .collect();
            Node::Expression(Expression::Call(c))
        }
        Node::Expression(Expression::MapLiteral(mut m)) => {
            m.pairs = m
                .pairs
                .into_iter()
                .map(|(k, v)| (modify_expression(k, modifier), modify_expression(v, modifier)))
                .collect();
            Node::Expression(Expression::MapLiteral(m))
        }
        other => other,
    };

    modifier(node)
}

fn modify_expression(expr: Expression, modifier: &mut impl FnMut(Node) -> Node) -> Expression {
    modify(Node::Expression(expr), modifier)
        .into_expression()
        .expect("modify preserves the Expression category for expression input")
}

fn modify_block(block: BlockStatement, modifier: &mut impl FnMut(Node) -> Node) -> BlockStatement {
    let statements = block
        .statements
        .into_iter()
        .map(|s| {
            modify(Node::Statement(s), modifier)
                .into_statement()
                .expect("modify preserves the Statement category for statement input")
        })
        .collect();
    BlockStatement { statements }
}

/// Rewrite every statement of a program (the root is otherwise identical to
/// a block, but has no single enclosing node for `modify` to operate on).
pub fn modify_program(program: Program, modifier: &mut impl FnMut(Node) -> Node) -> Program {
    let statements = program
        .statements
        .into_iter()
        .map(|s| {
            modify(Node::Statement(s), modifier)
                .into_statement()
                .expect("modify preserves the Statement category for statement input")
        })
        .collect();
    Program { statements }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expression {
        Expression::Identifier(Identifier {
            name: name.to_string(),
        })
    }

    #[test]
    fn canonical_display_parenthesizes_infix_by_precedence() {
        // Parser concerns precedence; this only checks Display composes
        // parens around whatever tree shape is built.
        let tree = Expression::Infix(InfixExpression {
            left: Box::new(Expression::IntegerLiteral(1)),
            operator: "+".to_string(),
            right: Box::new(Expression::Infix(InfixExpression {
                left: Box::new(Expression::IntegerLiteral(2)),
                operator: "*".to_string(),
                right: Box::new(Expression::IntegerLiteral(3)),
            })),
        });
        assert_eq!(tree.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn prefix_display_is_parenthesized() {
        let tree = Expression::Prefix(PrefixExpression {
            operator: "-".to_string(),
            right: Box::new(Expression::IntegerLiteral(5)),
        });
        assert_eq!(tree.to_string(), "(-5)");
    }

    #[test]
    fn modify_replaces_every_integer_literal() {
        let program = Program {
            statements: vec![Statement::Expression(ExpressionStatement {
                expression: Expression::Infix(InfixExpression {
                    left: Box::new(Expression::IntegerLiteral(1)),
                    operator: "+".to_string(),
                    right: Box::new(Expression::IntegerLiteral(2)),
                }),
            })],
        };

        let rewritten = modify_program(program, &mut |node| match node {
            Node::Expression(Expression::IntegerLiteral(n)) => {
                Node::Expression(Expression::IntegerLiteral(n + 1))
            }
            other => other,
        });

        assert_eq!(rewritten.to_string(), "(2 + 3)");
    }

    #[test]
    fn modify_recurses_into_function_body_and_array_elements() {
        let program = Program {
            statements: vec![
                Statement::Expression(ExpressionStatement {
                    expression: Expression::FunctionLiteral(FunctionLiteral {
                        parameters: vec![],
                        body: BlockStatement {
                            statements: vec![Statement::Expression(ExpressionStatement {
                                expression: Expression::IntegerLiteral(1),
                            })],
                        },
                    }),
                }),
                Statement::Expression(ExpressionStatement {
                    expression: Expression::ArrayLiteral(ArrayLiteral {
                        elements: vec![Expression::IntegerLiteral(1), Expression::IntegerLiteral(1)],
                    }),
                }),
            ],
        };

        let rewritten = modify_program(program, &mut |node| match node {
            Node::Expression(Expression::IntegerLiteral(n)) => {
                Node::Expression(Expression::IntegerLiteral(n * 10))
            }
            other => other,
        });

        assert_eq!(rewritten.statements.len(), 2);
        if let Statement::Expression(ExpressionStatement {
            expression: Expression::ArrayLiteral(a),
        }) = &rewritten.statements[1]
        {
            assert_eq!(a.elements, vec![Expression::IntegerLiteral(10), Expression::IntegerLiteral(10)]);
        } else {
            panic!("expected array literal");
        }
    }

    #[test]
    fn identifier_name_recognizes_callee_identifiers() {
        let call = Expression::Call(CallExpression {
            function: Box::new(ident("unquote")),
            arguments: vec![Expression::IntegerLiteral(1)],
        });
        if let Expression::Call(c) = &call {
            assert_eq!(c.function.identifier_name(), Some("unquote"));
        }
    }
}
