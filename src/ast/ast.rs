use std::fmt::Display;

use chrono::NaiveDate;

use crate::Position;

/// Stable identifier of a node, unique within one parsed program.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithmeticOperator::Add => write!(f, "+"),
            ArithmeticOperator::Subtract => write!(f, "-"),
            ArithmeticOperator::Multiply => write!(f, "*"),
            ArithmeticOperator::Divide => write!(f, "/"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    Less,
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonOperator::Equal => write!(f, "="),
            ComparisonOperator::Less => write!(f, "<"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Minus => write!(f, "-"),
        }
    }
}

/// A node of the syntax tree.
///
/// Nodes are immutable once parsed. Symbol resolution results live in
/// [`crate::semantics::symbol_table::SymbolTable`], keyed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        definitions: Vec<Node>,
        statements: Vec<Node>,
    },
    VariableDef {
        name: String,
        value: Box<Node>,
    },
    FormalArg {
        name: String,
        arg_type: String,
    },
    FunctionDef {
        name: String,
        formals: Vec<Node>,
        return_type: String,
        variable_defs: Vec<Node>,
        body: Box<Node>,
    },
    ProcedureDef {
        name: String,
        formals: Vec<Node>,
        /// `None` for procedures declared without `RETURN <type>`.
        return_type: Option<String>,
        variable_defs: Vec<Node>,
        statements: Vec<Node>,
    },
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    /// Identifier use. `attribute` holds a `ReadAttribute` (`d'year`) or,
    /// as an assignment target, a `WriteAttribute` (`d.year`).
    Var {
        name: String,
        attribute: Option<Box<Node>>,
    },
    ReadAttribute {
        name: String,
    },
    WriteAttribute {
        name: String,
    },
    PrintStatement {
        items: Vec<Node>,
    },
    IfStatement {
        condition: Box<Node>,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },
    WhileLoop {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    Comparison {
        operator: ComparisonOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Operation {
        operator: ArithmeticOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryOperation {
        operator: UnaryOperator,
        operand: Box<Node>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Node>,
    },
    ProcedureCall {
        name: String,
        arguments: Vec<Node>,
    },
    IfExpression {
        condition: Box<Node>,
        then_value: Box<Node>,
        else_value: Box<Node>,
    },
    ReturnStatement {
        value: Box<Node>,
    },
    IntLiteral {
        value: i64,
    },
    DateLiteral {
        value: NaiveDate,
    },
    StringLiteral {
        value: String,
    },
}

impl Node {
    pub fn new(id: NodeId, position: Position, kind: NodeKind) -> Self {
        Node { id, position, kind }
    }

    pub fn line(&self) -> u32 {
        self.position.line()
    }

    /// Direct children, in the order they appear in the source.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Program {
                definitions,
                statements,
            } => definitions.iter().chain(statements.iter()).collect(),
            NodeKind::VariableDef { value, .. } => vec![&**value],
            NodeKind::FunctionDef {
                formals,
                variable_defs,
                body,
                ..
            } => formals
                .iter()
                .chain(variable_defs.iter())
                .chain(std::iter::once(&**body))
                .collect(),
            NodeKind::ProcedureDef {
                formals,
                variable_defs,
                statements,
                ..
            } => formals
                .iter()
                .chain(variable_defs.iter())
                .chain(statements.iter())
                .collect(),
            NodeKind::Assignment { target, value } => vec![&**target, &**value],
            NodeKind::Var { attribute, .. } => attribute.iter().map(|node| &**node).collect(),
            NodeKind::PrintStatement { items } => items.iter().collect(),
            NodeKind::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => std::iter::once(&**condition)
                .chain(then_branch.iter())
                .chain(else_branch.iter())
                .collect(),
            NodeKind::WhileLoop { condition, body } => std::iter::once(&**condition)
                .chain(body.iter())
                .collect(),
            NodeKind::Comparison { left, right, .. } | NodeKind::Operation { left, right, .. } => {
                vec![&**left, &**right]
            }
            NodeKind::UnaryOperation { operand, .. } => vec![&**operand],
            NodeKind::FunctionCall { arguments, .. } | NodeKind::ProcedureCall { arguments, .. } => {
                arguments.iter().collect()
            }
            NodeKind::IfExpression {
                condition,
                then_value,
                else_value,
            } => vec![&**condition, &**then_value, &**else_value],
            NodeKind::ReturnStatement { value } => vec![&**value],
            NodeKind::FormalArg { .. }
            | NodeKind::ReadAttribute { .. }
            | NodeKind::WriteAttribute { .. }
            | NodeKind::IntLiteral { .. }
            | NodeKind::DateLiteral { .. }
            | NodeKind::StringLiteral { .. } => vec![],
        }
    }

    /// Lowercase name of the node kind, as shown in logs and tree dumps.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Program { .. } => "program",
            NodeKind::VariableDef { .. } => "variable_def",
            NodeKind::FormalArg { .. } => "formal_arg",
            NodeKind::FunctionDef { .. } => "function_def",
            NodeKind::ProcedureDef { .. } => "procedure_def",
            NodeKind::Assignment { .. } => "assign",
            NodeKind::Var { .. } => "var",
            NodeKind::ReadAttribute { .. } => "read_attribute",
            NodeKind::WriteAttribute { .. } => "write_attribute",
            NodeKind::PrintStatement { .. } => "print_statement",
            NodeKind::IfStatement { .. } => "if_statement",
            NodeKind::WhileLoop { .. } => "while_loop",
            NodeKind::Comparison { .. } => "comparison",
            NodeKind::Operation { .. } => "operation",
            NodeKind::UnaryOperation { .. } => "unary_operation",
            NodeKind::FunctionCall { .. } => "func_call",
            NodeKind::ProcedureCall { .. } => "proc_call",
            NodeKind::IfExpression { .. } => "if_expression",
            NodeKind::ReturnStatement { .. } => "return_statement",
            NodeKind::IntLiteral { .. } => "int_literal",
            NodeKind::DateLiteral { .. } => "date_literal",
            NodeKind::StringLiteral { .. } => "string_literal",
        }
    }
}
