//! Tree-walking evaluator.
//!
//! Runs a validated program against its symbol table. All storage lives
//! in the symbol table; nodes find their symbol through the binding index
//! filled in during validation.

use std::{
    collections::HashMap,
    io::{self, Write},
};

use chrono::{Local, NaiveDate};

use crate::{
    ast::ast::{Node, NodeId, NodeKind},
    config::Config,
    errors::errors::{Error, RuntimeError},
    semantics::{
        binding::TODAY,
        symbol_table::{SymbolId, SymbolTable},
    },
};

use super::{
    operations::{arithmetic, comparison, read_attribute, unary, write_attribute},
    value::Value,
};

/// Remaining stack below which a call grows the stack first.
const RED_ZONE: usize = 100 * 1024;
/// Stack added on each growth.
const STACK_PER_CALL: usize = 1024 * 1024;

/// What a statement asks its enclosing block to do next.
#[derive(Debug, Clone, PartialEq)]
enum Flow {
    Next,
    Return(Value),
}

pub struct Evaluator<'a, W: Write> {
    symbols: &'a mut SymbolTable,
    /// Function and procedure definitions by node id.
    callables: HashMap<NodeId, &'a Node>,
    config: &'a Config,
    out: &'a mut W,
    depth: usize,
}

fn internal(node: &Node, message: impl Into<String>) -> Error {
    Error::new(
        RuntimeError::Internal {
            message: message.into(),
        },
        node.position.clone(),
    )
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(symbols: &'a mut SymbolTable, config: &'a Config, out: &'a mut W) -> Self {
        Evaluator {
            symbols,
            callables: HashMap::new(),
            config,
            out,
            depth: 0,
        }
    }

    fn today(&self) -> NaiveDate {
        self.config
            .today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn symbol_of(&self, node: &Node) -> Result<SymbolId, Error> {
        self.symbols.binding(node.id).ok_or_else(|| {
            internal(
                node,
                format!("{} on line {} is not bound to a symbol", node.kind_name(), node.line()),
            )
        })
    }

    fn load(&self, node: &Node) -> Result<Value, Error> {
        let symbol = self.symbol_of(node)?;
        self.symbols
            .value(symbol)
            .cloned()
            .ok_or_else(|| internal(node, "symbol has no value"))
    }

    fn store(&mut self, node: &Node, value: Value) -> Result<(), Error> {
        let symbol = self.symbol_of(node)?;
        self.symbols
            .replace_value(symbol, Some(value))
            .map(|_| ())
            .ok_or_else(|| internal(node, "unknown symbol"))
    }

    pub fn run_program(&mut self, tree: &'a Node) -> Result<(), Error> {
        let NodeKind::Program {
            definitions,
            statements,
        } = &tree.kind
        else {
            return Err(internal(tree, "expected a program"));
        };

        self.symbols.reset_values();

        // An initializer may call a callable defined further down.
        for definition in definitions {
            if let NodeKind::FunctionDef { .. } | NodeKind::ProcedureDef { .. } = &definition.kind {
                self.callables.insert(definition.id, definition);
            }
        }

        for definition in definitions {
            match &definition.kind {
                NodeKind::VariableDef { .. } => self.define_variable(definition)?,
                NodeKind::FunctionDef { .. } | NodeKind::ProcedureDef { .. } => {}
                _ => return Err(internal(definition, "expected a definition")),
            }
        }

        if let Flow::Return(value) = self.exec_block(statements)? {
            tracing::debug!(%value, "program returned early");
        }

        self.out
            .flush()
            .map_err(|error| output_error(tree, error))
    }

    fn define_variable(&mut self, node: &'a Node) -> Result<(), Error> {
        let NodeKind::VariableDef { value, .. } = &node.kind else {
            return Err(internal(node, "expected a variable definition"));
        };

        let value = self.eval(value)?;
        self.store(node, value)
    }

    fn exec_block(&mut self, statements: &'a [Node]) -> Result<Flow, Error> {
        for statement in statements {
            if let Flow::Return(value) = self.exec(statement)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Next)
    }

    fn exec(&mut self, node: &'a Node) -> Result<Flow, Error> {
        match &node.kind {
            NodeKind::Assignment { target, value } => {
                let value = self.eval(value)?;
                self.assign(target, value)?;
            }
            NodeKind::ProcedureCall { .. } => {
                self.call(node)?;
            }
            NodeKind::PrintStatement { items } => {
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(self.eval(item)?.to_string());
                }
                writeln!(self.out, "{}", rendered.join(" "))
                    .map_err(|error| output_error(node, error))?;
            }
            NodeKind::ReturnStatement { value } => return Ok(Flow::Return(self.eval(value)?)),
            NodeKind::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                return if self.condition(condition)? {
                    self.exec_block(then_branch)
                } else {
                    self.exec_block(else_branch)
                };
            }
            NodeKind::WhileLoop { condition, body } => {
                while self.condition(condition)? {
                    if let Flow::Return(value) = self.exec_block(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }
            _ => return Err(internal(node, format!("{} is not a statement", node.kind_name()))),
        }

        Ok(Flow::Next)
    }

    fn assign(&mut self, target: &'a Node, value: Value) -> Result<(), Error> {
        let NodeKind::Var { attribute, .. } = &target.kind else {
            return Err(internal(target, "assignment target is not a variable"));
        };

        let Some(attribute) = attribute.as_deref() else {
            return self.store(target, value);
        };
        let NodeKind::WriteAttribute { name } = &attribute.kind else {
            return Err(internal(attribute, "expected a writable attribute"));
        };

        let current = self.load(target)?;
        let updated = write_attribute(name, &current, &value)
            .map_err(|error| Error::new(error, attribute.position.clone()))?;
        self.store(target, updated)
    }

    fn condition(&mut self, node: &'a Node) -> Result<bool, Error> {
        match self.eval(node)? {
            Value::Int(value) => Ok(value != 0),
            other => Err(Error::new(
                RuntimeError::NonIntegerCondition {
                    type_: other.type_name(),
                },
                node.position.clone(),
            )),
        }
    }

    fn eval(&mut self, node: &'a Node) -> Result<Value, Error> {
        let at = |error: RuntimeError| Error::new(error, node.position.clone());

        match &node.kind {
            NodeKind::IntLiteral { value } => Ok(Value::Int(*value)),
            NodeKind::DateLiteral { value } => Ok(Value::Date(*value)),
            NodeKind::StringLiteral { value } => Ok(Value::Str(value.clone())),
            NodeKind::Var { attribute, .. } => {
                let value = self.load(node)?;
                match attribute.as_deref() {
                    Some(Node {
                        kind: NodeKind::ReadAttribute { name },
                        ..
                    }) => read_attribute(name, &value).map_err(at),
                    Some(other) => Err(internal(other, "expected a readable attribute")),
                    None => Ok(value),
                }
            }
            NodeKind::Operation {
                operator,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                arithmetic(*operator, left, right).map_err(at)
            }
            NodeKind::Comparison {
                operator,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                comparison(*operator, &left, &right).map_err(at)
            }
            NodeKind::UnaryOperation { operator, operand } => {
                let operand = self.eval(operand)?;
                unary(*operator, operand).map_err(at)
            }
            NodeKind::IfExpression {
                condition,
                then_value,
                else_value,
            } => {
                if self.condition(condition)? {
                    self.eval(then_value)
                } else {
                    self.eval(else_value)
                }
            }
            NodeKind::FunctionCall { name, .. } | NodeKind::ProcedureCall { name, .. } => self
                .call(node)?
                .ok_or_else(|| at(RuntimeError::VoidValue { name: name.clone() })),
            _ => Err(internal(node, format!("{} is not an expression", node.kind_name()))),
        }
    }

    /// Calls a function or procedure, returning its value if it produces one.
    fn call(&mut self, node: &'a Node) -> Result<Option<Value>, Error> {
        let (NodeKind::FunctionCall { name, arguments } | NodeKind::ProcedureCall { name, arguments }) =
            &node.kind
        else {
            return Err(internal(node, "expected a call"));
        };

        let Some(entry) = self.symbols.resolve(node.id) else {
            if name == TODAY {
                return Ok(Some(Value::Date(self.today())));
            }
            return Err(internal(node, format!("call to unbound {:?}", name)));
        };

        let definition = *self
            .callables
            .get(&entry.defining_node)
            .ok_or_else(|| internal(node, format!("no definition found for {:?}", name)))?;

        let (formals, variable_defs) = match &definition.kind {
            NodeKind::FunctionDef {
                formals,
                variable_defs,
                ..
            }
            | NodeKind::ProcedureDef {
                formals,
                variable_defs,
                ..
            } => (formals, variable_defs),
            _ => return Err(internal(definition, "expected a function or procedure")),
        };

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.eval(argument)?);
        }

        if self.depth >= self.config.max_call_depth {
            return Err(Error::new(
                RuntimeError::CallDepthExceeded {
                    limit: self.config.max_call_depth,
                },
                node.position.clone(),
            ));
        }

        // Formals and locals are global symbols, so a nested call would
        // overwrite the caller's values.
        let mut saved = Vec::with_capacity(formals.len() + variable_defs.len());
        for local in formals.iter().chain(variable_defs.iter()) {
            let symbol = self.symbol_of(local)?;
            saved.push((symbol, self.symbols.value(symbol).cloned()));
        }

        tracing::trace!(name = %name, depth = self.depth, "call");

        self.depth += 1;
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_CALL, || {
            self.invoke(definition, formals, variable_defs, values)
        });
        self.depth -= 1;

        for (symbol, value) in saved {
            self.symbols.replace_value(symbol, value);
        }

        result
    }

    fn invoke(
        &mut self,
        definition: &'a Node,
        formals: &'a [Node],
        variable_defs: &'a [Node],
        values: Vec<Value>,
    ) -> Result<Option<Value>, Error> {
        for (formal, value) in formals.iter().zip(values) {
            self.store(formal, value)?;
        }

        for variable_def in variable_defs {
            self.define_variable(variable_def)?;
        }

        match &definition.kind {
            NodeKind::FunctionDef { body, .. } => Ok(Some(self.eval(body)?)),
            NodeKind::ProcedureDef {
                name,
                return_type,
                statements,
                ..
            } => match self.exec_block(statements)? {
                Flow::Return(value) => Ok(Some(value)),
                Flow::Next if return_type.is_some() => Err(Error::new(
                    RuntimeError::MissingReturn { name: name.clone() },
                    definition.position.clone(),
                )),
                Flow::Next => Ok(None),
            },
            _ => Err(internal(definition, "expected a function or procedure")),
        }
    }
}

fn output_error(node: &Node, error: io::Error) -> Error {
    Error::new(
        RuntimeError::Output {
            message: error.to_string(),
        },
        node.position.clone(),
    )
}

/// Runs a validated program, writing its output to `out`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run_with<W: Write>(
    tree: &Node,
    symbols: &mut SymbolTable,
    config: &Config,
    out: &mut W,
) -> Result<(), Error> {
    let mut evaluator = Evaluator::new(symbols, config, out);
    evaluator.run_program(tree)
}

/// Runs a validated program with the default configuration, printing to stdout.
pub fn run(tree: &Node, symbols: &mut SymbolTable) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(tree, symbols, &Config::default(), &mut out)
}
