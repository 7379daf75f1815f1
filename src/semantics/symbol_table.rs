//! Flat, program-wide symbol table.
//!
//! Variables, formal arguments, functions and procedures share one
//! namespace. Resolution results are kept in a side index from node ids
//! to symbols so the tree itself stays immutable after parsing.

use std::collections::HashMap;

use crate::{
    ast::ast::{Node, NodeId},
    evaluator::value::Value,
};

pub type SymbolId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Arg,
    Func,
    Proc,
}

/// Call signature of a function or procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub arity: usize,
    /// `None` for procedures declared without a return type.
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub defining_node: NodeId,
    pub line: u32,
    /// Current runtime value. Only variables and arguments carry one.
    pub value: Option<Value>,
    /// Only functions and procedures carry one.
    pub signature: Option<Signature>,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<SymbolEntry>,
    lookup: HashMap<String, SymbolId>,
    bindings: HashMap<NodeId, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Adds a new symbol defined by `node` and binds the node to it.
    ///
    /// Callers check for redefinition first; defining an existing name
    /// shadows the older entry in lookups.
    pub fn define(
        &mut self,
        name: &str,
        kind: SymbolKind,
        node: &Node,
        signature: Option<Signature>,
    ) -> SymbolId {
        let id = self.symbols.len();
        self.symbols.push(SymbolEntry {
            name: name.to_string(),
            kind,
            defining_node: node.id,
            line: node.line(),
            value: None,
            signature,
        });
        self.lookup.insert(name.to_string(), id);
        self.bind(node.id, id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.lookup.get(name).copied()
    }

    pub fn lookup_entry(&self, name: &str) -> Option<&SymbolEntry> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolEntry> {
        self.symbols.get(id)
    }

    pub fn bind(&mut self, node: NodeId, symbol: SymbolId) {
        self.bindings.insert(node, symbol);
    }

    /// The symbol a node was bound to during validation.
    pub fn binding(&self, node: NodeId) -> Option<SymbolId> {
        self.bindings.get(&node).copied()
    }

    pub fn resolve(&self, node: NodeId) -> Option<&SymbolEntry> {
        self.binding(node).and_then(|id| self.get(id))
    }

    pub fn value(&self, id: SymbolId) -> Option<&Value> {
        self.symbols.get(id).and_then(|entry| entry.value.as_ref())
    }

    /// Replaces the stored value of a symbol, returning the previous one.
    ///
    /// Returns `None` without storing anything when `id` is unknown.
    pub fn replace_value(&mut self, id: SymbolId, value: Option<Value>) -> Option<Option<Value>> {
        self.symbols
            .get_mut(id)
            .map(|entry| std::mem::replace(&mut entry.value, value))
    }

    /// Gives every variable and argument the initial value `0`.
    pub fn reset_values(&mut self) {
        for entry in &mut self.symbols {
            if matches!(entry.kind, SymbolKind::Var | SymbolKind::Arg) {
                entry.value = Some(Value::Int(0));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolEntry)> {
        self.symbols.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
