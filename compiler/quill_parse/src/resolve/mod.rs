//! Static binding analysis.
//!
//! The parser drives a [`Resolver`] while it builds the tree: it opens and
//! closes blocks and functions, declares bindings, and records every
//! identifier reference. Declarations are turned into slots immediately.
//! References are queued and resolved by [`Resolver::resolve_all`] once the
//! whole program is known, so a reference may name a binding declared later
//! in an enclosing scope (hoisted functions, mutual recursion).
//!
//! Resolution walks the block chain outward from the reference:
//!
//! - found in the same function: `Local(slot)`
//! - found in an enclosing function: `Captured(index)`, with capture
//!   entries added to every function between the use and the declaration
//! - not found: `Global(name)`

use std::rc::Rc;

use quill_diagnostic::ErrorCode;
use quill_ir::{
    BindingKind, Capture, CaptureSource, FrameLayout, FuncId, LocalBinding, Position, Program,
    Storage, VarId, Variable,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ParseError;

/// Words that cannot name a binding or be referenced.
pub const RESERVED_WORDS: &[&str] = &[
    "class",
    "debugger",
    "delete",
    "enum",
    "eval",
    "export",
    "extends",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "super",
    "var",
    "void",
    "with",
    "yield",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

type FnIdx = usize;
type BlockIdx = usize;
type DeclIdx = usize;

struct FunctionScope {
    func: FuncId,
    parent: Option<FnIdx>,
    depth: u32,
    locals: Vec<LocalBinding>,
    captures: Vec<Capture>,
    capture_of: FxHashMap<DeclIdx, u32>,
    /// Block that was current when the function was opened.
    outer_block: Option<BlockIdx>,
}

struct BlockFrame {
    parent: Option<BlockIdx>,
    names: FxHashMap<Rc<str>, DeclIdx>,
    fresh_slots: Vec<u32>,
}

struct Decl {
    name: Rc<str>,
    kind: BindingKind,
    slot: u32,
    function: FnIdx,
    seq: u32,
}

struct PendingRef {
    var: VarId,
    name: Rc<str>,
    block: BlockIdx,
    function: FnIdx,
    seq: u32,
    assigned: bool,
    position: Position,
}

pub(crate) struct Resolver {
    functions: Vec<FunctionScope>,
    blocks: Vec<BlockFrame>,
    decls: Vec<Decl>,
    pending: Vec<PendingRef>,
    pending_of: FxHashMap<VarId, usize>,
    current_function: FnIdx,
    current_block: BlockIdx,
    seq: u32,
}

impl Resolver {
    pub(crate) fn new() -> Self {
        Resolver {
            functions: Vec::new(),
            blocks: Vec::new(),
            decls: Vec::new(),
            pending: Vec::new(),
            pending_of: FxHashMap::default(),
            current_function: 0,
            current_block: 0,
            seq: 0,
        }
    }

    fn next_seq(&mut self) -> u32 {
        self.seq += 1;
        self.seq
    }

    fn push_block(&mut self, parent: Option<BlockIdx>) -> BlockIdx {
        self.blocks.push(BlockFrame {
            parent,
            names: FxHashMap::default(),
            fresh_slots: Vec::new(),
        });
        self.blocks.len() - 1
    }

    pub(crate) fn start_block(&mut self) {
        self.current_block = self.push_block(Some(self.current_block));
    }

    /// Close the current block, returning the slots declared in it.
    pub(crate) fn end_block(&mut self) -> Vec<u32> {
        let block = &mut self.blocks[self.current_block];
        let fresh = std::mem::take(&mut block.fresh_slots);
        if let Some(parent) = block.parent {
            self.current_block = parent;
        }
        fresh
    }

    /// Open a function scope with its root block.
    ///
    /// Non-arrow functions get `this` and `arguments` in their first two
    /// slots; arrows see the enclosing ones.
    pub(crate) fn start_function(&mut self, func: FuncId, is_arrow: bool) {
        let is_root = self.functions.is_empty();
        let parent = (!is_root).then_some(self.current_function);
        let depth = parent.map_or(0, |p| self.functions[p].depth + 1);
        let outer_block = (!is_root).then_some(self.current_block);
        self.functions.push(FunctionScope {
            func,
            parent,
            depth,
            locals: Vec::new(),
            captures: Vec::new(),
            capture_of: FxHashMap::default(),
            outer_block,
        });
        self.current_function = self.functions.len() - 1;
        self.current_block = self.push_block(outer_block);

        if !is_arrow && !is_root {
            self.add_decl("this".into(), BindingKind::Param, false);
            self.add_decl("arguments".into(), BindingKind::Param, false);
        }
    }

    /// Close the current function, returning the slots declared directly in
    /// its body.
    pub(crate) fn end_function(&mut self) -> Vec<u32> {
        let fresh = std::mem::take(&mut self.blocks[self.current_block].fresh_slots);
        let scope = &self.functions[self.current_function];
        if let (Some(parent), Some(outer)) = (scope.parent, scope.outer_block) {
            self.current_function = parent;
            self.current_block = outer;
        }
        fresh
    }

    fn add_decl(&mut self, name: Rc<str>, kind: BindingKind, fresh: bool) -> u32 {
        let seq = self.next_seq();
        let function = &mut self.functions[self.current_function];
        let slot = function.locals.len() as u32;
        function.locals.push(LocalBinding {
            name: name.clone(),
            kind,
            slot,
        });
        self.decls.push(Decl {
            name: name.clone(),
            kind,
            slot,
            function: self.current_function,
            seq,
        });
        let block = &mut self.blocks[self.current_block];
        block.names.insert(name, self.decls.len() - 1);
        if fresh {
            block.fresh_slots.push(slot);
        }
        slot
    }

    fn check_declarable(&self, name: &str, position: Position) -> Result<(), ParseError> {
        if is_reserved(name) {
            return Err(reserved(name, position));
        }
        if self.blocks[self.current_block].names.contains_key(name) {
            return Err(ParseError::new(
                ErrorCode::E2001,
                format!("Identifier '{name}' has already been declared"),
                position,
            ));
        }
        Ok(())
    }

    /// Declare a `let`, `const` or function-declaration binding in the
    /// current block.
    pub(crate) fn declare_variable(
        &mut self,
        program: &mut Program,
        name: &str,
        kind: BindingKind,
        position: Position,
    ) -> Result<VarId, ParseError> {
        self.check_declarable(name, position)?;
        let name: Rc<str> = name.into();
        let slot = self.add_decl(name.clone(), kind, true);
        Ok(program.alloc_var(Variable {
            name,
            storage: Storage::Local(slot),
            constant: kind == BindingKind::Const,
            position,
        }))
    }

    /// Declare a parameter of the current function.
    pub(crate) fn declare_param(
        &mut self,
        program: &mut Program,
        name: &str,
        position: Position,
    ) -> Result<VarId, ParseError> {
        self.check_declarable(name, position)?;
        let name: Rc<str> = name.into();
        let slot = self.add_decl(name.clone(), BindingKind::Param, false);
        Ok(program.alloc_var(Variable {
            name,
            storage: Storage::Local(slot),
            constant: false,
            position,
        }))
    }

    /// Bind a named function expression's own name inside its body.
    pub(crate) fn declare_self(
        &mut self,
        program: &mut Program,
        name: &str,
        position: Position,
    ) -> Result<VarId, ParseError> {
        if is_reserved(name) {
            return Err(reserved(name, position));
        }
        let name: Rc<str> = name.into();
        let slot = self.add_decl(name.clone(), BindingKind::Function, false);
        Ok(program.alloc_var(Variable {
            name,
            storage: Storage::Local(slot),
            constant: false,
            position,
        }))
    }

    /// Record a reference; its storage is filled in by `resolve_all`.
    pub(crate) fn reference(
        &mut self,
        program: &mut Program,
        name: &str,
        position: Position,
    ) -> Result<VarId, ParseError> {
        if is_reserved(name) {
            return Err(reserved(name, position));
        }
        let name: Rc<str> = name.into();
        let var = program.alloc_var(Variable {
            name: name.clone(),
            storage: Storage::Global(name.clone()),
            constant: false,
            position,
        });
        let seq = self.next_seq();
        self.pending_of.insert(var, self.pending.len());
        self.pending.push(PendingRef {
            var,
            name,
            block: self.current_block,
            function: self.current_function,
            seq,
            assigned: false,
            position,
        });
        Ok(var)
    }

    /// Flag a recorded reference as the target of a write.
    pub(crate) fn mark_assigned(&mut self, var: VarId) {
        if let Some(&idx) = self.pending_of.get(&var) {
            self.pending[idx].assigned = true;
        }
    }

    fn lookup(&self, block: BlockIdx, name: &str) -> Option<DeclIdx> {
        let mut current = Some(block);
        while let Some(idx) = current {
            let frame = &self.blocks[idx];
            if let Some(&decl) = frame.names.get(name) {
                return Some(decl);
            }
            current = frame.parent;
        }
        None
    }

    fn capture(&mut self, function: FnIdx, decl: DeclIdx) -> u32 {
        if let Some(&idx) = self.functions[function].capture_of.get(&decl) {
            return idx;
        }
        let owner = self.decls[decl].function;
        let parent = self.functions[function].parent.unwrap_or(owner);
        let source = if parent == owner {
            CaptureSource::Local(self.decls[decl].slot)
        } else {
            CaptureSource::Captured(self.capture(parent, decl))
        };
        let depth = self.functions[function].depth - self.functions[owner].depth;
        let scope = &mut self.functions[function];
        let idx = scope.captures.len() as u32;
        scope.captures.push(Capture {
            name: self.decls[decl].name.clone(),
            depth,
            source,
        });
        scope.capture_of.insert(decl, idx);
        idx
    }

    /// Assign storage to every recorded reference and write the finished
    /// frame layouts into `program`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn resolve_all(mut self, program: &mut Program) -> Result<(), ParseError> {
        let pending = std::mem::take(&mut self.pending);
        for reference in &pending {
            let storage = match self.lookup(reference.block, &reference.name) {
                None => Storage::Global(reference.name.clone()),
                Some(decl_idx) => {
                    let decl = &self.decls[decl_idx];
                    let lexical = matches!(decl.kind, BindingKind::Let | BindingKind::Const);
                    let same_function = decl.function == reference.function;
                    if same_function && lexical && decl.seq > reference.seq {
                        return Err(ParseError::new(
                            ErrorCode::E2004,
                            format!("Cannot access '{}' before initialization", reference.name),
                            reference.position,
                        ));
                    }
                    let constant = decl.kind == BindingKind::Const;
                    if constant && reference.assigned {
                        if same_function {
                            return Err(ParseError::new(
                                ErrorCode::E2003,
                                format!("Assignment to constant variable '{}'", reference.name),
                                reference.position,
                            ));
                        }
                        program.var_mut(reference.var).constant = true;
                    }
                    if same_function {
                        Storage::Local(decl.slot)
                    } else {
                        Storage::Captured(self.capture(reference.function, decl_idx))
                    }
                }
            };
            program.var_mut(reference.var).storage = storage;
        }

        for scope in &mut self.functions {
            let layout = FrameLayout {
                locals: std::mem::take(&mut scope.locals),
                captures: std::mem::take(&mut scope.captures),
                depth: scope.depth,
            };
            debug!(
                func = scope.func.raw(),
                locals = layout.locals.len(),
                captures = layout.captures.len(),
                "frame layout"
            );
            program.function_mut(scope.func).layout = layout;
        }
        Ok(())
    }
}

fn reserved(name: &str, position: Position) -> ParseError {
    ParseError::new(
        ErrorCode::E2002,
        format!("Unexpected reserved word '{name}'"),
        position,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap parse results")]
mod tests;
