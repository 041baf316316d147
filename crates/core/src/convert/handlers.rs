//! Handler values living on the converter's three stacks.

use super::if_chain::IfChain;
use crate::element::{Block, CodeElement, DelegateKind, Fragment};
use crate::error::ConvertError;

// ──────────────────────────────────────────────
// Statement stack
// ──────────────────────────────────────────────

#[derive(Debug)]
pub(super) enum StatementHandler {
    /// Bottom of the stack; holds the finished top-level elements.
    Root(Vec<CodeElement>),
    Block(BlockCollector),
    IfChain(IfChain),
    While(WhileBuilder),
}

impl StatementHandler {
    pub(super) fn describe(&self) -> String {
        match self {
            StatementHandler::Root(_) => "root handler".to_owned(),
            StatementHandler::Block(b) => b.describe(),
            StatementHandler::IfChain(c) => c.describe(),
            StatementHandler::While(w) => w.describe(),
        }
    }

    /// True when a "statement found" notification would be accepted.
    pub(super) fn collects_statements(&self) -> bool {
        match self {
            StatementHandler::Root(_) => true,
            StatementHandler::Block(b) => b.state == BlockState::Open,
            StatementHandler::IfChain(c) => c.state() == super::if_chain::IfState::Collecting,
            StatementHandler::While(w) => w.state == WhileState::Collecting,
        }
    }

    pub(super) fn push_statement(&mut self, element: CodeElement) -> Result<(), ConvertError> {
        match self {
            StatementHandler::Root(elements) => {
                elements.push(element);
                Ok(())
            }
            StatementHandler::Block(b) => b.push_statement(element),
            StatementHandler::IfChain(c) => c.push_statement(element),
            StatementHandler::While(w) => w.push_statement(element),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockState {
    /// Declaration body whose `{` has not arrived yet.
    AwaitingOpen,
    Open,
    /// Declaration body whose `}` has arrived; removed when the declaration ends.
    Closed,
}

/// Collects the statements of one `{ }` region.
#[derive(Debug)]
pub(super) struct BlockCollector {
    /// A declaration body rather than a nested block.
    pub(super) body: bool,
    pub(super) state: BlockState,
    pub(super) statements: Block,
}

impl BlockCollector {
    /// A nested block; its `{` is the event that creates it.
    pub(super) fn nested() -> Self {
        BlockCollector {
            body: false,
            state: BlockState::Open,
            statements: Vec::new(),
        }
    }

    pub(super) fn body() -> Self {
        BlockCollector {
            body: true,
            state: BlockState::AwaitingOpen,
            statements: Vec::new(),
        }
    }

    pub(super) fn describe(&self) -> String {
        let kind = if self.body { "body" } else { "block" };
        let state = match self.state {
            BlockState::AwaitingOpen => "awaiting open",
            BlockState::Open => "open",
            BlockState::Closed => "closed",
        };
        format!("{} collector ({})", kind, state)
    }

    fn push_statement(&mut self, element: CodeElement) -> Result<(), ConvertError> {
        if self.state != BlockState::Open {
            return Err(ConvertError::protocol("open block collector", self.describe()));
        }
        self.statements.push(element);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WhileState {
    AwaitingBody,
    Collecting,
    Closed,
}

#[derive(Debug)]
pub(super) struct WhileBuilder {
    condition: Fragment,
    body: Block,
    pub(super) state: WhileState,
}

impl WhileBuilder {
    pub(super) fn new(condition: Fragment) -> Self {
        WhileBuilder {
            condition,
            body: Vec::new(),
            state: WhileState::AwaitingBody,
        }
    }

    fn state_label(state: WhileState) -> String {
        let state = match state {
            WhileState::AwaitingBody => "awaiting body",
            WhileState::Collecting => "collecting",
            WhileState::Closed => "closed",
        };
        format!("while builder ({})", state)
    }

    pub(super) fn describe(&self) -> String {
        Self::state_label(self.state)
    }

    fn transition(&mut self, from: WhileState, to: WhileState) -> Result<(), ConvertError> {
        if self.state != from {
            return Err(ConvertError::protocol(
                Self::state_label(from),
                self.describe(),
            ));
        }
        self.state = to;
        Ok(())
    }

    pub(super) fn begin_body(&mut self) -> Result<(), ConvertError> {
        self.transition(WhileState::AwaitingBody, WhileState::Collecting)
    }

    pub(super) fn end_body(&mut self) -> Result<(), ConvertError> {
        self.transition(WhileState::Collecting, WhileState::Closed)
    }

    fn push_statement(&mut self, element: CodeElement) -> Result<(), ConvertError> {
        if self.state != WhileState::Collecting {
            return Err(ConvertError::protocol(
                Self::state_label(WhileState::Collecting),
                self.describe(),
            ));
        }
        self.body.push(element);
        Ok(())
    }

    pub(super) fn finish(self) -> Result<CodeElement, ConvertError> {
        if self.state != WhileState::Closed {
            return Err(ConvertError::protocol(
                Self::state_label(WhileState::Closed),
                self.describe(),
            ));
        }
        Ok(CodeElement::While {
            condition: self.condition,
            body: self.body,
        })
    }
}

// ──────────────────────────────────────────────
// Expression stack
// ──────────────────────────────────────────────

/// Where a finished expression's text is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ExprTarget {
    IfCondition,
    ElseIfCondition,
    WhileCondition,
    ReturnValue,
    StatementExpression,
    Throw,
    VariableInit { name: Fragment },
    /// Appended to the argument-list consumer on top of the argument stack
    Argument,
    /// Extracted and dropped (a statement taken over by a delegate call)
    Discard,
}

/// Extracts the source text of one expression, however deeply nested.
#[derive(Debug)]
pub(super) struct ExpressionConsumer {
    pub(super) target: ExprTarget,
    depth: u32,
    start: Option<usize>,
}

impl ExpressionConsumer {
    pub(super) fn new(target: ExprTarget) -> Self {
        ExpressionConsumer {
            target,
            depth: 0,
            start: None,
        }
    }

    pub(super) fn depth(&self) -> u32 {
        self.depth
    }

    pub(super) fn describe(&self) -> String {
        format!("expression consumer for {:?} at depth {}", self.target, self.depth)
    }

    pub(super) fn begin(&mut self, start: usize) {
        if self.depth == 0 {
            self.start = Some(start);
        }
        self.depth += 1;
    }

    /// Returns the extracted text once the outermost expression closes.
    pub(super) fn end(
        &mut self,
        source: &str,
        end: usize,
        empty: bool,
    ) -> Result<Option<String>, ConvertError> {
        if self.depth == 0 {
            return Err(ConvertError::protocol(
                "expression consumer with an open expression",
                self.describe(),
            ));
        }
        self.depth -= 1;
        if self.depth > 0 {
            return Ok(None);
        }
        if empty {
            return Ok(Some(String::new()));
        }
        let start = self.start.unwrap_or(end);
        let text = source.get(start..end).ok_or_else(|| {
            ConvertError::protocol(
                "expression bounds inside the source",
                format!("{}..{} of {} bytes", start, end, source.len()),
            )
        })?;
        Ok(Some(text.to_owned()))
    }
}

// ──────────────────────────────────────────────
// Argument-list stack
// ──────────────────────────────────────────────

/// Where a finished argument list is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ArgsTarget {
    Delegate(DelegateKind),
}

/// Collects the top-level argument texts of one argument list.
#[derive(Debug)]
pub(super) struct ArgumentConsumer {
    pub(super) target: ArgsTarget,
    depth: u32,
    pub(super) args: Vec<String>,
}

impl ArgumentConsumer {
    pub(super) fn new(target: ArgsTarget) -> Self {
        ArgumentConsumer {
            target,
            depth: 0,
            args: Vec::new(),
        }
    }

    pub(super) fn describe(&self) -> String {
        format!("argument consumer for {:?} at depth {}", self.target, self.depth)
    }

    pub(super) fn begin_list(&mut self) {
        self.depth += 1;
    }

    /// Only arguments of the outermost list are collected.
    pub(super) fn wants_argument(&self) -> bool {
        self.depth == 1
    }

    /// Returns true when the outermost list closed.
    pub(super) fn end_list(&mut self) -> Result<bool, ConvertError> {
        if self.depth == 0 {
            return Err(ConvertError::protocol(
                "argument consumer with an open list",
                self.describe(),
            ));
        }
        self.depth -= 1;
        Ok(self.depth == 0)
    }
}
