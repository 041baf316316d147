//! The structural converter: scanner events in, code elements out.
//!
//! A [`Converter`] owns everything a run needs: the three handler stacks,
//! the staged declarations, the comment buffer and the warnings. It is
//! created for one source text, driven through [`ScanHooks`], and consumed
//! by [`Converter::finish`].

mod comments;
mod handlers;
mod if_chain;
mod normalize;
mod staging;

pub use comments::normalize_comment;
pub use normalize::{normalize_operators, split_assignment};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::element::{CodeElement, DelegateKind, Fragment, Param};
use crate::error::ConvertError;
use crate::hooks::{HookResult, ScanHooks};
use crate::lexer::Spanned;
use crate::options::ConvertOptions;
use comments::CommentBuffer;
use handlers::{
    ArgsTarget, ArgumentConsumer, BlockCollector, BlockState, ExprTarget, ExpressionConsumer,
    StatementHandler, WhileBuilder,
};
use if_chain::{IfChain, IfState};
use staging::{DeclarationStaging, VarDecl};

/// The result of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub elements: Vec<CodeElement>,
    pub warnings: Vec<String>,
}

pub struct Converter<'src> {
    source: &'src str,
    options: ConvertOptions,
    statements: Vec<StatementHandler>,
    expressions: Vec<ExpressionConsumer>,
    arguments: Vec<ArgumentConsumer>,
    declarations: Vec<DeclarationStaging>,
    variables: Vec<VarDecl>,
    /// Type fragments reported but not yet claimed
    types: Vec<Fragment>,
    /// Length of `types` when each open throws clause began
    throws_marks: Vec<usize>,
    comments: CommentBuffer,
    warnings: Vec<String>,
}

impl<'src> Converter<'src> {
    pub fn new(source: &'src str, options: ConvertOptions) -> Self {
        Converter {
            source,
            options,
            statements: vec![StatementHandler::Root(Vec::new())],
            expressions: Vec::new(),
            arguments: Vec::new(),
            declarations: Vec::new(),
            variables: Vec::new(),
            types: Vec::new(),
            throws_marks: Vec::new(),
            comments: CommentBuffer::default(),
            warnings: Vec::new(),
        }
    }

    /// End the run. Every stack must be back in its initial state.
    pub fn finish(mut self) -> Result<Conversion, ConvertError> {
        if let Some(e) = self.expressions.last() {
            return Err(ConvertError::protocol("no open expression", e.describe()));
        }
        if let Some(a) = self.arguments.last() {
            return Err(ConvertError::protocol("no open argument list", a.describe()));
        }
        if let Some(d) = self.declarations.last() {
            return Err(ConvertError::protocol("no open declaration", d.describe()));
        }
        if !self.variables.is_empty() {
            return Err(ConvertError::protocol(
                "no open variable declaration",
                format!("{} open", self.variables.len()),
            ));
        }
        if !self.types.is_empty() || !self.throws_marks.is_empty() {
            return Err(ConvertError::protocol(
                "no unclaimed type",
                format!("{} unclaimed", self.types.len()),
            ));
        }
        let elements = match (self.statements.pop(), self.statements.is_empty()) {
            (Some(StatementHandler::Root(elements)), true) => elements,
            (Some(top), _) => {
                return Err(ConvertError::protocol("root handler only", top.describe()))
            }
            (None, _) => return Err(ConvertError::EmptyStack { stack: "statement" }),
        };
        self.drop_comments();
        Ok(Conversion {
            elements,
            warnings: self.warnings,
        })
    }

    fn text(&self, first: &Spanned, last: &Spanned) -> String {
        self.source
            .get(first.start..last.end)
            .unwrap_or_default()
            .to_owned()
    }

    fn warn(&mut self, line: u32, message: String) {
        warn!(line, "{}", message);
        self.warnings.push(format!("line {}: {}", line, message));
    }

    fn pop_type(&mut self) -> Result<Fragment, ConvertError> {
        self.types
            .pop()
            .ok_or(ConvertError::EmptyStack { stack: "type" })
    }

    fn top_statement(&mut self) -> Result<&mut StatementHandler, ConvertError> {
        self.statements
            .last_mut()
            .ok_or(ConvertError::EmptyStack { stack: "statement" })
    }

    fn top_declaration(&mut self) -> Result<&mut DeclarationStaging, ConvertError> {
        self.declarations
            .last_mut()
            .ok_or(ConvertError::EmptyStack {
                stack: "declaration",
            })
    }

    fn top_if_chain(&mut self) -> Result<&mut IfChain, ConvertError> {
        match self.top_statement()? {
            StatementHandler::IfChain(chain) => Ok(chain),
            other => Err(ConvertError::protocol(
                "if-chain builder",
                other.describe(),
            )),
        }
    }

    /// Report a finished element to whatever handler is on top.
    fn found_statement(&mut self, element: CodeElement) -> HookResult {
        debug!(element = element.kind_name(), "element finished");
        self.drop_comments();
        self.top_statement()?.push_statement(element)
    }

    /// Comments still pending once code has been seen belong to no
    /// declaration.
    fn drop_comments(&mut self) {
        if self.comments.len() != 0 {
            trace!(count = self.comments.len(), "dropping unclaimed comments");
            self.comments.clear();
        }
    }

    fn expect_expression(&mut self, target: ExprTarget) {
        trace!(?target, "awaiting expression");
        self.expressions.push(ExpressionConsumer::new(target));
    }

    /// Route a finished expression's text to its target.
    fn deliver(&mut self, target: ExprTarget, text: String) -> HookResult {
        let text = normalize_operators(&text);
        trace!(?target, text = text.as_str(), "expression finished");
        match target {
            ExprTarget::IfCondition => {
                self.statements
                    .push(StatementHandler::IfChain(IfChain::new(Fragment::expr(text))));
                Ok(())
            }
            ExprTarget::ElseIfCondition => self.top_if_chain()?.add_condition(Fragment::expr(text)),
            ExprTarget::WhileCondition => {
                self.statements
                    .push(StatementHandler::While(WhileBuilder::new(Fragment::expr(text))));
                Ok(())
            }
            ExprTarget::ReturnValue => self.found_statement(CodeElement::Return {
                value: Some(Fragment::expr(text)),
            }),
            ExprTarget::StatementExpression => {
                let element = match split_assignment(&text) {
                    Some((target, value)) => CodeElement::Assign {
                        target: Fragment::expr(target),
                        value: Fragment::expr(value),
                    },
                    None => CodeElement::Call {
                        expression: Fragment::expr(text),
                    },
                };
                self.found_statement(element)
            }
            ExprTarget::Throw => self.found_statement(CodeElement::Throw {
                expression: Fragment::expr(text),
            }),
            ExprTarget::VariableInit { name } => {
                let decl = self.variables.last().ok_or(ConvertError::EmptyStack {
                    stack: "variable declaration",
                })?;
                let element = decl.element(name, Some(Fragment::expr(text)));
                self.found_statement(element)
            }
            ExprTarget::Argument => {
                let list = self
                    .arguments
                    .last_mut()
                    .ok_or(ConvertError::EmptyStack { stack: "argument" })?;
                list.args.push(text.trim().to_owned());
                Ok(())
            }
            ExprTarget::Discard => Ok(()),
        }
    }

    /// Route a finished argument list to its target.
    fn deliver_arguments(&mut self, target: ArgsTarget, args: Vec<String>) -> HookResult {
        trace!(?target, ?args, "argument list finished");
        match target {
            ArgsTarget::Delegate(kind) => {
                let decl = self.top_declaration()?;
                if !decl.is_constructor() {
                    return Err(ConvertError::protocol(
                        "constructor declaration",
                        decl.describe(),
                    ));
                }
                decl.delegate = Some((kind, args));
                Ok(())
            }
        }
    }

    fn modifier_texts(&self, modifiers: &[Spanned]) -> Vec<String> {
        modifiers
            .iter()
            .map(|m| m.text(self.source).to_owned())
            .collect()
    }

    fn report_leftovers(&mut self, line: u32, what: &str, leftovers: Vec<String>) {
        for modifier in leftovers {
            self.warn(
                line,
                format!("modifier '{}' is not supported on {} and was ignored", modifier, what),
            );
        }
    }
}

impl ScanHooks for Converter<'_> {
    // -- Expressions ---------------------------------------------

    fn begin_expression(&mut self, first: &Spanned) -> HookResult {
        match self.expressions.last_mut() {
            Some(consumer) => consumer.begin(first.start),
            None => trace!(offset = first.start, "expression ignored: no consumer"),
        }
        Ok(())
    }

    fn end_expression(&mut self, last: &Spanned, empty: bool) -> HookResult {
        let source = self.source;
        let Some(consumer) = self.expressions.last_mut() else {
            trace!(offset = last.end, "expression end ignored: no consumer");
            return Ok(());
        };
        if let Some(text) = consumer.end(source, last.end, empty)? {
            if let Some(finished) = self.expressions.pop() {
                self.deliver(finished.target, text)?;
            }
        }
        Ok(())
    }

    // -- Argument lists ------------------------------------------

    fn begin_argument_list(&mut self, _lparen: &Spanned) -> HookResult {
        if let Some(list) = self.arguments.last_mut() {
            list.begin_list();
        }
        Ok(())
    }

    fn got_argument(&mut self, _first: &Spanned) -> HookResult {
        if self.arguments.last().is_some_and(|list| list.wants_argument()) {
            self.expect_expression(ExprTarget::Argument);
        }
        Ok(())
    }

    fn end_argument_list(&mut self, _rparen: &Spanned) -> HookResult {
        let Some(list) = self.arguments.last_mut() else {
            return Ok(());
        };
        if list.end_list()? {
            if let Some(finished) = self.arguments.pop() {
                self.deliver_arguments(finished.target, finished.args)?;
            }
        }
        Ok(())
    }

    // -- Blocks --------------------------------------------------

    fn begin_stmt_block(&mut self, lbrace: &Spanned) -> HookResult {
        trace!(line = lbrace.line, "block begun");
        let top = self.top_statement()?;
        let nested = match top {
            StatementHandler::Block(b) if b.state == BlockState::AwaitingOpen => {
                b.state = BlockState::Open;
                false
            }
            StatementHandler::IfChain(chain) if chain.awaits_block() => {
                chain.begin_block()?;
                false
            }
            StatementHandler::While(w) if w.state == handlers::WhileState::AwaitingBody => {
                w.begin_body()?;
                false
            }
            other if other.collects_statements() => true,
            other => {
                return Err(ConvertError::protocol(
                    "handler ready for a block",
                    other.describe(),
                ))
            }
        };
        if nested {
            self.statements
                .push(StatementHandler::Block(BlockCollector::nested()));
        }
        Ok(())
    }

    fn end_stmt_block(&mut self, rbrace: &Spanned) -> HookResult {
        trace!(line = rbrace.line, "block ended");
        self.drop_comments();
        let top = self.top_statement()?;
        let hand_over = match top {
            StatementHandler::Block(b) if b.state == BlockState::Open => {
                if b.body {
                    b.state = BlockState::Closed;
                    false
                } else {
                    true
                }
            }
            StatementHandler::IfChain(chain) => {
                chain.end_block()?;
                false
            }
            StatementHandler::While(w) => {
                w.end_body()?;
                false
            }
            other => {
                return Err(ConvertError::protocol(
                    "handler with an open block",
                    other.describe(),
                ))
            }
        };
        if hand_over {
            if let Some(StatementHandler::Block(block)) = self.statements.pop() {
                for element in block.statements {
                    self.found_statement(element)?;
                }
            }
        }
        Ok(())
    }

    // -- If chains -----------------------------------------------

    fn begin_if(&mut self, _kw: &Spanned) -> HookResult {
        self.expect_expression(ExprTarget::IfCondition);
        Ok(())
    }

    fn got_else_if(&mut self, _kw: &Spanned) -> HookResult {
        self.top_if_chain()?.expect_condition()?;
        self.expect_expression(ExprTarget::ElseIfCondition);
        Ok(())
    }

    fn got_else(&mut self, _kw: &Spanned) -> HookResult {
        self.top_if_chain()?.begin_else()
    }

    fn end_if(&mut self, _last: &Spanned) -> HookResult {
        let state = self.top_if_chain()?.state();
        if !matches!(state, IfState::AwaitingNext | IfState::Complete) {
            let actual = self.top_if_chain()?.describe();
            return Err(ConvertError::protocol(
                "if-chain builder ready to end",
                actual,
            ));
        }
        match self.statements.pop() {
            Some(StatementHandler::IfChain(chain)) => {
                let element = chain.finish()?;
                self.found_statement(element)
            }
            _ => Err(ConvertError::EmptyStack { stack: "statement" }),
        }
    }

    // -- Other statements ----------------------------------------

    fn begin_while(&mut self, _kw: &Spanned) -> HookResult {
        self.expect_expression(ExprTarget::WhileCondition);
        Ok(())
    }

    fn end_while(&mut self, _last: &Spanned) -> HookResult {
        match self.top_statement()? {
            StatementHandler::While(w) if w.state == handlers::WhileState::Closed => {}
            other => {
                return Err(ConvertError::protocol(
                    "while builder (closed)",
                    other.describe(),
                ))
            }
        }
        match self.statements.pop() {
            Some(StatementHandler::While(w)) => {
                let element = w.finish()?;
                self.found_statement(element)
            }
            _ => Err(ConvertError::EmptyStack { stack: "statement" }),
        }
    }

    fn got_return(&mut self, _kw: &Spanned, has_value: bool) -> HookResult {
        if has_value {
            self.expect_expression(ExprTarget::ReturnValue);
            Ok(())
        } else {
            self.found_statement(CodeElement::Return { value: None })
        }
    }

    fn got_break(&mut self, kw: &Spanned, label: Option<&Spanned>) -> HookResult {
        if let Some(label) = label {
            let label = label.text(self.source).to_owned();
            self.warn(
                kw.line,
                format!("labelled break is not supported; label '{}' was dropped", label),
            );
        }
        self.found_statement(CodeElement::Break)
    }

    fn got_continue(&mut self, kw: &Spanned, label: Option<&Spanned>) -> HookResult {
        if let Some(label) = label {
            let label = label.text(self.source).to_owned();
            self.warn(
                kw.line,
                format!("labelled continue is not supported; label '{}' was dropped", label),
            );
        }
        self.found_statement(CodeElement::Continue)
    }

    fn got_throw(&mut self, _kw: &Spanned) -> HookResult {
        self.expect_expression(ExprTarget::Throw);
        Ok(())
    }

    fn got_empty_statement(&mut self, semi: &Spanned) -> HookResult {
        trace!(line = semi.line, "empty statement dropped");
        self.drop_comments();
        Ok(())
    }

    fn got_statement_expression(&mut self, _first: &Spanned) -> HookResult {
        self.expect_expression(ExprTarget::StatementExpression);
        Ok(())
    }

    fn got_unsupported(&mut self, token: &Spanned, construct: &str) -> HookResult {
        self.drop_comments();
        self.warn(
            token.line,
            format!("{} is not supported and was skipped", construct),
        );
        Ok(())
    }

    // -- Variables -----------------------------------------------

    fn got_type_spec(&mut self, first: &Spanned, last: &Spanned) -> HookResult {
        let text = self.text(first, last);
        trace!(text = text.as_str(), "type");
        self.types.push(Fragment::Type(text));
        Ok(())
    }

    fn begin_variable_decl(&mut self, first: &Spanned, modifiers: &[Spanned]) -> HookResult {
        let var_type = self.pop_type()?;
        let mut modifiers = self.modifier_texts(modifiers);
        let is_final = staging::take_flag(&mut modifiers, "final");
        self.report_leftovers(first.line, "variables", modifiers);
        self.variables.push(VarDecl { is_final, var_type });
        Ok(())
    }

    fn got_variable(&mut self, name: &Spanned, has_init: bool) -> HookResult {
        let name = Fragment::name(name.text(self.source));
        if has_init {
            self.expect_expression(ExprTarget::VariableInit { name });
            return Ok(());
        }
        let decl = self.variables.last().ok_or(ConvertError::EmptyStack {
            stack: "variable declaration",
        })?;
        let element = decl.element(name, None);
        self.found_statement(element)
    }

    fn end_variable_decl(&mut self, _semi: &Spanned) -> HookResult {
        self.variables
            .pop()
            .map(|_| ())
            .ok_or(ConvertError::EmptyStack {
                stack: "variable declaration",
            })
    }

    // -- Declarations --------------------------------------------

    fn begin_method_decl(
        &mut self,
        first: &Spanned,
        modifiers: &[Spanned],
        name: &Spanned,
    ) -> HookResult {
        let return_type = self.pop_type()?;
        let modifiers = self.modifier_texts(modifiers);
        let documentation = self.comments.claim();
        let name = Fragment::name(name.text(self.source));
        debug!(name = name.text(), "method declared");
        self.declarations.push(DeclarationStaging::method(
            name,
            return_type,
            modifiers,
            documentation,
            first.line,
        ));
        self.statements
            .push(StatementHandler::Block(BlockCollector::body()));
        Ok(())
    }

    fn begin_constructor_decl(
        &mut self,
        first: &Spanned,
        modifiers: &[Spanned],
        name: &Spanned,
    ) -> HookResult {
        let modifiers = self.modifier_texts(modifiers);
        let documentation = self.comments.claim();
        debug!(name = name.text(self.source), "constructor declared");
        self.declarations.push(DeclarationStaging::constructor(
            modifiers,
            documentation,
            first.line,
        ));
        self.statements
            .push(StatementHandler::Block(BlockCollector::body()));
        Ok(())
    }

    fn got_parameter(&mut self, name: &Spanned, ellipsis: Option<&Spanned>) -> HookResult {
        let param_type = self.pop_type()?;
        let line = name.line;
        let name = Fragment::name(name.text(self.source));
        if ellipsis.is_some() {
            self.warn(
                line,
                format!(
                    "variable-arity parameter '{}' is not supported; declared as {}",
                    name.text(),
                    param_type.text()
                ),
            );
        }
        self.top_declaration()?.params.push(Param { param_type, name });
        Ok(())
    }

    fn begin_throws(&mut self, _kw: &Spanned) -> HookResult {
        self.top_declaration()?;
        self.throws_marks.push(self.types.len());
        Ok(())
    }

    fn end_throws(&mut self) -> HookResult {
        let mark = self
            .throws_marks
            .pop()
            .ok_or(ConvertError::EmptyStack { stack: "throws" })?;
        if mark > self.types.len() {
            return Err(ConvertError::protocol(
                format!("at least {} types", mark),
                format!("{} types", self.types.len()),
            ));
        }
        let thrown = self.types.split_off(mark);
        self.top_declaration()?.throws.extend(thrown);
        Ok(())
    }

    fn got_delegate_call(&mut self, kw: &Spanned) -> HookResult {
        let target = kw.text(self.source);
        let kind = DelegateKind::classify(target).ok_or_else(|| {
            ConvertError::protocol("'super' or 'this'", format!("'{}'", target))
        })?;
        let decl = self.top_declaration()?;
        if !decl.is_constructor() {
            return Err(ConvertError::protocol(
                "constructor declaration",
                decl.describe(),
            ));
        }
        // The scanner reported the call as a statement expression; take it over.
        match self.expressions.last_mut() {
            Some(consumer)
                if consumer.target == ExprTarget::StatementExpression && consumer.depth() == 1 =>
            {
                consumer.target = ExprTarget::Discard;
            }
            Some(consumer) => {
                return Err(ConvertError::protocol(
                    "expression consumer for StatementExpression",
                    consumer.describe(),
                ))
            }
            None => return Err(ConvertError::EmptyStack { stack: "expression" }),
        }
        self.arguments
            .push(ArgumentConsumer::new(ArgsTarget::Delegate(kind)));
        Ok(())
    }

    fn end_method_decl(&mut self, last: &Spanned, has_body: bool) -> HookResult {
        let expected = if has_body {
            BlockState::Closed
        } else {
            BlockState::AwaitingOpen
        };
        let body = match self.statements.pop() {
            Some(StatementHandler::Block(b)) if b.body && b.state == expected => b.statements,
            Some(other) => {
                let actual = other.describe();
                self.statements.push(other);
                let expected = BlockCollector {
                    body: true,
                    state: expected,
                    statements: Vec::new(),
                };
                return Err(ConvertError::protocol(expected.describe(), actual));
            }
            None => return Err(ConvertError::EmptyStack { stack: "statement" }),
        };
        let decl = self.declarations.pop().ok_or(ConvertError::EmptyStack {
            stack: "declaration",
        })?;
        let line = decl.line;
        let what = if decl.is_constructor() {
            "constructors"
        } else {
            "methods"
        };
        let (element, leftovers) = decl.into_element(has_body.then_some(body))?;
        self.report_leftovers(line, what, leftovers);
        trace!(line = last.line, "declaration ended");
        self.found_statement(element)
    }

    // -- Comments ------------------------------------------------

    fn got_comment(&mut self, comment: &Spanned) -> HookResult {
        let text = normalize_comment(comment.text(self.source), self.options.comment_width);
        trace!(line = comment.line, "comment buffered");
        self.comments.push(text);
        Ok(())
    }
}
