//! The event boundary between a scanner and the converter.
//!
//! A scanner walks the source once and calls these hooks in strict source
//! order. Begin/end pairs nest exactly like the grammar productions they
//! report. Every hook defaults to a no-op so a consumer only overrides what
//! it cares about.
//!
//! Event shapes, in the order the scanner emits them:
//!
//! ```text
//! if (c) A else if (d) B else C   begin_if, <expr c>, <block A>, got_else_if, <expr d>,
//!                                 <block B>, got_else, <block C>, end_if
//! while (c) A                     begin_while, <expr c>, <block A>, end_while
//! return e;                       got_return(has_value = true), <expr e>
//! f(a, b);                        got_statement_expression, begin_expression,
//!                                 begin_argument_list, got_argument, <expr a>,
//!                                 got_argument, <expr b>, end_argument_list,
//!                                 end_expression
//! final T x = e, y;               got_type_spec, begin_variable_decl, got_variable(x, true),
//!                                 <expr e>, got_variable(y, false), end_variable_decl
//! R m(P p) throws E { ... }       got_type_spec(R), begin_method_decl, got_type_spec(P),
//!                                 got_parameter(p), begin_throws, got_type_spec(E),
//!                                 end_throws, <block>, end_method_decl
//! ```
//!
//! A body that is a single statement rather than a `{ }` block is still
//! reported through `begin_stmt_block`/`end_stmt_block`, using the first and
//! last token of the statement.

use crate::error::ConvertError;
use crate::lexer::Spanned;

pub type HookResult = Result<(), ConvertError>;

pub trait ScanHooks {
    // === Expressions ===

    /// An expression starts at `first`. Also fired for every call argument,
    /// parenthesized sub-expression and index expression nested inside it.
    fn begin_expression(&mut self, _first: &Spanned) -> HookResult {
        Ok(())
    }

    /// The expression ends with `last`. `empty` is set when the expression
    /// position held no tokens; `last` is then the token after it.
    fn end_expression(&mut self, _last: &Spanned, _empty: bool) -> HookResult {
        Ok(())
    }

    // === Argument lists ===

    fn begin_argument_list(&mut self, _lparen: &Spanned) -> HookResult {
        Ok(())
    }

    /// Fired before each argument's expression.
    fn got_argument(&mut self, _first: &Spanned) -> HookResult {
        Ok(())
    }

    fn end_argument_list(&mut self, _rparen: &Spanned) -> HookResult {
        Ok(())
    }

    // === Blocks and statements ===

    fn begin_stmt_block(&mut self, _lbrace: &Spanned) -> HookResult {
        Ok(())
    }

    fn end_stmt_block(&mut self, _rbrace: &Spanned) -> HookResult {
        Ok(())
    }

    /// The `if` keyword; the condition expression follows.
    fn begin_if(&mut self, _kw: &Spanned) -> HookResult {
        Ok(())
    }

    /// The `if` of an `else if`; the condition expression follows.
    fn got_else_if(&mut self, _kw: &Spanned) -> HookResult {
        Ok(())
    }

    /// A final `else`; its block follows.
    fn got_else(&mut self, _kw: &Spanned) -> HookResult {
        Ok(())
    }

    fn end_if(&mut self, _last: &Spanned) -> HookResult {
        Ok(())
    }

    fn begin_while(&mut self, _kw: &Spanned) -> HookResult {
        Ok(())
    }

    fn end_while(&mut self, _last: &Spanned) -> HookResult {
        Ok(())
    }

    fn got_return(&mut self, _kw: &Spanned, _has_value: bool) -> HookResult {
        Ok(())
    }

    fn got_break(&mut self, _kw: &Spanned, _label: Option<&Spanned>) -> HookResult {
        Ok(())
    }

    fn got_continue(&mut self, _kw: &Spanned, _label: Option<&Spanned>) -> HookResult {
        Ok(())
    }

    /// The `throw` keyword; the thrown expression follows.
    fn got_throw(&mut self, _kw: &Spanned) -> HookResult {
        Ok(())
    }

    fn got_empty_statement(&mut self, _semi: &Spanned) -> HookResult {
        Ok(())
    }

    /// An expression statement starts at `first`; its expression follows.
    fn got_statement_expression(&mut self, _first: &Spanned) -> HookResult {
        Ok(())
    }

    /// A recognized construct the scanner skipped without reporting its parts.
    fn got_unsupported(&mut self, _token: &Spanned, _construct: &str) -> HookResult {
        Ok(())
    }

    // === Declarations ===

    /// A type in a declaration context: return, parameter, variable or thrown type.
    fn got_type_spec(&mut self, _first: &Spanned, _last: &Spanned) -> HookResult {
        Ok(())
    }

    /// Local variable declaration; its type has been reported.
    fn begin_variable_decl(&mut self, _first: &Spanned, _modifiers: &[Spanned]) -> HookResult {
        Ok(())
    }

    /// One declarator. When `has_init` is set its initializer expression follows.
    fn got_variable(&mut self, _name: &Spanned, _has_init: bool) -> HookResult {
        Ok(())
    }

    fn end_variable_decl(&mut self, _semi: &Spanned) -> HookResult {
        Ok(())
    }

    /// Method header; the return type has been reported.
    fn begin_method_decl(
        &mut self,
        _first: &Spanned,
        _modifiers: &[Spanned],
        _name: &Spanned,
    ) -> HookResult {
        Ok(())
    }

    fn begin_constructor_decl(
        &mut self,
        _first: &Spanned,
        _modifiers: &[Spanned],
        _name: &Spanned,
    ) -> HookResult {
        Ok(())
    }

    /// A formal parameter; its type has been reported. `ellipsis` marks a
    /// variable-arity parameter.
    fn got_parameter(&mut self, _name: &Spanned, _ellipsis: Option<&Spanned>) -> HookResult {
        Ok(())
    }

    fn begin_throws(&mut self, _kw: &Spanned) -> HookResult {
        Ok(())
    }

    fn end_throws(&mut self) -> HookResult {
        Ok(())
    }

    /// `super(`/`this(` as the first statement of a constructor body. Fired
    /// after `got_statement_expression` and `begin_expression` for the
    /// statement; the argument list follows.
    fn got_delegate_call(&mut self, _kw: &Spanned) -> HookResult {
        Ok(())
    }

    fn end_method_decl(&mut self, _last: &Spanned, _has_body: bool) -> HookResult {
        Ok(())
    }

    // === Comments ===

    /// A comment, with its raw text including markers.
    fn got_comment(&mut self, _comment: &Spanned) -> HookResult {
        Ok(())
    }
}
