use crate::element::{Block, CodeElement, Fragment};
use crate::error::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum IfState {
    /// A condition is captured and its block has not begun.
    AwaitingBlock,
    /// Statements go into the last block.
    Collecting,
    /// A block closed; an else-if, an else or the end of the chain may follow.
    AwaitingNext,
    /// An else-if was seen and its condition is being extracted.
    AwaitingCondition,
    /// An else was seen and its block has not begun.
    AwaitingElseBlock,
    /// The else block closed; only the end of the chain may follow.
    Complete,
}

/// Assembles one `if` / `else if` / `else` chain.
///
/// Conditions and blocks grow together: a condition stays pending until its
/// block begins, so `blocks.len() - conditions.len()` is 0 in every state
/// and becomes 1 only once an else block has begun.
#[derive(Debug)]
pub(super) struct IfChain {
    conditions: Vec<Fragment>,
    blocks: Vec<Block>,
    pending: Option<Fragment>,
    state: IfState,
}

impl IfChain {
    pub(super) fn new(condition: Fragment) -> Self {
        IfChain {
            conditions: Vec::new(),
            blocks: Vec::new(),
            pending: Some(condition),
            state: IfState::AwaitingBlock,
        }
    }

    pub(super) fn state(&self) -> IfState {
        self.state
    }

    /// Number of blocks minus number of conditions: 1 iff an else block exists.
    pub(super) fn surplus_blocks(&self) -> usize {
        self.blocks.len() - self.conditions.len()
    }

    pub(super) fn describe(&self) -> String {
        let state = match self.state {
            IfState::AwaitingBlock => "awaiting block",
            IfState::Collecting => "collecting a block",
            IfState::AwaitingNext => "awaiting else-if, else or end",
            IfState::AwaitingCondition => "awaiting else-if condition",
            IfState::AwaitingElseBlock => "awaiting else block",
            IfState::Complete => "complete",
        };
        format!("if-chain builder ({})", state)
    }

    fn unexpected(&self, expected: &str) -> ConvertError {
        ConvertError::protocol(format!("if-chain builder {}", expected), self.describe())
    }

    pub(super) fn awaits_block(&self) -> bool {
        matches!(
            self.state,
            IfState::AwaitingBlock | IfState::AwaitingElseBlock
        )
    }

    pub(super) fn begin_block(&mut self) -> Result<(), ConvertError> {
        match self.state {
            IfState::AwaitingBlock => {
                let condition = self
                    .pending
                    .take()
                    .ok_or_else(|| self.unexpected("with a pending condition"))?;
                self.conditions.push(condition);
            }
            IfState::AwaitingElseBlock => {}
            _ => return Err(self.unexpected("awaiting block")),
        }
        self.blocks.push(Vec::new());
        self.state = IfState::Collecting;
        debug_assert!(self.surplus_blocks() <= 1);
        Ok(())
    }

    pub(super) fn push_statement(&mut self, element: CodeElement) -> Result<(), ConvertError> {
        if self.state != IfState::Collecting {
            return Err(self.unexpected("collecting a block"));
        }
        match self.blocks.last_mut() {
            Some(block) => {
                block.push(element);
                Ok(())
            }
            None => Err(self.unexpected("with an open block")),
        }
    }

    pub(super) fn end_block(&mut self) -> Result<(), ConvertError> {
        if self.state != IfState::Collecting {
            return Err(self.unexpected("collecting a block"));
        }
        self.state = if self.surplus_blocks() == 1 {
            IfState::Complete
        } else {
            IfState::AwaitingNext
        };
        Ok(())
    }

    /// An else-if keyword was seen; its condition is extracted next.
    pub(super) fn expect_condition(&mut self) -> Result<(), ConvertError> {
        if self.state != IfState::AwaitingNext {
            return Err(self.unexpected("awaiting else-if, else or end"));
        }
        self.state = IfState::AwaitingCondition;
        Ok(())
    }

    pub(super) fn add_condition(&mut self, condition: Fragment) -> Result<(), ConvertError> {
        if self.state != IfState::AwaitingCondition {
            return Err(self.unexpected("awaiting else-if condition"));
        }
        self.pending = Some(condition);
        self.state = IfState::AwaitingBlock;
        Ok(())
    }

    pub(super) fn begin_else(&mut self) -> Result<(), ConvertError> {
        if self.state != IfState::AwaitingNext {
            return Err(self.unexpected("awaiting else-if, else or end"));
        }
        self.state = IfState::AwaitingElseBlock;
        Ok(())
    }

    /// Convert the chain into a single `If` element.
    pub(super) fn finish(self) -> Result<CodeElement, ConvertError> {
        if !matches!(self.state, IfState::AwaitingNext | IfState::Complete) {
            return Err(self.unexpected("ready to end"));
        }
        let else_if_count = self.conditions.len().saturating_sub(1);
        let mut conditions = self.conditions.into_iter();
        let mut blocks = self.blocks.into_iter();
        let (Some(condition), Some(then_block)) = (conditions.next(), blocks.next()) else {
            return Err(ConvertError::protocol(
                "if-chain builder with a primary block",
                "if-chain builder without blocks",
            ));
        };
        let else_if_conditions: Vec<Fragment> = conditions.collect();
        let else_if_blocks: Vec<Block> = blocks.by_ref().take(else_if_count).collect();
        let else_block = blocks.next();
        Ok(CodeElement::If {
            condition,
            then_block,
            else_if_conditions,
            else_if_blocks,
            else_block,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ret(v: &str) -> CodeElement {
        CodeElement::Return {
            value: Some(Fragment::expr(v)),
        }
    }

    #[test]
    fn surplus_stays_within_zero_and_one() {
        let mut chain = IfChain::new(Fragment::expr("a"));
        assert_eq!(chain.surplus_blocks(), 0);
        chain.begin_block().unwrap();
        assert_eq!(chain.surplus_blocks(), 0);
        chain.push_statement(ret("1")).unwrap();
        chain.end_block().unwrap();
        chain.expect_condition().unwrap();
        chain.add_condition(Fragment::expr("b")).unwrap();
        assert_eq!(chain.surplus_blocks(), 0);
        chain.begin_block().unwrap();
        chain.end_block().unwrap();
        chain.begin_else().unwrap();
        assert_eq!(chain.surplus_blocks(), 0);
        chain.begin_block().unwrap();
        assert_eq!(chain.surplus_blocks(), 1);
        chain.push_statement(ret("3")).unwrap();
        chain.end_block().unwrap();
        assert_eq!(chain.state(), IfState::Complete);

        match chain.finish().unwrap() {
            CodeElement::If {
                condition,
                then_block,
                else_if_conditions,
                else_if_blocks,
                else_block,
            } => {
                assert_eq!(condition, Fragment::expr("a"));
                assert_eq!(then_block, vec![ret("1")]);
                assert_eq!(else_if_conditions, vec![Fragment::expr("b")]);
                assert_eq!(else_if_blocks, vec![Vec::new()]);
                assert_eq!(else_block, Some(vec![ret("3")]));
            }
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn statements_go_to_last_block() {
        let mut chain = IfChain::new(Fragment::expr("a"));
        chain.begin_block().unwrap();
        chain.end_block().unwrap();
        chain.expect_condition().unwrap();
        chain.add_condition(Fragment::expr("b")).unwrap();
        chain.begin_block().unwrap();
        chain.push_statement(ret("2")).unwrap();
        chain.end_block().unwrap();

        match chain.finish().unwrap() {
            CodeElement::If {
                then_block,
                else_if_blocks,
                else_block,
                ..
            } => {
                assert!(then_block.is_empty());
                assert_eq!(else_if_blocks, vec![vec![ret("2")]]);
                assert_eq!(else_block, None);
            }
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn else_if_after_else_is_rejected() {
        let mut chain = IfChain::new(Fragment::expr("a"));
        chain.begin_block().unwrap();
        chain.end_block().unwrap();
        chain.begin_else().unwrap();
        chain.begin_block().unwrap();
        chain.end_block().unwrap();
        let err = chain.expect_condition().unwrap_err();
        assert!(matches!(err, ConvertError::Protocol { .. }));
    }

    #[test]
    fn finishing_before_first_block_is_rejected() {
        let chain = IfChain::new(Fragment::expr("a"));
        assert!(chain.finish().is_err());
    }

    #[test]
    fn statement_while_awaiting_block_is_rejected() {
        let mut chain = IfChain::new(Fragment::expr("a"));
        assert!(chain.push_statement(ret("1")).is_err());
    }
}
