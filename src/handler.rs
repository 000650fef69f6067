//! Operation sinks.
//!
//! Diff algorithms report their edit script through a [`DiffHandler`]
//! rather than building a return value, so callers can stream operations
//! into a renderer, collect them into [`Action`]s, or both.

use crate::action::{Action, Operator};
use crate::token::Token;
use core::fmt::Write as _;

/// Receives the operations of one comparison, in script order.
///
/// `start` and `end` bracket the stream; the default implementations do
/// nothing. A handler may be reused across comparisons once `end` has been
/// called.
pub trait DiffHandler {
    /// Called once before the first operation.
    fn start(&mut self) {}

    /// Called for every operation in script order.
    fn handle(&mut self, operator: Operator, token: &Token);

    /// Called once after the last operation.
    fn end(&mut self) {}
}

/// Collects operations into a list of [`Action`]s.
///
/// By default consecutive operations sharing an operator are grouped into
/// one action; [`ungrouped`](ActionCollector::ungrouped) yields one
/// single-token action per operation instead.
#[derive(Debug, Default)]
pub struct ActionCollector {
    actions: Vec<Action>,
    grouping: bool,
}

impl ActionCollector {
    /// Collector that groups runs of the same operator.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            grouping: true,
        }
    }

    /// Collector that emits one action per operation.
    pub fn ungrouped() -> Self {
        Self {
            actions: Vec::new(),
            grouping: false,
        }
    }

    /// The collected actions.
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

impl DiffHandler for ActionCollector {
    fn start(&mut self) {
        self.actions.clear();
    }

    fn handle(&mut self, operator: Operator, token: &Token) {
        if self.grouping
            && let Some(last) = self.actions.last_mut()
            && last.operator() == operator
        {
            last.push(token.clone());
            return;
        }
        let mut action = Action::new(operator);
        action.push(token.clone());
        self.actions.push(action);
    }
}

/// Writes operations as a compact one-line script, for debugging and test
/// assertions.
///
/// Inserted tokens are prefixed with `+`, deleted tokens with `-`, matched
/// tokens appear bare: `<a>-"x"+"y"</a>`.
#[derive(Debug, Default)]
pub struct OpWriter {
    out: String,
}

impl OpWriter {
    /// Empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The script written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consumes the writer, returning the script.
    pub fn into_string(self) -> String {
        self.out
    }
}

impl DiffHandler for OpWriter {
    fn start(&mut self) {
        self.out.clear();
    }

    fn handle(&mut self, operator: Operator, token: &Token) {
        if operator.is_edit() {
            // Writing to a String cannot fail.
            let _ = write!(self.out, "{operator}");
        }
        let _ = write!(self.out, "{token}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(handler: &mut impl DiffHandler) {
        handler.start();
        handler.handle(Operator::Match, &Token::open("a"));
        handler.handle(Operator::Delete, &Token::word("x"));
        handler.handle(Operator::Insert, &Token::word("y"));
        handler.handle(Operator::Insert, &Token::word("z"));
        handler.handle(Operator::Match, &Token::close("a"));
        handler.end();
    }

    #[test]
    fn test_collector_groups_runs() {
        let mut collector = ActionCollector::new();
        feed(&mut collector);
        let actions = collector.into_actions();
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[2].operator(), Operator::Insert);
        assert_eq!(actions[2].len(), 2, "both inserts share one action");
    }

    #[test]
    fn test_collector_ungrouped() {
        let mut collector = ActionCollector::ungrouped();
        feed(&mut collector);
        let actions = collector.into_actions();
        assert_eq!(actions.len(), 5);
        assert!(actions.iter().all(|a| a.len() == 1));
    }

    #[test]
    fn test_collector_reusable_after_end() {
        let mut collector = ActionCollector::new();
        feed(&mut collector);
        feed(&mut collector);
        assert_eq!(collector.into_actions().len(), 4);
    }

    #[test]
    fn test_op_writer_short_forms() {
        let mut writer = OpWriter::new();
        feed(&mut writer);
        assert_eq!(writer.as_str(), r#"<a>-"x"+"y"+"z"</a>"#);
    }
}
