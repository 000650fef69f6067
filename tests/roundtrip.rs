//! Property tests for the edit-script contract: every script must
//! reconstruct both inputs, reverse cleanly, and be minimal regardless of
//! algorithm, slicing, or matrix backing.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sequin::{
    Action, ActionCollector, DiffConfig, FillOrder, GreedyProcessor, MatrixBuilder,
    MatrixProcessor, Operator, Processor, Sequence, Token, TokenComparator, action, diff_actions,
    diff_with,
};

fn token_strategy() -> impl Strategy<Value = Token> {
    let names = prop::sample::select(vec!["a", "b", "p", "em"]);
    let words = prop::sample::select(vec!["one", "two", "three", "four"]);
    let spaces = prop::sample::select(vec![" ", "\n", "\t", "  "]);
    prop_oneof![
        names.clone().prop_map(Token::open),
        names.prop_map(Token::close),
        words.prop_map(Token::word),
        spaces.prop_map(Token::whitespace),
        prop::sample::select(vec!["x", "y"]).prop_map(|v| Token::attribute("class", v)),
    ]
}

fn sequence_strategy(max: usize) -> impl Strategy<Value = Sequence> {
    prop::collection::vec(token_strategy(), 0..max).prop_map(Sequence::from_tokens)
}

fn collect(processor: &dyn Processor, first: &Sequence, second: &Sequence) -> Vec<Action> {
    let mut collector = ActionCollector::ungrouped();
    processor
        .diff(
            first.tokens(),
            second.tokens(),
            TokenComparator::strict(),
            &mut collector,
        )
        .unwrap();
    collector.into_actions()
}

fn edit_count(actions: &[Action]) -> usize {
    actions
        .iter()
        .map(|a| if a.operator().is_edit() { a.len() } else { 0 })
        .sum()
}

proptest! {
    #[test]
    fn matrix_script_reconstructs_both_inputs(
        first in sequence_strategy(24),
        second in sequence_strategy(24),
    ) {
        let actions = collect(&MatrixProcessor::new(), &first, &second);
        prop_assert!(action::is_applicable(&first, &second, &actions));
        let after = action::apply(&first, &actions, true).unwrap();
        let before = action::apply(&first, &actions, false).unwrap();
        prop_assert_eq!(after.tokens(), second.tokens());
        prop_assert_eq!(before.tokens(), first.tokens());
    }

    #[test]
    fn greedy_script_reconstructs_both_inputs(
        first in sequence_strategy(24),
        second in sequence_strategy(24),
    ) {
        let actions = collect(&GreedyProcessor::new(), &first, &second);
        prop_assert!(action::is_applicable(&first, &second, &actions));
    }

    #[test]
    fn reversed_script_runs_the_other_way(
        first in sequence_strategy(24),
        second in sequence_strategy(24),
    ) {
        let actions = collect(&MatrixProcessor::new(), &first, &second);
        let reversed = action::reverse(&actions);
        prop_assert!(action::is_applicable(&second, &first, &reversed));
        prop_assert_eq!(action::reverse(&reversed), actions);
    }

    #[test]
    fn both_algorithms_are_minimal(
        first in sequence_strategy(24),
        second in sequence_strategy(24),
    ) {
        let cmp = TokenComparator::strict();
        let lcs = MatrixBuilder::new()
            .build(first.tokens(), second.tokens(), cmp)
            .lcs_length();
        let optimum = (first.len() - lcs) + (second.len() - lcs);

        let matrix = collect(&MatrixProcessor::new(), &first, &second);
        prop_assert_eq!(edit_count(&matrix), optimum);

        let greedy = collect(&GreedyProcessor::new(), &first, &second);
        prop_assert_eq!(edit_count(&greedy), optimum);
    }

    #[test]
    fn slicing_changes_neither_validity_nor_cost(
        first in sequence_strategy(24),
        second in sequence_strategy(24),
    ) {
        // Common ends are themselves part of some longest common
        // subsequence, so stripping them must not cost extra edits.
        let direct = collect(&MatrixProcessor::new(), &first, &second);

        let mut collector = ActionCollector::ungrouped();
        diff_with(
            &first,
            &second,
            &DiffConfig::new(),
            &MatrixProcessor::new(),
            &mut collector,
        )
        .unwrap();
        let sliced = collector.into_actions();

        prop_assert!(action::is_applicable(&first, &second, &sliced));
        prop_assert_eq!(edit_count(&sliced), edit_count(&direct));
    }

    #[test]
    fn fill_orders_agree_cell_for_cell(
        first in sequence_strategy(16),
        second in sequence_strategy(16),
    ) {
        let cmp = TokenComparator::strict();
        let reverse = MatrixBuilder::with_order(FillOrder::Reverse)
            .build(first.tokens(), second.tokens(), cmp);
        let forward = MatrixBuilder::with_order(FillOrder::Forward)
            .build(first.tokens(), second.tokens(), cmp);
        for i in 0..reverse.rows() {
            for j in 0..reverse.cols() {
                prop_assert_eq!(reverse.get(i, j), forward.get(i, j));
            }
        }
    }

    #[test]
    fn ignore_whitespace_round_trips_modulo_comparator(
        first in sequence_strategy(24),
        second in sequence_strategy(24),
    ) {
        let config = DiffConfig::ignore_whitespace();
        let actions = diff_actions(&first, &second, &config).unwrap();
        prop_assert!(action::is_applicable_with(
            &first,
            &second,
            &actions,
            config.comparator(),
        ));
    }

    #[test]
    fn coalescing_preserves_applicability(
        first in sequence_strategy(24),
        second in sequence_strategy(24),
    ) {
        let actions = diff_actions(&first, &second, &DiffConfig::new()).unwrap();
        let coalesced = action::coalesce(actions);
        prop_assert!(action::is_applicable(&first, &second, &coalesced));
    }
}

#[test]
fn grouped_and_ungrouped_collectors_agree_on_operations() {
    let first: Sequence = [
        Token::open("p"),
        Token::word("one"),
        Token::whitespace(" "),
        Token::word("two"),
        Token::close("p"),
    ]
    .into_iter()
    .collect();
    let second: Sequence = [
        Token::open("p"),
        Token::word("three"),
        Token::whitespace(" "),
        Token::word("four"),
        Token::close("p"),
    ]
    .into_iter()
    .collect();

    let grouped = diff_actions(&first, &second, &DiffConfig::new()).unwrap();

    let mut collector = ActionCollector::ungrouped();
    diff_with(
        &first,
        &second,
        &DiffConfig::new(),
        &MatrixProcessor::new(),
        &mut collector,
    )
    .unwrap();
    let ungrouped = collector.into_actions();

    let flatten = |actions: &[Action]| -> Vec<(Operator, Token)> {
        actions
            .iter()
            .flat_map(|a| a.tokens().iter().map(|t| (a.operator(), t.clone())))
            .collect()
    };
    assert_eq!(flatten(&grouped), flatten(&ungrouped));
}
