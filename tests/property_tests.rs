//! Property-based tests using proptest
//!
//! These tests generate random predicate trees and pagination inputs to check
//! invariants that should hold for all of them: rendered text keeps the
//! tree's boolean meaning, parameters stay aligned with placeholders, and page
//! arithmetic never loses or invents rows.

use proptest::prelude::*;

use query_chain::infrastructure::persistence::PostgresQueryTarget;
use query_chain::qb::{and, eq, is_in, not, or, Builder, Chain, Condition, OffsetPagingBuilder};
use query_chain::value_objects::Value;

const LEAVES: usize = 8;

/// Boolean tree mirrored into a `Condition`
#[derive(Debug, Clone)]
enum Tree {
    Leaf(usize),
    And(Vec<Tree>),
    Or(Vec<Tree>),
    Not(Box<Tree>),
}

/// Strategy for generating nested AND/OR/NOT trees
fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = (0..LEAVES).prop_map(Tree::Leaf);
    leaf.prop_recursive(5, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Tree::And),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Tree::Or),
            inner.prop_map(|t| Tree::Not(Box::new(t))),
        ]
    })
}

/// Strategy for generating a truth assignment for every leaf
fn truth_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), LEAVES)
}

fn to_condition(tree: &Tree) -> Condition {
    match tree {
        Tree::Leaf(i) => eq(&format!("c{}", i), *i as i64),
        Tree::And(children) => and(children.iter().map(to_condition)),
        Tree::Or(children) => or(children.iter().map(to_condition)),
        Tree::Not(child) => not(to_condition(child)),
    }
}

fn eval_tree(tree: &Tree, truth: &[bool]) -> bool {
    match tree {
        Tree::Leaf(i) => truth[*i],
        Tree::And(children) => children.iter().all(|c| eval_tree(c, truth)),
        Tree::Or(children) => children.iter().any(|c| eval_tree(c, truth)),
        Tree::Not(child) => !eval_tree(child, truth),
    }
}

fn leaf_order(tree: &Tree, out: &mut Vec<i64>) {
    match tree {
        Tree::Leaf(i) => out.push(*i as i64),
        Tree::And(children) | Tree::Or(children) => {
            children.iter().for_each(|c| leaf_order(c, out))
        }
        Tree::Not(child) => leaf_order(child, out),
    }
}

/// Evaluates a rendered fragment with SQL precedence (NOT > AND > OR).
struct FragmentEvaluator<'a> {
    tokens: Vec<String>,
    pos: usize,
    truth: &'a [bool],
}

impl<'a> FragmentEvaluator<'a> {
    fn new(fragment: &str, truth: &'a [bool]) -> Self {
        let tokens = fragment
            .replace('(', " ( ")
            .replace(')', " ) ")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self {
            tokens,
            pos: 0,
            truth,
        }
    }

    fn evaluate(mut self) -> bool {
        let value = self.expr();
        assert_eq!(self.pos, self.tokens.len(), "trailing tokens");
        value
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> String {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: &str) {
        assert_eq!(self.next(), expected);
    }

    fn expr(&mut self) -> bool {
        let mut value = self.term();
        while self.peek() == Some("OR") {
            self.pos += 1;
            let rhs = self.term();
            value = value || rhs;
        }
        value
    }

    fn term(&mut self) -> bool {
        let mut value = self.factor();
        while self.peek() == Some("AND") {
            self.pos += 1;
            let rhs = self.factor();
            value = value && rhs;
        }
        value
    }

    fn factor(&mut self) -> bool {
        match self.next().as_str() {
            "NOT" => {
                self.expect("(");
                let value = self.expr();
                self.expect(")");
                !value
            }
            "(" => {
                let value = self.expr();
                self.expect(")");
                value
            }
            ident => {
                let idx: usize = ident
                    .strip_prefix('c')
                    .and_then(|n| n.parse().ok())
                    .expect("leaf identifier");
                self.expect("=");
                self.expect("?");
                self.truth[idx]
            }
        }
    }
}

fn placeholder_count(fragment: &str) -> usize {
    fragment.matches('?').count()
}

proptest! {
    /// Rendered text must mean exactly what the tree means
    #[test]
    fn rendered_fragment_preserves_semantics(tree in tree_strategy(), truth in truth_strategy()) {
        let cond = to_condition(&tree);
        let rendered = FragmentEvaluator::new(cond.fragment(), &truth).evaluate();
        prop_assert_eq!(rendered, eval_tree(&tree, &truth), "fragment: {}", cond.fragment());
    }

    /// Parameters appear in the same order as their leaves
    #[test]
    fn params_follow_leaf_order(tree in tree_strategy()) {
        let cond = to_condition(&tree);
        let mut expected = Vec::new();
        leaf_order(&tree, &mut expected);

        let actual: Vec<i64> = cond
            .params()
            .iter()
            .map(|v| match v {
                Value::Int(i) => *i,
                other => panic!("unexpected param {:?}", other),
            })
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(placeholder_count(cond.fragment()), cond.params().len());
    }

    /// Parentheses are always balanced
    #[test]
    fn parentheses_are_balanced(tree in tree_strategy()) {
        let cond = to_condition(&tree);
        let mut depth = 0i64;
        for c in cond.fragment().chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            prop_assert!(depth >= 0);
        }
        prop_assert_eq!(depth, 0);
    }

    /// Combining only with AND never adds parentheses
    #[test]
    fn flat_and_has_no_parentheses(leaves in prop::collection::vec(0..LEAVES, 1..10)) {
        let cond = and(leaves.iter().map(|i| eq(&format!("c{}", i), *i as i64)));
        prop_assert!(!cond.fragment().contains('('));
        prop_assert_eq!(cond.fragment().matches(" AND ").count(), leaves.len() - 1);
    }

    /// Empty conditions never change a combination
    #[test]
    fn empty_is_identity(tree in tree_strategy()) {
        let cond = to_condition(&tree);
        let with_empty = and([Condition::default(), cond.clone(), Condition::default()]);
        let expected = and([cond]);
        prop_assert_eq!(with_empty.fragment(), expected.fragment());
        prop_assert_eq!(with_empty.params(), expected.params());
    }

    /// Postgres rendering binds one value per expanded placeholder
    #[test]
    fn postgres_binds_match_placeholders(
        tree in tree_strategy(),
        ids in prop::collection::vec(any::<i32>(), 0..6),
    ) {
        let cond = and([to_condition(&tree), is_in("id", ids.clone())]);
        let rendered = Chain::new()
            .filter(cond.clone())
            .build(PostgresQueryTarget::new("t"))
            .render()
            .unwrap();

        let expanded: usize = cond.params().iter().map(Value::expanded_len).sum();
        prop_assert_eq!(rendered.binds().len(), expanded);
        prop_assert_eq!(rendered.sql().matches('$').count(), expanded);
        prop_assert!(!rendered.sql().contains('?'));
    }

    /// Building twice yields identical output
    #[test]
    fn rendering_is_deterministic(tree in tree_strategy(), limit in 1..500u64) {
        let chain = Chain::new().limit(limit).filter(to_condition(&tree));
        let first = chain.build(PostgresQueryTarget::new("t")).render().unwrap();
        let second = chain.build(PostgresQueryTarget::new("t")).render().unwrap();
        prop_assert_eq!(first.sql(), second.sql());
        prop_assert_eq!(first.binds(), second.binds());
    }

    /// Pages cover every record exactly with no spare page
    #[test]
    fn total_pages_cover_records(limit in 1..1000i64, total in 0..1_000_000i64) {
        let pages = OffsetPagingBuilder::new(limit, 1, total, "asc", Vec::<String>::new()).total_pages();
        prop_assert!(pages * limit >= total);
        if total > 0 {
            prop_assert!((pages - 1) * limit < total);
        } else {
            prop_assert_eq!(pages, 0);
        }
    }

    /// Offset is the number of rows on all previous pages
    #[test]
    fn offset_skips_previous_pages(limit in 1..1000i64, page in 1..10_000i64) {
        let builder = OffsetPagingBuilder::new(limit, page, 0, "asc", Vec::<String>::new());
        prop_assert_eq!(builder.offset(), ((page - 1) * limit) as u64);
    }
}
