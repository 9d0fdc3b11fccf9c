//! Specification - composable business rules
//!
//! A [`Specification<T>`] is a named, immutable boolean rule over entities
//! of type `T`. Rules are combined with [`and`](Specification::and),
//! [`or`](Specification::or) and [`not`](Specification::not) (or the
//! `&`, `|` and `!` operators). Composition is pure data construction and
//! never touches an entity; evaluation compiles the rule's expression tree
//! and applies it.
//!
//! ## Identity element
//! [`Specification::all`] matches everything and short-circuits
//! composition:
//! - `x.and(all) == x`, `all.and(x) == x`
//! - `x.or(all) == all`, `all.or(x) == all`
//!
//! The shortcut fires only for the distinguished `all` instance. A leaf
//! that happens to always return `true` is composed normally.
//!
//! ## Examples
//! ```rust
//! use kernel::specification::{Expression, Specification, ToExpression};
//!
//! struct IsEven;
//!
//! impl ToExpression<i32> for IsEven {
//!     fn to_expression(&self) -> Expression<i32> {
//!         Expression::leaf("is_even", |n: &i32| n % 2 == 0)
//!     }
//! }
//!
//! let is_even = Specification::new(IsEven);
//! let is_positive = Specification::from_fn("is_positive", |n: &i32| *n > 0);
//!
//! let rule = is_even.and(&is_positive);
//! assert!(rule.is_satisfied_by(&4));
//! assert!(!rule.is_satisfied_by(&-4));
//! assert_eq!(rule.to_string(), "(is_even AND is_positive)");
//! ```

mod composite;
pub mod expression;

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::sync::Arc;

use composite::{
    AndSpecification, ExpressionSpecification, IdentitySpecification, NotSpecification,
    OrSpecification,
};
pub use expression::{CompiledPredicate, Expression, Leaf, Node, Parameter};

/// Produces the expression tree of a specification
///
/// Implemented by every concrete (leaf) specification. The returned
/// expression must be a single-parameter boolean function of `T`.
pub trait ToExpression<T>: Send + Sync {
    fn to_expression(&self) -> Expression<T>;
}

enum Inner<T> {
    All,
    Rule(Arc<dyn ToExpression<T>>),
    And(Arc<AndSpecification<T>>),
    Or(Arc<OrSpecification<T>>),
    Not(Arc<NotSpecification<T>>),
}

/// Composable boolean rule over `T`
///
/// Cloning is cheap; clones share the same underlying rule. Rules folded
/// from long lists (tens of thousands of `and`s) build, evaluate and drop
/// without deep recursion.
pub struct Specification<T> {
    inner: Inner<T>,
}

impl<T: 'static> Specification<T> {
    /// Wrap a concrete specification
    pub fn new<S>(rule: S) -> Self
    where
        S: ToExpression<T> + 'static,
    {
        Self::from_rule(Arc::new(rule))
    }

    /// Leaf specification from a closure
    pub fn from_fn<F>(name: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::from_expression(Expression::leaf(name, predicate))
    }

    /// Leaf specification from a ready-made expression
    pub fn from_expression(expression: Expression<T>) -> Self {
        Self::new(ExpressionSpecification::new(expression))
    }

    /// The specification that matches every entity
    #[inline]
    pub const fn all() -> Self {
        Self { inner: Inner::All }
    }

    /// Whether this is the distinguished [`all`](Self::all) instance
    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self.inner, Inner::All)
    }

    pub fn to_expression(&self) -> Expression<T> {
        match &self.inner {
            Inner::All => IdentitySpecification.to_expression(),
            Inner::Rule(rule) => rule.to_expression(),
            Inner::And(and) => and.to_expression(),
            Inner::Or(or) => or.to_expression(),
            Inner::Not(not) => not.to_expression(),
        }
    }

    /// Compile the expression tree and apply it to `entity`
    ///
    /// A panic raised by a leaf predicate propagates to the caller.
    pub fn is_satisfied_by(&self, entity: &T) -> bool {
        let predicate = self.to_expression().compile();
        predicate.call(entity)
    }

    /// Entities from `items` that satisfy this specification
    ///
    /// The expression is compiled once for the whole iteration.
    pub fn filter<'a, I>(&self, items: I) -> impl Iterator<Item = &'a T> + use<'a, I, T>
    where
        I: IntoIterator<Item = &'a T>,
    {
        let predicate = self.to_expression().compile();
        items.into_iter().filter(move |entity| predicate.call(entity))
    }

    pub fn and(&self, other: &Specification<T>) -> Specification<T> {
        if self.is_all() {
            return other.clone();
        }

        if other.is_all() {
            return self.clone();
        }

        Self::from_inner(Inner::And(Arc::new(AndSpecification::new(
            self.clone(),
            other.clone(),
        ))))
    }

    pub fn or(&self, other: &Specification<T>) -> Specification<T> {
        if self.is_all() || other.is_all() {
            return Self::all();
        }

        Self::from_inner(Inner::Or(Arc::new(OrSpecification::new(
            self.clone(),
            other.clone(),
        ))))
    }

    pub fn not(&self) -> Specification<T> {
        Self::from_inner(Inner::Not(Arc::new(NotSpecification::new(self.clone()))))
    }

    fn from_rule(rule: Arc<dyn ToExpression<T>>) -> Self {
        Self::from_inner(Inner::Rule(rule))
    }

    fn from_inner(inner: Inner<T>) -> Self {
        Self { inner }
    }
}

impl<T> Specification<T> {
    /// Take the children of a composite this handle owns alone
    fn detach_children(&mut self, into: &mut Vec<Specification<T>>) {
        match std::mem::replace(&mut self.inner, Inner::All) {
            Inner::And(and) => {
                if let Some(and) = Arc::into_inner(and) {
                    into.extend([and.left, and.right]);
                }
            }
            Inner::Or(or) => {
                if let Some(or) = Arc::into_inner(or) {
                    into.extend([or.left, or.right]);
                }
            }
            Inner::Not(not) => {
                if let Some(not) = Arc::into_inner(not) {
                    into.push(not.inner);
                }
            }
            Inner::All | Inner::Rule(_) => {}
        }
    }
}

impl<T> Drop for Specification<T> {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut specification) = detached.pop() {
            specification.detach_children(&mut detached);
        }
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Inner::All => Inner::All,
            Inner::Rule(rule) => Inner::Rule(Arc::clone(rule)),
            Inner::And(and) => Inner::And(Arc::clone(and)),
            Inner::Or(or) => Inner::Or(Arc::clone(or)),
            Inner::Not(not) => Inner::Not(Arc::clone(not)),
        };
        Self { inner }
    }
}

impl<T: 'static> Default for Specification<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T: 'static> fmt::Display for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expression().body())
    }
}

impl<T: 'static> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("Specification::all");
        }
        write!(f, "Specification({})", self)
    }
}

impl<T: 'static> ToExpression<T> for Specification<T> {
    fn to_expression(&self) -> Expression<T> {
        Specification::to_expression(self)
    }
}

// ============================================================================
// Operators
// ============================================================================

impl<T: 'static> BitAnd for Specification<T> {
    type Output = Specification<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(&rhs)
    }
}

impl<T: 'static> BitAnd for &Specification<T> {
    type Output = Specification<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<T: 'static> BitOr for Specification<T> {
    type Output = Specification<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(&rhs)
    }
}

impl<T: 'static> BitOr for &Specification<T> {
    type Output = Specification<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<T: 'static> std::ops::Not for Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        Specification::not(&self)
    }
}

impl<T: 'static> std::ops::Not for &Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        Specification::not(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct IsEven;

    impl ToExpression<i32> for IsEven {
        fn to_expression(&self) -> Expression<i32> {
            Expression::leaf("is_even", |n: &i32| n % 2 == 0)
        }
    }

    struct IsPositive;

    impl ToExpression<i32> for IsPositive {
        fn to_expression(&self) -> Expression<i32> {
            Expression::leaf("is_positive", |n: &i32| *n > 0)
        }
    }

    fn is_even() -> Specification<i32> {
        Specification::new(IsEven)
    }

    fn is_positive() -> Specification<i32> {
        Specification::new(IsPositive)
    }

    fn divisible_by_three() -> Specification<i32> {
        Specification::from_fn("divisible_by_three", |n: &i32| n % 3 == 0)
    }

    // Scenarios

    #[test]
    fn test_leaf_evaluation() {
        assert!(is_even().is_satisfied_by(&4));
        assert!(!is_even().is_satisfied_by(&3));
    }

    #[test]
    fn test_and_requires_both() {
        let rule = is_even().and(&is_positive());
        assert!(!rule.is_satisfied_by(&-4));
        assert!(rule.is_satisfied_by(&4));
    }

    #[test]
    fn test_or_with_all_absorbs() {
        let rule = is_even().or(&Specification::all());
        assert!(rule.is_satisfied_by(&3));
        assert!(rule.is_all());
    }

    #[test]
    fn test_all_and_keeps_wrapped_answer() {
        let rule = Specification::all().and(&is_even());
        assert!(!rule.is_satisfied_by(&3));
        assert!(rule.is_satisfied_by(&2));
    }

    // Identity shortcuts

    #[test]
    fn test_and_with_all_returns_operand() {
        let even = is_even();
        assert!(!even.and(&Specification::all()).is_all());
        assert!(!Specification::all().and(&even).is_all());
        assert_eq!(even.and(&Specification::all()).to_string(), "is_even");
        assert_eq!(Specification::all().and(&even).to_string(), "is_even");
    }

    #[test]
    fn test_all_and_all_is_all() {
        let all = Specification::<i32>::all();
        assert!(all.and(&all).is_all());
        assert!(all.or(&all).is_all());
    }

    #[test]
    fn test_all_or_returns_all() {
        assert!(Specification::all().or(&is_even()).is_all());
    }

    #[test]
    fn test_structural_true_does_not_shortcut() {
        let always = Specification::from_fn("always", |_: &i32| true);
        let rule = is_even().and(&always);
        assert!(!rule.is_all());
        assert_eq!(rule.to_string(), "(is_even AND always)");

        let rule = is_even().or(&always);
        assert!(!rule.is_all());
        assert_eq!(rule.to_string(), "(is_even OR always)");
    }

    #[test]
    fn test_not_has_no_shortcut() {
        let never = Specification::<i32>::all().not();
        assert!(!never.is_all());
        assert!(!never.is_satisfied_by(&1));
        assert_eq!(never.to_string(), "NOT true");
    }

    #[test]
    fn test_all_expression() {
        let all = Specification::<i32>::all();
        assert!(matches!(all.to_expression().body(), Node::Constant(true)));
        assert!(all.is_satisfied_by(&i32::MIN));
        assert_eq!(format!("{:?}", all), "Specification::all");
        assert!(Specification::<i32>::default().is_all());
    }

    // Shape

    #[test]
    fn test_nested_shape() {
        let rule = is_even().and(&is_positive().not()).or(&divisible_by_three());
        assert_eq!(
            rule.to_string(),
            "((is_even AND NOT is_positive) OR divisible_by_three)"
        );
        assert_eq!(rule.to_expression().body().depth(), 4);
    }

    #[test]
    fn test_operators() {
        let rule = &is_even() & &!is_positive();
        assert!(rule.is_satisfied_by(&-2));
        assert!(!rule.is_satisfied_by(&2));

        let rule = is_even() | divisible_by_three();
        assert!(rule.is_satisfied_by(&9));
        assert!(!rule.is_satisfied_by(&5));
    }

    #[test]
    fn test_filter() {
        let numbers = [-4, -3, 0, 2, 3, 6, 7];
        let rule = is_even().and(&is_positive());
        let matching: Vec<i32> = rule.filter(&numbers).copied().collect();
        assert_eq!(matching, vec![2, 6]);
    }

    #[test]
    fn test_composition_does_not_evaluate() {
        let boom = Specification::from_fn("boom", |_: &i32| panic!("evaluated"));
        let rule = boom.and(&is_even()).or(&boom.not());
        assert_eq!(rule.to_string(), "((boom AND is_even) OR NOT boom)");
    }

    #[test]
    #[should_panic(expected = "leaf failure")]
    fn test_leaf_panic_propagates() {
        let failing = Specification::from_fn("failing", |_: &i32| panic!("leaf failure"));
        failing.and(&is_even()).is_satisfied_by(&1);
    }

    #[test]
    fn test_specifications_are_send_and_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Specification<i32>>();
        assert_send_sync::<Expression<String>>();

        let rule = is_even().and(&is_positive());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let rule = rule.clone();
                std::thread::spawn(move || rule.is_satisfied_by(&(n * 2)))
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![false, true, true, true]);
    }

    // Long rule lists

    const LINKS: i32 = 50_000;

    fn excluding(id: i32) -> Specification<i32> {
        Specification::from_fn(format!("not_{id}"), move |n: &i32| *n != id)
    }

    #[test]
    fn test_long_and_chain() {
        let rule = (1..=LINKS).fold(Specification::all(), |rule, id| rule.and(&excluding(id)));

        assert!(rule.is_satisfied_by(&0));
        assert!(rule.is_satisfied_by(&(LINKS + 1)));
        assert!(!rule.is_satisfied_by(&LINKS));
        assert!(!rule.is_satisfied_by(&1));

        let candidates = [0, 7, LINKS, LINKS + 3];
        let kept: Vec<i32> = rule.filter(&candidates).copied().collect();
        assert_eq!(kept, vec![0, LINKS + 3]);

        let expression = rule.to_expression();
        assert_eq!(expression.body().node_count(), 2 * LINKS as usize - 1);
        assert!(rule.to_string().ends_with(&format!("AND not_{LINKS})")));
    }

    #[test]
    fn test_long_right_nested_or_chain() {
        let rule = (1..=LINKS).fold(Specification::from_fn("never", |_: &i32| false), |rule, id| {
            Specification::from_fn(format!("is_{id}"), move |n: &i32| *n == id).or(&rule)
        });

        assert!(rule.is_satisfied_by(&1));
        assert!(rule.is_satisfied_by(&LINKS));
        assert!(!rule.is_satisfied_by(&0));
        assert_eq!(rule.to_expression().body().depth(), LINKS as usize + 1);
    }

    #[test]
    fn test_long_negation_chain() {
        let rule = (0..LINKS).fold(is_even(), |rule, _| !rule);
        assert!(rule.is_satisfied_by(&2));
        assert!(!rule.is_satisfied_by(&3));
    }

    #[test]
    fn test_dropping_a_long_chain_keeps_shared_parts() {
        let shared = excluding(-1).and(&is_even());
        let rule = (1..=LINKS).fold(shared.clone(), |rule, id| rule.and(&excluding(id)));
        drop(rule);

        assert_eq!(shared.to_string(), "(not_-1 AND is_even)");
        assert!(shared.is_satisfied_by(&2));
    }

    // Laws

    fn rule_strategy() -> impl Strategy<Value = Specification<i32>> {
        let leaf = prop_oneof![
            Just(is_even()),
            Just(is_positive()),
            Just(divisible_by_three()),
            Just(Specification::all()),
        ];
        leaf.prop_recursive(4, 16, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(&b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(&b)),
                inner.prop_map(|a| a.not()),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_and_identity(x in rule_strategy(), e in any::<i32>()) {
            let all = Specification::all();
            prop_assert_eq!(x.and(&all).is_satisfied_by(&e), x.is_satisfied_by(&e));
            prop_assert_eq!(all.and(&x).is_satisfied_by(&e), x.is_satisfied_by(&e));
        }

        #[test]
        fn prop_or_absorption(x in rule_strategy(), e in any::<i32>()) {
            let all = Specification::all();
            prop_assert!(x.or(&all).is_satisfied_by(&e));
            prop_assert!(all.or(&x).is_satisfied_by(&e));
        }

        #[test]
        fn prop_boolean_correctness(p in rule_strategy(), q in rule_strategy(), e in any::<i32>()) {
            let (pe, qe) = (p.is_satisfied_by(&e), q.is_satisfied_by(&e));
            prop_assert_eq!(p.and(&q).is_satisfied_by(&e), pe && qe);
            prop_assert_eq!(p.or(&q).is_satisfied_by(&e), pe || qe);
            prop_assert_eq!(p.not().is_satisfied_by(&e), !pe);
        }

        #[test]
        fn prop_associative_and_commutative(
            p in rule_strategy(),
            q in rule_strategy(),
            r in rule_strategy(),
            e in any::<i32>(),
        ) {
            prop_assert_eq!(
                p.and(&q).and(&r).is_satisfied_by(&e),
                p.and(&q.and(&r)).is_satisfied_by(&e)
            );
            prop_assert_eq!(
                p.or(&q).or(&r).is_satisfied_by(&e),
                p.or(&q.or(&r)).is_satisfied_by(&e)
            );
            prop_assert_eq!(p.and(&q).is_satisfied_by(&e), q.and(&p).is_satisfied_by(&e));
            prop_assert_eq!(p.or(&q).is_satisfied_by(&e), q.or(&p).is_satisfied_by(&e));
        }

        #[test]
        fn prop_double_negation(p in rule_strategy(), e in any::<i32>()) {
            prop_assert_eq!(p.not().not().is_satisfied_by(&e), p.is_satisfied_by(&e));
        }

        #[test]
        fn prop_compiled_matches_interpreted(p in rule_strategy(), e in any::<i32>()) {
            let expression = p.to_expression();
            prop_assert_eq!(expression.compile().call(&e), expression.evaluate(&e));
        }
    }
}
