//! Composite and identity specifications
//!
//! Each composite rebuilds its tree from its children on every call to
//! `to_expression`. Composites nest as deep as the rule lists they are
//! folded from, so expansion fills the tree from an explicit work stack.
//! Every expression over `T` shares the one `Parameter<T>` token, which is
//! also the left child's parameter.

use super::expression::{Expression, Node, Parameter};
use super::{Inner, Specification, ToExpression};

/// `x => true`, reachable only through [`Specification::all`]
pub(crate) struct IdentitySpecification;

impl<T> ToExpression<T> for IdentitySpecification {
    fn to_expression(&self) -> Expression<T> {
        Expression::constant(true)
    }
}

pub(crate) struct AndSpecification<T> {
    pub(super) left: Specification<T>,
    pub(super) right: Specification<T>,
}

impl<T> AndSpecification<T> {
    pub(crate) fn new(left: Specification<T>, right: Specification<T>) -> Self {
        Self { left, right }
    }
}

impl<T: 'static> ToExpression<T> for AndSpecification<T> {
    fn to_expression(&self) -> Expression<T> {
        let mut body = Node::AndAlso(Node::hole(), Node::hole());
        if let Node::AndAlso(left, right) = &mut body {
            expand_into(vec![(&self.right, &mut **right), (&self.left, &mut **left)]);
        }
        Expression::lambda(body, Parameter::new())
    }
}

pub(crate) struct OrSpecification<T> {
    pub(super) left: Specification<T>,
    pub(super) right: Specification<T>,
}

impl<T> OrSpecification<T> {
    pub(crate) fn new(left: Specification<T>, right: Specification<T>) -> Self {
        Self { left, right }
    }
}

impl<T: 'static> ToExpression<T> for OrSpecification<T> {
    fn to_expression(&self) -> Expression<T> {
        let mut body = Node::OrElse(Node::hole(), Node::hole());
        if let Node::OrElse(left, right) = &mut body {
            expand_into(vec![(&self.right, &mut **right), (&self.left, &mut **left)]);
        }
        Expression::lambda(body, Parameter::new())
    }
}

pub(crate) struct NotSpecification<T> {
    pub(super) inner: Specification<T>,
}

impl<T> NotSpecification<T> {
    pub(crate) fn new(inner: Specification<T>) -> Self {
        Self { inner }
    }
}

impl<T: 'static> ToExpression<T> for NotSpecification<T> {
    fn to_expression(&self) -> Expression<T> {
        let mut body = Node::Not(Node::hole());
        if let Node::Not(inner) = &mut body {
            expand_into(vec![(&self.inner, &mut **inner)]);
        }
        Expression::lambda(body, Parameter::new())
    }
}

/// Leaf built from an expression supplied by the caller
pub(crate) struct ExpressionSpecification<T> {
    expression: Expression<T>,
}

impl<T> ExpressionSpecification<T> {
    pub(crate) fn new(expression: Expression<T>) -> Self {
        Self { expression }
    }
}

impl<T> ToExpression<T> for ExpressionSpecification<T> {
    fn to_expression(&self) -> Expression<T> {
        self.expression.clone()
    }
}

/// Write the body of each queued specification into its slot
///
/// Composites write a node with holes and queue their children for those
/// holes; leaves write their own expression body.
fn expand_into<T: 'static>(mut pending: Vec<(&Specification<T>, &mut Node<T>)>) {
    while let Some((specification, slot)) = pending.pop() {
        match &specification.inner {
            Inner::All => *slot = IdentitySpecification.to_expression().into_body(),
            Inner::Rule(rule) => *slot = rule.to_expression().into_body(),
            Inner::And(and) => {
                *slot = Node::AndAlso(Node::hole(), Node::hole());
                if let Node::AndAlso(left, right) = slot {
                    pending.push((&and.right, &mut **right));
                    pending.push((&and.left, &mut **left));
                }
            }
            Inner::Or(or) => {
                *slot = Node::OrElse(Node::hole(), Node::hole());
                if let Node::OrElse(left, right) = slot {
                    pending.push((&or.right, &mut **right));
                    pending.push((&or.left, &mut **left));
                }
            }
            Inner::Not(not) => {
                *slot = Node::Not(Node::hole());
                if let Node::Not(inner) = slot {
                    pending.push((&not.inner, &mut **inner));
                }
            }
        }
    }
}
