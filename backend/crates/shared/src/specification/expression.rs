//! Predicate Expression
//!
//! A structured representation of a single-parameter boolean function
//! `T -> bool`. Unlike an opaque closure, the tree can be inspected,
//! combined and rendered before it is ever evaluated.
//!
//! ## Shape
//! ```text
//! Expression<T>
//! ├── parameter: Parameter<T>   (typed token, shared by every node)
//! └── body: Node<T>
//!     ├── Constant(bool)
//!     ├── Leaf { name, predicate }
//!     ├── AndAlso(Node, Node)
//!     ├── OrElse(Node, Node)
//!     └── Not(Node)
//! ```

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::type_name::short_type_name;

/// Predicate function held by a leaf node
pub type LeafFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// The single free parameter of an [`Expression`]
///
/// The token carries only the entity type, so two expressions over the
/// same `T` always refer to the same parameter.
pub struct Parameter<T> {
    _marker: PhantomData<fn(&T)>,
}

impl<T> Parameter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Short type name of the bound entity
    pub fn type_name(&self) -> Cow<'static, str> {
        short_type_name::<T>()
    }
}

impl<T> Default for Parameter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Parameter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Parameter<T> {}

impl<T> PartialEq for Parameter<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for Parameter<T> {}

impl<T> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter<{}>", self.type_name())
    }
}

/// A named leaf predicate supplied by a concrete specification
pub struct Leaf<T> {
    name: Arc<str>,
    predicate: LeafFn<T>,
}

impl<T> Leaf<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn test(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }
}

impl<T> Clone for Leaf<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Leaf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Leaf").field(&self.name).finish()
    }
}

/// Expression tree node
///
/// Consumers that translate a predicate into another query language walk
/// this enum. Only these five node kinds are ever produced.
///
/// Trees built by folding long rule lists are thousands of levels deep, so
/// every walk here (evaluate, compile, clone, render, drop) runs on an
/// explicit work stack instead of the call stack.
pub enum Node<T> {
    Constant(bool),
    Leaf(Leaf<T>),
    AndAlso(Box<Node<T>>, Box<Node<T>>),
    OrElse(Box<Node<T>>, Box<Node<T>>),
    Not(Box<Node<T>>),
}

impl<T> Node<T> {
    /// Placeholder child, overwritten before the tree is handed out
    pub(crate) fn hole() -> Box<Node<T>> {
        Box::new(Node::Constant(false))
    }

    /// Copy of this node with [`hole`](Self::hole)s for children
    fn shell(&self) -> Node<T> {
        match self {
            Node::Constant(value) => Node::Constant(*value),
            Node::Leaf(leaf) => Node::Leaf(leaf.clone()),
            Node::AndAlso(..) => Node::AndAlso(Self::hole(), Self::hole()),
            Node::OrElse(..) => Node::OrElse(Self::hole(), Self::hole()),
            Node::Not(_) => Node::Not(Self::hole()),
        }
    }

    fn children(&self) -> [Option<&Node<T>>; 2] {
        match self {
            Node::AndAlso(left, right) | Node::OrElse(left, right) => {
                [Some(&**left), Some(&**right)]
            }
            Node::Not(inner) => [Some(&**inner), None],
            Node::Constant(_) | Node::Leaf(_) => [None, None],
        }
    }

    /// Move the children out, leaving holes behind
    fn detach_children(&mut self, into: &mut Vec<Node<T>>) {
        match self {
            Node::AndAlso(left, right) | Node::OrElse(left, right) => {
                into.push(std::mem::replace(&mut **left, Node::Constant(false)));
                into.push(std::mem::replace(&mut **right, Node::Constant(false)));
            }
            Node::Not(inner) => into.push(std::mem::replace(&mut **inner, Node::Constant(false))),
            Node::Constant(_) | Node::Leaf(_) => {}
        }
    }

    /// Interpret the node against an entity
    ///
    /// `AndAlso`/`OrElse` short-circuit like `&&`/`||`.
    pub fn evaluate(&self, entity: &T) -> bool {
        enum Step<'a, T> {
            Eval(&'a Node<T>),
            ThenIfTrue(&'a Node<T>),
            ThenIfFalse(&'a Node<T>),
            Negate,
        }

        let mut value = false;
        let mut steps = vec![Step::Eval(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Eval(Node::Constant(constant)) => value = *constant,
                Step::Eval(Node::Leaf(leaf)) => value = leaf.test(entity),
                Step::Eval(Node::AndAlso(left, right)) => {
                    steps.extend([Step::ThenIfTrue(&**right), Step::Eval(&**left)]);
                }
                Step::Eval(Node::OrElse(left, right)) => {
                    steps.extend([Step::ThenIfFalse(&**right), Step::Eval(&**left)]);
                }
                Step::Eval(Node::Not(inner)) => steps.extend([Step::Negate, Step::Eval(&**inner)]),
                Step::ThenIfTrue(right) if value => steps.push(Step::Eval(right)),
                Step::ThenIfFalse(right) if !value => steps.push(Step::Eval(right)),
                Step::ThenIfTrue(_) | Step::ThenIfFalse(_) => {}
                Step::Negate => value = !value,
            }
        }
        value
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children().into_iter().flatten());
        }
        count
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            for child in node.children().into_iter().flatten() {
                pending.push((child, level + 1));
            }
        }
        deepest
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, debug: bool) -> fmt::Result {
        enum Piece<'a, T> {
            Node(&'a Node<T>),
            Text(&'static str),
        }

        let (and, or, not, close) = if debug {
            (("AndAlso(", ", "), ("OrElse(", ", "), "Not(", ")")
        } else {
            (("(", " AND "), ("(", " OR "), "NOT ", "")
        };

        let mut pieces = vec![Piece::Node(self)];
        while let Some(piece) = pieces.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(Node::Constant(value)) if debug => write!(f, "Constant({value})")?,
                Piece::Node(Node::Constant(value)) => write!(f, "{value}")?,
                Piece::Node(Node::Leaf(leaf)) if debug => fmt::Debug::fmt(leaf, f)?,
                Piece::Node(Node::Leaf(leaf)) => f.write_str(leaf.name())?,
                Piece::Node(Node::AndAlso(left, right)) => pieces.extend([
                    Piece::Text(")"),
                    Piece::Node(&**right),
                    Piece::Text(and.1),
                    Piece::Node(&**left),
                    Piece::Text(and.0),
                ]),
                Piece::Node(Node::OrElse(left, right)) => pieces.extend([
                    Piece::Text(")"),
                    Piece::Node(&**right),
                    Piece::Text(or.1),
                    Piece::Node(&**left),
                    Piece::Text(or.0),
                ]),
                Piece::Node(Node::Not(inner)) => pieces.extend([
                    Piece::Text(close),
                    Piece::Node(&**inner),
                    Piece::Text(not),
                ]),
            }
        }
        Ok(())
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        let mut root = self.shell();
        {
            let mut pending: Vec<(&Node<T>, &mut Node<T>)> = Vec::new();
            pair_children(self, &mut root, &mut pending);
            while let Some((source, slot)) = pending.pop() {
                *slot = source.shell();
                pair_children(source, slot, &mut pending);
            }
        }
        root
    }
}

/// Queue each child of `source` with the matching hole in `copy`
fn pair_children<'a, 'b, T>(
    source: &'a Node<T>,
    copy: &'b mut Node<T>,
    pending: &mut Vec<(&'a Node<T>, &'b mut Node<T>)>,
) {
    match (source, copy) {
        (Node::AndAlso(left, right), Node::AndAlso(left_slot, right_slot))
        | (Node::OrElse(left, right), Node::OrElse(left_slot, right_slot)) => {
            pending.push((&**right, &mut **right_slot));
            pending.push((&**left, &mut **left_slot));
        }
        (Node::Not(inner), Node::Not(inner_slot)) => pending.push((&**inner, &mut **inner_slot)),
        _ => {}
    }
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.detach_children(&mut detached);
        }
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, true)
    }
}

impl<T> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// One instruction of a compiled predicate
///
/// The accumulator holds the value of the last finished subtree.
enum Op<T> {
    Load(bool),
    Test(LeafFn<T>),
    Negate,
    /// Skip to `to` when the accumulator equals `when`
    JumpIf { when: bool, to: usize },
}

fn run<T>(program: &[Op<T>], entity: &T) -> bool {
    let mut value = false;
    let mut next = 0;
    while let Some(op) = program.get(next) {
        next += 1;
        match op {
            Op::Load(constant) => value = *constant,
            Op::Test(predicate) => value = predicate(entity),
            Op::Negate => value = !value,
            Op::JumpIf { when, to } if value == *when => next = *to,
            Op::JumpIf { .. } => {}
        }
    }
    value
}

impl<T: 'static> Node<T> {
    fn compile(&self) -> LeafFn<T> {
        enum Emit<'a, T> {
            Node(&'a Node<T>),
            ShortCircuit(bool),
            Land,
            Negate,
        }

        if let Node::Leaf(leaf) = self {
            return Arc::clone(&leaf.predicate);
        }

        let mut program: Vec<Op<T>> = Vec::new();
        let mut open_jumps = Vec::new();
        let mut emits = vec![Emit::Node(self)];
        while let Some(emit) = emits.pop() {
            match emit {
                Emit::Node(Node::Constant(value)) => program.push(Op::Load(*value)),
                Emit::Node(Node::Leaf(leaf)) => program.push(Op::Test(Arc::clone(&leaf.predicate))),
                Emit::Node(Node::AndAlso(left, right)) => emits.extend([
                    Emit::Land,
                    Emit::Node(&**right),
                    Emit::ShortCircuit(false),
                    Emit::Node(&**left),
                ]),
                Emit::Node(Node::OrElse(left, right)) => emits.extend([
                    Emit::Land,
                    Emit::Node(&**right),
                    Emit::ShortCircuit(true),
                    Emit::Node(&**left),
                ]),
                Emit::Node(Node::Not(inner)) => emits.extend([Emit::Negate, Emit::Node(&**inner)]),
                Emit::ShortCircuit(when) => {
                    open_jumps.push(program.len());
                    program.push(Op::JumpIf { when, to: 0 });
                }
                Emit::Land => {
                    let end = program.len();
                    if let Some(at) = open_jumps.pop() {
                        if let Some(Op::JumpIf { to, .. }) = program.get_mut(at) {
                            *to = end;
                        }
                    }
                }
                Emit::Negate => program.push(Op::Negate),
            }
        }

        Arc::new(move |entity: &T| run(&program, entity))
    }
}

/// Single-parameter boolean expression over `T`
pub struct Expression<T> {
    parameter: Parameter<T>,
    body: Node<T>,
}

impl<T> Clone for Expression<T> {
    fn clone(&self) -> Self {
        Self {
            parameter: self.parameter,
            body: self.body.clone(),
        }
    }
}

impl<T> fmt::Debug for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("parameter", &self.parameter)
            .field("body", &self.body)
            .finish()
    }
}

impl<T> Expression<T> {
    /// Wrap a body with its parameter
    #[inline]
    pub fn lambda(body: Node<T>, parameter: Parameter<T>) -> Self {
        Self { parameter, body }
    }

    /// `x => value`
    pub fn constant(value: bool) -> Self {
        Self::lambda(Node::Constant(value), Parameter::new())
    }

    /// `x => predicate(x)`, labelled `name` when rendered
    pub fn leaf<F>(name: impl Into<Arc<str>>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let leaf = Leaf {
            name: name.into(),
            predicate: Arc::new(predicate),
        };
        Self::lambda(Node::Leaf(leaf), Parameter::new())
    }

    #[inline]
    pub fn parameter(&self) -> Parameter<T> {
        self.parameter
    }

    #[inline]
    pub fn body(&self) -> &Node<T> {
        &self.body
    }

    pub fn into_body(self) -> Node<T> {
        self.body
    }

    /// Interpret the tree without compiling it
    pub fn evaluate(&self, entity: &T) -> bool {
        self.body.evaluate(entity)
    }
}

impl<T: 'static> Expression<T> {
    /// Compile the tree into an invocable predicate
    pub fn compile(&self) -> CompiledPredicate<T> {
        CompiledPredicate {
            predicate: self.body.compile(),
        }
    }
}

impl<T> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x => {}", self.body)
    }
}

/// Invocable form of an [`Expression`]
pub struct CompiledPredicate<T> {
    predicate: LeafFn<T>,
}

impl<T> CompiledPredicate<T> {
    #[inline]
    pub fn call(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }
}

impl<T> Clone for CompiledPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for CompiledPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompiledPredicate")
    }
}
