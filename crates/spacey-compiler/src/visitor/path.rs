use super::NodeRef;
use crate::error::Result;
use spacey_syntax::ast::Program;

#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    node: NodeRef<'a>,
    key: &'static str,
}

/// Stack of nodes from the program root down to the node being visited.
///
/// Each frame remembers the key under which it was reached from its
/// parent (`"body"`, `"declaration"`, `"callee"`, ...).
#[derive(Debug, Clone)]
pub struct AstPath<'a> {
    root: Frame<'a>,
    stack: Vec<Frame<'a>>,
}

impl<'a> AstPath<'a> {
    /// A path positioned at `program`.
    pub fn new(program: &'a Program) -> Self {
        Self {
            root: Frame {
                node: NodeRef::Program(program),
                key: "program",
            },
            stack: Vec::with_capacity(32),
        }
    }

    fn top(&self) -> &Frame<'a> {
        self.stack.last().unwrap_or(&self.root)
    }

    /// The node being visited.
    pub fn get_value(&self) -> NodeRef<'a> {
        self.top().node
    }

    /// The key under which the current node was reached.
    pub fn key(&self) -> &'static str {
        self.top().key
    }

    /// The node containing the current one.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.ancestors().next()
    }

    /// Enclosing nodes, innermost first, ending with the program.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        let frames = self.stack.len();
        self.stack[..frames.saturating_sub(1)]
            .iter()
            .rev()
            .chain(std::iter::once(&self.root).take(frames.min(1)))
            .map(|frame| frame.node)
    }

    /// Enclosing nodes paired with the key of the child through which the
    /// path continues below them, innermost first.
    pub fn ancestor_keys(&self) -> impl Iterator<Item = (NodeRef<'a>, &'static str)> + '_ {
        (0..self.stack.len()).rev().map(move |i| {
            let parent = if i == 0 { self.root.node } else { self.stack[i - 1].node };
            (parent, self.stack[i].key)
        })
    }

    /// Number of frames below the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pushes `node` under `key`, runs `method` on it and pops it again.
    pub fn call<V: ?Sized>(
        &mut self,
        visitor: &mut V,
        node: NodeRef<'a>,
        key: &'static str,
        method: fn(&mut V, &mut AstPath<'a>) -> Result<()>,
    ) -> Result<()> {
        self.stack.push(Frame { node, key });
        let result = method(visitor, self);
        self.stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacey_syntax::ast::Statement;

    fn noop<V: ?Sized>(_: &mut V, _: &mut AstPath<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_root_frame() {
        let program = spacey_syntax::parse("a;").unwrap();
        let path = AstPath::new(&program);
        assert!(matches!(path.get_value(), NodeRef::Program(_)));
        assert_eq!(path.key(), "program");
        assert!(path.parent().is_none());
        assert_eq!(path.ancestors().count(), 0);
    }

    #[test]
    fn test_call_pushes_and_pops() {
        let program = spacey_syntax::parse("a; b;").unwrap();
        let mut path = AstPath::new(&program);
        let second: &Statement = &program.body[1];

        let mut seen = Vec::new();
        path.call(
            &mut seen,
            NodeRef::Statement(second),
            "body",
            |seen: &mut Vec<(&'static str, usize, bool)>, path| {
                seen.push((
                    path.key(),
                    path.depth(),
                    matches!(path.parent(), Some(NodeRef::Program(_))),
                ));
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen, vec![("body", 1, true)]);

        let mut keys = Vec::new();
        path.call(
            &mut keys,
            NodeRef::Statement(second),
            "body",
            |keys: &mut Vec<(bool, &'static str)>, path| {
                keys.extend(
                    path.ancestor_keys()
                        .map(|(node, key)| (matches!(node, NodeRef::Program(_)), key)),
                );
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(keys, vec![(true, "body")]);
        assert_eq!(path.depth(), 0);
        path.call(&mut (), NodeRef::Statement(second), "body", noop).unwrap();
        assert_eq!(path.depth(), 0);
    }
}
