use crate::clang::Cursor;

/// What a visitor wants done with the children of the node it just saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    Prune,
}

/// Pre-order depth-first walk from `root`, root included.
///
/// `visit` receives each node and its lexical parent (`None` for `root`).
/// Returning [`Visit::Prune`] skips the node's subtree.
pub fn traverse<'tu, F>(
    root: Cursor<'tu>,
    mut visit: F,
) where
    F: FnMut(Cursor<'tu>, Option<Cursor<'tu>>) -> Visit,
{
    let mut stack: Vec<(Cursor<'tu>, Option<Cursor<'tu>>)> = vec![(root, None)];
    while let Some((cursor, parent)) = stack.pop() {
        if visit(cursor, parent) == Visit::Prune {
            continue;
        }
        let children: Vec<_> = cursor.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, Some(cursor))));
    }
}

/// A single-purpose walk holding its own accumulator.
pub trait Traversal<'tu> {
    type Output;

    fn visit(
        &mut self,
        cursor: Cursor<'tu>,
        parent: Option<Cursor<'tu>>,
    ) -> Visit;

    fn finish(self) -> Self::Output;
}

/// Runs `traversal` over the tree under `root` and returns what it collected.
pub fn run<'tu, T>(
    root: Cursor<'tu>,
    mut traversal: T,
) -> T::Output
where
    T: Traversal<'tu>,
{
    traverse(root, |cursor, parent| traversal.visit(cursor, parent));
    traversal.finish()
}

#[cfg(test)]
#[path = "../../tests/src/stub/walker_tests.rs"]
mod tests;
