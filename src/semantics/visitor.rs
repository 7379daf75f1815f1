use crate::{ast::ast::Node, errors::errors::Error};

/// A visitor hook. Receives the node and the walk's context, and hands the
/// context back (possibly updated) or aborts the walk with an error.
pub type Hook<C> = fn(&Node, C) -> Result<C, Error>;

/// Walks `node` and all of its descendants in source order.
///
/// `before` runs on a node ahead of its children and `after` once all of
/// them are done. The first error returned by either hook stops the walk
/// and is returned unchanged.
pub fn visit<C>(
    node: &Node,
    before: Option<Hook<C>>,
    after: Option<Hook<C>>,
    context: C,
) -> Result<C, Error> {
    let mut context = match before {
        Some(hook) => hook(node, context)?,
        None => context,
    };

    for child in node.children() {
        context = visit(child, before, after, context)?;
    }

    match after {
        Some(hook) => hook(node, context),
        None => Ok(context),
    }
}
