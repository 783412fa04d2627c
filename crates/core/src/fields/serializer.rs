use super::FieldNode;

/// Render a forest back into selector syntax.
///
/// Inverse of [`super::parse_field_string`] for any string the parser itself
/// would produce. Malformed input is normalized: `id,project(name` comes
/// back as `id,project(name)`.
///
/// The walk keeps one sibling iterator per open group instead of recursing,
/// so arbitrarily deep forests render without growing the call stack.
pub fn serialize_field_structure(forest: &[FieldNode]) -> String {
    let mut out = String::new();
    // (remaining siblings, whether one was already written at this level)
    let mut stack = vec![(forest.iter(), false)];

    while let Some((siblings, written)) = stack.last_mut() {
        let Some(node) = siblings.next() else {
            stack.pop();
            if !stack.is_empty() {
                out.push(')');
            }
            continue;
        };

        if *written {
            out.push(',');
        }
        *written = true;
        out.push_str(&node.name);

        if let Some(children) = node.children.as_deref().filter(|c| !c.is_empty()) {
            out.push('(');
            stack.push((children.iter(), false));
        }
    }

    out
}
