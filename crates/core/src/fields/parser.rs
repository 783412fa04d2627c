//! Single-pass parser for field selector strings.
//!
//! Open groups live on an explicit stack, so nesting depth is bounded by
//! memory rather than by the call stack.
//!
//! The parser never fails. Malformed input is recovered from with three
//! fixed rules:
//!
//! - empty segments (`a,,b`, trailing `,`) are dropped
//! - groups still open at end of input are closed implicitly
//! - closing parentheses with no open group are consumed and ignored

use super::FieldNode;

/// Parse a selector string such as `id,project(id,name)` into a forest.
pub fn parse_field_string(input: &str) -> Vec<FieldNode> {
    let mut parser = Parser::new();
    let mut start = 0;

    for (pos, c) in input.char_indices() {
        match c {
            ',' => parser.push_leaf(&input[start..pos]),
            '(' => parser.open(&input[start..pos]),
            ')' => {
                parser.push_leaf(&input[start..pos]);
                // A `)` with nothing open is absorbed.
                parser.close();
            }
            _ => continue,
        }
        start = pos + 1;
    }

    parser.push_leaf(&input[start..]);
    while parser.close() {}

    parser.root
}

/// A group whose `(` has been read but not its `)`.
struct Group<'a> {
    name: &'a str,
    children: Vec<FieldNode>,
}

struct Parser<'a> {
    root: Vec<FieldNode>,
    open: Vec<Group<'a>>,
}

impl<'a> Parser<'a> {
    fn new() -> Self {
        Self {
            root: Vec::new(),
            open: Vec::new(),
        }
    }

    /// The level new nodes are appended to: the innermost open group, or the root.
    fn level(&mut self) -> &mut Vec<FieldNode> {
        match self.open.last_mut() {
            Some(group) => &mut group.children,
            None => &mut self.root,
        }
    }

    fn push_leaf(&mut self, raw: &str) {
        let name = raw.trim();
        if !name.is_empty() {
            self.level().push(FieldNode::leaf(name));
        }
    }

    fn open(&mut self, raw_name: &'a str) {
        self.open.push(Group {
            name: raw_name.trim(),
            children: Vec::new(),
        });
    }

    /// Close the innermost group. Returns `false` when none is open.
    ///
    /// A group without a name is dropped along with its children.
    fn close(&mut self) -> bool {
        let Some(group) = self.open.pop() else {
            return false;
        };

        if !group.name.is_empty() {
            self.level()
                .push(FieldNode::branch(group.name, group.children));
        }
        true
    }
}
