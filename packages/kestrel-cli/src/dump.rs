use kestrel_base::{Field, FieldValue, Visitor, VisitorNodeId};
use serde::Serialize;

/// Owned copy of a visitor subtree, for printing.
#[derive(Debug, Serialize)]
pub struct DumpNode {
    pub name: String,
    pub fields: Vec<Field>,
    pub children: Vec<DumpNode>,
}

impl DumpNode {
    pub fn from_visitor(visitor: &Visitor) -> Option<Self> {
        Self::build(visitor, visitor.root())
    }

    fn build(visitor: &Visitor, id: VisitorNodeId) -> Option<Self> {
        let node = visitor.node(id)?;
        Some(Self {
            name: node.name().to_string(),
            fields: node.fields().to_vec(),
            children: node
                .children()
                .iter()
                .filter_map(|&child| Self::build(visitor, child))
                .collect(),
        })
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(DumpNode::count).sum::<usize>()
    }

    pub fn print(&self, depth: usize) {
        let indent = "  ".repeat(depth);
        println!("{}{}", indent, self.name);
        for field in &self.fields {
            println!("{}  .{} = {}", indent, field.name, describe(&field.value));
        }
        for child in &self.children {
            child.print(depth + 1);
        }
    }
}

fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => format!("{:?}", s),
        FieldValue::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        FieldValue::Color(c) => format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_base::Visit;

    #[test]
    fn test_dump_copies_the_whole_tree() {
        let mut visitor = Visitor::writer();
        let mut title = "demo".to_string();
        let mut items = vec![1u32, 2, 3];
        title.visit("Title", &mut visitor);
        items.visit("Items", &mut visitor);

        let tree = DumpNode::from_visitor(&visitor).unwrap();
        assert_eq!(tree.fields.len(), 1);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "Items");
        assert_eq!(tree.children[0].fields.len(), 4);
        assert_eq!(tree.count(), 2);

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["children"][0]["fields"][0]["name"], "Count");
    }

    #[test]
    fn test_bytes_are_summarized() {
        assert_eq!(describe(&FieldValue::Bytes(vec![0; 16])), "<16 bytes>");
        assert_eq!(describe(&FieldValue::String("a".into())), "\"a\"");
    }
}
