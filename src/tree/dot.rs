use super::DerivationNode;

fn escape_label(symbol: &str) -> String {
    symbol.replace('\\', "\\\\").replace('"', "\\\"")
}

impl DerivationNode {
    /// Converts the tree to the [graphviz](https://graphviz.org/docs/layouts/dot/) dot language.
    /// Nodes are numbered `node1`, `node2`, ... in pre-order.
    pub fn to_dot(&self) -> String {
        let mut lines = Vec::new();
        let mut count = 0;
        self.dot_lines(None, &mut count, &mut lines);

        format!(
            "digraph derivation {{\n\
                {}\
            }}\n",
            lines.iter()
                .map(|l| format!("\t{}\n", l))
                .collect::<String>()
        )
    }

    fn dot_lines(&self, parent: Option<&str>, count: &mut usize, lines: &mut Vec<String>) {
        *count += 1;
        let id = format!("node{}", count);

        lines.push(format!("{} [label=\"{}\"];", id, escape_label(&self.symbol)));
        if let Some(parent) = parent {
            lines.push(format!("{} -> {};", parent, id));
        }

        for child in &self.children {
            child.dot_lines(Some(id.as_str()), count, lines);
        }
    }
}
