//! Plain-text rendering of a (partially loaded) project tree.

use crate::fs::tree::{NodeType, TreeNode};

/// Render `root` and every materialized descendant with box-drawing connectors.
///
/// Unloaded directories are marked `▸`, loaded ones `▾`.
pub fn render_tree(root: &TreeNode) -> String {
    let mut out = String::new();
    push_line(&mut out, "", root);
    render_children(root, "", &mut out);
    out
}

fn render_children(node: &TreeNode, prefix: &str, out: &mut String) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        push_line(out, &format!("{prefix}{connector}"), child);

        let continuation = if is_last { "    " } else { "│   " };
        render_children(child, &format!("{prefix}{continuation}"), out);
    }
}

fn push_line(out: &mut String, prefix: &str, node: &TreeNode) {
    out.push_str(prefix);
    out.push_str(indicator(node));
    out.push_str(&node.name);
    if let Some(size) = node.size {
        out.push_str(&format!(" ({})", format_size(size)));
    }
    out.push('\n');
}

fn indicator(node: &TreeNode) -> &'static str {
    match node.node_type {
        NodeType::Directory if node.is_loaded => "▾ ",
        NodeType::Directory => "▸ ",
        NodeType::File => "",
    }
}

/// Format bytes into human-readable size string.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::source::EntryMeta;
    use std::path::Path;

    fn file(parent: &Path, name: &str, len: u64) -> TreeNode {
        let meta = EntryMeta {
            is_dir: false,
            len,
            modified: None,
        };
        TreeNode::from_meta(name.into(), parent.join(name), &meta)
    }

    fn dir(parent: &Path, name: &str) -> TreeNode {
        let meta = EntryMeta {
            is_dir: true,
            len: 0,
            modified: None,
        };
        TreeNode::from_meta(name.into(), parent.join(name), &meta)
    }

    #[test]
    fn renders_connectors_and_markers() {
        let p = Path::new("/proj");
        let mut sub = dir(p, "sub");
        sub.is_loaded = true;
        sub.children = vec![dir(&p.join("sub"), "deep"), file(&p.join("sub"), "b.txt", 0)];
        let mut root = dir(Path::new("/"), "proj");
        root.is_loaded = true;
        root.children = vec![sub, file(p, "a.txt", 10)];

        let expected = "\
▾ proj
├── ▾ sub
│   ├── ▸ deep
│   └── b.txt (0 B)
└── a.txt (10 B)
";
        assert_eq!(render_tree(&root), expected);
    }

    #[test]
    fn renders_single_file_root() {
        let root = file(Path::new("/proj"), "main.rs", 2048);
        assert_eq!(render_tree(&root), "main.rs (2.00 KB)\n");
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
    }
}
