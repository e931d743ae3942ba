use std::path::Path;

use anyhow::Context;
use dotsizer::{sizer::tree::NodeRef, SizeReport};
use serde::Serialize;

use crate::{
    app::{GlobalOptions, Units},
    commands::common::{build_sizer, load_snapshot, total_length},
    output::{format_size, print_output, Align, TabWriter},
};

pub struct TreeOptions<'a> {
    pub assembly: Option<&'a Path>,
    pub threshold: Option<u64>,
    pub depth: Option<usize>,
    pub units: Units,
    pub cost_model: Option<&'a Path>,
    pub global: &'a GlobalOptions,
}

#[derive(Debug, Serialize)]
struct TreeEntry {
    label: String,
    kind: String,
    cost: u64,
    children: Vec<TreeEntry>,
    /// Children cut off by `--depth`
    #[serde(skip_serializing_if = "is_zero")]
    hidden_children: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl TreeEntry {
    fn new(node: NodeRef<'_>, max_depth: Option<usize>) -> Self {
        let expand = max_depth.map_or(true, |max| node.depth() < max);
        let children: Vec<_> = if expand {
            node.children()
                .map(|child| TreeEntry::new(child, max_depth))
                .collect()
        } else {
            Vec::new()
        };
        TreeEntry {
            label: node.label().to_string(),
            kind: node.kind().to_string().to_lowercase(),
            cost: node.cost(),
            hidden_children: node.child_count() - children.len(),
            children,
        }
    }
}

#[derive(Debug, Serialize)]
struct TreeInfo {
    name: String,
    total_size: u64,
    estimated_size: u64,
    unresolved_types: usize,
    tree: TreeEntry,
}

impl TreeInfo {
    fn new(report: &SizeReport, max_depth: Option<usize>) -> Self {
        TreeInfo {
            name: report.name().to_string(),
            total_size: report.total_size(),
            estimated_size: report.estimated_size(),
            unresolved_types: report.unresolved_types(),
            tree: TreeEntry::new(report.tree().root(), max_depth),
        }
    }
}

pub fn run(path: &Path, opts: &TreeOptions) -> anyhow::Result<()> {
    let snapshot = load_snapshot(path)?;
    let total = total_length(&snapshot, opts.assembly)?;

    let mut sizer = build_sizer(opts.cost_model)?;
    if let Some(threshold) = opts.threshold {
        sizer = sizer.with_filter(threshold);
    }
    let report = sizer
        .analyze(&snapshot, total)
        .with_context(|| format!("failed to size '{}'", snapshot.name))?;

    let info = TreeInfo::new(&report, opts.depth);
    print_output(&info, opts.global, |info| {
        let mut writer = TabWriter::new(vec![("Size", Align::Right), ("Element", Align::Left)]);
        print_entry(&mut writer, &info.tree, 0, info.total_size, opts.units);
        writer.print();
    })
}

fn print_entry(writer: &mut TabWriter, entry: &TreeEntry, depth: usize, total: u64, units: Units) {
    writer.row(vec![
        format_size(entry.cost, total, units),
        format!("{}{}", "  ".repeat(depth), entry.label),
    ]);
    for child in &entry.children {
        print_entry(writer, child, depth + 1, total, units);
    }
}
