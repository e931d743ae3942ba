use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::{
    app::{GlobalOptions, Units},
    commands::common::{build_sizer, load_snapshot, total_length},
    output::{format_size, print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct ElementInfo {
    path: Vec<String>,
    kind: String,
    size: u64,
    share: f64,
}

#[derive(Debug, Serialize)]
struct TopInfo {
    module: String,
    total_size: u64,
    elements: Vec<ElementInfo>,
}

pub fn run(
    path: &Path,
    assembly: Option<&Path>,
    count: usize,
    cost_model: Option<&Path>,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(path)?;
    let total = total_length(&snapshot, assembly)?;
    let report = build_sizer(cost_model)?
        .analyze(&snapshot, total)
        .with_context(|| format!("failed to size '{}'", snapshot.name))?;

    let tree = report.tree();
    let elements = tree
        .leaves()
        .into_iter()
        .take(count)
        .map(|leaf| ElementInfo {
            path: leaf.path().into_iter().map(str::to_string).collect(),
            kind: leaf.kind().to_string(),
            size: leaf.cost(),
            share: leaf.share_of(tree.total()),
        })
        .collect();

    let info = TopInfo {
        module: report.name().to_string(),
        total_size: report.total_size(),
        elements,
    };

    print_output(&info, opts, |info| {
        let mut writer = TabWriter::new(vec![
            ("Bytes", Align::Right),
            ("Share", Align::Right),
            ("Element", Align::Left),
        ]);
        for element in &info.elements {
            writer.row(vec![
                element.size.to_string(),
                format_size(element.size, info.total_size, Units::Percent),
                element.path.join(" / "),
            ]);
        }
        writer.print();
    })
}
