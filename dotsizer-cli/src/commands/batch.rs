use std::path::{Path, PathBuf};

use dotsizer::metadata::snapshot::ModuleSnapshot;
use serde::Serialize;

use crate::{
    app::{GlobalOptions, Units},
    commands::common::{build_sizer, file_display_name, load_snapshot, total_length},
    output::{format_size, print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct ModuleSummary {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unresolved_types: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ModuleSummary {
    fn failed(file: String, error: &anyhow::Error) -> Self {
        ModuleSummary {
            file,
            module: None,
            total_size: None,
            estimated_size: None,
            unresolved_types: None,
            error: Some(format!("{error:#}")),
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    results: Vec<ModuleSummary>,
    total_files: usize,
    failed_count: usize,
}

fn load_entry(path: &Path) -> anyhow::Result<(ModuleSnapshot, u64)> {
    let snapshot = load_snapshot(path)?;
    let total = total_length(&snapshot, None)?;
    Ok((snapshot, total))
}

pub fn run(
    paths: &[PathBuf],
    cost_model: Option<&Path>,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let sizer = build_sizer(cost_model)?;

    let mut results = Vec::with_capacity(paths.len());
    let mut modules = Vec::new();
    let mut files = Vec::new();
    for path in paths {
        match load_entry(path) {
            Ok(entry) => {
                modules.push(entry);
                files.push(file_display_name(path));
            }
            Err(error) => results.push(ModuleSummary::failed(file_display_name(path), &error)),
        }
    }

    for (file, outcome) in files.into_iter().zip(sizer.analyze_batch(&modules)) {
        results.push(match outcome {
            Ok(report) => ModuleSummary {
                file,
                module: Some(report.name().to_string()),
                total_size: Some(report.total_size()),
                estimated_size: Some(report.estimated_size()),
                unresolved_types: Some(report.unresolved_types()),
                error: None,
            },
            Err(error) => ModuleSummary::failed(file, &error.into()),
        });
    }

    let failed_count = results.iter().filter(|r| r.error.is_some()).count();
    let summary = BatchSummary {
        total_files: paths.len(),
        failed_count,
        results,
    };

    print_output(&summary, opts, |summary| {
        let mut writer = TabWriter::new(vec![
            ("File", Align::Left),
            ("Module", Align::Left),
            ("Size", Align::Right),
            ("Attributed", Align::Right),
            ("Unresolved", Align::Right),
        ]);
        for entry in &summary.results {
            match (&entry.error, entry.total_size, entry.estimated_size) {
                (None, Some(total), Some(estimated)) => writer.row(vec![
                    entry.file.clone(),
                    entry.module.clone().unwrap_or_default(),
                    format_size(total, total, Units::Kb),
                    format_size(estimated, total, Units::Percent),
                    entry.unresolved_types.unwrap_or(0).to_string(),
                ]),
                (error, _, _) => writer.row(vec![
                    entry.file.clone(),
                    format!("error: {}", error.as_deref().unwrap_or("unknown")),
                    String::new(),
                    String::new(),
                    String::new(),
                ]),
            }
        }
        writer.print();
        println!();
        println!(
            "Sized {} files, {} failed",
            summary.total_files, summary.failed_count
        );
    })
}
