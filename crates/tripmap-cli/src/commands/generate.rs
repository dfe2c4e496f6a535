//! Generate command implementation

use crate::cli::GenerateArgs;
use crate::dry_run::{display_planned_actions, ActionType, PlannedAction};
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{GenerateOutput, ZoneRow};
use anyhow::{Context, Result};
use tripmap_core::config::{CliConfigOverrides, LayeredConfig};
use tripmap_core::formats::{ArtifactKind, MapOptions};
use tripmap_core::pipeline::{artifact_path, Pipeline, TripReport};

use super::resolve_source;

pub fn execute(
    args: GenerateArgs,
    mut config: LayeredConfig,
    output: &OutputWriter,
    dry_run: bool,
) -> Result<()> {
    config.update_from_cli(CliConfigOverrides {
        output_dir: args.output_dir.clone(),
        ..Default::default()
    });

    let catalog = config.catalog().context("Failed to build region catalog")?;
    let source = resolve_source(
        args.country.as_deref(),
        args.input.as_deref(),
        args.interactive,
        &config,
        output,
    )?;

    let pipeline = Pipeline::new(&catalog).with_map_options(MapOptions {
        tiles: config.tile_layer(),
        map_id: args.map_id.clone(),
    });
    let output_dir = &config.output_dir.value;

    if dry_run {
        // Reading the table is side-effect free and catches source errors early
        let trip = pipeline.load(&source.country, &source.path)?;
        let region = pipeline.region(&trip.country);

        let mut actions = Vec::new();
        if !output_dir.is_dir() {
            actions.push(PlannedAction::new(
                ActionType::CreateDirectory,
                format!("Create {}", output_dir.display()),
            ));
        }
        for kind in ArtifactKind::ALL {
            let target = artifact_path(output_dir, kind, &source.country);
            actions.push(
                PlannedAction::new(
                    ActionType::WriteFile,
                    format!("Write {} to {}", kind, target.display()),
                )
                .with_detail(format!("Source: {}", source.path.display()))
                .with_detail(format!("Region: {}", region.name()))
                .with_detail(format!("Locations: {}", trip.pois.len())),
            );
        }

        return display_planned_actions(output, &actions);
    }

    let report = pipeline.run(&source.country, &source.path, output_dir)?;

    if output.is_json() {
        output.result(GenerateOutput::from(&report))?;
    } else {
        print_report(&report, output);
    }

    if !report.all_written() {
        let failed: Vec<String> = report
            .failures()
            .map(|a| match a.error() {
                Some(e) => format!("{}: {}", a.kind, e),
                None => a.kind.to_string(),
            })
            .collect();
        return Err(errors::artifacts_failed(&failed).into());
    }

    Ok(())
}

fn print_report(report: &TripReport, output: &OutputWriter) {
    for row in &report.skipped {
        let line = row
            .line
            .map(|l| format!("line {}", l))
            .unwrap_or_else(|| "unknown line".to_string());
        output.warning(format!("Skipped {} ({}): {}", line, row.name, row.reason));
    }

    output.section(format!("{} trip ({} zones)", report.country, report.region));
    output.kv("Source", report.source.display());
    output.kv("Locations", report.poi_count);
    output.table(report.zones.iter().map(ZoneRow::from).collect());

    output.section("Artifacts");
    for artifact in &report.artifacts {
        match artifact.error() {
            None => {
                output.success(format!("Wrote {} to {}", artifact.kind, artifact.path.display()))
            }
            Some(e) => output.error(format!("Failed to write {}: {}", artifact.kind, e)),
        }
    }
}
