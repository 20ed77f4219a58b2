//! Load a scenario document and print its contents.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use discen_core::ElementData;
use discen_runtime::{RuntimeConfig, ScenarioContext, TracingSink};

/// Load a scenario document and print its contents
#[derive(Parser)]
pub struct Inspect {
    /// Scenario document, relative to the project directory
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Only show this element
    #[arg(short, long, value_name = "ID")]
    element: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Entities and elements with world locations
    Summary,
    /// The scenario document as JSON
    Json,
}

impl Inspect {
    pub fn execute(self, config: RuntimeConfig) -> Result<()> {
        let mut ctx = ScenarioContext::builder()
            .config(config)
            .message_sink(Arc::new(TracingSink))
            .build();
        ctx.initialize();
        ctx.load_scenario(&self.scenario)
            .with_context(|| format!("Failed to load scenario: {}", self.scenario.display()))?;

        if matches!(self.format, OutputFormat::Json) {
            println!("{}", ctx.scenario_json()?);
            return Ok(());
        }

        if let Some(id) = &self.element {
            let element = ctx.element(id)?;
            print_element(&ctx, &element)?;
            println!(
                "  {} {}",
                style("Transform:").dim(),
                serde_json::to_string_pretty(&element.local_transform)?
            );
            return Ok(());
        }

        let entities = ctx.entities()?;
        let elements = ctx.elements()?;
        println!(
            "{} {}",
            style("Scenario:").bold().cyan(),
            ctx.config().resolve(&self.scenario).display()
        );
        println!(
            "{} {} entities, {} elements",
            style("Contents:").bold().cyan(),
            entities.len(),
            elements.len()
        );
        println!();

        println!("{}", style("=== Entities ===").bold().green());
        for entity in entities.iter().filter(|e| !ctx.scenario().is_element(&e.identifier)) {
            println!(
                "  {} {} {}",
                style(&entity.identifier).yellow(),
                style(&entity.entity_type).dim(),
                entity.description
            );
        }
        println!();

        println!("{}", style("=== Elements ===").bold().green());
        for element in &elements {
            print_element(&ctx, element)?;
        }
        Ok(())
    }
}

fn print_element(ctx: &ScenarioContext, element: &ElementData) -> Result<()> {
    let location = ctx.element_location(element.identifier())?;
    let parent = element.local_transform.parent().unwrap_or("-");
    println!(
        "  {} {} parent={} world=({:.2}, {:.2}, {:.2})",
        style(element.identifier()).yellow(),
        style(&element.entity.entity_type).dim(),
        parent,
        location.right,
        location.forward,
        location.up
    );
    if element.entity.asset.is_defined() {
        println!(
            "    asset {} {}",
            element.entity.asset.source, element.entity.asset.uri
        );
    }
    Ok(())
}
