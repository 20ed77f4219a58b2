//! Train a goal over a digital system.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use console::style;

use discen_core::{ActionResult, EntityCondition};
use discen_runtime::{ExperienceSession, RuntimeConfig};

/// Train a goal over a digital system
#[derive(Parser)]
pub struct Train {
    /// Digital system description (RON or JSON)
    #[arg(value_name = "SYSTEM")]
    system: PathBuf,

    /// Goal name
    #[arg(short, long, default_value = "goal")]
    goal: String,

    /// Success condition as `entity.property=value`. `*` as the entity
    /// matches any entity, `**` requires all holders to match.
    #[arg(
        short,
        long = "condition",
        value_name = "COND",
        required_unless_present = "resume"
    )]
    conditions: Vec<String>,

    /// Maximum number of training episodes
    #[arg(short, long, default_value_t = 32)]
    episodes: u32,

    /// Engine configuration (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable deadlock detection regardless of configuration
    #[arg(long)]
    deadlock: bool,

    /// Only follow known suggestions instead of exploring
    #[arg(long)]
    no_learning: bool,

    /// Write the learned experience to this file
    #[arg(short, long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Start from a previously saved experience
    #[arg(short, long, value_name = "FILE")]
    resume: Option<PathBuf>,
}

impl Train {
    pub fn execute(self, config: RuntimeConfig) -> Result<()> {
        let mut session = ExperienceSession::new(config);
        if let Some(path) = &self.config {
            session
                .load_configuration(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
        }
        if self.deadlock {
            session.engine_mut().set_deadlock_detection(true);
        }
        session
            .load_digital_system(&self.system)
            .with_context(|| format!("Failed to load system: {}", self.system.display()))?;

        match &self.resume {
            Some(path) => session
                .load_current_experience(path)
                .with_context(|| format!("Failed to load experience: {}", path.display()))?,
            None => {
                let engine = session.engine_mut();
                engine.add_new_goal(&self.goal)?;
                engine.set_current_goal(&self.goal)?;
                for text in &self.conditions {
                    engine.add_success_condition(parse_condition(text)?)?;
                }
            }
        }

        let engine = session.engine_mut();
        println!(
            "{} {} ({} conditions, deadlock detection {})",
            style("Goal:").bold().cyan(),
            engine.current_goal().unwrap_or_default(),
            engine.success_conditions()?.len(),
            if engine.deadlock_detection() { "on" } else { "off" }
        );

        let mut reached = false;
        for episode in 1..=self.episodes {
            let result = engine.train_agent(true, !self.no_learning)?;
            let label = match result {
                ActionResult::Succeeded => style(result.to_string()).green(),
                ActionResult::InProgress => style(result.to_string()).dim(),
                _ => style(result.to_string()).red(),
            };
            println!(
                "  episode {:>3}: {} after {} steps",
                episode,
                label,
                engine.episode_steps()
            );
            if result == ActionResult::Succeeded {
                reached = true;
                break;
            }
        }

        if !reached {
            bail!("Goal not reached within {} episodes", self.episodes);
        }

        // Replay the best known route without recording.
        engine.new_episode()?;
        println!();
        println!("{}", style("=== Route ===").bold().green());
        let max_steps = engine.configuration().max_episode_steps;
        for _ in 0..max_steps {
            let Some(action) = engine.suggested_actions()?.into_iter().next() else {
                break;
            };
            let result = engine.do_action(&action, false)?;
            println!("  {} -> {}", action, result);
            if result.is_terminal() || result == ActionResult::Denied {
                break;
            }
        }

        if let Some(path) = &self.save {
            session
                .save_current_experience(path)
                .with_context(|| format!("Failed to save experience: {}", path.display()))?;
            println!();
            println!("{} {}", style("Saved:").bold().cyan(), path.display());
        }
        Ok(())
    }
}

fn parse_condition(text: &str) -> Result<EntityCondition> {
    let (target, value) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("Condition must look like entity.property=value: {}", text))?;
    let (entity, property) = target
        .split_once('.')
        .ok_or_else(|| anyhow!("Condition must look like entity.property=value: {}", text))?;
    if property.is_empty() || value.is_empty() {
        bail!("Condition has an empty property or value: {}", text);
    }
    Ok(match entity {
        "*" => EntityCondition::any(property, value),
        "**" => EntityCondition::all(property, value),
        _ => EntityCondition::new(entity, property, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_condition() {
        let condition = parse_condition("parcel.location=b").unwrap();
        assert_eq!(condition, EntityCondition::new("parcel", "location", "b"));
        assert_eq!(
            parse_condition("*.state=open").unwrap().entity_id,
            EntityCondition::ANY_ENTITY
        );
        assert!(parse_condition("parcel=b").is_err());
        assert!(parse_condition("parcel.location").is_err());
    }

    #[test]
    fn test_conditions_optional_when_resuming() {
        assert!(Train::try_parse_from(["train", "system.ron"]).is_err());
        assert!(Train::try_parse_from(["train", "system.ron", "-c", "door.state=open"]).is_ok());
        assert!(Train::try_parse_from(["train", "system.ron", "--resume", "xp.json"]).is_ok());
    }
}
