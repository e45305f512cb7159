use anyhow::{Context, Result};
use clap::Parser;
use pm_core::config::PipelineConfig;

pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis appliquer les overrides CLI
    let config = apply_overrides(resolve_config(&cli)?, &cli);

    // 4. Charger, traiter, écrire
    let image = pm_io::load_image(&cli.input)?;
    let image = pm_ops::pipeline::run(image, &config)
        .with_context(|| format!("Échec du pipeline sur {}", cli.input.display()))?;
    pm_io::save_image(&image, &cli.output)?;

    log::info!("Terminé.");
    Ok(())
}

fn resolve_config(cli: &cli::Cli) -> Result<PipelineConfig> {
    if cli.config.exists() {
        pm_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(PipelineConfig::default())
    }
}

fn apply_overrides(mut config: PipelineConfig, cli: &cli::Cli) -> PipelineConfig {
    if let Some(method) = cli.sampling {
        config.sampling = method;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.steps.extend(cli.ops.iter().cloned());
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::config::Operation;
    use pm_core::sampler::SamplingMethod;

    fn parse(args: &[&str]) -> cli::Cli {
        let mut full = vec!["pixmill", "-i", "in.png", "-o", "out.png"];
        full.extend_from_slice(args);
        cli::Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn cli_steps_run_after_config_steps() {
        let base = PipelineConfig {
            steps: vec![Operation::Quantize { bits: 2 }],
            ..PipelineConfig::default()
        };
        let config = apply_overrides(base, &parse(&["--op", "edge", "--seed", "3"]));
        assert_eq!(
            config.steps,
            vec![Operation::Quantize { bits: 2 }, Operation::EdgeDetect]
        );
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.sampling, SamplingMethod::Point);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let cli = parse(&["-c", missing.to_str().unwrap()]);
        assert_eq!(resolve_config(&cli).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[[steps]]\nop = \"blur\"\nradius = 0\n").unwrap();
        let cli = parse(&["-c", path.to_str().unwrap()]);
        assert!(resolve_config(&cli).is_err());
    }
}
