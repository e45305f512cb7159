use std::path::PathBuf;

use clap::Parser;
use pm_core::config::Operation;
use pm_core::sampler::SamplingMethod;

/// pixmill : pipeline de traitement d'images raster.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF, TGA).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Image de sortie. Format choisi par l'extension : jpg/jpeg, png, tga, sinon BMP.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Fichier de pipeline TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Étape supplémentaire, exécutée après celles du fichier. Répétable.
    /// Ex : `blur:2`, `crop:0,0,64,64`, `scale:0.5`, `edge`, `fs:1`.
    #[arg(long = "op", value_name = "OP")]
    pub ops: Vec<Operation>,

    /// Échantillonnage initial : point, bilinear, gaussian.
    #[arg(long)]
    pub sampling: Option<SamplingMethod>,

    /// Graine pour le tramage aléatoire et le bruit.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_ops_in_order() {
        let cli = Cli::try_parse_from([
            "pixmill", "-i", "in.png", "-o", "out.jpg", "--op", "blur:2", "--op", "edge",
            "--op", "crop:0,0,8,8",
        ])
        .unwrap();
        assert_eq!(
            cli.ops,
            vec![
                Operation::Blur { radius: 2 },
                Operation::EdgeDetect,
                Operation::Crop {
                    x: 0,
                    y: 0,
                    width: 8,
                    height: 8
                },
            ]
        );
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn parses_sampling_and_seed() {
        let cli = Cli::try_parse_from([
            "pixmill", "-i", "a.bmp", "-o", "b.png", "--sampling", "gaussian", "--seed", "12",
        ])
        .unwrap();
        assert_eq!(cli.sampling, Some(SamplingMethod::Gaussian));
        assert_eq!(cli.seed, Some(12));
        assert!(cli.ops.is_empty());
    }

    #[test]
    fn rejects_unknown_op() {
        let res = Cli::try_parse_from(["pixmill", "-i", "a", "-o", "b", "--op", "melt:3"]);
        assert!(res.is_err());
    }

    #[test]
    fn input_and_output_are_required() {
        assert!(Cli::try_parse_from(["pixmill", "-o", "b.png"]).is_err());
        assert!(Cli::try_parse_from(["pixmill", "-i", "a.png"]).is_err());
    }
}
