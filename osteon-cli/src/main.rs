use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use osteon::{asset_importer::write_mesh, JointRotation, Pose, SkeletalModelBuilder, WeightPolicy};

#[derive(Parser, Debug)]
#[command(name = "osteon", about = "Pose a skinned mesh and write out the result")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a model and print its skeleton
    Inspect {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Apply joint rotations and write the deformed mesh
    Pose {
        #[command(flatten)]
        model: ModelArgs,
        /// JSON file of joint rotations
        #[arg(long)]
        pose: Option<PathBuf>,
        /// Extra rotation as JOINT:RX,RY,RZ in radians. Applied after --pose
        #[arg(long = "rotate", value_parser = parse_rotation)]
        rotations: Vec<JointRotation>,
        /// Where to write the posed mesh. Defaults to stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Skeleton file: `x y z parent` per joint
    #[arg(long)]
    skeleton: PathBuf,
    /// Mesh file: `v x y z` and `f i j k` lines
    #[arg(long)]
    mesh: PathBuf,
    /// Attachment weights: one line per vertex, one weight per non-root joint
    #[arg(long)]
    attachments: PathBuf,
    /// What to do with weights that don't sum to 1
    #[arg(long, value_enum, default_value_t = Weights::Validate)]
    weights: Weights,
    /// How far from 1 weights may sum when validating
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f32,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Weights {
    Validate,
    Normalize,
    Trust,
}

impl ModelArgs {
    fn load(&self) -> Result<osteon::SkeletalModel> {
        let weight_policy = match self.weights {
            Weights::Validate => WeightPolicy::Validate {
                tolerance: self.tolerance,
            },
            Weights::Normalize => WeightPolicy::Normalize,
            Weights::Trust => WeightPolicy::Trust,
        };

        SkeletalModelBuilder::new()
            .weight_policy(weight_policy)
            .load(&self.skeleton, &self.mesh, &self.attachments)
            .with_context(|| {
                format!(
                    "Unable to load model from {}, {} and {}",
                    self.skeleton.display(),
                    self.mesh.display(),
                    self.attachments.display()
                )
            })
    }
}

fn parse_rotation(value: &str) -> Result<JointRotation, String> {
    let (joint, angles) = value
        .split_once(':')
        .ok_or_else(|| format!("expected JOINT:RX,RY,RZ, got `{value}`"))?;
    let joint = joint
        .trim()
        .parse()
        .map_err(|_| format!("`{joint}` is not a joint index"))?;
    let angles = angles
        .split(',')
        .map(|a| a.trim().parse::<f32>().map_err(|_| format!("`{a}` is not an angle")))
        .collect::<Result<Vec<_>, _>>()?;
    let &[rx, ry, rz] = angles.as_slice() else {
        return Err(format!("expected three angles, got {}", angles.len()));
    };
    Ok(JointRotation { joint, rx, ry, rz })
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect { model } => {
            let model = model.load()?;
            let skeleton = model.skeleton();
            let mesh = model.mesh();
            println!(
                "{} joints, {} vertices, {} faces",
                skeleton.len(),
                mesh.vertex_count(),
                mesh.faces.len()
            );
            print!("{skeleton}");
        }
        Command::Pose {
            model,
            pose,
            rotations,
            out,
        } => {
            let mut model = model.load()?;
            let mut batch = match &pose {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("Unable to open pose {}", path.display()))?;
                    serde_json::from_reader(io::BufReader::new(file))
                        .with_context(|| format!("Unable to parse pose {}", path.display()))?
                }
                None => Pose::new(),
            };
            batch.rotations.extend(rotations);

            model.apply_pose(&batch)?;
            info!("Posed {} joints", batch.rotations.len());

            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Unable to create {}", path.display()))?;
                    write_mesh(model.mesh(), BufWriter::new(file))?;
                    info!("Wrote posed mesh to {}", path.display());
                }
                None => write_mesh(model.mesh(), io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
