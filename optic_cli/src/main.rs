use clap::{Args, Parser, Subcommand};
use optic_core::*;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "optic")]
#[command(about = "Optical prescription validation and contact lens conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an eyeglass prescription and print the formatted fields
    Validate(ValidateArgs),

    /// Transpose a plus-cylinder prescription to minus-cylinder form
    Transpose {
        #[arg(long, allow_hyphen_values = true)]
        sph: String,

        #[arg(long, allow_hyphen_values = true)]
        cyl: String,

        #[arg(long, allow_hyphen_values = true)]
        axis: String,
    },

    /// Convert to a spherical contact lens
    Spheric(LensArgs),

    /// Convert to a toric contact lens
    Toric(LensArgs),

    /// Convert a CSV of prescriptions (columns SPH, CY, AX, BV, ADD)
    Batch {
        /// Lens design: spheric or toric
        #[arg(long, default_value = "spheric")]
        kind: LensKind,

        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Output CSV file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ValidateArgs {
    #[arg(long, allow_hyphen_values = true)]
    sph: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    cyl: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    axis: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    add: Option<String>,

    /// Pupillary distance (mm)
    #[arg(long, allow_hyphen_values = true)]
    pd: Option<String>,

    /// Segment height (mm)
    #[arg(long, allow_hyphen_values = true)]
    sg: Option<String>,

    /// Vertex distance (mm)
    #[arg(long, allow_hyphen_values = true)]
    bv: Option<String>,
}

#[derive(Args)]
struct LensArgs {
    #[arg(long, allow_hyphen_values = true)]
    sph: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    cyl: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    axis: Option<String>,

    /// Vertex distance (mm)
    #[arg(long, allow_hyphen_values = true)]
    bv: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    add: Option<String>,
}

impl From<LensArgs> for ContactLensInput {
    fn from(args: LensArgs) -> Self {
        ContactLensInput {
            sph: args.sph.map(FieldValue::Text),
            cy: args.cyl.map(FieldValue::Text),
            ax: args.axis.map(FieldValue::Text),
            bv: args.bv.map(FieldValue::Text),
            add: args.add.map(FieldValue::Text),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    optic_core::logging::init_with_level(&config.logging.level);

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Validate(args) => cmd_validate(args),
        Commands::Transpose { sph, cyl, axis } => cmd_transpose(sph, cyl, axis),
        Commands::Spheric(args) => {
            let lens = convert_to_spheric_with(&args.into(), &config.conversion)?;
            print_json(&lens)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Toric(args) => {
            let lens = convert_to_toric_with(&args.into(), &config.conversion)?;
            print_json(&lens)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Batch {
            kind,
            input,
            output,
        } => cmd_batch(kind, input, output, config),
    }
}

fn cmd_validate(args: ValidateArgs) -> Result<ExitCode> {
    let rx = Prescription {
        sphere: args.sph.map(FieldValue::Text),
        cylinder: args.cyl.map(FieldValue::Text),
        axis: args.axis.map(FieldValue::Text),
        add: args.add.map(FieldValue::Text),
        pd: args.pd.map(FieldValue::Text),
        segment_height: args.sg.map(FieldValue::Text),
        vertex_distance: args.bv.map(FieldValue::Text),
    };

    let report = validate_prescription(&rx);
    print_json(&report)?;

    if report.valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_transpose(sph: String, cyl: String, axis: String) -> Result<ExitCode> {
    let sph = parse_number(sph, Field::Sphere)?;
    let cyl = parse_number(cyl, Field::Cylinder)?;
    let axis = parse_number(axis, Field::Axis)?;

    match transform_sph_cyl_axis(sph, cyl, axis) {
        Some(transposed) => {
            print_json(&transposed)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Cannot transpose: cylinder must be positive and the axis within 0-180");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_batch(
    kind: LensKind,
    input: PathBuf,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<ExitCode> {
    let reader = File::open(&input)?;

    let summary = match output {
        Some(path) => convert_csv(reader, File::create(&path)?, kind, &config.conversion)?,
        None => convert_csv(reader, io::stdout().lock(), kind, &config.conversion)?,
    };

    eprintln!(
        "✓ Converted {} rows to {} lenses ({} skipped)",
        summary.converted, kind, summary.skipped
    );

    Ok(ExitCode::SUCCESS)
}

fn parse_number(text: String, field: Field) -> Result<f64> {
    let value = FieldValue::Text(text);
    value.to_number().ok_or_else(|| Error::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
