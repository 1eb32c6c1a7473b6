use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use isles::{timed, MapConfig, TerrainMap};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for generating island maps via the Isles generator.
#[derive(Debug, StructOpt)]
#[structopt(name = "isles")]
struct Opt {
    /// Path to a config file that defines the map to be generated. Supported
    /// formats: JSON, TOML. Any field left out uses its default value.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Path to an existing .bin map file to load
    #[structopt(short, long)]
    bin: Option<PathBuf>,

    /// If given, the map will be saved to this directory. The exact files
    /// that appear in the directory are defined by the output formats. See
    /// `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the map in. Supported formats:
    ///
    /// bin - Binary representation that can be reloaded by this CLI later.
    ///   Use this for persisting & sharing maps
    ///
    /// cfg - The full config object used for the map, in TOML format
    ///
    /// json - JSON representation. Similar to the binary format, but slower
    ///   and much less compact
    ///
    /// txt - Text preview of the map, with `#` for land and `~` for water
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// Print a text preview of the map to stdout
    #[structopt(short, long)]
    preview: bool,

    /// The logging level to use during map generation. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the map in a serialized binary format, which can be
    /// deserialized later to recover the map
    Bin,
    /// Export the map's full config in a human-readable file
    Cfg,
    /// Export the map in a serialized JSON format
    Json,
    /// Export a text preview of the map
    Txt,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::Cfg => "toml",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }

    /// Serialize the map into this format
    fn generate_bytes(self, map: &TerrainMap) -> anyhow::Result<Vec<u8>> {
        Ok(match self {
            Self::Bin => map.to_bin(),
            Self::Cfg => toml::to_string_pretty(map.config())
                .context("error serializing config")?
                .into_bytes(),
            Self::Json => map.to_json().into_bytes(),
            Self::Txt => map.to_ascii().into_bytes(),
        })
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<MapConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Write the map to a file in the given format
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    map: &TerrainMap,
) -> anyhow::Result<()> {
    let output_file_path = output_dir
        .join("map")
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = output_format.generate_bytes(map)?;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let map = match opt {
        Opt {
            config: Some(ref config_path),
            bin: None,
            ..
        } => {
            let config = load_config(config_path)?;
            TerrainMap::generate(config)?
        }
        Opt {
            config: None,
            bin: Some(ref input_path),
            ..
        } => {
            let file =
                OpenOptions::new().read(true).open(input_path).with_context(
                    || format!("error opening map file {:?}", input_path),
                )?;
            let map = TerrainMap::from_bin(file)?;
            info!("Loaded map from {:?}", input_path);
            map
        }
        _ => bail!(
            "must pass exactly one of --config (to generate a new map) \
            or --bin (to load an existing map)"
        ),
    };

    if opt.preview {
        print!("{}", map.to_ascii());
    }

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(&output_dir)?;

        for output_format in opt.output_formats {
            gen_output(&output_dir, output_format, &map)?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
