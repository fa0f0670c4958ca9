use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;

use linkclash::{clash_to_link, link_to_clash, OutputMode};

/// Convert between proxy share links and Clash proxy-list YAML
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file, or `-` for stdin
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// Convert YAML back to share links instead of links to YAML
    #[arg(short, long)]
    reverse: bool,

    /// How to wrap the generated proxy list
    #[arg(short, long, value_enum, default_value = "proxies")]
    mode: Mode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Proxies,
    Payload,
    None,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Proxies => OutputMode::Proxies,
            Mode::Payload => OutputMode::Payload,
            Mode::None => OutputMode::None,
        }
    }
}

fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    let input = match &args.input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let result = if args.reverse {
        clash_to_link(&input)
    } else {
        link_to_clash(input.lines(), args.mode.into())
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &result.data)?;
            info!("wrote output to {}", path.display());
        }
        None => println!("{}", result.data),
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
