//! Thin binary wrapper around the `glyphscope` library.
//!
//! Logging setup and argument parsing live here so the library stays
//! unopinionated. A startup failure (unloadable font, unrenderable initial
//! symbol) propagates out of `main` and exits the process with code 1.

use std::path::PathBuf;

use anyhow::{Context as _, bail};

use glyphscope::ViewerOptions;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("glyphscope {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = parse_options(&args)?;

    env_logger::init();
    glyphscope::run_viewer(options)
}

fn parse_options(args: &[String]) -> anyhow::Result<ViewerOptions> {
    let mut options = ViewerOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--font" => {
                let path = iter.next().context("--font requires a file path")?;
                options.font_path = Some(PathBuf::from(path));
            }
            "--symbol" => {
                let value = iter.next().context("--symbol requires a character")?;
                let mut chars = value.chars();
                let ch = chars.next().context("--symbol requires a character")?;
                if chars.next().is_some() {
                    bail!("--symbol takes a single character, got {value:?}");
                }
                options.symbol = ch;
            }
            "--quality" => {
                let value = iter.next().context("--quality requires a tier")?;
                options.quality = value.parse().map_err(anyhow::Error::msg)?;
            }
            other => bail!("unknown argument {other:?} (try --help)"),
        }
    }

    Ok(options)
}

fn print_usage() {
    println!("glyphscope {}", env!("CARGO_PKG_VERSION"));
    println!("Render a single font glyph as a triangle mesh\n");
    println!("USAGE:");
    println!("    glyphscope [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --font <path>        Font file to load (default: a system serif face)");
    println!("    --symbol <char>      Initial symbol to display (default: 'a')");
    println!("    --quality <tier>     Triangulation quality: low, normal, high");
    println!("    --version, -V        Print version information");
    println!("    --help, -h           Print this help message\n");
    println!("KEYS:");
    println!("    any printable key    Show that symbol's glyph");
    println!("    Space                Cycle contours / wireframe / solid");
    println!("    Esc                  Quit");
}
