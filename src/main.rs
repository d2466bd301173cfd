//! Luxfile - photometric file toolkit
//!
//! Inspects, validates, converts and rewrites IES (`.ies`) and EULUMDAT
//! (`.ldt`) files. The format is chosen by file extension.
//!
//! # Usage
//!
//! ```bash
//! luxfile info luminaire.ldt --json
//! luxfile info luminaire.ies --full
//! luxfile validate luminaire.ies --strict
//! luxfile convert luminaire.ldt luminaire.ies
//! luxfile upgrade old.ies new.ies
//! RUST_LOG=luxfile_core=debug luxfile reformat in.ies out.ies
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use luxfile_core::{
    convert, eulumdat,
    error::{LuxError, Result},
    ies, Eulumdat, IesDocument, ParseOptions,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Photometric file toolkit for IES and EULUMDAT
#[derive(Parser, Debug)]
#[command(name = "luxfile", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Treat line length violations and out-of-range fields as errors
    #[arg(long, global = true)]
    strict: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a file and print a summary
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Print the whole parsed document as JSON
        #[arg(long, conflicts_with = "json")]
        full: bool,
    },
    /// Parse and validate a file
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Convert a EULUMDAT file to IES
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
    /// Upgrade an IES file to LM-63-2002
    Upgrade {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
    /// Parse a file and write it back out in canonical form
    Reformat {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

/// A parsed file of either format.
#[derive(Serialize)]
#[serde(tag = "kind", content = "document", rename_all = "lowercase")]
enum Document {
    Ies(IesDocument),
    Eulumdat(Eulumdat),
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Summary {
    Ies {
        format: String,
        luminaire: Option<String>,
        keywords: usize,
        tilt: String,
        vertical_angles: usize,
        horizontal_angles: usize,
        max_candela: Option<f64>,
    },
    Eulumdat {
        luminaire: String,
        symmetry: u8,
        c_planes: usize,
        g_angles: usize,
        lamp_sets: usize,
        max_intensity: Option<f64>,
        fwhm: Option<f64>,
        fwtm: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "luxfile_core=debug"
    } else {
        "luxfile_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(directive.parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = ParseOptions::new().with_strict(cli.strict);

    match cli.command {
        Command::Info { file, json, full } => {
            let doc = load(&file, &options)?;
            if full {
                println!("{}", to_json(&doc)?);
            } else if json {
                println!("{}", to_json(&summarize(&doc))?);
            } else {
                let summary = summarize(&doc);
                print_summary(&file, &summary);
            }
        }
        Command::Validate { file } => {
            match load(&file, &options)? {
                Document::Ies(doc) => doc.validate(cli.strict)?,
                Document::Eulumdat(ldt) => ldt.validate(cli.strict)?,
            }
            println!("{}: OK", file.display());
        }
        Command::Convert { input, output } => {
            let converted = match load(&input, &options)? {
                Document::Eulumdat(ldt) => Document::Ies(convert::eulumdat_to_ies(&ldt)?),
                Document::Ies(doc) => Document::Eulumdat(convert::ies_to_eulumdat(&doc)?),
            };
            save(&converted, &output)?;
        }
        Command::Upgrade { input, output } => match load(&input, &options)? {
            Document::Ies(mut doc) => {
                doc.upgrade()?;
                save(&Document::Ies(doc), &output)?;
            }
            Document::Eulumdat(_) => {
                return Err(LuxError::Unsupported {
                    operation: "upgrading EULUMDAT files",
                })
            }
        },
        Command::Reformat { input, output } => {
            let doc = load(&input, &options)?;
            save(&doc, &output)?;
        }
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| LuxError::Conversion { message: e.to_string() })
}

fn is_ies(path: &Path) -> Result<bool> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("ies") => Ok(true),
        Some("ldt") => Ok(false),
        _ => Err(LuxError::UnsupportedFormat {
            found: path.display().to_string(),
        }),
    }
}

fn load(path: &Path, options: &ParseOptions) -> Result<Document> {
    if is_ies(path)? {
        Ok(Document::Ies(ies::parse_file(path, options)?))
    } else {
        Ok(Document::Eulumdat(eulumdat::parse_file(path, options)?))
    }
}

fn save(doc: &Document, path: &Path) -> Result<()> {
    let target_is_ies = is_ies(path)?;
    let written = match doc {
        Document::Ies(doc) if target_is_ies => ies::export_file(doc, path)?,
        Document::Eulumdat(ldt) if !target_is_ies => eulumdat::export_file(ldt, path)?,
        _ => {
            return Err(LuxError::UnsupportedFormat {
                found: format!("{} (extension does not match document format)", path.display()),
            })
        }
    };
    eprintln!("wrote {} bytes to {}", written, path.display());
    Ok(())
}

fn summarize(doc: &Document) -> Summary {
    match doc {
        Document::Ies(doc) => Summary::Ies {
            format: doc.format.to_string(),
            luminaire: doc.keywords.get("LUMINAIRE").map(String::from),
            keywords: doc.keywords.len(),
            tilt: doc.tilt.label().to_string(),
            vertical_angles: doc.number_vertical_angles,
            horizontal_angles: doc.number_horizontal_angles,
            max_candela: doc
                .candela_values
                .iter()
                .flatten()
                .copied()
                .reduce(f64::max),
        },
        Document::Eulumdat(ldt) => Summary::Eulumdat {
            luminaire: ldt.luminaire_name.clone(),
            symmetry: ldt.symmetry.code(),
            c_planes: ldt.c_plane_count,
            g_angles: ldt.g_count,
            lamp_sets: ldt.lamp_set_count,
            max_intensity: ldt.max_intensity(),
            fwhm: ldt.fwhm(0),
            fwtm: ldt.fwtm(0),
        },
    }
}

fn print_summary(path: &Path, summary: &Summary) {
    let show = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| v.to_string());

    println!("{}", path.display());
    match summary {
        Summary::Ies {
            format,
            luminaire,
            keywords,
            tilt,
            vertical_angles,
            horizontal_angles,
            max_candela,
        } => {
            println!("  format:            {}", format);
            println!("  luminaire:         {}", luminaire.as_deref().unwrap_or("-"));
            println!("  keywords:          {}", keywords);
            println!("  tilt:              {}", tilt);
            println!("  vertical angles:   {}", vertical_angles);
            println!("  horizontal angles: {}", horizontal_angles);
            println!("  max candela:       {}", show(*max_candela));
        }
        Summary::Eulumdat {
            luminaire,
            symmetry,
            c_planes,
            g_angles,
            lamp_sets,
            max_intensity,
            fwhm,
            fwtm,
        } => {
            println!("  format:            EULUMDAT");
            println!("  luminaire:         {}", luminaire);
            println!("  symmetry:          {}", symmetry);
            println!("  C-planes:          {}", c_planes);
            println!("  G-angles:          {}", g_angles);
            println!("  lamp sets:         {}", lamp_sets);
            println!("  max intensity:     {} cd/klm", show(*max_intensity));
            println!("  FWHM:              {}", show(*fwhm));
            println!("  FWTM:              {}", show(*fwtm));
        }
    }
}
