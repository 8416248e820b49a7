use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cild_decoder::{DecodeOptions, PlainFormatter};
use cild_file::{MethodEntry, Module};
use cild_ir::{DisassembledMethod, Instruction, SourceLocation};

#[derive(Parser)]
#[command(name = "cild", about = "CIL method-body disassembler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Disassemble the methods of a YAML module description
    Disasm {
        /// Path to the module .yaml file
        input: PathBuf,
        /// Only this method (`Type::Name` or a unique bare name)
        #[arg(short, long)]
        method: Option<String>,
    },
    /// Show module table counts
    Info {
        /// Path to the module .yaml file
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Disasm { input, method } => cmd_disasm(&input, method.as_deref()),
        Commands::Info { input } => cmd_info(&input),
    };
    if !ok {
        std::process::exit(1);
    }
}

fn open(path: &Path) -> Module {
    match Module::open(path) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_info(path: &Path) -> bool {
    let module = open(path);
    println!("=== Module {} ===", module.name());
    println!("{}", module.stats());
    true
}

fn cmd_disasm(path: &Path, only: Option<&str>) -> bool {
    let module = open(path);

    let entries: Vec<&MethodEntry> = match only {
        Some(name) => match module.find_method(name) {
            Ok(entry) => vec![entry],
            Err(e) => {
                eprintln!("Error: {e}");
                return false;
            }
        },
        None => module.methods().iter().collect(),
    };

    log::debug!("disassembling {} method(s) of {}", entries.len(), module.name());
    println!("# Module: {}", module.name());
    println!();

    let mut ok = true;
    for entry in entries {
        if only.is_none() && !entry.has_body() {
            println!("// {} has no IL body", entry.qualified_name());
            println!();
            continue;
        }
        let options = DecodeOptions {
            context: vec![format!("disassembling {}", entry.qualified_name())],
        };
        match module.disassemble(entry, options) {
            Ok(body) => print_method(entry, &body),
            Err(e) => {
                eprintln!("# Error: {}", e.render(&PlainFormatter));
                ok = false;
            }
        }
    }
    ok
}

fn print_method(entry: &MethodEntry, body: &DisassembledMethod) {
    println!(".method {}  // token {}", body.method(), entry.token());
    println!("{{");
    println!("  .maxstack {}", body.max_stack());

    let mut last_location: Option<&SourceLocation> = None;
    for insn in body.instructions() {
        let location = insn.location.as_ref();
        let changed = location.is_some() && location != last_location;
        println!("  {}", listing_line(insn, changed.then_some(location).flatten()));
        last_location = location;
    }
    println!("}}");
    println!();
}

fn listing_line(insn: &Instruction, new_location: Option<&SourceLocation>) -> String {
    let mut line = format!("{:<56} // -{} +{}", insn.to_string(), insn.pops, insn.pushes);
    if let Some(location) = new_location {
        line.push_str(&format!("  {location}"));
    }
    line
}
