// EsoReaction: chemical equation front end with a terminal inspector

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, Level};

use esoreaction::elements;
use esoreaction::parser::{self, Options, SymbolTable};
use esoreaction::ui::App;

/// Usage error or unreadable input
const EXIT_USAGE: i32 = 64;
/// Lexical or syntax error in the program
const EXIT_DATA: i32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// One token per line
    Tokens,
    /// The canonical parenthesized syntax tree
    Ast,
}

#[derive(Parser, Debug)]
#[command(name = "esoreaction", version, about = "Scan, parse and print EsoReaction programs")]
struct Args {
    /// Program file to read (stdin when neither FILE nor --code is given)
    #[arg(value_name = "FILE", conflicts_with = "code")]
    file: Option<PathBuf>,

    /// Program text given inline
    #[arg(short, long, value_name = "CODE")]
    code: Option<String>,

    /// Trace every character and token the lexer produces
    #[arg(short, long)]
    debug: bool,

    /// Trace every grammar rule the parser enters
    #[arg(short = 's', long)]
    print_stack: bool,

    /// Element table (number,symbol,name CSV) to use instead of the built-in one
    #[arg(short, long, value_name = "CSV")]
    elements: Option<PathBuf>,

    /// What to print on success
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    emit: Emit,

    /// Open the interactive inspector instead of printing
    #[arg(short, long)]
    inspect: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version land here too
            let _ = err.print();
            process::exit(if err.use_stderr() { EXIT_USAGE } else { 0 });
        }
    };

    let options = Options {
        debug: args.debug,
        print_stack: args.print_stack,
    };

    // The inspector owns the terminal, so traces are only wired up without it
    if !args.inspect {
        let level = if options.debug || options.print_stack {
            Level::TRACE
        } else {
            Level::WARN
        };
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_ansi(false)
            .with_max_level(level)
            .init();
    }

    let source = match read_source(&args) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(EXIT_USAGE);
        }
    };

    let symbols = match load_symbols(&args) {
        Ok(symbols) => symbols,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(EXIT_USAGE);
        }
    };
    debug!(symbols = symbols.len(), "element table ready");

    if args.inspect {
        return run_inspector(source, symbols, &options);
    }

    let output = match args.emit {
        Emit::Tokens => parser::scan_tokens(&source, &symbols, &options)
            .map(|tokens| {
                tokens
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .map_err(parser::Error::from),
        Emit::Ast => parser::parse_source(&source, &symbols, &options).map(|code| {
            debug!(equations = code.equations().count(), "parsed");
            parser::print(&code)
        }),
    };

    match output {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.report());
            process::exit(EXIT_DATA);
        }
    }
}

fn read_source(args: &Args) -> io::Result<String> {
    if let Some(code) = &args.code {
        return Ok(code.clone());
    }
    match &args.file {
        Some(path) => fs::read_to_string(path).map_err(|err| {
            io::Error::new(err.kind(), format!("cannot read '{}': {}", path.display(), err))
        }),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn load_symbols(args: &Args) -> Result<SymbolTable, elements::TableError> {
    match &args.elements {
        Some(path) => elements::load(path),
        None => Ok(elements::periodic_table()),
    }
}

fn run_inspector(
    source: String,
    symbols: SymbolTable,
    options: &Options,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(source, symbols, options);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
