use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use exprtree::error::print_error_with_context;
use exprtree::graph::{self, LayoutOptions};
use exprtree::output::DEFAULT_OUTPUT;
use exprtree::{CodegenOptions, Compiler, ExprError, Traversals};

#[derive(Parser)]
#[command(name = "exprc", version, about = "Expression tree traversals and stack-machine code generation")]
struct Cli {
    /// 日志详细程度（-v debug，-vv trace）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print prefix (Polish), infix and postfix traversals
    Traverse(Input),
    /// Print the tree as an edge list, layout coordinates or DOT
    Tree {
        #[command(flatten)]
        input: Input,
        /// Emit Graphviz DOT instead of the edge list
        #[arg(long)]
        dot: bool,
        /// Include hierarchical layout coordinates
        #[arg(long)]
        layout: bool,
    },
    /// Generate the assembly listing for a numeric expression
    Asm {
        #[command(flatten)]
        input: Input,
        /// Output file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Print the listing to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
        /// Skip operators lacking operands, emit no code for `^` and never add a result load
        #[arg(long)]
        compatible: bool,
    },
}

#[derive(Args)]
struct Input {
    /// Expression text (reads --file or stdin when omitted)
    expression: Option<String>,
    /// Read the expression from a file
    #[arg(short, long, value_name = "PATH", conflicts_with = "expression")]
    file: Option<PathBuf>,
}

impl Input {
    /// 读取表达式文本和来源名
    fn read(&self) -> Result<(String, String)> {
        if let Some(expression) = &self.expression {
            return Ok((expression.clone(), "<argument>".to_string()));
        }
        if let Some(path) = &self.file {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            return Ok((text, path.display().to_string()));
        }
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read expression from stdin")?;
        Ok((text, "<stdin>".to_string()))
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Traverse(input) => {
            let (source, origin) = input.read()?;
            let compiler = Compiler::new();
            let traversals = report(compiler.traversals(&source), &source, &origin)?;
            print_traversals(&traversals);
        }
        Command::Tree { input, dot, layout } => {
            let (source, origin) = input.read()?;
            let compiler = Compiler::new();
            let tree = report(compiler.build_tree(&source), &source, &origin)?;

            if dot {
                println!("{}", graph::to_dot(&tree));
            } else {
                let positions = graph::layout(&tree, LayoutOptions::default());
                for (edge, pos) in graph::edges(&tree).iter().zip(&positions) {
                    let parent = edge.parent.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
                    if layout {
                        println!("{}\t{}\t{}\t{:.4}\t{:.4}", edge.id, parent, edge.label, pos.x, pos.y);
                    } else {
                        println!("{}\t{}\t{}", edge.id, parent, edge.label);
                    }
                }
            }
        }
        Command::Asm { input, output, stdout, compatible } => {
            let (source, origin) = input.read()?;
            let options = if compatible {
                CodegenOptions::compatible()
            } else {
                CodegenOptions::default()
            };
            let compiler = Compiler::with_options(options);

            if stdout {
                let listing = report(compiler.generate(&source), &source, &origin)?;
                println!("{}", listing);
            } else {
                let listing = compiler.compile(&source, &output).inspect_err(|e| {
                    if let Some(err) = e.downcast_ref::<ExprError>() {
                        print_error_with_context(err, source.trim(), &origin);
                    }
                })?;
                info!(path = %output.display(), temps = listing.declared_temps(), "assembly generated");
                println!("代码已生成并保存到 {}", output.display());
            }
        }
    }
    Ok(())
}

/// 打印带上下文的表达式错误，并把它转成 anyhow 错误
fn report<T>(result: Result<T, ExprError>, source: &str, origin: &str) -> Result<T> {
    result.map_err(|err| {
        print_error_with_context(&err, source.trim(), origin);
        anyhow::Error::new(err)
    })
}

fn print_traversals(traversals: &Traversals) {
    println!("波兰式（前序）: {}", traversals.prefix);
    println!("中序:           {}", traversals.infix);
    println!("后序:           {}", traversals.postfix);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("错误: {:#}", e);
        process::exit(1);
    }
}
