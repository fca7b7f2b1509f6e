use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use tower_lsp::{LspService, Server};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cpp_stubgen::{
    AstDumper, MemoryHost, Settings, StubLanguageServer, config::LogLevel, generate_under_cursor,
    host::EditorHost,
};

#[derive(Parser, Debug)]
#[command(name = "cpp-stubgen", version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert a definition stub for the declaration at FILE:LINE:COLUMN into
    /// the paired source file.
    Generate {
        file: PathBuf,

        /// 1-based line.
        #[arg(long)]
        line: usize,

        /// 1-based byte column.
        #[arg(long)]
        column: usize,

        /// Settings file; defaults to the nearest cpp-stubgen.toml.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the stub instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },
}

fn default_log_path() -> PathBuf {
    dirs_or_tmp().join("cpp-stubgen.log")
}

fn dirs_or_tmp() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = PathBuf::from(home).join(".cpp-stubgen");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

fn init_logging(
    verbose: bool,
    log_file: Option<&Path>,
    level: LogLevel,
) -> PathBuf {
    let directive = if verbose {
        LogLevel::Debug.filter_directive()
    } else {
        level.filter_directive()
    };
    let tower_lsp_level = if verbose {
        "tower_lsp=debug"
    } else {
        "tower_lsp=warn"
    };
    let stderr_filter = EnvFilter::new(format!("{directive},{tower_lsp_level}"));
    let file_filter = EnvFilter::new(format!("{directive},{tower_lsp_level}"));

    let log_path = log_file.map(Path::to_path_buf).unwrap_or_else(default_log_path);

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(std::ffi::OsStr::new("cpp-stubgen.log")),
    );

    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false).with_target(false).with_filter(file_filter);

    let stderr_layer =
        fmt::layer().with_writer(std::io::stderr).with_ansi(false).with_target(false).with_filter(stderr_filter);

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();
    log_path
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match args.command {
        None => {
            serve(args.verbose, args.log_file.as_deref()).await;
            ExitCode::SUCCESS
        },
        Some(Command::Generate {
            file,
            line,
            column,
            config,
            dry_run,
        }) => {
            let settings = match config {
                Some(path) => match load_config(&path) {
                    Ok(settings) => settings,
                    Err(message) => {
                        eprintln!("cpp-stubgen: {message}");
                        return ExitCode::FAILURE;
                    },
                },
                None => Settings::load_for(&file),
            };
            init_logging(args.verbose, args.log_file.as_deref(), settings.logging.level);
            generate(&file, line, column, settings, dry_run)
        },
    }
}

async fn serve(
    verbose: bool,
    log_file: Option<&Path>,
) {
    let log_path = init_logging(verbose, log_file, LogLevel::Info);
    info!("Starting cpp-stubgen server v{}", env!("CARGO_PKG_VERSION"));
    info!("Log file: {}", log_path.display());

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(StubLanguageServer::new);

    Server::new(stdin, stdout, socket).serve(service).await;

    info!("cpp-stubgen server stopped");
}

fn load_config(path: &Path) -> Result<Settings, String> {
    let content = std::fs::read_to_string(path).map_err(|error| format!("cannot read {}: {error}", path.display()))?;
    Settings::from_toml_str(&content).map_err(|error| format!("invalid {}: {error}", path.display()))
}

fn generate(
    file: &Path,
    line: usize,
    column: usize,
    settings: Settings,
    dry_run: bool,
) -> ExitCode {
    let mut host = MemoryHost::new();
    host.open_file(file);
    host.set_cursor(line, column);

    let dumper = AstDumper::new(settings.compiler);
    let stub = match generate_under_cursor(&mut host, &dumper) {
        Ok(stub) => stub,
        Err(_) => {
            for error in host.errors() {
                eprintln!("cpp-stubgen: {error}");
            }
            return ExitCode::FAILURE;
        },
    };

    if dry_run {
        println!("{}:{}", stub.source.display(), stub.line + 1);
        println!("{}", stub.text);
        return ExitCode::SUCCESS;
    }

    for buffer in host.modified_buffers() {
        if let Err(error) = std::fs::write(&buffer.path, &buffer.text) {
            eprintln!("cpp-stubgen: cannot write {}: {error}", buffer.path.display());
            return ExitCode::FAILURE;
        }
        info!("Wrote {}", buffer.path.display());
    }
    if let Some(current) = host.current_file() {
        info!("Cursor now at {}:{}", current.display(), host.cursor().0);
    }
    ExitCode::SUCCESS
}
