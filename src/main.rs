use std::{
    env,
    fs::read_to_string,
    io,
    path::Path,
    process::ExitCode,
    rc::Rc,
    time::Instant,
};

use tracing_subscriber::EnvFilter;
use when::{
    config::{Config, USAGE},
    display_error,
    errors::errors::Error,
    evaluator::run_with,
    lexer::lexer::tokenize,
    parser::parser::parse,
    semantics::validate,
};

const AUTHOR: &str = "when: a date-aware toy language interpreter";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}\n{}", error, USAGE);
            return ExitCode::from(2);
        }
    };

    if config.who {
        println!("{}", AUTHOR);
        return ExitCode::SUCCESS;
    }

    let Some(file) = config.file.clone() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let source = match read_to_string(&file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    match execute(&source, &file, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(phase = %error.phase(), "run failed");
            display_error(&error, &file);
            ExitCode::FAILURE
        }
    }
}

fn execute(source: &str, file: &Path, config: &Config) -> Result<(), Error> {
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());
    let file_name = Rc::new(file_name);

    let start = Instant::now();
    let tokens = tokenize(source, Rc::clone(&file_name))?;
    tracing::debug!("Tokenized in {:?}", start.elapsed());

    if config.dump_tokens {
        for token in &tokens {
            eprintln!("{}", token.debug());
        }
    }

    let parse_start = Instant::now();
    let tree = parse(tokens, file_name)?;
    tracing::debug!("Parsed in {:?}", parse_start.elapsed());

    if config.dump_ast {
        eprintln!("{:#?}", tree);
    }

    let validate_start = Instant::now();
    let mut symbols = validate(&tree)?;
    tracing::debug!("Validated in {:?}", validate_start.elapsed());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let run_start = Instant::now();
    run_with(&tree, &mut symbols, config, &mut out)?;
    tracing::debug!("Ran in {:?}", run_start.elapsed());

    tracing::debug!("Total time: {:?}", start.elapsed());
    Ok(())
}
