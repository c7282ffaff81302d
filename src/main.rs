use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use minish::config::{Config, ConfigLoader};
use minish::environment::Environment;
use minish::prompt::ShellPrompt;
use minish::repl::Repl;

fn main() -> ExitCode {
    let config = load_config();
    init_tracing(&config);

    let mut repl = Repl::new(ShellPrompt::new(), config, Environment::new());
    match repl.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("minish: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Config {
    let Some(path) = ConfigLoader::default_path() else {
        return ConfigLoader::default_config();
    };
    match ConfigLoader::load_or_default(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("minish: {}: {}", path.display(), e);
            ConfigLoader::default_config()
        }
    }
}

// MINISH_LOG wins over the config file's `log` key.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("MINISH_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
