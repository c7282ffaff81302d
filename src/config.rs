use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::{fmt, io};

/// What the read loop does when its input source is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EofBehavior {
    Exit,
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub eof: EofBehavior,
    pub log: String,
    pub env_vars: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLoader::default_config()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: "$ ".to_string(),
            eof: EofBehavior::Exit,
            log: "warn".to_string(),
            env_vars: HashMap::new(),
        }
    }

    /// `$MINISH_CONFIG`, else `~/.minishrc`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("MINISH_CONFIG") {
            return Some(PathBuf::from(path));
        }
        std::env::var_os("HOME").map(|home| Path::new(&home).join(".minishrc"))
    }

    /// Load the config at `path`; a file that does not exist yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        match Self::load_from_file(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default_config())
            }
            other => other,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();

        for (lineno, line) in src.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno + 1, line)));
            };
            // The value is kept verbatim so prompts may end in whitespace.
            let key = key.trim();

            match key {
                "prompt" => config.prompt = value.to_string(),
                "eof" => {
                    config.eof = match value.trim() {
                        "exit" => EofBehavior::Exit,
                        "continue" => EofBehavior::Continue,
                        other => {
                            return Err(ConfigError::Parse(format!(
                                "Line {}: Invalid eof behavior: {}",
                                lineno + 1,
                                other
                            )));
                        }
                    };
                }
                "log" => config.log = value.trim().to_string(),
                k if k.starts_with("env.") => {
                    let var = k.trim_start_matches("env.").to_string();
                    config.env_vars.insert(var, value.to_string());
                }
                _ => return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno + 1, key))),
            }
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_gives_defaults() {
        let config = ConfigLoader::load_from_str("").unwrap();
        assert_eq!(config, ConfigLoader::default_config());
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.eof, EofBehavior::Exit);
    }

    #[test]
    fn test_all_keys() {
        let src = "# comment\n\nprompt=minish> \neof=continue\nlog=minish=debug\nenv.EDITOR=vi\n";
        let config = ConfigLoader::load_from_str(src).unwrap();
        assert_eq!(config.prompt, "minish> ");
        assert_eq!(config.eof, EofBehavior::Continue);
        assert_eq!(config.log, "minish=debug");
        assert_eq!(config.env_vars.get("EDITOR").map(String::as_str), Some("vi"));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = ConfigLoader::load_from_str("prompt=$ \nbogus").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: Line 2: No '=' found: bogus");

        let err = ConfigLoader::load_from_str("colour=red").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: Line 1: Unknown key: colour");

        let err = ConfigLoader::load_from_str("eof=maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_or_default(dir.path().join("absent")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rc");
        fs::write(&path, "prompt=> \n").unwrap();
        let config = ConfigLoader::load_or_default(&path).unwrap();
        assert_eq!(config.prompt, "> ");
    }
}
