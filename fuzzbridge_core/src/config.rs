use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct InputSettings {
    /// Path to a dictionary file or directory; empty means no dictionary.
    #[serde(default)]
    pub dictionary_path: String,
    /// Path to a seed-corpus file or directory; empty means no seeds.
    #[serde(default)]
    pub corpus_path: String,
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
}

pub fn default_max_input_len() -> usize {
    4096
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            dictionary_path: String::new(),
            corpus_path: String::new(),
            max_input_len: default_max_input_len(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct TrialSettings {
    #[serde(default = "default_max_trials")]
    pub max_trials: u64,
    #[serde(default)]
    pub rng_seed: u64,
}

pub fn default_max_trials() -> u64 {
    1_000_000
}

impl Default for TrialSettings {
    fn default() -> Self {
        Self {
            max_trials: default_max_trials(),
            rng_seed: 0,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    #[serde(default)]
    pub inputs: InputSettings,
    #[serde(default)]
    pub trials: Option<TrialSettings>,
}

impl HarnessConfig {
    pub fn load_from_file(path: &PathBuf) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        let config: HarnessConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })?;

        Ok(config)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            inputs: InputSettings::default(),
            trials: Some(TrialSettings::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_mean_no_dictionary_and_no_seeds() {
        let config = HarnessConfig::default();
        assert!(config.inputs.dictionary_path.is_empty());
        assert!(config.inputs.corpus_path.is_empty());
        assert_eq!(config.inputs.max_input_len, 4096);
        assert_eq!(config.trials.unwrap().max_trials, default_max_trials());
    }

    #[test]
    fn loads_kebab_case_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[inputs]\ndictionary-path = \"tokens.dict\"\ncorpus-path = \"seeds/\"\nmax-input-len = 256\n\n[trials]\nmax-trials = 10\nrng-seed = 7\n"
        )
        .unwrap();

        let config = HarnessConfig::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.inputs.dictionary_path, "tokens.dict");
        assert_eq!(config.inputs.corpus_path, "seeds/");
        assert_eq!(config.inputs.max_input_len, 256);
        let trials = config.trials.unwrap();
        assert_eq!(trials.max_trials, 10);
        assert_eq!(trials.rng_seed, 7);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[inputs]\nmystery-knob = true\n").unwrap();
        assert!(HarnessConfig::load_from_file(&file.path().to_path_buf()).is_err());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[inputs]\nmax-input-len = 64\n").unwrap();
        let config = HarnessConfig::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.inputs.max_input_len, 64);
        assert!(config.inputs.dictionary_path.is_empty());
        assert!(config.trials.is_none());
    }
}
