use crate::prompt::GenerationSettings;

pub const CUSTOMERS_TABLE_ENV: &str = "CUSTOMERS";
pub const MODEL_ID_ENV: &str = "ENRICHMENT_MODEL_ID";
pub const MAX_GEN_LEN_ENV: &str = "ENRICHMENT_MAX_GEN_LEN";
pub const TEMPERATURE_ENV: &str = "ENRICHMENT_TEMPERATURE";
pub const TOP_P_ENV: &str = "ENRICHMENT_TOP_P";

pub const DEFAULT_INTAKE_TABLE: &str = "potential_customers_for_ford";
pub const DEFAULT_INTAKE_REGION: &str = "us-east-1";
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentConfig {
    pub table_name: String,
    pub generation: GenerationSettings,
}

impl EnrichmentConfig {
    /// Resolves handler configuration from an environment-style lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = lookup(CUSTOMERS_TABLE_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(CUSTOMERS_TABLE_ENV))?;

        let mut generation = GenerationSettings::default();
        if let Some(model_id) = non_blank(lookup(MODEL_ID_ENV)) {
            generation.model_id = model_id;
        }
        if let Some(raw) = non_blank(lookup(MAX_GEN_LEN_ENV)) {
            generation.max_gen_len = raw
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: MAX_GEN_LEN_ENV,
                    message: format!("expected a positive integer, got '{raw}'"),
                })?;
        }
        if let Some(raw) = non_blank(lookup(TEMPERATURE_ENV)) {
            generation.temperature = parse_unit_interval(TEMPERATURE_ENV, &raw)?;
        }
        if let Some(raw) = non_blank(lookup(TOP_P_ENV)) {
            generation.top_p = parse_unit_interval(TOP_P_ENV, &raw)?;
        }

        Ok(Self {
            table_name,
            generation,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub table_name: String,
    pub region: String,
    pub max_attempts: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_INTAKE_TABLE.to_string(),
            region: DEFAULT_INTAKE_REGION.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl IntakeConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "table",
                message: "table name cannot be empty".to_string(),
            });
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "region",
                message: "region cannot be empty".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "max_attempts",
                message: "max_attempts must be a positive integer".to_string(),
            });
        }
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_unit_interval(name: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| (0.0..=1.0).contains(value))
        .ok_or_else(|| ConfigError::Invalid {
            name,
            message: format!("expected a number between 0 and 1, got '{raw}'"),
        })
}
