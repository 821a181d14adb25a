use console::style;
use geoviz_core::error::GeovizError;
use std::fmt;

/// Error with context and suggestions for the terminal
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a CRS that could not be resolved
pub fn invalid_crs(input: &str, reason: &str) -> CliError {
    CliError::new("Invalid coordinate reference system")
        .with_context(format!("Input: {}\nReason: {}", input, reason))
        .with_suggestion("Use an EPSG code: --src EPSG:4326")
        .with_suggestion("Or a proj4 string: --dest \"+proj=merc +lon_0=0\"")
        .with_help("Run: geoviz parse-proj --help")
}

/// Create error for an unsupported projection name
pub fn unknown_projection(name: &str) -> CliError {
    CliError::new(format!("Unknown projection: {}", name))
        .with_context("Supported projections: latlong, tmerc, lcc, merc, utm")
        .with_help("Run: geoviz parse-proj --help")
}

/// Create error for an extent that does not survive reprojection
pub fn empty_extent(crs: &str) -> CliError {
    CliError::new("Extent is empty after reprojection")
        .with_context(format!("No part of the box lies within the valid domain of {}.", crs))
        .with_suggestion("Check that the bounds are given in source CRS units")
        .with_suggestion("Or widen the bounds toward the projection's valid area")
        .with_help("Run: geoviz extent --help")
}

/// Create error for a coordinate column missing from the table
pub fn missing_column(name: &str) -> CliError {
    CliError::new(format!("Missing coordinate column: {}", name))
        .with_context("Every feature must carry both coordinate columns.")
        .with_suggestion("Set \"x_dim\" and \"y_dim\" in the table file to the column names used")
        .with_help("Run: geoviz convert --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check geoviz.toml for syntax errors")
        .with_suggestion("Or unset the matching GEOVIZ_* environment variable")
        .with_help("Run: geoviz config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(geoviz_error) = error.downcast_ref::<GeovizError>() {
        return match geoviz_error {
            GeovizError::InvalidCrs { input, reason } => invalid_crs(input, reason),
            GeovizError::UnknownProjection { name } => unknown_projection(name),
            GeovizError::EmptyExtent { crs } => empty_extent(crs),
            GeovizError::MissingColumn { name } => missing_column(name),
            GeovizError::ConfigInvalid { key, reason } => invalid_config(key, reason),
            other => CliError::new(other.to_string()),
        };
    }

    let message = format!("{:#}", error);
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else {
        CliError::new(message)
    }
}
