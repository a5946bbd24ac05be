//! Domain error types.

/// Top-level error type for assetaudit.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("catalog not found: {path}")]
    MissingCatalog { path: String },

    #[error("malformed catalog: {reason}")]
    MalformedCatalog { reason: String },

    #[error("catalog has no active instruments")]
    EmptyUniverse,

    #[error("no price file for {ticker} at {path}")]
    MissingPriceFile { ticker: String, path: String },

    #[error("malformed price data for {ticker}: {reason}")]
    MalformedPriceData { ticker: String, reason: String },

    #[error("no usable price data for any of {requested} active instruments")]
    NoUsablePriceData { requested: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to write report {path}: {reason}")]
    ReportWrite { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AuditError> for std::process::ExitCode {
    fn from(err: &AuditError) -> Self {
        let code: u8 = match err {
            AuditError::Io(_) | AuditError::ReportWrite { .. } => 1,
            AuditError::ConfigParse { .. }
            | AuditError::ConfigMissing { .. }
            | AuditError::ConfigInvalid { .. } => 2,
            AuditError::MissingCatalog { .. }
            | AuditError::MalformedCatalog { .. }
            | AuditError::EmptyUniverse => 3,
            AuditError::MissingPriceFile { .. }
            | AuditError::MalformedPriceData { .. }
            | AuditError::NoUsablePriceData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_ticker() {
        let err = AuditError::MalformedPriceData {
            ticker: "SPY".into(),
            reason: "row 3: invalid close value".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed price data for SPY: row 3: invalid close value"
        );
    }

    #[test]
    fn exit_codes_group_by_family() {
        use std::process::ExitCode;
        assert_eq!(ExitCode::from(&AuditError::EmptyUniverse), ExitCode::from(3));
        assert_eq!(
            ExitCode::from(&AuditError::NoUsablePriceData { requested: 4 }),
            ExitCode::from(5)
        );
        assert_eq!(
            ExitCode::from(&AuditError::ConfigMissing {
                section: "paths".into(),
                key: "catalog".into(),
            }),
            ExitCode::from(2)
        );
    }
}
