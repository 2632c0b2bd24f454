//! Token construction parameters

use ledger_types::numeric::Amount;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TokenError};

/// Largest supported number of decimal places.
pub const MAX_DECIMALS: u8 = 18;

/// Token configuration
///
/// Fee parameters are not configurable here; every token starts fee-free
/// and the owner tunes fees with `set_params`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    /// Decimal places; also scales the maximum fee
    pub decimals: u8,
    /// Raw units credited to the owner at construction
    pub initial_supply: Amount,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Stable Token".to_string(),
            symbol: "STBL".to_string(),
            decimals: 6,
            initial_supply: 0,
        }
    }
}

impl TokenConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TokenConfig =
            serde_json::from_str(json).map_err(|e| TokenError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidState(format!(
                "decimals {} exceeds {}",
                self.decimals, MAX_DECIMALS
            )));
        }
        if self.symbol.trim().is_empty() {
            return Err(TokenError::InvalidState("symbol must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TokenConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.decimals, 6);
        assert_eq!(config.initial_supply, 0);
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = TokenConfig::from_json(r#"{"symbol": "USDX", "initial_supply": 1000}"#).unwrap();
        assert_eq!(config.symbol, "USDX");
        assert_eq!(config.initial_supply, 1000);
        assert_eq!(config.name, "Stable Token");
        assert_eq!(config.decimals, 6);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            TokenConfig::from_json("not json"),
            Err(TokenError::Serialization(_))
        ));
        assert!(matches!(
            TokenConfig::from_json(r#"{"decimals": 19}"#),
            Err(TokenError::InvalidState(_))
        ));
        assert!(matches!(
            TokenConfig::from_json(r#"{"symbol": "  "}"#),
            Err(TokenError::InvalidState(_))
        ));
    }
}
