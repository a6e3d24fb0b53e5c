//! Rate line parsing.
//!
//! A [`PatternHandler`] turns one sign line into a [`Rate`]. Two modes exist:
//! `MATCH` uses a capturing regex that must cover the whole line, `SPLIT`
//! cuts the line on a delimiter regex and reads fields by position.

use std::fmt;

use log::error;
use regex::Regex;

use crate::config::{MaterialConfig, PatternConfig};

use super::errors::{RateParseError, ShopError};
use super::rate::Rate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    Match,
    Split,
}

impl PatternMode {
    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("MATCH") {
            Some(PatternMode::Match)
        } else if name.eq_ignore_ascii_case("SPLIT") {
            Some(PatternMode::Split)
        } else {
            None
        }
    }
}

impl fmt::Display for PatternMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternMode::Match => write!(f, "MATCH"),
            PatternMode::Split => write!(f, "SPLIT"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternHandler {
    mode: PatternMode,
    pattern: Regex,
    amount_index: usize,
    price_index: usize,
    currency_index: usize,
    joiner: String,
    label: String,
}

impl PatternHandler {
    /// Compile a handler from its configuration section. Shape problems are
    /// logged and fail the load.
    pub fn from_config(config: &PatternConfig) -> Result<Self, ShopError> {
        let mode = PatternMode::from_name(&config.mode).ok_or_else(|| {
            error!("Configuration error: unknown pattern mode '{}'", config.mode);
            ShopError::Config(format!("unknown pattern mode '{}'", config.mode))
        })?;

        let source = match mode {
            PatternMode::Match => format!("^(?:{})$", config.pattern),
            PatternMode::Split => config.pattern.clone(),
        };
        let pattern = Regex::new(&source).map_err(|e| {
            error!("Configuration error for pattern '{}': {}", config.pattern, e);
            ShopError::Regex(e)
        })?;

        if mode == PatternMode::Match {
            let groups = pattern.captures_len();
            for (field, index) in [
                ("amount", config.amount_index),
                ("price", config.price_index),
                ("currency", config.currency_index),
            ] {
                if index == 0 || index >= groups {
                    error!(
                        "Configuration error: {} index {} out of range for pattern '{}' ({} groups)",
                        field,
                        index,
                        config.pattern,
                        groups - 1
                    );
                    return Err(ShopError::Config(format!(
                        "{} index {} exceeds the pattern's {} groups",
                        field,
                        index,
                        groups - 1
                    )));
                }
            }
        }

        Ok(Self {
            mode,
            pattern,
            amount_index: config.amount_index,
            price_index: config.price_index,
            currency_index: config.currency_index,
            joiner: config.joiner.clone(),
            label: config.label.clone(),
        })
    }

    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    /// Parse one sign line into a rate.
    pub fn parse(&self, line: &str, materials: &MaterialConfig) -> Result<Rate, RateParseError> {
        let (amount, price, token) = match self.mode {
            PatternMode::Match => {
                let caps = self.pattern.captures(line).ok_or(RateParseError::NoMatch)?;
                let field = |i: usize| {
                    caps.get(i)
                        .map(|m| m.as_str())
                        .ok_or(RateParseError::MissingField(i))
                };
                (field(self.amount_index)?, field(self.price_index)?, field(self.currency_index)?)
            }
            PatternMode::Split => {
                let mut fields: Vec<&str> = self.pattern.split(line).collect();
                while fields.last().is_some_and(|f| f.is_empty()) {
                    fields.pop();
                }
                let field = |i: usize| fields.get(i).copied().ok_or(RateParseError::MissingField(i));
                (field(self.amount_index)?, field(self.price_index)?, field(self.currency_index)?)
            }
        };

        let amount = positive(amount)?;
        let price = positive(price)?;
        let token = token.trim();
        if token.is_empty() {
            return Err(RateParseError::EmptyCurrency);
        }
        let currency = materials
            .currency(token)
            .ok_or_else(|| RateParseError::UnknownCurrency(token.to_string()))?;

        Ok(Rate::new(amount, price, currency.clone()))
    }

    /// Rebuild a line this handler parses back into `rate`. SPLIT mode only.
    pub fn render(&self, rate: &Rate, materials: &MaterialConfig) -> Result<String, ShopError> {
        if self.mode != PatternMode::Split {
            return Err(ShopError::Config(format!(
                "cannot render a rate line in {} mode",
                self.mode
            )));
        }
        let token = materials.currency_token(rate.currency()).ok_or_else(|| {
            ShopError::Config(format!("no currency token for {}", rate.currency().raw_name()))
        })?;

        let slots = self.amount_index.max(self.price_index).max(self.currency_index) + 1;
        let fields: Vec<String> = (0..slots)
            .map(|i| {
                if i == self.amount_index {
                    rate.amount().to_string()
                } else if i == self.price_index {
                    rate.price().to_string()
                } else if i == self.currency_index {
                    token.to_string()
                } else {
                    self.label.clone()
                }
            })
            .collect();
        Ok(fields.join(&self.joiner))
    }
}

fn positive(text: &str) -> Result<u32, RateParseError> {
    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RateParseError::NotANumber(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::shop::material::ItemKind;

    fn materials() -> MaterialConfig {
        let mut config = Config::default();
        config.currencies.insert("d".to_string(), "Diamond".to_string());
        MaterialConfig::from_config(&config).unwrap()
    }

    fn buy_handler() -> PatternHandler {
        PatternHandler::from_config(&Config::default().buy).unwrap()
    }

    fn split_config() -> PatternConfig {
        PatternConfig {
            mode: "SPLIT".to_string(),
            pattern: r"[\s:]+".to_string(),
            amount_index: 1,
            price_index: 2,
            currency_index: 3,
            joiner: " ".to_string(),
            label: "B".to_string(),
        }
    }

    #[test]
    fn test_match_default_buy_line() {
        let rate = buy_handler().parse("Buy 1 for 10g", &materials()).unwrap();
        assert_eq!(rate.amount(), 1);
        assert_eq!(rate.price(), 10);
        assert_eq!(rate.currency().kind(), ItemKind::from_name("GOLD_INGOT").unwrap());
    }

    #[test]
    fn test_match_requires_full_line() {
        let m = materials();
        let handler = buy_handler();
        assert_eq!(handler.parse("I Buy 1 for 10g", &m), Err(RateParseError::NoMatch));
        assert_eq!(handler.parse("Buy 1 for 10g now", &m), Err(RateParseError::NoMatch));
        assert!(handler.parse("buy 2 for 3 d", &m).is_ok());
        assert_eq!(handler.parse("  Buy 1 for 10g", &m), Err(RateParseError::NoMatch));
        assert_eq!(handler.parse("Buy 1 for 10g ", &m), Err(RateParseError::NoMatch));
    }

    #[test]
    fn test_match_rejects_bad_values() {
        let m = materials();
        let handler = buy_handler();
        assert_eq!(
            handler.parse("Buy 0 for 10g", &m),
            Err(RateParseError::NotANumber("0".to_string()))
        );
        assert_eq!(
            handler.parse("Buy 1 for 10z", &m),
            Err(RateParseError::UnknownCurrency("z".to_string()))
        );
    }

    #[test]
    fn test_match_optional_group_missing() {
        let config = PatternConfig {
            pattern: r"(\d+) for (\d+)(?: (\S+))?".to_string(),
            ..Config::default().buy
        };
        let handler = PatternHandler::from_config(&config).unwrap();
        assert_eq!(handler.parse("1 for 2", &materials()), Err(RateParseError::MissingField(3)));
    }

    #[test]
    fn test_split_parse_and_missing_fields() {
        let handler = PatternHandler::from_config(&split_config()).unwrap();
        let m = materials();
        let rate = handler.parse("B 4:20 d", &m).unwrap();
        assert_eq!((rate.amount(), rate.price()), (4, 20));
        assert_eq!(handler.parse("B 4 20 ", &m), Err(RateParseError::MissingField(3)));
        assert_eq!(
            handler.parse("B four 20 d", &m),
            Err(RateParseError::NotANumber("four".to_string()))
        );
    }

    #[test]
    fn test_split_keeps_leading_empty_field() {
        let handler = PatternHandler::from_config(&split_config()).unwrap();
        // the leading delimiter yields an empty first field, so the label lands on index 1
        assert_eq!(
            handler.parse(" B 3 7 d", &materials()),
            Err(RateParseError::NotANumber("B".to_string()))
        );
    }

    #[test]
    fn test_split_render_round_trip() {
        let handler = PatternHandler::from_config(&split_config()).unwrap();
        let m = materials();
        let rate = handler.parse("B 64 3 g", &m).unwrap();
        let line = handler.render(&rate, &m).unwrap();
        assert_eq!(line, "B 64 3 g");
        assert_eq!(handler.parse(&line, &m).unwrap(), rate);
    }

    #[test]
    fn test_render_refused_in_match_mode() {
        let m = materials();
        let rate = buy_handler().parse("Buy 1 for 1g", &m).unwrap();
        assert!(matches!(buy_handler().render(&rate, &m), Err(ShopError::Config(_))));
    }

    #[test]
    fn test_bad_configuration_fails_construction() {
        let unknown_mode = PatternConfig {
            mode: "GLOB".to_string(),
            ..Config::default().buy
        };
        assert!(matches!(
            PatternHandler::from_config(&unknown_mode),
            Err(ShopError::Config(_))
        ));

        let bad_index = PatternConfig {
            currency_index: 4,
            ..Config::default().buy
        };
        assert!(matches!(PatternHandler::from_config(&bad_index), Err(ShopError::Config(_))));

        let bad_regex = PatternConfig {
            pattern: "(buy".to_string(),
            ..Config::default().buy
        };
        assert!(matches!(PatternHandler::from_config(&bad_regex), Err(ShopError::Regex(_))));
    }
}
