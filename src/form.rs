//! The options form.
//!
//! Edits a copy of the session configuration.  Nothing changes until the
//! form is submitted; a valid submission becomes a whole new session.

use crate::config::{Config, FrequencyUnit};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Source,
    Frequency,
    Unit,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Source => Field::Frequency,
            Field::Frequency => Field::Unit,
            Field::Unit => Field::Source,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Source => Field::Unit,
            Field::Frequency => Field::Source,
            Field::Unit => Field::Frequency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsForm {
    pub source: String,
    pub frequency: String,
    pub unit: FrequencyUnit,
    pub focus: Field,
    /// Why the last submission was refused.
    pub error: Option<String>,
}

impl OptionsForm {
    /// A form prefilled with the given configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            source: config.source.to_string(),
            frequency: config.frequency.to_string(),
            unit: config.unit,
            focus: Field::Source,
            error: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Type a character into the focused text field.  The frequency field
    /// only takes digits.
    pub fn insert(&mut self, ch: char) {
        match self.focus {
            Field::Source => self.source.push(ch),
            Field::Frequency if ch.is_ascii_digit() => self.frequency.push(ch),
            Field::Frequency | Field::Unit => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Field::Source => {
                self.source.pop();
            }
            Field::Frequency => {
                self.frequency.pop();
            }
            Field::Unit => {}
        }
    }

    pub fn next_unit(&mut self) {
        self.unit = self.unit.next();
    }

    pub fn previous_unit(&mut self) {
        self.unit = self.unit.previous();
    }

    /// Validate the form.  On failure the reason is kept for display.
    pub fn submit(&mut self) -> Option<Config> {
        match self.validate() {
            Ok(config) => {
                self.error = None;
                Some(config)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    fn validate(&self) -> Result<Config, ConfigError> {
        let frequency = self
            .frequency
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidFrequency(self.frequency.clone()))?;
        Config::new(&self.source, frequency, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> OptionsForm {
        let config = Config::new("https://buildhub.example/", 10, FrequencyUnit::Minutes).unwrap();
        OptionsForm::from_config(&config)
    }

    #[test]
    fn prefilled_from_config() {
        let form = form();
        assert_eq!(form.source, "https://buildhub.example/");
        assert_eq!(form.frequency, "10");
        assert_eq!(form.unit, FrequencyUnit::Minutes);
        assert_eq!(form.focus, Field::Source);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = form();
        form.focus_previous();
        assert_eq!(form.focus, Field::Unit);
        form.focus_next();
        assert_eq!(form.focus, Field::Source);
    }

    #[test]
    fn frequency_field_only_accepts_digits() {
        let mut form = form();
        form.focus_next();
        form.insert('x');
        form.insert('5');
        assert_eq!(form.frequency, "105");
        form.backspace();
        form.backspace();
        assert_eq!(form.frequency, "1");
    }

    #[test]
    fn typing_on_the_unit_field_does_nothing() {
        let mut form = form();
        form.focus = Field::Unit;
        form.insert('h');
        form.backspace();
        assert_eq!(form, OptionsForm { focus: Field::Unit, ..self::form() });
    }

    #[test]
    fn valid_submission_yields_new_config() {
        let mut form = form();
        form.source = "http://localhost:8000".into();
        form.frequency = "30".into();
        form.next_unit();
        form.next_unit();

        let config = form.submit().unwrap();
        assert_eq!(config.source.as_str(), "http://localhost:8000/");
        assert_eq!(config.frequency, 30);
        assert_eq!(config.unit, FrequencyUnit::Seconds);
        assert!(form.error.is_none());
    }

    #[test]
    fn invalid_source_is_refused_with_a_reason() {
        let mut form = form();
        form.source = "buildhub".into();

        assert!(form.submit().is_none());
        assert!(form.error.unwrap().contains("The URL parameter is not valid"));
    }

    #[test]
    fn empty_or_zero_frequency_is_refused() {
        let mut form = form();
        form.frequency.clear();
        assert!(form.submit().is_none());

        form.frequency = "0".into();
        assert!(form.submit().is_none());
        assert!(form.error.is_some());
    }
}
