use crate::domain::money::{Amount, parse_amount};
use rust_decimal_macros::dec;

/// Preset buttons plus a free-text custom entry.
///
/// The raw custom text is kept as typed so it can be shown again; only the
/// derived [`Amount`] is used for fees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountSelector {
    presets: Vec<Amount>,
    selected: Amount,
    custom_text: String,
    is_custom: bool,
}

impl Default for AmountSelector {
    fn default() -> Self {
        Self::new(
            vec![
                Amount::new(dec!(10)),
                Amount::new(dec!(25)),
                Amount::new(dec!(50)),
            ],
            Amount::new(dec!(10)),
        )
    }
}

impl AmountSelector {
    pub fn new(presets: Vec<Amount>, initial: Amount) -> Self {
        Self {
            presets,
            selected: initial,
            custom_text: String::new(),
            is_custom: false,
        }
    }

    pub fn presets(&self) -> &[Amount] {
        &self.presets
    }

    pub fn custom_text(&self) -> &str {
        &self.custom_text
    }

    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// The preset currently highlighted, if any.
    pub fn active_preset(&self) -> Option<Amount> {
        (!self.is_custom && self.presets.contains(&self.selected)).then_some(self.selected)
    }

    pub fn pick_preset(&mut self, amount: Amount) -> Amount {
        self.selected = amount;
        self.custom_text.clear();
        self.is_custom = false;
        self.value()
    }

    pub fn enter_custom(&mut self, raw: &str) -> Amount {
        self.custom_text = raw.to_string();
        self.is_custom = true;
        self.selected = parse_amount(raw);
        self.value()
    }

    pub fn focus_custom(&mut self) -> Amount {
        self.is_custom = true;
        self.selected = parse_amount(&self.custom_text);
        self.value()
    }

    pub fn value(&self) -> Amount {
        if self.is_custom {
            parse_amount(&self.custom_text)
        } else {
            self.selected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_preset() {
        let selector = AmountSelector::default();
        assert_eq!(selector.value(), Amount::new(dec!(10)));
        assert_eq!(selector.active_preset(), Some(Amount::new(dec!(10))));
    }

    #[test]
    fn test_custom_entry_keeps_raw_text() {
        let mut selector = AmountSelector::default();
        assert_eq!(selector.enter_custom("abc"), Amount::ZERO);
        assert_eq!(selector.custom_text(), "abc");
        assert_eq!(selector.active_preset(), None);

        assert_eq!(selector.enter_custom("42.50"), Amount::new(dec!(42.5)));
    }

    #[test]
    fn test_preset_clears_custom() {
        let mut selector = AmountSelector::default();
        selector.enter_custom("99");
        assert_eq!(selector.pick_preset(Amount::new(dec!(50))), Amount::new(dec!(50)));
        assert_eq!(selector.custom_text(), "");
        assert!(!selector.is_custom());
    }

    #[test]
    fn test_focus_custom_with_empty_text_is_zero() {
        let mut selector = AmountSelector::default();
        assert_eq!(selector.focus_custom(), Amount::ZERO);
        assert!(selector.is_custom());
    }
}
