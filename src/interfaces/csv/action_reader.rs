use crate::application::action::Action;
use crate::domain::money::Amount;
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// One line of a checkout script: `action, target, value`.
///
/// `target` names what the action applies to (a method, a field, a wallet)
/// and `value` carries typed text. Single-argument actions accept the
/// argument in either column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptRow {
    pub action: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl ScriptRow {
    fn argument(&self) -> Result<&str> {
        self.target
            .as_deref()
            .or(self.value.as_deref())
            .ok_or_else(|| CheckoutError::InvalidArgument {
                action: self.action.clone(),
                reason: "missing argument".to_string(),
            })
    }

    fn parse<T>(&self) -> Result<T>
    where
        T: FromStr<Err = String>,
    {
        self.argument()?
            .parse()
            .map_err(|reason| CheckoutError::InvalidArgument {
                action: self.action.clone(),
                reason,
            })
    }

    fn invalid(&self, reason: impl Into<String>) -> CheckoutError {
        CheckoutError::InvalidArgument {
            action: self.action.clone(),
            reason: reason.into(),
        }
    }
}

impl TryFrom<ScriptRow> for Action {
    type Error = CheckoutError;

    fn try_from(row: ScriptRow) -> Result<Self> {
        let action = match row.action.to_ascii_lowercase().as_str() {
            "pick_amount" => {
                let raw = row.argument()?;
                let value = Decimal::from_str(raw)
                    .map_err(|_| row.invalid(format!("'{raw}' is not an amount")))?;
                Action::PickAmount(Amount::new(value))
            }
            // Free text on purpose: the selector normalizes whatever was typed.
            "custom_amount" => {
                Action::EnterCustomAmount(row.argument().unwrap_or_default().to_string())
            }
            "focus_custom" => Action::FocusCustomAmount,
            "select_method" => Action::SelectMethod(row.parse()?),
            "back" => Action::Back,
            "set_field" => {
                let field = row
                    .target
                    .as_deref()
                    .ok_or_else(|| row.invalid("missing field name"))?
                    .parse()
                    .map_err(|reason: String| row.invalid(reason))?;
                Action::SetField(field, row.value.clone().unwrap_or_default())
            }
            "touch" => Action::Touch(row.parse()?),
            "bank_type" => Action::SetBankType(row.parse()?),
            "select_profile" => Action::SelectProfile(row.argument()?.to_string()),
            "save_info" => {
                let raw = row.argument()?;
                let save = raw
                    .parse::<bool>()
                    .map_err(|_| row.invalid(format!("'{raw}' is not true or false")))?;
                Action::SetSaveInfo(save)
            }
            "select_wallet" => Action::SelectWallet(row.parse()?),
            "approve_wallet" => Action::ApproveWallet,
            "cancel_wallet" => Action::CancelWallet,
            "disconnect_wallet" => Action::DisconnectWallet,
            "select_asset" => Action::SelectAsset(row.parse()?),
            "open_express" => Action::OpenExpress(row.parse()?),
            "cancel_express" => Action::CancelExpress,
            "submit" => Action::Submit,
            "view_receipt" => Action::ViewReceipt,
            "done" => Action::Done,
            "close" => Action::Close,
            _ => return Err(CheckoutError::UnknownAction(row.action)),
        };
        Ok(action)
    }
}

/// Reads checkout actions from a CSV script.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// so trailing columns may be left off rows that do not need them.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    /// Creates a new `ActionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads rows and turns each into an [`Action`]. A bad row yields
    /// an error item and reading continues with the next one.
    pub fn actions(self) -> impl Iterator<Item = Result<Action>> {
        self.reader.into_deserialize::<ScriptRow>().map(|result| {
            let row = result.map_err(CheckoutError::from)?;
            Action::try_from(row)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::Field;
    use crate::domain::method::{BankType, CryptoAsset, PaymentMethod, WalletId};
    use rust_decimal_macros::dec;

    fn read(data: &str) -> Vec<Result<Action>> {
        ActionReader::new(data.as_bytes()).actions().collect()
    }

    #[test]
    fn test_reader_valid_stream() {
        let data = "action, target, value\n\
                    pick_amount, 25,\n\
                    select_method, card,\n\
                    set_field, cardNumber, 4242 4242 4242 4242\n\
                    submit,,";
        let results = read(data);

        assert_eq!(results.len(), 4);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &Action::PickAmount(Amount::new(dec!(25)))
        );
        assert_eq!(
            results[1].as_ref().unwrap(),
            &Action::SelectMethod(PaymentMethod::Card)
        );
        assert_eq!(
            results[2].as_ref().unwrap(),
            &Action::SetField(Field::CardNumber, "4242 4242 4242 4242".to_string())
        );
        assert_eq!(results[3].as_ref().unwrap(), &Action::Submit);
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let data = "action,target,value\nback\nselect_wallet,phantom\nselect_asset,,eth";
        let results = read(data);

        assert_eq!(results[0].as_ref().unwrap(), &Action::Back);
        assert_eq!(
            results[1].as_ref().unwrap(),
            &Action::SelectWallet(WalletId::Phantom)
        );
        assert_eq!(
            results[2].as_ref().unwrap(),
            &Action::SelectAsset(CryptoAsset::Eth)
        );
    }

    #[test]
    fn test_empty_value_clears_field() {
        let results = read("action,target,value\nset_field,email,");
        assert_eq!(
            results[0].as_ref().unwrap(),
            &Action::SetField(Field::Email, String::new())
        );
    }

    #[test]
    fn test_reader_malformed_lines() {
        let data = "action,target,value\n\
                    teleport,,\n\
                    select_method,cheque,\n\
                    pick_amount,lots,\n\
                    bank_type,uk,";
        let results = read(data);

        assert!(matches!(results[0], Err(CheckoutError::UnknownAction(_))));
        assert!(matches!(
            results[1],
            Err(CheckoutError::InvalidArgument { .. })
        ));
        assert!(matches!(
            results[2],
            Err(CheckoutError::InvalidArgument { .. })
        ));
        assert_eq!(
            results[3].as_ref().unwrap(),
            &Action::SetBankType(BankType::Uk)
        );
    }

    #[test]
    fn test_missing_argument() {
        let results = read("action,target,value\nselect_profile,,");
        assert!(matches!(
            results[0],
            Err(CheckoutError::InvalidArgument { .. })
        ));
    }
}
