use std::io::Error;
use tempfile::NamedTempFile;

/// Writes a checkout script (`action,target,value`) to a temporary file.
pub fn write_script(rows: &[[&str; 3]]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::WriterBuilder::new().from_path(file.path())?;

    wtr.write_record(["action", "target", "value"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(file)
}

/// Steps that fill the card form by hand with a valid Visa test card.
pub fn card_rows() -> Vec<[&'static str; 3]> {
    vec![
        ["select_method", "card", ""],
        ["set_field", "cardNumber", "4242424242424242"],
        ["set_field", "expiry", "1230"],
        ["set_field", "cvc", "123"],
        ["set_field", "email", "payer@example.com"],
        ["set_field", "nameOnCard", "Pat Payer"],
        ["set_field", "address", "1 Main Street"],
    ]
}
