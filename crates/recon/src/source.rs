use std::io::Read;

use crate::config::SourceConfig;
use crate::error::ReconError;
use crate::model::{Record, RecordSet, Side};

/// Load CSV text into a [`RecordSet`], checking that the name column and
/// every configured passthrough column exist in the header.
pub fn load_csv_records(
    side: Side,
    csv_data: &str,
    source: &SourceConfig,
) -> Result<RecordSet, ReconError> {
    load_csv_reader(side, csv_data.as_bytes(), source)
}

/// [`load_csv_records`] over any reader.
pub fn load_csv_reader<R: Read>(
    side: Side,
    reader: R,
    source: &SourceConfig,
) -> Result<RecordSet, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let require = |column: &str| -> Result<(), ReconError> {
        if headers.iter().any(|h| h == column) {
            Ok(())
        } else {
            Err(ReconError::MissingColumn {
                side,
                column: column.into(),
            })
        }
    };

    require(&source.name_column)?;
    if let Some(ref columns) = source.passthrough {
        for column in columns {
            require(column)?;
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        records.push(record);
    }

    Ok(RecordSet {
        side,
        name_field: source.name_column.clone(),
        columns: headers,
        records,
    })
}
