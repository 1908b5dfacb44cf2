//! Loading labeled tables from delimited files
use crate::data::dataset::{check_feature_names, Dataset};
use crate::error::{Error, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// A dataset of string symbols together with the names of its feature columns.
#[derive(Clone, Debug)]
pub struct LabeledTable {
    pub dataset: Dataset<String>,
    pub feature_names: Vec<String>,
}

/// Reads comma separated records whose last column is the class label.
///
/// With `has_headers`, the header row names the features (its last entry, the
/// label's name, is dropped). Otherwise features are named `feature_0`, `feature_1`, ...
pub fn read_csv<R: Read>(reader: R, has_headers: bool) -> Result<LabeledTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    let dataset = Dataset::new(rows)?;

    let feature_names: Vec<String> = if has_headers {
        let headers = reader.headers()?;
        if headers.len() != dataset.ncols() {
            return Err(Error::InvalidDataset(format!(
                "header has {} columns, records have {}",
                headers.len(),
                dataset.ncols()
            )));
        }
        headers
            .iter()
            .take(dataset.n_features())
            .map(str::to_string)
            .collect()
    } else {
        (0..dataset.n_features())
            .map(|index| format!("feature_{}", index))
            .collect()
    };
    check_feature_names(&feature_names)?;

    Ok(LabeledTable {
        dataset,
        feature_names,
    })
}

pub fn read_csv_path<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<LabeledTable> {
    let file = std::fs::File::open(path)?;
    read_csv(file, has_headers)
}
