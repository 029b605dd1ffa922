use anyhow::{bail, Context, Result};
use rand::{seq::index, Rng};
use std::{io::Read, path::Path};

/// Reads a headerless CSV file where every field is a real number and every
/// record has the same length.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    read_rows(reader).with_context(|| format!("failed to load {}", path.display()))
}

/// Same as [`load_csv`] but from any reader, e.g. an in-memory buffer.
pub fn load_csv_from_reader<R: Read>(rdr: R) -> Result<Vec<Vec<f64>>> {
    let reader = csv::ReaderBuilder::new().has_headers(false).from_reader(rdr);
    read_rows(reader)
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // The csv reader already rejects records of unequal length:
        let record = record.with_context(|| format!("malformed record {}", i + 1))?;

        let row = record
            .iter()
            .enumerate()
            .map(|(column, field)| {
                field.trim().parse::<f64>().with_context(|| {
                    format!(
                        "record {} column {}: {:?} is not a number",
                        i + 1,
                        column + 1,
                        field
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), "loaded dataset");
    Ok(rows)
}

/// Randomly splits `rows` into a training set of `floor(ratio * len)` rows and
/// a test set holding the rest. Training rows are drawn uniformly without
/// replacement; test rows keep their original order.
pub fn split<R: Rng + ?Sized>(
    rows: Vec<Vec<f64>>,
    ratio: f64,
    rng: &mut R,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    if !(ratio > 0.0 && ratio < 1.0) {
        bail!("split ratio must be between 0 and 1 (exclusive), got {}", ratio);
    }

    let train_size = (rows.len() as f64 * ratio).floor() as usize;
    let picked = index::sample(rng, rows.len(), train_size).into_vec();

    let mut slots: Vec<Option<Vec<f64>>> = rows.into_iter().map(Some).collect();
    let train: Vec<Vec<f64>> = picked.iter().filter_map(|&i| slots[i].take()).collect();
    let test: Vec<Vec<f64>> = slots.into_iter().flatten().collect();

    tracing::debug!(train = train.len(), test = test.len(), "split dataset");
    Ok((train, test))
}
