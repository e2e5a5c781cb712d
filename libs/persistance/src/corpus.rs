use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
    str,
};

use bias::{CorpusResult, Document};
use csv::{ByteRecord, ReaderBuilder, Writer};
use log::warn;
use thiserror::Error;

use crate::config::Columns;

/// Columns appended after the input columns of every output row.
pub const SCORE_HEADERS: [&str; 7] = ["sb", "pos_a", "neg_a", "n_a", "pos_b", "neg_b", "n_b"];

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("could not open corpus file")]
    Io(#[from] std::io::Error),
    #[error("could not read or write corpus csv")]
    Csv(#[from] csv::Error),
    #[error("corpus has no {0:?} column")]
    MissingColumn(String),
}

struct ColumnIndex {
    url: usize,
    outlet: usize,
    body: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &ByteRecord, columns: &Columns) -> Result<Self, CorpusError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim() == name)
                .ok_or_else(|| CorpusError::MissingColumn(name.to_owned()))
        };
        Ok(ColumnIndex {
            url: find(&columns.url)?,
            outlet: find(&columns.outlet)?,
            body: find(&columns.body)?,
        })
    }
}

/// A parsed corpus: the input header row and one document per data row.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusTable {
    pub headers: Vec<String>,
    pub documents: Vec<Document>,
}

/// Reads every row of a corpus. Rows whose body is missing or not valid UTF-8 are kept with no
/// text so they still produce a result. Each document keeps its full row, padded or cut to the
/// width of the header.
pub fn read_corpus<R: Read>(reader: R, columns: &Columns) -> Result<CorpusTable, CorpusError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let header_row = reader.byte_headers()?.clone();
    let index = ColumnIndex::from_headers(&header_row, columns)?;
    let headers = header_row
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect::<Vec<String>>();
    let mut documents = Vec::new();
    for (row, record) in reader.byte_records().enumerate() {
        let record = record?;
        let lossy = |i: usize| {
            record
                .get(i)
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .unwrap_or_default()
        };
        let url = lossy(index.url);
        let outlet = lossy(index.outlet);
        let text = match record.get(index.body).map(str::from_utf8) {
            Some(Ok(body)) => Some(body.to_owned()),
            Some(Err(e)) => {
                warn!("Row {} ({}) has an unreadable body: {}", row + 1, url, e);
                None
            }
            None => {
                warn!("Row {} ({}) has no body", row + 1, url);
                None
            }
        };
        if record.len() > headers.len() {
            warn!(
                "Row {} ({}) has {} fields, dropping the ones past column {}",
                row + 1,
                url,
                record.len(),
                headers.len()
            );
        }
        let fields = (0..headers.len()).map(lossy).collect::<Vec<String>>();
        documents.push(Document {
            url,
            outlet,
            text,
            fields,
        });
    }
    Ok(CorpusTable { headers, documents })
}

pub fn read_corpus_file(path: &Path, columns: &Columns) -> Result<CorpusTable, CorpusError> {
    read_corpus(File::open(path)?, columns)
}

/// Writes the input columns of every result followed by its scores. An undefined bias is written
/// as an empty field.
pub fn write_results<W: Write>(
    writer: W,
    headers: &[String],
    results: &[CorpusResult],
) -> Result<(), CorpusError> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(headers.iter().map(String::as_str).chain(SCORE_HEADERS))?;
    for result in results {
        let bias = result.bias.value().map(|v| v.to_string()).unwrap_or_default();
        let scores = [
            bias,
            result.a.positive.to_string(),
            result.a.negative.to_string(),
            result.a.total.to_string(),
            result.b.positive.to_string(),
            result.b.negative.to_string(),
            result.b.total.to_string(),
        ];
        let inputs = (0..headers.len()).map(|i| result.fields.get(i).cloned().unwrap_or_default());
        writer.write_record(inputs.chain(scores))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_results_file(
    path: &Path,
    headers: &[String],
    results: &[CorpusResult],
) -> Result<(), CorpusError> {
    write_results(File::create(path)?, headers, results)
}
