//! JSON export and import of run outputs.

use crate::ResultsResult;
use crate::types::RunOutput;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub fn write_run_output<W: Write>(writer: W, output: &RunOutput) -> ResultsResult<()> {
    serde_json::to_writer_pretty(writer, output)?;
    Ok(())
}

pub fn read_run_output<R: Read>(reader: R) -> ResultsResult<RunOutput> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn save_run_output(path: &Path, output: &RunOutput) -> ResultsResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_run_output(&mut writer, output)?;
    writer.flush()?;
    Ok(())
}

pub fn load_run_output(path: &Path) -> ResultsResult<RunOutput> {
    read_run_output(BufReader::new(File::open(path)?))
}
