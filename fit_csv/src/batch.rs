//! Directory conversion.
//!
//! Every `*.fit` file (any case) in the input directory becomes `<stem>.csv`
//! in the output directory. A failing file is reported and the rest carry on.

use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{Error, dispatch, read_messages, write_rows};

pub const INPUT_EXTENSION: &str = "fit";
pub const OUTPUT_EXTENSION: &str = "csv";

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Convert files on the rayon pool. Integration state is per file either way.
    pub parallel: bool,
}

#[derive(Debug, Default)]
pub struct Report {
    /// Output file and number of rows written
    pub converted: Vec<(PathBuf, usize)>,
    /// Input file and the reason it was skipped
    pub failed: Vec<(PathBuf, Error)>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn is_fit_file(path: &Path) -> bool {
    path.extension()
        .and_then(|this| this.to_str())
        .is_some_and(|this| this.eq_ignore_ascii_case(INPUT_EXTENSION))
}

/// `<output_dir>/<stem>.csv` for an input file.
pub fn output_path(input: &Path, output_dir: &Path) -> Option<PathBuf> {
    let mut name = input.file_stem()?.to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);

    Some(output_dir.join(name))
}

/// FIT files directly inside `dir`, sorted by name.
pub fn fit_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let io_error = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|this| this.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?
        .into_iter()
        .filter(|this| this.is_file() && is_fit_file(this))
        .collect::<Vec<_>>();

    files.sort();

    Ok(files)
}

/// Convert a single file. Returns the number of rows written.
pub fn convert_file(input: &Path, output: &Path) -> Result<usize, Error> {
    let messages = read_messages(input)?;
    let rows = dispatch(messages);

    let file = File::create(output).map_err(|source| Error::Io {
        path: output.to_path_buf(),
        source,
    })?;

    write_rows(BufWriter::new(file), &rows).map_err(|source| Error::Csv {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::debug!(rows = rows.len(), output = %output.display(), "Saved");

    Ok(rows.len())
}

/// Convert every FIT file of `input_dir` into `output_dir`, creating it if needed.
///
/// # Errors
/// Only when a directory can't be listed or created. Per-file failures end up
/// in [`Report::failed`].
pub fn convert_dir(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<Report, Error> {
    let files = fit_files(input_dir)?;

    fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let results = match options.parallel {
        true => files
            .par_iter()
            .map(|input| convert_into(input, output_dir))
            .collect::<Vec<_>>(),
        false => files
            .iter()
            .map(|input| convert_into(input, output_dir))
            .collect::<Vec<_>>(),
    };

    let mut report = Report::default();

    for (input, result) in results {
        match result {
            Ok(converted) => report.converted.push(converted),
            Err(error) => {
                tracing::warn!("{error}");
                report.failed.push((input, error));
            }
        }
    }

    tracing::info!(
        converted = report.converted.len(),
        failed = report.failed.len(),
        "finished conversions"
    );

    Ok(report)
}

fn convert_into(input: &Path, output_dir: &Path) -> (PathBuf, Result<(PathBuf, usize), Error>) {
    tracing::info!("converting {}", input.display());

    let result = match output_path(input, output_dir) {
        Some(output) => convert_file(input, &output).map(|rows| (output, rows)),
        None => Err(Error::Io {
            path: input.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "no file name"),
        }),
    };

    (input.to_path_buf(), result)
}
