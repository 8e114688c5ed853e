//! `.tas` dataset archives.
//!
//! A zip file with the following entries:
//!
//! ```text
//! metadata.json        CommonMetadata
//! analysis.json        CommonAnalysis
//! ustas.json           MicroSecondAnalysis
//! raw/<channel>/...    raw measurement files, verbatim
//! spectra/<time>.csv   corrected spectra, one file per time point
//! background.csv       subtracted background (optional)
//! ```
//!
//! Quantities in the JSON documents are scientific-value strings and spectra
//! file names are scientific time strings, so a save/load cycle reproduces the
//! dataset exactly.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::data::{CommonAnalysis, CommonMetadata, MicroSecondAnalysis, MicroSecondTasData, RawData, TasType};
use crate::error::AppError;
use crate::spectra::{Spectra, Spectrum};

const METADATA: &str = "metadata.json";
const ANALYSIS: &str = "analysis.json";
const USTAS: &str = "ustas.json";
const RAW_DIR: &str = "raw/";
const SPECTRA_DIR: &str = "spectra/";
const BACKGROUND: &str = "background.csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveConfig {
    pub compression: Compression,
}

impl SaveConfig {
    fn file_options(&self) -> FileOptions {
        let method = match self.compression {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        };
        FileOptions::default().compression_method(method)
    }
}

/// Write `data` to a `.tas` archive at `path`, replacing any existing file.
pub fn save_archive(path: &Path, data: &MicroSecondTasData, config: &SaveConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create archive '{}': {e}", path.display())))?;
    let mut zip = ZipWriter::new(file);
    let options = config.file_options();

    write_json(&mut zip, METADATA, &data.metadata, options)?;
    write_json(&mut zip, ANALYSIS, &data.analysis, options)?;
    write_json(&mut zip, USTAS, &data.microsecond, options)?;

    for node in &data.raw {
        write_raw(&mut zip, RAW_DIR, node, options)?;
    }
    for (t, spectrum) in data.spectra.iter() {
        let name = format!("{SPECTRA_DIR}{}", Spectra::file_name(t));
        write_entry(&mut zip, &name, spectrum.to_csv_string()?.as_bytes(), options)?;
    }
    if let Some(background) = &data.background {
        write_entry(&mut zip, BACKGROUND, background.to_csv_string()?.as_bytes(), options)?;
    }

    zip.finish()
        .map_err(|e| AppError::io(format!("Failed to finish archive '{}': {e}", path.display())))?;
    info!(
        "Saved '{}' ({} spectra, {} raw file(s)).",
        path.display(),
        data.spectra.time_count(),
        data.raw.iter().map(RawData::file_count).sum::<usize>()
    );
    Ok(())
}

/// Read a `.tas` archive written by [`save_archive`].
pub fn load_archive(path: &Path) -> Result<MicroSecondTasData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open archive '{}': {e}", path.display())))?;
    let mut zip = ZipArchive::new(file)
        .map_err(|e| AppError::format(format!("'{}' is not a valid archive: {e}", path.display())))?;

    let metadata: CommonMetadata = read_json(&mut zip, METADATA)?;
    if metadata.tas_type != TasType::MicroSecond {
        return Err(AppError::invalid_value(format!(
            "Unsupported dataset type '{}' in '{}'.",
            metadata.tas_type.display_name(),
            path.display()
        )));
    }
    let analysis: CommonAnalysis = read_json(&mut zip, ANALYSIS)?;
    let microsecond: MicroSecondAnalysis = read_json(&mut zip, USTAS)?;

    let mut raw = Vec::new();
    let mut spectra_files = Vec::new();
    let mut background = None;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| AppError::format(format!("Corrupt archive entry #{i}: {e}")))?;
        let name = entry.name().to_string();
        if entry.is_dir() {
            // Empty raw directories only exist as directory entries.
            if let Some(rel) = name.strip_prefix(RAW_DIR).filter(|r| !r.is_empty()) {
                insert_raw(&mut raw, rel, Vec::new())?;
            }
            continue;
        }
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| AppError::io(format!("Failed to read archive entry '{name}': {e}")))?;

        if let Some(rel) = name.strip_prefix(RAW_DIR) {
            insert_raw(&mut raw, rel, bytes)?;
        } else if let Some(stem) = name.strip_prefix(SPECTRA_DIR).and_then(|n| n.strip_suffix(".csv")) {
            spectra_files.push((stem.to_string(), bytes));
        } else if name == BACKGROUND {
            background = Some(Spectrum::read_csv(bytes.as_slice(), BACKGROUND)?);
        } else {
            debug!("Skipping archive entry '{name}'.");
        }
    }
    sort_tree(&mut raw);

    let spectra = Spectra::from_named_csv(spectra_files)?;
    info!("Loaded '{}' ({} spectra).", path.display(), spectra.time_count());

    Ok(MicroSecondTasData {
        metadata,
        analysis,
        microsecond,
        raw,
        spectra,
        background,
    })
}

fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    bytes: &[u8],
    options: FileOptions,
) -> Result<(), AppError> {
    zip.start_file(name, options)
        .map_err(|e| AppError::io(format!("Failed to add '{name}' to archive: {e}")))?;
    zip.write_all(bytes)
        .map_err(|e| AppError::io(format!("Failed to write '{name}' to archive: {e}")))
}

fn write_json<W: Write + Seek, T: Serialize>(
    zip: &mut ZipWriter<W>,
    name: &str,
    value: &T,
    options: FileOptions,
) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| AppError::format(format!("Failed to serialize '{name}': {e}")))?;
    write_entry(zip, name, &bytes, options)
}

fn write_raw<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    prefix: &str,
    node: &RawData,
    options: FileOptions,
) -> Result<(), AppError> {
    match node {
        RawData::File { name, bytes } => write_entry(zip, &format!("{prefix}{name}"), bytes, options),
        RawData::Directory { name, children } => {
            let dir = format!("{prefix}{name}/");
            zip.add_directory(dir.as_str(), options)
                .map_err(|e| AppError::io(format!("Failed to add '{dir}' to archive: {e}")))?;
            children.iter().try_for_each(|c| write_raw(zip, &dir, c, options))
        }
    }
}

fn read_json<R: Read + Seek, T: DeserializeOwned>(zip: &mut ZipArchive<R>, name: &str) -> Result<T, AppError> {
    let mut entry = zip
        .by_name(name)
        .map_err(|e| AppError::missing_file(format!("Archive has no '{name}': {e}")))?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| AppError::io(format!("Failed to read '{name}': {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::format(format!("Invalid '{name}': {e}")))
}

/// Insert a file at the `/`-separated `rel` path, creating directories. A
/// trailing `/` inserts just the (possibly empty) directory.
fn insert_raw(nodes: &mut Vec<RawData>, rel: &str, bytes: Vec<u8>) -> Result<(), AppError> {
    match rel.split_once('/') {
        None if rel.is_empty() => Err(AppError::format("Empty raw entry name in archive.")),
        None => {
            nodes.push(RawData::File { name: rel.to_string(), bytes });
            Ok(())
        }
        Some(("", _)) => Err(AppError::format(format!("Empty directory name in raw entry '{rel}'."))),
        Some((dir, rest)) => {
            let idx = match nodes.iter().position(|n| n.is_dir() && n.name() == dir) {
                Some(idx) => idx,
                None => {
                    nodes.push(RawData::Directory { name: dir.to_string(), children: Vec::new() });
                    nodes.len() - 1
                }
            };
            match &mut nodes[idx] {
                RawData::Directory { .. } if rest.is_empty() => Ok(()),
                RawData::Directory { children, .. } => insert_raw(children, rest, bytes),
                RawData::File { .. } => Err(AppError::format(format!("Raw entry '{dir}' is not a directory."))),
            }
        }
    }
}

fn sort_tree(nodes: &mut [RawData]) {
    crate::data::raw::sort_children(nodes);
    for node in nodes {
        if let RawData::Directory { children, .. } = node {
            sort_tree(children);
        }
    }
}
