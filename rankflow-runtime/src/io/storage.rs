use rankflow_common::error::{RankFlowError, RankFlowResult};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub fn part_file_name(partition: usize) -> String {
    format!("part-r-{partition:05}")
}

/// Storage for stage input and output.
///
/// An output location is a directory of part files, one per aggregate
/// partition. Names starting with `_` or `.` are bookkeeping and are never
/// listed as data files.
pub trait Storage: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn delete_recursive(&self, path: &Path) -> RankFlowResult<()>;

    /// Data files of a location in read order: the file itself, or the sorted
    /// data files of a directory.
    fn list_files(&self, path: &Path) -> RankFlowResult<Vec<PathBuf>>;

    fn open(&self, file: &Path) -> RankFlowResult<Box<dyn BufRead>>;

    /// Writes one part file per entry and publishes the location only after
    /// every part is on disk.
    fn write_location(&self, path: &Path, parts: Vec<Vec<u8>>) -> RankFlowResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    fn is_data_file(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        path.is_file() && !name.starts_with('_') && !name.starts_with('.')
    }

    fn temporary_path(path: &Path) -> RankFlowResult<PathBuf> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                RankFlowError::Configuration(format!(
                    "output location {} has no file name",
                    path.display()
                ))
            })?;
        Ok(path.with_file_name(format!("_temporary_{name}")))
    }
}

impl Storage for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn delete_recursive(&self, path: &Path) -> RankFlowResult<()> {
        if path.is_dir() {
            fs::remove_dir_all(path)?;
        } else if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn list_files(&self, path: &Path) -> RankFlowResult<Vec<PathBuf>> {
        if !path.exists() {
            return Err(RankFlowError::MissingOutput(format!(
                "{} does not exist",
                path.display()
            )));
        }
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let p = entry?.path();
            if Self::is_data_file(&p) {
                files.push(p);
            }
        }
        if files.is_empty() {
            return Err(RankFlowError::MissingOutput(format!(
                "{} contains no data files",
                path.display()
            )));
        }
        files.sort();
        Ok(files)
    }

    fn open(&self, file: &Path) -> RankFlowResult<Box<dyn BufRead>> {
        match File::open(file) {
            Ok(f) => Ok(Box::new(BufReader::new(f))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                RankFlowError::MissingOutput(format!("{} does not exist", file.display())),
            ),
            Err(e) => Err(RankFlowError::Io(e)),
        }
    }

    fn write_location(&self, path: &Path, parts: Vec<Vec<u8>>) -> RankFlowResult<()> {
        if path.exists() {
            return Err(RankFlowError::Configuration(format!(
                "output location {} already exists",
                path.display()
            )));
        }
        let tmp = Self::temporary_path(path)?;
        if tmp.exists() {
            fs::remove_dir_all(&tmp)?;
        }
        fs::create_dir_all(&tmp)?;

        for (i, bytes) in parts.iter().enumerate() {
            let mut f = File::create(tmp.join(part_file_name(i)))?;
            f.write_all(bytes)?;
            f.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
