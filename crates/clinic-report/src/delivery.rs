//! Report naming and delivery
//!
//! A [`FileSaver`] receives the rendered bytes under their final file name.
//! [`DirectorySaver`] writes into a directory, [`InMemorySaver`] keeps files in
//! memory for hosts that stream the report themselves.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use clinic_report_core::Employee;

/// File name of an employee's monthly report
///
/// `Reporte_Productividad_<nombre>_<apellido>_<MM>-<YYYY>_BETA.<ext>`, with
/// each name reduced to `[A-Za-z0-9_-]`.
pub fn report_filename(employee: &Employee, month: u32, year: i32, extension: &str) -> String {
    let extension = sanitize(extension.trim_start_matches('.'));
    format!(
        "Reporte_Productividad_{}_{}_{:02}-{:04}_BETA.{}",
        sanitize(&employee.first_name),
        sanitize(&employee.last_name),
        month,
        year,
        extension
    )
}

/// Reduce a name component to a path-safe token
///
/// Accented Latin letters lose their accent, whitespace runs become one `_`,
/// and anything else outside `[A-Za-z0-9_-]` is dropped. Empty results read `NA`.
pub fn sanitize(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    let mut pending_space = false;
    for c in component.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        let Some(c) = transliterate(c) else {
            continue;
        };
        if pending_space && !out.is_empty() {
            out.push('_');
        }
        pending_space = false;
        out.push(c);
    }
    if out.is_empty() {
        "NA".to_string()
    } else {
        out
    }
}

fn transliterate(c: char) -> Option<char> {
    let mapped = match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => c,
        _ => return None,
    };
    Some(mapped)
}

/// Destination for rendered reports
pub trait FileSaver {
    /// Save `bytes` as `filename`, returning where it went
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Saves reports into a directory
///
/// Bytes go to a temporary file in the target directory first and are
/// renamed into place, so a failed save never leaves a truncated report.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        if filename.contains(['/', '\\']) || filename.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid report file name: {filename:?}"),
            ));
        }
        std::fs::create_dir_all(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;

        tracing::debug!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

/// Keeps saved reports in memory, keyed by file name
#[derive(Debug, Default)]
pub struct InMemorySaver {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes saved under `filename`
    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(filename)
            .cloned()
    }

    /// Names of all saved files, sorted
    pub fn filenames(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl FileSaver for InMemorySaver {
    fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(filename.to_string(), bytes.to_vec());
        Ok(PathBuf::from(filename))
    }
}
