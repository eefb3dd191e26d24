//! File-backed templates.
//!
//! `TemplateFile` ties a [`Template`] to the filesystem: it can write a
//! rendering of the template to a path, or populate the template's fields
//! by reading back a file that was produced from it.

use crate::template::Template;
use crate::Result;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// A template bound to file-level read and write operations.
///
/// # Example
///
/// ```no_run
/// use xrb_core::TemplateFile;
///
/// let text = "{resvar:resolution} = {resdata:[0-9]{2,4}}\n";
///
/// // Assuming test.txt was rendered from this template:
/// let tfile = TemplateFile::from_file("test.txt", text)?;
/// assert_eq!(tfile.get_field("resdata")?, Some("128"));
/// # Ok::<(), xrb_core::XrbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TemplateFile {
    template: Template,
}

impl TemplateFile {
    /// Construct from template text, with all fields unset.
    pub fn new(template_text: impl Into<String>) -> Result<Self> {
        Ok(Self {
            template: Template::new(template_text)?,
        })
    }

    /// Factory: construct from template text, then immediately populate the
    /// fields from the file at `path`. Any parse failure propagates.
    pub fn from_file(path: impl AsRef<Path>, template_text: impl Into<String>) -> Result<Self> {
        let mut tfile = Self::new(template_text)?;
        tfile.read_file(path)?;
        Ok(tfile)
    }

    /// Populate field values from the file at `path`.
    ///
    /// The file is opened, read line by line, and closed on every exit
    /// path, including failures.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading template data");
        let file = File::open(path)?;
        self.template.parse_reader(BufReader::new(file))?;
        info!(path = %path.display(), "template data read");
        Ok(())
    }

    /// Render the current values and write the text to `path`, creating
    /// parent directories as needed.
    ///
    /// Rendering happens before the filesystem is touched, so a
    /// [`crate::XrbError::MissingData`] failure never leaves a partial
    /// file behind.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.template.render()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text)?;
        info!(path = %path.display(), "template rendered to file");
        Ok(())
    }

    /// The underlying template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Get the data stored in `field`.
    pub fn get_field(&self, field: &str) -> Result<Option<&str>> {
        self.template.get_field(field)
    }

    /// Set `field` to store `value`.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.template.set_field(field, value)
    }

    /// Replace all field values wholesale; keys must match the field set.
    pub fn init_data<I, K, S>(&mut self, data: I) -> Result<()>
    where
        K: Into<String>,
        S: Into<String>,
        I: IntoIterator<Item = (K, S)>,
    {
        self.template.init_data(data)
    }

    /// Render the template using the internally stored values.
    pub fn render(&self) -> Result<String> {
        self.template.render()
    }

    /// Render using an explicit map instead of the stored values.
    pub fn render_with(&self, data: &HashMap<String, String>) -> Result<String> {
        self.template.render_with(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XrbError;
    use tempfile::tempdir;

    const TEMPLATE: &str = "\
# Comment describing {filename[.*#.*]:[a-zA-Z0-9]+\\.dat}
{resvar:resolution} = {resdata:[0-9]{2,4}}
";

    #[test]
    fn test_write_then_from_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.txt");

        let mut tfile = TemplateFile::new(TEMPLATE).unwrap();
        tfile
            .init_data([
                ("filename", "myfile.dat"),
                ("resvar", "resolution"),
                ("resdata", "128"),
            ])
            .unwrap();
        tfile.write_file(&path).unwrap();

        let loaded = TemplateFile::from_file(&path, TEMPLATE).unwrap();
        assert_eq!(loaded.get_field("filename").unwrap(), Some("myfile.dat"));
        assert_eq!(loaded.get_field("resvar").unwrap(), Some("resolution"));
        assert_eq!(loaded.get_field("resdata").unwrap(), Some("128"));
    }

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.txt");

        let mut tfile = TemplateFile::new("value = {v:[0-9]+}\n").unwrap();
        tfile.set_field("v", "7").unwrap();
        tfile.write_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "value = 7\n");
    }

    #[test]
    fn test_write_file_with_unset_data_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let tfile = TemplateFile::new("value = {v:[0-9]+}\n").unwrap();
        let err = tfile.write_file(&path).unwrap_err();
        assert!(matches!(err, XrbError::MissingData(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_from_file_missing_field_propagates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.txt");
        fs::write(&path, "# Comment describing myfile.dat\n").unwrap();

        let err = TemplateFile::from_file(&path, TEMPLATE).unwrap_err();
        match err {
            XrbError::FieldsNotFound(remaining) => {
                assert_eq!(remaining, vec!["resvar".to_string(), "resdata".to_string()]);
            }
            other => panic!("expected FieldsNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_read_file_missing_path_is_io_error() {
        let dir = tempdir().unwrap();
        let mut tfile = TemplateFile::new("{v:[0-9]+}\n").unwrap();
        let err = tfile.read_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, XrbError::Io(_)));
    }
}
