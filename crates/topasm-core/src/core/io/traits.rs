use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing one text file format.
///
/// Implementors handle format-specific parsing and serialization; the path
/// helpers open, buffer and flush files on their behalf.
pub trait TextFile {
    /// The in-memory representation of a file's contents.
    type Content;

    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads the contents from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error>;

    /// Writes the contents to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads the contents from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Content, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes the contents to a file path, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(content: &Self::Content, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(content, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parses contents from an in-memory string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    fn read_from_str(text: &str) -> Result<Self::Content, Self::Error> {
        Self::read_from(&mut text.as_bytes())
    }

    /// Serializes contents into a `String`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn write_to_string(content: &Self::Content) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(content, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
