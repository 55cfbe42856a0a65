use super::traits::TextFile;
use crate::core::models::document::TopologyDocument;
use std::io::{self, BufRead, Write};

/// `.top` and `.itp` files, held verbatim as a [`TopologyDocument`].
pub struct TopFile;

impl TextFile for TopFile {
    type Content = TopologyDocument;
    type Error = io::Error;

    fn read_from(reader: &mut impl BufRead) -> Result<TopologyDocument, io::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(TopologyDocument::parse(&text))
    }

    fn write_to(document: &TopologyDocument, writer: &mut impl Write) -> Result<(), io::Error> {
        write!(writer, "{}", document)
    }
}
