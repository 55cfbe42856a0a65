use super::traits::TextFile;
use crate::core::models::restraint::{
    ForceConstants, POSITION_RESTRAINTS_COLUMNS, POSITION_RESTRAINTS_HEADER,
    PositionRestraintRecord, PositionRestraints,
};
use crate::core::topology::markers;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosresError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: expected 'atom type fx fy fz', found '{content}'")]
    InvalidRecord { line: usize, content: String },
}

/// A standalone `[ position_restraints ]` include file.
pub struct PosresFile;

impl TextFile for PosresFile {
    type Content = PositionRestraints;
    type Error = PosresError;

    fn read_from(reader: &mut impl BufRead) -> Result<PositionRestraints, PosresError> {
        let mut records = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            if markers::is_blank(&line)
                || markers::is_comment(&line)
                || markers::is_section_header(&line)
            {
                continue;
            }
            let invalid = || PosresError::InvalidRecord {
                line: line_num + 1,
                content: line.clone(),
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [atom, function_type, fx, fy, fz] = fields.as_slice() else {
                return Err(invalid());
            };
            let parse_f64 = |s: &str| s.parse::<f64>().map_err(|_| invalid());
            records.push(PositionRestraintRecord {
                atom: atom.parse().map_err(|_| invalid())?,
                function_type: function_type.parse().map_err(|_| invalid())?,
                force_constants: ForceConstants::new(
                    parse_f64(*fx)?,
                    parse_f64(*fy)?,
                    parse_f64(*fz)?,
                ),
            });
        }
        Ok(PositionRestraints { records })
    }

    fn write_to(
        restraints: &PositionRestraints,
        writer: &mut impl Write,
    ) -> Result<(), PosresError> {
        writeln!(writer, "{}", POSITION_RESTRAINTS_HEADER)?;
        writeln!(writer, "{}", POSITION_RESTRAINTS_COLUMNS)?;
        for record in &restraints.records {
            writeln!(writer, "{}", record)?;
        }
        Ok(())
    }
}
