use super::traits::TextFile;
use crate::core::models::index::{AtomGroup, IndexFile};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Atom ids written per line, matching the simulation engine's own index writer.
const ATOMS_PER_LINE: usize = 15;

#[derive(Debug, Error)]
pub enum NdxError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: NdxParseErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NdxParseErrorKind {
    #[error("Atom id must be a positive integer (value: '{0}')")]
    InvalidAtomId(String),
    #[error("Atom ids found before the first group header")]
    AtomsOutsideGroup,
}

fn parse_atom_id(token: &str, line: usize) -> Result<usize, NdxError> {
    match token.parse::<usize>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(NdxError::Parse {
            line,
            kind: NdxParseErrorKind::InvalidAtomId(token.to_string()),
        }),
    }
}

pub struct NdxFile;

impl TextFile for NdxFile {
    type Content = IndexFile;
    type Error = NdxError;

    /// A line starting with `[` opens a group and closes the previous one; the
    /// last group closes at end of input. Bodies may span any number of lines,
    /// including exactly one or none.
    fn read_from(reader: &mut impl BufRead) -> Result<IndexFile, NdxError> {
        let mut index = IndexFile::new();
        let mut current: Option<(String, Vec<usize>)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if line.starts_with('[') {
                if let Some((header, atoms)) = current.take() {
                    index.push(AtomGroup::new(header, atoms));
                }
                current = Some((line.trim_end().to_string(), Vec::new()));
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            let Some((_, atoms)) = current.as_mut() else {
                return Err(NdxError::Parse {
                    line: line_num,
                    kind: NdxParseErrorKind::AtomsOutsideGroup,
                });
            };
            for token in line.split_whitespace() {
                atoms.push(parse_atom_id(token, line_num)?);
            }
        }

        if let Some((header, atoms)) = current {
            index.push(AtomGroup::new(header, atoms));
        }
        Ok(index)
    }

    fn write_to(index: &IndexFile, writer: &mut impl Write) -> Result<(), NdxError> {
        for group in index.groups() {
            writeln!(writer, "[ {} ]", group.name())?;
            for chunk in group.atoms().chunks(ATOMS_PER_LINE) {
                let line: Vec<String> = chunk.iter().map(|id| format!("{:>4}", id)).collect();
                writeln!(writer, "{}", line.join(" "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_NDX: &str = "\
[ System ]
   1    2    3    4    5    6    7    8    9   10   11   12   13   14   15
  16   17
[ Chain_A ]
  10   20   30   40
[ Chain_A_noMut ]
  20   40
[ Empty ]
[ Tail ]
   3
   4
";

    fn read(text: &str) -> Result<IndexFile, NdxError> {
        NdxFile::read_from_str(text)
    }

    #[test]
    fn group_count_matches_header_count() {
        let index = read(SAMPLE_NDX).unwrap();
        let headers = SAMPLE_NDX.lines().filter(|l| l.starts_with('[')).count();
        assert_eq!(index.len(), headers);
    }

    #[test]
    fn multi_line_body_is_concatenated() {
        let index = read(SAMPLE_NDX).unwrap();
        let system = index.get("System").unwrap();
        assert_eq!(system.len(), 17);
        assert_eq!(system.atoms().last(), Some(&17));
    }

    #[test]
    fn single_line_body_resolves_its_atoms() {
        let index = read(SAMPLE_NDX).unwrap();
        assert_eq!(index.get("Chain_A").unwrap().atoms(), &[10, 20, 30, 40]);
        assert_eq!(index.get("Chain_A_noMut").unwrap().atoms(), &[20, 40]);
    }

    #[test]
    fn group_without_atoms_is_empty_not_an_error() {
        let index = read(SAMPLE_NDX).unwrap();
        assert!(index.get("Empty").unwrap().is_empty());
    }

    #[test]
    fn last_group_closes_at_end_of_file() {
        let index = read(SAMPLE_NDX).unwrap();
        assert_eq!(index.get("Tail").unwrap().atoms(), &[3, 4]);
        let index = read("[ Only ]\n 7 8").unwrap();
        assert_eq!(index.get("Only").unwrap().atoms(), &[7, 8]);
    }

    #[test]
    fn groups_keep_file_order() {
        let index = read(SAMPLE_NDX).unwrap();
        let names: Vec<&str> = index.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["System", "Chain_A", "Chain_A_noMut", "Empty", "Tail"]);
    }

    #[test]
    fn non_integer_token_reports_line_number() {
        let err = read("[ A ]\n1 2\n3 x\n").unwrap_err();
        match err {
            NdxError::Parse { line, kind } => {
                assert_eq!(line, 3);
                assert_eq!(kind, NdxParseErrorKind::InvalidAtomId("x".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_atom_id_is_rejected() {
        assert!(matches!(
            read("[ A ]\n0\n"),
            Err(NdxError::Parse {
                kind: NdxParseErrorKind::InvalidAtomId(_),
                ..
            })
        ));
    }

    #[test]
    fn atoms_before_first_header_are_rejected() {
        assert!(matches!(
            read("1 2 3\n[ A ]\n"),
            Err(NdxError::Parse {
                line: 1,
                kind: NdxParseErrorKind::AtomsOutsideGroup
            })
        ));
    }

    #[test]
    fn write_wraps_fifteen_ids_per_line() {
        let index = read(SAMPLE_NDX).unwrap();
        let text = NdxFile::write_to_string(&index).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("[ System ]"));
        assert_eq!(lines.next().unwrap().split_whitespace().count(), 15);
        assert_eq!(lines.next(), Some("  16   17"));
        assert_eq!(read(&text).unwrap(), index);
    }
}
