use super::markers;
use crate::core::models::document::TopologyDocument;
use std::ops::Range;

/// The moleculetype directive of one protein chain inside a topology document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBlock {
    /// Line naming `Protein_chain_<chain>` below the `[ moleculetype ]` header.
    pub marker: usize,
    /// First `[ system ]`/`[ molecules ]` header, `#include` or `#ifdef POSRES` after the marker.
    pub boundary: Option<usize>,
}

/// Default distance between the chain marker and the restraint include.
const CHAIN_MARKER_OFFSET: usize = 3;

impl ChainBlock {
    /// Where a chain restraint include block goes: one line above the
    /// boundary when there is one, otherwise three lines below the marker.
    /// Never at or above the marker itself.
    pub fn insertion_point(&self) -> usize {
        match self.boundary {
            Some(boundary) => boundary.saturating_sub(1).max(self.marker + 1),
            None => self.marker + CHAIN_MARKER_OFFSET,
        }
    }
}

impl TopologyDocument {
    /// Name of the section the line at `index` belongs to: the nearest header
    /// at or above it.
    pub fn section_of(&self, index: usize) -> Option<&str> {
        self.slice(0..(index + 1).min(self.len()))
            .iter()
            .rev()
            .find_map(|line| markers::section_name(line))
    }

    /// First line inside section `section` satisfying `predicate`, found in a
    /// single pass that tracks the current section.
    pub fn find_in_section<P>(&self, section: &str, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        let mut inside = false;
        for (i, line) in self.lines().enumerate() {
            if let Some(name) = markers::section_name(line) {
                inside = name.eq_ignore_ascii_case(section);
                continue;
            }
            if inside && predicate(line) {
                return Some(i);
            }
        }
        None
    }

    /// Header line through the end of the first section named `section`.
    pub fn section_bounds(&self, section: &str) -> Option<Range<usize>> {
        let start = self.find(|line| markers::is_section(line, section))?;
        let end = self
            .find_from(start + 1, markers::is_section_header)
            .unwrap_or(self.len());
        Some(start..end)
    }

    pub fn forcefield_include(&self) -> Option<usize> {
        self.find(markers::is_forcefield_include)
    }

    /// The first `[ atomtypes ]` header up to, excluding, the next blank line
    /// or section header.
    pub fn atomtypes_block(&self) -> Option<Range<usize>> {
        let start = self.find(markers::is_atomtypes_header)?;
        let end = self
            .find_from(start + 1, markers::is_atomtypes_terminator)
            .unwrap_or(self.len());
        Some(start..end)
    }

    pub fn molecules_block(&self) -> Option<Range<usize>> {
        self.section_bounds(markers::MOLECULES)
    }

    pub fn chain_moleculetype_block(&self, chain: &str) -> Option<ChainBlock> {
        let marker = self.find_in_section(markers::MOLECULETYPE, |line| {
            markers::is_chain_moleculetype_line(line, chain)
        })?;
        let boundary = self
            .find_from(marker + 1, markers::is_restraint_boundary)
            .map(|b| self.guarding_ifdef(b, marker).unwrap_or(b));
        Some(ChainBlock { marker, boundary })
    }

    /// The `#ifdef` directly above an `#include` boundary, so a new block never
    /// lands inside an existing conditional include.
    fn guarding_ifdef(&self, boundary: usize, marker: usize) -> Option<usize> {
        let above = boundary.checked_sub(1).filter(|&i| i > marker)?;
        let is_guarded = self.line(boundary).is_some_and(markers::is_include)
            && self.line(above).is_some_and(markers::is_ifdef);
        is_guarded.then_some(above)
    }

    /// The last protein entry of the `[ molecules ]` section.
    pub fn last_protein_molecule_entry(&self) -> Option<usize> {
        let block = self.molecules_block()?;
        self.rfind_in(block.start + 1..block.end, markers::is_protein_molecule_entry)
    }

    /// Name declared by the first `[ moleculetype ]` directive: first token of
    /// its first non-comment, non-blank line.
    pub fn moleculetype_name(&self) -> Option<&str> {
        let header = self.find(markers::is_moleculetype_header)?;
        let line = self.find_from(header + 1, |line| {
            !markers::is_comment(line) && !markers::is_blank(line)
        })?;
        let line = self.line(line)?;
        if markers::is_section_header(line) {
            return None;
        }
        markers::first_token(line)
    }
}
