use phf::{Set, phf_set};

/// Sections whose header ends the search for a restraint insertion point.
static RESTRAINT_BOUNDARY_SECTIONS: Set<&'static str> = phf_set! {
    "system", "molecules",
};

pub const ATOMTYPES: &str = "atomtypes";
pub const MOLECULETYPE: &str = "moleculetype";
pub const MOLECULES: &str = "molecules";

const FORCEFIELD_FILE_SUFFIX: &str = "forcefield.itp";
const POSRES_IFDEF_PREFIX: &str = "#ifdef POSRES";
const CHAIN_MOLECULE_PREFIX: &str = "Protein_chain_";

/// Name of the section opened by `line`, e.g. `atomtypes` for `[ atomtypes ]`.
pub fn section_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(rest[..end].trim())
}

pub fn is_section_header(line: &str) -> bool {
    line.trim_start().starts_with('[')
}

pub fn is_section(line: &str, name: &str) -> bool {
    section_name(line).is_some_and(|s| s.eq_ignore_ascii_case(name))
}

pub fn is_atomtypes_header(line: &str) -> bool {
    is_section(line, ATOMTYPES)
}

pub fn is_moleculetype_header(line: &str) -> bool {
    is_section(line, MOLECULETYPE)
}

pub fn is_molecules_header(line: &str) -> bool {
    is_section(line, MOLECULES)
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(';')
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub fn is_include(line: &str) -> bool {
    line.trim_start().starts_with("#include")
}

/// Path referenced by an `#include "..."` (or `#include <...>`) directive.
pub fn include_path(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("#include")?.trim();
    let (open, close) = match rest.chars().next()? {
        '"' => ('"', '"'),
        '<' => ('<', '>'),
        _ => return None,
    };
    let inner = rest.strip_prefix(open)?;
    let end = inner.find(close)?;
    Some(&inner[..end])
}

/// An `#include` of the force field's top-level parameter file.
pub fn is_forcefield_include(line: &str) -> bool {
    include_path(line).is_some_and(|path| path.ends_with(FORCEFIELD_FILE_SUFFIX))
}

pub fn is_posres_ifdef(line: &str) -> bool {
    line.trim_start().starts_with(POSRES_IFDEF_PREFIX)
}

pub fn is_ifdef(line: &str) -> bool {
    line.trim_start().starts_with("#ifdef")
}

/// Lines that close a chain's moleculetype block for restraint insertion.
pub fn is_restraint_boundary(line: &str) -> bool {
    section_name(line)
        .is_some_and(|s| RESTRAINT_BOUNDARY_SECTIONS.contains(s.to_ascii_lowercase().as_str()))
        || is_include(line)
        || is_posres_ifdef(line)
}

/// End of an atom-type block: the first blank line or section header after it.
pub fn is_atomtypes_terminator(line: &str) -> bool {
    is_blank(line) || is_section_header(line)
}

/// Moleculetype name used for protein chain `chain`.
pub fn chain_molecule_name(chain: &str) -> String {
    format!("{}{}", CHAIN_MOLECULE_PREFIX, chain)
}

/// A moleculetype data line naming the protein chain `chain`.
pub fn is_chain_moleculetype_line(line: &str, chain: &str) -> bool {
    first_token(line).is_some_and(|token| {
        token
            .strip_prefix(CHAIN_MOLECULE_PREFIX)
            .is_some_and(|label| label == chain)
    })
}

/// A non-comment `[ molecules ]` entry whose name begins with `PROTEIN` in any case.
pub fn is_protein_molecule_entry(line: &str) -> bool {
    !is_comment(line)
        && first_token(line).is_some_and(|name| {
            name.get(..7)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("protein"))
        })
}

pub fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// File names produced as restraint output rather than chain definitions.
pub fn is_restraint_file_name(file_name: &str) -> bool {
    file_name.contains("posre") || file_name.ends_with("_pr.itp")
}

/// Per-chain include file for `chain`, i.e. a name matching `*_chain_<chain>.itp`.
pub fn is_chain_include_file_name(file_name: &str, chain: &str) -> bool {
    !is_restraint_file_name(file_name) && file_name.ends_with(&format!("_chain_{}.itp", chain))
}
