use std::collections::HashMap;

/// An ordered set of 1-based atom ids stored under a name in an index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomGroup {
    header: String,
    name: String,
    atoms: Vec<usize>,
}

impl AtomGroup {
    pub fn new(header: impl Into<String>, atoms: Vec<usize>) -> Self {
        let header = header.into();
        let name = header
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim()
            .to_string();
        Self {
            header,
            name,
            atoms,
        }
    }

    /// The header line exactly as it appeared in the file, e.g. `[ Chain_A ]`.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The group name without brackets or surrounding spaces.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Builds the literal header used as the lookup key for a group name.
pub fn group_key(name: &str) -> String {
    format!("[ {} ]", name)
}

/// All groups of one index file, in file order.
///
/// Groups are keyed by their literal header line. When a header appears more
/// than once, every group is kept but lookups resolve to the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexFile {
    groups: Vec<AtomGroup>,
    by_header: HashMap<String, usize>,
}

impl IndexFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: AtomGroup) {
        self.by_header
            .insert(group.header.clone(), self.groups.len());
        self.groups.push(group);
    }

    /// Looks a group up by its literal header line.
    pub fn get_by_header(&self, header: &str) -> Option<&AtomGroup> {
        self.by_header.get(header).map(|&i| &self.groups[i])
    }

    /// Looks a group up by name, using the `[ <name> ]` header form.
    pub fn get(&self, name: &str) -> Option<&AtomGroup> {
        self.get_by_header(&group_key(name))
    }

    pub fn groups(&self) -> &[AtomGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<AtomGroup> for IndexFile {
    fn from_iter<T: IntoIterator<Item = AtomGroup>>(iter: T) -> Self {
        let mut index = IndexFile::new();
        for group in iter {
            index.push(group);
        }
        index
    }
}
