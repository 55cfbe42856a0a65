use std::collections::HashSet;

/// Builds output file names as `[<prefix>_][<step>_]<name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputNamer {
    pub prefix: Option<String>,
    pub step: Option<String>,
}

impl OutputNamer {
    pub fn new(prefix: Option<String>, step: Option<String>) -> Self {
        Self { prefix, step }
    }

    pub fn file_name(&self, name: &str) -> String {
        [self.prefix.as_deref(), self.step.as_deref(), Some(name)]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Starts a fresh allocation scope for one workflow call.
    pub fn allocator(&self) -> NameAllocator<'_> {
        NameAllocator {
            namer: self,
            claimed: HashSet::new(),
        }
    }
}

/// Hands out names that are unique within one workflow call.
///
/// A name requested twice gets a numeric suffix before its extension:
/// `Core_posre.itp`, then `Core_posre_2.itp`.
#[derive(Debug)]
pub struct NameAllocator<'a> {
    namer: &'a OutputNamer,
    claimed: HashSet<String>,
}

impl NameAllocator<'_> {
    pub fn claim(&mut self, name: &str) -> String {
        let base = self.namer.file_name(name);
        if self.claimed.insert(base.clone()) {
            return base;
        }
        let (stem, ext) = match base.rfind('.') {
            Some(dot) if dot > 0 => base.split_at(dot),
            _ => (base.as_str(), ""),
        };
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}{}", stem, n, ext);
            if self.claimed.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_without_prefix_or_step_is_unchanged() {
        assert_eq!(OutputNamer::default().file_name("ligand.top"), "ligand.top");
    }

    #[test]
    fn file_name_joins_prefix_and_step() {
        let namer = OutputNamer::new(Some("run1".into()), Some("step2".into()));
        assert_eq!(namer.file_name("Core_posre.itp"), "run1_step2_Core_posre.itp");
        let namer = OutputNamer::new(None, Some("eq".into()));
        assert_eq!(namer.file_name("ligand.top"), "eq_ligand.top");
    }

    #[test]
    fn empty_parts_are_skipped() {
        let namer = OutputNamer::new(Some(String::new()), Some("s".into()));
        assert_eq!(namer.file_name("x.itp"), "s_x.itp");
    }

    #[test]
    fn repeated_claims_get_numeric_suffixes() {
        let namer = OutputNamer::default();
        let mut names = namer.allocator();
        assert_eq!(names.claim("Core_posre.itp"), "Core_posre.itp");
        assert_eq!(names.claim("Core_posre.itp"), "Core_posre_2.itp");
        assert_eq!(names.claim("Core_posre.itp"), "Core_posre_3.itp");
        assert_eq!(names.claim("Other_posre.itp"), "Other_posre.itp");
    }

    #[test]
    fn allocators_are_independent() {
        let namer = OutputNamer::default();
        assert_eq!(namer.allocator().claim("a.itp"), "a.itp");
        assert_eq!(namer.allocator().claim("a.itp"), "a.itp");
    }

    #[test]
    fn names_without_extension_get_plain_suffix() {
        let namer = OutputNamer::default();
        let mut names = namer.allocator();
        names.claim("restraints");
        assert_eq!(names.claim("restraints"), "restraints_2");
    }
}
