/// How reactivity columns are folded together before counting
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Grouping {
    /// Columns are `Compound_Concentration`; every concentration of a
    /// compound counts as that compound
    Compound,
    /// Columns are chemotype names and are used verbatim
    Chemotype,
}

impl Grouping {
    /// Return the group-key for a column name
    pub fn key(self, column: &str) -> &str {
        match self {
            Grouping::Compound => compound_name(column),
            Grouping::Chemotype => column,
        }
    }
}

/// Strip the concentration suffix from a column name
///
/// ```rust
/// # use ligand::compound_name;
/// assert_eq!(compound_name("CompoundA_10uM"), "CompoundA");
/// assert_eq!(compound_name("ChemoX"), "ChemoX");
/// ```
pub fn compound_name(column: &str) -> &str {
    match column.find('_') {
        Some(idx) => &column[..idx],
        None => column,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn by_compound() {
        assert_eq!(Grouping::Compound.key("CompoundA_10uM"), "CompoundA");
        assert_eq!(Grouping::Compound.key("KB02_25_extra"), "KB02");
        assert_eq!(Grouping::Compound.key("ChemoX"), "ChemoX");
        assert_eq!(Grouping::Compound.key("_25"), "");
        assert_eq!(Grouping::Compound.key(""), "");
    }

    #[test]
    fn by_chemotype() {
        assert_eq!(Grouping::Chemotype.key("CompoundA_10uM"), "CompoundA_10uM");
        assert_eq!(Grouping::Chemotype.key("Scouts"), "Scouts");
    }
}
