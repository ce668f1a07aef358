use super::*;

/// Liganding information collected for a single [`Entity`]
#[derive(Clone, Debug, PartialEq)]
pub struct EntityHits {
    pub entity: Entity,
    /// Number of table rows that belong to this entity
    pub rows: usize,
    /// Number of those rows with at least one liganded ratio
    pub liganded_rows: usize,
    /// Indices into [`Aggregation::groups`] of every group that ligands
    /// this entity. Several columns or rows hitting the same group count once.
    pub groups: BTreeSet<usize>,
}

impl EntityHits {
    fn new(entity: Entity) -> EntityHits {
        EntityHits {
            entity,
            rows: 0,
            liganded_rows: 0,
            groups: BTreeSet::new(),
        }
    }

    pub fn is_liganded(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// Entities split by whether any of their ratios meet the threshold
/// INVARIANT: liganded + unliganded equals the number of entities
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub liganded: usize,
    pub unliganded: usize,
}

impl Partition {
    pub fn total(&self) -> usize {
        self.liganded + self.unliganded
    }
}

/// How many liganded entities a group shares with other groups
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Sharing {
    /// Entities liganded by this group and no other
    pub unique: usize,
    /// Entities liganded by this group and at least one more
    pub shared: usize,
}

/// Result of a single pass over a [`Table`]
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    pub grouping: Grouping,
    pub level: Level,
    /// Raw reactivity column names
    pub columns: Vec<String>,
    /// Number of liganded rows in each raw column
    pub column_hits: Vec<usize>,
    /// Distinct group-keys, in the order their first column appears
    pub groups: Vec<String>,
    /// Number of distinct entities liganded by each group, aligned with
    /// `groups`
    pub liganded: Vec<usize>,
    /// Every entity in the table, in order of first appearance
    pub entities: Vec<EntityHits>,
}

impl Aggregation {
    pub fn new(table: &Table, grouping: Grouping, level: Level) -> Result<Aggregation> {
        table.check_level(level)?;

        // Map each raw column onto the index of its group
        let mut groups: Vec<String> = Vec::new();
        let mut group_of = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let key = grouping.key(column);
            let idx = match groups.iter().position(|g| g == key) {
                Some(idx) => idx,
                None => {
                    groups.push(key.into());
                    groups.len() - 1
                }
            };
            group_of.push(idx);
        }

        let mut column_hits = vec![0; table.columns.len()];
        let mut index: HashMap<Entity, usize> = HashMap::new();
        let mut entities: Vec<EntityHits> = Vec::new();

        for row in &table.rows {
            let entity = row.entity(level);
            let idx = match index.get(&entity) {
                Some(&idx) => idx,
                None => {
                    index.insert(entity.clone(), entities.len());
                    entities.push(EntityHits::new(entity));
                    entities.len() - 1
                }
            };

            let hits = &mut entities[idx];
            hits.rows += 1;

            let mut any = false;
            for col in row.liganded_columns() {
                column_hits[col] += 1;
                hits.groups.insert(group_of[col]);
                any = true;
            }
            if any {
                hits.liganded_rows += 1;
            }
        }

        let mut liganded = vec![0; groups.len()];
        for hits in &entities {
            for &g in &hits.groups {
                liganded[g] += 1;
            }
        }

        log::debug!(
            "{}: {} entities over {} groups",
            table.path,
            entities.len(),
            groups.len()
        );

        Ok(Aggregation {
            grouping,
            level,
            columns: table.columns.clone(),
            column_hits,
            groups,
            liganded,
            entities,
        })
    }

    /// Number of distinct entities liganded by `group`
    pub fn liganded_by(&self, group: &str) -> usize {
        self.groups
            .iter()
            .position(|g| g == group)
            .map(|idx| self.liganded[idx])
            .unwrap_or_default()
    }

    /// Names of the groups liganding an entity
    pub fn group_names<'a>(&'a self, hits: &'a EntityHits) -> impl Iterator<Item = &'a str> + 'a {
        hits.groups.iter().map(move |&g| self.groups[g].as_str())
    }

    /// Histogram of distinct liganding groups per entity
    pub fn histogram(&self, overflow: usize) -> Histogram {
        Histogram::collect_with(overflow, self.entities.iter().map(|e| e.groups.len()))
    }

    /// Histogram of liganded rows per entity. At the protein level on a
    /// peptide table this is the number of liganded peptides per protein.
    pub fn row_histogram(&self, overflow: usize) -> Histogram {
        Histogram::collect_with(overflow, self.entities.iter().map(|e| e.liganded_rows))
    }

    pub fn partition(&self) -> Partition {
        let liganded = self.entities.iter().filter(|e| e.is_liganded()).count();
        Partition {
            liganded,
            unliganded: self.entities.len() - liganded,
        }
    }

    /// Unique and shared liganded entity counts, aligned with `groups`
    pub fn sharing(&self) -> Vec<Sharing> {
        let mut v = vec![Sharing::default(); self.groups.len()];
        for hits in &self.entities {
            match hits.groups.len() {
                0 => {}
                1 => {
                    for &g in &hits.groups {
                        v[g].unique += 1;
                    }
                }
                _ => {
                    for &g in &hits.groups {
                        v[g].shared += 1;
                    }
                }
            }
        }
        v
    }
}
