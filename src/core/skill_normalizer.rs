use std::collections::BTreeSet;

use super::skill_catalog::SynonymTable;

pub fn normalize_skills<'a, I>(skills: I, table: &SynonymTable) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    skills
        .into_iter()
        .map(|skill| match table.canonical_for(skill) {
            Some(canonical) => canonical.to_string(),
            None => skill.clone(),
        })
        .collect()
}
