use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::errors::CoreError;

const MASTER_SKILLS: &[&str] = &[
    // Programming languages
    "python", "java", "c++", "c", "c#", "javascript", "typescript", "ruby", "php", "swift",
    "kotlin", "go", "rust", "scala", "r", "dart", "perl", "bash", "sql",
    // Web development
    "html", "css", "react", "angular", "vue", "django", "flask", "spring", "laravel",
    "node.js", "express", "jquery", "bootstrap", "sass", "less", "tailwind", "redux",
    "graphql", "rest api",
    // Mobile development
    "android", "ios", "flutter", "react native", "xamarin",
    // Databases
    "mysql", "postgresql", "oracle", "sqlite", "mongodb", "redis", "firebase", "cassandra",
    "mariadb", "elasticsearch",
    // DevOps and cloud
    "aws", "azure", "google cloud", "docker", "kubernetes", "jenkins", "ansible",
    "terraform", "github actions", "gitlab ci", "nginx", "apache", "linux", "windows server",
    // Data science and AI
    "machine learning", "deep learning", "tensorflow", "pytorch", "keras", "opencv", "numpy",
    "pandas", "scikit-learn", "matplotlib", "seaborn", "spark", "hadoop", "tableau",
    "power bi", "data science",
    // Version control and tools
    "git", "github", "gitlab", "bitbucket", "svn", "mercurial", "jira", "trello",
    "confluence", "slack", "postman",
    // Testing
    "selenium", "jest", "mocha", "junit", "pytest", "cypress",
    // Security
    "ethical hacking", "penetration testing", "owasp", "kali linux", "metasploit",
    "burp suite", "siem", "splunk",
    // Methodologies
    "agile", "scrum", "kanban", "devops", "ci/cd", "tdd", "bdd",
    // Other
    "data structures", "algorithms", "oop", "functional programming", "microservices",
    "serverless", "blockchain", "solidity", "arduino", "raspberry pi", "embedded systems",
    "networking",
];

const SYNONYMS: &[(&str, &[&str])] = &[
    ("machine learning", &["ml", "deep learning", "artificial intelligence"]),
    ("data scientist", &["data science", "research scientist"]),
    ("nlp", &["natural language processing"]),
    ("sql", &["structured query language", "database management"]),
    ("python", &["py"]),
    ("react", &["reactjs", "react.js"]),
    ("javascript", &["js", "ecmascript"]),
    ("node.js", &["nodejs"]),
    ("kubernetes", &["k8s"]),
    ("postgresql", &["postgres"]),
];

const DATABASE_TERMS: &[&str] = &[
    "mysql", "postgresql", "postgres", "oracle", "sql", "sqlite", "mariadb", "mssql",
    "sql server", "t-sql", "pl/sql",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynonymEntry {
    pub canonical: String,
    pub forms: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogFile {
    pub skills: Vec<String>,
    pub synonyms: Vec<SynonymEntry>,
    pub database_terms: Vec<String>,
}

impl CatalogFile {
    pub fn builtin() -> Self {
        Self {
            skills: MASTER_SKILLS.iter().map(|s| s.to_string()).collect(),
            synonyms: SYNONYMS
                .iter()
                .map(|(canonical, forms)| SynonymEntry {
                    canonical: canonical.to_string(),
                    forms: forms.iter().map(|f| f.to_string()).collect(),
                })
                .collect(),
            database_terms: DATABASE_TERMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: Vec<(String, HashSet<String>)>,
    lookup: HashMap<String, usize>,
}

impl SynonymTable {
    pub fn new(entries: Vec<SynonymEntry>) -> Result<Self, CoreError> {
        let mut normalized: Vec<(String, HashSet<String>)> = Vec::with_capacity(entries.len());
        for entry in entries {
            let canonical = normalize_entry(&entry.canonical)?;
            let forms = entry
                .forms
                .iter()
                .map(|form| normalize_entry(form))
                .collect::<Result<HashSet<_>, _>>()?;
            normalized.push((canonical, forms));
        }

        let canonical_keys: HashSet<&str> = normalized.iter().map(|(k, _)| k.as_str()).collect();
        let mut lookup = HashMap::new();
        for (index, (canonical, forms)) in normalized.iter().enumerate() {
            lookup.entry(canonical.clone()).or_insert(index);

            for form in forms {
                if form != canonical && canonical_keys.contains(form.as_str()) {
                    return Err(CoreError::InvalidCatalog(format!(
                        "'{form}' is a canonical skill and cannot also be a synonym of '{canonical}'"
                    )));
                }

                if let Some(&existing) = lookup.get(form) {
                    if existing != index {
                        tracing::warn!(
                            form = %form,
                            kept = %normalized[existing].0,
                            ignored = %canonical,
                            "synonym form listed under several skills; first one wins"
                        );
                    }
                    continue;
                }
                lookup.insert(form.clone(), index);
            }
        }

        Ok(Self {
            entries: normalized,
            lookup,
        })
    }

    pub fn canonical_for(&self, token: &str) -> Option<&str> {
        let token = token.trim().to_lowercase();
        self.lookup
            .get(&token)
            .map(|&index| self.entries[index].0.as_str())
    }

    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|(canonical, forms)| {
            std::iter::once(canonical.as_str()).chain(forms.iter().map(String::as_str))
        })
    }
}

#[derive(Debug, Clone)]
pub struct SkillCatalog {
    vocabulary: HashSet<String>,
    max_phrase_words: usize,
    synonyms: SynonymTable,
    database_terms: BTreeSet<String>,
}

impl SkillCatalog {
    pub fn builtin() -> Self {
        // The embedded tables are covered by tests, so this cannot fail.
        Self::from_catalog_file(CatalogFile::builtin())
            .unwrap_or_else(|err| panic!("built-in skill catalog is invalid: {err}"))
    }

    pub fn from_catalog_file(file: CatalogFile) -> Result<Self, CoreError> {
        let synonyms = SynonymTable::new(file.synonyms)?;

        let mut vocabulary = file
            .skills
            .iter()
            .map(|skill| normalize_entry(skill))
            .collect::<Result<HashSet<_>, _>>()?;
        vocabulary.extend(synonyms.surface_forms().map(str::to_string));

        let database_terms = file
            .database_terms
            .iter()
            .map(|term| normalize_entry(term))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let max_phrase_words = vocabulary
            .iter()
            .map(|skill| skill.split_whitespace().count())
            .max()
            .unwrap_or(1);

        Ok(Self {
            vocabulary,
            max_phrase_words,
            synonyms,
            database_terms,
        })
    }

    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read skill catalog {}", path.display()))?;

        let parsed = serde_json::from_str::<CatalogFile>(&content)
            .with_context(|| format!("invalid JSON in skill catalog {}", path.display()))?;

        Ok(Self::from_catalog_file(parsed)?)
    }

    pub fn is_known_skill(&self, token: &str) -> bool {
        self.vocabulary.contains(token)
    }

    pub fn max_phrase_words(&self) -> usize {
        self.max_phrase_words
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn is_database_term(&self, term: &str) -> bool {
        self.database_terms.contains(term)
    }
}

fn normalize_entry(value: &str) -> Result<String, CoreError> {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if normalized.is_empty() {
        return Err(CoreError::InvalidCatalog(
            "catalog entries must not be empty".to_string(),
        ));
    }
    Ok(normalized)
}
