//! In-memory table set and the matching algorithms that run over it.
//!
//! A [`Lexicon`] is immutable once built. The analyzer swaps whole
//! lexicons; it never edits one in place.

use std::collections::HashMap;

use lexis_protocol::{Morpheme, MorphemeKind, MorphemeTables, PosSet, WordAnalysis};

use crate::lemmatize::apply_suffix_rules;
use crate::pos::pos_for_suffix;

/// Shortest root an affix may leave behind, in characters.
pub const MIN_REMAINDER: usize = 3;

pub const DEFAULT_ROOT_GLOSS: &str = "word root";
pub const IRREGULAR_VERB_GLOSS: &str = "verb root (irregular)";
pub const IRREGULAR_PLURAL_GLOSS: &str = "noun root (irregular plural)";

/// Ordered `surface -> value` table with a hash index.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    /// Entry indices, longest surface first; equal lengths keep table order.
    by_length: Vec<usize>,
}

/// An affix found on a word, borrowing from the table and the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffixMatch<'t, 'w> {
    pub affix: &'t str,
    pub gloss: &'t str,
    pub remaining: &'w str,
}

impl LookupTable {
    /// A repeated surface form keeps its first position and its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (surface, value) in pairs {
            let surface = surface.into();
            let value = value.into();
            match index.get(&surface) {
                Some(&i) => entries[i].1 = value,
                None => {
                    index.insert(surface.clone(), entries.len());
                    entries.push((surface, value));
                }
            }
        }

        let mut by_length: Vec<usize> = (0..entries.len()).collect();
        by_length.sort_by(|&a, &b| {
            let a = entries[a].0.chars().count();
            let b = entries[b].0.chars().count();
            b.cmp(&a)
        });

        Self {
            entries,
            index,
            by_length,
        }
    }

    pub fn get(&self, surface: &str) -> Option<&str> {
        self.index.get(surface).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn longest_first(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_length.iter().map(|&i| {
            let (surface, value) = &self.entries[i];
            (surface.as_str(), value.as_str())
        })
    }

    /// Longest entry that starts `word` and leaves at least [`MIN_REMAINDER`]
    /// characters. A longer entry failing the guard does not hide a shorter one.
    pub fn longest_prefix_of<'t, 'w>(&'t self, word: &'w str) -> Option<AffixMatch<'t, 'w>> {
        self.longest_first().find_map(|(affix, gloss)| {
            let remaining = word.strip_prefix(affix)?;
            (remaining.chars().count() >= MIN_REMAINDER).then_some(AffixMatch {
                affix,
                gloss,
                remaining,
            })
        })
    }

    /// Suffix counterpart of [`LookupTable::longest_prefix_of`].
    pub fn longest_suffix_of<'t, 'w>(&'t self, word: &'w str) -> Option<AffixMatch<'t, 'w>> {
        self.longest_first().find_map(|(affix, gloss)| {
            let remaining = word.strip_suffix(affix)?;
            (remaining.chars().count() >= MIN_REMAINDER).then_some(AffixMatch {
                affix,
                gloss,
                remaining,
            })
        })
    }

    fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    version: u32,
    pub prefixes: LookupTable,
    pub suffixes: LookupTable,
    pub roots: LookupTable,
    pub irregular_verbs: LookupTable,
    pub irregular_plurals: LookupTable,
}

impl Lexicon {
    pub fn from_tables(tables: &MorphemeTables) -> Self {
        let table = |pairs: &[(String, String)]| LookupTable::from_pairs(pairs.iter().cloned());

        Self {
            version: tables.version,
            prefixes: table(&tables.prefixes),
            suffixes: table(&tables.suffixes),
            roots: table(&tables.roots),
            irregular_verbs: table(&tables.irregular_verbs),
            irregular_plurals: table(&tables.irregular_plurals),
        }
    }

    /// Replaces the affix and root tables, keeping the irregular forms.
    pub fn with_affixes(&self, prefixes: LookupTable, suffixes: LookupTable, roots: LookupTable) -> Self {
        Self {
            version: self.version,
            prefixes,
            suffixes,
            roots,
            irregular_verbs: self.irregular_verbs.clone(),
            irregular_plurals: self.irregular_plurals.clone(),
        }
    }

    pub fn to_tables(&self) -> MorphemeTables {
        MorphemeTables {
            version: self.version,
            prefixes: self.prefixes.to_pairs(),
            suffixes: self.suffixes.to_pairs(),
            roots: self.roots.to_pairs(),
            irregular_verbs: self.irregular_verbs.to_pairs(),
            irregular_plurals: self.irregular_plurals.to_pairs(),
        }
    }

    pub fn table(&self, kind: MorphemeKind) -> &LookupTable {
        match kind {
            MorphemeKind::Prefix => &self.prefixes,
            MorphemeKind::Root => &self.roots,
            MorphemeKind::Suffix => &self.suffixes,
        }
    }

    fn irregular(&self, word_lower: &str) -> Option<(&str, PosSet, &'static str)> {
        if let Some(base) = self.irregular_verbs.get(word_lower) {
            return Some((base, PosSet::VERB, IRREGULAR_VERB_GLOSS));
        }
        self.irregular_plurals
            .get(word_lower)
            .map(|base| (base, PosSet::NOUN, IRREGULAR_PLURAL_GLOSS))
    }

    pub fn lemmatize(&self, word: &str) -> String {
        let word_lower = word.to_lowercase();
        if let Some(base) = self.irregular_verbs.get(&word_lower) {
            return base.to_string();
        }
        if let Some(base) = self.irregular_plurals.get(&word_lower) {
            return base.to_string();
        }
        apply_suffix_rules(&word_lower)
    }

    pub fn analyze(&self, word: &str) -> WordAnalysis {
        let word_lower = word.to_lowercase();

        // Irregular forms are terminal: no affix stripping.
        if let Some((base, pos, gloss)) = self.irregular(&word_lower) {
            return WordAnalysis {
                original: word.to_string(),
                lemma: base.to_string(),
                prefix: None,
                root: Some(base.to_string()),
                suffix: None,
                morphemes: vec![Morpheme::new(MorphemeKind::Root, base, gloss)],
                possible_pos: pos,
            };
        }

        let mut morphemes = Vec::with_capacity(3);

        let prefix = self.prefixes.longest_prefix_of(&word_lower);
        let remaining = prefix.map_or(word_lower.as_str(), |m| m.remaining);
        if let Some(m) = prefix {
            morphemes.push(Morpheme::new(MorphemeKind::Prefix, m.affix, m.gloss));
        }

        let suffix = self.suffixes.longest_suffix_of(remaining);
        let root = suffix.map_or(remaining, |m| m.remaining);

        if !root.is_empty() {
            let gloss = self.roots.get(root).unwrap_or(DEFAULT_ROOT_GLOSS);
            morphemes.push(Morpheme::new(MorphemeKind::Root, root, gloss));
        }
        if let Some(m) = suffix {
            morphemes.push(Morpheme::new(MorphemeKind::Suffix, m.affix, m.gloss));
        }

        WordAnalysis {
            original: word.to_string(),
            lemma: self.lemmatize(&word_lower),
            prefix: prefix.map(|m| m.affix.to_string()),
            root: (!root.is_empty()).then(|| root.to_string()),
            suffix: suffix.map(|m| m.affix.to_string()),
            morphemes,
            possible_pos: suffix.map_or(PosSet::empty(), |m| pos_for_suffix(m.affix)),
        }
    }
}
