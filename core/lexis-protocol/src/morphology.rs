use core::fmt;
use core::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

/// Position of a morpheme inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum MorphemeKind {
    Prefix = 0,
    Root = 1,
    Suffix = 2,
}

impl MorphemeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MorphemeKind::Prefix => "prefix",
            MorphemeKind::Root => "root",
            MorphemeKind::Suffix => "suffix",
        }
    }
}

impl fmt::Display for MorphemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a morpheme kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMorphemeKind;

impl fmt::Display for UnknownMorphemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of: prefix, root, suffix")
    }
}

impl FromStr for MorphemeKind {
    type Err = UnknownMorphemeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(MorphemeKind::Prefix),
            "root" => Ok(MorphemeKind::Root),
            "suffix" => Ok(MorphemeKind::Suffix),
            _ => Err(UnknownMorphemeKind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum PartOfSpeech {
    Noun = 0,
    Verb = 1,
    Adjective = 2,
    Adverb = 3,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 4] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
        }
    }

    const fn flag(self) -> PosSet {
        match self {
            PartOfSpeech::Noun => PosSet::NOUN,
            PartOfSpeech::Verb => PosSet::VERB,
            PartOfSpeech::Adjective => PosSet::ADJECTIVE,
            PartOfSpeech::Adverb => PosSet::ADVERB,
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Candidate parts of speech for a word. Empty when nothing is known.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct PosSet: u8 {
        const NOUN = 1;
        const VERB = 2;
        const ADJECTIVE = 4;
        const ADVERB = 8;
    }
}

impl PosSet {
    pub fn contains_pos(&self, pos: PartOfSpeech) -> bool {
        self.contains(pos.flag())
    }

    /// Members in tag order (noun, verb, adjective, adverb).
    pub fn parts(&self) -> impl Iterator<Item = PartOfSpeech> + '_ {
        PartOfSpeech::ALL
            .into_iter()
            .filter(move |pos| self.contains(pos.flag()))
    }

    pub fn len(&self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl From<PartOfSpeech> for PosSet {
    fn from(pos: PartOfSpeech) -> Self {
        pos.flag()
    }
}

impl FromIterator<PartOfSpeech> for PosSet {
    fn from_iter<I: IntoIterator<Item = PartOfSpeech>>(iter: I) -> Self {
        iter.into_iter()
            .fold(PosSet::empty(), |set, pos| set | pos.flag())
    }
}

// Serialized as a list of tag names rather than the bitflags text form.
#[cfg(feature = "serde")]
impl serde::Serialize for PosSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for pos in self.parts() {
            seq.serialize_element(&pos)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PosSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = <alloc::vec::Vec<PartOfSpeech> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(parts.into_iter().collect())
    }
}
