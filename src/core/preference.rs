use serde::{Deserialize, Serialize};

/// One rank position in a preference list.
///
/// A tier is either a lone entry or a group of entries that are ranked equally.
/// In JSON a single entry is a plain string and a group is an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tier {
    Single(String),
    Group(Vec<String>),
}

impl Tier {
    /// Check whether `name` sits at this tier
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Single(entry) => entry == name,
            Self::Group(entries) => entries.iter().any(|e| e == name),
        }
    }

    /// Entries of this tier, in input order
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(entry) => std::slice::from_ref(entry),
            Self::Group(entries) => entries,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for Tier {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<Vec<&str>> for Tier {
    fn from(names: Vec<&str>) -> Self {
        Self::Group(names.into_iter().map(str::to_string).collect())
    }
}

/// An ordered list of tiers. Lower tier index means more preferred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(pub Vec<Tier>);

impl Preferences {
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self(tiers)
    }

    /// Build tiers from a `name -> rank` mapping, e.g. a unit's ranking form.
    ///
    /// Equal rank values become one tie group; tiers are ordered by ascending rank
    /// and names within a tier keep their input order.
    pub fn from_ranks<'a, I>(ranks: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut buckets: Vec<(u32, Vec<String>)> = Vec::new();
        for (name, rank) in ranks {
            match buckets.iter_mut().find(|(r, _)| *r == rank) {
                Some((_, names)) => names.push(name.to_string()),
                None => buckets.push((rank, vec![name.to_string()])),
            }
        }
        buckets.sort_by_key(|(rank, _)| *rank);

        Self(
            buckets
                .into_iter()
                .map(|(_, mut names)| {
                    if names.len() == 1 {
                        Tier::Single(names.remove(0))
                    } else {
                        Tier::Group(names)
                    }
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.0.len()
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.0
    }

    /// Zero-based tier index of `name`, or [`tier_count`](Self::tier_count) when it
    /// is not ranked at all. The sentinel takes part in scoring like any other rank.
    #[must_use]
    pub fn rank(&self, name: &str) -> usize {
        self.0
            .iter()
            .position(|tier| tier.contains(name))
            .unwrap_or(self.0.len())
    }

    /// Concatenate tiers in tier order, keeping within-tier order as given
    #[must_use]
    pub fn flatten(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(Tier::entries)
            .map(str::to_string)
            .collect()
    }
}

impl From<Vec<Tier>> for Preferences {
    fn from(tiers: Vec<Tier>) -> Self {
        Self(tiers)
    }
}

/// English ordinal for a zero-based rank: 0 -> "1st", 1 -> "2nd", 10 -> "11th".
#[must_use]
pub fn ordinal(rank: usize) -> String {
    let n = rank + 1;
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}
