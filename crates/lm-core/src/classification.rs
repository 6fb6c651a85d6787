//! Business classification derivation from legacy flag columns.
//!
//! The legacy business table carries ~150 boolean flag columns whose names
//! encode program membership (`GrownChile`, `TasteSalsa`, `AssociateOnline`,
//! ...). The rule set is a static declarative table mapping flag-name
//! patterns to classification buckets, so the rules are testable on their
//! own rather than re-derived ad hoc per row.

use serde::{Deserialize, Serialize};

/// Top-level program classification for a business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Grown,
    Taste,
    Associate,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Grown => "grown",
            Classification::Taste => "taste",
            Classification::Associate => "associate",
        }
    }
}

/// Associate membership sub-type, only meaningful when `associate` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociateType {
    InPerson,
    Online,
    Restaurant,
    Tourism,
    Artisan,
    Pet,
    Educational,
    NonProfit,
    Other,
}

impl AssociateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociateType::InPerson => "in_person",
            AssociateType::Online => "online",
            AssociateType::Restaurant => "restaurant",
            AssociateType::Tourism => "tourism",
            AssociateType::Artisan => "artisan",
            AssociateType::Pet => "pet",
            AssociateType::Educational => "educational",
            AssociateType::NonProfit => "non_profit",
            AssociateType::Other => "other",
        }
    }
}

/// How a rule matches a legacy flag column name
#[derive(Debug, Clone, Copy)]
enum FlagMatcher {
    Prefix(&'static str),
    Exact(&'static str),
}

impl FlagMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            FlagMatcher::Prefix(p) => name.starts_with(p),
            FlagMatcher::Exact(e) => name == *e,
        }
    }
}

/// One classification rule: flag-name pattern → bucket
struct FlagRule {
    matcher: FlagMatcher,
    bucket: Classification,
}

/// The full rule table, checked in order; first match per rule is additive
/// (a flag can feed several buckets only if several rules match it, which
/// the legacy naming scheme never produces).
static FLAG_RULES: &[FlagRule] = &[
    FlagRule {
        matcher: FlagMatcher::Prefix("Grown"),
        bucket: Classification::Grown,
    },
    FlagRule {
        matcher: FlagMatcher::Exact("ClassGrown"),
        bucket: Classification::Grown,
    },
    FlagRule {
        matcher: FlagMatcher::Prefix("Taste"),
        bucket: Classification::Taste,
    },
    FlagRule {
        matcher: FlagMatcher::Exact("ClassTaste"),
        bucket: Classification::Taste,
    },
    FlagRule {
        matcher: FlagMatcher::Prefix("Associate"),
        bucket: Classification::Associate,
    },
    FlagRule {
        matcher: FlagMatcher::Prefix("SalesType"),
        bucket: Classification::Associate,
    },
    FlagRule {
        matcher: FlagMatcher::Prefix("CurrentExports"),
        bucket: Classification::Associate,
    },
    FlagRule {
        matcher: FlagMatcher::Prefix("InterestExports"),
        bucket: Classification::Associate,
    },
    FlagRule {
        matcher: FlagMatcher::Exact("ClassAssociate"),
        bucket: Classification::Associate,
    },
    FlagRule {
        matcher: FlagMatcher::Exact("InterestInternationalTrade"),
        bucket: Classification::Associate,
    },
];

/// Associate sub-type rules: flag column plus a minimum grown/taste count.
///
/// `other` is not in this table; it is the catch-all applied when
/// `ClassAssociate` is on and no specific sub-type matched.
static ASSOCIATE_RULES: &[(&str, AssociateType, usize)] = &[
    ("AssociateInPerson", AssociateType::InPerson, 3),
    ("AssociateOnline", AssociateType::Online, 0),
    ("AssociateRestaurant", AssociateType::Restaurant, 1),
    ("AssociateTourism", AssociateType::Tourism, 0),
    ("AssociateArtisan", AssociateType::Artisan, 0),
    ("AssociatePet", AssociateType::Pet, 0),
    ("AssociateEducational", AssociateType::Educational, 0),
    ("AssociateNonProfit", AssociateType::NonProfit, 0),
];

/// Derived classification for one business row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedClasses {
    pub classifications: Vec<Classification>,
    pub associate_types: Vec<AssociateType>,
}

impl DerivedClasses {
    pub fn has(&self, c: Classification) -> bool {
        self.classifications.contains(&c)
    }
}

/// Derive classifications and associate sub-types from flag columns.
///
/// `flags` is the ordered `(column_name, on)` view of a business row where
/// `on` means the legacy value was exactly integer 1.
pub fn derive_classification<'a, I>(flags: I) -> DerivedClasses
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    let mut derived = DerivedClasses::default();
    let mut grown_taste_count = 0usize;
    let mut class_associate_on = false;
    let mut on_flags: Vec<&str> = Vec::new();

    for (name, on) in flags {
        if !on {
            continue;
        }
        on_flags.push(name);

        if name == "ClassAssociate" {
            class_associate_on = true;
        }
        // ClassGrown/ClassTaste feed the buckets but not the count
        if name.starts_with("Grown") || name.starts_with("Taste") {
            grown_taste_count += 1;
        }

        for rule in FLAG_RULES {
            if rule.matcher.matches(name) && !derived.classifications.contains(&rule.bucket) {
                derived.classifications.push(rule.bucket);
            }
        }
    }

    if !derived.has(Classification::Associate) {
        return derived;
    }

    for (flag, assoc, min_count) in ASSOCIATE_RULES {
        if on_flags.contains(flag) && grown_taste_count >= *min_count {
            derived.associate_types.push(*assoc);
        }
    }

    // Catch-all: an explicit associate with no specific sub-type
    if class_associate_on && derived.associate_types.is_empty() {
        derived.associate_types.push(AssociateType::Other);
    }

    derived
}

#[cfg(test)]
#[path = "classification_test.rs"]
mod tests;
