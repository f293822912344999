//! Static code→category lookups applied per record.
//!
//! Channel groups, fallout buckets, provisioning-duration bands, sales-force
//! classes and greenfield/brownfield tagging all live here so the mappings can
//! be tested without a database.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelGroup {
    Grapari,
    Digital,
    Community,
    Agency,
    Other,
}

const CHANNEL_CODES: &[(&str, ChannelGroup)] = &[
    ("k3", ChannelGroup::Grapari),
    ("k4", ChannelGroup::Grapari),
    ("b0", ChannelGroup::Digital),
    ("i1", ChannelGroup::Community),
    ("a0", ChannelGroup::Community),
    ("s3", ChannelGroup::Community),
    ("b3", ChannelGroup::Community),
    ("u2", ChannelGroup::Community),
    ("ab", ChannelGroup::Community),
    ("i4", ChannelGroup::Agency),
];

impl ChannelGroup {
    /// Groups that appear in reports. `Other` is tallied but never shown.
    pub fn reported() -> &'static [ChannelGroup] {
        &[Self::Grapari, Self::Digital, Self::Community, Self::Agency]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grapari => "GRAPARI",
            Self::Digital => "DIGITAL",
            Self::Community => "COMMUNITY",
            Self::Agency => "AGENCY",
            Self::Other => "OTHER",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Grapari => 0,
            Self::Digital => 1,
            Self::Community => 2,
            Self::Agency => 3,
            Self::Other => 4,
        }
    }
}

pub fn channel_group(code: &str) -> ChannelGroup {
    let code = code.trim();
    CHANNEL_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, group)| *group)
        .unwrap_or(ChannelGroup::Other)
}

/// Per-group accumulator indexed by [`ChannelGroup`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelSplit<T> {
    values: [T; 5],
}

impl<T: Copy + Default + std::ops::AddAssign> ChannelSplit<T> {
    pub fn add(&mut self, group: ChannelGroup, value: T) {
        self.values[group.index()] += value;
    }

    pub fn get(&self, group: ChannelGroup) -> T {
        self.values[group.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FalloutCategory {
    #[serde(rename = "KENDALA PELANGGAN")]
    Customer,
    #[serde(rename = "KENDALA TEKNIK")]
    Technical,
    #[serde(rename = "KENDALA SISTEM")]
    System,
    #[serde(rename = "OTHERS")]
    Others,
}

impl FalloutCategory {
    pub fn all() -> &'static [FalloutCategory] {
        &[Self::Customer, Self::Technical, Self::System, Self::Others]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "KENDALA PELANGGAN",
            Self::Technical => "KENDALA TEKNIK",
            Self::System => "KENDALA SISTEM",
            Self::Others => "OTHERS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }

    /// Subcategories reported under this category, in display order.
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Self::Customer => &[
                "INDIKASI CABUT PASANG",
                "RNA",
                "PENDING PELANGGAN",
                "BATAL",
                "ALAMAT TIDAK DITEMUKAN",
                "RUMAH KOSONG",
                "DOUBLE INPUT",
            ],
            Self::Technical => &[
                "ODP FULL",
                "TIANG",
                "ODP JAUH",
                "JALUR/RUTE",
                "ODP RUSAK",
                "CROSS JALAN",
                "BELUM ADA ODP",
            ],
            Self::System => &[
                "GAGAL AKTIVASI",
                "SALAH TAGGING",
                "FALLOUT DATA",
                "UIM",
            ],
            Self::Others => &[],
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Customer => 0,
            Self::Technical => 1,
            Self::System => 2,
            Self::Others => 3,
        }
    }
}

/// Category and, if enumerated, the canonical subcategory of a fallout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FalloutBucket {
    pub category: FalloutCategory,
    pub subcategory: Option<&'static str>,
}

/// Classify a fallout. `None` when the category itself is not recognised.
pub fn fallout_bucket(category: Option<&str>, subcategory: Option<&str>) -> Option<FalloutBucket> {
    let category = FalloutCategory::parse(category?)?;
    let subcategory = subcategory.and_then(|sub| {
        let sub = sub.trim();
        category
            .subcategories()
            .iter()
            .copied()
            .find(|known| known.eq_ignore_ascii_case(sub))
    });
    Some(FalloutBucket {
        category,
        subcategory,
    })
}

/// Fallout counts for one node: category totals plus enumerated subcategories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FalloutTally {
    pub total: i64,
    categories: [i64; 4],
    subcategories: [Vec<i64>; 4],
}

impl FalloutTally {
    pub fn add(&mut self, bucket: Option<FalloutBucket>) {
        self.total += 1;
        let Some(bucket) = bucket else {
            return;
        };
        let idx = bucket.category.index();
        self.categories[idx] += 1;
        if let Some(sub) = bucket.subcategory {
            let names = bucket.category.subcategories();
            if let Some(pos) = names.iter().position(|n| *n == sub) {
                let counts = &mut self.subcategories[idx];
                if counts.len() < names.len() {
                    counts.resize(names.len(), 0);
                }
                counts[pos] += 1;
            }
        }
    }

    pub fn category(&self, category: FalloutCategory) -> i64 {
        self.categories[category.index()]
    }

    pub fn subcategory(&self, category: FalloutCategory, name: &str) -> i64 {
        let names = category.subcategories();
        names
            .iter()
            .position(|n| *n == name)
            .and_then(|pos| self.subcategories[category.index()].get(pos).copied())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DurationBucket {
    #[serde(rename = "0-3 days")]
    UpTo3,
    #[serde(rename = "4-7 days")]
    UpTo7,
    #[serde(rename = "8-14 days")]
    UpTo14,
    #[serde(rename = "15-30 days")]
    UpTo30,
    #[serde(rename = ">30 days")]
    Over30,
}

impl DurationBucket {
    pub fn all() -> &'static [DurationBucket] {
        &[
            Self::UpTo3,
            Self::UpTo7,
            Self::UpTo14,
            Self::UpTo30,
            Self::Over30,
        ]
    }

    fn index(&self) -> usize {
        match self {
            Self::UpTo3 => 0,
            Self::UpTo7 => 1,
            Self::UpTo14 => 2,
            Self::UpTo30 => 3,
            Self::Over30 => 4,
        }
    }
}

/// Band a provisioning duration in days. Bands are inclusive of whole days,
/// so 3.5 days is past the first band.
pub fn duration_bucket(days: Option<f64>) -> Option<DurationBucket> {
    let days = days?;
    if days.is_nan() {
        return None;
    }
    Some(if days <= 3.0 {
        DurationBucket::UpTo3
    } else if days <= 7.0 {
        DurationBucket::UpTo7
    } else if days <= 14.0 {
        DurationBucket::UpTo14
    } else if days <= 30.0 {
        DurationBucket::UpTo30
    } else {
        DurationBucket::Over30
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationTally {
    counts: [i64; 5],
}

impl DurationTally {
    pub fn add(&mut self, bucket: Option<DurationBucket>) {
        if let Some(bucket) = bucket {
            self.counts[bucket.index()] += 1;
        }
    }

    pub fn count(&self, bucket: DurationBucket) -> i64 {
        self.counts[bucket.index()]
    }

    /// Records with a non-null duration.
    pub fn known(&self) -> i64 {
        self.counts.iter().sum()
    }
}

/// Sales-force productivity class by month-to-date PS count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SfClass {
    Platinum,
    Gold,
    Silver,
    Bronze,
    NonProductive,
}

impl SfClass {
    pub fn all() -> &'static [SfClass] {
        &[
            Self::Platinum,
            Self::Gold,
            Self::Silver,
            Self::Bronze,
            Self::NonProductive,
        ]
    }

    pub fn from_ps(ps: i64) -> Self {
        match ps {
            p if p >= 20 => Self::Platinum,
            10..=19 => Self::Gold,
            5..=9 => Self::Silver,
            1..=4 => Self::Bronze,
            _ => Self::NonProductive,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Platinum => 0,
            Self::Gold => 1,
            Self::Silver => 2,
            Self::Bronze => 3,
            Self::NonProductive => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SfClassTally {
    counts: [i64; 5],
    pub ps: i64,
}

impl SfClassTally {
    pub fn add_agent(&mut self, ps: i64) {
        self.counts[SfClass::from_ps(ps).index()] += 1;
        self.ps += ps;
    }

    pub fn count(&self, class: SfClass) -> i64 {
        self.counts[class.index()]
    }

    pub fn agents(&self) -> i64 {
        self.counts.iter().sum()
    }

    pub fn productive(&self) -> i64 {
        self.agents() - self.count(SfClass::NonProductive)
    }
}

/// Installation-point program classification of a PS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldClass {
    Greenfield,
    Brownfield,
}

/// Greenfield when the ODP went live this year under this year's program tag,
/// brownfield for last year's, otherwise unclassified.
pub fn field_class(
    golive_date: Option<NaiveDate>,
    program_year: Option<i32>,
    reference_year: i32,
) -> Option<FieldClass> {
    let golive_year = golive_date?.year();
    let program_year = program_year?;
    if golive_year != program_year {
        return None;
    }
    if golive_year == reference_year {
        Some(FieldClass::Greenfield)
    } else if golive_year == reference_year - 1 {
        Some(FieldClass::Brownfield)
    } else {
        None
    }
}
