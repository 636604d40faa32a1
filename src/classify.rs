// This file contains the MIMAG-style quality classification of a genome from its completeness
// and contamination.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use std::fmt;

use crate::decimal::Decimal;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualityClass {
    NearComplete,
    HighQuality,
    MediumQuality,
    LowQuality,
}

impl QualityClass {
    pub const ALL: [QualityClass; 4] = [QualityClass::NearComplete, QualityClass::HighQuality,
                                        QualityClass::MediumQuality, QualityClass::LowQuality];

    pub fn name(&self) -> &'static str {
        match self {
            QualityClass::NearComplete  => "near-complete",
            QualityClass::HighQuality   => "high-quality",
            QualityClass::MediumQuality => "medium-quality",
            QualityClass::LowQuality    => "low-quality",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            QualityClass::NearComplete  => "near complete",
            QualityClass::HighQuality   => "high",
            QualityClass::MediumQuality => "medium",
            QualityClass::LowQuality    => "low",
        }
    }

    pub fn from_name(name: &str) -> Option<QualityClass> {
        QualityClass::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn is_medium_or_better(&self) -> bool {
        *self != QualityClass::LowQuality
    }
}

impl fmt::Display for QualityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub quality_class: QualityClass,
    pub qs: Decimal,
}


pub fn quality_score(completeness: Decimal, contamination: Decimal) -> Decimal {
    completeness - contamination * 5
}


pub fn classify(completeness: Decimal, contamination: Decimal) -> Classification {
    // Thresholds are inclusive and checked in order, so the first matching class wins. Inputs
    // outside 0-100 are not rejected: every pair of values gets a class.
    let at_least = |value: Decimal, threshold: i64| value >= Decimal::from(threshold);
    let at_most = |value: Decimal, threshold: i64| value <= Decimal::from(threshold);
    let quality_class = if at_least(completeness, 90) && at_most(contamination, 5) {
        QualityClass::NearComplete
    } else if at_least(completeness, 70) && at_most(contamination, 10) {
        QualityClass::HighQuality
    } else if at_least(completeness, 50) && at_most(contamination, 10) {
        QualityClass::MediumQuality
    } else {
        QualityClass::LowQuality
    };
    Classification { quality_class, qs: quality_score(completeness, contamination) }
}
