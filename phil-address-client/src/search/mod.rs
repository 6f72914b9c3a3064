pub mod fuzzy;

use crate::records::{Barangay, City, Level, Province, Record, Region};
use crate::PhilAddressClient;
use getset::CopyGetters;
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Which levels to search and how many results to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    include_regions: bool,
    include_provinces: bool,
    include_cities: bool,
    /// Accepted for compatibility; barangays are not traversed.
    include_barangays: bool,
    limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_regions: true,
            include_provinces: true,
            include_cities: true,
            include_barangays: false,
            limit: 10,
        }
    }
}

impl SearchOptions {
    pub fn new(
        include_regions: bool,
        include_provinces: bool,
        include_cities: bool,
        include_barangays: bool,
        limit: usize,
    ) -> Self {
        Self {
            include_regions,
            include_provinces,
            include_cities,
            include_barangays,
            limit,
        }
    }

    pub fn with_regions(mut self, include: bool) -> Self {
        self.include_regions = include;
        self
    }

    pub fn with_provinces(mut self, include: bool) -> Self {
        self.include_provinces = include;
        self
    }

    pub fn with_cities(mut self, include: bool) -> Self {
        self.include_cities = include;
        self
    }

    pub fn with_barangays(mut self, include: bool) -> Self {
        self.include_barangays = include;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A matched record, tagged with its level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Place {
    Region(Region),
    Province(Province),
    City(City),
    Barangay(Barangay),
}

impl Place {
    pub fn level(&self) -> Level {
        match self {
            Place::Region(_) => Level::Region,
            Place::Province(_) => Level::Province,
            Place::City(_) => Level::City,
            Place::Barangay(_) => Level::Barangay,
        }
    }

    pub fn code(&self) -> Cow<'_, str> {
        match self {
            Place::Region(r) => r.code(),
            Place::Province(p) => p.code(),
            Place::City(c) => c.code(),
            Place::Barangay(b) => b.code(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Place::Region(r) => r.name(),
            Place::Province(p) => p.name(),
            Place::City(c) => c.name(),
            Place::Barangay(b) => b.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub place: Place,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_name: Option<String>,
    /// Set by `fuzzy_search` only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl SearchResult {
    fn new(place: Place, region_name: Option<&str>, province_name: Option<&str>) -> Self {
        Self {
            place,
            region_name: region_name.map(str::to_string),
            province_name: province_name.map(str::to_string),
            score: None,
        }
    }

    pub fn level(&self) -> Level {
        self.place.level()
    }

    pub fn name(&self) -> &str {
        self.place.name()
    }
}

fn name_matches<T: Record>(record: &T, needle: &str) -> bool {
    record.name().to_lowercase().contains(needle)
}

impl PhilAddressClient {
    /// Case-insensitive substring search over region, province and city names.
    ///
    /// Regions come first, then provinces and cities in the order the regions
    /// are listed. Loading stops once `limit` results are collected; the batch
    /// that crosses the limit is kept whole and the list is truncated at the end.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let needle = query.trim().to_lowercase();
        let limit = options.limit();
        if needle.is_empty() || limit == 0 {
            return vec![];
        }

        if options.include_barangays() {
            debug!("Barangay-level search requested for '{}'; barangays are not traversed", needle);
        }
        if !(options.include_regions() || options.include_provinces() || options.include_cities()) {
            return vec![];
        }

        let mut results = Vec::new();
        let regions = self.load_regions().await;

        if options.include_regions() {
            results.extend(
                regions
                    .data()
                    .iter()
                    .filter(|region| name_matches(*region, &needle))
                    .map(|region| SearchResult::new(Place::Region(region.clone()), None, None)),
            );
        }

        if (options.include_provinces() || options.include_cities()) && results.len() < limit {
            'regions: for region in regions.data() {
                if results.len() >= limit {
                    break;
                }
                let provinces = self.load_provinces(&region.code()).await;

                if options.include_provinces() {
                    results.extend(
                        provinces
                            .data()
                            .iter()
                            .filter(|province| name_matches(*province, &needle))
                            .map(|province| {
                                SearchResult::new(
                                    Place::Province(province.clone()),
                                    Some(region.name()),
                                    None,
                                )
                            }),
                    );
                }

                if options.include_cities() {
                    for province in provinces.data() {
                        if results.len() >= limit {
                            break 'regions;
                        }
                        let cities = self.load_cities(&province.code()).await;
                        results.extend(
                            cities
                                .data()
                                .iter()
                                .filter(|city| name_matches(*city, &needle))
                                .map(|city| {
                                    SearchResult::new(
                                        Place::City(city.clone()),
                                        Some(region.name()),
                                        Some(province.name()),
                                    )
                                }),
                        );
                    }
                }
            }
        }

        results.truncate(limit);
        results
    }

    /// [`search`](Self::search), scored against the query and sorted best first.
    /// Equal scores keep their search order.
    pub async fn fuzzy_search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let needle = query.trim();
        let mut results = self.search(query, options).await;
        for result in &mut results {
            result.score = Some(fuzzy::score(needle, result.name()));
        }
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }
}
