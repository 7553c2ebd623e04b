//! Unified history across every generated artifact type

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Summary,
    Script,
    Rehearsal,
    Qa,
    Ppt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub kind: HistoryKind,
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&crate::rehearsal::RehearsalResult> for HistoryItem {
    fn from(result: &crate::rehearsal::RehearsalResult) -> Self {
        Self {
            kind: HistoryKind::Rehearsal,
            id: result.id.clone(),
            title: result.title.clone(),
            created_at: result.created_at,
        }
    }
}

/// Kind selector for the history list; `all` admits every kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Summary,
    Script,
    Rehearsal,
    Qa,
    Ppt,
}

impl KindFilter {
    pub fn admits(self, kind: HistoryKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Summary => kind == HistoryKind::Summary,
            KindFilter::Script => kind == HistoryKind::Script,
            KindFilter::Rehearsal => kind == HistoryKind::Rehearsal,
            KindFilter::Qa => kind == HistoryKind::Qa,
            KindFilter::Ppt => kind == HistoryKind::Ppt,
        }
    }
}

impl From<HistoryKind> for KindFilter {
    fn from(kind: HistoryKind) -> Self {
        match kind {
            HistoryKind::Summary => KindFilter::Summary,
            HistoryKind::Script => KindFilter::Script,
            HistoryKind::Rehearsal => KindFilter::Rehearsal,
            HistoryKind::Qa => KindFilter::Qa,
            HistoryKind::Ppt => KindFilter::Ppt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Name,
}

/// Filter and ordering applied to the history list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryQuery {
    pub kind: KindFilter,
    /// Case-insensitive title substring
    pub search: String,
    pub date: DateRange,
    pub sort: SortOrder,
}

impl HistoryQuery {
    pub fn matches(&self, item: &HistoryItem, now: DateTime<Utc>) -> bool {
        let kind_ok = self.kind.admits(item.kind);
        let search_ok = self.search.is_empty()
            || item.title.to_lowercase().contains(&self.search.to_lowercase());

        kind_ok && search_ok && self.in_range(item.created_at, now)
    }

    fn in_range(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.date {
            DateRange::All => true,
            DateRange::Today => at.date_naive() == now.date_naive(),
            DateRange::Week => at >= now - Duration::days(7),
            DateRange::Month => at >= now - Duration::days(30),
        }
    }

    /// Filter, then sort
    pub fn apply(&self, items: &[HistoryItem], now: DateTime<Utc>) -> Vec<HistoryItem> {
        let mut out: Vec<HistoryItem> = items
            .iter()
            .filter(|item| self.matches(item, now))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Name => out.sort_by_cached_key(|item| item.title.to_lowercase()),
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 15, 0, 0).unwrap()
    }

    fn item(kind: HistoryKind, title: &str, days_ago: i64) -> HistoryItem {
        HistoryItem {
            kind,
            id: title.to_lowercase(),
            title: title.to_string(),
            created_at: now() - Duration::days(days_ago),
        }
    }

    fn items() -> Vec<HistoryItem> {
        vec![
            item(HistoryKind::Summary, "Market research", 0),
            item(HistoryKind::Script, "Demo script", 3),
            item(HistoryKind::Rehearsal, "Demo rehearsal", 10),
            item(HistoryKind::Qa, "Board Q&A", 45),
        ]
    }

    fn titles(items: &[HistoryItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_newest_first() {
        let out = HistoryQuery::default().apply(&items(), now());
        assert_eq!(
            titles(&out),
            vec!["Market research", "Demo script", "Demo rehearsal", "Board Q&A"]
        );
    }

    #[test]
    fn search_is_case_insensitive() {
        let query = HistoryQuery {
            search: "DEMO".into(),
            sort: SortOrder::Oldest,
            ..HistoryQuery::default()
        };
        assert_eq!(titles(&query.apply(&items(), now())), vec!["Demo rehearsal", "Demo script"]);
    }

    #[test]
    fn kind_and_date_filters_combine() {
        let week = HistoryQuery {
            date: DateRange::Week,
            ..HistoryQuery::default()
        };
        assert_eq!(week.apply(&items(), now()).len(), 2);

        let month_rehearsals = HistoryQuery {
            kind: KindFilter::Rehearsal,
            date: DateRange::Month,
            ..HistoryQuery::default()
        };
        assert_eq!(titles(&month_rehearsals.apply(&items(), now())), vec!["Demo rehearsal"]);

        let today = HistoryQuery {
            date: DateRange::Today,
            ..HistoryQuery::default()
        };
        assert_eq!(titles(&today.apply(&items(), now())), vec!["Market research"]);
    }

    #[test]
    fn name_sort() {
        let query = HistoryQuery {
            sort: SortOrder::Name,
            ..HistoryQuery::default()
        };
        assert_eq!(
            titles(&query.apply(&items(), now())),
            vec!["Board Q&A", "Demo rehearsal", "Demo script", "Market research"]
        );
    }

    #[test]
    fn name_sort_ignores_case() {
        let query = HistoryQuery {
            sort: SortOrder::Name,
            ..HistoryQuery::default()
        };
        let mixed = vec![
            item(HistoryKind::Summary, "Banana pitch", 1),
            item(HistoryKind::Script, "apple talk", 2),
            item(HistoryKind::Ppt, "Cherry deck", 3),
        ];
        assert_eq!(
            titles(&query.apply(&mixed, now())),
            vec!["apple talk", "Banana pitch", "Cherry deck"]
        );
    }

    #[test]
    fn query_accepts_all_kinds_on_the_wire() {
        let query: HistoryQuery = serde_json::from_str(r#"{"kind":"all","sort":"name"}"#).unwrap();
        assert_eq!(query.kind, KindFilter::All);
        assert_eq!(query.apply(&items(), now()).len(), 4);

        let query: HistoryQuery = serde_json::from_str(r#"{"kind":"qa"}"#).unwrap();
        assert_eq!(titles(&query.apply(&items(), now())), vec!["Board Q&A"]);

        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.kind, KindFilter::All);
    }

    #[test]
    fn kind_filter_from_kind() {
        assert!(KindFilter::from(HistoryKind::Ppt).admits(HistoryKind::Ppt));
        assert!(!KindFilter::from(HistoryKind::Ppt).admits(HistoryKind::Qa));
    }
}
