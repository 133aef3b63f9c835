//! Category routing.
//!
//! Each request category maps to the team that handles it and to the
//! expected handling duration in days. The table is data, not derived
//! logic: unknown categories miss silently with an empty team and the
//! default duration, and request creation proceeds regardless.

/// Handling duration in days for categories outside the table.
pub const DEFAULT_SLA_DAYS: i64 = 3;

// Built-in routes as (category, team, days).
const BUILTIN_ROUTES: &[(&str, &str, i64)] = &[
    ("المستندات والخطابات", "HRSS-Docs Team", 2),
    ("تحديث البيانات الشخصية", "HRSS-Personnel Team", 3),
    ("الحضور والانصراف", "HRSS-Attendance Team", 2),
    ("الدعم التقني", "IT Support", 1),
    ("إصدار واستبدال البطاقات", "Admin Services", 2),
    ("التأمين الطبي", "Benefits Team", 3),
    ("خدمات الموارد البشرية الأخرى", "HRSS-General", 3),
];

#[derive(Debug, Clone)]
struct Route {
    category: String,
    team: String,
    sla_days: i64,
}

/// Fixed mapping from request category to handling team and duration.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    /// Table with the built-in routes.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_ROUTES.iter().map(|(c, t, d)| (*c, *t, *d)))
    }

    /// Build a table from explicit `(category, team, days)` entries.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, i64)>,
    {
        Self {
            routes: entries
                .into_iter()
                .map(|(category, team, sla_days)| Route {
                    category: category.to_string(),
                    team: team.to_string(),
                    sla_days,
                })
                .collect(),
        }
    }

    /// Team handling `category`, or an empty string when the category is
    /// not routed.
    pub fn team_for(&self, category: &str) -> &str {
        self.routes
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.team.as_str())
            .unwrap_or("")
    }

    /// Expected handling duration for `category` in days.
    pub fn sla_days_for(&self, category: &str) -> i64 {
        self.routes
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.sla_days)
            .unwrap_or(DEFAULT_SLA_DAYS)
    }

    /// All routed categories in table order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.category.as_str())
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_route_to_their_team() {
        let table = RoutingTable::builtin();
        assert_eq!(table.team_for("الدعم التقني"), "IT Support");
        assert_eq!(table.sla_days_for("الدعم التقني"), 1);
        assert_eq!(table.team_for("التأمين الطبي"), "Benefits Team");
    }

    #[test]
    fn unknown_categories_miss_silently() {
        let table = RoutingTable::builtin();
        assert_eq!(table.team_for("unknown-category"), "");
        assert_eq!(table.sla_days_for("unknown-category"), DEFAULT_SLA_DAYS);
        assert_eq!(table.team_for(""), "");
    }

    #[test]
    fn explicit_entries_replace_the_builtin_table() {
        let table = RoutingTable::from_entries([("Facilities", "Site Ops", 5)]);
        assert_eq!(table.team_for("Facilities"), "Site Ops");
        assert_eq!(table.sla_days_for("Facilities"), 5);
        assert_eq!(table.team_for("الدعم التقني"), "");
        assert_eq!(table.categories().count(), 1);
    }
}
